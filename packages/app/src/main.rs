use client::{AppState, Settings};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod shell;

use shell::Flow;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;
    let mut app = AppState::from_settings(&settings);
    tracing::info!(
        "Using {} with credentials in {}",
        settings.api.base_url,
        settings.storage.dir().display()
    );

    if let Some(route) = app.navigate("/") {
        println!("{}", shell::render_route(route));
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match shell::run(&mut app, &line).await {
            Flow::Continue(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Flow::Quit => break,
        }
    }

    Ok(())
}
