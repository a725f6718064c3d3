//! Line-oriented stand-in for the views: each command calls the same store
//! actions a view would and prints what the view would show.

use api::{Credentials, NotesApi};
use client::{AppState, Outcome, Route, SortBy};
use store::{Note, NoteDraft};

const HELP: &str = "\
Commands:
  open <path>                 navigate (/, /login, /signup)
  back                        go back one page
  login <username> <password>
  register <username> <password>
  logout
  fetch                       reload notes from the server
  list [title|createdAt] [search...]
  add <title> | <content>
  edit <id> [title] | [content]
  rm <id>
  whoami
  quit";

pub enum Flow {
    Continue(String),
    Quit,
}

pub fn render_route(route: &Route) -> String {
    match route {
        Route::Home => "[/] Your notes. Try `fetch` and `list`.".to_string(),
        Route::Login => "[/login] Sign in with `login <username> <password>`.".to_string(),
        Route::Signup => "[/signup] Create an account with `register <username> <password>`."
            .to_string(),
        Route::NotFound(path) => format!("[{path}] Page not found."),
    }
}

fn render_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes.".to_string();
    }
    notes
        .iter()
        .map(|n| {
            format!(
                "#{} {}: {} ({})",
                n.id,
                n.title,
                n.content,
                n.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split `title | content` into a draft; blank halves are left out.
fn parse_draft(input: &str) -> NoteDraft {
    let (title, content) = match input.split_once('|') {
        Some((title, content)) => (title.trim(), content.trim()),
        None => (input.trim(), ""),
    };
    NoteDraft {
        title: Some(title.to_string()).filter(|t| !t.is_empty()),
        content: Some(content.to_string()).filter(|c| !c.is_empty()),
    }
}

fn navigate<A: NotesApi>(app: &mut AppState<A>, path: &str) -> String {
    match app.navigate(path) {
        Some(route) => render_route(route),
        None => format!("Navigation to {path} was blocked."),
    }
}

fn describe<A: NotesApi>(app: &AppState<A>, outcome: Outcome, done: &str) -> String {
    match outcome {
        Outcome::Applied => done.to_string(),
        Outcome::MissingLocally => {
            format!("{done} on the server, but it was not in your list. Try `fetch`.")
        }
        Outcome::Failed => app
            .notes()
            .last_error()
            .unwrap_or_else(|| "Request failed".to_string()),
    }
}

pub async fn run<A: NotesApi>(app: &mut AppState<A>, line: &str) -> Flow {
    let line = line.trim();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let output = match command {
        "" => String::new(),
        "help" => HELP.to_string(),
        "quit" | "exit" => return Flow::Quit,
        "open" => navigate(app, args.first().copied().unwrap_or("/")),
        "back" => match app.back() {
            Some(route) => render_route(route),
            None => "Nowhere to go back to.".to_string(),
        },
        "login" => match args.as_slice() {
            [username, password] => match app.session().login(username, password).await {
                Ok(()) => navigate(app, "/"),
                Err(e) => format!("Login failed: {}", e.message().unwrap_or("Login failed")),
            },
            _ => "Usage: login <username> <password>".to_string(),
        },
        "register" => match args.as_slice() {
            [username, password] => {
                let credentials = Credentials::new(*username, *password);
                match app.session().register(&credentials).await {
                    Ok(user) => format!(
                        "Account {} created. Sign in with `login`.\n{}",
                        user.display_name(),
                        navigate(app, "/login")
                    ),
                    Err(e) => format!(
                        "Registration failed: {}",
                        e.message().unwrap_or("Registration failed")
                    ),
                }
            }
            _ => "Usage: register <username> <password>".to_string(),
        },
        "logout" => {
            app.session().logout();
            navigate(app, "/login")
        }
        "whoami" => match (app.session().user(), app.session().is_authenticated()) {
            (Some(user), true) => format!("Signed in as {}", user.display_name()),
            (None, true) => "Signed in".to_string(),
            (_, false) => "Not signed in".to_string(),
        },
        "fetch" | "list" | "add" | "edit" | "rm" if app.current_route() != Some(&Route::Home) => {
            "Open your notes first (`open /`).".to_string()
        }
        "fetch" => {
            let outcome = app.notes().fetch_notes().await;
            match outcome {
                Outcome::Applied => render_notes(&app.notes().notes()),
                _ => describe(app, outcome, "Fetched"),
            }
        }
        "list" => {
            let (sort_by, search) = match args.first() {
                Some(&key) if key == "title" || key == "createdAt" => {
                    (SortBy::parse_lossy(key), args[1..].join(" "))
                }
                _ => (SortBy::default(), args.join(" ")),
            };
            render_notes(&app.notes().filtered_notes(&search, sort_by))
        }
        "add" => {
            let outcome = app.notes().add_note(parse_draft(rest)).await;
            describe(app, outcome, "Added")
        }
        "edit" => match rest.split_once(' ').map(|(id, draft)| (id.parse::<i64>(), draft)) {
            Some((Ok(id), draft)) => {
                let outcome = app.notes().update_note(id, parse_draft(draft)).await;
                describe(app, outcome, &format!("Updated #{id}"))
            }
            _ => "Usage: edit <id> [title] | [content]".to_string(),
        },
        "rm" => match args.first().map(|id| id.parse::<i64>()) {
            Some(Ok(id)) => {
                let outcome = app.notes().delete_note(id).await;
                describe(app, outcome, &format!("Deleted #{id}"))
            }
            _ => "Usage: rm <id>".to_string(),
        },
        other => format!("Unknown command `{other}`. Type `help`."),
    };

    Flow::Continue(output)
}
