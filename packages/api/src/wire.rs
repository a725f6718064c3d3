//! Request and response bodies that only exist on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use store::UserInfo;

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Response of `POST /auth/login`.
///
/// Every field is optional so a malformed success body still decodes and the
/// session store can reject it with a proper message. A `user` that does not
/// look like a [`UserInfo`] is dropped rather than failing the whole response,
/// so a valid token is never lost to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "lenient_user")]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn new(token: impl Into<String>, user: UserInfo) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            message: None,
        }
    }
}

fn lenient_user<'de, D: Deserializer<'de>>(de: D) -> Result<Option<UserInfo>, D::Error> {
    let Some(value) = Option::<serde_json::Value>::deserialize(de)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            tracing::warn!("Ignoring unrecognized user in login response: {}", e);
            Ok(None)
        }
    }
}

/// Error body the API sends alongside non-success statuses.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
