use std::path::Path;

use reqwest::Url;

use crate::error::CoreError;

/// Basic-auth pair handed to `reqwest`.
#[derive(Clone, PartialEq, Eq)]
pub(super) struct Credentials {
    pub(super) user: String,
    pub(super) pass: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Pick credentials: explicit user + pass first, then the cookie file, then
/// none.
pub(super) fn resolve_credentials(
    user: Option<&str>,
    pass: Option<&str>,
    cookie_file: Option<&Path>,
) -> Result<Option<Credentials>, CoreError> {
    match (user, pass) {
        (Some(user), Some(pass)) => {
            return Ok(Some(Credentials {
                user: user.to_owned(),
                pass: pass.to_owned(),
            }))
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(CoreError::Config(
                "rpc user and rpc password must be set together".to_owned(),
            ));
        }
        (None, None) => {}
    }

    cookie_file.map(read_cookie_file).transpose()
}

fn read_cookie_file(path: &Path) -> Result<Credentials, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("failed to read cookie file {}: {e}", path.display()))
    })?;
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| CoreError::Config(format!("cookie file {} is empty", path.display())))?;

    match line.split_once(':') {
        Some((user, pass)) if !user.is_empty() && !pass.is_empty() => Ok(Credentials {
            user: user.to_owned(),
            pass: pass.to_owned(),
        }),
        _ => Err(CoreError::Config(format!(
            "cookie file {} must contain `user:password`",
            path.display()
        ))),
    }
}

pub(super) fn parse_endpoint(endpoint: &str) -> Result<Url, CoreError> {
    let url = Url::parse(endpoint).map_err(|e| {
        CoreError::Config(format!("invalid endpoint `{endpoint}`: expected HTTP(S) URL ({e})"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::Config(format!(
            "unsupported endpoint scheme `{other}`; expected http or https"
        ))),
    }
}
