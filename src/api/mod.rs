//! HTTP wrappers for the transcription backend API.

/// Login endpoint.
pub mod auth;
/// Transcription endpoint and response normalization.
pub mod transcribe;
/// User management CRUD.
pub mod users;

use anyhow::{Result, anyhow};

/// Join the configured base URL with an API path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Convert non-2xx responses into a structured error.
pub(crate) async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_else(|_| "".into());
    Err(anyhow!("HTTP status {status} error: {body}"))
}

#[cfg(test)]
mod tests {
    use super::endpoint;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:8501/", "/api/login"),
            "http://localhost:8501/api/login"
        );
        assert_eq!(
            endpoint("http://localhost:8501", "/api/login"),
            "http://localhost:8501/api/login"
        );
    }
}
