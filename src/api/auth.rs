//! Login endpoint wrapper.

use anyhow::{Result, anyhow};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::session::{Role, Session};

/// Credentials posted to `/api/login`.
#[derive(Debug, Serialize)]
struct LoginReq<'a> {
    username: &'a str,
    password: &'a str,
}

/// Success body: `{status:"ok", name, role}`.
#[derive(Debug, Deserialize)]
struct LoginResp {
    status: String,
    name: String,
    role: Role,
}

/// Authenticate against the backend and return the session on success.
pub async fn login(
    http: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<Session> {
    let url = super::endpoint(base_url, "/api/login");
    let resp = http
        .post(url)
        .json(&LoginReq { username, password })
        .send()
        .await?;

    if resp.status() == StatusCode::UNAUTHORIZED {
        return Err(anyhow!("usuário ou senha incorretos"));
    }
    let resp = super::ensure_success(resp).await?;
    let body = resp.json::<LoginResp>().await?;
    if body.status != "ok" {
        return Err(anyhow!("resposta inesperada do backend: status={}", body.status));
    }

    Ok(Session {
        username: username.to_string(),
        name: body.name,
        role: body.role,
    })
}
