//! User management CRUD wrappers.

use anyhow::{Result, anyhow};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::session::{Role, UserAccount};

/// Payload for creating a new account.
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Fetch the full account list.
pub async fn list(http: &Client, base_url: &str) -> Result<Vec<UserAccount>> {
    let url = super::endpoint(base_url, "/api/users");
    let resp = http.get(url).send().await?;
    let resp = super::ensure_success(resp).await?;
    Ok(resp.json::<Vec<UserAccount>>().await?)
}

/// Create an account. The backend answers 400 on a duplicate username.
pub async fn create(http: &Client, base_url: &str, user: &NewUser) -> Result<()> {
    let url = super::endpoint(base_url, "/api/users");
    let resp = http.post(url).json(user).send().await?;
    if resp.status() == StatusCode::BAD_REQUEST {
        return Err(anyhow!("este nome de usuário já existe"));
    }
    super::ensure_success(resp).await?;
    Ok(())
}

/// Delete an account by username.
pub async fn delete(http: &Client, base_url: &str, username: &str) -> Result<()> {
    let path = format!("/api/users/{}", urlencoding::encode(username));
    let url = super::endpoint(base_url, &path);
    let resp = http.delete(url).send().await?;
    super::ensure_success(resp).await?;
    Ok(())
}
