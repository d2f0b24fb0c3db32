//! Background worker handling backend API calls.

use crate::{
    api,
    api::transcribe::{TranscribePayload, TranscriptionResult},
    api::users::NewUser,
    config::Config,
    session::{Session, UserAccount},
};
use anyhow::{Context, Result};
use reqwest::Client;
use tokio::sync::mpsc;

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCmd {
    /// Authenticate against the backend.
    Login { username: String, password: String },
    /// Run one transcription request. The generation ties the eventual
    /// response back to the submission attempt that issued it.
    Transcribe {
        generation: u64,
        payload: TranscribePayload,
    },
    /// Reload the account list.
    RefreshUsers,
    /// Create an account.
    CreateUser(NewUser),
    /// Delete an account by username.
    DeleteUser { username: String },
    /// Apply updated settings.
    UpdateConfig(Config),
}

/// Events emitted by the worker for UI updates.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Login accepted; carries the authenticated session.
    LoginOk(Session),
    /// Login rejected or unreachable.
    LoginFailed(String),
    /// Transcription settled successfully.
    TranscriptionDone {
        generation: u64,
        result: TranscriptionResult,
    },
    /// Transcription failed (transport or backend error).
    TranscriptionFailed { generation: u64, message: String },
    /// Full account list loaded.
    UsersLoaded(Vec<UserAccount>),
    /// Account created.
    UserCreated(String),
    /// Account deleted.
    UserDeleted(String),
    /// Informational log message.
    Log(String),
    /// User-visible error message.
    Error(String),
}

/// Main worker loop: handle commands sequentially over one HTTP client.
pub async fn run(
    mut rx: mpsc::Receiver<WorkerCmd>,
    tx: mpsc::Sender<WorkerEvent>,
    mut cfg: Config,
) {
    // Shared HTTP client for all API calls.
    let http = Client::new();
    tracing::info!("worker started");

    // Process commands one at a time to keep state consistent.
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WorkerCmd::UpdateConfig(new_cfg) => {
                tracing::info!("settings updated");
                cfg = new_cfg;
                let _ = tx.send(WorkerEvent::Log("settings updated".into())).await;
            }

            WorkerCmd::Login { username, password } => {
                tracing::info!("login attempt: {username}");
                match api::auth::login(&http, &cfg.api.base_url, &username, &password).await {
                    Ok(session) => {
                        tracing::info!("login ok: {} ({})", session.username, session.role.label());
                        let _ = tx.send(WorkerEvent::LoginOk(session)).await;
                    }
                    Err(e) => {
                        tracing::warn!("login failed: {e}");
                        let _ = tx.send(WorkerEvent::LoginFailed(e.to_string())).await;
                    }
                }
            }

            WorkerCmd::Transcribe {
                generation,
                payload,
            } => {
                tracing::info!(
                    "transcription start: gen={generation} file={}",
                    payload.file_name
                );
                match transcribe_one(&http, &cfg, &payload).await {
                    Ok(result) => {
                        tracing::info!(
                            "transcription done: gen={generation} bytes={}",
                            result.document.len()
                        );
                        let _ = tx
                            .send(WorkerEvent::TranscriptionDone { generation, result })
                            .await;
                    }
                    Err(e) => {
                        tracing::error!("transcription failed: gen={generation}: {e}");
                        let _ = tx
                            .send(WorkerEvent::TranscriptionFailed {
                                generation,
                                message: e.to_string(),
                            })
                            .await;
                    }
                }
            }

            WorkerCmd::RefreshUsers => {
                tracing::info!("refresh users");
                match api::users::list(&http, &cfg.api.base_url).await {
                    Ok(users) => {
                        tracing::info!("users loaded: {}", users.len());
                        let _ = tx.send(WorkerEvent::UsersLoaded(users)).await;
                    }
                    Err(e) => {
                        tracing::error!("users list failed: {e}");
                        let _ = tx
                            .send(WorkerEvent::Error(format!("erro ao carregar usuários: {e}")))
                            .await;
                    }
                }
            }

            WorkerCmd::CreateUser(user) => {
                tracing::info!("create user: {}", user.username);
                match api::users::create(&http, &cfg.api.base_url, &user).await {
                    Ok(()) => {
                        let _ = tx.send(WorkerEvent::UserCreated(user.username)).await;
                    }
                    Err(e) => {
                        tracing::error!("create user failed: {e}");
                        let _ = tx
                            .send(WorkerEvent::Error(format!("erro ao criar usuário: {e}")))
                            .await;
                    }
                }
            }

            WorkerCmd::DeleteUser { username } => {
                tracing::info!("delete user: {username}");
                match api::users::delete(&http, &cfg.api.base_url, &username).await {
                    Ok(()) => {
                        let _ = tx.send(WorkerEvent::UserDeleted(username)).await;
                    }
                    Err(e) => {
                        tracing::error!("delete user failed: {e}");
                        let _ = tx
                            .send(WorkerEvent::Error(format!("erro ao excluir usuário: {e}")))
                            .await;
                    }
                }
            }
        }
    }
}

/// Read the attached file and run one transcription request end to end.
async fn transcribe_one(
    http: &Client,
    cfg: &Config,
    payload: &TranscribePayload,
) -> Result<TranscriptionResult> {
    let bytes = tokio::fs::read(&payload.file_path)
        .await
        .with_context(|| format!("falha ao ler {}", payload.file_path.display()))?;
    api::transcribe::submit(
        http,
        &cfg.api.base_url,
        payload,
        bytes,
        cfg.api.transcribe_timeout_secs,
    )
    .await
}
