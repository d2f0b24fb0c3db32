//! Tratamento de teclado, por tela, mais o InputBox.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::Path;

use crate::{
    api::{transcribe::TranscribePayload, users::NewUser},
    events::Screen,
    form::{AttachedFile, FIELD_COUNT, Metadata},
    input::{InputBoxState, InputCallbackId},
    session::{Role, Session},
    shortcuts::matches_shortcut,
    submission::{Phase, ticker::Ticker},
    worker::WorkerCmd,
};

use super::App;

/// Ctrl+C encerra de qualquer tela, inclusive com InputBox aberto.
pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Despacha a tecla para a tela ativa. Retorna true para encerrar.
pub async fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Evita eventos duplicados de soltura/repetição no Windows.
    if key.kind != KeyEventKind::Press {
        return Ok(false);
    }

    // O InputBox captura tudo enquanto estiver aberto.
    if app.input_box.is_some() {
        handle_input_box_key(app, key).await?;
        return Ok(false);
    }

    match app.ui.screen {
        Screen::Login => handle_login_key(app, key).await,
        Screen::Transcription => handle_transcription_key(app, key).await,
        Screen::Users => handle_users_key(app, key).await,
    }
}

async fn handle_login_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    let sc = app.shortcuts.login.clone();

    if matches_shortcut(&key, &sc.quit) {
        return Ok(true);
    }
    if matches_shortcut(&key, &sc.username) {
        app.input_box = Some(InputBoxState::open(
            "Usuário:",
            app.login_username.clone(),
            InputCallbackId::LoginUsername,
        ));
    } else if matches_shortcut(&key, &sc.password) {
        app.input_box = Some(InputBoxState::open_masked(
            "Senha:",
            String::new(),
            InputCallbackId::LoginPassword,
        ));
    } else if matches_shortcut(&key, &sc.submit) {
        submit_login(app).await;
    }
    Ok(false)
}

/// Valida e envia as credenciais ao worker.
async fn submit_login(app: &mut App) {
    if app.login_pending {
        return;
    }
    if app.login_username.trim().is_empty() || app.login_password.is_empty() {
        app.ui.error = Some("informe usuário e senha".into());
        return;
    }
    app.login_pending = true;
    app.ui.error = None;
    app.ui.status = "Autenticando...".into();
    let _ = app
        .worker_tx
        .send(WorkerCmd::Login {
            username: app.login_username.trim().to_string(),
            password: app.login_password.clone(),
        })
        .await;
}

async fn handle_transcription_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    let sc = app.shortcuts.transcription.clone();

    // Com a prévia aberta, só resta fechá-la.
    if app.ui.show_preview {
        if key.code == KeyCode::Esc || matches_shortcut(&key, &sc.preview) {
            app.ui.show_preview = false;
        }
        return Ok(false);
    }

    if matches_shortcut(&key, &sc.quit) {
        return Ok(true);
    }

    if matches_shortcut(&key, &sc.up) {
        app.ui.selected_field = app.ui.selected_field.saturating_sub(1);
    } else if matches_shortcut(&key, &sc.down) {
        if app.ui.selected_field + 1 < FIELD_COUNT {
            app.ui.selected_field += 1;
        }
    } else if matches_shortcut(&key, &sc.edit_field) {
        edit_selected_field(app);
    } else if matches_shortcut(&key, &sc.attach_file) {
        let current = app
            .draft
            .file
            .as_ref()
            .map(|f| f.path.display().to_string())
            .unwrap_or_default();
        app.input_box = Some(InputBoxState::open(
            "Caminho do arquivo de áudio/vídeo:",
            current,
            InputCallbackId::AttachFile,
        ));
    } else if matches_shortcut(&key, &sc.add_tag) {
        app.input_box = Some(InputBoxState::open(
            "Nova tag:",
            String::new(),
            InputCallbackId::AddTag,
        ));
    } else if matches_shortcut(&key, &sc.remove_tag) {
        match app.draft.tags.remove_last() {
            Some(tag) => app.ui.status = format!("Tag removida: {tag}"),
            None => app.ui.status = "Nenhuma tag para remover".into(),
        }
    } else if matches_shortcut(&key, &sc.submit) {
        submit_transcription(app).await;
    } else if matches_shortcut(&key, &sc.download) {
        download_document(app);
    } else if matches_shortcut(&key, &sc.preview) {
        if app.controller.result().is_some() {
            app.ui.show_preview = true;
        } else {
            app.ui.status = "Nenhuma prévia disponível".into();
        }
    } else if matches_shortcut(&key, &sc.reset) {
        app.controller.reset();
        app.draft.reset();
        app.ui.error = None;
        app.ui.status = "Limpo para nova transcrição".into();
    } else if matches_shortcut(&key, &sc.theme) {
        app.theme = app.theme.toggle();
        app.cfg.ui.theme = app.theme;
        app.cfg.save(&app.cfg_path)?;
        let _ = app
            .worker_tx
            .send(WorkerCmd::UpdateConfig(app.cfg.clone()))
            .await;
        app.ui.status = format!("Tema {} ativado", app.theme.label());
    } else if matches_shortcut(&key, &sc.users) {
        open_users_screen(app).await;
    } else if matches_shortcut(&key, &sc.logout) {
        logout(app)?;
    }
    Ok(false)
}

/// Abre o campo selecionado para edição. O formato alterna no lugar.
fn edit_selected_field(app: &mut App) {
    let idx = app.ui.selected_field;
    if Metadata::is_format_field(idx) {
        app.draft.metadata.formato = app.draft.metadata.formato.toggle();
        app.ui.status = format!("Formato: {}", app.draft.metadata.formato.as_str());
        return;
    }
    app.input_box = Some(InputBoxState::open(
        format!("{}:", Metadata::field_label(idx)),
        app.draft.metadata.field_value(idx),
        InputCallbackId::FormField(idx),
    ));
}

/// Inicia a submissão: valida, despacha ao worker e liga o ticker.
async fn submit_transcription(app: &mut App) {
    match app.controller.begin(&app.draft) {
        Ok(Some(generation)) => {
            // begin() já garantiu que há arquivo anexado.
            let Some(payload) = TranscribePayload::from_draft(&app.draft) else {
                app.controller.reset();
                return;
            };
            let _ = app
                .worker_tx
                .send(WorkerCmd::Transcribe {
                    generation,
                    payload,
                })
                .await;
            app.controller
                .attach_ticker(Ticker::spawn(app.tick_tx.clone(), generation));
            app.ui.error = None;
            app.ui.status = "Processando transcrição...".into();
            app.ui.push_log("transcrição enviada");
        }
        Ok(None) => {
            // Já existe uma submissão em andamento; nada a fazer.
        }
        Err(e) => {
            app.ui.error = Some(e.to_string());
        }
    }
}

/// Grava o documento gerado no diretório configurado.
fn download_document(app: &mut App) {
    if app.controller.phase() != Phase::Succeeded {
        app.ui.status = "Nenhum documento pronto para baixar".into();
        return;
    }
    let dir = app.cfg.ui.download_dir.clone();
    match app
        .controller
        .download(Path::new(&dir), &app.draft.metadata.entrevistado)
    {
        Ok(path) => {
            app.ui.status = format!("Documento salvo em {}", path.display());
            app.ui.push_log(format!("documento salvo: {}", path.display()));
        }
        Err(e) => app.ui.error = Some(e.to_string()),
    }
}

/// Tela de usuários é restrita a administradores.
async fn open_users_screen(app: &mut App) {
    let is_admin = app.session.as_ref().is_some_and(|s| s.role.is_admin());
    if !is_admin {
        app.ui.status = "Acesso restrito a administradores".into();
        return;
    }
    app.ui.screen = Screen::Users;
    app.ui.selected_user = 0;
    app.pending_delete = None;
    let _ = app.worker_tx.send(WorkerCmd::RefreshUsers).await;
}

/// Encerra a sessão local e volta para o login.
fn logout(app: &mut App) -> Result<()> {
    Session::clear(&app.session_path)?;
    app.session = None;
    app.login_username.clear();
    app.login_password.clear();
    app.ui.screen = Screen::Login;
    app.ui.error = None;
    app.ui.status = "Sessão encerrada".into();
    Ok(())
}

async fn handle_users_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    let sc = app.shortcuts.users.clone();

    if matches_shortcut(&key, &sc.back) {
        // Esc primeiro cancela uma exclusão pendente, depois volta.
        if app.pending_delete.take().is_some() {
            app.ui.status = "Exclusão cancelada".into();
        } else {
            app.ui.screen = Screen::Transcription;
        }
        return Ok(false);
    }
    if matches_shortcut(&key, &sc.quit) {
        return Ok(true);
    }

    if matches_shortcut(&key, &sc.refresh) {
        app.pending_delete = None;
        let _ = app.worker_tx.send(WorkerCmd::RefreshUsers).await;
        app.ui.status = "Atualizando lista de usuários...".into();
    } else if matches_shortcut(&key, &sc.up) {
        app.ui.selected_user = app.ui.selected_user.saturating_sub(1);
        app.pending_delete = None;
    } else if matches_shortcut(&key, &sc.down) {
        if app.ui.selected_user + 1 < app.users.len() {
            app.ui.selected_user += 1;
        }
        app.pending_delete = None;
    } else if matches_shortcut(&key, &sc.new_user) {
        app.new_user = Default::default();
        app.input_box = Some(InputBoxState::open(
            "Login do novo usuário:",
            String::new(),
            InputCallbackId::NewUserUsername,
        ));
    } else if matches_shortcut(&key, &sc.delete) {
        delete_selected_user(app).await;
    }
    Ok(false)
}

/// Exclusão em duas teclas: a primeira marca, a segunda confirma.
async fn delete_selected_user(app: &mut App) {
    let Some(user) = app.users.get(app.ui.selected_user) else {
        return;
    };
    if user.username == "admin" {
        app.ui.error = Some("o usuário admin não pode ser removido".into());
        return;
    }
    let username = user.username.clone();
    if app.pending_delete.as_deref() == Some(username.as_str()) {
        app.pending_delete = None;
        let _ = app
            .worker_tx
            .send(WorkerCmd::DeleteUser {
                username: username.clone(),
            })
            .await;
        app.ui.status = format!("Removendo {username}...");
    } else {
        app.ui.status = format!("Pressione novamente para confirmar a exclusão de {username}");
        app.pending_delete = Some(username);
    }
}

async fn handle_input_box_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let sc = app.shortcuts.input_box.clone();

    if matches_shortcut(&key, &sc.confirm) {
        if let Some(state) = app.input_box.take() {
            apply_input_callback(app, state).await?;
        }
        return Ok(());
    }
    if matches_shortcut(&key, &sc.cancel) {
        app.input_box = None;
        app.ui.status = "Entrada cancelada".into();
        return Ok(());
    }

    let Some(state) = app.input_box.as_mut() else {
        return Ok(());
    };
    if matches_shortcut(&key, &sc.backspace) {
        state.backspace();
    } else if matches_shortcut(&key, &sc.delete) {
        state.delete();
    } else if matches_shortcut(&key, &sc.left) {
        state.move_left();
    } else if matches_shortcut(&key, &sc.right) {
        state.move_right();
    } else if matches_shortcut(&key, &sc.home) {
        state.move_home();
    } else if matches_shortcut(&key, &sc.end) {
        state.move_end();
    } else if matches_shortcut(&key, &sc.clear_line) {
        state.clear_line();
    } else if let KeyCode::Char(c) = key.code
        && !key.modifiers.contains(KeyModifiers::CONTROL)
    {
        state.insert_char(c);
    }
    Ok(())
}

/// Entrega o valor confirmado ao destino registrado no InputBox.
async fn apply_input_callback(app: &mut App, state: InputBoxState) -> Result<()> {
    let value = state.value;
    match state.callback_id {
        InputCallbackId::LoginUsername => {
            app.login_username = value.trim().to_string();
            app.ui.status = "Usuário preenchido".into();
        }
        InputCallbackId::LoginPassword => {
            app.login_password = value;
            app.ui.status = "Senha preenchida".into();
        }
        InputCallbackId::FormField(idx) => {
            app.draft.metadata.set_field(idx, value);
            app.ui.status = format!("{} atualizado", Metadata::field_label(idx));
        }
        InputCallbackId::AttachFile => attach_file(app, &value),
        InputCallbackId::AddTag => {
            if app.draft.tags.add(&value) {
                app.ui.status = format!("{} tag(s)", app.draft.tags.items().len());
            } else if !value.trim().is_empty() {
                app.ui.status = "Tag repetida ignorada".into();
            }
        }
        InputCallbackId::NewUserUsername => {
            let username = value.trim().to_string();
            if username.is_empty() {
                app.ui.error = Some("login não pode ser vazio".into());
                return Ok(());
            }
            app.new_user.username = username;
            app.input_box = Some(InputBoxState::open(
                "Nome completo:",
                String::new(),
                InputCallbackId::NewUserName,
            ));
        }
        InputCallbackId::NewUserName => {
            app.new_user.name = value.trim().to_string();
            app.input_box = Some(InputBoxState::open_masked(
                "Senha:",
                String::new(),
                InputCallbackId::NewUserPassword,
            ));
        }
        InputCallbackId::NewUserPassword => {
            if value.is_empty() {
                app.ui.error = Some("senha não pode ser vazia".into());
                return Ok(());
            }
            app.new_user.password = value;
            app.input_box = Some(InputBoxState::open(
                "Tipo (admin/pesquisador):",
                "pesquisador",
                InputCallbackId::NewUserRole,
            ));
        }
        InputCallbackId::NewUserRole => {
            // Qualquer valor diferente de "admin" vira pesquisador.
            let role = if value.trim().eq_ignore_ascii_case("admin") {
                Role::Admin
            } else {
                Role::Pesquisador
            };
            let draft = std::mem::take(&mut app.new_user);
            let _ = app
                .worker_tx
                .send(WorkerCmd::CreateUser(NewUser {
                    username: draft.username,
                    name: draft.name,
                    password: draft.password,
                    role,
                }))
                .await;
            app.ui.status = "Criando usuário...".into();
        }
    }
    Ok(())
}

/// Confere o caminho informado e registra o anexo no rascunho.
fn attach_file(app: &mut App, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        app.draft.file = None;
        app.ui.status = "Anexo removido".into();
        return;
    }
    match std::fs::metadata(trimmed) {
        Ok(md) if md.is_file() => {
            let path = std::path::PathBuf::from(trimmed);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| trimmed.to_string());
            let size_bytes = md.len();
            app.draft.file = Some(AttachedFile {
                path,
                name: name.clone(),
                size_bytes,
            });
            app.ui.error = None;
            app.ui.status = format!(
                "Anexado: {name} ({:.1} MB)",
                size_bytes as f64 / (1024.0 * 1024.0)
            );
        }
        _ => {
            app.ui.error = Some(format!("arquivo não encontrado: {trimmed}"));
        }
    }
}
