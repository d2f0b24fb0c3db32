//! Loop de eventos do TUI, estado da aplicação e despacho de eventos.

mod handlers;
mod render;

use anyhow::Result;
use crossterm::event::{self, Event};
use std::{path::PathBuf, time::Duration};
use tokio::sync::mpsc;

use crate::{
    config::Config,
    events::{Screen, UiState},
    form::SubmissionDraft,
    input::InputBoxState,
    session::{Session, UserAccount},
    shortcuts::Shortcuts,
    submission::{SubmissionController, ticker::Tick},
    theme::Theme,
    ui::Tui,
    worker::{self, WorkerCmd, WorkerEvent},
};

use handlers::{handle_key, is_ctrl_c};
use render::draw;

/// Rascunho de criação de usuário, preenchido em etapas encadeadas.
#[derive(Clone, Debug, Default)]
pub struct NewUserDraft {
    pub username: String,
    pub name: String,
    pub password: String,
}

/// Estado compartilhado entre handlers e renderização.
pub struct App {
    /// Caminho do arquivo de configuração.
    pub cfg_path: PathBuf,
    /// Caminho da sessão persistida.
    pub session_path: PathBuf,
    /// Configuração atual em memória.
    pub cfg: Config,
    /// Tema visual ativo.
    pub theme: Theme,
    /// Sessão autenticada (None exibe a tela de login).
    pub session: Option<Session>,
    /// Estado de UI (tela, seleções, status).
    pub ui: UiState,
    /// Rascunho do formulário de transcrição.
    pub draft: SubmissionDraft,
    /// Máquina de estados da submissão em andamento.
    pub controller: SubmissionController,
    /// Lista de usuários carregada do backend.
    pub users: Vec<UserAccount>,

    /// Canal de comandos para o worker.
    pub worker_tx: mpsc::Sender<WorkerCmd>,
    /// Canal de eventos vindos do worker.
    pub worker_rx: mpsc::Receiver<WorkerEvent>,
    /// Emissor de ticks entregue a cada submissão.
    pub tick_tx: mpsc::Sender<Tick>,
    /// Receptor dos ticks da barra de progresso.
    pub tick_rx: mpsc::Receiver<Tick>,

    /// InputBox aberto (tem prioridade sobre os atalhos).
    pub input_box: Option<InputBoxState>,
    /// Atalhos de teclado.
    pub shortcuts: Shortcuts,

    /// Usuário digitado na tela de login.
    pub login_username: String,
    /// Senha digitada na tela de login.
    pub login_password: String,
    /// Login em andamento (desabilita novo envio).
    pub login_pending: bool,

    /// Rascunho da criação de usuário.
    pub new_user: NewUserDraft,
    /// Exclusão aguardando confirmação (username).
    pub pending_delete: Option<String>,
}

/// Roda o loop principal até o usuário sair.
pub async fn run_app(terminal: &mut Tui) -> Result<()> {
    // Configuração, atalhos e sessão persistidos.
    let cfg_path = PathBuf::from("config.toml");
    let cfg = Config::load_or_default(&cfg_path)?;
    let shortcuts = Shortcuts::load_or_default("shortcut.toml")?;
    let session_path = PathBuf::from("session.json");
    let session = Session::load(&session_path);

    // Canais de comunicação com o worker e com o ticker de progresso.
    let (tx_cmd, rx_cmd) = mpsc::channel::<WorkerCmd>(64);
    let (tx_ev, rx_ev) = mpsc::channel::<WorkerEvent>(256);
    let (tick_tx, tick_rx) = mpsc::channel::<Tick>(64);

    // Worker com um snapshot inicial da configuração.
    tokio::spawn(worker::run(rx_cmd, tx_ev, cfg.clone()));

    // Com sessão persistida, pula direto para o formulário.
    let initial_screen = if session.is_some() {
        Screen::Transcription
    } else {
        Screen::Login
    };

    let mut app = App {
        theme: cfg.ui.theme,
        cfg_path,
        session_path,
        cfg,
        session,
        ui: UiState::new(initial_screen),
        draft: SubmissionDraft::default(),
        controller: SubmissionController::new(),
        users: vec![],
        worker_tx: tx_cmd,
        worker_rx: rx_ev,
        tick_tx,
        tick_rx,
        input_box: None,
        shortcuts,
        login_username: String::new(),
        login_password: String::new(),
        login_pending: false,
        new_user: NewUserDraft::default(),
        pending_delete: None,
    };

    if let Some(s) = &app.session {
        app.ui.status = format!("Sessão de {} restaurada", s.name);
    }

    loop {
        // Desenha o estado atual.
        terminal.draw(|f| draw(f, &app))?;

        // Consome eventos do worker antes da entrada do usuário.
        while let Ok(ev) = app.worker_rx.try_recv() {
            handle_worker_event(&mut app, ev)?;
        }

        // Avança a barra de progresso simulada.
        while let Ok(tick) = app.tick_rx.try_recv() {
            app.controller.on_tick(tick.generation);
        }

        // Timeout curto para manter a UI responsiva.
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(k) = event::read()?
        {
            // Ctrl+C encerra em qualquer tela.
            if is_ctrl_c(&k) {
                break;
            }
            if handle_key(&mut app, k).await? {
                break;
            }
        }
    }
    Ok(())
}

/// Reflete um evento do worker no estado da aplicação.
fn handle_worker_event(app: &mut App, ev: WorkerEvent) -> Result<()> {
    match ev {
        WorkerEvent::LoginOk(session) => {
            // Persiste a sessão e entra no formulário.
            session.save(&app.session_path)?;
            app.ui.status = format!("Bem-vindo(a), {}!", session.name);
            app.ui.error = None;
            app.login_pending = false;
            app.login_password.clear();
            app.session = Some(session);
            app.ui.screen = Screen::Transcription;
        }
        WorkerEvent::LoginFailed(msg) => {
            app.login_pending = false;
            app.ui.error = Some(msg);
        }
        WorkerEvent::TranscriptionDone { generation, result } => {
            // Respostas de tentativas abandonadas são descartadas.
            if app.controller.on_success(generation, result) {
                app.ui.status = "Transcrição concluída!".into();
                app.ui.error = None;
                app.ui.push_log("transcrição concluída");
            }
        }
        WorkerEvent::TranscriptionFailed {
            generation,
            message,
        } => {
            if app.controller.on_failure(generation, message.clone()) {
                app.ui.error = Some(format!("Erro ao processar: {message}"));
                app.ui.push_log("transcrição falhou");
            }
        }
        WorkerEvent::UsersLoaded(users) => {
            app.users = users;
            app.ui.selected_user = 0;
            app.ui.status = format!("{} usuário(s) carregado(s)", app.users.len());
        }
        WorkerEvent::UserCreated(username) => {
            app.ui.status = format!("Usuário {username} criado");
            app.ui.push_log(format!("usuário criado: {username}"));
            // Recarrega a lista do backend.
            let _ = app.worker_tx.try_send(WorkerCmd::RefreshUsers);
        }
        WorkerEvent::UserDeleted(username) => {
            app.ui.status = format!("Usuário {username} removido");
            app.ui.push_log(format!("usuário removido: {username}"));
            let _ = app.worker_tx.try_send(WorkerCmd::RefreshUsers);
        }
        WorkerEvent::Log(s) => {
            app.ui.push_log(s);
        }
        WorkerEvent::Error(s) => {
            app.ui.error = Some(s);
        }
    }
    Ok(())
}
