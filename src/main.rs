//! Ponto de entrada e inicialização do runtime.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

mod api;
mod app;
mod config;
mod events;
mod form;
mod input;
mod layout;
mod session;
mod shortcuts;
mod submission;
mod theme;
mod ui;
mod worker;

/// Inicializa o log em arquivo e mantém o guard assíncrono vivo.
fn init_logging() -> Result<WorkerGuard> {
    let log_file = "transcritor_tui.log";
    // Escreve direto em arquivo para não sujar a saída do TUI.
    let file_appender = tracing_appender::rolling::never(".", log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    tracing::info!("logging to {}", log_file);
    Ok(guard)
}

#[tokio::main]
/// Entrada: inicializa o log, roda a UI e restaura o terminal.
async fn main() -> Result<()> {
    // O guard precisa viver até o fim para o log continuar fluindo.
    let _log_guard = init_logging()?;
    tracing::info!("app starting");

    // Um pânico no meio do draw não pode deixar o terminal em modo raw.
    ui::install_panic_hook();
    let mut terminal = ui::init_terminal()?;
    let res = app::run_app(&mut terminal).await;
    // Restaura o terminal mesmo quando a aplicação sai com erro.
    ui::restore_terminal()?;

    if let Err(ref e) = res {
        tracing::error!("app error: {e}");
    }
    tracing::info!("app exiting");
    res
}
