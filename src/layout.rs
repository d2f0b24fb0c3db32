//! Funções auxiliares de layout das telas.

use ratatui::prelude::*;

/// Áreas da tela principal.
pub struct MainLayout {
    /// Corpo (formulário + painel lateral).
    pub body: Rect,
    /// Barra de ajuda.
    pub help_bar: Rect,
    /// Barra de status.
    pub status_bar: Rect,
}

/// Divisão do corpo em duas colunas.
pub struct BodyLayout {
    /// Formulário de metadados (coluna esquerda).
    pub form_panel: Rect,
    /// Processamento, resultado e log (coluna direita).
    pub side_panel: Rect,
}

/// Divide a tela em corpo + ajuda + status.
pub fn create_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    MainLayout {
        body: chunks[0],
        help_bar: chunks[1],
        status_bar: chunks[2],
    }
}

/// Divide o corpo em formulário (60%) e painel lateral (40%).
pub fn create_body_layout(area: Rect) -> BodyLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    BodyLayout {
        form_panel: chunks[0],
        side_panel: chunks[1],
    }
}

/// Área centralizada para as telas de login e popups maiores.
pub fn centered_box(area: Rect, width_percent: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}
