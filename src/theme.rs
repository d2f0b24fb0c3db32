//! Tema claro/escuro aplicado aos widgets da interface.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Tema visual, persistido na configuração.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Fundo escuro (padrão).
    #[default]
    Dark,
    /// Fundo claro.
    Light,
}

impl Theme {
    /// Alterna entre claro e escuro.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Nome exibido na barra de status.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "escuro",
            Theme::Light => "claro",
        }
    }

    /// Cor de texto padrão.
    pub fn fg(self) -> Color {
        match self {
            Theme::Dark => Color::White,
            Theme::Light => Color::Black,
        }
    }

    /// Cor de texto secundário (rótulos, ajuda).
    pub fn dim(self) -> Color {
        match self {
            Theme::Dark => Color::Gray,
            Theme::Light => Color::DarkGray,
        }
    }

    /// Cor de destaque institucional (o laranja CMUrb).
    pub fn accent(self) -> Color {
        Color::Rgb(255, 140, 0)
    }

    /// Estilo base da tela.
    pub fn base(self) -> Style {
        Style::default().fg(self.fg())
    }

    /// Estilo da linha selecionada em tabelas e listas.
    pub fn highlight(self) -> Style {
        Style::default()
            .bg(self.accent())
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    /// Estilo de títulos de painel.
    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent())
            .add_modifier(Modifier::BOLD)
    }

    /// Estilo de mensagens de erro.
    pub fn error(self) -> Style {
        Style::default().fg(Color::Red)
    }

    /// Estilo de mensagens de sucesso.
    pub fn success(self) -> Style {
        Style::default().fg(Color::Green)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternancia_vai_e_volta() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
    }

    #[test]
    fn tema_persiste_em_minusculas() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
    }
}
