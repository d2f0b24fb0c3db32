//! Componente de entrada de texto em popup (InputBox).

use ratatui::{
    layout::Alignment,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::theme::Theme;

/// Identifica o destino do valor quando a entrada é confirmada.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputCallbackId {
    // Tela de login
    LoginUsername,
    LoginPassword,

    // Formulário de transcrição
    FormField(usize),
    AttachFile,
    AddTag,

    // Criação de usuário (encadeado: login → nome → senha → tipo)
    NewUserUsername,
    NewUserName,
    NewUserPassword,
    NewUserRole,
}

/// Estado do InputBox enquanto aberto.
#[derive(Clone, Debug)]
pub struct InputBoxState {
    /// Mensagem de prompt.
    pub prompt: String,
    /// Valor em edição.
    pub value: String,
    /// Posição do cursor (em caracteres).
    pub cursor: usize,
    /// Oculta o valor digitado (senhas).
    pub mask: bool,
    /// Destino do valor ao confirmar.
    pub callback_id: InputCallbackId,
}

impl InputBoxState {
    /// Abre um InputBox com o cursor no fim do valor inicial.
    pub fn open(prompt: impl Into<String>, value: impl Into<String>, id: InputCallbackId) -> Self {
        let value = value.into();
        Self {
            prompt: prompt.into(),
            cursor: value.chars().count(),
            value,
            mask: false,
            callback_id: id,
        }
    }

    /// Variante com o valor mascarado na tela.
    pub fn open_masked(
        prompt: impl Into<String>,
        value: impl Into<String>,
        id: InputCallbackId,
    ) -> Self {
        let mut s = Self::open(prompt, value, id);
        s.mask = true;
        s
    }

    /// Converte a posição do cursor (caracteres) em índice de bytes.
    fn byte_cursor(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Insere um caractere na posição do cursor.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_cursor();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Remove o caractere anterior ao cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    /// Remove o caractere sob o cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Apaga a linha inteira.
    pub fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

/// Desenha o InputBox como popup centralizado.
pub fn render_input_box(f: &mut Frame, state: &InputBoxState, theme: Theme) {
    let popup_area = centered_popup(f.area(), 70, 7);

    // Limpa a área por baixo do popup.
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Entrada")
        .style(Style::default().bg(Color::DarkGray));
    f.render_widget(block, popup_area);

    // Prompt + campo + linha em branco + ajuda.
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(popup_area);

    let prompt = Paragraph::new(state.prompt.clone()).style(
        Style::default()
            .fg(theme.accent())
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(prompt, inner[0]);

    // Valor exibido (mascarado para senhas).
    let shown: String = if state.mask {
        state.value.chars().map(|_| '*').collect()
    } else {
        state.value.clone()
    };

    // Rolagem horizontal quando o cursor passa da largura visível.
    let width = inner[1].width as usize;
    let scroll = state.cursor.saturating_sub(width.saturating_sub(2));
    let chars: Vec<char> = shown.chars().collect();
    let visible: String = chars.iter().skip(scroll).take(width).collect();

    // Cursor representado por um pipe na posição atual.
    let cursor_at = (state.cursor - scroll).min(visible.chars().count());
    let before: String = visible.chars().take(cursor_at).collect();
    let after: String = visible.chars().skip(cursor_at).collect();
    let field = Paragraph::new(format!("{before}|{after}")).style(Style::default().fg(Color::Green));
    f.render_widget(field, inner[1]);

    let help = Paragraph::new("Enter=confirmar | ESC=cancelar | Ctrl+U=limpar")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(help, inner[3]);
}

/// Calcula a área central do popup.
fn centered_popup(area: Rect, width_percent: u16, height: u16) -> Rect {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insercao_e_remocao_respeitam_utf8() {
        let mut s = InputBoxState::open("p:", "memria", InputCallbackId::AddTag);
        s.cursor = 3;
        s.insert_char('ó');
        assert_eq!(s.value, "memória");
        s.backspace();
        assert_eq!(s.value, "memria");
        assert_eq!(s.cursor, 3);
    }

    #[test]
    fn delete_no_fim_nao_faz_nada() {
        let mut s = InputBoxState::open("p:", "ab", InputCallbackId::AddTag);
        s.move_end();
        s.delete();
        assert_eq!(s.value, "ab");
        s.move_home();
        s.delete();
        assert_eq!(s.value, "b");
    }
}
