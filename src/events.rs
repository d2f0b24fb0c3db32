//! Estado de UI compartilhado e telas da aplicação.

/// Tela atualmente exibida.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Tela de login (sem sessão ativa).
    Login,
    /// Formulário de transcrição (tela principal).
    Transcription,
    /// Gestão de usuários (somente admin).
    Users,
}

/// Estado compartilhado com a renderização.
#[derive(Clone, Debug)]
pub struct UiState {
    /// Tela atual.
    pub screen: Screen,
    /// Campo selecionado no formulário de metadados.
    pub selected_field: usize,
    /// Linha selecionada na lista de usuários.
    pub selected_user: usize,
    /// Log exibido no painel lateral.
    pub log: Vec<String>,
    /// Mensagem da barra de status.
    pub status: String,
    /// Erro em destaque (limpo na próxima ação).
    pub error: Option<String>,
    /// Popup de prévia da transcrição aberto.
    pub show_preview: bool,
}

impl UiState {
    /// Estado inicial para a tela informada.
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            selected_field: 0,
            selected_user: 0,
            log: vec![],
            status: "Pronto".into(),
            error: None,
            show_preview: false,
        }
    }

    /// Registra uma mensagem no log lateral, mantendo-o curto.
    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.log.push(msg.into());
        if self.log.len() > 50 {
            self.log.remove(0);
        }
    }
}
