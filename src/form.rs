//! Modelo do formulário de transcrição: metadados, tags e arquivo anexado.

use std::path::PathBuf;

/// Formato de gravação da entrevista.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordingFormat {
    /// Gravação somente em áudio.
    #[default]
    Audio,
    /// Gravação em vídeo.
    Video,
}

impl RecordingFormat {
    /// Alterna entre os dois formatos.
    pub fn toggle(self) -> Self {
        match self {
            RecordingFormat::Audio => RecordingFormat::Video,
            RecordingFormat::Video => RecordingFormat::Audio,
        }
    }

    /// Rótulo enviado ao backend (mesmo valor do formulário web original).
    pub fn as_str(self) -> &'static str {
        match self {
            RecordingFormat::Audio => "Áudio",
            RecordingFormat::Video => "Vídeo",
        }
    }
}

/// Campos descritivos enviados junto com o arquivo.
#[derive(Clone, Debug)]
pub struct Metadata {
    /// Título do projeto.
    pub projeto: String,
    /// Coordenador(es) do projeto.
    pub coordenador: String,
    /// Data da entrevista (ISO: YYYY-MM-DD).
    pub data: String,
    /// Local da entrevista.
    pub local: String,
    /// Formato de gravação.
    pub formato: RecordingFormat,
    /// Entrevistador(es).
    pub entrevistadores: String,
    /// Entrevistado(a) — obrigatório para submeter.
    pub entrevistado: String,
    /// Outros participantes, se houver.
    pub outros: String,
    /// Duração estimada da gravação (ex: 01:30:00).
    pub duracao: String,
    /// Documentos coletados durante a entrevista.
    pub docs_coletados: String,
    /// Documentos reproduzidos durante a entrevista.
    pub docs_reproduzidos: String,
    /// Observações livres.
    pub obs: String,
    /// Resumo temático do conteúdo.
    pub resumo: String,
}

/// Quantidade de campos editáveis do formulário.
pub const FIELD_COUNT: usize = 13;

impl Default for Metadata {
    /// Campos vazios, com a data preenchida com o dia atual.
    fn default() -> Self {
        Self {
            projeto: String::new(),
            coordenador: String::new(),
            data: chrono::Local::now().format("%Y-%m-%d").to_string(),
            local: String::new(),
            formato: RecordingFormat::default(),
            entrevistadores: String::new(),
            entrevistado: String::new(),
            outros: String::new(),
            duracao: String::new(),
            docs_coletados: String::new(),
            docs_reproduzidos: String::new(),
            obs: String::new(),
            resumo: String::new(),
        }
    }
}

impl Metadata {
    /// Rótulo exibido para o campo de índice `idx`.
    pub fn field_label(idx: usize) -> &'static str {
        match idx {
            0 => "Título do Projeto",
            1 => "Coordenador(es)",
            2 => "Data da Entrevista",
            3 => "Local",
            4 => "Formato de Gravação",
            5 => "Entrevistador(es)",
            6 => "Entrevistado(a) *",
            7 => "Outros Participantes",
            8 => "Duração Estimada",
            9 => "Docs Coletados",
            10 => "Docs Reproduzidos",
            11 => "Observações",
            12 => "Resumo Temático",
            _ => "",
        }
    }

    /// Valor atual do campo de índice `idx`.
    pub fn field_value(&self, idx: usize) -> String {
        match idx {
            0 => self.projeto.clone(),
            1 => self.coordenador.clone(),
            2 => self.data.clone(),
            3 => self.local.clone(),
            4 => self.formato.as_str().to_string(),
            5 => self.entrevistadores.clone(),
            6 => self.entrevistado.clone(),
            7 => self.outros.clone(),
            8 => self.duracao.clone(),
            9 => self.docs_coletados.clone(),
            10 => self.docs_reproduzidos.clone(),
            11 => self.obs.clone(),
            12 => self.resumo.clone(),
            _ => String::new(),
        }
    }

    /// Atualiza o campo de índice `idx`. O formato é alternado pelos
    /// handlers diretamente, então aqui ele é ignorado.
    pub fn set_field(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.projeto = value,
            1 => self.coordenador = value,
            2 => self.data = value,
            3 => self.local = value,
            5 => self.entrevistadores = value,
            6 => self.entrevistado = value,
            7 => self.outros = value,
            8 => self.duracao = value,
            9 => self.docs_coletados = value,
            10 => self.docs_reproduzidos = value,
            11 => self.obs = value,
            12 => self.resumo = value,
            _ => {}
        }
    }

    /// O campo de índice `idx` é o formato de gravação?
    pub fn is_format_field(idx: usize) -> bool {
        idx == 4
    }
}

/// Lista de tags na ordem de inserção, sem duplicatas.
#[derive(Clone, Debug, Default)]
pub struct TagList {
    items: Vec<String>,
}

impl TagList {
    /// Insere uma tag. Entradas vazias (ou só espaços) e duplicatas
    /// exatas são ignoradas. Retorna true se a tag foi adicionada.
    pub fn add(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.items.iter().any(|t| t == tag) {
            return false;
        }
        self.items.push(tag.to_string());
        true
    }

    /// Remove e retorna a última tag inserida.
    pub fn remove_last(&mut self) -> Option<String> {
        self.items.pop()
    }

    /// Tags na ordem de inserção.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Junta as tags em uma única string para transporte.
    pub fn joined(&self) -> String {
        self.items.join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Arquivo de áudio/vídeo anexado ao formulário.
#[derive(Clone, Debug)]
pub struct AttachedFile {
    /// Caminho local do arquivo.
    pub path: PathBuf,
    /// Nome exibido e enviado no multipart.
    pub name: String,
    /// Tamanho em bytes (usado pela estimativa de progresso).
    pub size_bytes: u64,
}

/// Rascunho completo de uma submissão.
#[derive(Clone, Debug, Default)]
pub struct SubmissionDraft {
    /// Metadados descritivos.
    pub metadata: Metadata,
    /// Tags livres.
    pub tags: TagList,
    /// Arquivo anexado (obrigatório para submeter).
    pub file: Option<AttachedFile>,
}

impl SubmissionDraft {
    /// Volta o rascunho aos valores padrão.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_duplicada_e_ignorada() {
        let mut tags = TagList::default();
        assert!(tags.add("x"));
        assert!(!tags.add("x"));
        assert_eq!(tags.items(), ["x"]);
    }

    #[test]
    fn tag_em_branco_e_ignorada() {
        let mut tags = TagList::default();
        assert!(!tags.add("  "));
        assert!(tags.is_empty());
    }

    #[test]
    fn tags_preservam_ordem_de_insercao() {
        let mut tags = TagList::default();
        tags.add("memória");
        tags.add("bairro");
        tags.add(" memória ");
        assert_eq!(tags.joined(), "memória, bairro");
    }

    #[test]
    fn dedup_diferencia_maiusculas() {
        let mut tags = TagList::default();
        tags.add("Cidade");
        assert!(tags.add("cidade"));
        assert_eq!(tags.items().len(), 2);
    }

    #[test]
    fn formato_alterna_entre_audio_e_video() {
        assert_eq!(RecordingFormat::Audio.toggle(), RecordingFormat::Video);
        assert_eq!(RecordingFormat::Video.toggle().as_str(), "Áudio");
    }
}
