//! Transcription endpoint wrapper and response-shape normalization.
//!
//! The backend has shipped two response shapes for `/api/transcrever`: a
//! JSON envelope with a preview excerpt and the document base64-encoded, and
//! the bare document bytes with no metadata. Both must be accepted; anything
//! that does not parse as the envelope is taken as the document itself.

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;

use crate::form::{Metadata, SubmissionDraft};

/// Preview shown when the backend returned the bare document.
pub const NO_PREVIEW_PLACEHOLDER: &str =
    "O documento foi gerado sem prévia de texto. Baixe o arquivo para ver o conteúdo completo.";

/// Generated document plus display metadata, held in memory after success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptionResult {
    /// The generated DOCX bytes.
    pub document: Vec<u8>,
    /// Human-readable excerpt, or the fixed placeholder.
    pub preview_text: String,
    /// Backend-suggested file name; derived at download time when absent.
    pub file_name: Option<String>,
}

/// JSON envelope produced by newer backend revisions.
#[derive(Debug, Deserialize)]
struct StructuredBody {
    preview_text: String,
    file_base64: String,
    file_name: String,
}

/// The two accepted response shapes, decoded at the boundary.
#[derive(Debug)]
enum TranscribeResponse {
    Structured {
        preview_text: String,
        document: Vec<u8>,
        file_name: String,
    },
    Raw(Vec<u8>),
}

/// Classify a success body into one of the two shapes. A body that is not
/// the JSON envelope, or whose base64 payload does not decode, degrades to
/// the raw shape instead of failing.
fn classify_body(body: &[u8]) -> TranscribeResponse {
    match serde_json::from_slice::<StructuredBody>(body) {
        Ok(envelope) => match STANDARD.decode(envelope.file_base64.as_bytes()) {
            Ok(document) => TranscribeResponse::Structured {
                preview_text: envelope.preview_text,
                document,
                file_name: envelope.file_name,
            },
            Err(_) => TranscribeResponse::Raw(body.to_vec()),
        },
        Err(_) => TranscribeResponse::Raw(body.to_vec()),
    }
}

/// Normalize a success body into the in-memory result.
pub fn interpret_body(body: &[u8]) -> TranscriptionResult {
    match classify_body(body) {
        TranscribeResponse::Structured {
            preview_text,
            document,
            file_name,
        } => TranscriptionResult {
            document,
            preview_text,
            file_name: Some(file_name),
        },
        TranscribeResponse::Raw(document) => TranscriptionResult {
            document,
            preview_text: NO_PREVIEW_PLACEHOLDER.into(),
            file_name: None,
        },
    }
}

/// Everything one submission attempt needs, captured from the draft at
/// start so later edits to the form cannot leak into an in-flight request.
#[derive(Clone, Debug)]
pub struct TranscribePayload {
    pub metadata: Metadata,
    pub tags_joined: String,
    pub file_path: PathBuf,
    pub file_name: String,
}

impl TranscribePayload {
    /// Snapshot the draft. `None` when no file is attached.
    pub fn from_draft(draft: &SubmissionDraft) -> Option<Self> {
        let file = draft.file.as_ref()?;
        Some(Self {
            metadata: draft.metadata.clone(),
            tags_joined: draft.tags.joined(),
            file_path: file.path.clone(),
            file_name: file.name.clone(),
        })
    }
}

/// Submit one transcription request: the binary file plus one text part per
/// metadata field, tags joined into a single part. Transcription can take
/// many minutes, so the per-request timeout is far above the client default.
pub async fn submit(
    http: &Client,
    base_url: &str,
    payload: &TranscribePayload,
    file_bytes: Vec<u8>,
    timeout_secs: u64,
) -> Result<TranscriptionResult> {
    let m = &payload.metadata;
    let form = Form::new()
        .part(
            "file",
            Part::bytes(file_bytes)
                .file_name(payload.file_name.clone())
                .mime_str("application/octet-stream")?,
        )
        .text("projeto", m.projeto.clone())
        .text("coordenador", m.coordenador.clone())
        .text("data", m.data.clone())
        .text("local", m.local.clone())
        .text("formato", m.formato.as_str().to_string())
        .text("entrevistadores", m.entrevistadores.clone())
        .text("outros", m.outros.clone())
        .text("duracao", m.duracao.clone())
        .text("docs_coletados", m.docs_coletados.clone())
        .text("docs_reproduzidos", m.docs_reproduzidos.clone())
        .text("obs", m.obs.clone())
        .text("entrevistado", m.entrevistado.clone())
        .text("resumo", m.resumo.clone())
        .text("tags", payload.tags_joined.clone());

    let url = super::endpoint(base_url, "/api/transcrever");
    let resp = http
        .post(url)
        .multipart(form)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await?;
    let resp = super::ensure_success(resp).await?;
    let body = resp.bytes().await?;
    Ok(interpret_body(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_envelope_is_decoded() {
        let body = br#"{"preview_text":"Hello","file_base64":"SGVsbG8=","file_name":"x.docx"}"#;
        let result = interpret_body(body);
        assert_eq!(result.preview_text, "Hello");
        assert_eq!(result.document, b"Hello");
        assert_eq!(result.file_name.as_deref(), Some("x.docx"));
    }

    #[test]
    fn raw_body_is_kept_verbatim_with_placeholder_preview() {
        // DOCX files start with the zip magic; definitely not JSON.
        let body = [0x50, 0x4b, 0x03, 0x04, 0x00, 0xff, 0x10];
        let result = interpret_body(&body);
        assert_eq!(result.document, body);
        assert_eq!(result.preview_text, NO_PREVIEW_PLACEHOLDER);
        assert_eq!(result.file_name, None);
    }

    #[test]
    fn json_without_expected_fields_degrades_to_raw() {
        let body = br#"{"detail":"algo inesperado"}"#;
        let result = interpret_body(body);
        assert_eq!(result.document, body.to_vec());
        assert_eq!(result.preview_text, NO_PREVIEW_PLACEHOLDER);
    }

    #[test]
    fn undecodable_base64_degrades_to_raw() {
        let body = br#"{"preview_text":"p","file_base64":"not base64!!","file_name":"x.docx"}"#;
        let result = interpret_body(body);
        assert_eq!(result.document, body.to_vec());
        assert_eq!(result.file_name, None);
    }

    #[test]
    fn payload_snapshot_joins_tags_for_transport() {
        let mut draft = SubmissionDraft::default();
        draft.metadata.entrevistado = "Maria".into();
        draft.tags.add("memória");
        draft.tags.add("bairro");
        draft.file = Some(crate::form::AttachedFile {
            path: "a.mp3".into(),
            name: "a.mp3".into(),
            size_bytes: 10,
        });
        let payload = TranscribePayload::from_draft(&draft).unwrap();
        assert_eq!(payload.tags_joined, "memória, bairro");
        assert_eq!(payload.file_name, "a.mp3");
    }

    #[test]
    fn payload_requires_an_attached_file() {
        let draft = SubmissionDraft::default();
        assert!(TranscribePayload::from_draft(&draft).is_none());
    }
}
