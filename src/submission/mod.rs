//! Submission lifecycle for one upload → transcribe → retrieve cycle.
//!
//! The controller is a small state machine (`Idle → Submitting →
//! {Succeeded, Failed} → Idle`) mutated only from the UI loop: timer ticks,
//! worker responses and key handlers all arrive as discrete events. The
//! network request itself cannot be cancelled, so every attempt carries a
//! generation number and events stamped with an old generation are dropped.

pub mod progress;
pub mod ticker;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use thiserror::Error;

use crate::{api::transcribe::TranscriptionResult, form::SubmissionDraft};
use progress::ProgressEstimate;
use ticker::Ticker;

/// Lifecycle phase of the single in-flight workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Local validation failures, caught before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("anexe um arquivo de áudio ou vídeo antes de enviar")]
    MissingFile,
    #[error("preencha o nome do(a) entrevistado(a)")]
    MissingInterviewee,
}

/// Owns the state of at most one transcription workflow at a time.
#[derive(Debug, Default)]
pub struct SubmissionController {
    phase: Phase,
    generation: u64,
    progress: Option<ProgressEstimate>,
    result: Option<TranscriptionResult>,
    last_error: Option<String>,
    ticker: Option<Ticker>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Simulated percent, 0 when no attempt is active.
    pub fn percent(&self) -> f64 {
        self.progress.as_ref().map_or(0.0, ProgressEstimate::percent)
    }

    /// Advisory countdown in seconds, 0 when no attempt is active.
    pub fn remaining_secs(&self) -> u64 {
        self.progress
            .as_ref()
            .map_or(0, ProgressEstimate::remaining_secs)
    }

    pub fn progress(&self) -> Option<&ProgressEstimate> {
        self.progress.as_ref()
    }

    pub fn result(&self) -> Option<&TranscriptionResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate the draft and enter `Submitting`. Returns the generation the
    /// caller must stamp on the outbound request and on the ticker, or
    /// `None` when an attempt is already in flight — starting again is a
    /// no-op, never queued.
    pub fn begin(&mut self, draft: &SubmissionDraft) -> Result<Option<u64>, ValidationError> {
        if self.phase == Phase::Submitting {
            return Ok(None);
        }
        let file = draft.file.as_ref().ok_or(ValidationError::MissingFile)?;
        if draft.metadata.entrevistado.trim().is_empty() {
            return Err(ValidationError::MissingInterviewee);
        }

        self.generation += 1;
        self.phase = Phase::Submitting;
        self.progress = Some(ProgressEstimate::for_file_size(file.size_bytes));
        self.result = None;
        self.last_error = None;
        Ok(Some(self.generation))
    }

    /// Hand over the spawned tick task for the current attempt.
    pub fn attach_ticker(&mut self, ticker: Ticker) {
        self.ticker = Some(ticker);
    }

    /// Advance the ramp by one tick. Ticks from an older attempt, or ticks
    /// arriving after a terminal transition, mutate nothing.
    pub fn on_tick(&mut self, generation: u64) {
        if generation != self.generation || self.phase != Phase::Submitting {
            return;
        }
        if let Some(p) = &mut self.progress {
            p.advance_tick();
        }
    }

    /// Settle the attempt as succeeded. Stale responses (generation mismatch
    /// after a reset, or a phase that already moved on) are ignored; the
    /// return value says whether the event was applied.
    pub fn on_success(&mut self, generation: u64, result: TranscriptionResult) -> bool {
        if generation != self.generation || self.phase != Phase::Submitting {
            return false;
        }
        self.stop_ticker();
        if let Some(p) = &mut self.progress {
            p.complete();
        }
        self.result = Some(result);
        self.phase = Phase::Succeeded;
        true
    }

    /// Settle the attempt as failed: the bar drops back to zero and no retry
    /// is attempted. Stale responses are ignored.
    pub fn on_failure(&mut self, generation: u64, message: String) -> bool {
        if generation != self.generation || self.phase != Phase::Submitting {
            return false;
        }
        self.stop_ticker();
        self.progress = None;
        self.last_error = Some(message);
        self.phase = Phase::Failed;
        true
    }

    /// Write the generated document into `dir`, using the backend-provided
    /// name or one derived from the interviewee. Valid only in `Succeeded`;
    /// idempotent and transition-free.
    pub fn download(&self, dir: &Path, interviewee: &str) -> Result<PathBuf> {
        let Some(result) = (self.phase == Phase::Succeeded)
            .then_some(self.result.as_ref())
            .flatten()
        else {
            bail!("nenhum documento disponível para baixar");
        };
        let name = result
            .file_name
            .clone()
            .unwrap_or_else(|| default_document_name(interviewee));
        let path = dir.join(name);
        fs::write(&path, &result.document)
            .with_context(|| format!("falha ao gravar {}", path.display()))?;
        Ok(path)
    }

    /// Abandon whatever is going on and return to `Idle`. The in-flight
    /// request (if any) is not cancelled at the transport level; bumping the
    /// generation makes its eventual response stale instead.
    pub fn reset(&mut self) {
        self.stop_ticker();
        self.generation += 1;
        self.phase = Phase::Idle;
        self.progress = None;
        self.result = None;
        self.last_error = None;
    }

    fn stop_ticker(&mut self) {
        // Dropping the handle aborts the task.
        self.ticker = None;
    }
}

/// Fallback document name when the backend does not supply one:
/// `Transcricao_<interviewee with whitespace collapsed to underscores>.docx`.
pub fn default_document_name(interviewee: &str) -> String {
    let safe = interviewee.split_whitespace().collect::<Vec<_>>().join("_");
    format!("Transcricao_{safe}.docx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::AttachedFile;

    fn draft_with_file(size_bytes: u64) -> SubmissionDraft {
        let mut draft = SubmissionDraft::default();
        draft.metadata.entrevistado = "Maria da Silva".into();
        draft.file = Some(AttachedFile {
            path: "entrevista.mp3".into(),
            name: "entrevista.mp3".into(),
            size_bytes,
        });
        draft
    }

    fn ok_result() -> TranscriptionResult {
        TranscriptionResult {
            document: b"doc".to_vec(),
            preview_text: "texto".into(),
            file_name: Some("x.docx".into()),
        }
    }

    #[test]
    fn begin_without_file_is_rejected_before_any_network_call() {
        let mut c = SubmissionController::new();
        let mut draft = SubmissionDraft::default();
        draft.metadata.entrevistado = "Maria".into();
        assert_eq!(c.begin(&draft), Err(ValidationError::MissingFile));
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.percent(), 0.0);
    }

    #[test]
    fn begin_without_interviewee_is_rejected() {
        let mut c = SubmissionController::new();
        let mut draft = draft_with_file(1024);
        draft.metadata.entrevistado = "   ".into();
        assert_eq!(c.begin(&draft), Err(ValidationError::MissingInterviewee));
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn begin_while_submitting_is_a_noop() {
        let mut c = SubmissionController::new();
        let draft = draft_with_file(1024);
        let generation = c.begin(&draft).unwrap().unwrap();
        assert_eq!(c.begin(&draft).unwrap(), None);
        // The original attempt is untouched.
        assert!(c.is_submitting());
        c.on_success(generation, ok_result());
        assert_eq!(c.phase(), Phase::Succeeded);
    }

    #[test]
    fn percent_never_exceeds_ceiling_while_submitting() {
        let mut c = SubmissionController::new();
        let generation = c.begin(&draft_with_file(2 * 1024 * 1024)).unwrap().unwrap();
        let mut last = c.percent();
        for _ in 0..500 {
            c.on_tick(generation);
            assert!(c.percent() >= last);
            assert!(c.percent() <= 95.0);
            last = c.percent();
        }
        c.on_success(generation, ok_result());
        assert_eq!(c.percent(), 100.0);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn failure_zeroes_progress_and_allows_retry() {
        let mut c = SubmissionController::new();
        let generation = c.begin(&draft_with_file(1024)).unwrap().unwrap();
        c.on_tick(generation);
        c.on_failure(generation, "erro de rede".into());
        assert_eq!(c.phase(), Phase::Failed);
        assert_eq!(c.percent(), 0.0);
        assert_eq!(c.remaining_secs(), 0);
        assert_eq!(c.last_error(), Some("erro de rede"));
        // A fresh begin is available without an explicit reset.
        assert!(c.begin(&draft_with_file(1024)).unwrap().is_some());
    }

    #[test]
    fn stale_response_after_reset_is_discarded() {
        let mut c = SubmissionController::new();
        let generation = c.begin(&draft_with_file(1024)).unwrap().unwrap();
        c.reset();
        assert_eq!(c.phase(), Phase::Idle);

        // The abandoned request finally settles; nothing may change.
        assert!(!c.on_success(generation, ok_result()));
        assert!(!c.on_failure(generation, "tarde demais".into()));
        c.on_tick(generation);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.result().is_none());
        assert!(c.last_error().is_none());
        assert_eq!(c.percent(), 0.0);
    }

    #[test]
    fn stale_response_does_not_touch_a_newer_attempt() {
        let mut c = SubmissionController::new();
        let old = c.begin(&draft_with_file(1024)).unwrap().unwrap();
        c.reset();
        let new = c.begin(&draft_with_file(1024)).unwrap().unwrap();
        assert_ne!(old, new);

        assert!(!c.on_failure(old, "resposta antiga".into()));
        assert!(c.is_submitting());
        assert!(c.on_success(new, ok_result()));
        assert_eq!(c.phase(), Phase::Succeeded);
    }

    #[test]
    fn download_writes_document_and_is_idempotent() {
        let mut c = SubmissionController::new();
        let generation = c.begin(&draft_with_file(1024)).unwrap().unwrap();
        c.on_success(
            generation,
            TranscriptionResult {
                document: b"conteudo".to_vec(),
                preview_text: "p".into(),
                file_name: None,
            },
        );

        let dir = std::env::temp_dir();
        let first = c.download(&dir, "Maria da Silva").unwrap();
        let second = c.download(&dir, "Maria da Silva").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.file_name().unwrap(), "Transcricao_Maria_da_Silva.docx");
        assert_eq!(fs::read(&first).unwrap(), b"conteudo");
        assert_eq!(c.phase(), Phase::Succeeded);
        let _ = fs::remove_file(first);
    }

    #[test]
    fn download_outside_succeeded_is_an_error() {
        let c = SubmissionController::new();
        assert!(c.download(Path::new("."), "Maria").is_err());
    }

    #[test]
    fn default_name_collapses_whitespace_runs() {
        assert_eq!(
            default_document_name("João  Pereira da Costa"),
            "Transcricao_João_Pereira_da_Costa.docx"
        );
    }
}
