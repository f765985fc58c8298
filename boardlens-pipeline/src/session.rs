use crate::traits::ClientError;
use boardlens_core::{PositionAnalysis, SessionId, SideToMove};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Detecting,
    DetectionFailed,
    AwaitingConfirmation,
    // Passed through synchronously while the notation is checked on apply.
    Validating,
    Analyzing,
    AnalysisFailed,
    Ready,
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotStarted,
    InFlight,
    Succeeded,
    Failed,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Detection,
    Analysis,
}

/// User-visible error attached to the session. Stale completions are not
/// errors; they are discarded without touching this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError {
            kind: ErrorKind::Validation,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn detection(err: &ClientError) -> Self {
        SessionError {
            kind: ErrorKind::Detection,
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }

    pub fn analysis(err: &ClientError) -> Self {
        SessionError {
            kind: ErrorKind::Analysis,
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Immutable view of the session published after every transition.
/// Consumers read it; only the controller writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub phase: SessionPhase,

    /// Current best-known notation, seeded with the starting position.
    pub fen: String,
    pub fen_confirmed: bool,
    pub fen_valid: bool,
    pub side_to_move: SideToMove,
    pub has_image: bool,

    pub detection: StageStatus,
    pub analysis: StageStatus,

    /// Set only while the analysis stage is Succeeded for the current
    /// notation; surviving results stay visible across failed re-runs.
    pub analysis_result: Option<PositionAnalysis>,

    /// Non-fatal, e.g. a well-formed but illegal placement.
    pub warning: Option<String>,
    pub last_error: Option<SessionError>,
}

pub fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Idle => "idle",
        SessionPhase::Detecting => "detecting",
        SessionPhase::DetectionFailed => "detection failed",
        SessionPhase::AwaitingConfirmation => "awaiting confirmation",
        SessionPhase::Validating => "validating",
        SessionPhase::Analyzing => "analyzing",
        SessionPhase::AnalysisFailed => "analysis failed",
        SessionPhase::Ready => "ready",
    }
}
