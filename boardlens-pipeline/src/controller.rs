use std::sync::Arc;

use boardlens_core::{DetectedPosition, Fen, PositionAnalysis, SessionId, SideToMove};
use tokio::sync::{Mutex, watch};

use crate::session::{SessionError, SessionPhase, SessionSnapshot, StageStatus};
use crate::traits::{AnalysisClient, ClientError, DetectionClient, ImageInput};

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub analysis_depth: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig { analysis_depth: 12 }
    }
}

struct Inner {
    id: SessionId,
    phase: SessionPhase,
    fen: String,
    fen_confirmed: bool,
    fen_valid: bool,
    side_to_move: SideToMove,
    image: Option<ImageInput>,
    detection: StageStatus,
    analysis: StageStatus,

    // Bumped whenever a stage request is issued; completions carrying an
    // older value are dropped. This, not transport cancellation, is what
    // keeps superseded requests from corrupting the session.
    detection_epoch: u64,
    analysis_epoch: u64,

    analysis_result: Option<PositionAnalysis>,
    warning: Option<String>,
    last_error: Option<SessionError>,
}

/// Owns one acquisition session: photo in, analyzed position out.
///
/// All mutation goes through event methods; consumers observe via
/// [`PositionController::snapshot`] or [`PositionController::subscribe`].
/// Each event method returns the snapshot it published so callers can
/// react without racing the watch channel.
#[derive(Clone)]
pub struct PositionController {
    inner: Arc<Mutex<Inner>>,
    detection: Arc<dyn DetectionClient>,
    analysis: Arc<dyn AnalysisClient>,
    cfg: ControllerConfig,
    publisher: Arc<watch::Sender<SessionSnapshot>>,
}

impl PositionController {
    pub fn new(
        detection: Arc<dyn DetectionClient>,
        analysis: Arc<dyn AnalysisClient>,
        cfg: ControllerConfig,
    ) -> Self {
        let inner = Inner {
            id: SessionId::new(),
            phase: SessionPhase::Idle,
            fen: Fen::STARTPOS.to_string(),
            fen_confirmed: false,
            fen_valid: true,
            side_to_move: SideToMove::White,
            image: None,
            detection: StageStatus::NotStarted,
            analysis: StageStatus::NotStarted,
            detection_epoch: 0,
            analysis_epoch: 0,
            analysis_result: None,
            warning: None,
            last_error: None,
        };

        let (publisher, _) = watch::channel(Self::snapshot_of(&inner));

        PositionController {
            inner: Arc::new(Mutex::new(inner)),
            detection,
            analysis,
            cfg,
            publisher: Arc::new(publisher),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.publisher.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    /// Kicks off detection for a captured photograph. Only valid from Idle;
    /// anything else is already mid-flow and the call is ignored.
    pub async fn start_with_image(
        &self,
        image: ImageInput,
        side_to_move: SideToMove,
    ) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        if inner.phase != SessionPhase::Idle {
            log::debug!("start_with_image ignored in phase {:?}", inner.phase);
            return Self::snapshot_of(&inner);
        }

        inner.detection_epoch = inner.detection_epoch.wrapping_add(1);
        let epoch = inner.detection_epoch;

        inner.side_to_move = side_to_move;
        inner.image = Some(image.clone());
        inner.detection = StageStatus::InFlight;
        inner.last_error = None;
        inner.warning = None;
        Self::transition(&mut inner, SessionPhase::Detecting);

        let snap = self.publish(&inner);
        drop(inner);

        self.spawn_detection(epoch, image, side_to_move);
        snap
    }

    /// Detection completion event. Dropped unless the session is still
    /// waiting on this exact request.
    pub async fn apply_detection(
        &self,
        epoch: u64,
        outcome: Result<DetectedPosition, ClientError>,
    ) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        if inner.phase != SessionPhase::Detecting || epoch != inner.detection_epoch {
            log::debug!(
                "stale detection completion dropped (epoch {epoch}, current {})",
                inner.detection_epoch
            );
            return Self::snapshot_of(&inner);
        }

        match outcome {
            Ok(pos) => {
                Self::set_fen(&mut inner, &pos.fen);
                inner.fen_confirmed = false;
                inner.detection = StageStatus::Succeeded;
                if !pos.is_legal {
                    inner.warning = Some(
                        "detected position looks illegal; check the board before analyzing".into(),
                    );
                }
                Self::transition(&mut inner, SessionPhase::AwaitingConfirmation);
            }
            Err(err) => {
                log::warn!("detection failed: {err}");
                inner.detection = StageStatus::Failed;
                inner.last_error = Some(SessionError::detection(&err));
                Self::transition(&mut inner, SessionPhase::DetectionFailed);
            }
        }

        self.publish(&inner)
    }

    /// User typed or corrected the notation. Valid from any phase; an edit
    /// always supersedes whatever was happening, including in-flight work
    /// whose completions will then miss the phase check.
    pub async fn edit_fen(&self, text: &str) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        Self::set_fen(&mut inner, text);
        inner.fen_confirmed = false;
        inner.analysis_result = None;
        inner.warning = None;
        inner.analysis = StageStatus::NotStarted;
        if inner.detection == StageStatus::InFlight {
            inner.detection = StageStatus::NotStarted;
        }
        Self::transition(&mut inner, SessionPhase::AwaitingConfirmation);

        self.publish(&inner)
    }

    /// User accepted the current notation. Validates it, then hands it to
    /// the analysis stage. A second apply while analysis is running is a
    /// no-op; the phase gate is what makes analysis single-flight.
    pub async fn apply_fen(&self) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        if inner.phase != SessionPhase::AwaitingConfirmation {
            log::debug!("apply_fen ignored in phase {:?}", inner.phase);
            return Self::snapshot_of(&inner);
        }

        inner.last_error = None;
        Self::transition(&mut inner, SessionPhase::Validating);
        self.publish(&inner);

        let parsed = match Fen::parse(&inner.fen) {
            Ok(parsed) => parsed,
            Err(err) => {
                inner.fen_valid = false;
                inner.last_error = Some(SessionError::validation(err.to_string()));
                Self::transition(&mut inner, SessionPhase::AwaitingConfirmation);
                return self.publish(&inner);
            }
        };

        inner.fen_valid = true;
        inner.side_to_move = parsed.side_to_move;

        // Well-formed but structurally illegal does not block analysis.
        if let Some(issue) = parsed.legality_issues().first() {
            inner.warning = Some(issue.to_string());
        }

        inner.fen_confirmed = true;
        inner.analysis_epoch = inner.analysis_epoch.wrapping_add(1);
        let epoch = inner.analysis_epoch;
        let fen = inner.fen.clone();
        inner.analysis = StageStatus::InFlight;
        Self::transition(&mut inner, SessionPhase::Analyzing);

        let snap = self.publish(&inner);
        drop(inner);

        self.spawn_analysis(epoch, fen);
        snap
    }

    /// Analysis completion event, same staleness discipline as detection.
    pub async fn apply_analysis(
        &self,
        epoch: u64,
        outcome: Result<PositionAnalysis, ClientError>,
    ) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        if inner.phase != SessionPhase::Analyzing || epoch != inner.analysis_epoch {
            log::debug!(
                "stale analysis completion dropped (epoch {epoch}, current {})",
                inner.analysis_epoch
            );
            return Self::snapshot_of(&inner);
        }

        match outcome {
            Ok(result) => {
                inner.analysis = StageStatus::Succeeded;
                inner.analysis_result = Some(result);
                Self::transition(&mut inner, SessionPhase::Ready);
            }
            Err(err) => {
                log::warn!("analysis failed: {err}");
                inner.analysis = StageStatus::Failed;
                inner.last_error = Some(SessionError::analysis(&err));
                // Any earlier result stays visible; the notation is kept so
                // retry does not need re-detection.
                Self::transition(&mut inner, SessionPhase::AnalysisFailed);
            }
        }

        self.publish(&inner)
    }

    /// Re-issues the failed stage's request with a fresh epoch and the
    /// same inputs. Only meaningful from a failed state.
    pub async fn retry(&self) -> SessionSnapshot {
        let mut inner = self.inner.lock().await;

        match inner.phase {
            SessionPhase::DetectionFailed => {
                let Some(image) = inner.image.clone() else {
                    log::debug!("retry ignored: no image to re-detect");
                    return Self::snapshot_of(&inner);
                };

                inner.detection_epoch = inner.detection_epoch.wrapping_add(1);
                let epoch = inner.detection_epoch;
                let side_to_move = inner.side_to_move;

                inner.detection = StageStatus::InFlight;
                inner.last_error = None;
                Self::transition(&mut inner, SessionPhase::Detecting);

                let snap = self.publish(&inner);
                drop(inner);

                self.spawn_detection(epoch, image, side_to_move);
                snap
            }
            SessionPhase::AnalysisFailed => {
                inner.analysis_epoch = inner.analysis_epoch.wrapping_add(1);
                let epoch = inner.analysis_epoch;
                let fen = inner.fen.clone();

                inner.analysis = StageStatus::InFlight;
                inner.last_error = None;
                Self::transition(&mut inner, SessionPhase::Analyzing);

                let snap = self.publish(&inner);
                drop(inner);

                self.spawn_analysis(epoch, fen);
                snap
            }
            other => {
                log::debug!("retry ignored in phase {other:?}");
                Self::snapshot_of(&inner)
            }
        }
    }

    fn spawn_detection(&self, epoch: u64, image: ImageInput, side_to_move: SideToMove) {
        let controller = self.clone();
        tokio::spawn(async move {
            let outcome = controller.detection.detect(&image, side_to_move).await;
            controller.apply_detection(epoch, outcome).await;
        });
    }

    fn spawn_analysis(&self, epoch: u64, fen: String) {
        let controller = self.clone();
        let depth = self.cfg.analysis_depth;
        tokio::spawn(async move {
            let outcome = controller.analysis.analyze(&fen, depth).await;
            controller.apply_analysis(epoch, outcome).await;
        });
    }

    fn transition(inner: &mut Inner, next: SessionPhase) {
        if inner.phase != next {
            log::info!("session phase: {:?} -> {:?}", inner.phase, next);
            inner.phase = next;
        }
    }

    fn set_fen(inner: &mut Inner, text: &str) {
        inner.fen = text.to_string();
        match Fen::parse(text) {
            Ok(parsed) => {
                inner.fen_valid = true;
                inner.side_to_move = parsed.side_to_move;
            }
            Err(_) => inner.fen_valid = false,
        }
    }

    fn snapshot_of(inner: &Inner) -> SessionSnapshot {
        SessionSnapshot {
            id: inner.id,
            phase: inner.phase,
            fen: inner.fen.clone(),
            fen_confirmed: inner.fen_confirmed,
            fen_valid: inner.fen_valid,
            side_to_move: inner.side_to_move,
            has_image: inner.image.is_some(),
            detection: inner.detection,
            analysis: inner.analysis,
            analysis_result: inner.analysis_result.clone(),
            warning: inner.warning.clone(),
            last_error: inner.last_error.clone(),
        }
    }

    fn publish(&self, inner: &Inner) -> SessionSnapshot {
        let snap = Self::snapshot_of(inner);
        self.publisher.send_replace(snap.clone());
        snap
    }
}

// No unit tests here: the interesting behavior is event interleaving, which
// the integration tests drive end to end with fake clients.
