use anyhow::Context;
use boardlens_core::{AnalysisDisplay, AppConfig, Fen, SideToMove, preset_by_name};
use boardlens_pipeline::{ImageInput, SessionPhase, SessionSnapshot, phase_label};
use boardlens_providers::lichess::{EXPLORER_BASE, analysis_board_url};
use boardlens_runtime::{ConfigStore, build_controller_from_config, opening_name, probe_services};
use std::time::Duration;
use tokio::sync::watch;

fn load_config() -> anyhow::Result<AppConfig> {
    if let Ok(path) = std::env::var("BOARDLENS_CONFIG") {
        return ConfigStore::at_path(path).load();
    }

    Ok(AppConfig {
        detection_endpoint: std::env::var("BOARDLENS_DETECTION_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8001".into()),
        analysis_endpoint: std::env::var("BOARDLENS_ANALYSIS_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8000".into()),
        analysis_backend: std::env::var("BOARDLENS_ANALYSIS_BACKEND")
            .unwrap_or_else(|_| "engine".into()),
        analysis_depth: env_number("BOARDLENS_ANALYSIS_DEPTH", 12),
        request_timeout_secs: env_number("BOARDLENS_REQUEST_TIMEOUT_SECS", 30),
    })
}

fn env_number<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

fn manual_fen() -> String {
    if let Ok(fen) = std::env::var("BOARDLENS_FEN") {
        return fen;
    }
    let preset =
        std::env::var("BOARDLENS_PRESET").unwrap_or_else(|_| "Starting Position".into());
    match preset_by_name(&preset) {
        Some(p) => p.fen.to_string(),
        None => Fen::STARTPOS.to_string(),
    }
}

fn side_from_env() -> SideToMove {
    match std::env::var("BOARDLENS_SIDE").as_deref() {
        Ok("black") | Ok("b") => SideToMove::Black,
        _ => SideToMove::White,
    }
}

async fn wait_for(
    updates: &mut watch::Receiver<SessionSnapshot>,
    targets: &[SessionPhase],
) -> anyhow::Result<SessionSnapshot> {
    loop {
        {
            let snap = updates.borrow_and_update();
            if targets.contains(&snap.phase) {
                return Ok(snap.clone());
            }
        }
        updates.changed().await?;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Smoke flow: drive one acquisition session against live services.
    // Pass a photo path as the first argument, or set BOARDLENS_FEN /
    // BOARDLENS_PRESET to skip detection and analyze a known position.

    let cfg = load_config()?;

    let health = probe_services(&cfg).await;
    if !health.detection {
        println!(
            "warning: detection service unreachable at {}",
            cfg.detection_endpoint
        );
    }
    if !health.analysis {
        println!(
            "warning: analysis service unreachable at {}",
            cfg.analysis_endpoint
        );
    }

    let controller = build_controller_from_config(&cfg)?;
    let mut updates = controller.subscribe();

    let snap = match std::env::args().nth(1) {
        Some(path) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("read photo {path}"))?;
            println!("detecting position from {path} ({} bytes)", bytes.len());
            controller
                .start_with_image(ImageInput { bytes }, side_from_env())
                .await;
            wait_for(
                &mut updates,
                &[
                    SessionPhase::AwaitingConfirmation,
                    SessionPhase::DetectionFailed,
                ],
            )
            .await?
        }
        None => {
            let fen = manual_fen();
            println!("analyzing position {fen}");
            controller.edit_fen(&fen).await
        }
    };

    if snap.phase == SessionPhase::DetectionFailed {
        let msg = snap
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown".into());
        anyhow::bail!("detection failed: {msg}");
    }

    if let Some(warning) = &snap.warning {
        println!("warning: {warning}");
    }
    println!("position={}", snap.fen);

    // Confirm as-is and hand the position to the analysis backend.
    let snap = controller.apply_fen().await;
    if snap.phase == SessionPhase::AwaitingConfirmation {
        let msg = snap
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown".into());
        anyhow::bail!("rejected notation: {msg}");
    }

    let snap = wait_for(
        &mut updates,
        &[SessionPhase::Ready, SessionPhase::AnalysisFailed],
    )
    .await?;
    println!("phase={}", phase_label(snap.phase));

    if snap.phase == SessionPhase::AnalysisFailed {
        let msg = snap
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown".into());
        anyhow::bail!("analysis failed: {msg}");
    }

    let analysis = snap
        .analysis_result
        .as_ref()
        .context("ready snapshot carried no analysis")?;
    let display = AnalysisDisplay::from_analysis(analysis);

    println!(
        "eval={} ({:.0}% for white)",
        display.evaluation_label, display.advantage_percent
    );
    if let Some(best) = &display.best_move {
        println!("best={best}");
    }
    if !display.highlight_squares.is_empty() {
        println!("highlight={}", display.highlight_squares.join(" "));
    }
    if let Some(line) = &display.line_preview {
        println!("line={line}");
    }
    if let Some(depth) = analysis.depth {
        println!("depth={depth}");
    }

    let timeout = Duration::from_secs(cfg.request_timeout_secs);
    if let Some(opening) = opening_name(EXPLORER_BASE, &snap.fen, timeout).await {
        println!("opening={opening}");
    }
    println!("board={}", analysis_board_url(&snap.fen));

    Ok(())
}
