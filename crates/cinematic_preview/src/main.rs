// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cinematic preview - plays a camera track headlessly.
//!
//! Usage: `cinematic_preview [settings.ron]`
//!
//! Runs the sequencer against a simulated frame loop and logs the camera
//! path and each waypoint arrival. Set `RUST_LOG` to change verbosity.

mod driver;
mod settings;

use cinematic_sequencer::{presets, CameraSequencer, SequencerError, Track, TrackError};
use settings::{PreviewSettings, SettingsError};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Error that aborts a preview run
#[derive(Debug, thiserror::Error)]
enum PreviewError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    #[error("Track has no waypoints to play")]
    NothingToPlay,
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cinematic_preview=info,cinematic_sequencer=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cinematic preview v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(std::env::args_os().nth(1).map(PathBuf::from)) {
        tracing::error!("Preview failed: {e}");
        std::process::exit(1);
    }
}

fn run(settings_path: Option<PathBuf>) -> Result<(), PreviewError> {
    let settings = match settings_path {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            PreviewSettings::load(&path)?
        }
        None => PreviewSettings::default(),
    };

    let track = match &settings.track {
        Some(path) => Track::load(path)?,
        None => presets::endgame_track(),
    };

    tracing::info!(
        "Track '{}': {} waypoints, {:.2}s of authored travel",
        track.name,
        track.len(),
        track.total_duration()
    );

    let mut sequencer = CameraSequencer::new(track, settings.sequencer)?;
    for index in 0..sequencer.waypoint_count() {
        let name = sequencer
            .track()
            .get(index)
            .map(|w| w.name.clone())
            .unwrap_or_default();
        sequencer.set_waypoint_callback(index, move |event| {
            let p = event.pose.position;
            tracing::info!(
                "Reached waypoint {} '{}' at ({:.3}, {:.3}, {:.3}){}",
                event.index,
                name,
                p.x,
                p.y,
                p.z,
                if event.is_last { " [last]" } else { "" }
            );
        });
    }

    if !sequencer.start(settings.start_pose()) {
        return Err(PreviewError::NothingToPlay);
    }

    let report = driver::drive(&mut sequencer, &settings);
    tracing::info!(
        "Preview {} after {} frames ({:.3}s simulated)",
        if report.finished { "finished" } else { "cut off" },
        report.frames,
        report.elapsed
    );
    Ok(())
}
