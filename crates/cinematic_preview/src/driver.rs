// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame loop that feeds the sequencer the way a render loop would.

use crate::settings::PreviewSettings;
use cinematic_sequencer::CameraSequencer;

/// Produces per-frame deltas, clamped like the game's render loop
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_time: f32,
    max_delta: f32,
    stall_frames: Vec<u32>,
    stall_delta: f32,
    frame: u32,
}

impl FrameClock {
    /// Create a clock from preview settings
    pub fn new(settings: &PreviewSettings) -> Self {
        Self {
            frame_time: 1.0 / settings.frame_rate,
            max_delta: settings.max_delta,
            stall_frames: settings.stall_frames.clone(),
            stall_delta: settings.stall_delta,
            frame: 0,
        }
    }

    /// Delta for the next frame
    pub fn tick(&mut self) -> f32 {
        let raw = if self.stall_frames.contains(&self.frame) {
            tracing::debug!("Frame {} stalled for {}s", self.frame, self.stall_delta);
            self.stall_delta
        } else {
            self.frame_time
        };
        self.frame += 1;
        raw.min(self.max_delta)
    }
}

/// Summary of a preview run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewReport {
    /// Frames simulated
    pub frames: u32,
    /// Sum of the clamped deltas fed to the sequencer
    pub elapsed: f32,
    /// Whether the sequencer returned to idle on its own
    pub finished: bool,
}

/// Drive an already started sequencer until it goes idle or the frame cap hits
pub fn drive(sequencer: &mut CameraSequencer, settings: &PreviewSettings) -> PreviewReport {
    let mut clock = FrameClock::new(settings);
    let mut report = PreviewReport {
        frames: 0,
        elapsed: 0.0,
        finished: false,
    };

    while sequencer.is_active() {
        if report.frames >= settings.max_frames {
            tracing::warn!("Frame cap {} reached, stopping", settings.max_frames);
            sequencer.stop();
            return report;
        }

        let delta = clock.tick();
        let pose = sequencer.update(delta);
        report.frames += 1;
        report.elapsed += delta;

        if settings.log_every > 0 && report.frames % settings.log_every == 0 {
            let (rx, ry, rz) = pose.euler_xyz();
            tracing::info!(
                "frame {:>5} phase {:?}{} index {} pos ({:.3}, {:.3}, {:.3}) rot ({:.3}, {:.3}, {:.3})",
                report.frames,
                sequencer.phase(),
                if sequencer.is_transitioning() { " (blending)" } else { "" },
                sequencer.current_index(),
                pose.position.x,
                pose.position.y,
                pose.position.z,
                rx,
                ry,
                rz
            );
        }
    }

    report.finished = true;
    report
}
