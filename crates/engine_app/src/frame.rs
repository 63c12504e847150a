//! Host frame loop.
//!
//! Drives a [`Registry`] at a fixed timestep: one [`Registry::update`] per
//! frame, sleeping off whatever is left of the frame budget.

use std::time::{Duration, Instant};

use engine_system::{Registry, UpdateReport};
use tracing::{info, warn};

use crate::config::FrameConfig;

/// The host's frame loop state.
#[derive(Debug)]
pub struct FrameLoop {
    config: FrameConfig,
    registry: Registry,
}

impl FrameLoop {
    /// Wrap a started registry.
    #[must_use]
    pub fn new(config: FrameConfig, registry: Registry) -> Self {
        Self { config, registry }
    }

    /// Returns a reference to the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns a mutable reference to the registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run one frame.
    pub fn frame(&mut self) -> UpdateReport {
        let report = self.registry.update();
        let index = report.frame.index;

        if self.config.report_every > 0 && index % self.config.report_every == 0 {
            info!(
                frame = index,
                processed = report.processed(),
                elapsed_us = report.elapsed.as_micros() as u64,
                "frame summary"
            );
        }

        report
    }

    /// Run frames until `max_frames` is reached, or forever if it is 0.
    ///
    /// Returns the number of frames run by this call.
    pub fn run(&mut self) -> u64 {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut frame_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_frames = self.config.max_frames,
            "starting frame loop"
        );

        loop {
            let start = Instant::now();
            self.frame();

            frame_count += 1;
            if self.config.max_frames > 0 && frame_count >= self.config.max_frames {
                info!(frames = frame_count, "frame loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame = self.registry.frame_index(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }

        frame_count
    }

    /// Stop the loop and shut the registry down.
    pub fn shutdown(self) {
        self.registry.shutdown();
    }
}
