//! Command timing utilities.

use std::time::Instant;

/// A simple timer for measuring how long a command phase takes.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer with the given phase name.
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finish the timer and log the elapsed time.
    pub fn finish(self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!("[{:.1}ms] {}", ms, self.name);
    }
}
