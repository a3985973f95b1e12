//! Redirection of `log` records into the render surface.
//!
//! Log output shares the console with the prompt. [`SurfaceLogger`] prints
//! each record above the prompt and redraws it, or writes it raw while a
//! synchronous command owns the console.

use std::fmt::Write as _;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use super::surface::Surface;
use super::transport::Sink;

/// `log` backend printing through a [`Surface`].
#[derive(Debug)]
pub struct SurfaceLogger<S> {
    surface: Surface<S>,
    level: LevelFilter,
}

impl<S: Sink + Send + 'static> SurfaceLogger<S> {
    /// Logger printing records up to `level`.
    pub fn new(surface: Surface<S>, level: LevelFilter) -> Self {
        Self { surface, level }
    }

    /// Install as the global logger.
    ///
    /// # Errors
    ///
    /// Fails when a global logger is already set.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(record: &Record<'_>) -> String {
        let mut line = String::new();
        let _ = write!(
            line,
            "{} {}: {}\r\n",
            record.level(),
            record.target(),
            record.args()
        );
        line
    }
}

impl<S: Sink + Send + 'static> Log for SurfaceLogger<S> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A failing console cannot report its own failure.
        let _ = self.surface.print(&Self::format(record));
    }

    fn flush(&self) {}
}
