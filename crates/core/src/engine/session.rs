//! Scoped ownership of a single engine

use std::path::Path;
use std::time::Duration;

use shakmaty::Chess;
use tracing::{debug, warn};

use super::{Engine, EngineError, PositionAnalysis};

/// Owns one engine from open to close.
///
/// The engine is quit exactly once: by [`EngineSession::close`] on the normal
/// path, or by `Drop` when the session goes out of scope without being closed.
pub struct EngineSession<E: Engine> {
    engine: Option<E>,
}

impl<E: Engine> EngineSession<E> {
    /// Opens a session by launching the engine at `path`
    pub fn open<F>(path: &Path, launch: F) -> Result<Self, EngineError>
    where
        F: FnOnce(&Path) -> Result<E, EngineError>,
    {
        let engine = launch(path)?;
        debug!(path = %path.display(), "engine session opened");
        Ok(Self {
            engine: Some(engine),
        })
    }

    pub fn analyse(&mut self, position: &Chess, limit: Duration) -> Result<PositionAnalysis, EngineError> {
        let engine = self.engine.as_mut().ok_or(EngineError::NotRunning)?;
        engine.analyse(position, limit)
    }

    /// Closes the session and reports whether the engine shut down cleanly
    pub fn close(mut self) -> Result<(), EngineError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        match self.engine.take() {
            Some(mut engine) => {
                debug!("closing engine session");
                engine.quit()
            }
            None => Ok(()),
        }
    }
}

impl<E: Engine> Drop for EngineSession<E> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("engine did not shut down cleanly: {}", e);
        }
    }
}
