//! Locked session
//!
//! One `Ui` behind a mutex. The lock is held from capture to clear, so a
//! concurrent request cannot change the tree in the middle of a flush.

use crate::{flush, FlushConfig, FlushSink, FlushSummary, SyncError, SyncResult};
use std::sync::Mutex;
use trellis_ui::Ui;

/// A `Ui` shared between request handlers
#[derive(Debug)]
pub struct Session {
    ui: Mutex<Ui>,
    config: FlushConfig,
}

impl Session {
    pub fn new(ui: Ui, config: FlushConfig) -> Self {
        tracing::info!("Session started");
        Self {
            ui: Mutex::new(ui),
            config,
        }
    }

    pub fn config(&self) -> &FlushConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the tree
    pub fn with_ui<R>(&self, f: impl FnOnce(&mut Ui) -> R) -> SyncResult<R> {
        let mut ui = self.ui.lock().map_err(|_| SyncError::Poisoned)?;
        Ok(f(&mut ui))
    }

    /// Flush under the session lock
    pub fn flush(&self, sink: &mut dyn FlushSink) -> SyncResult<FlushSummary> {
        let mut ui = self.ui.lock().map_err(|_| SyncError::Poisoned)?;
        flush(&mut ui, sink, &self.config)
    }

    pub fn into_inner(self) -> SyncResult<Ui> {
        tracing::info!("Session closed");
        self.ui.into_inner().map_err(|_| SyncError::Poisoned)
    }
}
