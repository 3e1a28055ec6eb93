//! Application - one UI root with its session

use crate::{Config, VERSION};
use std::io::Write;
use trellis_sync::{FlushSummary, JsonSink, Session, SyncResult};
use trellis_ui::Ui;

/// One UI root and the lock that serializes access to it
#[derive(Debug)]
pub struct Application {
    config: Config,
    session: Session,
}

impl Application {
    pub fn new(config: Config) -> Self {
        tracing::info!("Trellis v{} starting", VERSION);
        let ui = Ui::with_config(config.ui.clone());
        let session = Session::new(ui, config.flush.clone());
        Self { config, session }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run `f` with exclusive access to the tree
    pub fn with_ui<R>(&self, f: impl FnOnce(&mut Ui) -> R) -> SyncResult<R> {
        self.session.with_ui(f)
    }

    /// Flush pending changes as one JSON document written to `writer`
    pub fn flush_json<W: Write>(&self, writer: W) -> SyncResult<(W, FlushSummary)> {
        let mut sink = JsonSink::new(writer, self.config.flush.pretty);
        let summary = self.session.flush(&mut sink)?;
        Ok((sink.into_inner(), summary))
    }

    /// Stop the application and hand back the tree
    pub fn shutdown(self) -> SyncResult<Ui> {
        tracing::info!("Trellis shutting down");
        self.session.into_inner()
    }
}
