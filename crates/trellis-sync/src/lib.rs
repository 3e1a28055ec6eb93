//! Trellis Sync - flush cycle
//!
//! Drains the dirty connectors of a [`trellis_ui::Ui`] into a
//! [`FlushSink`] once per request cycle. The dirty set is only cleared
//! after the sink accepted the whole batch.
//!
//! ```rust,ignore
//! use trellis_sync::{flush, FlushConfig, JsonSink};
//!
//! let mut sink = JsonSink::new(std::io::stdout(), false);
//! let summary = flush(&mut ui, &mut sink, &FlushConfig::default())?;
//! ```

mod config;
mod error;
mod flush;
mod session;
mod sink;
mod snapshot;

pub use config::FlushConfig;
pub use error::{SyncError, SyncResult};
pub use flush::{flush, FlushSummary};
pub use session::Session;
pub use sink::{FlushSink, JsonSink, MemorySink, RecordedFlush};
pub use snapshot::ConnectorSnapshot;
