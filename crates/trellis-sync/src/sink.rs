//! Flush sinks

use crate::{ConnectorSnapshot, SyncError, SyncResult};
use serde::Serialize;
use std::io::Write;

/// Receives one batch of changes per flush cycle
pub trait FlushSink {
    /// Start a batch
    fn begin(&mut self, sync_id: u64) -> SyncResult<()>;

    /// Add one connector to the batch
    fn write(&mut self, snapshot: &ConnectorSnapshot) -> SyncResult<()>;

    /// Complete the batch. The dirty set is cleared only when this succeeds.
    fn finish(&mut self) -> SyncResult<()>;
}

/// One batch kept by [`MemorySink`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFlush {
    pub sync_id: u64,
    pub changes: Vec<ConnectorSnapshot>,
}

/// Keeps every finished batch in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    current: Option<RecordedFlush>,
    flushes: Vec<RecordedFlush>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flushes(&self) -> &[RecordedFlush] {
        &self.flushes
    }

    pub fn last(&self) -> Option<&RecordedFlush> {
        self.flushes.last()
    }
}

impl FlushSink for MemorySink {
    fn begin(&mut self, sync_id: u64) -> SyncResult<()> {
        self.current = Some(RecordedFlush { sync_id, changes: Vec::new() });
        Ok(())
    }

    fn write(&mut self, snapshot: &ConnectorSnapshot) -> SyncResult<()> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| SyncError::Sink("write outside of a batch".into()))?;
        current.changes.push(snapshot.clone());
        Ok(())
    }

    fn finish(&mut self) -> SyncResult<()> {
        let current = self
            .current
            .take()
            .ok_or_else(|| SyncError::Sink("finish outside of a batch".into()))?;
        self.flushes.push(current);
        Ok(())
    }
}

#[derive(Serialize)]
struct Document<'a> {
    sync_id: u64,
    changes: &'a [ConnectorSnapshot],
}

/// Writes each batch as one JSON document `{"sync_id", "changes"}` followed
/// by a newline
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
    sync_id: Option<u64>,
    changes: Vec<ConnectorSnapshot>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            sync_id: None,
            changes: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FlushSink for JsonSink<W> {
    fn begin(&mut self, sync_id: u64) -> SyncResult<()> {
        self.sync_id = Some(sync_id);
        self.changes.clear();
        Ok(())
    }

    fn write(&mut self, snapshot: &ConnectorSnapshot) -> SyncResult<()> {
        self.changes.push(snapshot.clone());
        Ok(())
    }

    fn finish(&mut self) -> SyncResult<()> {
        let sync_id = self
            .sync_id
            .take()
            .ok_or_else(|| SyncError::Sink("finish outside of a batch".into()))?;
        let document = Document { sync_id, changes: &self.changes };

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &document)?;
        } else {
            serde_json::to_writer(&mut self.writer, &document)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.changes.clear();
        Ok(())
    }
}
