//! Flush cycle
//!
//! Capture, write, then clear. Capturing only needs `&Ui`, so the tree is
//! frozen for the whole write.

use crate::{ConnectorSnapshot, FlushConfig, FlushSink, SyncResult};
use trellis_ui::{NodeId, Ui};

/// Outcome of one successful flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushSummary {
    pub sync_id: u64,
    /// Connectors written to the sink
    pub written: usize,
    /// Registry mappings dropped by the post-flush sweep
    pub released: usize,
}

/// Write every dirty connector to `sink` and start a new cycle.
///
/// On error the dirty set, the client-side state and the sync id are left
/// untouched, so the next flush sends the same changes again.
pub fn flush(ui: &mut Ui, sink: &mut dyn FlushSink, config: &FlushConfig) -> SyncResult<FlushSummary> {
    let sync_id = ui.sync_id();
    let nodes = if config.include_invisible {
        ui.dirty_connectors()
    } else {
        ui.dirty_visible_connectors()
    };
    let snapshots: Vec<(NodeId, ConnectorSnapshot)> = nodes
        .into_iter()
        .filter_map(|node| ConnectorSnapshot::capture(ui, node).map(|s| (node, s)))
        .collect();

    if let Err(err) = write_batch(sink, sync_id, &snapshots) {
        tracing::warn!("Flush {} failed, keeping {} dirty connectors: {}", sync_id, snapshots.len(), err);
        return Err(err);
    }

    let written: Vec<NodeId> = snapshots.iter().map(|(node, _)| *node).collect();
    let report = ui.complete_sync(&written);
    tracing::debug!("Flush {} wrote {} connectors", sync_id, written.len());

    Ok(FlushSummary {
        sync_id,
        written: written.len(),
        released: report.released.len() + report.stale.len(),
    })
}

fn write_batch(sink: &mut dyn FlushSink, sync_id: u64, snapshots: &[(NodeId, ConnectorSnapshot)]) -> SyncResult<()> {
    sink.begin(sync_id)?;
    for (_, snapshot) in snapshots {
        sink.write(snapshot)?;
    }
    sink.finish()
}
