//! Ingestion session
//!
//! The ingestion loop runs on its own thread, blocking on the transport for
//! the next line and running it through the processor. Collaborators never
//! share mutable pipeline state directly: the loop publishes each snapshot
//! through a [`SnapshotCell`] (single-writer, multi-reader) and optionally
//! offers it on an mpsc channel for the rendering collaborator.
//!
//! Per-line errors are caught at the loop boundary and drop one line;
//! end-of-input or an I/O error ends the loop permanently. The session is
//! stopped by closing the underlying transport.

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use chrono::Utc;
use log::{info, warn};

use crate::error::ProcessError;
use crate::processor::StreamProcessor;
use crate::types::Snapshot;

/// Atomically published "latest snapshot" handle.
///
/// Clones share the same cell. The lock is held only for the swap or the
/// clone-out, so readers can never observe a partially written snapshot.
#[derive(Clone, Default)]
pub struct SnapshotCell {
    inner: Arc<Mutex<Option<Snapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(snapshot);
        }
    }

    /// Clone out the latest snapshot, if any line has been processed yet.
    pub fn latest(&self) -> Option<Snapshot> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }
}

/// Handle to a running ingestion loop.
pub struct IngestSession {
    handle: JoinHandle<Result<StreamProcessor, ProcessError>>,
}

impl IngestSession {
    /// Spawn the ingestion loop over `reader`.
    ///
    /// Each successfully processed line is published to `cell` and, when
    /// `snapshots` is given, sent to the rendering collaborator; a closed
    /// receiver is ignored (readers only ever sample, they are never waited
    /// on).
    pub fn spawn<R>(
        reader: R,
        processor: StreamProcessor,
        cell: SnapshotCell,
        snapshots: Option<Sender<Snapshot>>,
    ) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let handle = thread::spawn(move || run_loop(reader, processor, cell, snapshots));
        Self { handle }
    }

    /// Wait for the loop to end and recover the processor (with its final
    /// counters, timers, and history), or the transport error that killed it.
    pub fn join(self) -> Result<StreamProcessor, ProcessError> {
        self.handle.join().map_err(|_| {
            ProcessError::Transport(io::Error::new(
                io::ErrorKind::Other,
                "ingestion thread panicked",
            ))
        })?
    }
}

fn run_loop<R: BufRead>(
    mut reader: R,
    mut processor: StreamProcessor,
    cell: SnapshotCell,
    snapshots: Option<Sender<Snapshot>>,
) -> Result<StreamProcessor, ProcessError> {
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            // EOF: the transport was closed; the session is over.
            Ok(0) => {
                info!("transport closed, ingestion stopped");
                return Ok(processor);
            }
            Ok(_) => match processor.process_line(line.trim(), Utc::now()) {
                Ok(snapshot) => {
                    cell.publish(snapshot.clone());
                    if let Some(tx) = &snapshots {
                        tx.send(snapshot).ok();
                    }
                }
                Err(err) if err.is_recoverable() => {
                    warn!("dropped line: {err}");
                }
                Err(err) => return Err(err),
            },
            Err(err) => {
                warn!("transport failure, ingestion stopped: {err}");
                return Err(ProcessError::Transport(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessorConfig;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn make_processor() -> StreamProcessor {
        StreamProcessor::new(ProcessorConfig::default()).unwrap()
    }

    #[test]
    fn test_cell_roundtrip() {
        let cell = SnapshotCell::new();
        assert!(cell.latest().is_none());

        let mut processor = make_processor();
        let snapshot = processor.process_line("20,5", Utc::now()).unwrap();
        cell.publish(snapshot);

        let latest = cell.latest().unwrap();
        assert_eq!(latest.delta1, 15.0);
    }

    #[test]
    fn test_cell_is_shared_across_clones() {
        let writer = SnapshotCell::new();
        let reader = writer.clone();

        let mut processor = make_processor();
        writer.publish(processor.process_line("20,5", Utc::now()).unwrap());
        assert!(reader.latest().is_some());
    }

    #[test]
    fn test_session_processes_stream_and_drops_bad_lines() {
        let input = Cursor::new("20,5\n20,5\nnot,numbers\n1,2,3\n20,15\n");
        let cell = SnapshotCell::new();
        let (tx, rx) = mpsc::channel();

        let session = IngestSession::spawn(input, make_processor(), cell.clone(), Some(tx));
        let processor = session.join().unwrap();

        // Three well-formed lines survive; the two malformed ones are dropped
        // without disturbing counters or history.
        assert_eq!(processor.history().len(), 3);
        assert_eq!(processor.channel1().activation_count, 1);
        assert_eq!(rx.iter().count(), 3);

        let latest = cell.latest().unwrap();
        assert_eq!(latest.delta1, 10.0);
    }

    #[test]
    fn test_session_without_render_channel() {
        let input = Cursor::new("20,5\n");
        let session = IngestSession::spawn(input, make_processor(), SnapshotCell::new(), None);
        let processor = session.join().unwrap();
        assert_eq!(processor.history().len(), 1);
    }
}
