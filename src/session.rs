//! An upload session: the latest finished upload, published to whoever is watching.
//!
//! Each upload takes a ticket when it starts. When its work is done the result is published only
//! if no later upload has started in the meantime, so a slow upload can never overwrite the
//! faces of a faster, newer one.

use crate::pipeline::{Faces, Ingestion, Pipeline, StatementFace};
use crate::source::{Extracted, Source};
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Everything derived from one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// A tabular export: the aggregates it produced and one face per day.
    Ledger { ingestion: Ingestion, faces: Faces },
    /// A statement: the single face derived from its balance.
    Statement(StatementFace),
}

impl Snapshot {
    /// Runs extracted upload content through `pipeline`.
    pub fn build(pipeline: &Pipeline, extracted: Extracted) -> Self {
        match extracted {
            Extracted::Rows(rows) => {
                let ingestion = pipeline.ingest(&rows);
                let faces = pipeline.faces(&ingestion);
                Snapshot::Ledger { ingestion, faces }
            }
            Extracted::Text(text) => Snapshot::Statement(pipeline.digest(&text)),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Snapshot::Ledger { ingestion, .. } => ingestion.summary(),
            Snapshot::Statement(face) => face.summary(),
        }
    }
}

/// Identifies one upload within a `Session`. Later uploads hold larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Session {
    pipeline: Pipeline,
    generation: AtomicU64,
    tx: watch::Sender<Option<Arc<Snapshot>>>,
}

impl Session {
    pub fn new(pipeline: Pipeline) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            pipeline,
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Starts a new upload. Every ticket handed out before this one becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the most recently started upload.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Publishes `snapshot` if `ticket` is still the latest, replacing whatever was there.
    /// Returns `false` and drops the snapshot otherwise.
    pub fn commit(&self, ticket: Ticket, snapshot: Arc<Snapshot>) -> bool {
        // The check runs under the channel's lock so two commits cannot interleave.
        self.tx.send_if_modified(|current| {
            if self.is_latest(ticket) {
                *current = Some(snapshot);
                true
            } else {
                false
            }
        })
    }

    /// Extracts `source`, runs it through the pipeline and publishes the result.
    ///
    /// `None` means nothing was selected and leaves the session untouched. Returns the published
    /// snapshot, or `None` if there was no source or a newer upload started first.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read. Nothing is published in that case.
    pub async fn upload(&self, source: Option<Source>) -> Result<Option<Arc<Snapshot>>> {
        let source = match source {
            Some(source) => source,
            None => {
                debug!("No file selected, nothing to do");
                return Ok(None);
            }
        };
        let ticket = self.begin();
        let extracted = source.extract().await?;
        let snapshot = Arc::new(Snapshot::build(&self.pipeline, extracted));
        if self.commit(ticket, snapshot.clone()) {
            Ok(Some(snapshot))
        } else {
            debug!("Discarding the result of upload {ticket:?}, a newer upload has started");
            Ok(None)
        }
    }

    /// A receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.tx.subscribe()
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }
}
