//! Single-writer book worker.
//!
//! One thread owns an instrument's [`LimitOrderBook`] and applies
//! commands from a FIFO channel one at a time, so every intent lands in
//! exactly the order it was enqueued. Any number of producers can hold a
//! [`BookHandle`]. Readers never touch the live book: after every
//! accepted mutation the worker publishes a fresh [`BookSnapshot`] behind
//! a read-write lock.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::IngestError;
use crate::orderbook::{BookSnapshot, LimitOrderBook};
use crate::types::{BookError, Intent, Outcome};

enum Command {
    Apply {
        intent: Intent,
        reply: Sender<Result<Outcome, BookError>>,
    },
    Shutdown,
}

/// Cloneable producer/observer handle for one book worker
#[derive(Clone)]
pub struct BookHandle {
    instrument: Arc<str>,
    tx: Sender<Command>,
    snapshot: Arc<RwLock<BookSnapshot>>,
}

impl BookHandle {
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Enqueue an intent and wait for the worker's verdict
    pub fn submit(&self, intent: Intent) -> Result<Outcome, IngestError> {
        let (reply, verdict) = channel::bounded(1);
        self.tx
            .send(Command::Apply { intent, reply })
            .map_err(|_| IngestError::WorkerClosed(self.instrument.to_string()))?;
        let outcome = verdict
            .recv()
            .map_err(|_| IngestError::WorkerClosed(self.instrument.to_string()))?;
        Ok(outcome?)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> BookSnapshot {
        self.snapshot.read().clone()
    }

    pub fn best_bid(&self) -> Option<u64> {
        self.snapshot.read().best_bid()
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.snapshot.read().best_ask()
    }
}

/// Owner of a running book worker thread
pub struct BookWorker {
    handle: BookHandle,
    thread: Option<JoinHandle<LimitOrderBook>>,
}

impl BookWorker {
    /// Start a worker with an empty book for `instrument`
    pub fn spawn(instrument: &str, config: &EngineConfig) -> Result<Self, IngestError> {
        Self::spawn_with_book(instrument, config, LimitOrderBook::from_config(config))
    }

    /// Start a worker around an existing book (e.g. one rebuilt by replay)
    pub fn spawn_with_book(
        instrument: &str,
        config: &EngineConfig,
        book: LimitOrderBook,
    ) -> Result<Self, IngestError> {
        config.validate()?;

        let (tx, rx) = match config.queue_capacity {
            0 => channel::unbounded(),
            n => channel::bounded(n),
        };
        let snapshot = Arc::new(RwLock::new(book.snapshot(config.snapshot_depth)));
        let handle = BookHandle {
            instrument: Arc::from(instrument),
            tx,
            snapshot: Arc::clone(&snapshot),
        };

        let name = instrument.to_string();
        let depth = config.snapshot_depth;
        let thread = thread::Builder::new()
            .name(format!("book-{instrument}"))
            .spawn(move || run(name, book, rx, snapshot, depth))
            .map_err(|e| IngestError::Spawn {
                instrument: instrument.to_string(),
                reason: e.to_string(),
            })?;

        info!(instrument, "book worker started");
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> BookHandle {
        self.handle.clone()
    }

    /// Stop the worker after everything already queued, returning the book
    pub fn shutdown(mut self) -> Result<LimitOrderBook, IngestError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<LimitOrderBook, IngestError> {
        let instrument = self.handle.instrument.to_string();
        let thread = self
            .thread
            .take()
            .ok_or_else(|| IngestError::WorkerClosed(instrument.clone()))?;
        // A send failure means the thread is already gone; join reports why.
        let _ = self.handle.tx.send(Command::Shutdown);
        thread.join().map_err(|_| IngestError::WorkerPanicked(instrument))
    }
}

impl Drop for BookWorker {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.stop();
        }
    }
}

fn run(
    instrument: String,
    mut book: LimitOrderBook,
    rx: Receiver<Command>,
    snapshot: Arc<RwLock<BookSnapshot>>,
    depth: usize,
) -> LimitOrderBook {
    for command in rx.iter() {
        match command {
            Command::Apply { intent, reply } => {
                let result = book.apply(intent);
                match &result {
                    Ok(_) => *snapshot.write() = book.snapshot(depth),
                    Err(e) => debug!(instrument = %instrument, error = %e, "intent rejected"),
                }
                // The submitter may have stopped waiting; the book is updated regardless.
                let _ = reply.send(result);
            }
            Command::Shutdown => break,
        }
    }
    info!(instrument = %instrument, orders = book.order_count(), "book worker stopped");
    book
}
