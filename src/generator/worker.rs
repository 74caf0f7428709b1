use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::engine::error::SupplyError;
use crate::engine::spawn::{SpawnRequest, SpawnTicket};
use crate::generator::{WordEntry, WordSource};

/// Performs word fetches off the UI thread and hands results to `deliver`.
pub struct FetchWorker {
    tx: mpsc::Sender<SpawnRequest>,
}

impl FetchWorker {
    /// `deliver` returns false once nobody is listening, which stops the
    /// worker thread.
    pub fn spawn<F>(source: Arc<dyn WordSource>, deliver: F) -> Self
    where
        F: Fn(SpawnTicket, Result<Vec<WordEntry>, SupplyError>) -> bool + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SpawnRequest>();
        thread::spawn(move || {
            for request in rx {
                let result = source.fetch_words(request.count, request.level);
                debug!(ticket = request.ticket.0, ok = result.is_ok(), "word fetch finished");
                if !deliver(request.ticket, result) {
                    return;
                }
            }
        });
        Self { tx }
    }

    pub fn request(&self, request: SpawnRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}
