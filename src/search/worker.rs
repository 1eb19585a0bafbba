//! Search Worker Thread
//!
//! Runs suggestion searches on a background tokio runtime so the field never
//! blocks on the network. Each request is spawned as its own task, so
//! searches may complete in any order; every response carries the sequence
//! number it was issued with and the field decides what is stale.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;

use super::{SearchRequest, SearchResponse, SuggestionSource};

/// Handle to a running worker
///
/// Dropping the handle cancels the worker and every in-flight search, and
/// waits for the thread to exit.
#[derive(Debug)]
pub struct SearchWorker {
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Stop the worker and join its thread
    ///
    /// Pending searches are abandoned without a response. Once this returns
    /// the response channel is disconnected.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::error!("Search worker thread panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn the search worker thread
///
/// Returns the worker handle, the request sender for the field and the
/// receiver the field drains completed responses from.
pub fn spawn_worker<S: SuggestionSource>(
    source: Arc<S>,
) -> (
    SearchWorker,
    UnboundedSender<SearchRequest>,
    Receiver<SearchResponse>,
) {
    let (request_tx, request_rx) = unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    let cancel = CancellationToken::new();

    let token = cancel.clone();
    let thread = std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to start search runtime: {}", e);
                return;
            }
        };
        runtime.block_on(worker_loop(source, request_rx, response_tx, token));
    });

    let worker = SearchWorker {
        cancel,
        thread: Some(thread),
    };
    (worker, request_tx, response_rx)
}

/// Main worker loop - spawns one task per request until cancelled or the
/// request channel is closed
async fn worker_loop<S: SuggestionSource>(
    source: Arc<S>,
    mut request_rx: UnboundedReceiver<SearchRequest>,
    response_tx: Sender<SearchResponse>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            request = request_rx.recv() => {
                let Some(request) = request else { break };
                let source = Arc::clone(&source);
                let response_tx = response_tx.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    let response = tokio::select! {
                        _ = cancel.cancelled() => return,
                        response = run_search(source.as_ref(), request) => response,
                    };
                    // Field gone: nothing left to deliver to
                    let _ = response_tx.send(response);
                });
            }
        }
    }

    log::debug!("Search worker shutting down");
}

/// Run one search and tag the outcome with its request id
pub async fn run_search<S: SuggestionSource>(source: &S, request: SearchRequest) -> SearchResponse {
    let SearchRequest {
        request_id,
        keyword,
    } = request;

    match source.search(&keyword).await {
        Ok(suggestions) => SearchResponse::Results {
            request_id,
            suggestions,
        },
        Err(error) => {
            log::debug!("Search {} for {:?} failed: {}", request_id, keyword, error);
            SearchResponse::Failed { request_id, error }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
