#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ecboard_proto::error::FetchError;
use ecboard_proto::source::{CandidateSource, RawPayload};
use ecboard_proto::transform::Cell;
use tokio::sync::{mpsc, oneshot};

/// One sheet row in the `Display` layout with all buckets zero.
pub fn row(name: &str, total_count: &str, total_value: &str) -> Vec<Cell> {
    let mut row: Vec<Cell> = vec![Cell::from("1"), Cell::from(name), Cell::Blank, Cell::Blank];
    row.extend((0..5).map(|_| Cell::from("0")));
    row.push(Cell::from(total_count));
    row.push(Cell::from(total_value));
    row
}

pub fn rows_payload(names_and_values: &[(&str, &str)]) -> RawPayload {
    RawPayload::Rows(
        names_and_values
            .iter()
            .map(|(name, value)| row(name, "1", value))
            .collect(),
    )
}

/// Replays queued results in order; empty sheet once the queue runs dry.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<RawPayload, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<RawPayload, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandidateSource for ScriptedSource {
    async fn fetch(&self) -> Result<RawPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(RawPayload::Rows(Vec::new())))
    }

    fn describe(&self) -> String {
        "scripted".into()
    }
}

/// Each fetch announces itself on `started` and then waits for the test to
/// release it through the matching gate. Calls beyond the gate count never
/// resolve.
pub struct GatedSource {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<RawPayload, FetchError>>>>,
    started: mpsc::UnboundedSender<usize>,
    calls: AtomicUsize,
}

pub type Gate = oneshot::Sender<Result<RawPayload, FetchError>>;

impl GatedSource {
    pub fn new(n: usize) -> (Arc<Self>, Vec<Gate>, mpsc::UnboundedReceiver<usize>) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let mut senders = Vec::with_capacity(n);
        let mut receivers = VecDeque::with_capacity(n);
        for _ in 0..n {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let source = Arc::new(Self {
            gates: Mutex::new(receivers),
            started: started_tx,
            calls: AtomicUsize::new(0),
        });
        (source, senders, started_rx)
    }
}

#[async_trait]
impl CandidateSource for GatedSource {
    async fn fetch(&self) -> Result<RawPayload, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        let _ = self.started.send(call);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::SourceUnavailable("gate dropped".into()))),
            None => std::future::pending().await,
        }
    }

    fn describe(&self) -> String {
        "gated".into()
    }
}
