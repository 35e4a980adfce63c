//! A single-slot task runner where the most recent request always wins.
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub struct LatestTask<T> {
    seq: u64,
    awaiting: Option<u64>,
    handle: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Default for LatestTask<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> LatestTask<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            seq: 0,
            awaiting: None,
            handle: None,
            tx,
            rx,
        }
    }

    /// Aborts whatever is in flight and starts `fut` as the current request.
    /// Returns the sequence number tagging its result.
    pub fn spawn<F>(&mut self, fut: F) -> u64
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.cancel();
        self.seq += 1;
        let seq = self.seq;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let out = fut.await;
            // Receiver only goes away with the owner.
            let _ = tx.send((seq, out));
        }));
        self.awaiting = Some(seq);
        seq
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.awaiting = None;
    }

    pub fn is_pending(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Waits for the result of the latest request, discarding anything older
    /// that was already queued. Returns `None` when nothing is pending.
    pub async fn next(&mut self) -> Option<T> {
        let want = self.awaiting?;
        while let Some((seq, out)) = self.rx.recv().await {
            if seq == want {
                self.awaiting = None;
                self.handle = None;
                return Some(out);
            }
            debug!("Discarding stale response #{} (latest #{})", seq, want);
        }
        None
    }

    /// Non-blocking variant of [`LatestTask::next`].
    pub fn try_next(&mut self) -> Option<T> {
        let want = self.awaiting?;
        while let Ok((seq, out)) = self.rx.try_recv() {
            if seq == want {
                self.awaiting = None;
                self.handle = None;
                return Some(out);
            }
            debug!("Discarding stale response #{} (latest #{})", seq, want);
        }
        None
    }
}

impl<T> Drop for LatestTask<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
