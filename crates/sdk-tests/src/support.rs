use async_trait::async_trait;
use chrono::Utc;
use model::error::ApiError;
use model::transaction::{PreparedTransaction, TransactionInfo, TransactionStatus};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stream::error::StreamError;
use stream::lazy::RangeSource;
use tokio::sync::{Semaphore, mpsc};
use wallet::error::WalletError;
use wallet::signer::Signer;
use wallet::tracker::TransactionSubmitter;

/// Source that replays a fixed script of page results and counts calls.
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<Vec<u64>, StreamError>>>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Result<Vec<u64>, StreamError>>) -> Self {
        ScriptedSource {
            pages: Mutex::new(pages.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl RangeSource<u64> for ScriptedSource {
    async fn fetch_range(&mut self, _offset: u64, _count: usize) -> Result<Vec<u64>, StreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }
}

/// Test gate: the source announces each entered fetch on a channel and
/// blocks until the test grants a permit.
pub struct Gate {
    pub entered: Mutex<mpsc::UnboundedReceiver<()>>,
    entered_tx: mpsc::UnboundedSender<()>,
    pub proceed: Semaphore,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        let (entered_tx, entered) = mpsc::unbounded_channel();
        Arc::new(Gate {
            entered: Mutex::new(entered),
            entered_tx,
            proceed: Semaphore::new(0),
        })
    }

    /// Waits until a fetch has reached the gate.
    pub async fn wait_entered(&self) {
        let mut rx = match self.entered.lock() {
            Ok(rx) => rx,
            Err(_) => panic!("gate lock poisoned"),
        };
        rx.recv().await.expect("gate channel closed");
    }

    pub fn release(&self, permits: usize) {
        self.proceed.add_permits(permits);
    }
}

/// Wraps another source, parking every fetch at a [`Gate`].
pub struct GatedSource<S> {
    inner: S,
    gate: Arc<Gate>,
}

impl<S> GatedSource<S> {
    pub fn new(inner: S, gate: Arc<Gate>) -> Self {
        GatedSource { inner, gate }
    }
}

#[async_trait]
impl<T, S> RangeSource<T> for GatedSource<S>
where
    T: Send + 'static,
    S: RangeSource<T> + Send,
{
    async fn fetch_range(&mut self, offset: u64, count: usize) -> Result<Vec<T>, StreamError> {
        self.gate
            .entered_tx
            .send(())
            .expect("gate channel closed");
        let permit = self
            .gate
            .proceed
            .acquire()
            .await
            .expect("gate semaphore closed");
        permit.forget();
        self.inner.fetch_range(offset, count).await
    }
}

pub fn pending_info(txid: &str) -> TransactionInfo {
    TransactionInfo::pending(txid.to_string())
}

pub fn success_info(txid: &str, anchored: bool) -> TransactionInfo {
    TransactionInfo {
        txid: txid.to_string(),
        status: TransactionStatus::Success,
        anchored,
        observed_at: Utc::now(),
    }
}

pub fn failed_info(txid: &str) -> TransactionInfo {
    TransactionInfo {
        txid: txid.to_string(),
        status: TransactionStatus::AbortByResponse,
        anchored: false,
        observed_at: Utc::now(),
    }
}

pub fn sample_tx(fee: u64, nonce: u64) -> PreparedTransaction {
    PreparedTransaction {
        payload: vec![0x80, 0x00, 0x01],
        sender: "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9".to_string(),
        fee,
        nonce,
    }
}

/// Submitter with scripted submit/status outcomes; records the fee of the
/// last submitted transaction.
pub struct MockSubmitter {
    submit_results: Mutex<VecDeque<Result<TransactionInfo, ApiError>>>,
    status_results: Mutex<VecDeque<Result<TransactionInfo, ApiError>>>,
    pub submitted: AtomicUsize,
    pub last_fee: AtomicU64,
}

impl MockSubmitter {
    pub fn new(
        submit_results: Vec<Result<TransactionInfo, ApiError>>,
        status_results: Vec<Result<TransactionInfo, ApiError>>,
    ) -> Arc<Self> {
        Arc::new(MockSubmitter {
            submit_results: Mutex::new(submit_results.into()),
            status_results: Mutex::new(status_results.into()),
            submitted: AtomicUsize::new(0),
            last_fee: AtomicU64::new(0),
        })
    }
}

/// In-memory signer double. Signatures are the payload tagged with the key
/// path, so tests can tell which derived key signed what.
pub struct MemorySigner {
    path: String,
}

impl MemorySigner {
    pub fn root() -> Self {
        MemorySigner {
            path: "m".to_string(),
        }
    }
}

impl Signer for MemorySigner {
    fn derive(&self, path: &str) -> Result<Box<dyn Signer>, WalletError> {
        Ok(Box::new(MemorySigner {
            path: format!("{}/{path}", self.path),
        }))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, WalletError> {
        let mut out = self.path.clone().into_bytes();
        out.push(b':');
        out.extend_from_slice(payload);
        Ok(out)
    }

    fn public_key(&self) -> Vec<u8> {
        self.path.clone().into_bytes()
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit(&self, tx: &PreparedTransaction) -> Result<TransactionInfo, ApiError> {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.last_fee.store(tx.fee, Ordering::SeqCst);
        self.submit_results
            .lock()
            .expect("submit script lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Logical("no scripted submit result".into())))
    }

    async fn status(&self, txid: &str) -> Result<TransactionInfo, ApiError> {
        self.status_results
            .lock()
            .expect("status script lock")
            .pop_front()
            .unwrap_or_else(|| Ok(pending_info(txid)))
    }
}
