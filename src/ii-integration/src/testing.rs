//! Test doubles and fixtures shared by the unit tests.
use crate::config::IntegrationConfig;
use crate::error::handoff::HandoffError;
use crate::error::storage::StorageError;
use crate::identity::ApplicationKey;
use crate::session::handoff::{Browser, Messenger, MessengerResponse, Platform};
use crate::storage::{MemoryStorage, Storage};
use crate::url::{CallbackBindingKind, ProviderNetwork};
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use ic_agent::identity::Delegation;
use slog::{Drain, Logger, Never, OwnedKVList, Record};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const II_INTEGRATION_CANISTER_ID: &str = "z5cfx-3qaaa-aaaag-aaoka-cai";
pub const FRONTEND_CANISTER_ID: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";

pub fn test_logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}

/// Keeps the formatted message of every record logged through [`RecordingDrain::logger`].
#[derive(Clone, Default)]
pub struct RecordingDrain {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingDrain {
    pub fn logger(&self) -> Logger {
        Logger::root(self.clone(), slog::o!())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Drain for RecordingDrain {
    type Ok = ();
    type Err = Never;

    fn log(&self, record: &Record<'_>, _: &OwnedKVList) -> Result<(), Never> {
        self.messages.lock().unwrap().push(record.msg().to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Expiry {
    InOneHour,
    OneHourAgo,
}

impl Expiry {
    fn nanos(self) -> u64 {
        let hour = Duration::from_secs(3600).as_nanos() as u64;
        let now = crate::identity::now_in_nanos();
        match self {
            Expiry::InOneHour => now + hour,
            Expiry::OneHourAgo => now - hour,
        }
    }
}

/// Provider-format chain JSON with a single delegation from `root` to `terminal_der`.
pub fn delegation_json(root: &ApplicationKey, terminal_der: &[u8], expiry: Expiry) -> String {
    let delegation = Delegation {
        pubkey: terminal_der.to_vec(),
        expiration: expiry.nanos(),
        targets: None,
    };
    let signature = root.sign_bytes(&delegation.signable());
    serde_json::json!({
        "delegations": [{
            "delegation": {
                "expiration": format!("{:x}", delegation.expiration),
                "pubkey": hex::encode(&delegation.pubkey),
            },
            "signature": hex::encode(signature),
        }],
        "publicKey": hex::encode(root.public_key_der()),
    })
    .to_string()
}

pub fn sample_config(platform: Platform) -> IntegrationConfig {
    IntegrationConfig {
        ii_integration_canister_id: II_INTEGRATION_CANISTER_ID.to_string(),
        frontend_canister_id: FRONTEND_CANISTER_ID.to_string(),
        network: ProviderNetwork::Local {
            local_ip_address: "192.168.0.210".to_string(),
        },
        deep_link: "exp://192.168.0.210:8081".to_string(),
        deep_link_type: None,
        auth_path: "/".to_string(),
        platform,
        callback_binding: CallbackBindingKind::SessionId,
        namespace: "test".to_string(),
    }
}

/// In-memory storage whose reads or removals can be made to fail. Counts saves per key.
#[derive(Default)]
pub struct FaultyStorage {
    inner: MemoryStorage,
    saves: Mutex<BTreeMap<String, usize>>,
    fail_reads: AtomicBool,
    fail_removals: AtomicBool,
}

impl FaultyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_removals(&self) {
        self.fail_removals.store(true, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    pub fn saves(&self, key: &str) -> usize {
        self.saves.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    async fn find(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::BackendFailed(format!("cannot read {}", key)));
        }
        self.inner.find(key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        *self.saves.lock().unwrap().entry(key.to_string()).or_default() += 1;
        self.inner.save(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(StorageError::BackendFailed(format!("cannot remove {}", key)));
        }
        self.inner.remove(key).await
    }
}

#[derive(Default)]
pub struct RecordingBrowser {
    opened: Mutex<Vec<Url>>,
    dismissed: AtomicUsize,
    fail_open: AtomicBool,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_open(&self) {
        self.fail_open.store(true, Ordering::SeqCst);
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }

    pub fn dismissed(&self) -> usize {
        self.dismissed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for RecordingBrowser {
    async fn open(&self, url: &Url) -> Result<(), HandoffError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(HandoffError::OpenBrowserFailed("browser unavailable".to_string()));
        }
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }

    async fn dismiss(&self) {
        self.dismissed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Keeps every registered sink until closed, like an event emitter's `on`.
#[derive(Default)]
pub struct RecordingMessenger {
    sinks: Mutex<Vec<UnboundedSender<MessengerResponse>>>,
    opened: Mutex<Vec<Url>>,
    sink_registered_before_open: AtomicBool,
    closed: AtomicUsize,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts a success response to the most recently registered sink.
    pub fn respond(&self, delegation: &str) {
        let sinks = self.sinks.lock().unwrap();
        sinks
            .last()
            .expect("no sink registered")
            .unbounded_send(MessengerResponse::Success {
                delegation: delegation.to_string(),
            })
            .unwrap();
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }

    pub fn sink_registered_before_open(&self) -> bool {
        self.sink_registered_before_open.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    fn on_success(&self, sink: UnboundedSender<MessengerResponse>) {
        self.sinks.lock().unwrap().push(sink);
    }

    async fn open(&self, url: &Url) -> Result<(), HandoffError> {
        let registered = !self.sinks.lock().unwrap().is_empty();
        self.sink_registered_before_open
            .store(registered, Ordering::SeqCst);
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        self.sinks.lock().unwrap().clear();
    }
}
