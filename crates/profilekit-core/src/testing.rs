//! In-crate fakes for the screen's collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{watch, Semaphore};

use crate::api::{
    AccountResponse, AuthApi, StatusResponse, StorageApi, UploadRequest, UploadResponse,
};
use crate::error::{Error, Result};
use crate::models::{ProfileUpdate, UserRecord};
use crate::notify::{Notice, Notifier};
use crate::store::{AuthState, MemoryUserStore, UserAction, UserStore};

/// Yield to the runtime until `condition` holds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition was not reached");
}

pub fn account(user: UserRecord) -> AccountResponse {
    AccountResponse {
        status: true,
        data: Some(user),
        message: None,
    }
}

pub fn accepted() -> StatusResponse {
    StatusResponse {
        status: true,
        message: None,
    }
}

pub fn uploaded(secure_url: &str) -> UploadResponse {
    UploadResponse {
        asset_id: Some("asset-1".to_string()),
        secure_url: Some(secure_url.to_string()),
    }
}

async fn pass(gate: Option<&Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.expect("gate closed").forget();
    }
}

#[derive(Default)]
pub struct FakeAuthApi {
    updates: Mutex<VecDeque<Result<StatusResponse>>>,
    fetches: Mutex<VecDeque<Result<AccountResponse>>>,
    update_calls: Mutex<Vec<ProfileUpdate>>,
    fetch_calls: AtomicUsize,
    update_gate: Option<Arc<Semaphore>>,
    fetch_gate: Option<Arc<Semaphore>>,
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update(self, response: Result<StatusResponse>) -> Self {
        self.updates.lock().unwrap().push_back(response);
        self
    }

    pub fn with_fetch(self, response: Result<AccountResponse>) -> Self {
        self.fetches.lock().unwrap().push_back(response);
        self
    }

    /// Hold update calls until permits are added to the returned semaphore.
    pub fn gate_update(&mut self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.update_gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn gate_fetch(&mut self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.fetch_gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn update_calls(&self) -> Vec<ProfileUpdate> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn fetch_personal_account(&self) -> Result<AccountResponse> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        pass(self.fetch_gate.as_ref()).await;
        self.fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Api("no fetch response queued".to_string())))
    }

    async fn update_personal_account(&self, payload: &ProfileUpdate) -> Result<StatusResponse> {
        self.update_calls.lock().unwrap().push(payload.clone());
        pass(self.update_gate.as_ref()).await;
        self.updates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(accepted()))
    }
}

#[derive(Default)]
pub struct FakeStorageApi {
    responses: Mutex<VecDeque<Result<UploadResponse>>>,
    calls: Mutex<Vec<UploadRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeStorageApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: Result<UploadResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn gate(&mut self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<UploadRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageApi for FakeStorageApi {
    async fn upload_image_media(&self, request: &UploadRequest) -> Result<UploadResponse> {
        self.calls.lock().unwrap().push(request.clone());
        pass(self.gate.as_ref()).await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(UploadResponse::default()))
    }
}

/// Memory store that also keeps every dispatched action.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryUserStore,
    actions: Mutex<Vec<UserAction>>,
}

impl RecordingStore {
    pub fn new(initial: AuthState) -> Self {
        Self {
            inner: MemoryUserStore::new(initial),
            actions: Mutex::new(Vec::new()),
        }
    }

    pub fn actions(&self) -> Vec<UserAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl UserStore for RecordingStore {
    fn current(&self) -> AuthState {
        self.inner.current()
    }

    fn dispatch(&self, action: UserAction) {
        self.actions.lock().unwrap().push(action.clone());
        self.inner.dispatch(action);
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.subscribe()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
