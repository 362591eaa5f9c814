use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    mem,
    rc::Rc,
};

use async_trait::async_trait;
use futures::future::{self, join_all, LocalBoxFuture};
use http::Method;

use crate::{AssetRequest, NotificationOptions, Platform, WorkerError, WorkerLifecycle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl MemoryRequest {
    pub fn new<U: Into<String>>(method: Method, url: U) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn get<U: Into<String>>(url: U) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Default)]
struct Inner {
    network: RefCell<HashMap<String, MemoryResponse>>,
    offline: Cell<bool>,
    fetched: RefCell<Vec<MemoryRequest>>,
    caches: RefCell<BTreeMap<String, BTreeMap<String, (MemoryRequest, MemoryResponse)>>>,
    fail_cache_writes: Cell<bool>,
    hang_cache_writes: Cell<bool>,
    background: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
    lifecycle: Cell<Option<WorkerLifecycle>>,
    skipped_waiting: Cell<bool>,
    claimed_clients: Cell<bool>,
    notifications: RefCell<Vec<(String, NotificationOptions)>>,
    open_clients: RefCell<Vec<String>>,
    focused: RefCell<Vec<String>>,
    opened: RefCell<Vec<String>>,
}

/// In-process stand-in for the browser. Urls that aren't served fail like an
/// unreachable network. Clones share the same state, so a test can keep one
/// while the agent owns another
#[derive(Clone, Default)]
pub struct MemoryPlatform(Rc<Inner>);

impl MemoryPlatform {
    pub fn serve(&self, url: &str, status: u16, body: &str) {
        self.0.network.borrow_mut().insert(
            url.to_string(),
            MemoryResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn unserve(&self, url: &str) {
        self.0.network.borrow_mut().remove(url);
    }

    pub fn go_offline(&self) {
        self.0.offline.set(true);
    }

    pub fn fail_cache_writes(&self) {
        self.0.fail_cache_writes.set(true);
    }

    /// Cache writes never complete, like a put still reading a streamed body
    pub fn hang_cache_writes(&self) {
        self.0.hang_cache_writes.set(true);
    }

    pub fn set_lifecycle(&self, lifecycle: WorkerLifecycle) {
        self.0.lifecycle.set(Some(lifecycle));
    }

    pub fn seed_cache(&self, generation: &str, url: &str, body: &str) {
        self.0
            .caches
            .borrow_mut()
            .entry(generation.to_string())
            .or_default()
            .insert(
                url.to_string(),
                (
                    MemoryRequest::get(url),
                    MemoryResponse {
                        status: 200,
                        body: body.to_string(),
                    },
                ),
            );
    }

    pub fn open_client(&self, url: &str) {
        self.0.open_clients.borrow_mut().push(url.to_string());
    }

    /// Runs everything spawned so far to completion
    pub async fn run_background(&self) {
        let tasks = mem::take(&mut *self.0.background.borrow_mut());
        join_all(tasks).await;
    }

    pub fn background_tasks(&self) -> usize {
        self.0.background.borrow().len()
    }

    pub fn cached(&self, generation: &str, url: &str) -> Option<(MemoryRequest, MemoryResponse)> {
        self.0
            .caches
            .borrow()
            .get(generation)
            .and_then(|c| c.get(url))
            .cloned()
    }

    pub fn cached_urls(&self, generation: &str) -> Vec<String> {
        self.0
            .caches
            .borrow()
            .get(generation)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn fetched(&self) -> Vec<MemoryRequest> {
        self.0.fetched.borrow().clone()
    }

    pub fn skipped_waiting(&self) -> bool {
        self.0.skipped_waiting.get()
    }

    pub fn claimed_clients(&self) -> bool {
        self.0.claimed_clients.get()
    }

    pub fn notifications(&self) -> Vec<(String, NotificationOptions)> {
        self.0.notifications.borrow().clone()
    }

    pub fn focused(&self) -> Vec<String> {
        self.0.focused.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.0.opened.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Platform for MemoryPlatform {
    type Request = MemoryRequest;
    type Response = MemoryResponse;

    fn new_request(&self, url: &str) -> Result<MemoryRequest, WorkerError> {
        Ok(MemoryRequest::get(url))
    }

    fn describe(&self, request: &MemoryRequest) -> AssetRequest {
        AssetRequest {
            method: request.method.clone(),
            url: request.url.clone(),
        }
    }

    async fn fetch(&self, request: &MemoryRequest) -> Result<MemoryResponse, WorkerError> {
        self.0.fetched.borrow_mut().push(request.clone());

        if self.0.offline.get() {
            return Err(WorkerError::network(&request.url, "offline"));
        }
        self.0
            .network
            .borrow()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| WorkerError::network(&request.url, "connection refused"))
    }

    fn status(&self, response: &MemoryResponse) -> u16 {
        response.status
    }

    fn copy_response(&self, response: &MemoryResponse) -> Result<MemoryResponse, WorkerError> {
        Ok(response.clone())
    }

    async fn cache_put(
        &self,
        generation: &str,
        request: &MemoryRequest,
        response: &MemoryResponse,
    ) -> Result<(), WorkerError> {
        if self.0.hang_cache_writes.get() {
            future::pending::<()>().await;
        }
        if self.0.fail_cache_writes.get() {
            return Err(WorkerError::Cache("quota exceeded".to_string()));
        }
        self.0
            .caches
            .borrow_mut()
            .entry(generation.to_string())
            .or_default()
            .insert(request.url.clone(), (request.clone(), response.clone()));
        Ok(())
    }

    async fn cache_match(
        &self,
        generation: &str,
        request: &MemoryRequest,
    ) -> Result<Option<MemoryResponse>, WorkerError> {
        Ok(self.cached(generation, &request.url).map(|(_, r)| r))
    }

    async fn cache_names(&self) -> Result<Vec<String>, WorkerError> {
        Ok(self.0.caches.borrow().keys().cloned().collect())
    }

    async fn cache_delete(&self, generation: &str) -> Result<bool, WorkerError> {
        Ok(self.0.caches.borrow_mut().remove(generation).is_some())
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.0.background.borrow_mut().push(task);
    }

    async fn lifecycle(&self) -> Result<WorkerLifecycle, WorkerError> {
        Ok(self.0.lifecycle.get().unwrap_or(WorkerLifecycle::Installing))
    }

    async fn skip_waiting(&self) -> Result<(), WorkerError> {
        self.0.skipped_waiting.set(true);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), WorkerError> {
        self.0.claimed_clients.set(true);
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), WorkerError> {
        self.0
            .notifications
            .borrow_mut()
            .push((title.to_string(), options.clone()));
        Ok(())
    }

    async fn focus_client(&self, url: &str) -> Result<bool, WorkerError> {
        let open = self.0.open_clients.borrow().iter().any(|c| c == url);
        if open {
            self.0.focused.borrow_mut().push(url.to_string());
        }
        Ok(open)
    }

    async fn open_window(&self, url: &str) -> Result<(), WorkerError> {
        self.0.opened.borrow_mut().push(url.to_string());
        self.0.open_clients.borrow_mut().push(url.to_string());
        Ok(())
    }
}
