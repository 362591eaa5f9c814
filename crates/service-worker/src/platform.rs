use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use http::Method;
use serde::{Deserialize, Serialize};

use crate::WorkerError;

/// What the agent needs to know about a request to decide how to handle it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: Method,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub data: NotificationData,
}

/// Where the running worker is in its lifecycle, as the host reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerLifecycle {
    Installing,
    /// Installed and waiting for the previous worker to let go
    Installed,
    Activating,
    Activated,
    /// Replaced by a newer worker
    Redundant,
}

/// Host capabilities of a service worker: network, cache storage, lifecycle,
/// notifications and client windows
#[async_trait(?Send)]
pub trait Platform {
    /// The host's own request, passed to the network untouched
    type Request;
    type Response;

    /// A plain GET, used for the asset manifest
    fn new_request(&self, url: &str) -> Result<Self::Request, WorkerError>;

    fn describe(&self, request: &Self::Request) -> AssetRequest;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, WorkerError>;

    fn status(&self, response: &Self::Response) -> u16;

    /// A second response with its own body, for the cache to consume
    fn copy_response(&self, response: &Self::Response) -> Result<Self::Response, WorkerError>;

    async fn cache_put(
        &self,
        generation: &str,
        request: &Self::Request,
        response: &Self::Response,
    ) -> Result<(), WorkerError>;

    async fn cache_match(
        &self,
        generation: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, WorkerError>;

    async fn cache_names(&self) -> Result<Vec<String>, WorkerError>;

    /// Returns false if there was no such generation
    async fn cache_delete(&self, generation: &str) -> Result<bool, WorkerError>;

    /// Runs work the current event doesn't wait for
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    async fn lifecycle(&self) -> Result<WorkerLifecycle, WorkerError>;

    async fn skip_waiting(&self) -> Result<(), WorkerError>;

    async fn claim_clients(&self) -> Result<(), WorkerError>;

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), WorkerError>;

    /// Focuses an open window already showing `url`. Returns false if there
    /// isn't one
    async fn focus_client(&self, url: &str) -> Result<bool, WorkerError>;

    async fn open_window(&self, url: &str) -> Result<(), WorkerError>;
}
