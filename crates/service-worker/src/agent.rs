use std::{future::Future, rc::Rc};

use futures::future::join_all;
use http::Method;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    AgentConfig, NotificationData, NotificationOptions, Platform, PushMessage, WorkerError,
    WorkerLifecycle,
};

/// Message a client view posts to promote a waiting worker
pub const SKIP_WAITING: &str = "SKIP_WAITING";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    /// The agent's own generation before it has been activated
    Installing,
    Active,
    /// Left behind by an older worker, deleted on the next activation
    Stale,
}

impl From<WorkerLifecycle> for GenerationState {
    fn from(lifecycle: WorkerLifecycle) -> Self {
        match lifecycle {
            WorkerLifecycle::Installing | WorkerLifecycle::Installed => Self::Installing,
            WorkerLifecycle::Activating | WorkerLifecycle::Activated => Self::Active,
            WorkerLifecycle::Redundant => Self::Stale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCacheFailure {
    pub url: String,
    pub error: WorkerError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOutcome {
    pub cached: Vec<String>,
    pub failed: Vec<AssetCacheFailure>,
}

impl InstallOutcome {
    pub fn all_cached(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub enum FetchOutcome<R> {
    Network(R),
    Cached(R),
}

impl<R> FetchOutcome<R> {
    pub fn into_response(self) -> R {
        match self {
            Self::Network(response) | Self::Cached(response) => response,
        }
    }
}

/// Offline cache and notification logic of the service worker, independent of
/// the browser so it can run against any [`Platform`]
pub struct Agent<P> {
    platform: P,
    config: AgentConfig,
}

impl<P: Platform> Agent<P> {
    pub fn new(platform: P, config: AgentConfig) -> Self {
        Self { platform, config }
    }

    /// State of the agent's own generation, as the host sees the worker
    pub async fn state(&self) -> Result<GenerationState, WorkerError> {
        Ok(self.platform.lifecycle().await?.into())
    }

    /// Caches the manifest one asset at a time. Only skips waiting if every
    /// asset made it, otherwise the generation stays waiting so a later
    /// install can retry
    #[instrument(skip_all, fields(generation = %self.config.cache_name))]
    pub async fn install(&self) -> Result<InstallOutcome, WorkerError> {
        let mut outcome = InstallOutcome::default();
        for url in self.config.asset_urls() {
            match self.cache_asset(&url).await {
                Ok(()) => {
                    debug!("Cached {url}");
                    outcome.cached.push(url);
                },
                Err(error) => {
                    error!("Failed to cache {url}: {error}");
                    outcome.failed.push(AssetCacheFailure { url, error });
                },
            }
        }

        if outcome.all_cached() {
            info!("All {} assets cached, skipping waiting", outcome.cached.len());
            self.platform.skip_waiting().await?;
        } else {
            warn!(
                "{} of {} assets failed to cache, the next install will retry",
                outcome.failed.len(),
                outcome.failed.len() + outcome.cached.len(),
            );
        }

        Ok(outcome)
    }

    async fn cache_asset(&self, url: &str) -> Result<(), WorkerError> {
        let request = self.platform.new_request(url)?;
        let response = self.platform.fetch(&request).await?;

        let status = self.platform.status(&response);
        if !(200..300).contains(&status) {
            return Err(WorkerError::Status {
                url: url.to_string(),
                status,
            });
        }

        self.platform
            .cache_put(&self.config.cache_name, &request, &response)
            .await
    }

    /// Deletes every other generation, then takes control of open clients.
    /// Returns the names of the deleted generations
    #[instrument(skip_all, fields(generation = %self.config.cache_name))]
    pub async fn activate(&self) -> Result<Vec<String>, WorkerError> {
        let stale: Vec<String> = self
            .platform
            .cache_names()
            .await?
            .into_iter()
            .filter(|name| *name != self.config.cache_name)
            .collect();

        let results = join_all(stale.iter().map(|name| self.platform.cache_delete(name))).await;

        let mut deleted = Vec::with_capacity(stale.len());
        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(_) => {
                    info!("Deleted old cache {name}");
                    deleted.push(name);
                },
                Err(e) => error!("Failed to delete old cache {name}: {e}"),
            }
        }

        self.platform.claim_clients().await?;

        Ok(deleted)
    }

    /// Only GETs are handled by the worker
    pub fn intercepts(&self, request: &P::Request) -> bool {
        self.platform.describe(request).method == Method::GET
    }

    /// Builds the notification for the raw push data
    pub fn notification(&self, data: Option<&str>) -> (String, NotificationOptions) {
        let message = data.map(PushMessage::parse).unwrap_or_default();
        let icon = self.config.icon_url();

        let title = message
            .title
            .unwrap_or_else(|| self.config.default_title.clone());
        let options = NotificationOptions {
            body: message
                .body
                .unwrap_or_else(|| self.config.default_body.clone()),
            icon: icon.clone(),
            badge: icon,
            data: NotificationData {
                url: message.url.unwrap_or_else(|| self.config.scope_root()),
            },
        };

        (title, options)
    }

    #[instrument(skip_all)]
    pub async fn push(&self, data: Option<&str>) -> Result<(), WorkerError> {
        let (title, options) = self.notification(data);
        debug!("Showing notification {title:?} for {}", options.data.url);

        self.platform.show_notification(&title, &options).await
    }

    /// Focuses a window already at the notification's url or opens a new one
    #[instrument(skip_all)]
    pub async fn notification_click(&self, url: Option<&str>) -> Result<(), WorkerError> {
        let url = url
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.config.scope_root());

        if self.platform.focus_client(&url).await? {
            debug!("Focused existing window at {url}");
        } else {
            debug!("Opening {url}");
            self.platform.open_window(&url).await?;
        }

        Ok(())
    }

    /// Returns true if the message was understood
    pub async fn message(&self, data: Option<&str>) -> Result<bool, WorkerError> {
        match data {
            Some(SKIP_WAITING) => {
                info!("Got {SKIP_WAITING}");
                self.platform.skip_waiting().await?;
                Ok(true)
            },
            _ => {
                debug!("Ignoring unexpected message: {data:?}");
                Ok(false)
            },
        }
    }

    /// Every generation in storage with its state
    pub async fn generation_states(&self) -> Result<Vec<(String, GenerationState)>, WorkerError> {
        let own = self.state().await?;

        Ok(self
            .platform
            .cache_names()
            .await?
            .into_iter()
            .map(|name| {
                let state = if name == self.config.cache_name {
                    own
                } else {
                    GenerationState::Stale
                };
                (name, state)
            })
            .collect())
    }
}

impl<P> Agent<P>
where
    P: Platform + 'static,
    P::Request: 'static,
    P::Response: 'static,
{
    /// Network first, falling back to the cache when the network is
    /// unavailable. Returns `None` for requests the worker leaves to the host.
    ///
    /// The live response is handed back as soon as it arrives, the cached copy
    /// is written in the background.
    pub fn fetch(
        self: &Rc<Self>,
        request: P::Request,
    ) -> Option<impl Future<Output = Result<FetchOutcome<P::Response>, WorkerError>>> {
        if !self.intercepts(&request) {
            return None;
        }

        let agent = Rc::clone(self);
        Some(async move { agent.network_first(request).await })
    }

    async fn network_first(
        self: Rc<Self>,
        request: P::Request,
    ) -> Result<FetchOutcome<P::Response>, WorkerError> {
        match self.platform.fetch(&request).await {
            Ok(response) => {
                self.cache_in_background(request, &response);
                Ok(FetchOutcome::Network(response))
            },
            Err(e) => {
                debug!("{e}, falling back to the cache");
                match self
                    .platform
                    .cache_match(&self.config.cache_name, &request)
                    .await?
                {
                    Some(response) => Ok(FetchOutcome::Cached(response)),
                    None => Err(WorkerError::CacheMiss {
                        url: self.platform.describe(&request).url,
                    }),
                }
            },
        }
    }

    /// A failed write is only logged, the live response is unaffected
    fn cache_in_background(self: &Rc<Self>, request: P::Request, response: &P::Response) {
        let url = self.platform.describe(&request).url;
        let copy = match self.platform.copy_response(response) {
            Ok(copy) => copy,
            Err(e) => {
                warn!("Failed to copy {url} for the cache: {e}");
                return;
            },
        };

        let agent = Rc::clone(self);
        self.platform.spawn(Box::pin(async move {
            match agent
                .platform
                .cache_put(&agent.config.cache_name, &request, &copy)
                .await
            {
                Ok(()) => debug!("Cached {url}"),
                Err(e) => warn!("Failed to cache {url}: {e}"),
            }
        }));
    }
}
