use std::{cell::RefCell, rc::Rc};

use async_trait::async_trait;
use console_error_panic_hook::set_once as set_panic_hook;
use futures::future::LocalBoxFuture;
use gloo::utils::format::JsValueSerdeExt;
use http::Method;
use js_sys::{Array, Promise, Reflect};
use serde::Serialize;
use shared::configure_tracing_once;
use tracing::warn;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{
    Cache, ClientQueryOptions, ClientType, FetchEvent, MessageEvent, NotificationEvent, PushEvent,
    Request, RequestInit, Response, ServiceWorker, ServiceWorkerGlobalScope, ServiceWorkerState,
    Url, WindowClient,
};

use crate::{
    Agent, AgentConfig, AssetRequest, GenerationState, NotificationData, NotificationOptions,
    Platform, WorkerError, WorkerLifecycle,
};

impl From<JsValue> for WorkerError {
    fn from(value: JsValue) -> Self {
        Self::Host(format!("{value:?}"))
    }
}

impl From<WorkerError> for JsValue {
    fn from(err: WorkerError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

impl From<ServiceWorkerState> for WorkerLifecycle {
    fn from(state: ServiceWorkerState) -> Self {
        match state {
            ServiceWorkerState::Installed => Self::Installed,
            ServiceWorkerState::Activating => Self::Activating,
            ServiceWorkerState::Activated => Self::Activated,
            ServiceWorkerState::Redundant => Self::Redundant,
            _ => Self::Installing,
        }
    }
}

/// [`Platform`] backed by the service worker global scope
pub struct WebPlatform {
    sw: ServiceWorkerGlobalScope,
}

impl WebPlatform {
    pub fn new(sw: ServiceWorkerGlobalScope) -> Self {
        Self { sw }
    }

    async fn open_cache(&self, generation: &str) -> Result<Cache, WorkerError> {
        let caches = self.sw.caches()?;
        let cache = JsFuture::from(caches.open(generation))
            .await
            .map_err(|e| WorkerError::Cache(format!("open {generation}: {e:?}")))?;
        Ok(cache.unchecked_into())
    }

    fn absolute_url(&self, url: &str) -> Result<String, WorkerError> {
        Ok(Url::new_with_base(url, &self.sw.location().href())?.href())
    }

    /// `self.serviceWorker` isn't in the generated bindings and older
    /// browsers lack it. Without it the registration is the best guess
    fn own_worker(&self) -> Result<Option<ServiceWorker>, WorkerError> {
        let worker = Reflect::get(&self.sw, &JsValue::from_str("serviceWorker"))?;
        if worker.is_undefined() || worker.is_null() {
            Ok(None)
        } else {
            Ok(Some(worker.unchecked_into()))
        }
    }
}

#[async_trait(?Send)]
impl Platform for WebPlatform {
    type Request = Request;
    type Response = Response;

    fn new_request(&self, url: &str) -> Result<Request, WorkerError> {
        let init = RequestInit::new();
        init.set_method(Method::GET.as_str());
        Ok(Request::new_with_str_and_init(url, &init)?)
    }

    fn describe(&self, request: &Request) -> AssetRequest {
        let method = Method::from_bytes(request.method().as_bytes()).unwrap_or_else(|_| {
            warn!("Unrecognised method {}", request.method());
            Method::POST
        });

        AssetRequest {
            method,
            url: request.url(),
        }
    }

    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        let response = JsFuture::from(self.sw.fetch_with_request(request))
            .await
            .map_err(|e| WorkerError::network(request.url(), format!("{e:?}")))?;

        response
            .dyn_into::<Response>()
            .map_err(|v| WorkerError::network(request.url(), format!("not a Response: {v:?}")))
    }

    fn status(&self, response: &Response) -> u16 {
        response.status()
    }

    fn copy_response(&self, response: &Response) -> Result<Response, WorkerError> {
        Ok(response.clone()?)
    }

    async fn cache_put(
        &self,
        generation: &str,
        request: &Request,
        response: &Response,
    ) -> Result<(), WorkerError> {
        let cache = self.open_cache(generation).await?;

        JsFuture::from(cache.put_with_request(request, response))
            .await
            .map_err(|e| WorkerError::Cache(format!("put {}: {e:?}", request.url())))?;
        Ok(())
    }

    async fn cache_match(
        &self,
        generation: &str,
        request: &Request,
    ) -> Result<Option<Response>, WorkerError> {
        let cache = self.open_cache(generation).await?;
        let cached = JsFuture::from(cache.match_with_request(request))
            .await
            .map_err(|e| WorkerError::Cache(format!("match {}: {e:?}", request.url())))?;

        if cached.is_undefined() {
            Ok(None)
        } else {
            Ok(Some(cached.dyn_into::<Response>().map_err(|v| {
                WorkerError::Cache(format!("match {} returned {v:?}", request.url()))
            })?))
        }
    }

    async fn cache_names(&self) -> Result<Vec<String>, WorkerError> {
        let keys: Array = JsFuture::from(self.sw.caches()?.keys())
            .await?
            .unchecked_into();

        Ok(keys.iter().filter_map(|k| k.as_string()).collect())
    }

    async fn cache_delete(&self, generation: &str) -> Result<bool, WorkerError> {
        let deleted = JsFuture::from(self.sw.caches()?.delete(generation))
            .await
            .map_err(|e| WorkerError::Cache(format!("delete {generation}: {e:?}")))?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        spawn_local(task);
    }

    async fn lifecycle(&self) -> Result<WorkerLifecycle, WorkerError> {
        if let Some(worker) = self.own_worker()? {
            return Ok(worker.state().into());
        }

        let registration = self.sw.registration();
        let settled = registration.installing().is_none() && registration.waiting().is_none();
        if settled && registration.active().is_some() {
            Ok(WorkerLifecycle::Activated)
        } else {
            Ok(WorkerLifecycle::Installing)
        }
    }

    async fn skip_waiting(&self) -> Result<(), WorkerError> {
        JsFuture::from(self.sw.skip_waiting()?).await?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), WorkerError> {
        JsFuture::from(self.sw.clients().claim()).await?;
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), WorkerError> {
        let js_options = web_sys::NotificationOptions::new();
        js_options.set_body(&options.body);
        js_options.set_icon(&options.icon);
        js_options.set_badge(&options.badge);
        js_options.set_data(
            &<JsValue as JsValueSerdeExt>::from_serde(&options.data)
                .map_err(|e| WorkerError::Host(e.to_string()))?,
        );

        JsFuture::from(
            self.sw
                .registration()
                .show_notification_with_options(title, &js_options)?,
        )
        .await?;
        Ok(())
    }

    async fn focus_client(&self, url: &str) -> Result<bool, WorkerError> {
        let target = self.absolute_url(url)?;

        let query = ClientQueryOptions::new();
        query.set_include_uncontrolled(true);
        query.set_type(ClientType::Window);
        let clients: Array = JsFuture::from(self.sw.clients().match_all_with_options(&query))
            .await?
            .unchecked_into();

        for client in clients.iter() {
            let Ok(client) = client.dyn_into::<WindowClient>() else {
                continue;
            };
            if client.url() == target {
                JsFuture::from(client.focus()?).await?;
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn open_window(&self, url: &str) -> Result<(), WorkerError> {
        JsFuture::from(self.sw.clients().open_window(url)).await?;
        Ok(())
    }
}

thread_local! {
    static AGENT: RefCell<Option<Rc<Agent<WebPlatform>>>> = const { RefCell::new(None) };
}

/// Every entry point goes through here. The agent lives as long as the worker
fn agent(sw: ServiceWorkerGlobalScope) -> Rc<Agent<WebPlatform>> {
    set_panic_hook();
    configure_tracing_once();

    AGENT.with(|agent| {
        agent
            .borrow_mut()
            .get_or_insert_with(|| {
                Rc::new(Agent::new(WebPlatform::new(sw), AgentConfig::default()))
            })
            .clone()
    })
}

/// Resolves to true if every asset was cached
#[wasm_bindgen]
pub fn worker_install(sw: ServiceWorkerGlobalScope) -> Promise {
    let agent = agent(sw);

    future_to_promise(async move {
        let outcome = agent.install().await?;
        Ok(JsValue::from_bool(outcome.all_cached()))
    })
}

#[wasm_bindgen]
pub fn worker_activate(sw: ServiceWorkerGlobalScope) -> Promise {
    let agent = agent(sw);

    future_to_promise(async move {
        agent.activate().await?;
        Ok(JsValue::undefined())
    })
}

/// Calls `respondWith` for the requests the agent intercepts, leaves the rest
/// to the browser
#[wasm_bindgen]
pub fn worker_fetch(sw: ServiceWorkerGlobalScope, event: FetchEvent) -> Result<(), JsValue> {
    let agent = agent(sw);

    let Some(outcome) = agent.fetch(event.request()) else {
        return Ok(());
    };
    let response = future_to_promise(async move { Ok(outcome.await?.into_response().into()) });
    event.respond_with(&response)
}

#[wasm_bindgen]
pub fn worker_message(sw: ServiceWorkerGlobalScope, event: MessageEvent) -> Promise {
    let agent = agent(sw);
    let data = event.data().as_string();

    future_to_promise(async move {
        agent.message(data.as_deref()).await?;
        Ok(JsValue::undefined())
    })
}

#[wasm_bindgen]
pub fn worker_push(sw: ServiceWorkerGlobalScope, event: PushEvent) -> Promise {
    let agent = agent(sw);
    let data = event.data().map(|d| d.text());

    future_to_promise(async move {
        agent.push(data.as_deref()).await?;
        Ok(JsValue::undefined())
    })
}

#[wasm_bindgen]
pub fn worker_notification_click(sw: ServiceWorkerGlobalScope, event: NotificationEvent) -> Promise {
    let agent = agent(sw);

    let notification = event.notification();
    notification.close();
    let url = JsValueSerdeExt::into_serde::<NotificationData>(&notification.data())
        .ok()
        .map(|d| d.url);

    future_to_promise(async move {
        agent.notification_click(url.as_deref()).await?;
        Ok(JsValue::undefined())
    })
}

#[derive(Serialize)]
struct Generation {
    name: String,
    state: GenerationState,
}

/// Resolves to `[{name, state}]` for every generation in storage
#[wasm_bindgen]
pub fn worker_generations(sw: ServiceWorkerGlobalScope) -> Promise {
    let agent = agent(sw);

    future_to_promise(async move {
        let generations: Vec<Generation> = agent
            .generation_states()
            .await?
            .into_iter()
            .map(|(name, state)| Generation { name, state })
            .collect();

        <JsValue as JsValueSerdeExt>::from_serde(&generations)
            .map_err(|e| WorkerError::Host(e.to_string()).into())
    })
}
