// File: src/engine.rs
// Purpose: Route data execution engine and the navigable route tree

use crate::error::{CatchSignal, RouteDataError};
use crate::fetch::{is_catch_response, DataFetcher, FetchResponse, Submission};
use crate::module::{ModuleCache, ModuleLoader, ReloadArgs, RouteModule, StylePrefetcher};
use crate::redirect::{RedirectCheck, RedirectDescriptor, RedirectInterceptor};
use anyhow::anyhow;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use trellis_routes::{build_route_tree, RouteManifest, RouteRecord, RouteTreeNode};
use url::Url;

/// Arguments for one loader or action invocation.
///
/// The cancellation token belongs to this navigation or submission
/// attempt and is threaded through to the fetch collaborator untouched.
#[derive(Debug, Clone)]
pub struct DataFnArgs {
    /// Params resolved by URL matching.
    pub params: HashMap<String, String>,
    /// Target URL of the navigation.
    pub url: Url,
    /// Submission payload, for data-mutating navigations.
    pub submission: Option<Submission>,
    /// Cancellation token for this attempt.
    pub token: CancellationToken,
}

impl DataFnArgs {
    pub fn new(url: Url) -> Self {
        Self {
            params: HashMap::new(),
            url,
            submission: None,
            token: CancellationToken::new(),
        }
    }

    /// Sets the matched params (builder style).
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Sets the submission payload (builder style).
    pub fn with_submission(mut self, submission: Submission) -> Self {
        self.submission = Some(submission);
        self
    }
}

/// Successful result of a loader or action.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDataOutcome {
    /// Extracted route data; `None` when the route declares no loader.
    Data(Option<JsonValue>),
    /// Same-origin redirect for the router to follow. Overrides any data
    /// the response carried.
    Redirect(RedirectDescriptor),
    /// Cross-origin target. Terminal: the caller replaces the whole
    /// application location and no route data is produced.
    ExternalNavigation(Url),
}

/// Executes per-route data operations during navigation.
///
/// Wraps the fetch, module-loading, and style-prefetching collaborators
/// with redirect interception and the two-tier error model. One engine
/// serves a whole route tree; the module cache it carries may be shared
/// with other consumers of the same manifest.
pub struct RouteDataEngine {
    fetcher: Arc<dyn DataFetcher>,
    loader: Arc<dyn ModuleLoader>,
    prefetcher: Arc<dyn StylePrefetcher>,
    cache: ModuleCache,
    interceptor: RedirectInterceptor,
}

impl RouteDataEngine {
    /// Engine with a fresh private module cache.
    pub fn new(
        origin: Url,
        fetcher: Arc<dyn DataFetcher>,
        loader: Arc<dyn ModuleLoader>,
        prefetcher: Arc<dyn StylePrefetcher>,
    ) -> Self {
        Self::with_cache(origin, fetcher, loader, prefetcher, ModuleCache::new())
    }

    /// Engine sharing an existing module cache with other consumers.
    pub fn with_cache(
        origin: Url,
        fetcher: Arc<dyn DataFetcher>,
        loader: Arc<dyn ModuleLoader>,
        prefetcher: Arc<dyn StylePrefetcher>,
        cache: ModuleCache,
    ) -> Self {
        Self {
            fetcher,
            loader,
            prefetcher,
            cache,
            interceptor: RedirectInterceptor::new(origin),
        }
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    pub fn interceptor(&self) -> &RedirectInterceptor {
        &self.interceptor
    }

    /// Runs the loader path for `record`.
    ///
    /// Fetch and module load start together, and both settle before the
    /// result is inspected; a redirect therefore never skips module
    /// loading on this path. Routes without a loader still load their
    /// module and styles, and resolve to no data.
    pub async fn run_loader(
        &self,
        record: &RouteRecord,
        args: &DataFnArgs,
    ) -> Result<RouteDataOutcome, RouteDataError> {
        if !record.has_loader {
            self.load_route_module(record).await?;
            return Ok(RouteDataOutcome::Data(None));
        }

        let (fetched, module) = tokio::join!(
            self.fetcher.fetch(
                &args.url,
                &record.id,
                args.token.clone(),
                args.submission.as_ref(),
            ),
            self.load_route_module(record),
        );
        let response = fetched?;
        module?;

        match self.interceptor.check(&response)? {
            RedirectCheck::SameOrigin(redirect) => Ok(RouteDataOutcome::Redirect(redirect)),
            RedirectCheck::ExternalNavigation(url) => {
                Ok(RouteDataOutcome::ExternalNavigation(url))
            }
            RedirectCheck::None => self.finish(&response),
        }
    }

    /// Runs the action path for `record`.
    ///
    /// The fetch always runs, even when the route declares no action
    /// handler; that mismatch is logged, not fatal. The module is loaded
    /// only after the fetch settles and only when no redirect occurred,
    /// so redirected submissions skip the module cost entirely.
    pub async fn run_action(
        &self,
        record: &RouteRecord,
        args: &DataFnArgs,
    ) -> Result<RouteDataOutcome, RouteDataError> {
        if !record.has_action {
            warn!(
                route_id = %record.id,
                "submission to a route without an action handler"
            );
        }

        let response = self
            .fetcher
            .fetch(
                &args.url,
                &record.id,
                args.token.clone(),
                args.submission.as_ref(),
            )
            .await?;

        match self.interceptor.check(&response)? {
            RedirectCheck::SameOrigin(redirect) => {
                return Ok(RouteDataOutcome::Redirect(redirect))
            }
            RedirectCheck::ExternalNavigation(url) => {
                return Ok(RouteDataOutcome::ExternalNavigation(url))
            }
            RedirectCheck::None => {}
        }

        self.load_route_module(record).await?;
        self.finish(&response)
    }

    /// Revalidation predicate for `record`: delegates to the module's
    /// override when it has one, else revalidates on every navigation.
    ///
    /// # Panics
    ///
    /// Panics if the route's module is not in the cache yet. The
    /// predicate is meaningless without the loaded module, so the call
    /// is engine misuse rather than an application-level failure.
    pub async fn should_reload(&self, record: &RouteRecord, args: &ReloadArgs) -> bool {
        let Some(module) = self.cache.get(&record.id).await else {
            panic!(
                "shouldReload invoked for route `{}` before its module was loaded",
                record.id
            );
        };
        match &module.should_reload {
            Some(predicate) => predicate(args),
            None => true,
        }
    }

    /// Builds the navigable tree for `manifest`, attaching the loader,
    /// action, and shouldReload operations to every node.
    pub fn build_tree(self: &Arc<Self>, manifest: &RouteManifest) -> Vec<NavRoute> {
        let engine = Arc::clone(self);
        build_route_tree(manifest, move |record| {
            NavRoute::from_record(record, Arc::clone(&engine))
        })
    }

    /// Idempotent get-or-load followed by style prefetch. An id already
    /// cached is never handed to the loader again; style prefetch runs
    /// on every request, cache hit or not.
    async fn load_route_module(
        &self,
        record: &RouteRecord,
    ) -> Result<Arc<RouteModule>, RouteDataError> {
        let module = match self.cache.get(&record.id).await {
            Some(module) => module,
            None => {
                debug!(route_id = %record.id, module = %record.module, "loading route module");
                let module = self.loader.load(record).await?;
                self.cache.insert(module).await
            }
        };
        self.prefetcher.prefetch(&module).await?;
        Ok(module)
    }

    /// Catch classification and payload extraction for a settled,
    /// non-redirect response.
    fn finish(&self, response: &FetchResponse) -> Result<RouteDataOutcome, RouteDataError> {
        if is_catch_response(response) {
            return Err(RouteDataError::Catch(CatchSignal {
                status: response.status,
                status_text: response.status_text().to_string(),
                payload: response.extract_payload()?,
            }));
        }
        Ok(RouteDataOutcome::Data(Some(response.extract_payload()?)))
    }
}

enum NavKind {
    Route {
        record: RouteRecord,
        engine: Arc<RouteDataEngine>,
    },
    Folder,
}

/// Hierarchical route node with data operations attached.
///
/// Produced by [`RouteDataEngine::build_tree`]. Synthetic folder nodes
/// inserted for sibling disambiguation own a path but no module: their
/// loader resolves to no data without touching any collaborator, their
/// action is a structural failure, and they never ask to revalidate.
pub struct NavRoute {
    pub id: String,
    pub path: Option<String>,
    pub index: bool,
    pub case_sensitive: bool,
    pub has_loader: bool,
    pub has_action: bool,
    pub has_error_boundary: bool,
    pub has_catch_boundary: bool,
    /// Module reference from the manifest; folder nodes have none.
    pub module: Option<String>,
    pub children: Vec<NavRoute>,
    kind: NavKind,
}

impl NavRoute {
    fn from_record(record: &RouteRecord, engine: Arc<RouteDataEngine>) -> Self {
        Self {
            id: record.id.clone(),
            path: record.path.clone(),
            index: record.index,
            case_sensitive: record.case_sensitive,
            has_loader: record.has_loader,
            has_action: record.has_action,
            has_error_boundary: record.has_error_boundary,
            has_catch_boundary: record.has_catch_boundary,
            module: Some(record.module.clone()),
            children: Vec::new(),
            kind: NavKind::Route {
                record: record.clone(),
                engine,
            },
        }
    }

    /// Whether this node is a synthetic folder ancestor.
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NavKind::Folder)
    }

    /// Loader operation bound to this node.
    pub async fn loader(&self, args: &DataFnArgs) -> Result<RouteDataOutcome, RouteDataError> {
        match &self.kind {
            NavKind::Route { record, engine } => engine.run_loader(record, args).await,
            NavKind::Folder => Ok(RouteDataOutcome::Data(None)),
        }
    }

    /// Action operation bound to this node.
    pub async fn action(&self, args: &DataFnArgs) -> Result<RouteDataOutcome, RouteDataError> {
        match &self.kind {
            NavKind::Route { record, engine } => engine.run_action(record, args).await,
            NavKind::Folder => Err(RouteDataError::Structural(anyhow!(
                "submission targeted synthetic folder route `{}`",
                self.id
            ))),
        }
    }

    /// Revalidation predicate bound to this node.
    pub async fn should_reload(&self, args: &ReloadArgs) -> bool {
        match &self.kind {
            NavKind::Route { record, engine } => engine.should_reload(record, args).await,
            NavKind::Folder => false,
        }
    }
}

impl fmt::Debug for NavRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavRoute")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("index", &self.index)
            .field("children", &self.children)
            .finish()
    }
}

impl RouteTreeNode for NavRoute {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn clear_path(&mut self) {
        self.path = None;
    }

    fn attach_children(&mut self, children: Vec<Self>) {
        self.children = children;
    }

    fn folder(id: String, path: String, children: Vec<Self>) -> Self {
        Self {
            id,
            path: Some(path),
            index: false,
            case_sensitive: false,
            has_loader: false,
            has_action: false,
            has_error_boundary: false,
            has_catch_boundary: false,
            module: None,
            children,
            kind: NavKind::Folder,
        }
    }
}
