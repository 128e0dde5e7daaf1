// File: src/module.rs
// Purpose: Route module descriptors, the shared module cache, and loader/prefetch seams

use crate::fetch::Submission;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use trellis_routes::RouteRecord;
use url::Url;

/// Arguments handed to a per-route revalidation predicate.
#[derive(Debug, Clone)]
pub struct ReloadArgs {
    /// URL being navigated to.
    pub url: Url,
    /// URL being navigated away from.
    pub prev_url: Url,
    /// Params matched for the route on this navigation.
    pub params: HashMap<String, String>,
    /// Submission that triggered the revalidation, if any.
    pub submission: Option<Submission>,
}

impl ReloadArgs {
    pub fn new(url: Url, prev_url: Url) -> Self {
        Self {
            url,
            prev_url,
            params: HashMap::new(),
            submission: None,
        }
    }
}

/// Custom revalidation predicate exposed by a route module.
pub type ReloadPredicate = Arc<dyn Fn(&ReloadArgs) -> bool + Send + Sync>;

/// Loaded module descriptor for a route.
///
/// The optional `should_reload` override is modeled as presence/absence
/// of the field; absence means "revalidate on every navigation".
pub struct RouteModule {
    /// Route id this module was loaded for.
    pub id: String,
    /// Style-sheet hrefs prefetched alongside the module.
    pub styles: Vec<String>,
    /// Optional revalidation override.
    pub should_reload: Option<ReloadPredicate>,
}

impl RouteModule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            styles: Vec::new(),
            should_reload: None,
        }
    }

    /// Sets the style-sheet hrefs (builder style).
    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = styles.into_iter().map(|href| href.into()).collect();
        self
    }

    /// Sets the revalidation override (builder style).
    pub fn with_should_reload(mut self, predicate: ReloadPredicate) -> Self {
        self.should_reload = Some(predicate);
        self
    }
}

impl fmt::Debug for RouteModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteModule")
            .field("id", &self.id)
            .field("styles", &self.styles)
            .field("has_should_reload", &self.should_reload.is_some())
            .finish()
    }
}

/// Shared append-only mapping of route id → loaded module.
///
/// Passed into the engine explicitly rather than living as an ambient
/// singleton, so independent consumers can share one cache. Entries are
/// cached at most once per id for the process lifetime and never evicted
/// here; eviction, if any, is a collaborator concern.
#[derive(Clone, Default)]
pub struct ModuleCache {
    modules: Arc<RwLock<HashMap<String, Arc<RouteModule>>>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached module for `id`, if loaded.
    pub async fn get(&self, id: &str) -> Option<Arc<RouteModule>> {
        self.modules.read().await.get(id).cloned()
    }

    /// Inserts a freshly loaded module, returning the shared handle.
    pub async fn insert(&self, module: RouteModule) -> Arc<RouteModule> {
        let module = Arc::new(module);
        self.modules
            .write()
            .await
            .insert(module.id.clone(), Arc::clone(&module));
        module
    }

    /// Whether `id` is already cached.
    pub async fn contains(&self, id: &str) -> bool {
        self.modules.read().await.contains_key(id)
    }

    /// Number of cached modules.
    pub async fn size(&self) -> usize {
        self.modules.read().await.len()
    }
}

/// Module loading collaborator; bundler and loader internals live behind
/// it. The engine guarantees at-most-one `load` call per cached id.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self, route: &RouteRecord) -> Result<RouteModule>;
}

/// Style-sheet prefetching collaborator.
#[async_trait]
pub trait StylePrefetcher: Send + Sync {
    async fn prefetch(&self, module: &RouteModule) -> Result<()>;
}
