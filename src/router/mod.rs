use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use matcher::{Match, Pattern};
pub use params::{ParamKey, ParameterSet};

use crate::{config::Config, resource::Resource};

mod matcher;
mod params;

#[derive(Error, Debug)]
#[error("no route matches {uri}")]
pub struct RouteNotFound {
    pub uri: String,
}

#[derive(Error, Debug)]
#[error("invalid route pattern {pattern}")]
pub struct InvalidPattern {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Error, Debug)]
#[error("could not load {handler_key} for route {route}")]
pub struct LoadFailed {
    pub route: String,
    pub handler_key: String,
}

/// Resolves a handler key to its implementation the first time a route
/// matches.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, handler_key: &str) -> anyhow::Result<Arc<dyn Resource>>;
}

impl<T> ResourceLoader for T
where
    T: Fn(&str) -> anyhow::Result<Arc<dyn Resource>> + Send + Sync,
{
    fn load(&self, handler_key: &str) -> anyhow::Result<Arc<dyn Resource>> {
        self(handler_key)
    }
}

/// What bootstrap code knows about a resource before the first request.
pub struct Registration {
    pattern: String,
    priority: i32,
    handler_key: String,
    namespace: String,
    resource: Option<Arc<dyn Resource>>,
}

impl Registration {
    pub fn new(pattern: impl Into<String>, handler_key: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            priority: 0,
            handler_key: handler_key.into(),
            namespace: String::new(),
            resource: None,
        }
    }

    /// Lower values take precedence.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Where the implementation lives; selects the mount prefix.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Registers an already built resource, skipping the loader.
    pub fn resource(mut self, resource: Arc<dyn Resource>) -> Self {
        self.resource = Some(resource);
        self
    }
}

pub struct Route {
    key: String,
    pattern: Pattern,
    priority: i32,
    handler_key: String,
    namespace: String,
    resource: Mutex<Option<Arc<dyn Resource>>>,
}

impl Route {
    pub(crate) fn new(key: String, registration: Registration) -> Result<Self, InvalidPattern> {
        let pattern = Pattern::compile(&key).map_err(|source| InvalidPattern {
            pattern: key.clone(),
            source,
        })?;

        Ok(Self {
            key,
            pattern,
            priority: registration.priority,
            handler_key: registration.handler_key,
            namespace: registration.namespace,
            resource: Mutex::new(registration.resource),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn handler_key(&self) -> &str {
        &self.handler_key
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_loaded(&self) -> bool {
        self.resource
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the implementation, loading it on first use. The lock is held
    /// across the load so concurrent first requests load it once.
    pub fn resource(
        &self,
        loader: Option<&dyn ResourceLoader>,
    ) -> anyhow::Result<Arc<dyn Resource>> {
        let mut slot = self.resource.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(resource) = slot.as_ref() {
            return Ok(Arc::clone(resource));
        }

        let failed = || LoadFailed {
            route: self.key.clone(),
            handler_key: self.handler_key.clone(),
        };
        let loader = loader.with_context(failed)?;
        let resource = loader.load(&self.handler_key).with_context(failed)?;
        if resource.name() != self.handler_key {
            warn!(
                route = %self.key,
                handler_key = %self.handler_key,
                resource = resource.name(),
                "loaded resource reports a different name"
            );
        }
        info!(
            route = %self.key,
            handler_key = %self.handler_key,
            resource = resource.name(),
            "loaded"
        );

        *slot = Some(Arc::clone(&resource));
        Ok(resource)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("priority", &self.priority)
            .field("handler_key", &self.handler_key)
            .field("namespace", &self.namespace)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Registered routes in registration order. Built before the first request
/// and only read afterwards.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    mounts: Vec<(String, String)>,
    loader: Option<Box<dyn ResourceLoader>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut table = Self::new();
        for (namespace, prefix) in &config.mounts {
            table = table.mount(namespace.clone(), prefix.clone());
        }
        table
    }

    pub fn mount(mut self, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.mounts.push((namespace.into(), prefix.into()));
        self
    }

    pub fn loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// The prefix of the longest mounted namespace containing `namespace`.
    fn mount_prefix(&self, namespace: &str) -> &str {
        self.mounts
            .iter()
            .filter(|(mounted, _)| {
                namespace == mounted
                    || namespace
                        .strip_prefix(mounted.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .max_by_key(|(mounted, _)| mounted.len())
            .map_or("", |(_, prefix)| prefix.as_str())
    }

    pub fn register(&mut self, registration: Registration) -> anyhow::Result<()> {
        let prefix = self.mount_prefix(&registration.namespace);
        let key = format!("{}{}", prefix, registration.pattern);
        let route = Route::new(key, registration)?;
        debug!(route = %route.key, priority = route.priority, "register");

        if let Some(existing) = self.routes.iter_mut().find(|r| r.key == route.key) {
            warn!(route = %route.key, "route registered twice, replacing");
            *existing = route;
        } else {
            self.routes.push(route);
        }
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn get(&self, key: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.key == key)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn find(&self, base_uri: &str, canonical_uri: &str) -> Result<Match<'_>, RouteNotFound> {
        let Some(m) = matcher::pattern_match(&self.routes, base_uri, canonical_uri) else {
            info!(uri = canonical_uri, "no route");
            return Err(RouteNotFound {
                uri: canonical_uri.to_owned(),
            });
        };
        info!("match: {}", m.route.key);
        Ok(m)
    }

    pub fn load(&self, route: &Route) -> anyhow::Result<Arc<dyn Resource>> {
        route.resource(self.loader.as_deref())
    }
}
