use std::collections::{HashMap, HashSet};

use axum::{Router, http::Method, routing::MethodRouter};
use thiserror::Error;

/// A single handler bound to a method and a path, plus the endpoint name it
/// is registered under.
pub struct Route<S = ()> {
    endpoint: String,
    method: Method,
    path: String,
    handler: MethodRouter<S>,
}

impl<S> Route<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(
        endpoint: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        handler: MethodRouter<S>,
    ) -> Self {
        Route {
            endpoint: endpoint.into(),
            method,
            path: path.into(),
            handler,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A named collection of routes that is mounted onto an application under a
/// path prefix.
pub struct Blueprint<S = ()> {
    name: String,
    routes: Vec<Route<S>>,
}

impl<S> Blueprint<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Blueprint {
            name: name.into(),
            routes: Vec::new(),
        }
    }

    pub fn route(
        mut self,
        endpoint: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        handler: MethodRouter<S>,
    ) -> Self {
        self.routes.push(Route::new(endpoint, method, path, handler));
        self
    }

    /// Adds every route a controller contributes.
    pub fn controller<C>(mut self) -> Self
    where
        C: crate::controller::Controller<S>,
    {
        self.routes.extend(C::routes());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteConflict {
    #[error("a blueprint named `{0}` is already registered")]
    DuplicateBlueprint(String),
    #[error("endpoint `{0}` is already registered")]
    DuplicateEndpoint(String),
    #[error("`{method} {path}` is already registered by `{existing}`")]
    DuplicateRoute {
        method: Method,
        path: String,
        existing: String,
    },
    #[error("`{path}` overlaps `{existing}` with different parameter names")]
    AmbiguousPath { path: String, existing: String },
}

/// Every route mounted so far, together with the router built from them.
pub struct RouteTable<S = ()> {
    blueprints: HashSet<String>,
    endpoints: HashSet<String>,
    // (method, path shape) -> endpoint
    methods: HashMap<(Method, String), String>,
    // path shape -> concrete path
    shapes: HashMap<String, String>,
    router: Router<S>,
}

impl<S> Default for RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        RouteTable {
            blueprints: HashSet::new(),
            endpoints: HashSet::new(),
            methods: HashMap::new(),
            shapes: HashMap::new(),
            router: Router::new(),
        }
    }
}

impl<S> RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `blueprint` under `prefix`.
    ///
    /// Every route is checked before any of them is added, so a rejected
    /// blueprint leaves the table untouched.
    pub fn mount(&mut self, blueprint: Blueprint<S>, prefix: &str) -> Result<(), RouteConflict> {
        if self.blueprints.contains(&blueprint.name) {
            return Err(RouteConflict::DuplicateBlueprint(blueprint.name));
        }

        let mut endpoints = HashSet::new();
        let mut methods: HashMap<(Method, String), String> = HashMap::new();
        let mut shapes: HashMap<String, String> = HashMap::new();
        let mut planned = Vec::with_capacity(blueprint.routes.len());

        for route in &blueprint.routes {
            let endpoint = format!("{}.{}", blueprint.name, route.endpoint);
            if self.endpoints.contains(&endpoint) || !endpoints.insert(endpoint.clone()) {
                return Err(RouteConflict::DuplicateEndpoint(endpoint));
            }

            let path = join_path(prefix, &route.path);
            let shape = path_shape(&path);

            let existing_path = self.shapes.get(&shape).or_else(|| shapes.get(&shape));
            if let Some(existing) = existing_path {
                if *existing != path {
                    return Err(RouteConflict::AmbiguousPath {
                        path,
                        existing: existing.clone(),
                    });
                }
            }

            let key = (route.method.clone(), shape.clone());
            let existing_endpoint = self.methods.get(&key).or_else(|| methods.get(&key));
            if let Some(existing) = existing_endpoint {
                return Err(RouteConflict::DuplicateRoute {
                    method: route.method.clone(),
                    path,
                    existing: existing.clone(),
                });
            }

            methods.insert(key, endpoint.clone());
            shapes.insert(shape, path.clone());
            planned.push(path);
        }

        let mut router = std::mem::take(&mut self.router);
        for (route, path) in blueprint.routes.into_iter().zip(planned) {
            tracing::debug!(endpoint = %route.endpoint, method = %route.method, %path, "route registered");
            router = router.route(&path, route.handler);
        }
        self.router = router;

        self.blueprints.insert(blueprint.name);
        self.endpoints.extend(endpoints);
        self.methods.extend(methods);
        self.shapes.extend(shapes);

        Ok(())
    }

    pub fn contains_endpoint(&self, endpoint: &str) -> bool {
        self.endpoints.contains(endpoint)
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

/// Joins a mount prefix and a route path into a single absolute path.
pub fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let mut joined = String::with_capacity(prefix.len() + path.len() + 2);
    if !prefix.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(prefix);
    if !joined.ends_with('/') {
        joined.push('/');
    }
    joined.push_str(path);
    joined
}

// `/jobs/{uuid}` and `/jobs/{id}` match the same requests.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("{*") {
                "{*}"
            } else if segment.starts_with('{') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{delete, get, post};

    fn jobs() -> Blueprint {
        Blueprint::new("api")
            .route("jobs.index", Method::GET, "/jobs/", get(|| async { "jobs" }))
            .route("jobs.create", Method::POST, "/jobs/", post(|| async { "created" }))
            .route("jobs.show", Method::GET, "/jobs/{uuid}", get(|| async { "job" }))
    }

    #[test]
    fn join_path_normalises_slashes() {
        assert_eq!(join_path("/api", "/jobs/"), "/api/jobs/");
        assert_eq!(join_path("/api/", "jobs"), "/api/jobs");
        assert_eq!(join_path("api", "/jobs/{uuid}"), "/api/jobs/{uuid}");
        assert_eq!(join_path("", "/swagger.json"), "/swagger.json");
        assert_eq!(join_path("/", "/"), "/");
    }

    #[test]
    fn mount_registers_prefixed_endpoints() {
        let mut table = RouteTable::new();
        table.mount(jobs(), "/api").expect("first mount succeeds");

        assert_eq!(table.endpoint_count(), 3);
        assert!(table.contains_endpoint("api.jobs.index"));
        assert!(table.contains_endpoint("api.jobs.show"));
    }

    #[test]
    fn same_blueprint_name_twice_is_rejected() {
        let mut table = RouteTable::new();
        table.mount(jobs(), "/api").expect("first mount succeeds");

        let err = table.mount(jobs(), "/v2").expect_err("name collision");
        assert_eq!(err, RouteConflict::DuplicateBlueprint("api".into()));
        assert_eq!(table.endpoint_count(), 3);
    }

    #[test]
    fn duplicate_endpoint_inside_blueprint_is_rejected() {
        let blueprint = Blueprint::<()>::new("api")
            .route("jobs.index", Method::GET, "/jobs/", get(|| async { "a" }))
            .route("jobs.index", Method::GET, "/other/", get(|| async { "b" }));

        let mut table = RouteTable::new();
        let err = table.mount(blueprint, "/api").expect_err("endpoint collision");
        assert_eq!(err, RouteConflict::DuplicateEndpoint("api.jobs.index".into()));
        assert_eq!(table.endpoint_count(), 0);
    }

    #[test]
    fn same_method_and_path_across_blueprints_is_rejected() {
        let mut table = RouteTable::new();
        table.mount(jobs(), "/api").expect("first mount succeeds");

        let other = Blueprint::<()>::new("legacy")
            .route("list", Method::GET, "/api/jobs/", get(|| async { "legacy" }));
        let err = table.mount(other, "/").expect_err("route collision");

        match err {
            RouteConflict::DuplicateRoute { method, path, existing } => {
                assert_eq!(method, Method::GET);
                assert_eq!(path, "/api/jobs/");
                assert_eq!(existing, "api.jobs.index");
            }
            other => panic!("unexpected conflict: {other:?}"),
        }
        assert!(!table.contains_endpoint("legacy.list"));
    }

    #[test]
    fn different_parameter_names_on_same_shape_are_rejected() {
        let blueprint = Blueprint::<()>::new("api")
            .route("jobs.show", Method::GET, "/jobs/{uuid}", get(|| async { "a" }))
            .route("jobs.delete", Method::DELETE, "/jobs/{id}", delete(|| async { "b" }));

        let mut table = RouteTable::new();
        let err = table.mount(blueprint, "/api").expect_err("ambiguous path");
        assert_eq!(
            err,
            RouteConflict::AmbiguousPath {
                path: "/api/jobs/{id}".into(),
                existing: "/api/jobs/{uuid}".into(),
            }
        );
    }

    #[test]
    fn different_methods_share_a_path() {
        let blueprint = Blueprint::<()>::new("api")
            .route("jobs.show", Method::GET, "/jobs/{uuid}", get(|| async { "a" }))
            .route("jobs.delete", Method::DELETE, "/jobs/{uuid}", delete(|| async { "b" }));

        let mut table = RouteTable::new();
        table.mount(blueprint, "/api").expect("methods do not overlap");
        assert_eq!(table.endpoint_count(), 2);
    }
}
