//! Sub-route dispatch registry
//!
//! 显式注册表：(资源, 子路由, HTTP 方法) → 处理函数。
//! 启动时构建一次并校验唯一性，取代按 `<subroute>_<verb>` 约定的
//! 运行时反射查找，路由集合因此可枚举、可测试。

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::http::Method;
use serde_json::Value;

use crate::errors::{AddrGateError, Result};
use crate::services::AddressService;

pub type HandlerFuture = Pin<Box<dyn Future<Output = HttpResponse>>>;

/// Boxed sub-route handler: receives the shared address service and the
/// parsed request body, returns the complete HTTP response.
pub type SubRouteHandler = Arc<dyn Fn(Arc<AddressService>, Value) -> HandlerFuture + Send + Sync>;

/// Wrap an async fn into a registrable handler.
pub fn handler<F, Fut>(func: F) -> SubRouteHandler
where
    F: Fn(Arc<AddressService>, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + 'static,
{
    Arc::new(move |service, body| Box::pin(func(service, body)))
}

/// Named operations of one resource, keyed by (sub-route, verb).
pub struct RouteTable {
    resource: &'static str,
    handlers: HashMap<(String, Method), SubRouteHandler>,
}

impl RouteTable {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            handlers: HashMap::new(),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Register an operation. A duplicate (sub-route, verb) pair is a
    /// startup error, not a silent overwrite.
    pub fn register(&mut self, subroute: &str, method: Method, handler: SubRouteHandler) -> Result<()> {
        let key = (subroute.to_string(), method);
        if self.handlers.contains_key(&key) {
            return Err(AddrGateError::validation(format!(
                "Duplicate route registration: {} /{}/{}",
                key.1, self.resource, key.0
            )));
        }

        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Exact, case-sensitive match only. No fallback, no partial match.
    pub fn resolve(&self, subroute: &str, method: &Method) -> Option<SubRouteHandler> {
        self.handlers
            .get(&(subroute.to_string(), method.clone()))
            .cloned()
    }

    /// Registered (sub-route, verb) pairs, sorted for stable output.
    pub fn routes(&self) -> Vec<(String, Method)> {
        let mut routes: Vec<_> = self.handlers.keys().cloned().collect();
        routes.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));
        routes
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Resource name → route table, built once at startup.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: HashMap<&'static str, RouteTable>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    /// Add a resource table. Duplicate resource names are rejected.
    pub fn insert(&mut self, table: RouteTable) -> Result<()> {
        if self.resources.contains_key(table.resource()) {
            return Err(AddrGateError::validation(format!(
                "Duplicate resource registration: {}",
                table.resource()
            )));
        }

        self.resources.insert(table.resource(), table);
        Ok(())
    }

    pub fn resource(&self, name: &str) -> Option<&RouteTable> {
        self.resources.get(name)
    }

    pub fn resource_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
