//! 路由装配
//!
//! `build_registry()` 在启动时注册全部子路由；`configure()` 把注册表挂到
//! actix 上：`/health` 探针、两段式分发路由和 404 默认服务。

use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::dispatch::{ResourceRegistry, RouteTable, handler};
use crate::api::services::address::{city_post, count_post, distance_post, request_post};
use crate::api::services::health::HealthService;
use crate::api::types::{endpoint_not_found, fail_response};
use crate::errors::Result;
use crate::services::AddressService;

/// Address resource routes `/address`
///
/// 包含：
/// - POST /address/count    - count matching addresses
/// - POST /address/request  - forward query, paginate client-side
/// - POST /address/distance - great-circle distance between two points
/// - POST /address/city     - zip → city lookup (cached)
pub fn address_routes() -> Result<RouteTable> {
    let mut table = RouteTable::new("address");
    table.register("count", Method::POST, handler(count_post))?;
    table.register("request", Method::POST, handler(request_post))?;
    table.register("distance", Method::POST, handler(distance_post))?;
    table.register("city", Method::POST, handler(city_post))?;
    Ok(table)
}

/// Build the resource registry. Called once at startup; a duplicate
/// registration aborts the boot instead of shadowing an earlier route.
pub fn build_registry() -> Result<ResourceRegistry> {
    let mut registry = ResourceRegistry::new();
    registry.insert(address_routes()?)?;
    Ok(registry)
}

/// Dispatch entry for `/{resource}/{subroute}` on every verb.
///
/// Resolution order: unknown resource → 404, known resource without a
/// matching (sub-route, verb) entry → 400, matched → parse body and
/// invoke. An empty body counts as `{}`; malformed JSON is a 400.
pub async fn dispatch(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    registry: web::Data<Arc<ResourceRegistry>>,
    service: web::Data<Arc<AddressService>>,
) -> HttpResponse {
    let (resource, subroute) = path.into_inner();

    let Some(table) = registry.resource(&resource) else {
        debug!("Unknown resource: /{}", resource);
        return endpoint_not_found();
    };

    let Some(route_handler) = table.resolve(&subroute, req.method()) else {
        warn!("No handler for {} /{}/{}", req.method(), resource, subroute);
        return fail_response(StatusCode::BAD_REQUEST, "Bad Request");
    };

    let payload: Value = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(err) => {
                warn!("Malformed JSON body for /{}/{}: {}", resource, subroute, err);
                return fail_response(StatusCode::BAD_REQUEST, "Malformed JSON body");
            }
        }
    };

    route_handler(service.get_ref().clone(), payload).await
}

/// Wire the HTTP surface onto the actix app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::liveness_check))
        .route("/{resource}/{subroute}", web::route().to(dispatch))
        .default_service(web::route().to(|| async { endpoint_not_found() }));
}
