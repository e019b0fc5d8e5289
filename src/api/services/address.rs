//! Address endpoint handlers
//!
//! Glue between the dispatcher and the address service: each handler
//! hands the parsed JSON body to one service operation and wraps the
//! classified outcome in the response envelope.

use std::sync::Arc;

use actix_web::HttpResponse;
use serde_json::{Value, json};
use tracing::trace;

use crate::api::types::{error_response, success_response};
use crate::services::AddressService;

/// POST /address/count
pub async fn count_post(service: Arc<AddressService>, body: Value) -> HttpResponse {
    trace!("Received count request");

    match service.count(&body).await {
        Ok(result) => success_response(result),
        Err(err) => error_response(&err),
    }
}

/// POST /address/request
pub async fn request_post(service: Arc<AddressService>, body: Value) -> HttpResponse {
    trace!("Received address request");

    match service.request(&body).await {
        Ok(records) => success_response(records),
        Err(err) => error_response(&err),
    }
}

/// POST /address/distance
pub async fn distance_post(service: Arc<AddressService>, body: Value) -> HttpResponse {
    trace!("Received distance calculation request");

    match service.distance(&body) {
        Ok(result) => success_response(json!({ "distance": result })),
        Err(err) => error_response(&err),
    }
}

/// POST /address/city
pub async fn city_post(service: Arc<AddressService>, body: Value) -> HttpResponse {
    trace!("Received city lookup request");

    match service.city_lookup(&body).await {
        Ok(city) => success_response(json!({ "city": city })),
        Err(err) => error_response(&err),
    }
}
