//! Liveness probe

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

/// Flipped once shutdown has been initiated, before the graceful actix
/// stop, so load balancers drain this instance first.
#[derive(Debug, Default)]
pub struct ShutdownFlag(AtomicBool);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct HealthService;

impl HealthService {
    /// 存活检查：正常返回 200 OK，停机开始后返回 503
    pub async fn liveness_check(flag: web::Data<Arc<ShutdownFlag>>) -> impl Responder {
        trace!("Received liveness check request");

        if flag.is_shutting_down() {
            return HttpResponse::ServiceUnavailable()
                .append_header(("Content-Type", "text/plain"))
                .body("Server shutting down!");
        }

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }
}
