//! Response envelope
//!
//! Every feature endpoint answers with the same wrapper:
//! `{status: "ok"|"fail", event: "read", data | error}`. The envelope is
//! built once per response and never mutated afterwards.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::AddrGateError;

/// Envelope status tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Fail,
}

/// Envelope event tag. Every gateway operation reads upstream data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseEvent {
    Read,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub event: ResponseEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Human-readable failure payload. Raw upstream error bodies never end up
/// here.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorBody {
    pub message: String,
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            status: ResponseStatus::Ok,
            event: ResponseEvent::Read,
            data: Some(data),
            error: None,
        })
}

/// 构建失败响应
pub fn fail_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            status: ResponseStatus::Fail,
            event: ResponseEvent::Read,
            data: None,
            error: Some(ErrorBody {
                message: message.to_string(),
            }),
        })
}

/// 从 AddrGateError 构建失败响应（自动映射 HTTP 状态码）
pub fn error_response(err: &AddrGateError) -> HttpResponse {
    fail_response(err.http_status(), err.message())
}

/// 404 body for unresolved resources. Resource resolution happens before
/// any feature handler runs, so this sits outside the feature envelope.
pub fn endpoint_not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(serde_json::json!({
            "error": {
                "status": 404,
                "message": "Endpoint not found"
            }
        }))
}
