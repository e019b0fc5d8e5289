use actix_web::http::StatusCode;
use std::fmt;

/// 网关统一错误类型
///
/// 每个失败路径在产生处被归类为其中一个变体，HTTP 状态码随变体一次性决定，
/// 不再依赖错误消息字符串匹配。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddrGateError {
    Validation(String),
    NotFound(String),
    UpstreamContract(String),
    UpstreamUnavailable(String),
    Computation(String),
}

impl AddrGateError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AddrGateError::Validation(_) => "E001",
            AddrGateError::NotFound(_) => "E002",
            AddrGateError::UpstreamContract(_) => "E003",
            AddrGateError::UpstreamUnavailable(_) => "E004",
            AddrGateError::Computation(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AddrGateError::Validation(_) => "Validation Error",
            AddrGateError::NotFound(_) => "Resource Not Found",
            AddrGateError::UpstreamContract(_) => "Upstream Contract Error",
            AddrGateError::UpstreamUnavailable(_) => "Upstream Unavailable",
            AddrGateError::Computation(_) => "Computation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AddrGateError::Validation(msg) => msg,
            AddrGateError::NotFound(msg) => msg,
            AddrGateError::UpstreamContract(msg) => msg,
            AddrGateError::UpstreamUnavailable(msg) => msg,
            AddrGateError::Computation(msg) => msg,
        }
    }

    /// 映射为 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            AddrGateError::Validation(_) => StatusCode::BAD_REQUEST,
            AddrGateError::NotFound(_) => StatusCode::NOT_FOUND,
            AddrGateError::UpstreamContract(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AddrGateError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AddrGateError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AddrGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AddrGateError {}

// 便捷的构造函数
impl AddrGateError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AddrGateError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AddrGateError::NotFound(msg.into())
    }

    pub fn upstream_contract<T: Into<String>>(msg: T) -> Self {
        AddrGateError::UpstreamContract(msg.into())
    }

    pub fn upstream_unavailable<T: Into<String>>(msg: T) -> Self {
        AddrGateError::UpstreamUnavailable(msg.into())
    }

    pub fn computation<T: Into<String>>(msg: T) -> Self {
        AddrGateError::Computation(msg.into())
    }
}

// JSON 解码只发生在上游响应体上，解码失败即契约违例
impl From<serde_json::Error> for AddrGateError {
    fn from(err: serde_json::Error) -> Self {
        AddrGateError::UpstreamContract(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AddrGateError>;
