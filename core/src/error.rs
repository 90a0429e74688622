//! Error types for the Sodam API client.
//!
//! # Design
//! Every failure is scoped to one operation. Network and decode failures
//! surface as `ApiError`; local input checks surface as `ValidationError`
//! (wrapped in `ApiError::Validation`) and are raised before any request is
//! built. Nothing here is retried.

use thiserror::Error;

/// Minimum password length accepted by sign-up and the server.
pub const MIN_PASSWORD_LEN: usize = 8;

const MSG_BAD_CREDENTIALS: &str = "가입되지 않은 계정이거나 아이디/비밀번호가 올바르지 않습니다.";
const MSG_BAD_INPUT: &str = "아이디와 비밀번호를 올바르게 입력해주세요.";
const MSG_SERVER: &str = "서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
const MSG_NETWORK: &str = "네트워크 연결을 확인해주세요.";

/// Errors returned by request building, transport and response parsing.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL or a path parameter could not form a request target.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The transport produced something that is not an HTTP response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered outside 200..=299.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never completed (DNS, connect, TLS, I/O).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Local input check failed; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered 2xx but the auth payload was not a success.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),
}

impl ApiError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { status: 401, .. } => MSG_BAD_CREDENTIALS.to_string(),
            ApiError::Http { status: 400, .. } => MSG_BAD_INPUT.to_string(),
            ApiError::Transport(_) => MSG_NETWORK.to_string(),
            ApiError::Validation(v) => v.to_string(),
            ApiError::AuthRejected(msg) => msg.clone(),
            ApiError::Http { .. }
            | ApiError::InvalidTarget(_)
            | ApiError::InvalidResponse(_)
            | ApiError::Deserialization(_)
            | ApiError::Serialization(_) => MSG_SERVER.to_string(),
        }
    }
}

/// Local input failures. The display text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("아이디를 입력해주세요.")]
    EmptyUsername,

    #[error("비밀번호를 입력해주세요.")]
    EmptyPassword,

    #[error("이메일을 입력해주세요.")]
    EmptyEmail,

    #[error("올바른 이메일 형식이 아닙니다.")]
    InvalidEmail,

    #[error("비밀번호는 {min}자 이상이어야 합니다.")]
    PasswordTooShort { min: usize },

    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,

    #[error("이름을 입력해주세요.")]
    EmptyName,
}
