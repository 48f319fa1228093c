//! Unified API error type. Every 4xx/5xx response is JSON with one shape:
//!
//! ```json
//! { "code": "division_by_zero", "message": "division by zero is not allowed" }
//! ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rpn_core::EvalError;
use rpn_store::StoreError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: msg.into(),
        }
    }

    pub fn stack_not_found(stack_id: u64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "stack_not_found",
            message: format!("stack '{stack_id}' not found"),
        }
    }

    pub fn unsupported_media_type() -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            code: "unsupported_media_type",
            message: "content-type must be application/json".into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: msg.into(),
        }
    }
}

impl From<EvalError> for AppError {
    fn from(e: EvalError) -> Self {
        let code = match e {
            EvalError::InvalidOperator { .. } => "invalid_operator",
            EvalError::InsufficientOperands { .. } => "insufficient_operands",
            EvalError::DivisionByZero => "division_by_zero",
            EvalError::MalformedInput(_) => "malformed_input",
            EvalError::Overflow => "overflow",
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        error!(error = %e, "stack store failure");
        Self::internal("stack store unavailable")
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        match e {
            JsonRejection::MissingJsonContentType(_) => Self::unsupported_media_type(),
            other => Self::bad_request(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_errors_are_client_errors() {
        let cases = [
            (
                EvalError::InvalidOperator { op: "%".into(), valid: "+, -, *, /".into() },
                "invalid_operator",
            ),
            (
                EvalError::InsufficientOperands { needed: 2, found: 1 },
                "insufficient_operands",
            ),
            (EvalError::DivisionByZero, "division_by_zero"),
            (EvalError::MalformedInput("+".into()), "malformed_input"),
            (EvalError::Overflow, "overflow"),
        ];
        for (err, code) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status, StatusCode::BAD_REQUEST);
            assert_eq!(app.code, code);
        }
    }

    #[test]
    fn store_errors_hide_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path");
        let app: AppError = StoreError::Io(io).into();
        assert_eq!(app.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!app.message.contains("/secret/path"));
    }

    #[test]
    fn error_body_serializes_code_and_message() {
        let body = ApiErrorBody {
            code: "stack_not_found",
            message: "stack '3' not found".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "stack_not_found");
        assert_eq!(json["message"], "stack '3' not found");
    }

    #[test]
    fn display_includes_status() {
        let e = AppError::stack_not_found(9);
        assert_eq!(e.to_string(), "[404] stack_not_found: stack '9' not found");
    }
}
