use std::{collections::HashMap, io::Write, net::TcpStream, time::Duration};

use schema::ValidationErrors;
use serde::Serialize;

use crate::api::{DetailResponse, ErrorResponse, ValidationDetailResponse};

const JSON_CONTENT_TYPE: &str = "application/json";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
const BACKPRESSURE_QUEUE_FULL_MESSAGE: &str = "service unavailable: movie worker queue full";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpRequest {
    pub(crate) method: String,
    pub(crate) target: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) content_type: &'static str,
    pub(crate) body: String,
}

impl HttpResponse {
    pub(crate) fn json<T: Serialize + ?Sized>(status: u16, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self {
                status,
                content_type: JSON_CONTENT_TYPE,
                body,
            },
            Err(err) => {
                Self::internal_server_error(&format!("response serialization failed: {err}"))
            }
        }
    }

    pub(crate) fn ok_json<T: Serialize + ?Sized>(payload: &T) -> Self {
        Self::json(200, payload)
    }

    /// The `[]` payload answered for a missing record.
    pub(crate) fn empty_json(status: u16) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            body: "[]".to_string(),
        }
    }

    pub(crate) fn ok_html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: HTML_CONTENT_TYPE,
            body: body.to_string(),
        }
    }

    pub(crate) fn ok_text(body: String) -> Self {
        Self {
            status: 200,
            content_type: METRICS_CONTENT_TYPE,
            body,
        }
    }

    pub(crate) fn unprocessable(errors: &ValidationErrors) -> Self {
        Self::json(
            422,
            &ValidationDetailResponse {
                detail: errors.errors(),
            },
        )
    }

    pub(crate) fn not_found() -> Self {
        Self::json(404, &DetailResponse { detail: "Not Found" })
    }

    pub(crate) fn method_not_allowed() -> Self {
        Self::json(
            405,
            &DetailResponse {
                detail: "Method Not Allowed",
            },
        )
    }

    pub(crate) fn bad_request(message: &str) -> Self {
        Self::error_with_status(400, message)
    }

    pub(crate) fn internal_server_error(message: &str) -> Self {
        Self::error_with_status(500, message)
    }

    pub(crate) fn service_unavailable(message: &str) -> Self {
        Self::error_with_status(503, message)
    }

    fn error_with_status(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            body: serde_json::to_string(&ErrorResponse { error: message })
                .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string()),
        }
    }
}

pub(crate) fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    }
}

pub(crate) fn backpressure_rejection_response() -> HttpResponse {
    HttpResponse::service_unavailable(BACKPRESSURE_QUEUE_FULL_MESSAGE)
}

pub(crate) fn write_backpressure_response(
    mut stream: TcpStream,
    socket_timeout_secs: u64,
) -> std::io::Result<()> {
    stream.set_write_timeout(Some(Duration::from_secs(socket_timeout_secs)))?;
    write_response(&mut stream, backpressure_rejection_response())
}

pub(crate) fn write_response(
    stream: &mut TcpStream,
    response: HttpResponse,
) -> std::io::Result<()> {
    stream.write_all(render_response_text(&response).as_bytes())?;
    stream.flush()
}

pub(crate) fn render_response_text(response: &HttpResponse) -> String {
    let status_code = match response.status {
        200 | 400 | 403 | 404 | 405 | 422 | 503 => response.status,
        _ => 500,
    };
    let body_len = response.body.len();
    format!(
        "HTTP/1.1 {status_code} {}\r\nContent-Type: {}\r\nContent-Length: {body_len}\r\nConnection: close\r\n\r\n{}",
        reason_phrase(status_code),
        response.content_type,
        response.body
    )
}
