use std::{
    collections::HashMap,
    io::BufReader,
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex, mpsc},
    time::{Duration, Instant},
};

use schema::{MovieInput, ValidationErrors};
use store::{MovieStore, StoreError};

use crate::config::StatusCodeMode;

mod http;
mod movie_routes;
mod openapi;
mod request;
mod routes;
mod server_runtime;

pub(crate) use http::{HttpRequest, HttpResponse};
pub(crate) use routes::handle_request;

use http::{render_response_text, write_backpressure_response, write_response};
use request::{read_http_request, split_target};

const MAX_HTTP_BODY_BYTES: usize = 1024 * 1024;
const SOCKET_TIMEOUT_SECS: u64 = 5;

/// Owns the movie collection and the per-process request counters.
pub struct MovieRuntime {
    store: MovieStore,
    status_codes: StatusCodeMode,
    requests_total: u64,
    responses_ok_total: u64,
    not_found_total: u64,
    validation_failures_total: u64,
    client_errors_total: u64,
    server_errors_total: u64,
    started_at: Instant,
}

impl MovieRuntime {
    pub fn in_memory(store: MovieStore) -> Self {
        Self {
            store,
            status_codes: StatusCodeMode::default(),
            requests_total: 0,
            responses_ok_total: 0,
            not_found_total: 0,
            validation_failures_total: 0,
            client_errors_total: 0,
            server_errors_total: 0,
            started_at: Instant::now(),
        }
    }

    pub fn with_status_codes(mut self, status_codes: StatusCodeMode) -> Self {
        self.status_codes = status_codes;
        self
    }

    pub fn status_codes(&self) -> StatusCodeMode {
        self.status_codes
    }

    pub fn movies_len(&self) -> usize {
        self.store.len()
    }

    fn list_status(&self) -> u16 {
        match self.status_codes {
            StatusCodeMode::Standard => 200,
            StatusCodeMode::Reference => 400,
        }
    }

    fn update_missing_status(&self) -> u16 {
        match self.status_codes {
            StatusCodeMode::Standard => 404,
            StatusCodeMode::Reference => 403,
        }
    }

    fn observe_response(&mut self, status: u16) {
        self.requests_total += 1;
        match status {
            200..=299 => self.responses_ok_total += 1,
            404 => {
                self.not_found_total += 1;
                self.client_errors_total += 1;
            }
            422 => {
                self.validation_failures_total += 1;
                self.client_errors_total += 1;
            }
            400..=499 => self.client_errors_total += 1,
            _ => self.server_errors_total += 1,
        }
    }

    fn metrics_text(&self) -> String {
        format!(
            "# TYPE movies_requests_total counter\n\
movies_requests_total {}\n\
# TYPE movies_responses_ok_total counter\n\
movies_responses_ok_total {}\n\
# TYPE movies_not_found_total counter\n\
movies_not_found_total {}\n\
# TYPE movies_validation_failures_total counter\n\
movies_validation_failures_total {}\n\
# TYPE movies_client_errors_total counter\n\
movies_client_errors_total {}\n\
# TYPE movies_server_errors_total counter\n\
movies_server_errors_total {}\n\
# TYPE movies_records gauge\n\
movies_records {}\n\
# TYPE movies_uptime_seconds gauge\n\
movies_uptime_seconds {:.4}\n",
            self.requests_total,
            self.responses_ok_total,
            self.not_found_total,
            self.validation_failures_total,
            self.client_errors_total,
            self.server_errors_total,
            self.store.len(),
            self.started_at.elapsed().as_secs_f64()
        )
    }
}

pub type SharedRuntime = Arc<Mutex<MovieRuntime>>;

pub fn shared(runtime: MovieRuntime) -> SharedRuntime {
    Arc::new(Mutex::new(runtime))
}

pub fn serve_http_with_workers(
    runtime: MovieRuntime,
    bind_addr: &str,
    worker_count: usize,
    queue_capacity: usize,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    server_runtime::serve_with_listener(shared(runtime), listener, worker_count, queue_capacity)
}

/// Accepts and answers exactly one connection.
pub fn serve_http_once_with_listener(
    runtime: &SharedRuntime,
    listener: TcpListener,
) -> std::io::Result<()> {
    let (stream, _) = listener.accept()?;
    server_runtime::handle_connection(runtime, stream)
}

pub fn handle_http_request_bytes(
    runtime: &SharedRuntime,
    raw_request: &[u8],
) -> Result<Vec<u8>, String> {
    let mut remaining = raw_request;
    let request = read_http_request(&mut remaining)?
        .ok_or_else(|| "missing request line".to_string())?;
    if !remaining.is_empty() {
        return Err("content-length does not match body size".to_string());
    }
    let response = handle_request(runtime, &request);
    Ok(render_response_text(&response).into_bytes())
}
