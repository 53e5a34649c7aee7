use super::*;

use crate::api::{GreetingResponse, HTML_CONTENT, HealthResponse};

pub(crate) fn handle_request(runtime: &SharedRuntime, request: &HttpRequest) -> HttpResponse {
    let started_at = Instant::now();
    let (path, query) = split_target(&request.target);
    let response = route_request(runtime, request, &path, &query);

    if let Ok(mut guard) = runtime.lock() {
        guard.observe_response(response.status);
    }
    tracing::info!(
        method = %request.method,
        path = %path,
        status = response.status,
        elapsed_us = started_at.elapsed().as_micros() as u64,
        "request handled"
    );
    response
}

fn route_request(
    runtime: &SharedRuntime,
    request: &HttpRequest,
    path: &str,
    query: &HashMap<String, String>,
) -> HttpResponse {
    if let Some(raw_id) = movie_id_segment(path) {
        return route_movie_item(runtime, request, raw_id);
    }

    match (request.method.as_str(), path) {
        ("GET", "/") => HttpResponse::ok_json(&GreetingResponse::default()),
        ("GET", "/health") => HttpResponse::ok_json(&HealthResponse { status: "ok" }),
        ("GET", "/metrics") => match runtime.lock() {
            Ok(rt) => HttpResponse::ok_text(rt.metrics_text()),
            Err(_) => HttpResponse::ok_text("movies_metrics_unavailable 1\n".to_string()),
        },
        ("GET", "/openapi.json") => HttpResponse::ok_json(&openapi::document()),
        ("GET", "/html_content") => HttpResponse::ok_html(HTML_CONTENT),
        ("GET", "/movies") => match query.get("category") {
            Some(category) => movie_routes::get_movie_by_category(runtime, category),
            None => movie_routes::list_movies(runtime),
        },
        ("GET", "/movies/") => match query.get("category") {
            Some(category) => movie_routes::get_movie_by_category(runtime, category),
            None => HttpResponse::unprocessable(&missing_category()),
        },
        ("POST", "/movies") => {
            if let Some(response) = reject_non_json_media_type(request) {
                return response;
            }
            movie_routes::create_movie(runtime, &request.body)
        }
        (_, "/")
        | (_, "/health")
        | (_, "/metrics")
        | (_, "/openapi.json")
        | (_, "/html_content")
        | (_, "/movies")
        | (_, "/movies/") => HttpResponse::method_not_allowed(),
        _ => HttpResponse::not_found(),
    }
}

fn route_movie_item(runtime: &SharedRuntime, request: &HttpRequest, raw_id: &str) -> HttpResponse {
    let id = match schema::parse_path_id(raw_id) {
        Ok(id) => id,
        Err(errors) => return HttpResponse::unprocessable(&errors),
    };
    match request.method.as_str() {
        "GET" => movie_routes::get_movie(runtime, id),
        "PUT" => {
            if let Some(response) = reject_non_json_media_type(request) {
                return response;
            }
            movie_routes::update_movie(runtime, id, &request.body)
        }
        "DELETE" => movie_routes::delete_movie(runtime, id),
        _ => HttpResponse::method_not_allowed(),
    }
}

/// Returns the `{id}` segment of `/movies/{id}`.
fn movie_id_segment(path: &str) -> Option<&str> {
    path.strip_prefix("/movies/")
        .filter(|segment| !segment.is_empty() && !segment.contains('/'))
}

fn missing_category() -> ValidationErrors {
    ValidationErrors::single(schema::FieldError::new(
        schema::ErrorKind::Missing,
        vec!["query", "category"],
    ))
}

/// Non-empty write bodies declared as anything other than JSON fail validation
/// as a non-object body.
fn reject_non_json_media_type(request: &HttpRequest) -> Option<HttpResponse> {
    let content_type = request.headers.get("content-type")?;
    if request.body.is_empty() || is_json_media_type(content_type) {
        return None;
    }
    tracing::debug!(content_type = %content_type, "movie body has a non-JSON media type");
    Some(HttpResponse::unprocessable(&ValidationErrors::single(
        schema::FieldError::new(schema::ErrorKind::ModelAttributesType, vec!["body"]),
    )))
}

/// `application/json` and `application/<anything>+json`, parameters ignored.
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

