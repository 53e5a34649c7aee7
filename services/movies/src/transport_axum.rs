use std::collections::HashMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::State,
    http::{Request, Response, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::any,
};

use crate::transport::{
    HttpRequest, HttpResponse, MovieRuntime, SharedRuntime, handle_request, shared,
};

const MAX_HTTP_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
struct AppState {
    runtime: SharedRuntime,
}

pub fn serve_http_with_axum(
    movie_runtime: MovieRuntime,
    bind_addr: &str,
    worker_threads: usize,
) -> Result<(), String> {
    let worker_threads = worker_threads.max(1);
    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build tokio runtime: {e}"))?;

    let bind_addr = bind_addr.to_string();
    tokio_runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
        tracing::info!(addr = %bind_addr, workers = worker_threads, "axum transport listening");

        axum::serve(listener, router(shared(movie_runtime)))
            .await
            .map_err(|e| format!("axum server failed: {e}"))
    })
}

fn router(runtime: SharedRuntime) -> Router {
    Router::new()
        .fallback(any(dispatch))
        .with_state(AppState { runtime })
        .layer(axum::extract::DefaultBodyLimit::max(MAX_HTTP_BODY_BYTES))
}

async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> impl IntoResponse {
    let method = request.method().to_string();
    let target = request
        .uri()
        .path_and_query()
        .map(|value| value.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut headers = HashMap::new();
    for (name, value) in request.headers() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_ascii_lowercase(), value.to_string());
        }
    }

    let body = match to_bytes(request.into_body(), MAX_HTTP_BODY_BYTES).await {
        Ok(bytes) => bytes.to_vec(),
        Err(err) => {
            tracing::warn!(error = %err, "axum transport failed reading request body");
            return response_from_transport(HttpResponse::bad_request(&format!(
                "request body error: {err}"
            )));
        }
    };

    let request = HttpRequest {
        method,
        target,
        headers,
        body,
    };

    let response = handle_request(&state.runtime, &request);
    response_from_transport(response)
}

fn response_from_transport(response: HttpResponse) -> Response<Body> {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut out = Response::new(Body::from(response.body));
    *out.status_mut() = status;
    out.headers_mut().insert(
        CONTENT_TYPE,
        response
            .content_type
            .parse()
            .unwrap_or(axum::http::HeaderValue::from_static("application/json")),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MovieStore;

    fn sample_state() -> AppState {
        AppState {
            runtime: shared(MovieRuntime::in_memory(MovieStore::with_seed())),
        }
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), MAX_HTTP_BODY_BYTES)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn dispatch_root_returns_greeting_json() {
        let response = dispatch(State(sample_state()), get("/"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_text(response).await, r#"{"Saludo":"Hola mundo"}"#);
    }

    #[tokio::test]
    async fn dispatch_html_content_sets_html_content_type() {
        let response = dispatch(State(sample_state()), get("/html_content"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "<h1>Hola xd</h1>");
    }

    #[tokio::test]
    async fn dispatch_post_then_get_returns_posted_record() {
        let state = sample_state();

        let create_request = Request::builder()
            .method("POST")
            .uri("/movies")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"id":3,"title":"Dune","overview":"Spice","year":2021,"rating":8.0,"category":"Sci-Fi"}"#,
            ))
            .unwrap();
        let create_response = dispatch(State(state.clone()), create_request)
            .await
            .into_response();
        assert_eq!(create_response.status(), StatusCode::OK);

        let response = dispatch(State(state), get("/movies/3"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["title"], "Dune");
        assert_eq!(body["year"], 2021);
        assert_eq!(body["category"], "Sci-Fi");
    }

    #[tokio::test]
    async fn dispatch_unknown_id_returns_empty_array_with_404() {
        let response = dispatch(State(sample_state()), get("/movies/3"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "[]");
    }

    #[tokio::test]
    async fn dispatch_percent_encoded_category_matches_record() {
        let response = dispatch(State(sample_state()), get("/movies/?category=Acci%C3%B3n"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["title"], "Avatar");
    }
}
