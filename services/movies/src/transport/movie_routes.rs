use super::*;

use crate::api::{DELETE_CONFIRMATION, DeleteMovieResponse};

const RUNTIME_LOCK_ERROR: &str = "failed to acquire movie runtime lock";

fn with_runtime<F>(runtime: &SharedRuntime, handler: F) -> HttpResponse
where
    F: FnOnce(&mut MovieRuntime) -> HttpResponse,
{
    match runtime.lock() {
        Ok(mut guard) => handler(&mut guard),
        Err(_) => HttpResponse::internal_server_error(RUNTIME_LOCK_ERROR),
    }
}

pub(super) fn list_movies(runtime: &SharedRuntime) -> HttpResponse {
    with_runtime(runtime, |rt| {
        HttpResponse::json(rt.list_status(), rt.store.list_all())
    })
}

pub(super) fn get_movie(runtime: &SharedRuntime, id: i64) -> HttpResponse {
    with_runtime(runtime, |rt| match rt.store.find_by_id(id) {
        Some(movie) => HttpResponse::ok_json(movie),
        None => HttpResponse::empty_json(404),
    })
}

pub(super) fn get_movie_by_category(runtime: &SharedRuntime, category: &str) -> HttpResponse {
    with_runtime(runtime, |rt| match rt.store.find_by_category(category) {
        Some(movie) => HttpResponse::ok_json(movie),
        None => HttpResponse::empty_json(404),
    })
}

pub(super) fn create_movie(runtime: &SharedRuntime, body: &[u8]) -> HttpResponse {
    let input = match parse_write_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    with_runtime(runtime, |rt| {
        rt.store.append(input.into_movie());
        HttpResponse::ok_json(rt.store.list_all())
    })
}

pub(super) fn update_movie(runtime: &SharedRuntime, id: i64, body: &[u8]) -> HttpResponse {
    let input = match parse_write_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    with_runtime(runtime, |rt| {
        if rt.store.update_fields(id, input).is_none() {
            return HttpResponse::empty_json(rt.update_missing_status());
        }
        HttpResponse::ok_json(rt.store.list_all())
    })
}

pub(super) fn delete_movie(runtime: &SharedRuntime, id: i64) -> HttpResponse {
    with_runtime(runtime, |rt| match rt.store.remove(id) {
        Ok(_) => HttpResponse::ok_json(&DeleteMovieResponse {
            result: DELETE_CONFIRMATION,
            data: rt.store.list_all(),
        }),
        Err(StoreError::NotFound(_)) => HttpResponse::empty_json(404),
    })
}

fn parse_write_body(body: &[u8]) -> Result<MovieInput, HttpResponse> {
    schema::parse_movie_payload(body).map_err(|errors| {
        tracing::debug!(errors = %errors, "movie body rejected");
        HttpResponse::unprocessable(&errors)
    })
}
