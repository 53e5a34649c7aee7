use serde_json::{Value, json};

use crate::api::{SERVICE_TITLE, SERVICE_VERSION};

pub(super) fn document() -> Value {
    let movie_id = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": {"type": "integer"}
    });
    let movie_body = json!({
        "required": true,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Movie"}}}
    });

    json!({
        "openapi": "3.1.0",
        "info": {"title": SERVICE_TITLE, "version": SERVICE_VERSION},
        "paths": {
            "/": {
                "get": operation("home", "Message", None, None)
            },
            "/movies": {
                "get": operation("movies", "Get Movies", None, None),
                "post": operation("movies", "Create Movie", None, Some(movie_body.clone()))
            },
            "/movies/": {
                "get": operation(
                    "movies",
                    "Get Movies By Category",
                    Some(json!([{
                        "name": "category",
                        "in": "query",
                        "required": true,
                        "schema": {"type": "string"}
                    }])),
                    None
                )
            },
            "/movies/{id}": {
                "get": operation("movies", "Get Movie", Some(json!([movie_id.clone()])), None),
                "put": operation(
                    "movies",
                    "Update Movie",
                    Some(json!([movie_id.clone()])),
                    Some(movie_body)
                ),
                "delete": operation("movies", "Delete Movie", Some(json!([movie_id])), None)
            },
            "/html_content": {
                "get": operation("html_content", "Html Content", None, None)
            }
        },
        "components": {
            "schemas": {
                "Movie": {
                    "title": "Movie",
                    "type": "object",
                    "required": ["title", "overview", "year", "rating", "category"],
                    "properties": {
                        "id": {"anyOf": [{"type": "integer"}, {"type": "null"}]},
                        "title": {"type": "string"},
                        "overview": {"type": "string"},
                        "year": {"type": "integer"},
                        "rating": {"type": "number"},
                        "category": {"type": "string"}
                    }
                }
            }
        }
    })
}

fn operation(tag: &str, summary: &str, parameters: Option<Value>, body: Option<Value>) -> Value {
    let mut op = json!({
        "tags": [tag],
        "summary": summary,
        "responses": {"200": {"description": "Successful Response"}}
    });
    if let Some(parameters) = parameters {
        op["parameters"] = parameters;
    }
    if let Some(body) = body {
        op["requestBody"] = body;
        op["responses"]["422"] = json!({"description": "Validation Error"});
    }
    op
}
