use schema::{FieldError, Movie};
use serde::Serialize;

pub const SERVICE_TITLE: &str = "Mi aplicación con Fast API";
pub const SERVICE_VERSION: &str = "0.0.1";
pub const HTML_CONTENT: &str = "<h1>Hola xd</h1>";
pub const DELETE_CONFIRMATION: &str = "Se ha borrado con exito";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GreetingResponse {
    #[serde(rename = "Saludo")]
    pub saludo: &'static str,
}

impl Default for GreetingResponse {
    fn default() -> Self {
        Self {
            saludo: "Hola mundo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteMovieResponse<'a> {
    pub result: &'static str,
    pub data: &'a [Movie],
}

/// 422 body listing every rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetailResponse<'a> {
    pub detail: &'a [FieldError],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailResponse<'a> {
    pub detail: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
