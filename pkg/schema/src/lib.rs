use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Core record types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    /// Optional caller-assigned identifier. Uniqueness is assumed, never enforced.
    pub id: Option<i64>,
    pub title: String,
    pub overview: String,
    pub year: i64,
    pub rating: f64,
    pub category: String,
}

/// A write body that passed [`validate_movie_payload`].
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInput {
    pub id: Option<i64>,
    pub title: String,
    pub overview: String,
    pub year: i64,
    pub rating: f64,
    pub category: String,
}

impl MovieInput {
    /// Builds a record that keeps the id carried in the body (POST semantics).
    pub fn into_movie(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            overview: self.overview,
            year: self.year,
            rating: self.rating,
            category: self.category,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Missing,
    StringType,
    IntType,
    IntParsing,
    FloatType,
    FloatParsing,
    ModelAttributesType,
    JsonInvalid,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "Field required",
            Self::StringType => "Input should be a valid string",
            Self::IntType => "Input should be a valid integer",
            Self::IntParsing => {
                "Input should be a valid integer, unable to parse string as an integer"
            }
            Self::FloatType => "Input should be a valid number",
            Self::FloatParsing => {
                "Input should be a valid number, unable to parse string as a number"
            }
            Self::ModelAttributesType => {
                "Input should be a valid dictionary or object to extract fields from"
            }
            Self::JsonInvalid => "JSON decode error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub loc: Vec<&'static str>,
    pub msg: &'static str,
}

impl FieldError {
    pub fn new(kind: ErrorKind, loc: Vec<&'static str>) -> Self {
        Self {
            kind,
            loc,
            msg: kind.message(),
        }
    }

    pub fn body_field(kind: ErrorKind, field: &'static str) -> Self {
        Self::new(kind, vec!["body", field])
    }
}

/// Every field error found in one request, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} validation error(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_error_at(&self, loc: &[&str]) -> bool {
        self.0.iter().any(|error| error.loc == loc)
    }
}

/// Parses raw request bytes and validates them as a movie write body.
pub fn parse_movie_payload(body: &[u8]) -> Result<MovieInput, ValidationErrors> {
    if body.is_empty() {
        return Err(ValidationErrors::single(FieldError::new(
            ErrorKind::Missing,
            vec!["body"],
        )));
    }
    let value: Value = serde_json::from_slice(body).map_err(|_| {
        ValidationErrors::single(FieldError::new(ErrorKind::JsonInvalid, vec!["body"]))
    })?;
    validate_movie_payload(&value)
}

pub fn validate_movie_payload(value: &Value) -> Result<MovieInput, ValidationErrors> {
    let Some(object) = value.as_object() else {
        return Err(ValidationErrors::single(FieldError::new(
            ErrorKind::ModelAttributesType,
            vec!["body"],
        )));
    };

    let mut errors = Vec::new();
    let id = optional_int(object, "id", &mut errors);
    let title = required_string(object, "title", &mut errors);
    let overview = required_string(object, "overview", &mut errors);
    let year = required_int(object, "year", &mut errors);
    let rating = required_number(object, "rating", &mut errors);
    let category = required_string(object, "category", &mut errors);

    match (title, overview, year, rating, category) {
        (Some(title), Some(overview), Some(year), Some(rating), Some(category))
            if errors.is_empty() =>
        {
            Ok(MovieInput {
                id,
                title,
                overview,
                year,
                rating,
                category,
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}

fn required_string(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(field) {
        None => {
            errors.push(FieldError::body_field(ErrorKind::Missing, field));
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            errors.push(FieldError::body_field(ErrorKind::StringType, field));
            None
        }
    }
}

fn required_int(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    match object.get(field) {
        None => {
            errors.push(FieldError::body_field(ErrorKind::Missing, field));
            None
        }
        Some(value) => collect(lax_int(value), field, errors),
    }
}

fn optional_int(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => collect(lax_int(value), field, errors),
    }
}

fn required_number(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    match object.get(field) {
        None => {
            errors.push(FieldError::body_field(ErrorKind::Missing, field));
            None
        }
        Some(value) => collect(lax_number(value), field, errors),
    }
}

fn collect<T>(
    parsed: Result<T, ErrorKind>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    parsed
        .map_err(|kind| errors.push(FieldError::body_field(kind, field)))
        .ok()
}

/// Integers, floats without a fractional part, and integer strings.
fn lax_int(value: &Value) -> Result<i64, ErrorKind> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            match number.as_f64() {
                Some(float)
                    if float.fract() == 0.0
                        && float >= i64::MIN as f64
                        && float < i64::MAX as f64 =>
                {
                    Ok(float as i64)
                }
                _ => Err(ErrorKind::IntType),
            }
        }
        Value::String(text) => text.trim().parse().map_err(|_| ErrorKind::IntParsing),
        _ => Err(ErrorKind::IntType),
    }
}

/// Any JSON number, or a string holding a finite one.
fn lax_number(value: &Value) -> Result<f64, ErrorKind> {
    match value {
        Value::Number(number) => number.as_f64().ok_or(ErrorKind::FloatType),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .ok_or(ErrorKind::FloatParsing),
        _ => Err(ErrorKind::FloatType),
    }
}

/// Parses a path segment as a record id.
pub fn parse_path_id(raw: &str) -> Result<i64, ValidationErrors> {
    raw.parse::<i64>().map_err(|_| {
        ValidationErrors::single(FieldError::new(ErrorKind::IntParsing, vec!["path", "id"]))
    })
}

/// Helper to create a `Movie` with placeholder text fields.
/// Used throughout tests to avoid repetitive struct construction.
pub fn movie_builder(id: Option<i64>, title: &str, year: i64, category: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: format!("{title} overview"),
        year,
        rating: 7.0,
        category: category.to_string(),
    }
}
