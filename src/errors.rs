use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    Validation(&'static str),
    Conflict(&'static str),
    NotFound(&'static str),
    Forbidden,
    NotAuthorized(&'static str),
    ServerError,
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: RequestErrorJson,
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    body: Vec<String>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson {
                body: vec![error.to_string()],
            },
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl RequestError {
    /// Remaps a storage-level unique constraint failure to a conflict, so
    /// the loser of a duplicate-insert race gets a 409 instead of a 500.
    pub fn or_conflict(self, message: &'static str) -> Self {
        match &self {
            RequestError::DatabaseError(sqlx::Error::Database(e))
                if e.message().contains("UNIQUE constraint failed") =>
            {
                RequestError::Conflict(message)
            }
            _ => self,
        }
    }

    /// Remaps a foreign key failure to a not-found error for inserts that
    /// reference another entity by id.
    pub fn or_not_found(self, message: &'static str) -> Self {
        match &self {
            RequestError::DatabaseError(sqlx::Error::Database(e))
                if e.message().contains("FOREIGN KEY constraint failed") =>
            {
                RequestError::NotFound(message)
            }
            _ => self,
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let (status_code, json) = match self {
            RequestError::Validation(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJsonWrapper::new(message))
            }
            RequestError::Conflict(message) => {
                (StatusCode::CONFLICT, RequestErrorJsonWrapper::new(message))
            }
            RequestError::NotFound(message) => {
                (StatusCode::NOT_FOUND, RequestErrorJsonWrapper::new(message))
            }
            RequestError::Forbidden => (
                StatusCode::FORBIDDEN,
                RequestErrorJsonWrapper::new("Forbidden"),
            ),
            RequestError::NotAuthorized(message) => (
                StatusCode::UNAUTHORIZED,
                RequestErrorJsonWrapper::new(message),
            ),
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJsonWrapper::new("Internal Server Error"),
            ),
            RequestError::DatabaseError(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJsonWrapper::new("Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}
