use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Load Failed: {0}")]
    LoadError(String),

    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Save Failed: {0}")]
    SaveError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::LoadError(..) => StatusCode::SERVICE_UNAVAILABLE,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::SaveError(..) => StatusCode::BAD_GATEWAY,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": match *self {
                CustomError::LoadError(..) => "LOAD_ERROR",
                CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
                CustomError::ValidationError(..) => "VALIDATION_ERROR",
                CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
                CustomError::SaveError(..) => "SAVE_ERROR",
                CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
            },
            "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}
