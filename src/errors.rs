use std::collections::BTreeMap;

use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{CheckoutError, OrderError, StorageError, ValidationErrors};

const RETRY_MESSAGE: &str = "Order could not be placed, please try again";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error("A submission is already in progress")]
    Conflict,

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::AlreadySubmitting => AppError::Conflict,
            CheckoutError::Validation(errors) => AppError::Validation(errors),
            CheckoutError::Order(OrderError::EmptyCart) => AppError::EmptyCart,
            CheckoutError::Submission(e) => AppError::Submission(e.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Validation(errors) => {
                let fields: BTreeMap<&str, &str> = errors
                    .errors
                    .iter()
                    .map(|e| (e.field.as_str(), e.message.as_str()))
                    .collect();
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "Please fill in all fields correctly",
                    "fields": fields
                }))
            }
            AppError::EmptyCart | AppError::InvalidProduct(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::Conflict => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Submission(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": RETRY_MESSAGE
            })),
            AppError::Storage(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Storage unavailable"
            })),
        }
    }
}
