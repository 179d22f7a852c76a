use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::ProductStore;
use crate::storage::UploadUrlIssuer;
use crate::types::{AppError, AppResult};

/// Long-lived handles built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub uploads: Arc<UploadUrlIssuer>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductStore>, uploads: Arc<UploadUrlIssuer>) -> Self {
        Self { products, uploads }
    }
}

// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub filename: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A product that passed presence checks and is ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub filename: String,
}

/// Body of `POST /api/products`. Every field is optional at the wire level so
/// that a missing field turns into a validation error instead of a JSON
/// rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required)]
    pub price: Option<f64>,
    #[validate(required, length(min = 1))]
    pub filename: Option<String>,
}

impl CreateProductRequest {
    /// Trims the text fields, runs the presence checks and hands back an
    /// insertable product.
    pub fn into_new_product(self) -> AppResult<NewProduct> {
        let trimmed = Self {
            name: self.name.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            price: self.price,
            filename: self.filename.map(|s| s.trim().to_string()),
        };

        if let Err(errors) = trimmed.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            fields.sort();
            return Err(AppError::Validation(format!(
                "provide all fields (missing: {})",
                fields.join(", ")
            )));
        }

        match trimmed {
            Self {
                name: Some(name),
                description: Some(description),
                price: Some(price),
                filename: Some(filename),
            } => Ok(NewProduct { name, description, price, filename }),
            _ => Err(AppError::Validation("provide all fields".to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresignRequest {
    #[serde(default)]
    pub mime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignResponse {
    pub url: String,
    #[serde(rename = "finalName")]
    pub final_name: String,
}

/// `{ success, message }` acknowledgement used for both outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
