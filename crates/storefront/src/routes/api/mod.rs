//! JSON API route handlers.
//!
//! Handlers delegate to the repositories and echo their results as JSON.
//! Missing products and carts become a 404 with an `error` message.

pub mod carts;
pub mod products;

use serde_json::Value;

use jsonshop_core::ProductFields;

use crate::error::AppError;

/// Parse a request body as a set of product fields.
///
/// The `Content-Type` header is not checked. An empty body is an empty field
/// set; anything else must be a JSON object.
fn parse_fields(body: &[u8]) -> Result<ProductFields, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProductFields::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(AppError::BadRequest(
            "El cuerpo de la solicitud debe ser un objeto JSON.".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("JSON inválido: {e}"))),
    }
}
