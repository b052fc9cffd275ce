use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;

/// JSON body that has passed its `validator` rules.
/// Both malformed JSON and rule failures become `AppError::Validation`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    // field_errors() is a HashMap; keep the message stable
    messages.sort();
    messages.join(", ")
}

/// `deserialize_with` helper: trims surrounding whitespace before validation.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// `deserialize_with` helper: trims, and maps blank or missing input to `None`.
/// Pair with `#[serde(default)]`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(Option::<String>::deserialize(deserializer)?))
}

/// Trims a required text field; blank input is a validation error.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank input collapses to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Validate)]
    struct Credentials {
        #[validate(email(message = "Invalid email address"))]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_validation_messages_are_joined_in_order() {
        let creds = Credentials {
            email: "nope".to_string(),
            password: "short".to_string(),
        };
        let errors = creds.validate().unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "Invalid email address, Password must be at least 8 characters"
        );
    }

    #[test]
    fn test_text_normalization() {
        assert_eq!(required_text("first_name", "  Ada ").unwrap(), "Ada");
        assert!(required_text("first_name", "   ").is_err());
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(optional_text(None), None);
    }
}
