//! JSON body extractors that reject with `AppError`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use validator::{Validate, ValidationErrors};

use clinic_core::error::AppError;

/// JSON body run through `validator` before the handler sees it.
///
/// Field failures become a 422 with `errors: {field: [messages]}`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

/// JSON body that may be absent; an empty body yields `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct OptionalJson<T>(pub T);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        parse_optional(&body).map(Self)
    }
}

fn parse_optional<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))
}

/// Convert `validator` output into a field-keyed 422.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<String> = errs
            .iter()
            .map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value ({})", e.code),
            })
            .collect();
        fields.insert(field.to_string(), json!(messages));
    }
    AppError::validation("Request validation failed").with_details(Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, Deserialize, Validate)]
    struct Probe {
        #[validate(email(message = "Enter a valid email"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn test_field_messages() {
        let probe = Probe {
            email: "nope".into(),
            name: "x".into(),
        };
        let err = validation_error(probe.validate().unwrap_err());
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        let details = err.details.expect("details");
        assert_eq!(details["email"][0], "Enter a valid email");
        assert!(details["name"][0].as_str().unwrap().contains("length"));
    }

    #[test]
    fn test_empty_body_is_default() {
        let probe: Probe = parse_optional(b"  \n").unwrap();
        assert!(probe.email.is_empty());
        assert!(parse_optional::<Probe>(b"{not json").is_err());
    }
}
