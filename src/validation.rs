use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

pub fn require_phone(field: &str, phone: &str) -> Result<(), AppError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid {field}")))
    }
}

/// `Json` that reports malformed bodies as 400 with the usual error shape.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_e164_like_numbers() {
        assert!(is_valid_phone("+998901234567"));
        assert!(is_valid_phone("998901234567"));
        assert!(is_valid_phone("12"));
        assert!(is_valid_phone("+123456789012345"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("abc"));
        assert!(!is_valid_phone("+"));
        assert!(!is_valid_phone("0901234567"));
        assert!(!is_valid_phone("+1234567890123456"));
        assert!(!is_valid_phone("+998 90 123 45 67"));
    }

    #[test]
    fn require_phone_names_the_field() {
        let err = require_phone("phoneNumber", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid phoneNumber");
    }
}
