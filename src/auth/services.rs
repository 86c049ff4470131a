use tracing::{info, warn};

use super::{
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::User,
};
use crate::error::{AppError, AuthError};
use crate::validation::{require_phone, MIN_PASSWORD_LEN};

/// Trims the optional display name; blank names are stored as absent.
pub(crate) fn normalize_name(name: Option<String>) -> Result<Option<String>, AppError> {
    let Some(name) = name else { return Ok(None) };
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation("name must be at most 255 characters"));
    }
    Ok(Some(name.to_string()))
}

/// Validates the registration input, hashes the password and stores the user.
pub async fn create_user(
    users: &dyn UserStore,
    phone: &str,
    password: &str,
    name: Option<String>,
) -> Result<User, AppError> {
    require_phone("phone", phone)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let name = normalize_name(name)?;

    let hash = hash_password(password).map_err(AppError::Internal)?;
    let user = users.create(phone, &hash, name.as_deref()).await?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Resolves a phone/password pair to its user. Unknown phone and wrong
/// password are indistinguishable to the caller.
pub async fn check_credentials(
    users: &dyn UserStore,
    phone: &str,
    password: &str,
) -> Result<User, AppError> {
    require_phone("phone", phone)?;
    if password.is_empty() {
        return Err(AppError::validation("password is required"));
    }

    let Some(user) = users.find_by_phone(phone).await? else {
        warn!("login unknown phone");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials.into());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
