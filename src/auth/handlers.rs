use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, ProfileResponse, ProfileUser, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        repo_types::User,
        services::{check_credentials, create_user},
    },
    error::{AppError, AppResult, AuthError},
    state::AppState,
    validation::ValidJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
}

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    JwtKeys::from_ref(state).sign(user.id, &user.phone).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let phone = payload.phone.trim();
    let user = create_user(state.users.as_ref(), phone, &payload.password, payload.name)
        .await
        .inspect_err(|e| warn!(error = %e, "registration rejected"))?;

    let token = issue_token(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = check_credentials(state.users.as_ref(), payload.phone.trim(), &payload.password)
        .await?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        message: "Login successful",
        user: user.into(),
        token,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let Some(user) = state.users.find_by_id(auth.user_id).await? else {
        warn!("token refers to a missing user");
        return Err(AuthError::InvalidToken.into());
    };

    Ok(Json(ProfileResponse {
        user: ProfileUser {
            id: user.id,
            phone: user.phone,
            name: user.name,
            created_at: user.created_at,
        },
    }))
}
