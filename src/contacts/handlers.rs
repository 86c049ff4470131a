use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{
        DeleteResponse, MyContactsResponse, SearchRequest, SearchResponse, UploadRequest,
        UploadResponse,
    },
    repo_types::ContactStats,
    services,
};
use crate::{
    auth::extractors::AuthUser, error::AppResult, state::AppState, validation::require_phone,
    validation::ValidJson,
};

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts/upload", post(upload))
        .route("/contacts/search", post(search))
        .route("/contacts/my-contacts", get(my_contacts).delete(delete_my_contacts))
        .route("/contacts/stats", get(stats))
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.user_id, batch = body.contacts.len()))]
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<UploadRequest>,
) -> AppResult<Json<UploadResponse>> {
    let outcome =
        services::replace_contacts(state.contacts.as_ref(), auth.user_id, &body.contacts).await?;

    Ok(Json(UploadResponse {
        message: "Contacts uploaded successfully",
        count: outcome.inserted,
        skipped: outcome.skipped,
    }))
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.user_id, caller_phone = %auth.phone))]
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    let target = body.phone_number.trim();
    require_phone("phoneNumber", target)?;

    let viewer = body.my_phone.as_deref().map(str::trim);
    if let Some(viewer) = viewer {
        require_phone("myPhone", viewer)?;
    }

    let results = services::reverse_lookup(state.contacts.as_ref(), target, viewer).await?;
    info!(hits = results.len(), "contact search");

    Ok(Json(SearchResponse {
        phone_number: target.to_string(),
        total_results: results.len(),
        results,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn my_contacts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<MyContactsResponse>> {
    let contacts = services::my_contacts(state.contacts.as_ref(), auth.user_id).await?;
    Ok(Json(MyContactsResponse {
        count: contacts.len(),
        contacts,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn delete_my_contacts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DeleteResponse>> {
    let deleted_count = state.contacts.clear(auth.user_id).await?;
    info!(deleted_count, "contacts deleted");
    Ok(Json(DeleteResponse {
        message: "Contacts deleted successfully",
        deleted_count,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn stats(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<ContactStats>> {
    Ok(Json(state.contacts.stats(auth.user_id).await?))
}
