//! Translation endpoint
//!
//! `POST /translate` with `{code?, system?, text?}`. Negative lookups are a
//! 200 with `result: false`; only validation problems and collaborator
//! failures surface as error statuses (see `error.rs`).

use crate::{
    models::{TranslationQuery, TranslationResponse},
    state::AppState,
    Result,
};
use axum::{extract::State, Json};

pub async fn translate(
    State(state): State<AppState>,
    Json(query): Json<TranslationQuery>,
) -> Result<Json<TranslationResponse>> {
    let outcome = state.translator.translate(&query).await?;
    Ok(Json(outcome.into()))
}
