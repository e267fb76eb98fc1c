//! Race order template routes.
//!
//! Administrators list, create, edit, export and delete team race order
//! templates. Every handler requires an admin API key.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Form;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    DeleteRaceOrdersRequest, DeleteRaceOrdersResponse, FrequencyChoice, ListRaceOrdersResponse,
    RaceOrder, RaceOrderGrid, RaceOrderMetadataForm, RaceOrderSummary, RotationFrequency,
    SaveRaceOrderResponse, SubmitRaceOrderRequest,
};
use domain::services::{build_grid, parse_metadata, prepare_template, RaceOrderStore};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::{record_template_saved, record_templates_deleted};

const INVALID_EDIT_ID: &str = "Invalid template ID requested for editing.";

/// Loads a template by its raw path/form id, mapping both malformed and
/// unknown ids to `not_found`.
async fn load_template(
    store: &dyn RaceOrderStore,
    raw_id: &str,
    not_found: impl FnOnce() -> String,
) -> Result<RaceOrder, ApiError> {
    let id = match Uuid::parse_str(raw_id.trim()) {
        Ok(id) => id,
        Err(_) => return Err(ApiError::NotFound(not_found())),
    };
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(not_found()))
}

/// GET /api/v1/race-orders
///
/// All templates, plus the rotation frequencies a new template may use.
pub async fn list_race_orders(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<ListRaceOrdersResponse>, ApiError> {
    let data = state
        .store
        .list()
        .await?
        .into_iter()
        .map(RaceOrderSummary::from)
        .collect();

    let frequencies = RotationFrequency::all()
        .iter()
        .map(|&value| FrequencyChoice {
            value,
            label: value.label(),
        })
        .collect();

    Ok(Json(ListRaceOrdersResponse { data, frequencies }))
}

/// GET /api/v1/race-orders/new?teams=&divs=&frequency=&boats=
///
/// Validates the metadata and returns the empty pairing grid. When a
/// template already exists for these parameters the grid is prefilled from
/// it and carries its id, so saving edits that template.
pub async fn new_race_order(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(form): Query<RaceOrderMetadataForm>,
) -> Result<Json<RaceOrderGrid>, ApiError> {
    let key = parse_metadata(&form, &state.config.limits.form_limits())?;
    let existing = state.store.find_existing(&key).await?;
    Ok(Json(build_grid(&key, existing.as_ref())))
}

/// GET /api/v1/race-orders/:id
///
/// Pairing grid of an existing template, prefilled for editing.
pub async fn get_race_order(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<RaceOrderGrid>, ApiError> {
    let template = load_template(state.store.as_ref(), &id, || INVALID_EDIT_ID.to_string()).await?;
    Ok(Json(build_grid(&template.key, Some(&template))))
}

/// POST /api/v1/race-orders
///
/// Creates a template from form metadata and pairings, replacing any
/// template with the same parameters. When `template` is present the
/// stored template is edited instead and its own parameters are used.
pub async fn submit_race_order(
    State(state): State<AppState>,
    auth: AdminAuth,
    Form(request): Form<SubmitRaceOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    if let Some(template_id) = request.template_id() {
        let existing = load_template(state.store.as_ref(), template_id, || {
            INVALID_EDIT_ID.to_string()
        })
        .await?;

        let mut template = prepare_template(existing.key.clone(), &request, Some(auth.author()))?;
        // An edit without a description field keeps the stored one; an empty
        // value clears it.
        if request.description.is_none() {
            template.description = existing.description.clone();
        }
        let saved = state.store.save(template).await?;
        record_template_saved(false);

        info!(
            template_id = %saved.id,
            key = %saved.key,
            races = saved.len(),
            admin_key_id = auth.key_id,
            "Race order template edited"
        );

        let message = format!(
            "Edited template for {} teams in {} boats.",
            saved.key.num_teams, saved.key.num_boats
        );
        return Ok((
            StatusCode::OK,
            Json(SaveRaceOrderResponse {
                message,
                template: saved,
            }),
        ));
    }

    let key = parse_metadata(&request.metadata(), &state.config.limits.form_limits())?;
    let replaced = state.store.find_existing(&key).await?.is_some();
    let template = prepare_template(key, &request, Some(auth.author()))?;
    let saved = state.store.save(template).await?;
    record_template_saved(!replaced);

    info!(
        template_id = %saved.id,
        key = %saved.key,
        races = saved.len(),
        replaced = replaced,
        admin_key_id = auth.key_id,
        "Race order template saved"
    );

    let message = format!(
        "Created new team race order template for {} teams in {} boats.",
        saved.key.num_teams, saved.key.num_boats
    );
    let status = if replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(SaveRaceOrderResponse {
            message,
            template: saved,
        }),
    ))
}

/// GET /api/v1/race-orders/:id/export
///
/// Plain-text dump of the order, one `A<TAB>B` line per race. The output
/// can be pasted back into the `race_order` field.
pub async fn export_race_order(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let template = load_template(state.store.as_ref(), &id, || {
        "Invalid template ID requested for export.".to_string()
    })
    .await?;

    let disposition = format!("attachment; filename=\"race-order-{}.txt\"", template.key);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        template.export_dump(),
    ))
}

/// DELETE /api/v1/race-orders/:id
pub async fn delete_race_order(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<DeleteRaceOrdersResponse>, ApiError> {
    let template = load_template(state.store.as_ref(), &id, || {
        format!("Invalid template to delete: {}", id)
    })
    .await?;

    let deleted = state.store.delete_many(&[template.id]).await?;
    record_templates_deleted(deleted);

    info!(
        template_id = %template.id,
        key = %template.key,
        admin_key_id = auth.key_id,
        "Race order template deleted"
    );

    Ok(Json(delete_response(deleted)))
}

/// POST /api/v1/race-orders/delete
///
/// Deletes several templates. Every id is checked first; an unknown id
/// aborts the request before anything is removed.
pub async fn delete_race_orders(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(request): Json<DeleteRaceOrdersRequest>,
) -> Result<Json<DeleteRaceOrdersResponse>, ApiError> {
    request.validate()?;

    let mut ids = Vec::with_capacity(request.templates.len());
    for raw_id in &request.templates {
        let template = load_template(state.store.as_ref(), raw_id, || {
            format!("Invalid template to delete: {}", raw_id)
        })
        .await?;
        ids.push(template.id);
    }

    let deleted = state.store.delete_many(&ids).await?;
    record_templates_deleted(deleted);

    info!(
        requested = request.templates.len(),
        deleted = deleted,
        admin_key_id = auth.key_id,
        "Race order templates deleted"
    );

    Ok(Json(delete_response(deleted)))
}

fn delete_response(deleted: u64) -> DeleteRaceOrdersResponse {
    let message = if deleted == 0 {
        "No templates were deleted.".to_string()
    } else {
        format!("Deleted {} template(s).", deleted)
    };
    DeleteRaceOrdersResponse {
        message,
        deleted: deleted as usize,
    }
}
