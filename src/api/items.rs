use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ItemDto, MessageResponse};
use crate::api::validation::{validate_item_id, validate_required_text};
use crate::lifecycle::ItemStatus;
use crate::models::{ItemFilter, NewItem};
use crate::services::image::ImageService;

#[derive(Deserialize)]
pub struct ListItemsQuery {
    pub status: Option<String>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

/// GET /items
///
/// Public listing, newest uploads first. `status` narrows to one lifecycle
/// state; `from`/`to` bound the upload date (inclusive calendar days).
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<Vec<ItemDto>>>, ApiError> {
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(s) => match s.parse::<ItemStatus>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                return Err(ApiError::validation(format!(
                    "Invalid status '{}'. Expected one of: {}",
                    s,
                    ItemStatus::ALL.map(|st| st.as_str()).join(", ")
                )));
            }
        },
    };

    let filter = ItemFilter {
        status,
        uploaded_from: params.from,
        uploaded_to: params.to,
    };

    let items = state.store().list_items(&filter).await?;

    Ok(Json(ApiResponse::success(
        items.into_iter().map(ItemDto::from).collect(),
    )))
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ItemDto>>, ApiError> {
    let id = validate_item_id(id)?;

    let item = state
        .store()
        .get_item(id)
        .await?
        .ok_or_else(|| ApiError::item_not_found(id))?;

    Ok(Json(ApiResponse::success(item.into())))
}

/// POST /items
///
/// Multipart intake form: `description`, `found_location` and
/// `collect_location` text fields plus an optional `image` file. The new
/// item always starts out as "lost".
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ItemDto>>, ApiError> {
    let mut description: Option<String> = None;
    let mut found_location: Option<String> = None;
    let mut collect_location: Option<String> = None;
    let mut image: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed upload request: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "description" => description = Some(read_text_field(field).await?),
            "found_location" => found_location = Some(read_text_field(field).await?),
            "collect_location" => collect_location = Some(read_text_field(field).await?),
            "image" => {
                let file_name = field.file_name().map(ToString::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;

                // Browsers submit an empty file part when nothing was picked.
                if let Some(file_name) = file_name
                    && !file_name.is_empty()
                    && !data.is_empty()
                {
                    image = Some((file_name, data));
                }
            }
            _ => {}
        }
    }

    let description =
        validate_required_text("Description", description.as_deref().unwrap_or_default())?
            .to_string();
    let found_location = validate_required_text(
        "Found location",
        found_location.as_deref().unwrap_or_default(),
    )?
    .to_string();
    let collect_location = validate_required_text(
        "Collect location",
        collect_location.as_deref().unwrap_or_default(),
    )?
    .to_string();

    let image_path = if let Some((file_name, data)) = image {
        if !ImageService::is_allowed(&file_name) {
            return Err(ApiError::validation(format!(
                "Unsupported image type (allowed: {})",
                crate::constants::uploads::ALLOWED_IMAGE_EXTENSIONS.join(", ")
            )));
        }

        let filename = state
            .images()
            .save_upload(&file_name, &data)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store image: {e}")))?;
        Some(filename)
    } else {
        None
    };

    let item = state
        .store()
        .add_item(&NewItem {
            description,
            found_location,
            collect_location,
            image_path,
        })
        .await?;

    tracing::info!(item_id = item.id, "Item added");

    Ok(Json(ApiResponse::success(item.into())))
}

/// POST /items/{id}/collect
pub async fn collect_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ItemDto>>, ApiError> {
    let id = validate_item_id(id)?;
    let item = state.store().mark_collected(id).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// POST /items/{id}/archive
pub async fn archive_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ItemDto>>, ApiError> {
    let id = validate_item_id(id)?;
    let item = state.store().archive_item(id).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// POST /items/{id}/restore
pub async fn restore_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ItemDto>>, ApiError> {
    let id = validate_item_id(id)?;
    let item = state.store().restore_item(id).await?;
    Ok(Json(ApiResponse::success(item.into())))
}

/// DELETE /items/{id}
///
/// Deleting an item that no longer exists still succeeds.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_item_id(id)?;

    let existed = state.store().delete_item(id).await?;
    if existed {
        tracing::info!(item_id = id, "Item deleted");
    } else {
        tracing::debug!(item_id = id, "Delete requested for missing item");
    }

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Item deleted".to_string(),
    })))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Failed to read form field: {e}")))
}
