//! Handlers for the record resource (`/characters` or `/items`).
//!
//! Every mutating route answers with a redirect to the list page. Database
//! failures become a 500 carrying the operation's message; a missing id
//! becomes a 404.

use axum::extract::{Form, Path, State};
use axum::response::{Html, Redirect};
use roster_core::storage::ImageStore;
use roster_core::types::DbId;
use roster_db::models::record::{CreateRecord, ImageUpdate, UpdateRecord};

use crate::error::{AppError, AppResult, Operation};
use crate::form::{NameForm, RecordForm};
use crate::state::AppState;

/// Where every successful mutation sends the browser.
const LIST_PATH: &str = "/";

/// GET / and GET /{records}
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let kind = state.records.kind();
    let records = state
        .records
        .list()
        .await
        .map_err(AppError::storage(kind, Operation::List))?;
    Ok(state.views.index(&records)?)
}

/// GET /{records}/new
pub async fn new_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(state.views.detail(None)?)
}

/// POST /{records}
///
/// An absent description is stored as the empty string. The name is not
/// validated.
pub async fn create(State(state): State<AppState>, form: RecordForm) -> AppResult<Redirect> {
    let kind = state.records.kind();

    let image_url = match (&state.images, form.image) {
        (Some(store), Some(upload)) => Some(store.store(upload).await?),
        _ => None,
    };

    let input = CreateRecord {
        name: form.name.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
        image_url,
    };

    match state.records.create(&input).await {
        Ok(record) => {
            tracing::info!(record_id = record.id, %kind, "Record created");
            Ok(Redirect::to(LIST_PATH))
        }
        Err(err) => {
            rollback_upload(&state, input.image_url.as_deref()).await;
            Err(AppError::storage(kind, Operation::Create)(err))
        }
    }
}

/// GET /{records}/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let kind = state.records.kind();
    let record = state
        .records
        .find_by_id(id)
        .await
        .map_err(AppError::storage(kind, Operation::Get))?
        .ok_or(AppError::not_found(kind, id))?;
    Ok(state.views.detail(Some(&record))?)
}

/// POST /{records}/{id}
///
/// Full update. With image storage enabled, a newly uploaded file replaces
/// the image. Without one, an empty `existingImage` clears the image and a
/// value matching the stored reference keeps it; any other value is
/// ignored. A reference that stops being stored is discarded once the row
/// is written. With image storage disabled the image column is left alone.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: RecordForm,
) -> AppResult<Redirect> {
    let kind = state.records.kind();
    let RecordForm {
        name,
        description,
        existing_image,
        image,
    } = form;

    let mut replaced_image = None;
    let mut stored_upload = None;
    let image_update = match &state.images {
        None => ImageUpdate::Keep,
        Some(store) => {
            let current = state
                .records
                .find_by_id(id)
                .await
                .map_err(AppError::storage(kind, Operation::Update))?
                .ok_or(AppError::not_found(kind, id))?
                .image_url;
            match image {
                Some(upload) => {
                    let url = store.store(upload).await?;
                    stored_upload = Some(url.clone());
                    replaced_image = current;
                    ImageUpdate::Replace(Some(url))
                }
                None => match existing_image.filter(|url| !url.is_empty()) {
                    None => {
                        replaced_image = current;
                        ImageUpdate::Replace(None)
                    }
                    Some(url) if current.as_deref() == Some(url.as_str()) => ImageUpdate::Keep,
                    Some(url) => {
                        tracing::warn!(
                            record_id = id,
                            %kind,
                            existing_image = %url,
                            "Ignoring image reference that does not match the record"
                        );
                        ImageUpdate::Keep
                    }
                },
            }
        }
    };

    let input = UpdateRecord {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        image: image_update,
    };

    match state.records.update(id, &input).await {
        Ok(Some(_)) => {
            if let (Some(store), Some(old)) = (&state.images, &replaced_image) {
                discard_image(store.as_ref(), old).await;
            }
            tracing::info!(record_id = id, %kind, "Record updated");
            Ok(Redirect::to(LIST_PATH))
        }
        Ok(None) => {
            rollback_upload(&state, stored_upload.as_deref()).await;
            Err(AppError::not_found(kind, id))
        }
        Err(err) => {
            rollback_upload(&state, stored_upload.as_deref()).await;
            Err(AppError::storage(kind, Operation::Update)(err))
        }
    }
}

/// POST /{records}/{id}/name
///
/// Inline rename; description and image are untouched.
pub async fn update_name(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<NameForm>,
) -> AppResult<Redirect> {
    let kind = state.records.kind();
    let name = form.name.unwrap_or_default();
    state
        .records
        .update_name(id, &name)
        .await
        .map_err(AppError::storage(kind, Operation::UpdateName))?
        .ok_or(AppError::not_found(kind, id))?;
    tracing::info!(record_id = id, %kind, "Record renamed");
    Ok(Redirect::to(LIST_PATH))
}

/// POST /{records}/{id}/delete
///
/// Releases the record's image through the configured store before the row
/// is deleted. Failing to release the image does not block the delete.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Redirect> {
    let kind = state.records.kind();
    let record = state
        .records
        .find_by_id(id)
        .await
        .map_err(AppError::storage(kind, Operation::Delete))?
        .ok_or(AppError::not_found(kind, id))?;

    if let (Some(store), Some(url)) = (&state.images, &record.image_url) {
        discard_image(store.as_ref(), url).await;
    }

    let deleted = state
        .records
        .delete(id)
        .await
        .map_err(AppError::storage(kind, Operation::Delete))?;
    if !deleted {
        return Err(AppError::not_found(kind, id));
    }

    tracing::info!(record_id = id, %kind, "Record deleted");
    Ok(Redirect::to(LIST_PATH))
}

/// Best-effort image cleanup; failures are logged, never returned.
async fn discard_image(store: &dyn ImageStore, image_url: &str) {
    if let Err(err) = store.discard(image_url).await {
        tracing::warn!(error = %err, image_url, "Failed to discard image");
    }
}

/// Remove a file stored for a write that did not go through.
async fn rollback_upload(state: &AppState, image_url: Option<&str>) {
    if let (Some(store), Some(url)) = (&state.images, image_url) {
        discard_image(store.as_ref(), url).await;
    }
}
