//! Route definitions for the record resource.
//!
//! The collection is mounted at the record kind's base path
//! (`/characters` or `/items`); the list page is also served at `/`.

use axum::routing::{get, post};
use axum::Router;
use roster_core::record::RecordKind;

use crate::handlers::record;
use crate::state::AppState;

/// Routes for `kind`, relative to the site root.
///
/// ```text
/// GET    /                         -> list
/// GET    /{base}                   -> list
/// POST   /{base}                   -> create
/// GET    /{base}/new               -> new_form
/// GET    /{base}/{id}              -> get_by_id
/// POST   /{base}/{id}              -> update
/// POST   /{base}/{id}/name         -> update_name
/// POST   /{base}/{id}/delete       -> delete
/// ```
pub fn router(kind: RecordKind) -> Router<AppState> {
    let collection = Router::new()
        .route("/", get(record::list).post(record::create))
        .route("/new", get(record::new_form))
        .route("/{id}", get(record::get_by_id).post(record::update))
        .route("/{id}/name", post(record::update_name))
        .route("/{id}/delete", post(record::delete));

    Router::new()
        .route("/", get(record::list))
        .nest(kind.base_path(), collection)
}
