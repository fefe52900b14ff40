//! Note handlers. Notes are private to the student who wrote them.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CreateNote, CurrentUser, Note, UpdateNote};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NoteFilter {
    /// Only notes for this course
    pub course_id: Option<Uuid>,
}

/// Create note routes
pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", get(get_note).put(update_note).delete(delete_note))
}

#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(NoteFilter),
    responses(
        (status = 200, description = "The caller's notes, newest first", body = Vec<Note>)
    )
)]
pub async fn list_notes(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(filter): Query<NoteFilter>,
) -> AppResult<Json<ApiResponse<Vec<Note>>>> {
    let notes = state
        .note_service
        .list(&current_user, filter.course_id)
        .await?;

    Ok(Json(ApiResponse::with_message(notes, "Notes retrieved successfully")))
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note", body = Note),
        (status = 403, description = "Note belongs to someone else"),
        (status = 404, description = "Note not found")
    )
)]
pub async fn get_note(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Note>>> {
    let note = state.note_service.get(&current_user, id).await?;
    Ok(Json(ApiResponse::with_message(note, "Note retrieved successfully")))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    request_body = CreateNote,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 403, description = "Caller is not an enrolled student")
    )
)]
pub async fn create_note(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateNote>,
) -> AppResult<Created<Note>> {
    let note = state.note_service.create(&current_user, payload).await?;
    Ok(Created(note, "Note created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Note ID")),
    request_body = UpdateNote,
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 403, description = "Note belongs to someone else")
    )
)]
pub async fn update_note(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateNote>,
) -> AppResult<Json<ApiResponse<Note>>> {
    let note = state
        .note_service
        .update(&current_user, id, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(note, "Note updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note deleted"),
        (status = 403, description = "Note belongs to someone else")
    )
)]
pub async fn delete_note(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.note_service.delete(&current_user, id).await?;
    Ok(Json(ApiResponse::message("Note deleted successfully")))
}
