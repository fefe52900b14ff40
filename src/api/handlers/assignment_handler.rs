//! Assignment handlers: authoring, submission and grading.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Assignment, AssignmentView, CreateAssignment, CurrentUser, GradeSubmission, Submission,
    UpdateAssignment,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Submission request. An empty URL is rejected after the enrollment and
/// deadline checks.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    #[schema(example = "https://files.example.com/hw1.pdf")]
    pub file_url: String,
}

/// Create assignment routes
pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment))
        .route("/grade", post(grade_submission))
        .route("/course/:course_id", get(list_assignments))
        .route(
            "/:id",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/:id/submit", post(submit_assignment))
}

/// Assignments of a course
#[utoipa::path(
    get,
    path = "/api/assignments/course/{course_id}",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Owner sees every submission, others only their own", body = Vec<AssignmentView>),
        (status = 403, description = "Caller neither owns nor is enrolled in the course"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn list_assignments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<AssignmentView>>>> {
    let assignments = state
        .assignment_service
        .list(&current_user, course_id)
        .await?;

    Ok(Json(ApiResponse::with_message(
        assignments,
        "Assignments retrieved successfully",
    )))
}

/// One assignment
#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment shaped for the caller", body = AssignmentView),
        (status = 403, description = "Caller neither owns nor is enrolled in the course"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn get_assignment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AssignmentView>>> {
    let assignment = state.assignment_service.get(&current_user, id).await?;
    Ok(Json(ApiResponse::with_message(
        assignment,
        "Assignment retrieved successfully",
    )))
}

/// Create an assignment in a course the caller owns
#[utoipa::path(
    post,
    path = "/api/assignments",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    request_body = CreateAssignment,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller does not own the course")
    )
)]
pub async fn create_assignment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAssignment>,
) -> AppResult<Created<Assignment>> {
    let assignment = state
        .assignment_service
        .create(&current_user, payload)
        .await?;

    Ok(Created(assignment, "Assignment created successfully"))
}

/// Update an assignment
#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignment,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Caller does not own the course"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn update_assignment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAssignment>,
) -> AppResult<Json<ApiResponse<Assignment>>> {
    let assignment = state
        .assignment_service
        .update(&current_user, id, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(
        assignment,
        "Assignment updated successfully",
    )))
}

/// Delete an assignment
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 403, description = "Caller does not own the course"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn delete_assignment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.assignment_service.delete(&current_user, id).await?;
    Ok(Json(ApiResponse::message("Assignment deleted successfully")))
}

/// Submit or resubmit work
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submit",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission recorded", body = Submission),
        (status = 400, description = "Deadline passed or file URL missing"),
        (status = 403, description = "Caller is not an enrolled student"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn submit_assignment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SubmitRequest>,
) -> AppResult<Json<ApiResponse<Submission>>> {
    let submission = state
        .assignment_service
        .submit(&current_user, id, payload.file_url)
        .await?;

    Ok(Json(ApiResponse::with_message(
        submission,
        "Assignment submitted successfully",
    )))
}

/// Grade a student's submission
#[utoipa::path(
    post,
    path = "/api/assignments/grade",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    request_body = GradeSubmission,
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 400, description = "Grade out of range"),
        (status = 403, description = "Caller does not own the course"),
        (status = 404, description = "Assignment or submission not found")
    )
)]
pub async fn grade_submission(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GradeSubmission>,
) -> AppResult<Json<ApiResponse<Submission>>> {
    let submission = state
        .assignment_service
        .grade(&current_user, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(
        submission,
        "Assignment graded successfully",
    )))
}
