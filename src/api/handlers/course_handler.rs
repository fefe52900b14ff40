//! Course handlers, including enrollment.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Course, CourseDetail, CourseSummary, CreateCourse, CurrentUser, EnrolledCourse, NewResource,
    Resource, UpdateCourse,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Create course routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/teacher", get(teacher_courses))
        .route("/enrolled", get(enrolled_courses))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
        .route("/:id/resources", post(add_resource))
        .route("/:id/resources/:resource_id", delete(remove_resource))
        .route("/:id/enroll", post(enroll))
}

/// List every course
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All courses without rosters", body = Vec<CourseSummary>)
    )
)]
pub async fn list_courses(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CourseSummary>>>> {
    let courses = state.course_service.list_courses().await?;
    Ok(Json(ApiResponse::with_message(courses, "Courses retrieved successfully")))
}

/// Courses taught by the caller
#[utoipa::path(
    get,
    path = "/api/courses/teacher",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Owned courses with rosters", body = Vec<CourseDetail>),
        (status = 403, description = "Caller is not a teacher")
    )
)]
pub async fn teacher_courses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CourseDetail>>>> {
    let courses = state.course_service.teacher_courses(&current_user).await?;
    Ok(Json(ApiResponse::with_message(
        courses,
        "Teacher courses retrieved successfully",
    )))
}

/// Courses the caller is enrolled in
#[utoipa::path(
    get,
    path = "/api/courses/enrolled",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrolled courses in enrollment order", body = Vec<CourseSummary>)
    )
)]
pub async fn enrolled_courses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CourseSummary>>>> {
    let courses = state.course_service.enrolled_courses(&current_user).await?;
    Ok(Json(ApiResponse::with_message(
        courses,
        "Enrolled courses retrieved successfully",
    )))
}

/// Get one course with teacher and students
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetail),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CourseDetail>>> {
    let course = state.course_service.get_course(id).await?;
    Ok(Json(ApiResponse::with_message(course, "Course retrieved successfully")))
}

/// Create a course owned by the caller
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourse,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not a teacher")
    )
)]
pub async fn create_course(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCourse>,
) -> AppResult<Created<Course>> {
    let course = state
        .course_service
        .create_course(&current_user, payload)
        .await?;

    Ok(Created(course, "Course created successfully"))
}

/// Update a course the caller owns
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourse,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 403, description = "Caller does not own the course"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCourse>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let course = state
        .course_service
        .update_course(&current_user, id, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(course, "Course updated successfully")))
}

/// Delete a course with its assignments and enrollments
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 403, description = "Caller does not own the course"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.course_service.delete_course(&current_user, id).await?;
    Ok(Json(ApiResponse::message("Course deleted successfully")))
}

/// Attach a learning resource
#[utoipa::path(
    post,
    path = "/api/courses/{id}/resources",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = NewResource,
    responses(
        (status = 201, description = "Resource added", body = Resource),
        (status = 403, description = "Caller does not own the course")
    )
)]
pub async fn add_resource(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewResource>,
) -> AppResult<Created<Resource>> {
    let resource = state
        .course_service
        .add_resource(&current_user, id, payload)
        .await?;

    Ok(Created(resource, "Resource added successfully"))
}

/// Remove a learning resource
#[utoipa::path(
    delete,
    path = "/api/courses/{id}/resources/{resource_id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("resource_id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource removed"),
        (status = 404, description = "Course or resource not found")
    )
)]
pub async fn remove_resource(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, resource_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .course_service
        .remove_resource(&current_user, id, resource_id)
        .await?;

    Ok(Json(ApiResponse::message("Resource removed successfully")))
}

/// Enroll the caller in a course
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled", body = EnrolledCourse),
        (status = 400, description = "Already enrolled"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn enroll(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EnrolledCourse>>> {
    let course = state.enrollment_service.enroll(&current_user, id).await?;
    Ok(Json(ApiResponse::with_message(course, "Successfully enrolled in course")))
}
