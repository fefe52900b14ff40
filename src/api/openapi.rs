//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{assignment_handler, auth_handler, course_handler, note_handler};
use crate::domain::{
    AccountExport, Assignment, AssignmentView, Attachment, ConnectedAccounts, Course,
    CourseDetail, CourseProgress, CourseSummary, CreateAssignment, CreateCourse, CreateNote,
    DisplaySettings, EnrolledCourse, ExportedProfile, FontSize, GradeSubmission, NewResource,
    Note, NotificationSettings, ParticipantAssignment, Profile, Resource, ResourceKind, Settings,
    SettingsKind, Submission, SyllabusUnit, Theme, UpdateAssignment, UpdateCourse, UpdateNote,
    UserResponse, UserRole, UserSummary,
};
use crate::services::AuthSession;

/// OpenAPI documentation for the LMS API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMS API",
        version = "0.1.0",
        description = "Courses, enrollment, assignments, submissions and grading",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::get_profile,
        auth_handler::update_profile,
        auth_handler::change_password,
        auth_handler::update_settings,
        auth_handler::export_data,
        auth_handler::delete_account,
        course_handler::list_courses,
        course_handler::teacher_courses,
        course_handler::enrolled_courses,
        course_handler::get_course,
        course_handler::create_course,
        course_handler::update_course,
        course_handler::delete_course,
        course_handler::add_resource,
        course_handler::remove_resource,
        course_handler::enroll,
        assignment_handler::list_assignments,
        assignment_handler::get_assignment,
        assignment_handler::create_assignment,
        assignment_handler::update_assignment,
        assignment_handler::delete_assignment,
        assignment_handler::submit_assignment,
        assignment_handler::grade_submission,
        note_handler::list_notes,
        note_handler::get_note,
        note_handler::create_note,
        note_handler::update_note,
        note_handler::delete_note,
    ),
    components(
        schemas(
            // Accounts
            UserRole,
            UserResponse,
            UserSummary,
            Profile,
            Settings,
            SettingsKind,
            ConnectedAccounts,
            NotificationSettings,
            DisplaySettings,
            Theme,
            FontSize,
            CourseProgress,
            AccountExport,
            ExportedProfile,
            AuthSession,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::UpdateProfileRequest,
            auth_handler::ChangePasswordRequest,
            auth_handler::UpdateSettingsRequest,
            // Courses
            Course,
            CourseSummary,
            CourseDetail,
            CreateCourse,
            UpdateCourse,
            Resource,
            ResourceKind,
            NewResource,
            SyllabusUnit,
            EnrolledCourse,
            // Assignments
            Assignment,
            AssignmentView,
            ParticipantAssignment,
            Submission,
            CreateAssignment,
            UpdateAssignment,
            GradeSubmission,
            assignment_handler::SubmitRequest,
            // Notes
            Note,
            Attachment,
            CreateNote,
            UpdateNote,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Account", description = "The caller's own profile, settings and data"),
        (name = "Courses", description = "Course catalogue, resources and enrollment"),
        (name = "Assignments", description = "Assignment authoring, submission and grading"),
        (name = "Notes", description = "Private study notes")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
