//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the authorization guards. Nothing here
//! touches the database or HTTP.

pub mod assignment;
pub mod clock;
pub mod course;
pub mod guards;
pub mod note;
pub mod password;
pub mod user;

pub use assignment::{
    Assignment, AssignmentView, CreateAssignment, GradeSubmission, NewAssignment,
    ParticipantAssignment, Submission, UpdateAssignment,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use course::{
    Course, CourseDetail, CourseSummary, CreateCourse, EnrolledCourse, NewCourse, NewResource,
    Resource, ResourceKind, SyllabusUnit, UpdateCourse,
};
pub use note::{Attachment, CreateNote, NewNote, Note, UpdateNote};
pub use password::Password;
pub use user::{
    normalize_email, AccountExport, ConnectedAccounts, CourseProgress, CurrentUser,
    DisplaySettings, ExportedProfile, FontSize, NewUser, NotificationSettings, Profile, Settings,
    SettingsKind, SettingsUpdate, Theme, UpdateProfile, User, UserResponse, UserRole, UserSummary,
};
