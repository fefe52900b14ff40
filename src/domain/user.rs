//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{DEFAULT_LANGUAGE, ROLE_STUDENT, ROLE_TEACHER};
use crate::errors::{AppError, AppResult};

/// User roles enumeration. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Student,
}

impl UserRole {
    pub fn is_teacher(&self) -> bool {
        matches!(self, UserRole::Teacher)
    }

    pub fn is_student(&self) -> bool {
        matches!(self, UserRole::Student)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_TEACHER => UserRole::Teacher,
            _ => UserRole::Student,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Teacher => write!(f, "{}", ROLE_TEACHER),
            UserRole::Student => write!(f, "{}", ROLE_STUDENT),
        }
    }
}

/// Optional public profile details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedAccounts {
    pub google: bool,
    pub github: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub course_updates: bool,
    pub assignment_reminders: bool,
    pub discussion_replies: bool,
    pub promotional_emails: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            course_updates: true,
            assignment_reminders: true,
            discussion_replies: false,
            promotional_emails: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub theme: Theme,
    pub font_size: FontSize,
}

/// Per-user preferences. Every section defaults independently, so a
/// partially stored document still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub two_factor_enabled: bool,
    pub connected_accounts: ConnectedAccounts,
    pub notifications: NotificationSettings,
    pub display: DisplaySettings,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            two_factor_enabled: false,
            connected_accounts: ConnectedAccounts::default(),
            notifications: NotificationSettings::default(),
            display: DisplaySettings::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Settings section addressed by an update request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SettingsKind {
    TwoFactorEnabled,
    ConnectedAccounts,
    Notifications,
    Display,
    Language,
}

/// A typed replacement for exactly one settings section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    TwoFactorEnabled(bool),
    ConnectedAccounts(ConnectedAccounts),
    Notifications(NotificationSettings),
    Display(DisplaySettings),
    Language(String),
}

impl SettingsUpdate {
    /// Decode the raw payload for `kind` into its typed section.
    pub fn parse(kind: SettingsKind, payload: serde_json::Value) -> AppResult<Self> {
        fn decode<T: serde::de::DeserializeOwned>(
            kind: SettingsKind,
            payload: serde_json::Value,
        ) -> AppResult<T> {
            serde_json::from_value(payload)
                .map_err(|e| AppError::validation(format!("Invalid {:?} settings: {}", kind, e)))
        }

        let update = match kind {
            SettingsKind::TwoFactorEnabled => Self::TwoFactorEnabled(decode(kind, payload)?),
            SettingsKind::ConnectedAccounts => Self::ConnectedAccounts(decode(kind, payload)?),
            SettingsKind::Notifications => Self::Notifications(decode(kind, payload)?),
            SettingsKind::Display => Self::Display(decode(kind, payload)?),
            SettingsKind::Language => {
                let language: String = decode(kind, payload)?;
                let language = language.trim().to_string();
                if language.is_empty() {
                    return Err(AppError::validation("Language cannot be empty"));
                }
                Self::Language(language)
            }
        };

        Ok(update)
    }
}

impl Settings {
    /// Replace one section, leaving the rest untouched.
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::TwoFactorEnabled(enabled) => self.two_factor_enabled = enabled,
            SettingsUpdate::ConnectedAccounts(accounts) => self.connected_accounts = accounts,
            SettingsUpdate::Notifications(notifications) => self.notifications = notifications,
            SettingsUpdate::Display(display) => self.display = display,
            SettingsUpdate::Language(language) => self.language = language,
        }
    }
}

/// Progress through one enrolled course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: Uuid,
    /// Unit labels, kept unique
    pub completed_unit_ids: Vec<String>,
    pub last_accessed: DateTime<Utc>,
}

impl CourseProgress {
    pub fn started(course_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            course_id,
            completed_unit_ids: Vec::new(),
            last_accessed: now,
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub profile: Profile,
    pub settings: Settings,
    pub enrolled_course_ids: Vec<Uuid>,
    pub progress: Vec<CourseProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with default profile and settings
    pub fn new(id: Uuid, email: String, password_hash: String, name: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            role,
            profile: Profile::default(),
            settings: Settings::default(),
            enrolled_course_ids: Vec::new(),
            progress: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_enrolled_in(&self, course_id: Uuid) -> bool {
        self.enrolled_course_ids.contains(&course_id)
    }

    /// Record enrollment on the user side. Adds the course id and its
    /// progress entry together, skipping whichever already exists.
    pub fn record_enrollment(&mut self, course_id: Uuid, now: DateTime<Utc>) {
        if !self.is_enrolled_in(course_id) {
            self.enrolled_course_ids.push(course_id);
        }
        if !self.progress.iter().any(|p| p.course_id == course_id) {
            self.progress.push(CourseProgress::started(course_id, now));
        }
        self.updated_at = now;
    }

    /// Drop the course from both enrollment lists.
    pub fn remove_enrollment(&mut self, course_id: Uuid) {
        self.enrolled_course_ids.retain(|id| *id != course_id);
        self.progress.retain(|p| p.course_id != course_id);
        self.updated_at = Utc::now();
    }
}

/// Trim and lowercase an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Acting-user context established by authentication and passed
/// explicitly into every guarded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Fields required to create a user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
}

/// Profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: String,
    pub role: UserRole,
    pub profile: Profile,
    pub settings: Settings,
    pub enrolled_course_ids: Vec<Uuid>,
    pub progress: Vec<CourseProgress>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            profile: user.profile,
            settings: user.settings,
            enrolled_course_ids: user.enrolled_course_ids,
            progress: user.progress,
            created_at: user.created_at,
        }
    }
}

/// Minimal user reference embedded in course responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Portable copy of everything stored about an account
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountExport {
    pub profile: ExportedProfile,
    pub settings: Settings,
    pub courses: Vec<Uuid>,
    pub progress: Vec<CourseProgress>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportedProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_info: Profile,
    pub join_date: DateTime<Utc>,
}

impl From<User> for AccountExport {
    fn from(user: User) -> Self {
        Self {
            profile: ExportedProfile {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                profile_info: user.profile,
                join_date: user.created_at,
            },
            settings: user.settings,
            courses: user.enrolled_course_ids,
            progress: user.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student() -> User {
        User::new(
            Uuid::new_v4(),
            "s@example.com".into(),
            "hash".into(),
            "Student".into(),
            UserRole::Student,
        )
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!(UserRole::from("teacher"), UserRole::Teacher);
        assert_eq!(UserRole::from("student"), UserRole::Student);
        assert_eq!(UserRole::Teacher.to_string(), "teacher");
        assert_eq!(String::from(UserRole::Student), "student");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(!settings.two_factor_enabled);
        assert!(settings.notifications.course_updates);
        assert!(!settings.notifications.promotional_emails);
        assert_eq!(settings.display.theme, Theme::Light);
        assert_eq!(settings.display.font_size, FontSize::Medium);
        assert_eq!(settings.language, "English");
    }

    #[test]
    fn test_partial_settings_document_fills_defaults() {
        let settings: Settings = serde_json::from_value(json!({
            "display": { "theme": "dark" }
        }))
        .unwrap();
        assert_eq!(settings.display.theme, Theme::Dark);
        assert_eq!(settings.display.font_size, FontSize::Medium);
        assert!(settings.notifications.assignment_reminders);
    }

    #[test]
    fn test_settings_update_replaces_single_section() {
        let mut settings = Settings::default();
        let update = SettingsUpdate::parse(
            SettingsKind::Notifications,
            json!({ "courseUpdates": false, "discussionReplies": true }),
        )
        .unwrap();
        settings.apply(update);

        assert!(!settings.notifications.course_updates);
        assert!(settings.notifications.discussion_replies);
        assert_eq!(settings.language, "English");
    }

    #[test]
    fn test_settings_update_rejects_wrong_shape() {
        let result = SettingsUpdate::parse(SettingsKind::TwoFactorEnabled, json!("yes"));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = SettingsUpdate::parse(SettingsKind::Language, json!("  "));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_record_enrollment_keeps_lists_in_step() {
        let mut user = student();
        let course = Uuid::new_v4();
        let now = Utc::now();

        user.record_enrollment(course, now);
        user.record_enrollment(course, now);

        assert_eq!(user.enrolled_course_ids, vec![course]);
        assert_eq!(user.progress.len(), 1);
        assert_eq!(user.progress[0].course_id, course);
        assert!(user.progress[0].completed_unit_ids.is_empty());
    }

    #[test]
    fn test_remove_enrollment_drops_progress() {
        let mut user = student();
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        user.record_enrollment(keep, Utc::now());
        user.record_enrollment(drop, Utc::now());

        user.remove_enrollment(drop);

        assert_eq!(user.enrolled_course_ids, vec![keep]);
        assert_eq!(user.progress.len(), 1);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let value = serde_json::to_value(student()).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("enrolledCourseIds").is_some());
    }
}
