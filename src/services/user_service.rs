//! User service - Account profile, settings and lifecycle.
//!
//! Every operation acts on the caller's own account.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    normalize_email, AccountExport, CurrentUser, Password, SettingsKind, SettingsUpdate,
    UpdateProfile, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update name, email or profile details; absent fields are kept
    async fn update_profile(&self, actor: &CurrentUser, update: UpdateProfile) -> AppResult<User>;

    /// Replace the password after checking the current one
    async fn change_password(
        &self,
        actor: &CurrentUser,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Replace exactly one settings section
    async fn update_settings(
        &self,
        actor: &CurrentUser,
        kind: SettingsKind,
        payload: serde_json::Value,
    ) -> AppResult<User>;

    /// Portable copy of the account's data
    async fn export_account(&self, actor: &CurrentUser) -> AppResult<AccountExport>;

    /// Delete the account and detach it from courses and notes
    async fn delete_account(&self, actor: &CurrentUser) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn update_profile(&self, actor: &CurrentUser, update: UpdateProfile) -> AppResult<User> {
        let mut user = self.get_user(actor.id).await?;

        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Name cannot be empty"));
            }
            user.name = name.to_string();
        }

        if let Some(email) = update.email {
            let email = normalize_email(&email);
            if email.is_empty() {
                return Err(AppError::validation("Email cannot be empty"));
            }
            if email != user.email {
                if let Some(other) = self.uow.users().find_by_email(&email).await? {
                    if other.id != user.id {
                        return Err(AppError::conflict("Email"));
                    }
                }
                user.email = email;
            }
        }

        // An empty string clears an optional profile field
        if let Some(phone) = update.phone {
            user.profile.phone = optional_text(phone);
        }
        if let Some(bio) = update.bio {
            user.profile.bio = optional_text(bio);
        }
        if let Some(avatar) = update.avatar {
            user.profile.avatar = optional_text(avatar);
        }

        user.updated_at = chrono::Utc::now();
        self.uow.users().save(user).await
    }

    async fn change_password(
        &self,
        actor: &CurrentUser,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let mut user = self.get_user(actor.id).await?;

        if !Password::from_hash(user.password_hash.clone()).verify(&current_password) {
            return Err(AppError::validation("Current password is incorrect"));
        }

        user.password_hash = Password::new(&new_password)?.into_string();
        user.updated_at = chrono::Utc::now();
        self.uow.users().save(user).await?;

        tracing::info!(user_id = %actor.id, "Password changed");
        Ok(())
    }

    async fn update_settings(
        &self,
        actor: &CurrentUser,
        kind: SettingsKind,
        payload: serde_json::Value,
    ) -> AppResult<User> {
        let update = SettingsUpdate::parse(kind, payload)?;
        let mut user = self.get_user(actor.id).await?;

        user.settings.apply(update);
        user.updated_at = chrono::Utc::now();
        self.uow.users().save(user).await
    }

    async fn export_account(&self, actor: &CurrentUser) -> AppResult<AccountExport> {
        let user = self.get_user(actor.id).await?;
        Ok(AccountExport::from(user))
    }

    async fn delete_account(&self, actor: &CurrentUser) -> AppResult<()> {
        let user = self.get_user(actor.id).await?;

        let owned = self.uow.courses().list_by_teacher(user.id).await?;
        if !owned.is_empty() {
            return Err(AppError::invalid_state(format!(
                "Delete or hand over your {} course(s) before deleting the account",
                owned.len()
            )));
        }

        let enrolled = self
            .uow
            .courses()
            .find_by_ids(user.enrolled_course_ids.clone())
            .await?;
        for mut course in enrolled {
            if course.has_student(user.id) {
                course.remove_student(user.id);
                self.uow.courses().save(course).await?;
            }
        }

        let removed_notes = self.uow.notes().delete_by_student(user.id).await?;
        self.uow.users().delete(user.id).await?;

        tracing::info!(user_id = %user.id, removed_notes, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, UserRole};
    use crate::infra::{
        CourseRepository, MockCourseRepository, MockNoteRepository, MockUnitOfWork,
        MockUserRepository, NoteRepository, UserRepository,
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    fn user(role: UserRole) -> User {
        User::new(
            Uuid::new_v4(),
            "me@example.com".into(),
            Password::new("secret1").unwrap().into_string(),
            "Me".into(),
            role,
        )
    }

    fn course(teacher_id: Uuid, students: Vec<Uuid>) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            title: "Course".into(),
            description: "Description".into(),
            teacher_id,
            student_ids: students,
            resources: vec![],
            syllabus: vec![],
            start_date: now,
            end_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn uow(
        users: MockUserRepository,
        courses: MockCourseRepository,
        notes: MockNoteRepository,
    ) -> Arc<MockUnitOfWork> {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let courses: Arc<dyn CourseRepository> = Arc::new(courses);
        let notes: Arc<dyn NoteRepository> = Arc::new(notes);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());
        uow.expect_courses().returning(move || courses.clone());
        uow.expect_notes().returning(move || notes.clone());
        Arc::new(uow)
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let me = user(UserRole::Student);
        let actor = CurrentUser::from(&me);
        let other = User::new(
            Uuid::new_v4(),
            "taken@example.com".into(),
            "hash".into(),
            "Other".into(),
            UserRole::Student,
        );

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(me.clone())));
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(other.clone())));
        users.expect_save().never();

        let service = UserManager::new(uow(users, MockCourseRepository::new(), MockNoteRepository::new()));
        let result = service
            .update_profile(
                &actor,
                UpdateProfile {
                    email: Some("Taken@example.com".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_change_password_requires_current_password() {
        let me = user(UserRole::Student);
        let actor = CurrentUser::from(&me);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(me.clone())));
        users.expect_save().never();

        let service = UserManager::new(uow(users, MockCourseRepository::new(), MockNoteRepository::new()));
        let result = service
            .change_password(&actor, "wrong".into(), "newsecret".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_settings_replaces_one_section() {
        let me = user(UserRole::Student);
        let actor = CurrentUser::from(&me);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(me.clone())));
        users.expect_save().returning(|u| Ok(u));

        let service = UserManager::new(uow(users, MockCourseRepository::new(), MockNoteRepository::new()));
        let updated = service
            .update_settings(&actor, SettingsKind::Language, serde_json::json!("Deutsch"))
            .await
            .unwrap();

        assert_eq!(updated.settings.language, "Deutsch");
        assert!(!updated.settings.two_factor_enabled);
    }

    #[tokio::test]
    async fn test_teacher_with_courses_cannot_delete_account() {
        let me = user(UserRole::Teacher);
        let actor = CurrentUser::from(&me);
        let owned = course(me.id, vec![]);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(me.clone())));
        users.expect_delete().never();
        let mut courses = MockCourseRepository::new();
        courses
            .expect_list_by_teacher()
            .returning(move |_| Ok(vec![owned.clone()]));

        let service = UserManager::new(uow(users, courses, MockNoteRepository::new()));
        let result = service.delete_account(&actor).await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_student_account_deletion_leaves_rosters() {
        let mut me = user(UserRole::Student);
        let enrolled = course(Uuid::new_v4(), vec![me.id]);
        me.record_enrollment(enrolled.id, Utc::now());
        let actor = CurrentUser::from(&me);
        let me_id = me.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(me.clone())));
        users
            .expect_delete()
            .with(eq(me_id))
            .times(1)
            .returning(|_| Ok(()));
        let mut courses = MockCourseRepository::new();
        courses.expect_list_by_teacher().returning(|_| Ok(vec![]));
        courses
            .expect_find_by_ids()
            .returning(move |_| Ok(vec![enrolled.clone()]));
        courses
            .expect_save()
            .withf(move |c| !c.has_student(me_id))
            .times(1)
            .returning(|c| Ok(c));
        let mut notes = MockNoteRepository::new();
        notes
            .expect_delete_by_student()
            .with(eq(me_id))
            .times(1)
            .returning(|_| Ok(2));

        let service = UserManager::new(uow(users, courses, notes));
        service.delete_account(&actor).await.unwrap();
    }
}
