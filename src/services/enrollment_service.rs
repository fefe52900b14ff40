//! Enrollment service - Joins a user to a course roster.
//!
//! Enrollment writes two records: the course roster, then the user's
//! enrollment list and progress. The writes are not atomic. If the second
//! fails the course lists a student without a matching progress entry.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Clock, CurrentUser, EnrolledCourse};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Add the caller to a course's roster
    async fn enroll(&self, actor: &CurrentUser, course_id: Uuid) -> AppResult<EnrolledCourse>;
}

pub struct EnrollmentManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> EnrollmentManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }
}

#[async_trait]
impl<U: UnitOfWork> EnrollmentService for EnrollmentManager<U> {
    async fn enroll(&self, actor: &CurrentUser, course_id: Uuid) -> AppResult<EnrolledCourse> {
        let mut course = self
            .uow
            .courses()
            .find_by_id(course_id)
            .await?
            .ok_or_not_found("Course")?;

        course.enroll(actor.id)?;
        let course = self.uow.courses().save(course).await?;

        let mut user = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_not_found("User")?;
        user.record_enrollment(course.id, self.clock.now());

        if let Err(e) = self.uow.users().save(user).await {
            tracing::error!(
                user_id = %actor.id,
                course_id = %course.id,
                error = %e,
                "Roster updated but user enrollment write failed"
            );
            return Err(e);
        }

        tracing::info!(user_id = %actor.id, course_id = %course.id, "Enrolled in course");
        Ok(EnrolledCourse {
            id: course.id,
            title: course.title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, FixedClock, User, UserRole};
    use crate::errors::AppError;
    use crate::infra::{
        CourseRepository, MockCourseRepository, MockUnitOfWork, MockUserRepository,
        UserRepository,
    };
    use chrono::Utc;

    fn course(students: Vec<Uuid>) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            title: "Databases".into(),
            description: "Relational theory".into(),
            teacher_id: Uuid::new_v4(),
            student_ids: students,
            resources: vec![],
            syllabus: vec![],
            start_date: now,
            end_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn manager(users: MockUserRepository, courses: MockCourseRepository) -> EnrollmentManager<MockUnitOfWork> {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let courses: Arc<dyn CourseRepository> = Arc::new(courses);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());
        uow.expect_courses().returning(move || courses.clone());
        EnrollmentManager::new(Arc::new(uow), Arc::new(FixedClock::new(Utc::now())))
    }

    #[tokio::test]
    async fn test_enroll_updates_roster_then_user() {
        let student = User::new(
            Uuid::new_v4(),
            "s@example.com".into(),
            "hash".into(),
            "S".into(),
            UserRole::Student,
        );
        let actor = CurrentUser::from(&student);
        let target = course(vec![]);
        let course_id = target.id;
        let student_id = student.id;

        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        courses
            .expect_save()
            .withf(move |c| c.student_ids == vec![student_id])
            .times(1)
            .returning(|c| Ok(c));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(student.clone())));
        users
            .expect_save()
            .withf(move |u| {
                u.enrolled_course_ids == vec![course_id]
                    && u.progress.len() == 1
                    && u.progress[0].completed_unit_ids.is_empty()
            })
            .times(1)
            .returning(|u| Ok(u));

        let enrolled = manager(users, courses).enroll(&actor, course_id).await.unwrap();
        assert_eq!(enrolled.id, course_id);
        assert_eq!(enrolled.title, "Databases");
    }

    #[tokio::test]
    async fn test_second_enroll_is_rejected_without_writes() {
        let actor = CurrentUser {
            id: Uuid::new_v4(),
            email: "s@example.com".into(),
            role: UserRole::Student,
        };
        let target = course(vec![actor.id]);
        let course_id = target.id;

        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        courses.expect_save().never();
        let mut users = MockUserRepository::new();
        users.expect_save().never();

        let result = manager(users, courses).enroll(&actor, course_id).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_enroll_unknown_course() {
        let actor = CurrentUser {
            id: Uuid::new_v4(),
            email: "s@example.com".into(),
            role: UserRole::Student,
        };
        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(MockUserRepository::new(), courses)
            .enroll(&actor, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(ref e)) if e == "Course"));
    }
}
