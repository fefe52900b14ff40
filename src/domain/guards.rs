//! Authorization guards.
//!
//! Pure predicates over the acting user and a fetched record. Operations
//! combine them explicitly; no guard consults another. The `require_*`
//! helpers turn a failed predicate into `Forbidden`.

use super::course::Course;
use super::user::CurrentUser;
use crate::errors::{AppError, AppResult};

pub fn is_teacher(user: &CurrentUser) -> bool {
    user.role.is_teacher()
}

pub fn is_student(user: &CurrentUser) -> bool {
    user.role.is_student()
}

pub fn owns_course(user: &CurrentUser, course: &Course) -> bool {
    user.id == course.teacher_id
}

pub fn is_enrolled(user: &CurrentUser, course: &Course) -> bool {
    course.has_student(user.id)
}

/// Require teacher role.
pub fn require_teacher(user: &CurrentUser, message: &str) -> AppResult<()> {
    if is_teacher(user) {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// Require student role.
pub fn require_student(user: &CurrentUser, message: &str) -> AppResult<()> {
    if is_student(user) {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// Require that the user is the course's owning teacher.
pub fn require_owner(user: &CurrentUser, course: &Course, message: &str) -> AppResult<()> {
    if owns_course(user, course) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, course_id = %course.id, "Course ownership check failed");
        Err(AppError::forbidden(message))
    }
}

/// Require that the user is on the course roster.
pub fn require_enrolled(user: &CurrentUser, course: &Course, message: &str) -> AppResult<()> {
    if is_enrolled(user, course) {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// Require ownership or enrollment (read access to course material).
pub fn require_member(user: &CurrentUser, course: &Course, message: &str) -> AppResult<()> {
    if owns_course(user, course) || is_enrolled(user, course) {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            role,
        }
    }

    fn course(teacher_id: Uuid, student_ids: Vec<Uuid>) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            title: "Course".into(),
            description: "Description".into(),
            teacher_id,
            student_ids,
            resources: vec![],
            syllabus: vec![],
            start_date: now,
            end_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_predicates() {
        let teacher = user(UserRole::Teacher);
        let student = user(UserRole::Student);

        assert!(is_teacher(&teacher) && !is_student(&teacher));
        assert!(is_student(&student) && !is_teacher(&student));
    }

    #[test]
    fn test_ownership_and_enrollment() {
        let teacher = user(UserRole::Teacher);
        let other_teacher = user(UserRole::Teacher);
        let student = user(UserRole::Student);
        let outsider = user(UserRole::Student);
        let course = course(teacher.id, vec![student.id]);

        assert!(owns_course(&teacher, &course));
        assert!(!owns_course(&other_teacher, &course));
        assert!(is_enrolled(&student, &course));
        assert!(!is_enrolled(&outsider, &course));
        assert!(!is_enrolled(&teacher, &course));
    }

    #[test]
    fn test_require_helpers_map_to_forbidden() {
        let teacher = user(UserRole::Teacher);
        let student = user(UserRole::Student);
        let course = course(teacher.id, vec![]);

        assert!(require_teacher(&teacher, "teachers only").is_ok());
        assert!(matches!(
            require_teacher(&student, "teachers only"),
            Err(AppError::Forbidden(ref m)) if m == "teachers only"
        ));
        assert!(require_member(&teacher, &course, "no").is_ok());
        assert!(require_member(&student, &course, "no").is_err());
        assert!(require_enrolled(&student, &course, "no").is_err());
        assert!(require_owner(&student, &course, "no").is_err());
        assert!(require_student(&student, "no").is_ok());
    }
}
