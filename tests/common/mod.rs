//! Shared fixtures for integration tests.
//!
//! `InMemory` is a Unit of Work over plain vectors, so services run their
//! real logic without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use lms_api::config::Config;
use lms_api::domain::{
    Assignment, Clock, Course, CreateCourse, CurrentUser, FixedClock, NewAssignment, NewCourse,
    NewNote, NewUser, Note, User, UserRole,
};
use lms_api::errors::{AppError, AppResult};
use lms_api::infra::{
    AssignmentRepository, CourseRepository, NoteRepository, UnitOfWork, UserRepository,
};
use lms_api::services::{CourseService, ServiceContainer, Services};

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub fn config() -> Config {
    Config::new("postgres://unused", JWT_SECRET)
}

// =============================================================================
// In-memory tables
// =============================================================================

pub trait Record: Clone + Send + Sync {
    fn id(&self) -> Uuid;
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Course {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Assignment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Note {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Rows in insertion order
pub struct Table<T: Record> {
    rows: Mutex<Vec<T>>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Record> Table<T> {
    pub fn all(&self) -> Vec<T> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<T> {
        self.rows.lock().unwrap().iter().find(|r| r.id() == id).cloned()
    }

    fn filter(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.lock().unwrap().iter().filter(|r| keep(*r)).cloned().collect()
    }

    fn insert(&self, row: T) -> T {
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    fn replace(&self, row: T, entity: &str) -> AppResult<T> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == row.id())
            .ok_or_else(|| AppError::not_found(entity))?;
        *slot = row.clone();
        Ok(row)
    }

    fn remove_where(&self, doomed: impl Fn(&T) -> bool) -> u64 {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !doomed(r));
        (before - rows.len()) as u64
    }
}

#[async_trait]
impl UserRepository for Table<User> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        Ok(self.filter(|u| ids.contains(&u.id)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.filter(|u| u.email == email).into_iter().next())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        Ok(self.insert(User::new(
            Uuid::new_v4(),
            user.email,
            user.password_hash,
            user.name,
            user.role,
        )))
    }

    async fn save(&self, user: User) -> AppResult<User> {
        self.replace(user, "User")
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        match self.remove_where(|u| u.id == id) {
            0 => Err(AppError::not_found("User")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CourseRepository for Table<Course> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        Ok(self.get(id))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Course>> {
        Ok(self.filter(|c| ids.contains(&c.id)))
    }

    async fn list(&self) -> AppResult<Vec<Course>> {
        Ok(self.all())
    }

    async fn list_by_teacher(&self, teacher_id: Uuid) -> AppResult<Vec<Course>> {
        Ok(self.filter(|c| c.teacher_id == teacher_id))
    }

    async fn create(&self, course: NewCourse) -> AppResult<Course> {
        let now = Utc::now();
        Ok(self.insert(Course {
            id: Uuid::new_v4(),
            title: course.title,
            description: course.description,
            teacher_id: course.teacher_id,
            student_ids: vec![],
            resources: vec![],
            syllabus: course.syllabus,
            start_date: course.start_date,
            end_date: course.end_date,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn save(&self, course: Course) -> AppResult<Course> {
        self.replace(course, "Course")
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        match self.remove_where(|c| c.id == id) {
            0 => Err(AppError::not_found("Course")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AssignmentRepository for Table<Assignment> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        Ok(self.get(id))
    }

    async fn list_by_course(&self, course_id: Uuid) -> AppResult<Vec<Assignment>> {
        let mut assignments = self.filter(|a| a.course_id == course_id);
        assignments.sort_by_key(|a| a.deadline);
        Ok(assignments)
    }

    async fn create(&self, assignment: NewAssignment) -> AppResult<Assignment> {
        let now = Utc::now();
        Ok(self.insert(Assignment {
            id: Uuid::new_v4(),
            course_id: assignment.course_id,
            title: assignment.title,
            description: assignment.description,
            deadline: assignment.deadline,
            total_points: assignment.total_points,
            submissions: vec![],
            created_at: now,
            updated_at: now,
        }))
    }

    async fn save(&self, assignment: Assignment) -> AppResult<Assignment> {
        self.replace(assignment, "Assignment")
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        match self.remove_where(|a| a.id == id) {
            0 => Err(AppError::not_found("Assignment")),
            _ => Ok(()),
        }
    }

    async fn delete_by_course(&self, course_id: Uuid) -> AppResult<u64> {
        Ok(self.remove_where(|a| a.course_id == course_id))
    }
}

#[async_trait]
impl NoteRepository for Table<Note> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Note>> {
        Ok(self.get(id))
    }

    async fn list_by_student(&self, student_id: Uuid, course_id: Option<Uuid>) -> AppResult<Vec<Note>> {
        let mut notes = self.filter(|n| {
            n.student_id == student_id && course_id.map_or(true, |c| n.course_id == c)
        });
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    async fn create(&self, note: NewNote) -> AppResult<Note> {
        let now = Utc::now();
        Ok(self.insert(Note {
            id: Uuid::new_v4(),
            student_id: note.student_id,
            course_id: note.course_id,
            title: note.title,
            content: note.content,
            tags: note.tags,
            attachments: note.attachments,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn save(&self, note: Note) -> AppResult<Note> {
        self.replace(note, "Note")
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        match self.remove_where(|n| n.id == id) {
            0 => Err(AppError::not_found("Note")),
            _ => Ok(()),
        }
    }

    async fn delete_by_student(&self, student_id: Uuid) -> AppResult<u64> {
        Ok(self.remove_where(|n| n.student_id == student_id))
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

#[derive(Default)]
pub struct InMemory {
    pub users: Arc<Table<User>>,
    pub courses: Arc<Table<Course>>,
    pub assignments: Arc<Table<Assignment>>,
    pub notes: Arc<Table<Note>>,
}

impl UnitOfWork for InMemory {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.courses.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignments.clone()
    }

    fn notes(&self) -> Arc<dyn NoteRepository> {
        self.notes.clone()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn store() -> Arc<InMemory> {
    Arc::new(InMemory::default())
}

/// Services over `store` with time frozen at `now`
pub fn services_at(store: &Arc<InMemory>, now: DateTime<Utc>) -> Services {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));
    Services::new(store.clone(), config(), clock)
}

/// Insert a user directly, skipping password hashing
pub async fn user(store: &Arc<InMemory>, name: &str, role: UserRole) -> CurrentUser {
    let user = store
        .users()
        .create(NewUser {
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "not-a-real-hash".into(),
            name: name.into(),
            role,
        })
        .await
        .unwrap();
    CurrentUser::from(&user)
}

pub fn new_course(title: &str) -> CreateCourse {
    let start = Utc::now();
    CreateCourse {
        title: title.into(),
        description: format!("{} description", title),
        syllabus: vec![],
        start_date: start,
        end_date: start + Duration::days(90),
    }
}

/// A course owned by `teacher`
pub async fn course(services: &Services, teacher: &CurrentUser, title: &str) -> Course {
    services
        .courses()
        .create_course(teacher, new_course(title))
        .await
        .unwrap()
}
