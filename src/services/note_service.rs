//! Note service - Private study notes for enrolled students.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::guards::{require_enrolled, require_student};
use crate::domain::{CreateNote, CurrentUser, NewNote, Note, UpdateNote};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait NoteService: Send + Sync {
    /// The caller's notes, optionally for one course
    async fn list(&self, actor: &CurrentUser, course_id: Option<Uuid>) -> AppResult<Vec<Note>>;

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Note>;

    async fn create(&self, actor: &CurrentUser, note: CreateNote) -> AppResult<Note>;

    async fn update(&self, actor: &CurrentUser, id: Uuid, update: UpdateNote) -> AppResult<Note>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

pub struct NoteManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> NoteManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_owned(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Note> {
        let note = self.uow.notes().find_by_id(id).await?.ok_or_not_found("Note")?;
        if !note.is_owned_by(actor.id) {
            return Err(AppError::forbidden("Not authorized to access this note"));
        }
        Ok(note)
    }
}

#[async_trait]
impl<U: UnitOfWork> NoteService for NoteManager<U> {
    async fn list(&self, actor: &CurrentUser, course_id: Option<Uuid>) -> AppResult<Vec<Note>> {
        self.uow.notes().list_by_student(actor.id, course_id).await
    }

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Note> {
        self.find_owned(actor, id).await
    }

    async fn create(&self, actor: &CurrentUser, note: CreateNote) -> AppResult<Note> {
        require_student(actor, "Only students can take notes")?;
        let course = self
            .uow
            .courses()
            .find_by_id(note.course_id)
            .await?
            .ok_or_not_found("Course")?;
        require_enrolled(actor, &course, "You must be enrolled in this course to take notes")?;
        let note = note.validated()?;

        self.uow
            .notes()
            .create(NewNote {
                student_id: actor.id,
                course_id: course.id,
                title: note.title,
                content: note.content,
                tags: note.tags,
                attachments: note.attachments,
            })
            .await
    }

    async fn update(&self, actor: &CurrentUser, id: Uuid, update: UpdateNote) -> AppResult<Note> {
        let mut note = self.find_owned(actor, id).await?;
        note.apply(update)?;
        self.uow.notes().save(note).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        let note = self.find_owned(actor, id).await?;
        self.uow.notes().delete(note.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, UserRole};
    use crate::infra::{
        CourseRepository, MockCourseRepository, MockNoteRepository, MockUnitOfWork, NoteRepository,
    };
    use chrono::Utc;

    fn student() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "s@example.com".into(),
            role: UserRole::Student,
        }
    }

    fn manager(notes: MockNoteRepository, courses: MockCourseRepository) -> NoteManager<MockUnitOfWork> {
        let notes: Arc<dyn NoteRepository> = Arc::new(notes);
        let courses: Arc<dyn CourseRepository> = Arc::new(courses);
        let mut uow = MockUnitOfWork::new();
        uow.expect_notes().returning(move || notes.clone());
        uow.expect_courses().returning(move || courses.clone());
        NoteManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_create_requires_enrollment() {
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: "Course".into(),
            description: "Description".into(),
            teacher_id: Uuid::new_v4(),
            student_ids: vec![],
            resources: vec![],
            syllabus: vec![],
            start_date: now,
            end_date: now,
            created_at: now,
            updated_at: now,
        };
        let course_id = course.id;
        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().returning(move |_| Ok(Some(course.clone())));
        let mut notes = MockNoteRepository::new();
        notes.expect_create().never();

        let result = manager(notes, courses)
            .create(
                &student(),
                CreateNote {
                    course_id,
                    title: "Recap".into(),
                    content: "Notes".into(),
                    tags: vec![],
                    attachments: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_notes_are_private_to_their_author() {
        let author = student();
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            student_id: author.id,
            course_id: Uuid::new_v4(),
            title: "Mine".into(),
            content: "Private".into(),
            tags: vec![],
            attachments: vec![],
            created_at: now,
            updated_at: now,
        };
        let note_id = note.id;
        let mut notes = MockNoteRepository::new();
        notes.expect_find_by_id().returning(move |_| Ok(Some(note.clone())));
        notes.expect_delete().never();

        let service = manager(notes, MockCourseRepository::new());
        assert!(service.get(&author, note_id).await.is_ok());
        assert!(matches!(
            service.delete(&student(), note_id).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
