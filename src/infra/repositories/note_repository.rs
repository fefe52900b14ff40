//! Note repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::note::{self, ActiveModel, AttachmentList, Entity as NoteEntity, TagList};
use crate::domain::{NewNote, Note};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Note>>;

    /// A student's notes, newest first, optionally limited to one course
    async fn list_by_student(&self, student_id: Uuid, course_id: Option<Uuid>) -> AppResult<Vec<Note>>;

    async fn create(&self, note: NewNote) -> AppResult<Note>;

    async fn save(&self, note: Note) -> AppResult<Note>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Remove every note written by a student
    async fn delete_by_student(&self, student_id: Uuid) -> AppResult<u64>;
}

pub struct NoteStore {
    db: DatabaseConnection,
}

impl NoteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepository for NoteStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Note>> {
        let result = NoteEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Note::from))
    }

    async fn list_by_student(&self, student_id: Uuid, course_id: Option<Uuid>) -> AppResult<Vec<Note>> {
        let mut query = NoteEntity::find().filter(note::Column::StudentId.eq(student_id));
        if let Some(course_id) = course_id {
            query = query.filter(note::Column::CourseId.eq(course_id));
        }

        let models = query
            .order_by_desc(note::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Note::from).collect())
    }

    async fn create(&self, note: NewNote) -> AppResult<Note> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(note.student_id),
            course_id: Set(note.course_id),
            title: Set(note.title),
            content: Set(note.content),
            tags: Set(TagList(note.tags)),
            attachments: Set(AttachmentList(note.attachments)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Note::from(model))
    }

    async fn save(&self, note: Note) -> AppResult<Note> {
        let active: ActiveModel = note.into();

        match active.update(&self.db).await {
            Ok(model) => Ok(Note::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Note")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = NoteEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Note"));
        }

        Ok(())
    }

    async fn delete_by_student(&self, student_id: Uuid) -> AppResult<u64> {
        let result = NoteEntity::delete_many()
            .filter(note::Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
