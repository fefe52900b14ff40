//! Course repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::course::{self, ActiveModel, Entity as CourseEntity, ResourceList, Syllabus};
use super::entities::user::UuidList;
use crate::domain::{Course, NewCourse};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>>;

    /// Find every course whose id is in `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Course>>;

    /// All courses, oldest first
    async fn list(&self) -> AppResult<Vec<Course>>;

    /// Courses owned by a teacher, oldest first
    async fn list_by_teacher(&self, teacher_id: Uuid) -> AppResult<Vec<Course>>;

    /// Create a course with an empty roster and no resources
    async fn create(&self, course: NewCourse) -> AppResult<Course>;

    /// Persist the full course record
    async fn save(&self, course: Course) -> AppResult<Course>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct CourseStore {
    db: DatabaseConnection,
}

impl CourseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = CourseEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = CourseEntity::find()
            .filter(course::Column::Id.is_in(ids))
            .order_by_asc(course::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn list(&self) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .order_by_asc(course::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn list_by_teacher(&self, teacher_id: Uuid) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .filter(course::Column::TeacherId.eq(teacher_id))
            .order_by_asc(course::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn create(&self, course: NewCourse) -> AppResult<Course> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(course.title),
            description: Set(course.description),
            teacher_id: Set(course.teacher_id),
            student_ids: Set(UuidList::default()),
            resources: Set(ResourceList::default()),
            syllabus: Set(Syllabus(course.syllabus)),
            start_date: Set(course.start_date),
            end_date: Set(course.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Course::from(model))
    }

    async fn save(&self, course: Course) -> AppResult<Course> {
        let active: ActiveModel = course.into();

        match active.update(&self.db).await {
            Ok(model) => Ok(Course::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Course")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CourseEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Course"));
        }

        Ok(())
    }
}
