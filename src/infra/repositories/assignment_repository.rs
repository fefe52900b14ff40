//! Assignment repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::assignment::{self, ActiveModel, Entity as AssignmentEntity, SubmissionList};
use crate::domain::{Assignment, NewAssignment};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Assignment persistence. Submissions live inside the assignment record,
/// so `save` writes them back as a whole.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>>;

    /// Assignments of one course, earliest deadline first
    async fn list_by_course(&self, course_id: Uuid) -> AppResult<Vec<Assignment>>;

    /// Create an assignment with no submissions
    async fn create(&self, assignment: NewAssignment) -> AppResult<Assignment>;

    async fn save(&self, assignment: Assignment) -> AppResult<Assignment>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Remove all assignments of a course, returning how many were deleted
    async fn delete_by_course(&self, course_id: Uuid) -> AppResult<u64>;
}

pub struct AssignmentStore {
    db: DatabaseConnection,
}

impl AssignmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentRepository for AssignmentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        let result = AssignmentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Assignment::from))
    }

    async fn list_by_course(&self, course_id: Uuid) -> AppResult<Vec<Assignment>> {
        let models = AssignmentEntity::find()
            .filter(assignment::Column::CourseId.eq(course_id))
            .order_by_asc(assignment::Column::Deadline)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Assignment::from).collect())
    }

    async fn create(&self, assignment: NewAssignment) -> AppResult<Assignment> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(assignment.course_id),
            title: Set(assignment.title),
            description: Set(assignment.description),
            deadline: Set(assignment.deadline),
            total_points: Set(assignment.total_points),
            submissions: Set(SubmissionList::default()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Assignment::from(model))
    }

    async fn save(&self, assignment: Assignment) -> AppResult<Assignment> {
        let active: ActiveModel = assignment.into();

        match active.update(&self.db).await {
            Ok(model) => Ok(Assignment::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("Assignment")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AssignmentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Assignment"));
        }

        Ok(())
    }

    async fn delete_by_course(&self, course_id: Uuid) -> AppResult<u64> {
        let result = AssignmentEntity::delete_many()
            .filter(assignment::Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
