//! Assignment database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::{Assignment, Submission};

/// Embedded submissions, one entry per student
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SubmissionList(pub Vec<Submission>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: DateTimeUtc,
    pub total_points: f64,
    #[sea_orm(column_type = "JsonBinary")]
    pub submissions: SubmissionList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Assignment {
    fn from(model: Model) -> Self {
        Assignment {
            id: model.id,
            course_id: model.course_id,
            title: model.title,
            description: model.description,
            deadline: model.deadline,
            total_points: model.total_points,
            submissions: model.submissions.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Assignment> for ActiveModel {
    fn from(assignment: Assignment) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(assignment.id),
            course_id: Set(assignment.course_id),
            title: Set(assignment.title),
            description: Set(assignment.description),
            deadline: Set(assignment.deadline),
            total_points: Set(assignment.total_points),
            submissions: Set(SubmissionList(assignment.submissions)),
            created_at: Set(assignment.created_at),
            updated_at: Set(assignment.updated_at),
        }
    }
}
