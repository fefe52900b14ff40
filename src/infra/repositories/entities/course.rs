//! Course database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use super::user::UuidList;
use crate::domain::{Course, Resource, SyllabusUnit};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ResourceList(pub Vec<Resource>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Syllabus(pub Vec<SyllabusUnit>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sea_orm(indexed)]
    pub teacher_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub student_ids: UuidList,
    #[sea_orm(column_type = "JsonBinary")]
    pub resources: ResourceList,
    #[sea_orm(column_type = "JsonBinary")]
    pub syllabus: Syllabus,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Course {
    fn from(model: Model) -> Self {
        Course {
            id: model.id,
            title: model.title,
            description: model.description,
            teacher_id: model.teacher_id,
            student_ids: model.student_ids.0,
            resources: model.resources.0,
            syllabus: model.syllabus.0,
            start_date: model.start_date,
            end_date: model.end_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Course> for ActiveModel {
    fn from(course: Course) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(course.id),
            title: Set(course.title),
            description: Set(course.description),
            teacher_id: Set(course.teacher_id),
            student_ids: Set(UuidList(course.student_ids)),
            resources: Set(ResourceList(course.resources)),
            syllabus: Set(Syllabus(course.syllabus)),
            start_date: Set(course.start_date),
            end_date: Set(course.end_date),
            created_at: Set(course.created_at),
            updated_at: Set(course.updated_at),
        }
    }
}
