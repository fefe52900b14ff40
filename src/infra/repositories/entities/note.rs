//! Note database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::{Attachment, Note};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TagList(pub Vec<String>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AttachmentList(pub Vec<Attachment>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: TagList,
    #[sea_orm(column_type = "JsonBinary")]
    pub attachments: AttachmentList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Note {
    fn from(model: Model) -> Self {
        Note {
            id: model.id,
            student_id: model.student_id,
            course_id: model.course_id,
            title: model.title,
            content: model.content,
            tags: model.tags.0,
            attachments: model.attachments.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Note> for ActiveModel {
    fn from(note: Note) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(note.id),
            student_id: Set(note.student_id),
            course_id: Set(note.course_id),
            title: Set(note.title),
            content: Set(note.content),
            tags: Set(TagList(note.tags)),
            attachments: Set(AttachmentList(note.attachments)),
            created_at: Set(note.created_at),
            updated_at: Set(note.updated_at),
        }
    }
}
