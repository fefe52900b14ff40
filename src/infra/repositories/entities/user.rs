//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::{CourseProgress, Profile, Settings, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ProfileColumn(pub Profile);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SettingsColumn(pub Settings);

/// Ordered list of ids stored as a JSON array
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct UuidList(pub Vec<Uuid>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ProgressList(pub Vec<CourseProgress>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub profile: ProfileColumn,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: SettingsColumn,
    #[sea_orm(column_type = "JsonBinary")]
    pub enrolled_course_ids: UuidList,
    #[sea_orm(column_type = "JsonBinary")]
    pub progress: ProgressList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            role: UserRole::from(model.role.as_str()),
            profile: model.profile.0,
            settings: model.settings.0,
            enrolled_course_ids: model.enrolled_course_ids.0,
            progress: model.progress.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert domain entity to a fully-set active model
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            role: Set(user.role.to_string()),
            profile: Set(ProfileColumn(user.profile)),
            settings: Set(SettingsColumn(user.settings)),
            enrolled_course_ids: Set(UuidList(user.enrolled_course_ids)),
            progress: Set(ProgressList(user.progress)),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
