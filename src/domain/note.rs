//! Student notes attached to an enrolled course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::course::required_text;
use crate::errors::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// Note domain entity. Private to the student who wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.student_id == user_id
    }

    pub fn apply(&mut self, update: UpdateNote) -> AppResult<()> {
        if let Some(title) = update.title {
            self.title = required_text("Title", &title)?;
        }
        if let Some(content) = update.content {
            self.content = required_text("Content", &content)?;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(attachments) = update.attachments {
            self.attachments = attachments;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Note creation data
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub course_id: Uuid,
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Lecture 3 recap")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl CreateNote {
    pub fn validated(mut self) -> AppResult<Self> {
        self.title = required_text("Title", &self.title)?;
        self.content = required_text("Content", &self.content)?;
        Ok(self)
    }
}

/// Fields needed to insert a note record
#[derive(Debug, Clone)]
pub struct NewNote {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub attachments: Option<Vec<Attachment>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_apply_keeps_absent_fields() {
        let now = Utc::now();
        let mut note = Note {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            title: "Week 1".into(),
            content: "Big-O".into(),
            tags: vec!["intro".into()],
            attachments: vec![],
            created_at: now,
            updated_at: now,
        };

        note.apply(UpdateNote {
            tags: Some(vec![]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(note.title, "Week 1");
        assert!(note.tags.is_empty());

        let blank = note.apply(UpdateNote {
            content: Some(" ".into()),
            ..Default::default()
        });
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }
}
