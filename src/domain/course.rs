//! Course domain entity, its resources and syllabus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;
use crate::errors::{AppError, AppResult};

/// Kind of a course resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pdf,
    Video,
    Link,
}

/// Material attached to a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub kind: ResourceKind,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusUnit {
    #[schema(example = "Unit 1: Foundations")]
    pub unit: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Course domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Owning teacher, fixed at creation
    pub teacher_id: Uuid,
    /// Roster, in enrollment order
    pub student_ids: Vec<Uuid>,
    pub resources: Vec<Resource>,
    pub syllabus: Vec<SyllabusUnit>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn has_student(&self, user_id: Uuid) -> bool {
        self.student_ids.contains(&user_id)
    }

    /// Append a student to the roster.
    ///
    /// # Errors
    /// Fails with `InvalidState` if the student is already on the roster.
    pub fn enroll(&mut self, user_id: Uuid) -> AppResult<()> {
        if self.has_student(user_id) {
            return Err(AppError::invalid_state("You are already enrolled in this course"));
        }
        self.student_ids.push(user_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_student(&mut self, user_id: Uuid) {
        self.student_ids.retain(|id| *id != user_id);
        self.updated_at = Utc::now();
    }

    pub fn add_resource(&mut self, resource: NewResource, now: DateTime<Utc>) -> Resource {
        let resource = Resource {
            id: Uuid::new_v4(),
            title: resource.title,
            link: resource.link,
            kind: resource.kind,
            uploaded_at: now,
        };
        self.resources.push(resource.clone());
        self.updated_at = now;
        resource
    }

    /// Remove a resource by id.
    ///
    /// # Errors
    /// Fails with `NotFound` if no resource has that id.
    pub fn remove_resource(&mut self, resource_id: Uuid) -> AppResult<Resource> {
        let index = self
            .resources
            .iter()
            .position(|r| r.id == resource_id)
            .ok_or_else(|| AppError::not_found("Resource"))?;
        self.updated_at = Utc::now();
        Ok(self.resources.remove(index))
    }

    /// Merge a partial update; only present fields are applied.
    pub fn apply(&mut self, update: UpdateCourse) -> AppResult<()> {
        if let Some(title) = update.title {
            self.title = required_text("Title", &title)?;
        }
        if let Some(description) = update.description {
            self.description = required_text("Description", &description)?;
        }
        if let Some(syllabus) = update.syllabus {
            self.syllabus = syllabus;
        }
        if let Some(start_date) = update.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            self.end_date = end_date;
        }
        check_dates(self.start_date, self.end_date)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Reject blank text for required fields, returning the trimmed value.
pub(crate) fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn check_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end < start {
        return Err(AppError::validation("End date cannot be before start date"));
    }
    Ok(())
}

/// Course creation data
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Introduction to Algorithms")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub syllabus: Vec<SyllabusUnit>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl CreateCourse {
    /// Validate and normalize the creation payload.
    pub fn validated(mut self) -> AppResult<Self> {
        self.title = required_text("Title", &self.title)?;
        self.description = required_text("Description", &self.description)?;
        check_dates(self.start_date, self.end_date)?;
        Ok(self)
    }
}

/// Fields needed to insert a course record
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub teacher_id: Uuid,
    pub syllabus: Vec<SyllabusUnit>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Course update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub syllabus: Option<Vec<SyllabusUnit>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Lecture 1 slides")]
    pub title: String,
    #[validate(length(min = 1, message = "Link is required"))]
    #[schema(example = "https://cdn.example.com/lecture1.pdf")]
    pub link: String,
    #[serde(alias = "type")]
    pub kind: ResourceKind,
}

impl NewResource {
    pub fn validated(mut self) -> AppResult<Self> {
        self.title = required_text("Title", &self.title)?;
        self.link = required_text("Link", &self.link)?;
        Ok(self)
    }
}

/// Course listing entry; the roster is deliberately omitted
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub teacher: Option<UserSummary>,
    pub resources: Vec<Resource>,
    pub syllabus: Vec<SyllabusUnit>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CourseSummary {
    pub fn new(course: Course, teacher: Option<UserSummary>) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            teacher,
            resources: course.resources,
            syllabus: course.syllabus,
            start_date: course.start_date,
            end_date: course.end_date,
            created_at: course.created_at,
        }
    }
}

/// Course with its teacher and roster resolved to user summaries
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub teacher: Option<UserSummary>,
    pub students: Vec<UserSummary>,
}

/// Short course reference returned after enrolling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub id: Uuid,
    pub title: String,
}
