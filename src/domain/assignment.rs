//! Assignment domain entity and its embedded submissions.
//!
//! A submission moves Unsubmitted -> Submitted -> Graded. Resubmitting a
//! graded entry sends it back to Submitted with grade and feedback cleared.
//! Each student owns at most one entry per assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::course::required_text;
use crate::errors::{AppError, AppResult};

/// A student's work against one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub student_id: Uuid,
    #[schema(example = "https://files.example.com/hw1.pdf")]
    pub file_url: String,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

/// Assignment domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub total_points: f64,
    pub submissions: Vec<Submission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    fn submission_index(&self, student_id: Uuid) -> Option<usize> {
        self.submissions
            .iter()
            .position(|s| s.student_id == student_id)
    }

    pub fn submission_for(&self, student_id: Uuid) -> Option<&Submission> {
        self.submission_index(student_id)
            .map(|index| &self.submissions[index])
    }

    /// Whether a submission at `now` is still accepted. The deadline itself
    /// is inclusive.
    pub fn accepts_submissions_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.deadline
    }

    /// Store a student's file, replacing their previous entry if any.
    ///
    /// Resubmission always clears an earlier grade and feedback.
    pub fn record_submission(
        &mut self,
        student_id: Uuid,
        file_url: String,
        now: DateTime<Utc>,
    ) -> &Submission {
        let index = match self.submission_index(student_id) {
            Some(index) => {
                let existing = &mut self.submissions[index];
                existing.file_url = file_url;
                existing.submitted_at = now;
                existing.grade = None;
                existing.feedback = None;
                index
            }
            None => {
                self.submissions.push(Submission {
                    student_id,
                    file_url,
                    submitted_at: now,
                    grade: None,
                    feedback: None,
                });
                self.submissions.len() - 1
            }
        };
        self.updated_at = now;
        &self.submissions[index]
    }

    /// Grade an existing submission.
    ///
    /// # Errors
    /// `NotFound` when the student has not submitted, `Validation` when the
    /// grade is missing or falls outside `0..=total_points`.
    pub fn grade_submission(
        &mut self,
        student_id: Uuid,
        grade: Option<f64>,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<&Submission> {
        let index = self
            .submission_index(student_id)
            .ok_or_else(|| AppError::not_found("Submission"))?;

        let grade = grade.ok_or_else(|| AppError::validation("Grade is required"))?;
        if !grade.is_finite() || grade < 0.0 || grade > self.total_points {
            return Err(AppError::validation(format!(
                "Grade must be between 0 and {}",
                self.total_points
            )));
        }

        let submission = &mut self.submissions[index];
        submission.grade = Some(grade);
        submission.feedback = feedback;
        self.updated_at = now;
        Ok(&self.submissions[index])
    }

    /// Merge a partial update; only fields present in the request apply.
    pub fn apply(&mut self, update: UpdateAssignment, now: DateTime<Utc>) -> AppResult<()> {
        if let Some(title) = update.title {
            self.title = required_text("Title", &title)?;
        }
        if let Some(description) = update.description {
            self.description = required_text("Description", &description)?;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        if let Some(total_points) = update.total_points {
            self.total_points = check_points(total_points)?;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Full record for the owning teacher.
    pub fn owner_view(self) -> AssignmentView {
        AssignmentView::Full(self)
    }

    /// Record trimmed to the caller's own submission, so classmates'
    /// files and grades never leave the server.
    pub fn participant_view(self, viewer_id: Uuid) -> AssignmentView {
        let submission = self.submission_for(viewer_id).cloned();
        AssignmentView::Participant(ParticipantAssignment {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
            total_points: self.total_points,
            created_at: self.created_at,
            updated_at: self.updated_at,
            submission,
        })
    }
}

fn check_points(total_points: f64) -> AppResult<f64> {
    if !total_points.is_finite() || total_points < 0.0 {
        return Err(AppError::validation("Total points must be a non-negative number"));
    }
    Ok(total_points)
}

/// Assignment as seen by someone other than the course owner
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantAssignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub total_points: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submission: Option<Submission>,
}

/// Role-shaped assignment response
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AssignmentView {
    Full(Assignment),
    Participant(ParticipantAssignment),
}

/// Assignment creation data.
///
/// Only `courseId` is needed to run the role and ownership checks, so the
/// remaining fields are checked by `validated` once those pass.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignment {
    pub course_id: Uuid,
    #[serde(default)]
    #[schema(example = "HW1")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    #[schema(example = 100)]
    pub total_points: Option<f64>,
}

impl CreateAssignment {
    /// Check required fields and normalize text.
    pub fn validated(self) -> AppResult<NewAssignment> {
        let title = required_text("Title", &self.title)?;
        let description = required_text("Description", &self.description)?;
        let deadline = self
            .deadline
            .ok_or_else(|| AppError::validation("Deadline is required"))?;
        let total_points = self
            .total_points
            .ok_or_else(|| AppError::validation("Total points is required"))
            .and_then(check_points)?;

        Ok(NewAssignment {
            course_id: self.course_id,
            title,
            description,
            deadline,
            total_points,
        })
    }
}

/// Fields needed to insert an assignment record
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub total_points: f64,
}

/// Assignment update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub total_points: Option<f64>,
}

/// Teacher's grade for one student's submission. A missing student or
/// grade is reported after the role and ownership checks.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmission {
    pub assignment_id: Uuid,
    pub student_id: Option<Uuid>,
    #[schema(example = 90)]
    pub grade: Option<f64>,
    #[schema(example = "Good work")]
    pub feedback: Option<String>,
}
