//! Assignment service - The authorization-gated assignment lifecycle.
//!
//! Every operation fetches the assignment and then its course, and runs
//! the guards over the acting user and that course before mutating
//! anything. Reads are shaped by viewer: the owning teacher sees every
//! submission, anyone else sees only their own.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::guards::{
    owns_course, require_enrolled, require_member, require_owner, require_student,
    require_teacher,
};
use crate::domain::{
    Assignment, AssignmentView, Clock, Course, CreateAssignment, CurrentUser, GradeSubmission,
    Submission, UpdateAssignment,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Assignments of a course, shaped for the caller
    async fn list(&self, actor: &CurrentUser, course_id: Uuid) -> AppResult<Vec<AssignmentView>>;

    /// One assignment, shaped for the caller
    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<AssignmentView>;

    async fn create(&self, actor: &CurrentUser, assignment: CreateAssignment) -> AppResult<Assignment>;

    async fn update(&self, actor: &CurrentUser, id: Uuid, update: UpdateAssignment) -> AppResult<Assignment>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Submit or resubmit the caller's work
    async fn submit(&self, actor: &CurrentUser, id: Uuid, file_url: String) -> AppResult<Submission>;

    /// Grade one student's submission
    async fn grade(&self, actor: &CurrentUser, grade: GradeSubmission) -> AppResult<Submission>;
}

pub struct AssignmentManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> AssignmentManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    async fn find_course(&self, id: Uuid) -> AppResult<Course> {
        self.uow
            .courses()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Course")
    }

    /// Fetch an assignment and the course it belongs to.
    async fn find_with_course(&self, id: Uuid) -> AppResult<(Assignment, Course)> {
        let assignment = self
            .uow
            .assignments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Assignment")?;

        let course = match self.uow.courses().find_by_id(assignment.course_id).await? {
            Some(course) => course,
            None => {
                tracing::error!(
                    assignment_id = %assignment.id,
                    course_id = %assignment.course_id,
                    "Assignment references a missing course"
                );
                return Err(AppError::not_found("Course"));
            }
        };

        Ok((assignment, course))
    }
}

fn shape(assignment: Assignment, actor: &CurrentUser, course: &Course) -> AssignmentView {
    if owns_course(actor, course) {
        assignment.owner_view()
    } else {
        assignment.participant_view(actor.id)
    }
}

#[async_trait]
impl<U: UnitOfWork> AssignmentService for AssignmentManager<U> {
    async fn list(&self, actor: &CurrentUser, course_id: Uuid) -> AppResult<Vec<AssignmentView>> {
        let course = self.find_course(course_id).await?;
        require_member(actor, &course, "Not authorized to view assignments for this course")?;

        let assignments = self.uow.assignments().list_by_course(course.id).await?;
        Ok(assignments
            .into_iter()
            .map(|assignment| shape(assignment, actor, &course))
            .collect())
    }

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<AssignmentView> {
        let (assignment, course) = self.find_with_course(id).await?;
        require_member(actor, &course, "Not authorized to view this assignment")?;

        Ok(shape(assignment, actor, &course))
    }

    async fn create(&self, actor: &CurrentUser, assignment: CreateAssignment) -> AppResult<Assignment> {
        require_teacher(actor, "Only teachers can create assignments")?;
        let course = self.find_course(assignment.course_id).await?;
        require_owner(actor, &course, "Not authorized to create assignments for this course")?;
        let assignment = assignment.validated()?;

        let created = self.uow.assignments().create(assignment).await?;

        tracing::info!(
            assignment_id = %created.id,
            course_id = %course.id,
            "Assignment created"
        );
        Ok(created)
    }

    async fn update(&self, actor: &CurrentUser, id: Uuid, update: UpdateAssignment) -> AppResult<Assignment> {
        let (mut assignment, course) = self.find_with_course(id).await?;
        require_owner(actor, &course, "Not authorized to update this assignment")?;

        assignment.apply(update, self.clock.now())?;
        self.uow.assignments().save(assignment).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        let (assignment, course) = self.find_with_course(id).await?;
        require_owner(actor, &course, "Not authorized to delete this assignment")?;

        self.uow.assignments().delete(assignment.id).await?;

        tracing::info!(assignment_id = %assignment.id, "Assignment deleted");
        Ok(())
    }

    async fn submit(&self, actor: &CurrentUser, id: Uuid, file_url: String) -> AppResult<Submission> {
        require_student(actor, "Only students can submit assignments")?;
        let (mut assignment, course) = self.find_with_course(id).await?;
        require_enrolled(actor, &course, "You must be enrolled in this course to submit")?;

        let now = self.clock.now();
        if !assignment.accepts_submissions_at(now) {
            return Err(AppError::invalid_state("Assignment deadline has passed"));
        }

        let file_url = file_url.trim();
        if file_url.is_empty() {
            return Err(AppError::validation("File URL is required"));
        }

        let resubmission = assignment.submission_for(actor.id).is_some();
        let submission = assignment
            .record_submission(actor.id, file_url.to_string(), now)
            .clone();
        self.uow.assignments().save(assignment).await?;

        tracing::info!(
            assignment_id = %id,
            student_id = %actor.id,
            resubmission,
            "Assignment submitted"
        );
        Ok(submission)
    }

    async fn grade(&self, actor: &CurrentUser, grade: GradeSubmission) -> AppResult<Submission> {
        require_teacher(actor, "Only teachers can grade assignments")?;
        let (mut assignment, course) = self.find_with_course(grade.assignment_id).await?;
        require_owner(actor, &course, "Not authorized to grade this assignment")?;

        // Without a student id there is no submission to grade
        let student_id = grade
            .student_id
            .ok_or_else(|| AppError::not_found("Submission"))?;
        let feedback = grade
            .feedback
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        let graded = assignment
            .grade_submission(student_id, grade.grade, feedback, self.clock.now())?
            .clone();
        self.uow.assignments().save(assignment).await?;

        tracing::info!(
            assignment_id = %grade.assignment_id,
            student_id = %student_id,
            grade = ?graded.grade,
            "Submission graded"
        );
        Ok(graded)
    }
}
