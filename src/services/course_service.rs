//! Course service - Course catalogue, ownership-gated edits and resources.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::guards::{require_owner, require_teacher};
use crate::domain::{
    Clock, Course, CourseDetail, CourseSummary, CreateCourse, CurrentUser, NewCourse, NewResource,
    Resource, UpdateCourse, User, UserSummary,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CourseService: Send + Sync {
    /// Every course with its teacher; rosters are omitted
    async fn list_courses(&self) -> AppResult<Vec<CourseSummary>>;

    /// One course with teacher and students resolved
    async fn get_course(&self, id: Uuid) -> AppResult<CourseDetail>;

    async fn create_course(&self, actor: &CurrentUser, course: CreateCourse) -> AppResult<Course>;

    async fn update_course(&self, actor: &CurrentUser, id: Uuid, update: UpdateCourse) -> AppResult<Course>;

    /// Delete a course together with its assignments and enrollments
    async fn delete_course(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;

    async fn add_resource(&self, actor: &CurrentUser, id: Uuid, resource: NewResource) -> AppResult<Resource>;

    async fn remove_resource(&self, actor: &CurrentUser, id: Uuid, resource_id: Uuid) -> AppResult<()>;

    /// Courses owned by the calling teacher, with rosters resolved
    async fn teacher_courses(&self, actor: &CurrentUser) -> AppResult<Vec<CourseDetail>>;

    /// Courses the caller is enrolled in, in enrollment order
    async fn enrolled_courses(&self, actor: &CurrentUser) -> AppResult<Vec<CourseSummary>>;
}

pub struct CourseManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> CourseManager<U> {
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

    /// Load the users referenced by `ids` as summaries keyed by id.
    async fn summaries(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, UserSummary>> {
        let users: Vec<User> = self.uow.users().find_by_ids(ids).await?;
        Ok(users
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect())
    }

    async fn detail(&self, course: Course) -> AppResult<CourseDetail> {
        let mut ids = course.student_ids.clone();
        ids.push(course.teacher_id);
        let mut people = self.summaries(ids).await?;

        let teacher = people.get(&course.teacher_id).cloned();
        let students = course
            .student_ids
            .iter()
            .filter_map(|id| people.remove(id))
            .collect();

        Ok(CourseDetail {
            course,
            teacher,
            students,
        })
    }

    async fn with_teachers(&self, courses: Vec<Course>) -> AppResult<Vec<CourseSummary>> {
        let mut teacher_ids: Vec<Uuid> = courses.iter().map(|c| c.teacher_id).collect();
        teacher_ids.sort();
        teacher_ids.dedup();
        let teachers = self.summaries(teacher_ids).await?;

        Ok(courses
            .into_iter()
            .map(|course| {
                let teacher = teachers.get(&course.teacher_id).cloned();
                CourseSummary::new(course, teacher)
            })
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> CourseService for CourseManager<U> {
    async fn list_courses(&self) -> AppResult<Vec<CourseSummary>> {
        let courses = self.uow.courses().list().await?;
        self.with_teachers(courses).await
    }

    async fn get_course(&self, id: Uuid) -> AppResult<CourseDetail> {
        let course = self.find_course(id).await?;
        self.detail(course).await
    }

    async fn create_course(&self, actor: &CurrentUser, course: CreateCourse) -> AppResult<Course> {
        require_teacher(actor, "Only teachers can create courses")?;
        let course = course.validated()?;

        let created = self
            .uow
            .courses()
            .create(NewCourse {
                title: course.title,
                description: course.description,
                teacher_id: actor.id,
                syllabus: course.syllabus,
                start_date: course.start_date,
                end_date: course.end_date,
            })
            .await?;

        tracing::info!(course_id = %created.id, teacher_id = %actor.id, "Course created");
        Ok(created)
    }

    async fn update_course(&self, actor: &CurrentUser, id: Uuid, update: UpdateCourse) -> AppResult<Course> {
        let mut course = self.find_course(id).await?;
        require_owner(actor, &course, "Not authorized to update this course")?;

        course.apply(update)?;
        self.uow.courses().save(course).await
    }

    async fn delete_course(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        let course = self.find_course(id).await?;
        require_owner(actor, &course, "Not authorized to delete this course")?;

        let removed_assignments = self.uow.assignments().delete_by_course(course.id).await?;

        let students = self.uow.users().find_by_ids(course.student_ids.clone()).await?;
        for mut student in students {
            student.remove_enrollment(course.id);
            self.uow.users().save(student).await?;
        }

        self.uow.courses().delete(course.id).await?;

        tracing::info!(course_id = %course.id, removed_assignments, "Course deleted");
        Ok(())
    }

    async fn add_resource(&self, actor: &CurrentUser, id: Uuid, resource: NewResource) -> AppResult<Resource> {
        let mut course = self.find_course(id).await?;
        require_owner(actor, &course, "Not authorized to add resources to this course")?;
        let resource = resource.validated()?;

        let added = course.add_resource(resource, self.clock.now());
        self.uow.courses().save(course).await?;
        Ok(added)
    }

    async fn remove_resource(&self, actor: &CurrentUser, id: Uuid, resource_id: Uuid) -> AppResult<()> {
        let mut course = self.find_course(id).await?;
        require_owner(actor, &course, "Not authorized to remove resources from this course")?;

        course.remove_resource(resource_id)?;
        self.uow.courses().save(course).await?;
        Ok(())
    }

    async fn teacher_courses(&self, actor: &CurrentUser) -> AppResult<Vec<CourseDetail>> {
        require_teacher(actor, "Only teachers have taught courses")?;

        let courses = self.uow.courses().list_by_teacher(actor.id).await?;
        let mut details = Vec::with_capacity(courses.len());
        for course in courses {
            details.push(self.detail(course).await?);
        }
        Ok(details)
    }

    async fn enrolled_courses(&self, actor: &CurrentUser) -> AppResult<Vec<CourseSummary>> {
        let user = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_not_found("User")?;

        let mut by_id: HashMap<Uuid, Course> = self
            .uow
            .courses()
            .find_by_ids(user.enrolled_course_ids.clone())
            .await?
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        // Keep the order in which the user enrolled
        let ordered = user
            .enrolled_course_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        self.with_teachers(ordered).await
    }
}
