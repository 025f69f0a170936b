//! Registration and catalog management: accounts with their profiles,
//! departments, courses, and scheduled sections.

use crate::{password, ServiceError};
use configuration::{DisplaySettings, SecuritySettings};
use core_types::{
    AccountStatus, Course, Department, Instructor, NewAccount, NewCourse, NewDepartment,
    NewInstructor, NewSection, NewStudent, Role, SectionInfo, Semester, Student,
};
use database::{
    CourseRepository, DepartmentRepository, InstructorRepository, SectionRepository,
    StudentRepository,
};
use rust_decimal::Decimal;
use tracing::info;

pub struct CatalogService {
    students: StudentRepository,
    instructors: InstructorRepository,
    courses: CourseRepository,
    sections: SectionRepository,
    departments: DepartmentRepository,
    security: SecuritySettings,
    display: DisplaySettings,
}

impl CatalogService {
    pub fn new(
        students: StudentRepository,
        instructors: InstructorRepository,
        courses: CourseRepository,
        sections: SectionRepository,
        departments: DepartmentRepository,
        security: SecuritySettings,
        display: DisplaySettings,
    ) -> Self {
        Self {
            students,
            instructors,
            courses,
            sections,
            departments,
            security,
            display,
        }
    }

    fn validate_credential(&self, username: &str, password: &str) -> Result<(), ServiceError> {
        if username.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Username must not be empty".to_string(),
            ));
        }
        if password.chars().count() < self.security.password_min_length {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {} characters",
                self.security.password_min_length
            )));
        }
        Ok(())
    }

    /// Self-service student registration: one account, one profile, both
    /// created active in a single transaction.
    pub async fn register_student(
        &self,
        student: NewStudent,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        self.validate_credential(username, password)?;
        if student.name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Name must not be empty".to_string(),
            ));
        }

        let account = NewAccount {
            username: username.to_string(),
            role: Role::Student,
            status: AccountStatus::Active,
        };
        let hash = password::hash(password)?;
        let student_id = self.students.register(&student, &account, &hash).await?;
        info!(%student_id, username, "student registered");
        Ok(student_id)
    }

    pub async fn register_instructor(
        &self,
        instructor: NewInstructor,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        self.validate_credential(username, password)?;
        if instructor.name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Name must not be empty".to_string(),
            ));
        }

        let account = NewAccount {
            username: username.to_string(),
            role: Role::Instructor,
            status: AccountStatus::Active,
        };
        let hash = password::hash(password)?;
        let instructor_id = self
            .instructors
            .register(&instructor, &account, &hash)
            .await?;
        info!(%instructor_id, username, "instructor registered");
        Ok(instructor_id)
    }

    pub async fn create_department(
        &self,
        department: NewDepartment,
    ) -> Result<String, ServiceError> {
        if department.dept_name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Department name must not be empty".to_string(),
            ));
        }
        let dept_id = self.departments.create(&department).await?;
        info!(%dept_id, "department created");
        Ok(dept_id)
    }

    pub async fn create_course(&self, course: NewCourse) -> Result<String, ServiceError> {
        if course.course_name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Course name must not be empty".to_string(),
            ));
        }
        if course.credits <= Decimal::ZERO {
            return Err(ServiceError::Validation(
                "Credits must be greater than zero".to_string(),
            ));
        }
        let course_id = self.courses.create(&course).await?;
        info!(%course_id, "course created");
        Ok(course_id)
    }

    /// Schedules a section. The course must already exist and, when an
    /// instructor is named, so must they.
    pub async fn create_section(&self, section: NewSection) -> Result<i32, ServiceError> {
        if section.max_capacity <= 0 {
            return Err(ServiceError::Validation(
                "Capacity must be greater than zero".to_string(),
            ));
        }
        if self.courses.get_by_id(&section.course_id).await?.is_none() {
            return Err(ServiceError::NotFound("course"));
        }
        if let Some(instructor_id) = section.instructor_id.as_deref() {
            if self.instructors.get_by_id(instructor_id).await?.is_none() {
                return Err(ServiceError::NotFound("instructor"));
            }
        }

        let section_id = self.sections.create(&section).await?;
        info!(
            section_id,
            course_id = %section.course_id,
            semester = %section.semester,
            year = section.year,
            "section created"
        );
        Ok(section_id)
    }

    pub async fn search_courses(&self, term: &str) -> Result<Vec<Course>, ServiceError> {
        Ok(self.courses.search(term).await?)
    }

    pub async fn list_courses(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Course>, ServiceError> {
        Ok(self.courses.list(department).await?)
    }

    /// The term's offerings with live seat availability.
    pub async fn available_sections(
        &self,
        semester: Semester,
        year: i32,
    ) -> Result<Vec<SectionInfo>, ServiceError> {
        Ok(self.sections.list_for_term(semester, year).await?)
    }

    pub async fn instructor_sections(
        &self,
        instructor_id: &str,
        term: Option<(Semester, i32)>,
    ) -> Result<Vec<SectionInfo>, ServiceError> {
        Ok(self.sections.list_for_instructor(instructor_id, term).await?)
    }

    /// One page of the student roster. Pages are one-based.
    pub async fn list_students(&self, page: i64) -> Result<Vec<Student>, ServiceError> {
        let page = page.max(1);
        let limit = self.display.items_per_page;
        Ok(self.students.list(limit, (page - 1) * limit).await?)
    }

    pub async fn list_instructors(&self) -> Result<Vec<Instructor>, ServiceError> {
        Ok(self.instructors.list_all().await?)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        Ok(self.departments.list_all().await?)
    }
}
