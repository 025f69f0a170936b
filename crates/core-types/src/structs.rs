use crate::enums::{
    AccountStatus, CourseType, EnrollmentStatus, Gender, Role, Semester,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A login account. The credential hash never leaves the persistence
/// layer, so it is deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_date: Option<DateTime<Utc>>,
    pub last_login_date: Option<DateTime<Utc>>,
}

/// Input for creating an account together with its profile record.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub role: Role,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub dept_id: String,
    pub dept_name: String,
    pub dept_head: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub dept_id: String,
    pub dept_name: String,
    pub dept_head: Option<String>,
}

/// A student profile, keyed by the university-issued student ID and linked
/// one-to-one to its account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub user_id: i64,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub major: Option<String>,
    pub enrollment_year: Option<i32>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub major: Option<String>,
    pub enrollment_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub instructor_id: String,
    pub user_id: i64,
    pub name: String,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewInstructor {
    pub instructor_id: String,
    pub name: String,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
}

/// A catalog entry. Credits are decimal because half-credit courses exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub credits: Decimal,
    pub department: Option<String>,
    pub course_type: CourseType,
    pub description: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub course_id: String,
    pub course_name: String,
    pub credits: Decimal,
    pub department: Option<String>,
    pub course_type: CourseType,
    pub description: Option<String>,
}

/// One term-specific scheduled offering of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub section_id: i32,
    pub course_id: String,
    pub instructor_id: Option<String>,
    pub semester: Semester,
    pub year: i32,
    pub max_capacity: i32,
    pub time_slot: Option<String>,
    pub location: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub course_id: String,
    pub instructor_id: Option<String>,
    pub semester: Semester,
    pub year: i32,
    pub max_capacity: i32,
    pub time_slot: Option<String>,
    pub location: Option<String>,
}

/// A section joined with its course, instructor, and live seat counts.
/// This is the shape the allocation workflow evaluates eligibility against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionInfo {
    pub section_id: i32,
    pub course_id: String,
    pub course_name: String,
    pub credits: Decimal,
    pub course_type: CourseType,
    pub semester: Semester,
    pub year: i32,
    pub max_capacity: i32,
    pub current_enrollment: i64,
    pub available_spots: i64,
    pub time_slot: Option<String>,
    pub location: Option<String>,
    pub instructor_name: Option<String>,
}

impl SectionInfo {
    pub fn is_full(&self) -> bool {
        self.available_spots <= 0
    }
}

/// One enrollment row joined with its student, course, and section detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentInfo {
    pub enrollment_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    pub credits: Decimal,
    pub section_id: i32,
    pub semester: Semester,
    pub year: i32,
    pub time_slot: Option<String>,
    pub location: Option<String>,
    pub instructor_name: Option<String>,
    pub status: EnrollmentStatus,
    pub final_grade: Option<Decimal>,
    pub grade_points: Option<Decimal>,
    pub enrollment_date: Option<DateTime<Utc>>,
}

/// A student's GPA summary as computed by the aggregation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGpa {
    pub student_id: String,
    pub student_name: String,
    pub gpa: Decimal,
    pub total_credits: Decimal,
    pub total_courses: i64,
    pub completed_courses: i64,
}

/// Read-only per-course enrollment statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseStatistics {
    pub course_id: String,
    pub course_name: String,
    pub credits: Decimal,
    pub department: Option<String>,
    pub dept_name: Option<String>,
    pub total_enrollments: i64,
    pub current_enrollments: i64,
    pub completed_enrollments: i64,
    pub average_grade: Option<Decimal>,
    pub pass_count: i64,
    pub fail_count: i64,
    pub pass_rate: Option<Decimal>,
}

/// Campus-wide entity counts for the administrative overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatistics {
    pub total_students: i64,
    pub total_instructors: i64,
    pub total_departments: i64,
    pub total_courses: i64,
    pub total_enrollments: i64,
}
