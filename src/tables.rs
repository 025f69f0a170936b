//! Terminal table renderers for the read models.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::{
    Course, CourseStatistics, Department, EnrollmentInfo, Instructor, SectionInfo, Student,
    StudentGpa, SystemStatistics,
};

fn base_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn sections(rows: &[SectionInfo]) -> Table {
    let mut table = base_table(vec![
        "Section", "Course", "Name", "Credits", "Term", "Instructor", "Time", "Location", "Seats",
    ]);
    for s in rows {
        table.add_row(vec![
            s.section_id.to_string(),
            s.course_id.clone(),
            s.course_name.clone(),
            s.credits.to_string(),
            format!("{} {}", s.semester, s.year),
            opt(&s.instructor_name).to_string(),
            opt(&s.time_slot).to_string(),
            opt(&s.location).to_string(),
            format!("{}/{}", s.current_enrollment, s.max_capacity),
        ]);
    }
    table
}

pub fn schedule(rows: &[EnrollmentInfo]) -> Table {
    let mut table = base_table(vec![
        "Section", "Course", "Name", "Credits", "Time", "Location", "Instructor", "Status",
    ]);
    for e in rows {
        table.add_row(vec![
            e.section_id.to_string(),
            e.course_id.clone(),
            e.course_name.clone(),
            e.credits.to_string(),
            opt(&e.time_slot).to_string(),
            opt(&e.location).to_string(),
            opt(&e.instructor_name).to_string(),
            e.status.to_string(),
        ]);
    }
    table
}

pub fn transcript(rows: &[EnrollmentInfo]) -> Table {
    let mut table = base_table(vec![
        "Term", "Course", "Name", "Credits", "Status", "Grade", "Points",
    ]);
    for e in rows {
        table.add_row(vec![
            format!("{} {}", e.semester, e.year),
            e.course_id.clone(),
            e.course_name.clone(),
            e.credits.to_string(),
            e.status.to_string(),
            e.final_grade.map_or_else(|| "-".to_string(), |g| g.to_string()),
            e.grade_points.map_or_else(|| "-".to_string(), |p| p.to_string()),
        ]);
    }
    table
}

pub fn roster(rows: &[EnrollmentInfo]) -> Table {
    let mut table = base_table(vec!["Enrollment", "Student", "Name", "Status", "Grade"]);
    for e in rows {
        table.add_row(vec![
            e.enrollment_id.to_string(),
            e.student_id.clone(),
            e.student_name.clone(),
            e.status.to_string(),
            e.final_grade.map_or_else(|| "-".to_string(), |g| g.to_string()),
        ]);
    }
    table
}

pub fn gpa_summary(summary: &StudentGpa) -> Table {
    let mut table = base_table(vec![
        "Student", "Name", "GPA", "Credits", "Courses", "Completed",
    ]);
    table.add_row(vec![
        summary.student_id.clone(),
        summary.student_name.clone(),
        summary.gpa.to_string(),
        summary.total_credits.to_string(),
        summary.total_courses.to_string(),
        summary.completed_courses.to_string(),
    ]);
    table
}

pub fn courses(rows: &[Course]) -> Table {
    let mut table = base_table(vec!["Course", "Name", "Credits", "Type", "Department"]);
    for c in rows {
        table.add_row(vec![
            c.course_id.clone(),
            c.course_name.clone(),
            c.credits.to_string(),
            c.course_type.to_string(),
            opt(&c.department).to_string(),
        ]);
    }
    table
}

pub fn students(rows: &[Student]) -> Table {
    let mut table = base_table(vec!["Student", "Name", "College", "Major", "Year"]);
    for s in rows {
        table.add_row(vec![
            s.student_id.clone(),
            s.name.clone(),
            opt(&s.college).to_string(),
            opt(&s.major).to_string(),
            s.enrollment_year
                .map_or_else(|| "-".to_string(), |y| y.to_string()),
        ]);
    }
    table
}

pub fn instructors(rows: &[Instructor]) -> Table {
    let mut table = base_table(vec!["Instructor", "Name", "Department", "Title", "Email"]);
    for i in rows {
        table.add_row(vec![
            i.instructor_id.clone(),
            i.name.clone(),
            opt(&i.department).to_string(),
            opt(&i.title).to_string(),
            opt(&i.email).to_string(),
        ]);
    }
    table
}

pub fn departments(rows: &[Department]) -> Table {
    let mut table = base_table(vec!["Department", "Name", "Head"]);
    for d in rows {
        table.add_row(vec![
            d.dept_id.clone(),
            d.dept_name.clone(),
            opt(&d.dept_head).to_string(),
        ]);
    }
    table
}

pub fn course_statistics(rows: &[CourseStatistics]) -> Table {
    let mut table = base_table(vec![
        "Course", "Name", "Department", "Total", "Current", "Completed", "Avg Grade", "Pass Rate",
    ]);
    for c in rows {
        table.add_row(vec![
            c.course_id.clone(),
            c.course_name.clone(),
            c.dept_name.clone().or(c.department.clone()).unwrap_or_else(|| "-".to_string()),
            c.total_enrollments.to_string(),
            c.current_enrollments.to_string(),
            c.completed_enrollments.to_string(),
            c.average_grade
                .map_or_else(|| "-".to_string(), |g| g.to_string()),
            c.pass_rate
                .map_or_else(|| "-".to_string(), |r| format!("{:.1}%", r * rust_decimal::Decimal::from(100))),
        ]);
    }
    table
}

pub fn system_statistics(stats: &SystemStatistics) -> Table {
    let mut table = base_table(vec![
        "Students", "Instructors", "Departments", "Courses", "Enrollments",
    ]);
    table.add_row(vec![
        stats.total_students.to_string(),
        stats.total_instructors.to_string(),
        stats.total_departments.to_string(),
        stats.total_courses.to_string(),
        stats.total_enrollments.to_string(),
    ]);
    table
}
