//! Live-database tests for grade posting and the GPA contract.
//!
//! Grades travel through `EnrollmentService::post_grade`, so validation,
//! the grade scale, and the passing-line status derivation are all under
//! test, and the stored GPA aggregation is checked against an independent
//! in-process recomputation of the same history. Ignored by default; run
//! with `cargo test -- --ignored` once a database is provisioned.

use configuration::{AcademicRules, DatabaseSettings};
use core_types::{
    AccountStatus, CourseType, EnrollmentStatus, NewAccount, NewCourse, NewSection, NewStudent,
    Role, Semester,
};
use database::{
    connect, run_migrations, CourseRepository, EnrollmentRepository, SectionRepository,
    StatisticsRepository, StudentRepository,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use services::{weighted_gpa, EnrollmentService, ServiceError};
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};

async fn test_pool() -> PgPool {
    let settings = DatabaseSettings {
        max_connections: 5,
        acquire_timeout_secs: 5,
    };
    let pool = connect(&settings).await.expect("database connection");
    run_migrations(&pool).await.expect("migrations");
    pool
}

fn rules() -> AcademicRules {
    AcademicRules {
        min_credits_per_semester: dec!(10),
        max_credits_per_semester: dec!(40),
        passing_grade: dec!(60),
    }
}

fn enrollment_service(pool: &PgPool) -> EnrollmentService {
    EnrollmentService::new(
        SectionRepository::new(pool.clone()),
        EnrollmentRepository::new(pool.clone()),
        rules(),
    )
}

/// Unique-per-run suffix so fixtures from repeated runs never collide.
fn run_tag() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_student(pool: &PgPool, tag: u128) -> String {
    let students = StudentRepository::new(pool.clone());
    let student_id = format!("S{tag}");
    students
        .register(
            &NewStudent {
                student_id: student_id.clone(),
                name: "Grading Test Student".to_string(),
                gender: None,
                birth_date: None,
                email: None,
                phone: None,
                college: None,
                major: None,
                enrollment_year: Some(2024),
            },
            &NewAccount {
                username: format!("grading-{tag}"),
                role: Role::Student,
                status: AccountStatus::Active,
            },
            "not-a-real-hash",
        )
        .await
        .expect("student registration");
    student_id
}

async fn create_section(pool: &PgPool, tag: u128, credits: Decimal) -> i32 {
    let courses = CourseRepository::new(pool.clone());
    let sections = SectionRepository::new(pool.clone());

    let course_id = format!("G{tag}");
    courses
        .create(&NewCourse {
            course_id: course_id.clone(),
            course_name: "Grading Lab".to_string(),
            credits,
            department: None,
            course_type: CourseType::MajorElective,
            description: None,
        })
        .await
        .expect("course creation");

    sections
        .create(&NewSection {
            course_id,
            instructor_id: None,
            semester: Semester::Fall,
            year: 2024,
            max_capacity: 10,
            time_slot: None,
            location: None,
        })
        .await
        .expect("section creation")
}

async fn enroll_and_find(
    service: &EnrollmentService,
    enrollments: &EnrollmentRepository,
    student_id: &str,
    section_id: i32,
) -> i64 {
    service
        .enroll(student_id, section_id)
        .await
        .expect("enrollment");
    enrollments
        .for_student(student_id, None)
        .await
        .expect("history")
        .into_iter()
        .find(|e| e.section_id == section_id)
        .expect("enrolled row")
        .enrollment_id
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn posted_grades_derive_status_at_the_passing_line() {
    let pool = test_pool().await;
    let tag = run_tag();
    let service = enrollment_service(&pool);
    let enrollments = EnrollmentRepository::new(pool.clone());

    let student = create_student(&pool, tag).await;
    let passed = create_section(&pool, tag, dec!(3.0)).await;
    let failed = create_section(&pool, tag + 1, dec!(3.0)).await;

    let passing = enroll_and_find(&service, &enrollments, &student, passed).await;
    let failing = enroll_and_find(&service, &enrollments, &student, failed).await;

    assert_eq!(
        service.post_grade(passing, dec!(75)).await.unwrap(),
        EnrollmentStatus::Completed
    );
    assert_eq!(
        service.post_grade(failing, dec!(55)).await.unwrap(),
        EnrollmentStatus::Failed
    );

    let history = enrollments.for_student(&student, None).await.unwrap();
    let graded = history
        .iter()
        .find(|e| e.enrollment_id == passing)
        .unwrap();
    assert_eq!(graded.final_grade, Some(dec!(75)));
    assert_eq!(graded.grade_points, Some(dec!(3.0)));

    // A terminal row cannot be graded again.
    assert!(matches!(
        service.post_grade(passing, dec!(90)).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn out_of_range_grades_never_touch_the_store() {
    let pool = test_pool().await;
    let tag = run_tag();
    let service = enrollment_service(&pool);
    let enrollments = EnrollmentRepository::new(pool.clone());

    let student = create_student(&pool, tag).await;
    let section = create_section(&pool, tag, dec!(3.0)).await;
    let enrollment_id = enroll_and_find(&service, &enrollments, &student, section).await;

    assert!(matches!(
        service.post_grade(enrollment_id, dec!(101)).await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.post_grade(enrollment_id, dec!(-1)).await,
        Err(ServiceError::Validation(_))
    ));

    let row = enrollments
        .for_student(&student, None)
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.enrollment_id == enrollment_id)
        .unwrap();
    assert_eq!(row.status, EnrollmentStatus::Enrolled);
    assert_eq!(row.final_grade, None);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn stored_gpa_matches_an_in_process_recomputation() {
    let pool = test_pool().await;
    let tag = run_tag();
    let service = enrollment_service(&pool);
    let enrollments = EnrollmentRepository::new(pool.clone());

    let student = create_student(&pool, tag).await;

    // Credit weights and grades chosen so the weighted mean lands on a
    // rounding midpoint: (4*4.0 + 2*3.3 + 2*0.0) / 8 = 2.825.
    let fixtures = [
        (dec!(4.0), dec!(95)),
        (dec!(2.0), dec!(82)),
        (dec!(2.0), dec!(40)),
    ];
    for (i, (credits, grade)) in fixtures.iter().enumerate() {
        let section = create_section(&pool, tag + i as u128 + 1, *credits).await;
        let enrollment_id = enroll_and_find(&service, &enrollments, &student, section).await;
        service.post_grade(enrollment_id, *grade).await.unwrap();
    }

    let stored = StatisticsRepository::new(pool.clone())
        .student_gpa(&student)
        .await
        .unwrap()
        .expect("gpa summary");

    let history = enrollments.for_student(&student, None).await.unwrap();
    let recomputed = weighted_gpa(&history).expect("graded history");

    assert_eq!(stored.gpa, recomputed);
    assert_eq!(stored.gpa, dec!(2.83));
    assert_eq!(stored.total_credits, dec!(8.0));
}
