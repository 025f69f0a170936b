//! Live-database tests for the enrollment allocation contract.
//!
//! These exercise the stored-procedure commit path against a real
//! PostgreSQL instance reachable through `DATABASE_URL`. They are ignored
//! by default; run them with `cargo test -- --ignored` once a database is
//! provisioned.

use configuration::DatabaseSettings;
use core_types::{
    AccountStatus, CourseType, EnrollmentStatus, NewAccount, NewCourse, NewSection, NewStudent,
    Role, Semester,
};
use database::repository::enrollments::{MSG_ALREADY_ENROLLED, MSG_SECTION_FULL};
use database::{
    CourseRepository, EnrollmentRepository, SectionRepository, StatisticsRepository,
    StudentRepository, connect, run_migrations,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
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

/// Unique-per-run suffix so fixtures from repeated runs never collide.
fn run_tag() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_student(pool: &PgPool, tag: u128, n: u32) -> String {
    let students = StudentRepository::new(pool.clone());
    let student_id = format!("S{tag}-{n}");
    students
        .register(
            &NewStudent {
                student_id: student_id.clone(),
                name: format!("Test Student {n}"),
                gender: None,
                birth_date: None,
                email: None,
                phone: None,
                college: None,
                major: None,
                enrollment_year: Some(2024),
            },
            &NewAccount {
                username: format!("student-{tag}-{n}"),
                role: Role::Student,
                status: AccountStatus::Active,
            },
            "not-a-real-hash",
        )
        .await
        .expect("student registration");
    student_id
}

async fn create_section(pool: &PgPool, tag: u128, credits: Decimal, capacity: i32) -> i32 {
    let courses = CourseRepository::new(pool.clone());
    let sections = SectionRepository::new(pool.clone());

    let course_id = format!("C{tag}-{capacity}");
    courses
        .create(&NewCourse {
            course_id: course_id.clone(),
            course_name: "Concurrency Lab".to_string(),
            credits,
            department: None,
            course_type: CourseType::MajorRequired,
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
            max_capacity: capacity,
            time_slot: Some("MWF 09:00-09:50".to_string()),
            location: None,
        })
        .await
        .expect("section creation")
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn last_seat_is_never_oversold() {
    let pool = test_pool().await;
    let tag = run_tag();

    let section_id = create_section(&pool, tag, dec!(3.0), 1).await;
    let alice = create_student(&pool, tag, 1).await;
    let bob = create_student(&pool, tag, 2).await;

    let enrollments = EnrollmentRepository::new(pool.clone());
    let (first, second) = tokio::join!(
        enrollments.enroll(&alice, section_id),
        enrollments.enroll(&bob, section_id),
    );
    let first = first.expect("first attempt");
    let second = second.expect("second attempt");

    assert_ne!(
        first.success, second.success,
        "exactly one of two concurrent attempts must win the last seat"
    );
    let loser = if first.success { &second } else { &first };
    assert_eq!(loser.message, MSG_SECTION_FULL);

    let enrolled = enrollments
        .for_section(section_id)
        .await
        .expect("roster")
        .into_iter()
        .filter(|e| e.status == EnrollmentStatus::Enrolled)
        .count();
    assert_eq!(enrolled, 1);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn duplicate_enrollment_is_refused() {
    let pool = test_pool().await;
    let tag = run_tag();

    let section_id = create_section(&pool, tag, dec!(3.0), 10).await;
    let student = create_student(&pool, tag, 1).await;

    let enrollments = EnrollmentRepository::new(pool.clone());
    let first = enrollments.enroll(&student, section_id).await.unwrap();
    assert!(first.success);

    let second = enrollments.enroll(&student, section_id).await.unwrap();
    assert!(!second.success);
    assert_eq!(second.message, MSG_ALREADY_ENROLLED);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn dropping_without_an_active_enrollment_reports_failure() {
    let pool = test_pool().await;
    let tag = run_tag();

    let section_id = create_section(&pool, tag, dec!(3.0), 10).await;
    let student = create_student(&pool, tag, 1).await;

    let enrollments = EnrollmentRepository::new(pool.clone());
    assert!(!enrollments.drop_enrollment(&student, section_id).await.unwrap());

    // A real drop works exactly once.
    assert!(enrollments.enroll(&student, section_id).await.unwrap().success);
    assert!(enrollments.drop_enrollment(&student, section_id).await.unwrap());
    assert!(!enrollments.drop_enrollment(&student, section_id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL database"]
async fn stored_gpa_matches_a_from_scratch_recomputation() {
    let pool = test_pool().await;
    let tag = run_tag();

    let student = create_student(&pool, tag, 1).await;
    let enrollments = EnrollmentRepository::new(pool.clone());

    // Three graded courses with different credit weights, one failure.
    let fixtures = [
        (dec!(4.0), dec!(92), dec!(4.0)),
        (dec!(3.0), dec!(75), dec!(3.0)),
        (dec!(2.0), dec!(40), dec!(0.0)),
    ];
    for (i, (credits, grade, points)) in fixtures.iter().enumerate() {
        let section_id = create_section(&pool, tag + i as u128 + 1, *credits, 10).await;
        assert!(enrollments.enroll(&student, section_id).await.unwrap().success);
        let row = enrollments
            .for_student(&student, None)
            .await
            .unwrap()
            .into_iter()
            .find(|e| e.section_id == section_id)
            .unwrap();
        let status = if *grade >= dec!(60) {
            EnrollmentStatus::Completed
        } else {
            EnrollmentStatus::Failed
        };
        assert!(
            enrollments
                .record_grade(row.enrollment_id, *grade, *points, status)
                .await
                .unwrap()
        );
    }

    let statistics = StatisticsRepository::new(pool.clone());
    let gpa = statistics
        .student_gpa(&student)
        .await
        .unwrap()
        .expect("gpa summary");

    let weighted: Decimal = fixtures.iter().map(|(c, _, p)| c * p).sum();
    let credits: Decimal = fixtures.iter().map(|(c, _, _)| *c).sum();
    let expected = (weighted / credits).round_dp(2);

    assert_eq!(gpa.gpa, expected);
    assert_eq!(gpa.total_credits, credits);
    assert_eq!(gpa.completed_courses, 2);
}
