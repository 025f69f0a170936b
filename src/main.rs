mod tables;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use core_types::{
    CourseType, Gender, NewCourse, NewDepartment, NewInstructor, NewSection, NewStudent, Role,
    Semester,
};
use database::{connect, run_migrations};
use rust_decimal::Decimal;
use services::AppContext;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Registrar application.
#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables (DATABASE_URL, credential overrides) from
    // .env before clap resolves env-backed arguments.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = configuration::load_config().context("Failed to load config.toml")?;
    let db_pool = connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    let mut ctx = AppContext::new(db_pool, &config);

    match cli.command {
        Commands::Register(command) => handle_register(command, &ctx).await,
        Commands::Courses(command) => handle_courses(command, &ctx).await,
        Commands::Student(command) => handle_student(command, &mut ctx, &cli.auth).await,
        Commands::Instructor(command) => handle_instructor(command, &mut ctx, &cli.auth).await,
        Commands::Admin(command) => handle_admin(command, &mut ctx, &cli.auth).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A role-based course registration and grade management system.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Credentials for the authenticated command groups. Registration and the
/// public course catalog need none.
#[derive(Args)]
struct AuthArgs {
    /// Username to authenticate as.
    #[arg(long, global = true, env = "REGISTRAR_USERNAME")]
    username: Option<String>,

    /// Password for the account.
    #[arg(long, global = true, env = "REGISTRAR_PASSWORD")]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new student or instructor account.
    #[command(subcommand)]
    Register(RegisterCommands),

    /// Browse the public course catalog.
    #[command(subcommand)]
    Courses(CourseCommands),

    /// Student operations: enrollment, schedule, transcript.
    #[command(subcommand)]
    Student(StudentCommands),

    /// Instructor operations: sections, rosters, grading.
    #[command(subcommand)]
    Instructor(InstructorCommands),

    /// Administrative operations: catalog management and statistics.
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand)]
enum RegisterCommands {
    /// Register a student account with its profile.
    Student(RegisterStudentArgs),
    /// Register an instructor account with its profile.
    Instructor(RegisterInstructorArgs),
}

#[derive(Args)]
struct RegisterStudentArgs {
    /// University-issued student ID (e.g., "S2024001").
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    /// Login username for the new account.
    #[arg(long = "new-username")]
    new_username: String,
    /// Login password for the new account.
    #[arg(long = "new-password")]
    new_password: String,
    #[arg(long)]
    gender: Option<Gender>,
    /// Birth date (format: YYYY-MM-DD).
    #[arg(long)]
    birth_date: Option<chrono::NaiveDate>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    college: Option<String>,
    #[arg(long)]
    major: Option<String>,
    #[arg(long)]
    enrollment_year: Option<i32>,
}

#[derive(Args)]
struct RegisterInstructorArgs {
    /// University-issued instructor ID (e.g., "T1001").
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long = "new-username")]
    new_username: String,
    #[arg(long = "new-password")]
    new_password: String,
    /// Owning department ID.
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    title: Option<String>,
}

#[derive(Subcommand)]
enum CourseCommands {
    /// Search course names and descriptions.
    Search {
        /// Case-insensitive search term.
        term: String,
    },
    /// List the catalog, optionally for one department.
    List {
        #[arg(long)]
        department: Option<String>,
    },
}

#[derive(Subcommand)]
enum StudentCommands {
    /// List the sections offered in a term, with seat availability.
    Sections {
        #[arg(long)]
        semester: Semester,
        #[arg(long)]
        year: i32,
    },
    /// Enroll in a section.
    Enroll {
        #[arg(long)]
        section: i32,
    },
    /// Drop an active enrollment.
    Drop {
        #[arg(long)]
        section: i32,
    },
    /// Show the schedule for one term.
    Schedule {
        #[arg(long)]
        semester: Semester,
        #[arg(long)]
        year: i32,
    },
    /// Show the full transcript with the GPA summary.
    Transcript,
    /// Show the GPA summary alone.
    Gpa,
}

#[derive(Subcommand)]
enum InstructorCommands {
    /// List the sections you teach, optionally for one term.
    Sections {
        #[arg(long)]
        semester: Option<Semester>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show the roster for one of your sections.
    Roster {
        #[arg(long)]
        section: i32,
    },
    /// Post a final grade for a student in one of your sections.
    PostGrade {
        #[arg(long)]
        section: i32,
        #[arg(long)]
        student: String,
        /// Final grade on the 0-100 scale.
        #[arg(long)]
        grade: Decimal,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a department.
    CreateDepartment {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        head: Option<String>,
    },
    /// Add a course to the catalog.
    CreateCourse(CreateCourseArgs),
    /// Schedule a section of an existing course.
    CreateSection(CreateSectionArgs),
    /// List all departments.
    Departments,
    /// List students, one page at a time.
    Students {
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// List all instructors.
    Instructors,
    /// Per-course enrollment and grade statistics.
    CourseStats,
    /// Campus-wide entity counts.
    Stats,
}

#[derive(Args)]
struct CreateCourseArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    credits: Decimal,
    #[arg(long = "type")]
    course_type: CourseType,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct CreateSectionArgs {
    #[arg(long)]
    course: String,
    #[arg(long)]
    semester: Semester,
    #[arg(long)]
    year: i32,
    #[arg(long)]
    capacity: i32,
    #[arg(long)]
    instructor: Option<String>,
    /// Opaque schedule label (e.g., "MWF 09:00-09:50").
    #[arg(long)]
    time_slot: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

// ==============================================================================
// Authentication
// ==============================================================================

/// Logs in with the global credentials and verifies the required role.
async fn authenticate(ctx: &mut AppContext, auth: &AuthArgs, role: Role) -> Result<()> {
    let username = auth
        .username
        .as_deref()
        .context("This command requires --username (or REGISTRAR_USERNAME)")?;
    let password = auth
        .password
        .as_deref()
        .context("This command requires --password (or REGISTRAR_PASSWORD)")?;

    ctx.session.login(username, password).await?;
    if !ctx.session.has_role(role) {
        bail!("This command requires the {role} role");
    }
    Ok(())
}

/// The logged-in student's ID, present whenever the Student role check
/// passed and the profile row exists.
fn current_student_id(ctx: &AppContext) -> Result<String> {
    ctx.session
        .current()
        .and_then(|s| s.student.as_ref())
        .map(|s| s.student_id.clone())
        .context("No student profile is linked to this account")
}

fn current_instructor_id(ctx: &AppContext) -> Result<String> {
    ctx.session
        .current()
        .and_then(|s| s.instructor.as_ref())
        .map(|i| i.instructor_id.clone())
        .context("No instructor profile is linked to this account")
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_register(command: RegisterCommands, ctx: &AppContext) -> Result<()> {
    match command {
        RegisterCommands::Student(args) => {
            let student = NewStudent {
                student_id: args.id,
                name: args.name,
                gender: args.gender,
                birth_date: args.birth_date,
                email: args.email,
                phone: args.phone,
                college: args.college,
                major: args.major,
                enrollment_year: args.enrollment_year,
            };
            let id = ctx
                .catalog
                .register_student(student, &args.new_username, &args.new_password)
                .await?;
            println!("Registered student {id}");
        }
        RegisterCommands::Instructor(args) => {
            let instructor = NewInstructor {
                instructor_id: args.id,
                name: args.name,
                department: args.department,
                email: args.email,
                phone: args.phone,
                title: args.title,
            };
            let id = ctx
                .catalog
                .register_instructor(instructor, &args.new_username, &args.new_password)
                .await?;
            println!("Registered instructor {id}");
        }
    }
    Ok(())
}

async fn handle_courses(command: CourseCommands, ctx: &AppContext) -> Result<()> {
    let rows = match command {
        CourseCommands::Search { term } => ctx.catalog.search_courses(&term).await?,
        CourseCommands::List { department } => {
            ctx.catalog.list_courses(department.as_deref()).await?
        }
    };
    if rows.is_empty() {
        println!("No courses found");
    } else {
        println!("{}", tables::courses(&rows));
    }
    Ok(())
}

async fn handle_student(
    command: StudentCommands,
    ctx: &mut AppContext,
    auth: &AuthArgs,
) -> Result<()> {
    authenticate(ctx, auth, Role::Student).await?;
    let student_id = current_student_id(ctx)?;

    match command {
        StudentCommands::Sections { semester, year } => {
            let rows = ctx.catalog.available_sections(semester, year).await?;
            println!("{}", tables::sections(&rows));
        }
        StudentCommands::Enroll { section } => {
            let receipt = ctx.enrollment.enroll(&student_id, section).await?;
            println!(
                "Enrolled in section {} ({} {})",
                receipt.section.section_id, receipt.section.course_id, receipt.section.course_name
            );
            for warning in &receipt.warnings {
                println!("Warning: {warning}");
            }
        }
        StudentCommands::Drop { section } => {
            ctx.enrollment.drop(&student_id, section).await?;
            println!("Dropped section {section}");
        }
        StudentCommands::Schedule { semester, year } => {
            let rows = ctx.records.schedule(&student_id, semester, year).await?;
            println!("{}", tables::schedule(&rows));
        }
        StudentCommands::Transcript => {
            let transcript = ctx.records.transcript(&student_id).await?;
            println!("{}", tables::transcript(&transcript.enrollments));
            println!("{}", tables::gpa_summary(&transcript.summary));
        }
        StudentCommands::Gpa => {
            let summary = ctx.records.gpa(&student_id).await?;
            println!("{}", tables::gpa_summary(&summary));
        }
    }
    Ok(())
}

async fn handle_instructor(
    command: InstructorCommands,
    ctx: &mut AppContext,
    auth: &AuthArgs,
) -> Result<()> {
    authenticate(ctx, auth, Role::Instructor).await?;
    let instructor_id = current_instructor_id(ctx)?;

    match command {
        InstructorCommands::Sections { semester, year } => {
            let term = match (semester, year) {
                (Some(semester), Some(year)) => Some((semester, year)),
                (None, None) => None,
                _ => bail!("--semester and --year must be given together"),
            };
            let rows = ctx.catalog.instructor_sections(&instructor_id, term).await?;
            println!("{}", tables::sections(&rows));
        }
        InstructorCommands::Roster { section } => {
            require_own_section(ctx, &instructor_id, section).await?;
            let rows = ctx.records.section_roster(section).await?;
            println!("{}", tables::roster(&rows));
        }
        InstructorCommands::PostGrade {
            section,
            student,
            grade,
        } => {
            require_own_section(ctx, &instructor_id, section).await?;
            let roster = ctx.records.section_roster(section).await?;
            let enrollment = roster
                .iter()
                .find(|e| {
                    e.student_id == student
                        && e.status == core_types::EnrollmentStatus::Enrolled
                })
                .with_context(|| {
                    format!("Student {student} has no active enrollment in section {section}")
                })?;
            let status = ctx
                .enrollment
                .post_grade(enrollment.enrollment_id, grade)
                .await?;
            println!("Recorded grade {grade} for {student}: {status}");
        }
    }
    Ok(())
}

/// Grading and roster access are limited to the instructor's own sections.
async fn require_own_section(
    ctx: &AppContext,
    instructor_id: &str,
    section_id: i32,
) -> Result<()> {
    let sections = ctx.catalog.instructor_sections(instructor_id, None).await?;
    if sections.iter().any(|s| s.section_id == section_id) {
        Ok(())
    } else {
        bail!("Section {section_id} is not assigned to you")
    }
}

async fn handle_admin(command: AdminCommands, ctx: &mut AppContext, auth: &AuthArgs) -> Result<()> {
    authenticate(ctx, auth, Role::Admin).await?;

    match command {
        AdminCommands::CreateDepartment { id, name, head } => {
            let dept_id = ctx
                .catalog
                .create_department(NewDepartment {
                    dept_id: id,
                    dept_name: name,
                    dept_head: head,
                })
                .await?;
            println!("Created department {dept_id}");
        }
        AdminCommands::CreateCourse(args) => {
            let course_id = ctx
                .catalog
                .create_course(NewCourse {
                    course_id: args.id,
                    course_name: args.name,
                    credits: args.credits,
                    department: args.department,
                    course_type: args.course_type,
                    description: args.description,
                })
                .await?;
            println!("Created course {course_id}");
        }
        AdminCommands::CreateSection(args) => {
            let section_id = ctx
                .catalog
                .create_section(NewSection {
                    course_id: args.course,
                    instructor_id: args.instructor,
                    semester: args.semester,
                    year: args.year,
                    max_capacity: args.capacity,
                    time_slot: args.time_slot,
                    location: args.location,
                })
                .await?;
            println!("Created section {section_id}");
        }
        AdminCommands::Departments => {
            let rows = ctx.catalog.list_departments().await?;
            println!("{}", tables::departments(&rows));
        }
        AdminCommands::Students { page } => {
            let rows = ctx.catalog.list_students(page).await?;
            println!("{}", tables::students(&rows));
        }
        AdminCommands::Instructors => {
            let rows = ctx.catalog.list_instructors().await?;
            println!("{}", tables::instructors(&rows));
        }
        AdminCommands::CourseStats => {
            let rows = ctx.records.course_statistics().await?;
            println!("{}", tables::course_statistics(&rows));
        }
        AdminCommands::Stats => {
            let stats = ctx.records.system_statistics().await?;
            println!("{}", tables::system_statistics(&stats));
        }
    }
    Ok(())
}
