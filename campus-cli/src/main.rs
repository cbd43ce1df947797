//! Campus CLI - command-line front end for the faculty and class management backend
//!
//! Every page of the web client is a subcommand; the session persists between
//! invocations under the configured data directory.

mod render;

use anyhow::Context;
use campus_api::{QuizGenerateRequest, QuizLevel, StudentId, StudentRegistration, UploadFile};
use campus_applications::views::{
    self, AttendanceSheet, FacultyLoad, Muster, ProgressView, QuizAttempt, TimetableGrid,
};
use campus_applications::{CampusApp, SignupForm};
use campus_core::{
    init_logging, log_operation_error, CampusConfig, CampusError, CancellationToken,
    LoggingConfig, Role,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Faculty and class management from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the role-scoped tokens
    Login { email: String, password: String },

    /// Register a new account
    Signup {
        username: String,
        email: String,
        password: String,

        /// student, faculty or admin
        #[arg(long)]
        role: Option<Role>,
    },

    /// Clear the stored credentials of a role (the active one by default)
    Logout {
        #[arg(long)]
        role: Option<Role>,
    },

    /// Show the current role and whether a token is held
    Whoami,

    /// Exchange the stored refresh token for a new access token
    Refresh,

    /// List the pages available to this session
    Nav,

    /// Show or change the light/dark preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },

    /// Notice board
    Events {
        #[command(subcommand)]
        action: EventsCommand,
    },

    /// Holiday calendar
    Holidays {
        #[command(subcommand)]
        action: HolidaysCommand,
    },

    /// Student roster and marks
    Students {
        #[command(subcommand)]
        action: StudentsCommand,
    },

    /// Mark attendance or follow it live
    Attendance {
        #[command(subcommand)]
        action: AttendanceCommand,
    },

    /// Generate or attempt quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizCommand,
    },

    /// Semester progress report
    Progress { semester: String },

    /// Class timetables
    Timetable {
        #[command(subcommand)]
        action: TimetableCommand,
    },

    /// Notes as PDF documents
    Pdf {
        #[command(subcommand)]
        action: PdfCommand,
    },

    /// Classify faculty workload from a JSON file of weekly hours
    Workload { file: PathBuf },

    /// Ask the faculty assistant a question
    Ask { question: Vec<String> },

    /// Generate teacher notes for a topic
    Notes { topic: Vec<String> },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ThemeCommand {
    Toggle,
    Light,
    Dark,
}

#[derive(Subcommand)]
enum EventsCommand {
    List,
    Add {
        title: String,
        /// YYYY-MM-DD
        date: String,
        /// HH:MM
        time: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
enum HolidaysCommand {
    List,
    /// Upload a holiday spreadsheet
    Upload { file: PathBuf },
}

#[derive(Subcommand)]
enum StudentsCommand {
    /// Muster of every student, or one semester
    List {
        #[arg(long)]
        semester: Option<u32>,
    },
    /// Upload a roster spreadsheet and show the refreshed muster
    Upload { file: PathBuf },
    /// Register for quiz access
    Register {
        student_id: String,
        name: String,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        semester: u32,
        #[arg(long)]
        division: String,
    },
    /// Set a student's marks (0 to 100)
    Marks { student_id: String, marks: u32 },
}

#[derive(Subcommand)]
enum AttendanceCommand {
    /// Save a sheet; students not listed as present are saved absent
    Mark {
        #[arg(long)]
        semester: u32,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Student ids present
        #[arg(long, value_delimiter = ',')]
        present: Vec<String>,
        /// Mark the whole class present
        #[arg(long)]
        all: bool,
    },
    /// Poll live attendance until Ctrl-C
    Watch {
        #[arg(long)]
        semester: u32,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum QuizCommand {
    Generate {
        topic: String,
        #[arg(long, default_value = "medium")]
        level: QuizLevel,
        #[arg(long)]
        semester: String,
    },
    /// Show a quiz, or score it when answers are given
    Attempt {
        topic: String,
        /// Chosen option number per question, 1-based
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },
}

#[derive(Subcommand)]
enum TimetableCommand {
    Show { semester: String, division: String },
    /// Upload a timetable spreadsheet
    Upload { file: PathBuf },
}

#[derive(Subcommand)]
enum PdfCommand {
    List,
    Upload { title: String, file: PathBuf },
    Download {
        id: i64,
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    /// Write a default configuration file
    Init,
    Validate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<CampusError>() {
            Some(campus_error) => {
                campus_error.log();
                eprintln!("❌ {}", campus_error.user_message());
                if let Some(context) = campus_error.context() {
                    for suggestion in &context.recovery_suggestions {
                        eprintln!("   💡 {}", suggestion);
                    }
                }
            }
            None => eprintln!("❌ {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Config { action } = &cli.command {
        return handle_config(action, cli.config.as_deref());
    }

    let config = CampusConfig::load(cli.config.as_deref())?;
    let logging = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        config.logging.clone()
    };
    init_logging(&logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting Campus CLI v{}", env!("CARGO_PKG_VERSION"));
    let app = CampusApp::open(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let role = app.shell().login(&email, &password).await?;
            println!("✅ Logged in as {}", role);
        }
        Commands::Signup {
            username,
            email,
            password,
            role,
        } => {
            let form = SignupForm {
                username,
                email,
                password,
                role,
            };
            let registered = app.shell().signup(&form).await?;
            println!(
                "✅ Account created{}. Please log in.",
                registered.map(|r| format!(" as {}", r)).unwrap_or_default()
            );
        }
        Commands::Logout { role } => {
            app.shell().logout(role)?;
            println!("👋 Logged out");
        }
        Commands::Whoami => {
            let state = app.session().snapshot();
            match state.role {
                Some(role) => println!("👤 Role: {}", role),
                None => println!("👤 No role selected"),
            }
            println!(
                "🔑 {}",
                if state.is_authenticated() {
                    "Access token held"
                } else {
                    "Not logged in"
                }
            );
        }
        Commands::Refresh => {
            app.shell().refresh_session().await?;
            println!("✅ Access token refreshed");
        }
        Commands::Nav => {
            let shell = app.shell();
            render::nav(shell.links());
            let actions: Vec<_> = shell.auth_actions().iter().map(|a| a.label()).collect();
            println!("\n  [{}]", actions.join(" | "));
        }
        Commands::Theme { action } => {
            let theme = app.shell().theme();
            let current = match action {
                None => theme.current()?,
                Some(ThemeCommand::Toggle) => theme.toggle()?,
                Some(ThemeCommand::Light) => {
                    theme.set(campus_core::Theme::Light)?;
                    campus_core::Theme::Light
                }
                Some(ThemeCommand::Dark) => {
                    theme.set(campus_core::Theme::Dark)?;
                    campus_core::Theme::Dark
                }
            };
            println!("🎨 Theme: {}", current);
        }
        Commands::Events { action } => handle_events(&app, action).await?,
        Commands::Holidays { action } => handle_holidays(&app, action).await?,
        Commands::Students { action } => handle_students(&app, action).await?,
        Commands::Attendance { action } => handle_attendance(&app, action).await?,
        Commands::Quiz { action } => handle_quiz(&app, action).await?,
        Commands::Progress { semester } => {
            let report = app.client().progress_report(&semester).await?;
            render::progress(&ProgressView::from_report(report));
        }
        Commands::Timetable { action } => handle_timetable(&app, action).await?,
        Commands::Pdf { action } => handle_pdf(&app, action).await?,
        Commands::Workload { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let loads: Vec<FacultyLoad> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a list of faculty loads", file.display()))?;
            render::workload(&loads);
        }
        Commands::Ask { question } => {
            let answer = app.assistant().ask(&question.join(" ")).await?;
            println!("{}", answer);
        }
        Commands::Notes { topic } => {
            let notes = app.assistant().notes(&topic.join(" ")).await?;
            println!("{}", notes);
        }
        // Handled before the session is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Token cancelled by Ctrl-C, for loads bound to this invocation
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received, cancelling");
            on_signal.cancel();
        }
    });
    token
}

async fn handle_events(app: &CampusApp, action: EventsCommand) -> anyhow::Result<()> {
    match action {
        EventsCommand::List => {
            let cards = views::load_notice_board(app.client(), &interrupt_token()).await?;
            render::notice_board(&cards);
        }
        EventsCommand::Add {
            title,
            date,
            time,
            description,
        } => {
            let event = views::new_event(&title, &description, &date, &time)?;
            app.client().add_event(&event).await?;
            println!("✅ Event added: {}", event.title);
        }
    }
    Ok(())
}

async fn handle_holidays(app: &CampusApp, action: HolidaysCommand) -> anyhow::Result<()> {
    match action {
        HolidaysCommand::List => {
            let holidays = app.client().list_holidays().await?;
            render::holidays(&views::group_by_month(&holidays));
        }
        HolidaysCommand::Upload { file } => {
            app.client()
                .upload_holidays(UploadFile::from_path(&file).await?)
                .await?;
            println!("✅ Holidays uploaded from {}", file.display());
        }
    }
    Ok(())
}

async fn handle_students(app: &CampusApp, action: StudentsCommand) -> anyhow::Result<()> {
    match action {
        StudentsCommand::List { semester: None } => {
            let muster = Muster::load(app.client(), &interrupt_token()).await?;
            for ((semester, division), students) in muster.by_class() {
                println!(
                    "\n📋 Semester {} Division {}",
                    semester.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                    division.as_deref().unwrap_or("-")
                );
                let students: Vec<_> = students.into_iter().cloned().collect();
                render::students(&students);
            }
            if muster.is_empty() {
                println!("📭 No students found");
            }
        }
        StudentsCommand::List {
            semester: Some(semester),
        } => {
            let students = app.client().students_by_semester(semester).await?;
            render::students(&students);
        }
        StudentsCommand::Upload { file } => {
            let file = UploadFile::from_path(&file).await?;
            let muster = Muster::upload_and_reload(app.client(), file, &interrupt_token()).await?;
            println!("✅ Roster uploaded, {} students", muster.students().len());
        }
        StudentsCommand::Register {
            student_id,
            name,
            gender,
            semester,
            division,
        } => {
            let registration = StudentRegistration {
                student_id,
                name,
                gender,
                semester,
                division,
            };
            app.client().register_student(&registration).await?;
            println!("✅ Registered {}", registration.name);
        }
        StudentsCommand::Marks { student_id, marks } => {
            app.client().update_marks(&student_id, marks).await?;
            println!("✅ Marks for {} set to {}", student_id, marks);
        }
    }
    Ok(())
}

async fn handle_attendance(app: &CampusApp, action: AttendanceCommand) -> anyhow::Result<()> {
    let today = || chrono::Local::now().date_naive();

    match action {
        AttendanceCommand::Mark {
            semester,
            date,
            present,
            all,
        } => {
            let session = app.class_session(semester, date.unwrap_or_else(today));
            let token = interrupt_token();
            let mut sheet = AttendanceSheet::load(app.client(), session, &token).await?;
            if all {
                sheet.mark_all(true);
            }
            for id in &present {
                sheet.mark(&StudentId::from(id.as_str()), true)?;
            }
            sheet.save(app.client()).await?;

            let present_count = sheet
                .rows()
                .iter()
                .filter(|row| row.present == Some(true))
                .count();
            println!(
                "✅ Attendance saved: {} present, {} absent",
                present_count,
                sheet.rows().len() - present_count
            );
        }
        AttendanceCommand::Watch { semester, date } => {
            let session = app.class_session(semester, date.unwrap_or_else(today));
            let token = interrupt_token();

            let Some(monitor) = app.watch_attendance(session, token.clone()).await? else {
                println!("📭 No students in semester {}", semester);
                return Ok(());
            };

            let mut updates = monitor.subscribe();
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = updates.borrow_and_update().clone();
                        render::live_attendance(monitor.students(), &snapshot);
                    }
                }
            }

            monitor.stop().await;
            println!("⏹️  Stopped watching");
        }
    }
    Ok(())
}

async fn handle_quiz(app: &CampusApp, action: QuizCommand) -> anyhow::Result<()> {
    match action {
        QuizCommand::Generate {
            topic,
            level,
            semester,
        } => {
            let request = QuizGenerateRequest {
                topic,
                level,
                semester,
            };
            app.client().generate_quiz(&request).await?;
            println!("✅ Quiz generated for {}", request.topic);
        }
        QuizCommand::Attempt { topic, answers } => {
            let mut attempt = QuizAttempt::load(app.client(), &topic, &interrupt_token()).await?;
            if attempt.questions().is_empty() {
                println!("📭 No quiz found for {}", attempt.topic);
                return Ok(());
            }

            if answers.is_empty() {
                for (i, question) in attempt.questions().iter().enumerate() {
                    println!("\n{}. {}", i + 1, question.question);
                    for (n, option) in question.options.iter().enumerate() {
                        println!("   {}) {}", n + 1, option);
                    }
                }
                println!("\n💡 Answer with --answers 1,3,2,...");
                return Ok(());
            }

            for (index, choice) in answers.iter().enumerate() {
                let option = attempt
                    .questions()
                    .get(index)
                    .and_then(|q| q.options.get(choice.wrapping_sub(1)))
                    .cloned()
                    .with_context(|| format!("Question {} has no option {}", index + 1, choice))?;
                attempt.select(index, &option)?;
            }

            let correct = attempt.submit()?;
            println!("🎯 Score: {}/{}", correct, attempt.questions().len());
        }
    }
    Ok(())
}

async fn handle_timetable(app: &CampusApp, action: TimetableCommand) -> anyhow::Result<()> {
    match action {
        TimetableCommand::Show { semester, division } => {
            match app.client().timetable(&semester, &division).await? {
                Some(schedule) => render::timetable(&TimetableGrid::new(schedule)),
                None => println!(
                    "📭 No timetable for semester {} division {}",
                    semester, division
                ),
            }
        }
        TimetableCommand::Upload { file } => {
            app.client()
                .upload_timetable(UploadFile::from_path(&file).await?)
                .await?;
            println!("✅ Timetable uploaded from {}", file.display());
        }
    }
    Ok(())
}

async fn handle_pdf(app: &CampusApp, action: PdfCommand) -> anyhow::Result<()> {
    match action {
        PdfCommand::List => {
            render::pdfs(&views::list_notes(app.client(), &interrupt_token()).await?)
        }
        PdfCommand::Upload { title, file } => {
            views::upload_notes(app.client(), &title, &file).await?;
            println!("✅ Uploaded {}", title);
        }
        PdfCommand::Download { id, output } => {
            let token = interrupt_token();
            let path = views::download_notes(app.client(), id, &output, &token).await?;
            println!("✅ Saved {}", path.display());
        }
    }
    Ok(())
}

fn handle_config(action: &ConfigCommand, explicit: Option<&std::path::Path>) -> anyhow::Result<()> {
    match action {
        ConfigCommand::Show => {
            let config = CampusConfig::load(explicit)?;
            println!("📋 Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Init => {
            let path = explicit
                .map(PathBuf::from)
                .or_else(|| CampusConfig::default_paths().into_iter().next())
                .unwrap_or_else(|| PathBuf::from("campus.toml"));
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            CampusConfig::default().save_to_file(&path)?;
            println!("✅ Configuration initialized at: {}", path.display());
            println!("📝 Edit api.base_url to point at your backend.");
        }
        ConfigCommand::Validate => match CampusConfig::load(explicit) {
            Ok(_) => println!("✅ Configuration is valid"),
            Err(e) => {
                log_operation_error!("validate_config", &e);
                println!("❌ Configuration validation failed: {}", e);
                return Err(e.into());
            }
        },
    }
    Ok(())
}
