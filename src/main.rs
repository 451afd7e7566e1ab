use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use exam_seating::config::AppConfig;
use exam_seating::error::AppError;
use exam_seating::routes::{router, AppState};
use exam_seating::telemetry;
use exam_seating::workflows::roster::RosterTable;
use exam_seating::workflows::seating::report::{ReportFormat, ReportOutcome, ReportWriter};
use exam_seating::workflows::seating::{
    SeatingRun, SeatingRunResult, SeatingSources, SubjectCatalog, TableSource, TableStatus,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "exam-seating",
    about = "Allocate exam hall seating and invigilators, then generate seating reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate seats and write the common and branch-only reports (default command)
    Allocate(AllocateArgs),
    /// Start the HTTP service
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct AllocateArgs {
    /// Students table (PRN, name, branch, year)
    #[arg(long)]
    students: Option<PathBuf>,
    /// Buildings table (building number, room number, benches)
    #[arg(long)]
    buildings: Option<PathBuf>,
    /// Subjects table (name, branch type, exam date, year, duration)
    #[arg(long)]
    subjects: Option<PathBuf>,
    /// Invigilators table (name, department)
    #[arg(long)]
    invigilators: Option<PathBuf>,
    /// Directory receiving both reports
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Report format: text or json
    #[arg(long)]
    format: Option<ReportFormat>,
    /// JSON subject catalog replacing the built-in common/branch tables
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Allocate(AllocateArgs::default()));

    match command {
        Command::Allocate(args) => run_allocate(args),
        Command::Serve(args) => run_server(args).await,
    }
}

fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let AllocateArgs {
        students,
        buildings,
        subjects,
        invigilators,
        output_dir,
        format,
        catalog,
    } = args;
    let seating = config.seating;

    let sources = SeatingSources {
        students: TableSource::Path(students.unwrap_or(seating.students_csv)),
        buildings: TableSource::Path(buildings.unwrap_or(seating.buildings_csv)),
        subjects: TableSource::Path(subjects.unwrap_or(seating.subjects_csv)),
        invigilators: TableSource::Path(invigilators.unwrap_or(seating.invigilators_csv)),
    };
    let catalog = match catalog.or(seating.catalog_path) {
        Some(path) => SubjectCatalog::from_path(path)?,
        None => SubjectCatalog::standard(),
    };
    let writer = ReportWriter::new(
        output_dir.unwrap_or(seating.output_dir),
        format.unwrap_or(seating.report_format),
    );

    let result = SeatingRun::execute(&sources, &catalog);
    let outcomes = result.write_reports(&writer);
    render_run_summary(&result, &outcomes);

    if outcomes.iter().any(ReportOutcome::is_written) {
        Ok(())
    } else {
        Err(AppError::Reports(
            "neither seating report could be written".to_string(),
        ))
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "exam seating service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn render_run_summary(result: &SeatingRunResult, outcomes: &[ReportOutcome]) {
    println!("Exam hall allocation");

    println!("\nInput tables");
    for table in RosterTable::ordered() {
        let Some(outcome) = result.table(table) else {
            continue;
        };
        match &outcome.status {
            TableStatus::Loaded { rows, skipped } => {
                println!("- {}: {} loaded, {} skipped", table.label(), rows, skipped)
            }
            TableStatus::Failed { error } => {
                println!("- {}: unreadable ({})", table.label(), error)
            }
        }
    }

    let preview: Vec<_> = result.allocation.students().take(5).collect();
    if !preview.is_empty() {
        println!("\nFirst loaded students");
        for student in preview {
            println!(
                "- {} | {} | {} | year {}",
                student.prn, student.name, student.branch, student.year
            );
        }
    }

    if !result.allocation.halls().is_empty() {
        println!("\nRooms");
        for hall in result.allocation.halls() {
            println!(
                "- Building {} Room {} benches={}",
                hall.building_number(),
                hall.room().number(),
                hall.room().benches()
            );
        }
    }

    let summary = result.summary();
    println!("\nSeating");
    println!(
        "- {} rooms visited, {} benches in total",
        summary.rooms_visited, summary.total_capacity
    );
    println!(
        "- {} students seated, {} unallocated",
        summary.students_seated, summary.students_unallocated
    );
    if summary.halls_without_invigilator > 0 {
        println!(
            "- {} rooms without an invigilator",
            summary.halls_without_invigilator
        );
    }

    println!("\nReports");
    for outcome in outcomes {
        match outcome {
            ReportOutcome::Written { mode, path } => {
                println!("- {}: {}", mode.label(), path.display())
            }
            ReportOutcome::Failed { mode, error } => {
                println!("- {}: failed ({})", mode.label(), error)
            }
        }
    }
}
