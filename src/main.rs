//! syllabus-audit: checks syllabus PDFs for the mandated Gold Statement.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use syllabus_audit_lib::commands::{
    run_audit, run_rematch, AuditRequest, RematchRequest, RunError, RunReport, TableOverrides,
};
use syllabus_audit_lib::config::{self, AuditConfig};
use syllabus_audit_lib::pipeline::llm::{build_client, LlmClient};

#[derive(Parser)]
#[command(name = "syllabus-audit")]
#[command(about = "Audit syllabus PDFs for the required Gold Statement")]
#[command(version = config::APP_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./syllabus-audit.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, resolve and judge a PDF or every PDF in a folder
    Audit {
        /// Syllabus PDF or folder of PDFs
        path: PathBuf,

        /// Result file (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Audit at most this many PDFs from a folder
        #[arg(long)]
        max_files: Option<usize>,

        /// Course → designation CSV
        #[arg(long)]
        course_table: Option<PathBuf>,

        /// Designation → expected statement CSV
        #[arg(long)]
        statement_table: Option<PathBuf>,
    },

    /// Re-resolve and re-judge an existing result CSV
    Rematch {
        /// Result CSV from a previous audit
        results: PathBuf,

        /// Result file (defaults to overwriting RESULTS)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Course → designation CSV
        #[arg(long)]
        course_table: Option<PathBuf>,

        /// Designation → expected statement CSV
        #[arg(long)]
        statement_table: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    syllabus_audit_lib::init_tracing(cli.verbose);

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match run(cli) {
        Ok(report) => {
            match report.output {
                Some(path) => println!("Results written to {}", path.display()),
                None => println!("No documents audited"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<RunReport, RunError> {
    let config = AuditConfig::load(cli.config.as_deref())?;
    tracing::debug!(llm = ?config.llm, retry = ?config.retry, paths = ?config.paths, "Configuration");

    let client: Arc<dyn LlmClient + Send + Sync> = Arc::from(build_client(&config.llm)?);

    match cli.command {
        Commands::Audit {
            path,
            output,
            max_files,
            course_table,
            statement_table,
        } => run_audit(
            &config,
            &AuditRequest {
                input: path,
                output,
                max_files,
                tables: TableOverrides {
                    course_table,
                    statement_table,
                },
            },
            client,
        ),
        Commands::Rematch {
            results,
            output,
            course_table,
            statement_table,
        } => run_rematch(
            &config,
            &RematchRequest {
                results,
                output,
                tables: TableOverrides {
                    course_table,
                    statement_table,
                },
            },
            client,
        ),
    }
}
