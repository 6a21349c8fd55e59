use crate::infra::{load_catalog, log_assessment, read_answers};
use crate::interactive::{run_session, SessionOutcome};
use crate::report::{render_assessment, render_jump_list};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use survey_runner::config::AppConfig;
use survey_runner::error::AppError;
use survey_runner::export::{write_csv_summary, ExportDocument, ExportError};
use survey_runner::scoring::ScoringEngine;
use survey_runner::session::SurveySession;
use survey_runner::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Survey Runner",
    about = "Take the relationship dynamics self-assessment in the terminal or serve it over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through the questionnaire interactively (default command)
    Run(RunArgs),
    /// Score a saved answers file and print the outcome as JSON
    Score(ScoreArgs),
    /// Print the section jump list of a catalog
    Catalog(CatalogArgs),
    /// Start the HTTP service
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct RunArgs {
    /// Question catalog JSON (defaults to SURVEY_CATALOG_PATH, then the bundled catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Where to write the results document (defaults to SURVEY_EXPORT_PATH)
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON object mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Also write the results document to this path
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
    /// Also write a metric,value CSV summary to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Question catalog JSON (defaults to SURVEY_CATALOG_PATH, then the bundled catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Question catalog JSON served by the API
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Run(args) => run_interactive(args, &config),
        Command::Score(args) => run_score(args),
        Command::Catalog(args) => run_catalog(args, &config),
        Command::Serve(args) => server::run(args, config).await,
    }
}

fn run_interactive(args: RunArgs, config: &AppConfig) -> Result<(), AppError> {
    let RunArgs { catalog, export } = args;
    let catalog = load_catalog(catalog.as_deref(), &config.survey)?;
    let engine = ScoringEngine::default();
    let mut session = SurveySession::new(catalog);

    let outcome = run_session(
        &mut session,
        &engine,
        std::io::stdin().lock(),
        std::io::stdout().lock(),
    )?;

    let assessment = match outcome {
        SessionOutcome::Completed(assessment) => assessment,
        SessionOutcome::Quit => {
            info!(
                answered = session.answers().answered_count(),
                "survey closed before the last question"
            );
            return Ok(());
        }
    };
    log_assessment("terminal", &assessment);

    let mut stdout = std::io::stdout().lock();
    render_assessment(&assessment, &mut stdout)?;

    let path = export.unwrap_or_else(|| config.survey.export_path.clone());
    ExportDocument::new(&assessment, session.answers().clone()).write_to_path(&path)?;
    writeln!(stdout, "\nResults saved to {}", path.display())?;
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        export,
        csv,
    } = args;

    let answers = read_answers(&answers)?;
    let assessment = ScoringEngine::default().score(&answers);
    log_assessment("file", &assessment);

    let encoded = serde_json::to_string_pretty(&assessment).map_err(ExportError::from)?;
    println!("{encoded}");

    if let Some(path) = export {
        ExportDocument::new(&assessment, answers).write_to_path(path)?;
    }
    if let Some(path) = csv {
        write_csv_summary(&assessment, File::create(&path)?)?;
        info!(path = %path.display(), "score summary written");
    }
    Ok(())
}

fn run_catalog(args: CatalogArgs, config: &AppConfig) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref(), &config.survey)?;
    let mut stdout = std::io::stdout().lock();
    if let Some(title) = catalog.title() {
        writeln!(stdout, "{title}")?;
    }
    writeln!(
        stdout,
        "{} questions in {} sections",
        catalog.total_questions(),
        catalog.sections().len()
    )?;
    render_jump_list(&catalog.jump_list(), &mut stdout)?;
    Ok(())
}
