mod cli;
mod infra;
mod interactive;
mod prompt;
mod report;
mod routes;
mod server;

use survey_runner::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
