mod cli;
mod infra;
mod routes;
mod server;

use sitetrust::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
