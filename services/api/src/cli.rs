use crate::infra::scoring_engine;
use crate::server;
use clap::{Args, Parser, Subcommand};
use sitetrust::config::AppConfig;
use sitetrust::error::AppError;
use sitetrust::scoring::ParameterSet;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sitetrust",
    about = "Score website trust signals and serve the scan history API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a JSON map of parameter risks and print the outcome
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file mapping parameter names to risks or `{ "risk", "value" }` objects
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Trust-score drop since the previous scan
    #[arg(long, default_value_t = 0)]
    pub(crate) trend_drop: i32,
    /// Number of top risks to report (defaults to SITETRUST_TOP_RISKS)
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
    }
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(top) = args.top {
        config.scoring.top_risks = top;
    }

    let engine = scoring_engine(&config.scoring)?;
    let raw = fs::read_to_string(&args.input)?;
    let parameters: ParameterSet = serde_json::from_str(&raw)?;

    let outcome = engine.score_with_trend(&parameters, args.trend_drop);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
