//! Hazard reporting CLI
//!
//! Submits hazard reports and lists verified hazards against the reports API.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hazard_cli::location::{parse_latitude, parse_longitude};
use hazard_cli::render::{report_line, summary_heading};
use hazard_cli::{FixedLocation, TerminalConfirmation, load_attachment};
use hazard_client::context::StaticCredential;
use hazard_client::{
    ClientConfig, HttpReportsApi, ReportSubmissionController, RequestContext, SubmitOutcome,
    VerifiedReportsMap,
};
use hazard_domain::{GeolocationResult, Position, SubmissionState};
use reqwest::Client;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hazard")]
#[command(about = "Report hazards and browse verified reports")]
struct Args {
    /// Reports API base URL (defaults to HAZARD_API_URL, then localhost)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token for the session
    #[arg(long, env = "HAZARD_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a new hazard report
    Submit {
        /// What the hazard is
        #[arg(short, long)]
        description: String,

        /// Latitude in decimal degrees
        #[arg(long, value_parser = parse_latitude, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, value_parser = parse_longitude, allow_hyphen_values = true)]
        lng: f64,

        /// Photo of the hazard
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List verified hazard reports
    Verified {
        /// Print every report instead of the first few
        #[arg(long)]
        all: bool,

        /// Emit the raw reports as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("hazard_cli=info".parse()?)
                .add_directive("hazard_client=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = &args.api_url {
        config = config.with_api_url(api_url);
    }
    info!("API: {}", config.api_url);

    let api = HttpReportsApi::with_client(
        Client::builder()
            .timeout(Duration::from_secs(args.timeout_secs))
            .user_agent(concat!("hazard-cli/", env!("CARGO_PKG_VERSION")))
            .build()?,
    );
    let ctx = RequestContext::from_store(config.api_url.as_str(), &StaticCredential(args.token));
    if !ctx.has_credential() {
        debug!("no session token, submitting anonymously");
    }

    match args.command {
        Command::Submit {
            description,
            lat,
            lng,
            image,
            yes,
        } => {
            let mut form = ReportSubmissionController::new(config.geolocation);
            let deadline = tokio::time::sleep(config.geolocation.timeout);
            let source = FixedLocation(Position::new(lat, lng));
            if let GeolocationResult::Failure(err) = form.locate(&source, deadline).await {
                warn!("{err}");
                return Ok(ExitCode::FAILURE);
            }

            form.set_description(description);
            if let Some(path) = image {
                form.set_image(Some(load_attachment(&path)?));
            }

            let outcome = form
                .submit(&api, &ctx, &TerminalConfirmation { assume_yes: yes })
                .await;
            match outcome {
                SubmitOutcome::Submitted(receipt) => {
                    println!("{}", SubmissionState::SUCCESS_MESSAGE);
                    if let Some(id) = receipt.id {
                        info!("report id: {id}");
                    }
                    Ok(ExitCode::SUCCESS)
                }
                SubmitOutcome::Declined => {
                    println!("Submission cancelled.");
                    Ok(ExitCode::SUCCESS)
                }
                SubmitOutcome::Rejected(err) => {
                    eprintln!("{err}");
                    Ok(ExitCode::from(2))
                }
                SubmitOutcome::Failed(message) => {
                    eprintln!("{message}");
                    Ok(ExitCode::FAILURE)
                }
                SubmitOutcome::Busy | SubmitOutcome::Discarded => Ok(ExitCode::FAILURE),
            }
        }

        Command::Verified { all, json } => {
            let mut reports = VerifiedReportsMap::new();
            reports.refresh(&api, &ctx).await;

            if let Some(message) = reports.error() {
                eprintln!("{message}");
                return Ok(ExitCode::FAILURE);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(reports.reports())?);
                return Ok(ExitCode::SUCCESS);
            }

            println!("{}", summary_heading(reports.count()));
            let shown = if all {
                reports.reports()
            } else {
                reports.summary()
            };
            for report in shown {
                println!("  {}", report_line(report));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
