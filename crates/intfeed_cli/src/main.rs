//! Terminal client for the intFeed records API.
//!
//! # Responsibility
//! - Submit records and list them through the JSON API only.
//! - Print the server's verdict for each submission as received.

mod client;
mod session;

use clap::{Parser, Subcommand};
use client::HttpRecordsApi;
use intfeed_core::init_logging;
use session::{render_table, Session, SubmissionState};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "intfeed", version, about = "Submit and list intFeed records")]
struct Cli {
    /// Records endpoint of a running intfeed-server.
    #[arg(
        long,
        env = "INTFEED_API_URL",
        default_value = "http://localhost:3000/api/users"
    )]
    api_url: String,

    #[arg(long, env = "INTFEED_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every stored record in creation order.
    List,
    /// Save one record, then print the refreshed list.
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli.log_level, None) {
        eprintln!("intfeed: {err}");
        return ExitCode::FAILURE;
    }

    let api = match HttpRecordsApi::new(cli.api_url.as_str()) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("intfeed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::default();
    match cli.command {
        Command::List => {
            if let Err(err) = session.refresh(&api).await {
                eprintln!("Could not retrieve users: {err}");
                return ExitCode::FAILURE;
            }
            print!("{}", render_table(session.records()));
            ExitCode::SUCCESS
        }
        Command::Submit { name, age } => {
            session.submit(&api, &name, &age).await;
            match session.acknowledge() {
                SubmissionState::Success(message) => {
                    println!("{message}");
                    if session.is_stale() {
                        eprintln!("Could not refresh list of users.");
                    } else {
                        print!("{}", render_table(session.records()));
                    }
                    ExitCode::SUCCESS
                }
                SubmissionState::DuplicateRejected(error) | SubmissionState::Failed(error) => {
                    eprintln!("{error}");
                    ExitCode::FAILURE
                }
                SubmissionState::Idle | SubmissionState::Submitting => ExitCode::FAILURE,
            }
        }
    }
}
