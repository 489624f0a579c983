//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::TripForm;

/// Trip Planner - plan a trip with a remote planning service and ask about it
#[derive(Parser, Debug)]
#[command(name = "tp", author, version, about = "Plan a trip and chat about the itinerary", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Override the planning service base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Subcommand to execute (defaults to interactive)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the trip form interactively, then chat about the plan
    Interactive,

    /// Generate a plan from command-line values
    Plan {
        #[command(flatten)]
        form: FormArgs,

        /// Continue into the chat prompt once the plan is shown
        #[arg(long)]
        chat: bool,
    },

    /// Print the effective configuration
    Config,
}

/// Trip form values; numbers are taken as typed and parsed like form input
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Departure city or airport code
    #[arg(short, long)]
    pub source: String,

    /// Destination city or airport code
    #[arg(short, long)]
    pub destination: String,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long = "start-date", value_name = "DATE")]
    pub start_date: String,

    /// Last day of the trip (YYYY-MM-DD)
    #[arg(long = "end-date", value_name = "DATE")]
    pub end_date: String,

    /// Total budget
    #[arg(short, long, default_value = "", allow_negative_numbers = true)]
    pub budget: String,

    /// Number of travelers
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    pub travelers: String,

    /// Comma separated interests, e.g. "art, food"
    #[arg(short, long, default_value = "")]
    pub interests: String,

    /// Ask the service to include live flight options
    #[arg(short = 'f', long = "include-flights")]
    pub include_flights: bool,
}

impl From<FormArgs> for TripForm {
    fn from(args: FormArgs) -> Self {
        Self {
            source: args.source,
            destination: args.destination,
            start_date: args.start_date,
            end_date: args.end_date,
            budget: args.budget,
            travelers: args.travelers,
            interests: args.interests,
            include_flights: args.include_flights,
        }
    }
}
