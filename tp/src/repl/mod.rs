//! Interactive REPL for the trip planner
//!
//! Prompts for the trip form, shows the generated plan and then takes
//! follow-up questions, with slash commands for everything else.

mod session;

pub use session::PlannerRepl;

use eyre::{Context, Result};

use crate::api::create_client;
use crate::config::Config;
use crate::domain::TripForm;

/// Run the interactive REPL
///
/// This is the main entry point for `tp interactive`.
pub async fn run_interactive(config: &Config, initial_form: Option<TripForm>) -> Result<()> {
    let client = create_client(&config.service).context("Failed to create planner client")?;

    let mut session = PlannerRepl::new(client, config);
    session.run(initial_form).await
}
