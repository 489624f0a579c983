//! Interactive planner session

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::api::PlannerClient;
use crate::config::Config;
use crate::domain::{FormError, TripForm};
use crate::render;
use crate::session::{ChatSession, ResultArea, Settled, TripController};

/// Interactive session: fill the form, read the plan, ask follow-up questions
pub struct PlannerRepl {
    client: Arc<dyn PlannerClient>,
    trips: TripController,
    chat: ChatSession,
    last_form: TripForm,
}

impl PlannerRepl {
    /// Create a new session
    pub fn new(client: Arc<dyn PlannerClient>, config: &Config) -> Self {
        Self {
            client,
            trips: TripController::new(config.form.options()),
            chat: ChatSession::new(config.chat.fallback_message.clone()),
            last_form: TripForm::default(),
        }
    }

    /// Submit a form, showing the loading indicator and then the result
    pub async fn submit(&mut self, form: &TripForm) -> std::result::Result<Settled, FormError> {
        debug!(destination = %form.destination, "PlannerRepl::submit: called");
        self.last_form = form.clone();
        let pending = self.trips.begin(form, &mut self.chat)?;
        render::print_loading();
        let outcome = self.client.plan_trip(&pending.request).await;
        let settled = self.trips.complete(pending, outcome, &mut self.chat);
        render::print_trip(&mut self.trips);
        Ok(settled)
    }

    /// Run the REPL, starting with the given form or a prompted one
    pub async fn run(&mut self, initial_form: Option<TripForm>) -> Result<()> {
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        let submitted = match initial_form {
            Some(form) => match self.submit(&form).await {
                Ok(_) => true,
                Err(e) => {
                    println!("{} {}", "Form error:".red(), e);
                    self.new_trip(&mut rl).await?
                }
            },
            None => self.new_trip(&mut rl).await?,
        };

        if submitted {
            self.chat_loop(&mut rl).await?;
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Run the REPL for a plan that was already submitted through `submit`
    pub async fn run_chat(&mut self) -> Result<()> {
        self.print_welcome();
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        self.chat_loop(&mut rl).await?;
        println!("Goodbye!");
        Ok(())
    }

    /// Main REPL loop: questions about the plan plus slash commands
    async fn chat_loop(&mut self, rl: &mut DefaultEditor) -> Result<()> {
        loop {
            let prompt = if self.chat.is_active() {
                format!("{} ", "ask>".bright_green())
            } else {
                format!("{} ", "tp>".bright_green())
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(input);

                    // Handle slash commands
                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                            SlashResult::NewTrip => {
                                self.new_trip(rl).await?;
                            }
                        }
                    } else {
                        self.ask(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }
        Ok(())
    }

    /// Prompt for a form until it submits; returns false if the user cancelled
    async fn new_trip(&mut self, rl: &mut DefaultEditor) -> Result<bool> {
        loop {
            let Some(form) = prompt_form(rl, &self.last_form)? else {
                debug!("new_trip: form cancelled");
                return Ok(false);
            };

            match self.submit(&form).await {
                Ok(_) => return Ok(true),
                Err(e) => {
                    println!("{} {}", "Form error:".red(), e);
                    self.last_form = form;
                }
            }
        }
    }

    /// Send a follow-up question and print the answer
    async fn ask(&mut self, question: &str) {
        if !self.chat.is_active() {
            println!(
                "{}",
                "No plan is displayed. Use /new to plan a trip first.".yellow()
            );
            return;
        }

        let before = self.chat.transcript().len();
        println!("{}", "Thinking...".dimmed());
        let appended = self.chat.send_message(question, self.client.as_ref()).await;
        debug!(appended, "ask: answer received");

        // Skip the echoed user turn; the user just typed it
        for turn in self.chat.transcript().iter().skip(before + 1) {
            println!();
            render::print_turn(turn);
        }
        println!();
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "Trip Planner".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/new" | "/n" => SlashResult::NewTrip,
            "/plan" | "/p" => {
                match self.trips.result() {
                    ResultArea::Plan { plan, .. } => println!("{}", render::markdown(plan)),
                    ResultArea::Error(error) => println!("{} {}", "Error:".red().bold(), error.red()),
                    ResultArea::Hidden => println!("{}", "No plan displayed.".dimmed()),
                }
                SlashResult::Continue
            }
            "/flights" | "/f" => {
                match self.trips.result() {
                    ResultArea::Plan {
                        flight_details: Some(flights),
                        ..
                    } => render::print_flights(flights),
                    _ => println!("{}", "No flight details for this plan.".dimmed()),
                }
                SlashResult::Continue
            }
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit", "/quit".yellow());
        println!("  {:14} Plan a new trip (clears the chat)", "/new".yellow());
        println!("  {:14} Show the current plan again", "/plan".yellow());
        println!("  {:14} Show flight details for the plan", "/flights".yellow());
        println!("  {:14} Show the chat transcript", "/history".yellow());
        println!();
        println!("Anything else is sent as a question about the current plan.");
        println!();
    }

    /// Print the chat transcript
    fn print_history(&self) {
        if self.chat.transcript().is_empty() {
            println!("{}", "No chat history.".dimmed());
            return;
        }

        println!();
        for turn in self.chat.transcript() {
            render::print_turn(turn);
            println!();
        }
    }
}

/// Prompt for every form field, pre-filled with the previous answers
///
/// Returns `None` when the user cancels with Ctrl+C or Ctrl+D.
fn prompt_form(rl: &mut DefaultEditor, previous: &TripForm) -> Result<Option<TripForm>> {
    println!("{}", "Plan a trip".bright_cyan().bold());

    let Some(source) = prompt_field(rl, "From", &previous.source)? else {
        return Ok(None);
    };
    let Some(destination) = prompt_field(rl, "To", &previous.destination)? else {
        return Ok(None);
    };
    let Some(start_date) = prompt_field(rl, "Start date (YYYY-MM-DD)", &previous.start_date)? else {
        return Ok(None);
    };
    let Some(end_date) = prompt_field(rl, "End date (YYYY-MM-DD)", &previous.end_date)? else {
        return Ok(None);
    };
    let Some(budget) = prompt_field(rl, "Budget", &previous.budget)? else {
        return Ok(None);
    };
    let Some(travelers) = prompt_field(rl, "Travelers", &previous.travelers)? else {
        return Ok(None);
    };
    let Some(interests) = prompt_field(rl, "Interests (comma separated)", &previous.interests)? else {
        return Ok(None);
    };
    let default_flights = if previous.include_flights { "y" } else { "n" };
    let Some(flights) = prompt_field(rl, "Include flights? (y/n)", default_flights)? else {
        return Ok(None);
    };

    Ok(Some(TripForm {
        source,
        destination,
        start_date,
        end_date,
        budget,
        travelers,
        interests,
        include_flights: is_yes(&flights),
    }))
}

fn prompt_field(rl: &mut DefaultEditor, label: &str, initial: &str) -> Result<Option<String>> {
    match rl.readline_with_initial(&format!("  {}: ", label.yellow()), (initial, "")) {
        Ok(value) => Ok(Some(value)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!();
            Ok(None)
        }
        Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "true" | "1")
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
    NewTrip,
}
