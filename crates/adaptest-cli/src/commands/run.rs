//! The `adaptest run` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use adaptest_core::driver::{resolve, RetryPolicy};
use adaptest_core::model::{OptionLabel, Phase, QuestionId};
use adaptest_core::session::{Advance, FetchTicket, SessionController};
use adaptest_core::traits::QuestionGateway;
use adaptest_core::SessionError;
use adaptest_gateway::config::load_config_from;
use adaptest_gateway::create_gateway;

use crate::view::{self, ConsoleObserver};

/// How the results screen is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

pub async fn execute(
    config_path: Option<PathBuf>,
    gateway_url: Option<String>,
    length: Option<u32>,
    format: String,
) -> Result<()> {
    let format = match format.as_str() {
        "text" => ReportFormat::Text,
        "json" => ReportFormat::Json,
        other => anyhow::bail!("unknown format '{other}', expected text or json"),
    };

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(url) = gateway_url {
        config.gateway.base_url = url;
    }
    if let Some(length) = length {
        config.session.length = length;
    }

    let gateway = create_gateway(&config.gateway)?;
    let mut controller = SessionController::new(config.session_config()?, config.tracker()?);
    let policy = config.retry_policy();

    tracing::debug!(base_url = %gateway.base_url(), "using question service");

    let stdin = std::io::stdin();
    let mut input = Prompt::new(stdin.lock());
    session_loop(&mut controller, &gateway, &policy, &mut input, format).await
}

/// Line-oriented user input.
struct Prompt<R> {
    lines: std::io::Lines<R>,
}

impl<R: BufRead> Prompt<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Show `hint` and read one trimmed line; `None` on end of input.
    fn ask(&mut self, hint: &str) -> Result<Option<String>> {
        print!("{hint} > ");
        std::io::stdout().flush()?;
        match self.lines.next() {
            Some(line) => Ok(Some(line.context("failed to read input")?.trim().to_string())),
            None => {
                println!();
                Ok(None)
            }
        }
    }
}

async fn session_loop<R: BufRead>(
    controller: &mut SessionController,
    gateway: &dyn QuestionGateway,
    policy: &RetryPolicy,
    input: &mut Prompt<R>,
    format: ReportFormat,
) -> Result<()> {
    let mut ticket: Option<FetchTicket> = None;
    let mut shown: Option<QuestionId> = None;
    let mut dashboard_shown = false;

    loop {
        match controller.phase() {
            Phase::Dashboard => {
                if !dashboard_shown {
                    println!();
                    view::print_profile(controller.profile());
                    dashboard_shown = true;
                }
                let Some(line) = input.ask("[s]tart session, [q]uit")? else {
                    break;
                };
                match line.to_lowercase().as_str() {
                    "s" | "start" => ticket = Some(controller.start_session()),
                    "q" | "quit" => break,
                    other => println!("Unknown command: {other}"),
                }
            }

            Phase::Loading => {
                if controller.last_error().is_none() {
                    let pending = ticket
                        .take()
                        .context("loading without an outstanding question request")?;
                    resolve(controller, gateway, &pending, policy, &ConsoleObserver).await;
                    continue;
                }

                if let Some(error) = controller.last_error() {
                    println!("Could not load the next question: {error}");
                }
                let Some(line) = input.ask("[r]etry, [d]ashboard, [q]uit")? else {
                    break;
                };
                match line.to_lowercase().as_str() {
                    "r" | "retry" => ticket = Some(controller.retry_fetch()?),
                    "d" | "dashboard" => {
                        controller.return_to_dashboard();
                        dashboard_shown = false;
                    }
                    "q" | "quit" => break,
                    other => println!("Unknown command: {other}"),
                }
            }

            Phase::Active => {
                let Some(session) = controller.session() else {
                    anyhow::bail!("active phase without a session");
                };
                if let Some(question) = session.current_question() {
                    if shown != Some(question.id) {
                        view::print_question(
                            question,
                            session.questions_answered() + 1,
                            controller.config().session_length(),
                        );
                        shown = Some(question.id);
                    }
                }

                let Some(line) =
                    input.ask("Choose A-D, [n]ext to submit, [m]enu to abandon")?
                else {
                    break;
                };
                match line.to_lowercase().as_str() {
                    "n" | "next" => match controller.advance() {
                        Ok(Advance::Fetch(next)) => ticket = Some(next),
                        Ok(Advance::Completed(report)) => match format {
                            ReportFormat::Text => view::print_report(&report),
                            ReportFormat::Json => println!("{}", report.to_json_pretty()?),
                        },
                        Err(SessionError::NoSelection) => {
                            println!("Select an option before submitting.")
                        }
                        Err(e) => return Err(e.into()),
                    },
                    "m" | "menu" => {
                        controller.return_to_dashboard();
                        dashboard_shown = false;
                    }
                    other => match other.parse::<OptionLabel>() {
                        Ok(label) => {
                            controller.select_option(label)?;
                            println!("Selected {label}");
                        }
                        Err(_) => println!("Unknown choice: {other}"),
                    },
                }
            }

            Phase::Results => {
                let Some(line) = input.ask("[d]ashboard, [q]uit")? else {
                    break;
                };
                match line.to_lowercase().as_str() {
                    "d" | "dashboard" => {
                        controller.return_to_dashboard();
                        dashboard_shown = false;
                    }
                    "q" | "quit" => break,
                    other => println!("Unknown command: {other}"),
                }
            }
        }
    }

    Ok(())
}
