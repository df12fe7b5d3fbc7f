//! The `adaptest check` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use adaptest_core::driver::fetch_question;
use adaptest_core::traits::FetchRequest;
use adaptest_gateway::config::load_config_from;
use adaptest_gateway::create_gateway;

use crate::view::{self, ConsoleObserver};

pub async fn execute(config_path: Option<PathBuf>, gateway_url: Option<String>) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(url) = gateway_url {
        config.gateway.base_url = url;
    }

    let gateway = create_gateway(&config.gateway)?;
    let question = fetch_question(
        &gateway,
        &FetchRequest::Start,
        &config.retry_policy(),
        &ConsoleObserver,
    )
    .await
    .with_context(|| format!("question service check failed for {}", gateway.base_url()))?;

    view::print_question(&question, 1, 1);
    println!();
    println!("Answer: {}", question.correct_option);
    println!("Question service OK at {}", gateway.base_url());
    Ok(())
}
