//! The `adaptest profile` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_gateway::config::load_config_from;

use crate::view;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let tracker = config.tracker()?;
    view::print_profile(tracker.profile());
    Ok(())
}
