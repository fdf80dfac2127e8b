//! Command: show what an update would change.
use anyhow::Result;

use super::{CommandSetup, Environment};
use crate::logging::Logger;

/// Run the diff command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or a mapping cannot be
/// resolved or compared.
pub fn run(env: &Environment, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(env, log)?;
    let stats = setup.preview_all(env.options.verbose, log)?;
    log.info(&stats.summary(true));
    Ok(())
}
