//! Command: back up existing destinations and copy every mapping into place.
use anyhow::Result;

use super::{BatchStats, CommandSetup, Environment, finish, install_groups, version};
use crate::cli::UpdateOpts;
use crate::logging::{Logger, StepStatus};
use crate::prompt::Prompt;

const BACKUP_STEP: &str = "Backup";

/// Run the update command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the confirmation cannot
/// be read, or any category fails to install.
pub fn run(env: &Environment, opts: &UpdateOpts, prompt: &dyn Prompt, log: &Logger) -> Result<()> {
    log.info(&format!("dotfiles-sync {}", version::version()));
    let setup = CommandSetup::init(env, log)?;

    if env.options.dry_run {
        return preview(&setup, env, opts, log);
    }

    if opts.interactive {
        let stats = setup.preview_all(env.options.verbose, log)?;
        if stats.copied == 0 {
            return Ok(());
        }
        if !prompt.confirm(&format!("Apply {} change(s)?", stats.copied))? {
            log.info("update cancelled");
            return Ok(());
        }
    }

    let groups = setup.config.groups();
    match backup_skip_reason(&setup, opts) {
        Some(reason) => {
            log.debug(&format!("backup skipped: {reason}"));
            log.record_step(BACKUP_STEP, StepStatus::Skipped, Some(reason));
        }
        None => setup.backup_destinations(env, groups.iter().flat_map(|(_, m)| m.iter()), log),
    }

    install_groups(&setup, &groups, log);
    finish(log)
}

fn backup_skip_reason(setup: &CommandSetup, opts: &UpdateOpts) -> Option<&'static str> {
    if opts.no_backup {
        Some("--no-backup")
    } else if !setup.config.settings.backup_existing {
        Some("disabled in settings")
    } else {
        None
    }
}

/// Dry run: show every change and what would be backed up, write nothing.
fn preview(setup: &CommandSetup, env: &Environment, opts: &UpdateOpts, log: &Logger) -> Result<()> {
    log.dry_run("previewing update, no files will be written");

    let mut total = BatchStats::default();
    for (category, mappings) in setup.config.groups() {
        if mappings.is_empty() {
            continue;
        }
        let name = category.label();
        log.stage(name);
        match setup.preview_mappings(mappings, env.options.verbose, log) {
            Ok(stats) => {
                log.record_step(name, StepStatus::DryRun, Some(&stats.summary(true)));
                total += stats;
            }
            Err(e) => {
                log.error(&format!("{name}: {e:#}"));
                log.record_step(name, StepStatus::Failed, Some(&format!("{e:#}")));
            }
        }
    }
    if total.copied == 0 {
        log.info("No changes needed - everything is up to date");
    }

    if backup_skip_reason(setup, opts).is_none() {
        let all = setup.config.groups();
        let paths = setup.existing_destinations(all.iter().flat_map(|(_, m)| m.iter()));
        if !paths.is_empty() {
            log.dry_run(&format!("would back up {} existing path(s)", paths.len()));
            for path in &paths {
                log.debug(&format!("  {}", env.tilde(path)));
            }
        }
    }

    finish(log)
}
