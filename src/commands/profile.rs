//! Command: switch to or list configuration profiles.
use anyhow::{Result, bail};

use super::{CommandSetup, Environment, finish};
use crate::cli::ProfileCommand;
use crate::config::profiles;
use crate::logging::{Logger, StepStatus};

/// Run a `profile` subcommand.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the profile is unknown,
/// or installing its files fails.
pub fn run(env: &Environment, command: &ProfileCommand, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(env, log)?;
    match command {
        ProfileCommand::List => {
            list(env, &setup, log);
            Ok(())
        }
        ProfileCommand::Switch { name } => switch(env, &setup, name, log),
    }
}

fn list(env: &Environment, setup: &CommandSetup, log: &Logger) {
    if setup.config.profiles.is_empty() {
        log.info(&format!("no profiles defined in {}", env.tilde(&setup.config.path)));
        return;
    }
    let current = profiles::read_current(&env.root);
    log.stage("Profiles");
    for (name, profile) in &setup.config.profiles {
        let marker = if current.as_deref() == Some(name.as_str()) { "*" } else { " " };
        log.info(&format!(
            "{marker} {name} ({} file(s), {} hook(s))",
            profile.files.len(),
            profile.hooks.len()
        ));
    }
}

fn report_hooks(phase: &str, commands: &[String], log: &Logger) {
    for command in commands {
        log.info(&format!("{phase} hook (not run): {command}"));
    }
}

fn switch(env: &Environment, setup: &CommandSetup, name: &str, log: &Logger) -> Result<()> {
    let Some(profile) = setup.config.profiles.get(name) else {
        let known: Vec<&str> = setup.config.profiles.keys().map(String::as_str).collect();
        if known.is_empty() {
            bail!("unknown profile '{name}': no profiles are defined");
        }
        bail!("unknown profile '{name}' (available: {})", known.join(", "));
    };
    let step = format!("Profile {name}");

    log.stage(&format!("Switching to profile {name}"));
    report_hooks("pre-install", &profile.hooks.pre_install, log);

    if env.options.dry_run {
        match setup.preview_mappings(&profile.files, env.options.verbose, log) {
            Ok(stats) => log.record_step(&step, StepStatus::DryRun, Some(&stats.summary(true))),
            Err(e) => {
                log.error(&format!("{step}: {e:#}"));
                log.record_step(&step, StepStatus::Failed, Some(&format!("{e:#}")));
            }
        }
        report_hooks("post-install", &profile.hooks.post_install, log);
        log.dry_run(&format!("would set current profile to {name}"));
        return finish(log);
    }

    if setup.config.settings.backup_existing {
        setup.backup_destinations(env, &profile.files, log);
    }
    setup.install_group(&step, &profile.files, log);
    report_hooks("post-install", &profile.hooks.post_install, log);

    if log.failure_count() == 0 {
        profiles::persist(&env.root, name)?;
        log.info(&format!("current profile: {name}"));
    }
    finish(log)
}
