//! Core logging types: step entries, status, and the [`Log`] trait.

/// Result of one step of a command, collected for the run summary.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// Human-readable step name (e.g. `files`, `backup`).
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Optional detail message (e.g. counts or an error description).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed and applied its changes.
    Ok,
    /// Step was skipped (nothing configured, or disabled by a flag).
    Skipped,
    /// Step ran in dry-run mode; no changes were applied.
    DryRun,
    /// Step encountered an error and could not complete.
    Failed,
}

/// Abstraction over logging backends.
///
/// Code that only emits messages can take `&dyn Log` instead of a
/// concrete [`Logger`](super::Logger).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>);
}
