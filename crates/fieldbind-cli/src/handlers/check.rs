//! Scenario check command handler

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use crate::scenario::Scenario;
use tracing::{info, instrument, warn};

/// Handle the check command
///
/// Fails with [`Error::Invalid`] when the binder is not valid after the last
/// step, so scripts can gate on the exit code.
#[instrument(skip(config, output), fields(file = %args.scenario.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Checking scenario: {}", args.scenario.display()))?;

    let scenario = Scenario::load(&args.scenario)?;
    if scenario.steps.is_empty() {
        warn!("scenario has no steps");
        output.warning("Scenario has no steps; only the initial binding is checked")?;
    }
    let locale = scenario.resolve_locale(args.locale.as_deref(), config.locale.as_deref());

    let report = {
        let _timer = Timer::new("scenario_run");
        scenario.run(locale, args.snapshot)?
    };
    output.scenario_report(&report)?;

    if report.valid {
        info!(name = %report.name, "scenario ended valid");
        output.success("✓ Binding is valid")?;
        Ok(())
    } else {
        Err(Error::Invalid { count: 1 })
    }
}
