use crate::log::PrepareLog;
use crate::prepare::{
    prepare_data, prepare_grains, prepare_minion, prepare_pillars, prepare_state_top,
    prepare_states,
};
use crate::CoreError;
use saltbox_sandbox::SandboxLayout;
use saltbox_schema::Configuration;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One independently runnable preparation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Data,
    Minion,
    StateTop,
    Pillars,
    Grains,
    States,
}

impl Step {
    /// Every step, in pipeline order.
    pub const ALL: [Step; 6] = [
        Step::Data,
        Step::Minion,
        Step::StateTop,
        Step::Pillars,
        Step::Grains,
        Step::States,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Data => "data",
            Step::Minion => "minion",
            Step::StateTop => "state_top",
            Step::Pillars => "pillars",
            Step::Grains => "grains",
            Step::States => "states",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Step {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownStep(s.to_owned()))
    }
}

/// Files written by each step of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareReport {
    pub data: usize,
    pub minion: usize,
    pub state_top: usize,
    pub pillars: usize,
    pub grains: usize,
    pub states: usize,
}

impl PrepareReport {
    pub fn total(&self) -> usize {
        self.data + self.minion + self.state_top + self.pillars + self.grains + self.states
    }

    fn record(&mut self, step: Step, written: usize) {
        let slot = match step {
            Step::Data => &mut self.data,
            Step::Minion => &mut self.minion,
            Step::StateTop => &mut self.state_top,
            Step::Pillars => &mut self.pillars,
            Step::Grains => &mut self.grains,
            Step::States => &mut self.states,
        };
        *slot = written;
    }
}

/// Run a single step. Returns the number of files it wrote.
pub fn run_step(
    step: Step,
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    match step {
        Step::Data => prepare_data(config, layout, log),
        Step::Minion => prepare_minion(config, layout, log),
        Step::StateTop => prepare_state_top(config, layout, log),
        Step::Pillars => prepare_pillars(config, layout, log),
        Step::Grains => prepare_grains(config, layout, log),
        Step::States => prepare_states(config, layout, log),
    }
}

/// Validate `config` and run every step in order.
///
/// The first error aborts the run; steps already completed keep their output.
/// Re-running with the same configuration reproduces the same tree.
pub fn prepare_sandbox(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<PrepareReport, CoreError> {
    config.validate()?;

    let mut report = PrepareReport::default();
    for step in Step::ALL {
        let written = run_step(step, config, layout, log)?;
        log.debug(&format!("step {step} wrote {written} file(s)"));
        report.record(step, written);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_parse_from_names() {
        assert_eq!("pillars".parse::<Step>().unwrap(), Step::Pillars);
        assert_eq!("state-top".parse::<Step>().unwrap(), Step::StateTop);
        assert_eq!("STATE_TOP".parse::<Step>().unwrap(), Step::StateTop);
        assert!(matches!(
            "deploy".parse::<Step>(),
            Err(CoreError::UnknownStep(_))
        ));
    }

    #[test]
    fn step_names_roundtrip() {
        for step in Step::ALL {
            assert_eq!(step.to_string().parse::<Step>().unwrap(), step);
        }
    }

    #[test]
    fn report_total_sums_steps() {
        let mut report = PrepareReport::default();
        report.record(Step::Minion, 1);
        report.record(Step::Pillars, 3);
        assert_eq!(report.total(), 4);
    }
}
