//! How long each step of a build took.

use std::{
    fmt::{self, Display},
    time::{Duration, Instant},
};

/// A unit of the pipeline, named for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Venv,
    Convert(String),
    Build(String),
    Publish,
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Venv => f.write_str("venv"),
            Step::Convert(style) => write!(f, "convert {style}"),
            Step::Build(style) => write!(f, "build {style}"),
            Step::Publish => f.write_str("publish"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepTime {
    pub step: Step,
    /// Since the timer was created
    pub started: Duration,
    pub elapsed: Duration,
}

/// Times steps that run one after another.
#[derive(Debug)]
pub struct StepTimer {
    /// The beginning of time
    t0: Instant,
    steps: Vec<StepTime>,
}

impl Default for StepTimer {
    fn default() -> Self {
        Self {
            t0: Instant::now(),
            steps: Default::default(),
        }
    }
}

impl StepTimer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Run `f`, recording how long it took whether or not it succeeded
    pub fn time<T, E>(&mut self, step: Step, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        log::debug!("{step} took {:.0}ms", elapsed.as_secs_f64() * 1000.0);
        self.steps.push(StepTime {
            step,
            started: start - self.t0,
            elapsed,
        });
        result
    }

    pub fn steps(&self) -> &[StepTime] {
        &self.steps
    }

    pub fn total(&self) -> Duration {
        self.t0.elapsed()
    }

    /// One line per step, slowest first
    pub fn summary(&self) -> Vec<String> {
        let mut steps: Vec<_> = self.steps.iter().collect();
        steps.sort_by(|a, b| b.elapsed.cmp(&a.elapsed));
        steps
            .into_iter()
            .map(|s| format!("{:>8.2}s {}", s.elapsed.as_secs_f64(), s.step))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_failures_too() {
        let mut timer = StepTimer::new();
        let ok: Result<u32, String> = timer.time(Step::Venv, || Ok(1));
        let err: Result<u32, String> =
            timer.time(Step::Build("Bold".to_string()), || Err("nope".to_string()));
        assert_eq!(Ok(1), ok);
        assert_eq!(Err("nope".to_string()), err);
        assert_eq!(
            vec![Step::Venv, Step::Build("Bold".to_string())],
            timer
                .steps()
                .iter()
                .map(|s| s.step.clone())
                .collect::<Vec<_>>()
        );
        assert!(timer.steps()[1].started >= timer.steps()[0].started);
    }

    #[test]
    fn summary_slowest_first() {
        let mut timer = StepTimer::new();
        timer
            .time(Step::Publish, || Ok::<_, ()>(()))
            .unwrap();
        timer
            .time(Step::Convert("Regular".to_string()), || {
                std::thread::sleep(Duration::from_millis(20));
                Ok::<_, ()>(())
            })
            .unwrap();
        let summary = timer.summary();
        assert_eq!(2, summary.len());
        assert!(summary[0].ends_with("convert Regular"), "{summary:?}");
        assert!(summary[1].ends_with("publish"), "{summary:?}");
    }
}
