//! Only included in test

use crate::{
    process::{Invocation, Runner},
    Error,
};

type Hook = Box<dyn FnMut(&Invocation) -> Result<(), Error>>;

/// Stands in for the external tools: remembers what it was asked to run
/// and lets a test fake whatever the tool would have written.
pub(crate) struct RecordingRunner {
    pub(crate) invocations: Vec<Invocation>,
    hook: Hook,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::with_hook(|_| Ok(()))
    }

    pub(crate) fn with_hook(hook: impl FnMut(&Invocation) -> Result<(), Error> + 'static) -> Self {
        RecordingRunner {
            invocations: Vec::new(),
            hook: Box::new(hook),
        }
    }

    pub(crate) fn argvs(&self) -> Vec<Vec<String>> {
        self.invocations.iter().map(Invocation::argv).collect()
    }
}

impl Runner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error> {
        self.invocations.push(invocation.clone());
        (self.hook)(invocation)
    }
}
