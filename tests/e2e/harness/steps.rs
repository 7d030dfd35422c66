use std::time::Duration;

use super::assertions::Assertion;

/// What a command step expects from the interpreter
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Accept any outcome
    Any,
    /// Command must succeed
    Success,
    /// Command must fail, optionally with this exact first line
    Failure(Option<String>),
}

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Repository setup
    LoadSample {
        name: String,
    },
    LoadSampleFile {
        path: String,
    },
    Reset,

    // Learner input
    Command {
        line: String,
        expect: Expectation,
    },
    Script {
        text: String,
    },

    // Time control
    Wait {
        duration: Duration,
    },

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
