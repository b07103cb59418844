// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Typed errors for each lifecycle stage and the run-level wrapper.

use std::fmt;

use ark_relations::r1cs::SynthesisError;
use g16_circuit::{CircuitDigest, CompileError, SatisfactionError, WitnessError};

use crate::artifact::ArtifactError;
use crate::lifecycle::Stage;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("backend rejected setup: {0}")]
    Backend(#[from] SynthesisError),
}

#[derive(Debug, thiserror::Error)]
pub enum ProveError {
    #[error("proving key was generated for constraint system {expected}, not {actual}")]
    KeyMismatch {
        expected: CircuitDigest,
        actual: CircuitDigest,
    },

    #[error("witness has {actual} values, circuit declares {expected}")]
    WitnessShape { expected: usize, actual: usize },

    #[error("witness does not satisfy `{assertion}`")]
    Unsatisfied { assertion: String },

    #[error("backend: {0}")]
    Backend(SynthesisError),
}

impl From<SatisfactionError> for ProveError {
    fn from(err: SatisfactionError) -> Self {
        match err {
            SatisfactionError::Shape { expected, actual } => Self::WitnessShape { expected, actual },
            SatisfactionError::Unsatisfied { assertion } => Self::Unsatisfied { assertion },
            SatisfactionError::Synthesis(e) => Self::Backend(e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("verifying key expects {expected} public inputs, got {actual}")]
    PublicInputCount { expected: usize, actual: usize },

    #[error("proof rejected")]
    Rejected,

    #[error("backend: {0}")]
    Backend(SynthesisError),
}

/// Terminal error of a run, tagged with the stage that produced it.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compile circuit: {0}")]
    Compile(#[from] CompileError),

    #[error("setup: {0}")]
    Setup(#[from] SetupError),

    #[error("new witness: {0}")]
    Witness(#[from] WitnessError),

    #[error("prove: {0}")]
    Prove(#[from] ProveError),

    #[error("verify: {0}")]
    Verify(#[from] VerifyError),

    #[error("cancelled before {0}")]
    Cancelled(Stage),

    #[error("run already terminated")]
    Terminated,

    #[error("export: {0}")]
    Export(#[from] ArtifactError),
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::Compile(CompileError::Circuit(_)) => ErrorKind::Circuit,
            RunError::Compile(_) => ErrorKind::Compile,
            RunError::Setup(_) => ErrorKind::Setup,
            RunError::Witness(_) => ErrorKind::Witness,
            RunError::Prove(_) => ErrorKind::Prove,
            RunError::Verify(_) => ErrorKind::Verify,
            RunError::Cancelled(_) => ErrorKind::Cancelled,
            RunError::Terminated | RunError::Export(_) => ErrorKind::Internal,
        }
    }

    /// Stage the error was raised in, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RunError::Compile(_) => Some(Stage::Compile),
            RunError::Setup(_) => Some(Stage::Setup),
            RunError::Witness(_) => Some(Stage::Witness),
            RunError::Prove(_) => Some(Stage::Prove),
            RunError::Verify(_) => Some(Stage::Verify),
            RunError::Cancelled(stage) => Some(*stage),
            RunError::Terminated | RunError::Export(_) => None,
        }
    }
}

/// Coarse failure category with stable integer codes for the C boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Circuit,
    Compile,
    Setup,
    Witness,
    Prove,
    Verify,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Circuit,
        ErrorKind::Compile,
        ErrorKind::Setup,
        ErrorKind::Witness,
        ErrorKind::Prove,
        ErrorKind::Verify,
        ErrorKind::Cancelled,
        ErrorKind::Internal,
    ];

    /// Never 0; 0 means "no error" across the C ABI
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::Circuit => 1,
            ErrorKind::Compile => 2,
            ErrorKind::Setup => 3,
            ErrorKind::Witness => 4,
            ErrorKind::Prove => 5,
            ErrorKind::Verify => 6,
            ErrorKind::Cancelled => 7,
            ErrorKind::Internal => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Circuit => "circuit",
            ErrorKind::Compile => "compile",
            ErrorKind::Setup => "setup",
            ErrorKind::Witness => "witness",
            ErrorKind::Prove => "prove",
            ErrorKind::Verify => "verify",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use g16_circuit::CircuitError;

    #[test]
    fn kind_codes_are_distinct_and_nonzero() {
        for kind in ErrorKind::ALL {
            assert_ne!(kind.code(), 0);
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ErrorKind::from_code(0), None);
    }

    #[test]
    fn circuit_errors_keep_their_own_kind() {
        let err = RunError::from(CompileError::Circuit(CircuitError::UnsupportedOperation(
            "division",
        )));
        assert_eq!(err.kind(), ErrorKind::Circuit);
        assert_eq!(err.stage(), Some(Stage::Compile));
        assert_eq!(
            err.to_string(),
            "compile circuit: operation `division` cannot be expressed as rank-1 constraints"
        );
    }

    #[test]
    fn prove_errors_carry_stage_context() {
        let err = RunError::from(ProveError::from(SatisfactionError::Unsatisfied {
            assertion: "X * X == Y".into(),
        }));
        assert_eq!(err.kind(), ErrorKind::Prove);
        assert_eq!(err.to_string(), "prove: witness does not satisfy `X * X == Y`");
    }

    #[test]
    fn terminated_is_internal() {
        assert_eq!(RunError::Terminated.kind(), ErrorKind::Internal);
        assert_eq!(RunError::Terminated.stage(), None);
    }
}
