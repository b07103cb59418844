// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Five-stage proof lifecycle.
//!
//! A [`ProofRun`] moves strictly forward:
//!
//! ```text
//! Pending -> Compiled -> KeysReady -> WitnessReady -> Proved -> Verified
//! ```
//!
//! Each [`ProofRun::step`] executes exactly one stage. The first failure is
//! the run's only error; afterwards, and after completion, every further
//! step returns [`RunError::Terminated`]. The cancel token is checked before
//! each stage.

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use g16_circuit::{derive_witness, Assignment, Circuit, CompiledCircuit, PublicWitness, Witness};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::backend::ProvingBackend;
use crate::cancel::CancelToken;
use crate::config::Entropy;
use crate::error::RunError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Compile,
    Setup,
    Witness,
    Prove,
    Verify,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Compile,
        Stage::Setup,
        Stage::Witness,
        Stage::Prove,
        Stage::Verify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Setup => "setup",
            Stage::Witness => "witness",
            Stage::Prove => "prove",
            Stage::Verify => "verify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Field<B> = <B as ProvingBackend>::Field;

#[derive(Clone, Debug, Serialize)]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_us: u64,
}

impl StageTiming {
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us)
    }
}

/// Summary of a successful run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub backend: String,
    pub circuit: String,
    pub digest: String,
    pub num_constraints: usize,
    pub public_inputs: Vec<String>,
    pub timings: Vec<StageTiming>,
}

impl RunReport {
    pub fn total(&self) -> Duration {
        self.timings.iter().map(StageTiming::elapsed).sum()
    }
}

pub struct CompletedRun<B: ProvingBackend> {
    pub report: RunReport,
    pub compiled: Arc<CompiledCircuit<Field<B>>>,
    pub verifying_key: Arc<B::VerifyingKey>,
    pub proof: B::Proof,
    pub public_witness: PublicWitness<Field<B>>,
}

/// A backend plus the run-wide policies (entropy source, cancellation).
pub struct Lifecycle<B: ProvingBackend> {
    backend: B,
    entropy: Entropy,
    cancel: CancelToken,
}

impl<B: ProvingBackend> Lifecycle<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            entropy: Entropy::Os,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_entropy(mut self, entropy: Entropy) -> Self {
        self.entropy = entropy;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn start(&self, circuit: Circuit, assignment: Assignment) -> ProofRun<'_, B> {
        ProofRun {
            lifecycle: self,
            circuit,
            assignment,
            state: State::Pending,
            timings: Vec::with_capacity(Stage::ALL.len()),
        }
    }

    /// Drive all five stages.
    pub fn run(&self, circuit: Circuit, assignment: Assignment) -> Result<CompletedRun<B>, RunError> {
        self.start(circuit, assignment).finish()
    }
}

enum State<B: ProvingBackend> {
    Pending,
    Compiled {
        compiled: Arc<CompiledCircuit<Field<B>>>,
    },
    KeysReady {
        compiled: Arc<CompiledCircuit<Field<B>>>,
        pk: Arc<B::ProvingKey>,
        vk: Arc<B::VerifyingKey>,
    },
    WitnessReady {
        compiled: Arc<CompiledCircuit<Field<B>>>,
        pk: Arc<B::ProvingKey>,
        vk: Arc<B::VerifyingKey>,
        witness: Witness<Field<B>>,
    },
    Proved {
        compiled: Arc<CompiledCircuit<Field<B>>>,
        vk: Arc<B::VerifyingKey>,
        proof: B::Proof,
        public: PublicWitness<Field<B>>,
    },
    Verified {
        compiled: Arc<CompiledCircuit<Field<B>>>,
        vk: Arc<B::VerifyingKey>,
        proof: B::Proof,
        public: PublicWitness<Field<B>>,
    },
    Terminated,
}

impl<B: ProvingBackend> State<B> {
    fn next_stage(&self) -> Option<Stage> {
        match self {
            State::Pending => Some(Stage::Compile),
            State::Compiled { .. } => Some(Stage::Setup),
            State::KeysReady { .. } => Some(Stage::Witness),
            State::WitnessReady { .. } => Some(Stage::Prove),
            State::Proved { .. } => Some(Stage::Verify),
            State::Verified { .. } | State::Terminated => None,
        }
    }
}

/// One pass through the lifecycle. Not reentrant: `step` takes `&mut self`.
pub struct ProofRun<'a, B: ProvingBackend> {
    lifecycle: &'a Lifecycle<B>,
    circuit: Circuit,
    assignment: Assignment,
    state: State<B>,
    timings: Vec<StageTiming>,
}

impl<B: ProvingBackend> ProofRun<'_, B> {
    /// Stage the next `step` will execute, `None` once terminated or verified.
    pub fn next_stage(&self) -> Option<Stage> {
        self.state.next_stage()
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.state, State::Verified { .. })
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, State::Terminated)
    }

    /// Execute the next stage and return it.
    pub fn step(&mut self) -> Result<Stage, RunError> {
        let Some(stage) = self.state.next_stage() else {
            self.state = State::Terminated;
            return Err(RunError::Terminated);
        };
        if self.lifecycle.cancel.is_cancelled() {
            self.state = State::Terminated;
            info!(%stage, "run cancelled");
            return Err(RunError::Cancelled(stage));
        }

        let span = info_span!("stage", %stage, backend = self.lifecycle.backend.name());
        let _enter = span.enter();
        let started = Instant::now();

        let state = mem::replace(&mut self.state, State::Terminated);
        self.state = self.advance(state)?;

        let elapsed = started.elapsed();
        debug!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "stage complete");
        self.timings.push(StageTiming {
            stage,
            elapsed_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        });
        Ok(stage)
    }

    /// Run the remaining stages and hand back the verified result.
    pub fn finish(mut self) -> Result<CompletedRun<B>, RunError> {
        while self.state.next_stage().is_some() {
            self.step()?;
        }
        match mem::replace(&mut self.state, State::Terminated) {
            State::Verified {
                compiled,
                vk,
                proof,
                public,
            } => {
                let report = RunReport {
                    backend: self.lifecycle.backend.name().to_string(),
                    circuit: compiled.circuit().name().to_string(),
                    digest: compiled.digest().to_string(),
                    num_constraints: compiled.num_constraints(),
                    public_inputs: public.to_decimal(),
                    timings: mem::take(&mut self.timings),
                };
                Ok(CompletedRun {
                    report,
                    compiled,
                    verifying_key: vk,
                    proof,
                    public_witness: public,
                })
            }
            _ => Err(RunError::Terminated),
        }
    }

    fn advance(&self, state: State<B>) -> Result<State<B>, RunError> {
        let backend = &self.lifecycle.backend;
        Ok(match state {
            State::Pending => {
                let compiled = backend.compile(&self.circuit)?;
                info!(
                    circuit = compiled.circuit().name(),
                    constraints = compiled.num_constraints(),
                    public_inputs = compiled.num_public_inputs(),
                    digest = %compiled.digest(),
                    "circuit compiled"
                );
                State::Compiled {
                    compiled: Arc::new(compiled),
                }
            }
            State::Compiled { compiled } => {
                // toxic waste lives only inside this block
                let (pk, vk) = {
                    let mut rng = self.lifecycle.entropy.rng(Stage::Setup);
                    backend.setup(&compiled, &mut rng)?
                };
                info!("keys generated");
                State::KeysReady {
                    compiled,
                    pk: Arc::new(pk),
                    vk: Arc::new(vk),
                }
            }
            State::KeysReady { compiled, pk, vk } => {
                let witness = derive_witness(compiled.circuit(), &self.assignment)?;
                debug!(values = witness.len(), public = witness.public().len(), "witness derived");
                State::WitnessReady {
                    compiled,
                    pk,
                    vk,
                    witness,
                }
            }
            State::WitnessReady {
                compiled,
                pk,
                vk,
                witness,
            } => {
                let proof = {
                    let mut rng = self.lifecycle.entropy.rng(Stage::Prove);
                    backend.prove(&compiled, &pk, &witness, &mut rng)?
                };
                info!("proof generated");
                State::Proved {
                    compiled,
                    vk,
                    proof,
                    public: witness.public().clone(),
                }
            }
            State::Proved {
                compiled,
                vk,
                proof,
                public,
            } => {
                backend.verify(&vk, &proof, &public)?;
                info!(public_inputs = ?public.to_decimal(), "proof verified");
                State::Verified {
                    compiled,
                    vk,
                    proof,
                    public,
                }
            }
            State::Verified { .. } | State::Terminated => return Err(RunError::Terminated),
        })
    }
}
