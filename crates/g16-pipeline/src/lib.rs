// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! # g16-pipeline
//!
//! Drives a circuit through compile → setup → witness → prove → verify
//! against a pluggable proving backend.
//!
//! ## Crate layout
//!
//! | Module | Purpose |
//! |---|---|
//! | [`backend`] | `ProvingBackend` trait |
//! | [`groth16`] | arkworks Groth16 over BN254 / BLS12-381 |
//! | [`mock`] | Hash-commitment backend for tests |
//! | [`lifecycle`] | `Lifecycle` / `ProofRun` state machine |
//! | [`runner`] | Config-driven run of the square circuit |
//! | [`artifact`] | JSON proof bundles |
//! | [`config`] | `~/.g16/config.json` + env overrides |
//! | [`error`] | Stage errors, `RunError`, `ErrorKind` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use ark_bn254::Bn254;
//! use g16_circuit::{square_assignment, square_circuit};
//! use g16_pipeline::{Groth16Backend, Lifecycle};
//!
//! # fn example() -> Result<(), g16_pipeline::RunError> {
//! let lifecycle = Lifecycle::new(Groth16Backend::<Bn254>::new());
//! let run = lifecycle.run(square_circuit(), square_assignment(3, 9))?;
//! println!("{} constraints", run.report.num_constraints);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod backend;
pub mod cancel;
pub mod config;
pub mod error;
pub mod groth16;
pub mod lifecycle;
pub mod mock;
pub mod runner;

pub use artifact::{ArtifactError, ProofArtifact};
pub use backend::ProvingBackend;
pub use cancel::CancelToken;
pub use config::{config_path, ConfigError, Curve, Entropy, PipelineConfig};
pub use error::{ErrorKind, ProveError, RunError, SetupError, VerifyError};
pub use groth16::{CurveEngine, Groth16Backend, Groth16ProvingKey, Groth16VerifyingKey};
pub use lifecycle::{CompletedRun, Lifecycle, ProofRun, RunReport, Stage, StageTiming};
pub use mock::MockBackend;
pub use runner::{run_pipeline, PipelineOutput};
