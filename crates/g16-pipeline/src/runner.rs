//! Config-driven entry point: the square circuit on the configured curve.

use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use g16_circuit::square_circuit;
use tracing::info;

use crate::artifact::ProofArtifact;
use crate::cancel::CancelToken;
use crate::config::{Curve, PipelineConfig};
use crate::error::RunError;
use crate::groth16::{CurveEngine, Groth16Backend};
use crate::lifecycle::{Lifecycle, RunReport};

pub struct PipelineOutput {
    pub report: RunReport,
    pub artifact: ProofArtifact,
}

pub fn run_pipeline(
    config: &PipelineConfig,
    cancel: &CancelToken,
) -> Result<PipelineOutput, RunError> {
    info!(curve = %config.curve, seeded = config.seed.is_some(), "starting groth16 run");
    match config.curve {
        Curve::Bn254 => run_on::<Bn254>(config, cancel),
        Curve::Bls12_381 => run_on::<Bls12_381>(config, cancel),
    }
}

fn run_on<E: CurveEngine>(
    config: &PipelineConfig,
    cancel: &CancelToken,
) -> Result<PipelineOutput, RunError> {
    let lifecycle = Lifecycle::new(Groth16Backend::<E>::new())
        .with_entropy(config.entropy())
        .with_cancel(cancel.clone());
    let run = lifecycle.run(square_circuit(), config.assignment.clone())?;
    let artifact =
        ProofArtifact::from_groth16::<E>(&run.verifying_key, &run.proof, &run.public_witness)?;
    Ok(PipelineOutput {
        report: run.report,
        artifact,
    })
}
