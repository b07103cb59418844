use anyhow::Result;
use ark_ff::PrimeField;
use g16_circuit::{compile, square_circuit};
use g16_pipeline::{Curve, PipelineConfig};

use crate::output;

fn show<F: PrimeField>(curve: Curve) -> Result<()> {
    let compiled = compile::<F>(&square_circuit())?;
    let shape = compiled.shape();

    if output::is_json() {
        output::json_output(serde_json::json!({
            "circuit": compiled.circuit().name(),
            "curve": curve.as_str(),
            "constraints": compiled.num_constraints(),
            "public_inputs": compiled.num_public_inputs(),
            "witness_variables": shape.num_witness_variables,
            "digest": compiled.digest().to_string(),
        }));
    } else {
        output::label("circuit", compiled.circuit().name());
        for assertion in compiled.circuit().assertions() {
            output::info(&format!("  assert {assertion}"));
        }
        output::label("curve", curve.as_str());
        output::label("constraints", &compiled.num_constraints().to_string());
        output::label("public inputs", &compiled.num_public_inputs().to_string());
        output::label("witness variables", &shape.num_witness_variables.to_string());
        output::label("digest", &compiled.digest().to_string());
    }
    Ok(())
}

pub fn run(curve: Option<Curve>) -> Result<()> {
    let curve = match curve {
        Some(curve) => curve,
        None => PipelineConfig::load()?.curve,
    };
    match curve {
        Curve::Bn254 => show::<ark_bn254::Fr>(curve),
        Curve::Bls12_381 => show::<ark_bls12_381::Fr>(curve),
    }
}
