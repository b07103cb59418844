//! Circuit → R1CS compilation over a chosen prime field.
//!
//! Compilation validates the circuit, synthesizes it in setup mode, and
//! keeps the resulting matrices together with a SHA-256 digest of their
//! structure. Compiling the same circuit over the same field always yields an
//! equal shape and digest.

use std::fmt;

use ark_ff::PrimeField;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, OptimizationGoal, SynthesisError, SynthesisMode,
};
use ark_serialize::{CanonicalSerialize, SerializationError};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::definition::{Circuit, CircuitError};
use crate::synth::Synthesizer;
use crate::witness::Witness;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error("constraint synthesis failed: {0}")]
    Synthesis(SynthesisError),

    #[error("constraint matrices unavailable after synthesis")]
    Matrices,

    #[error("cannot digest constraint matrices: {0}")]
    Digest(#[from] SerializationError),
}

#[derive(Debug, Error)]
pub enum SatisfactionError {
    #[error("witness has {actual} values, circuit declares {expected}")]
    Shape { expected: usize, actual: usize },

    #[error("witness violates `{assertion}`")]
    Unsatisfied { assertion: String },

    #[error("witness synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

/// Sparse matrix rows as produced by arkworks: `(coefficient, variable index)`.
pub type SparseRows<F> = Vec<Vec<(F, usize)>>;

/// Structure of a compiled constraint system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1csShape<F: PrimeField> {
    /// Includes the constant-one variable
    pub num_instance_variables: usize,
    pub num_witness_variables: usize,
    pub num_constraints: usize,
    pub a: SparseRows<F>,
    pub b: SparseRows<F>,
    pub c: SparseRows<F>,
}

impl<F: PrimeField> R1csShape<F> {
    fn digest(&self) -> Result<CircuitDigest, SerializationError> {
        let mut hasher = Sha256::new();
        hasher.update(b"g16-r1cs-shape");
        for count in [
            self.num_instance_variables,
            self.num_witness_variables,
            self.num_constraints,
        ] {
            hasher.update((count as u64).to_le_bytes());
        }

        let mut buf = Vec::new();
        for matrix in [&self.a, &self.b, &self.c] {
            for row in matrix {
                hasher.update((row.len() as u64).to_le_bytes());
                for (coeff, index) in row {
                    buf.clear();
                    coeff.serialize_compressed(&mut buf)?;
                    hasher.update(&buf);
                    hasher.update((*index as u64).to_le_bytes());
                }
            }
        }
        Ok(CircuitDigest(hasher.finalize().into()))
    }
}

/// Identity of a compiled constraint system; keys carry the digest of the
/// system they were generated for.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CircuitDigest([u8; 32]);

impl CircuitDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CircuitDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for CircuitDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CircuitDigest({self})")
    }
}

#[derive(Clone, Debug)]
pub struct CompiledCircuit<F: PrimeField> {
    circuit: Circuit,
    shape: R1csShape<F>,
    digest: CircuitDigest,
}

impl<F: PrimeField> CompiledCircuit<F> {
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn shape(&self) -> &R1csShape<F> {
        &self.shape
    }

    pub fn digest(&self) -> CircuitDigest {
        self.digest
    }

    pub fn num_constraints(&self) -> usize {
        self.shape.num_constraints
    }

    /// Public inputs expected by verification (excludes the constant one)
    pub fn num_public_inputs(&self) -> usize {
        self.shape.num_instance_variables.saturating_sub(1)
    }

    /// Synthesize with concrete values and check every constraint.
    pub fn check_witness(&self, witness: &Witness<F>) -> Result<(), SatisfactionError> {
        let expected = self.circuit.variables().len();
        if witness.len() != expected {
            return Err(SatisfactionError::Shape {
                expected,
                actual: witness.len(),
            });
        }

        let cs = ConstraintSystem::<F>::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        Synthesizer::for_proving(&self.circuit, witness).generate_constraints(cs.clone())?;
        if cs.is_satisfied()? {
            return Ok(());
        }

        let lookup = |name: &str| {
            self.circuit
                .position(name)
                .and_then(|i| witness.full().get(i).copied())
        };
        let assertion = self
            .circuit
            .assertions()
            .iter()
            .find(|a| !a.holds(&lookup))
            .map(ToString::to_string)
            .unwrap_or_else(|| self.circuit.name().to_string());
        Err(SatisfactionError::Unsatisfied { assertion })
    }
}

/// Compile `circuit` over the field `F`.
pub fn compile<F: PrimeField>(circuit: &Circuit) -> Result<CompiledCircuit<F>, CompileError> {
    circuit.validate()?;

    let cs = ConstraintSystem::<F>::new_ref();
    cs.set_optimization_goal(OptimizationGoal::Constraints);
    cs.set_mode(SynthesisMode::Setup);
    Synthesizer::<F>::for_setup(circuit)
        .generate_constraints(cs.clone())
        .map_err(CompileError::Synthesis)?;
    cs.finalize();

    let matrices = cs.to_matrices().ok_or(CompileError::Matrices)?;
    let shape = R1csShape {
        num_instance_variables: matrices.num_instance_variables,
        num_witness_variables: matrices.num_witness_variables,
        num_constraints: matrices.num_constraints,
        a: matrices.a,
        b: matrices.b,
        c: matrices.c,
    };
    let digest = shape.digest()?;

    Ok(CompiledCircuit {
        circuit: circuit.clone(),
        shape,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Expr;
    use crate::square::{square_assignment, square_circuit};
    use crate::witness::derive_witness;
    use ark_bls12_381::Fr as BlsFr;
    use ark_bn254::Fr;

    #[test]
    fn compile_is_deterministic() {
        let first = compile::<Fr>(&square_circuit()).unwrap();
        let second = compile::<Fr>(&square_circuit()).unwrap();
        assert_eq!(first.shape(), second.shape());
        assert_eq!(first.digest(), second.digest());
    }

    #[test]
    fn square_shape() {
        let compiled = compile::<Fr>(&square_circuit()).unwrap();
        assert_eq!(compiled.num_public_inputs(), 2);
        assert_eq!(compiled.num_constraints(), 2);
        assert_eq!(compiled.shape().num_witness_variables, 1);
        assert_eq!(compiled.shape().a.len(), compiled.num_constraints());
    }

    #[test]
    fn digest_distinguishes_circuits() {
        let cube = Circuit::builder("cube")
            .public("X")
            .public("Y")
            .assert_eq(Expr::var("X") * Expr::var("X") * Expr::var("X"), Expr::var("Y"))
            .build();
        let square = compile::<Fr>(&square_circuit()).unwrap();
        let cube = compile::<Fr>(&cube).unwrap();
        assert_ne!(square.digest(), cube.digest());
    }

    #[test]
    fn digest_does_not_depend_on_circuit_name() {
        let renamed = Circuit::builder("renamed")
            .public("X")
            .public("Y")
            .assert_eq(Expr::var("X") * Expr::var("X"), Expr::var("Y"))
            .build();
        let a = compile::<Fr>(&square_circuit()).unwrap();
        let b = compile::<Fr>(&renamed).unwrap();
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn same_circuit_different_field_same_structure() {
        let bn = compile::<Fr>(&square_circuit()).unwrap();
        let bls = compile::<BlsFr>(&square_circuit()).unwrap();
        assert_eq!(bn.num_constraints(), bls.num_constraints());
        assert_eq!(bn.num_public_inputs(), bls.num_public_inputs());
    }

    #[test]
    fn unsupported_circuit_fails_compile() {
        let circuit = Circuit::builder("ratio")
            .public("X")
            .public("Y")
            .assert_eq(Expr::var("Y") / Expr::var("X"), Expr::var("X"))
            .build();
        let err = compile::<Fr>(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Circuit(CircuitError::UnsupportedOperation("division"))
        ));
    }

    #[test]
    fn contradictory_constants_fail_synthesis() {
        let circuit = Circuit::builder("never")
            .public("X")
            .assert_eq(Expr::constant(2), Expr::constant(3))
            .build();
        let err = compile::<Fr>(&circuit).unwrap_err();
        assert!(matches!(err, CompileError::Synthesis(SynthesisError::Unsatisfiable)));
    }

    #[test]
    fn check_witness_names_the_violated_assertion() {
        let compiled = compile::<Fr>(&square_circuit()).unwrap();
        let good = derive_witness::<Fr>(compiled.circuit(), &square_assignment(3, 9)).unwrap();
        assert!(compiled.check_witness(&good).is_ok());

        let bad = derive_witness::<Fr>(compiled.circuit(), &square_assignment(3, 10)).unwrap();
        match compiled.check_witness(&bad) {
            Err(SatisfactionError::Unsatisfied { assertion }) => assert_eq!(assertion, "X * X == Y"),
            other => panic!("expected unsatisfied, got {other:?}"),
        }
    }

    #[test]
    fn check_witness_rejects_foreign_shape() {
        let compiled = compile::<Fr>(&square_circuit()).unwrap();
        let other = Circuit::builder("one")
            .public("Z")
            .assert_eq(Expr::var("Z"), Expr::constant(1))
            .build();
        let witness =
            derive_witness::<Fr>(&other, &crate::witness::Assignment::new().with("Z", 1)).unwrap();
        assert!(matches!(
            compiled.check_witness(&witness),
            Err(SatisfactionError::Shape { expected: 2, actual: 1 })
        ));
    }
}
