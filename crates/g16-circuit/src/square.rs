use ark_ff::PrimeField;

use crate::compile::{compile, CompileError};
use crate::definition::{Circuit, Expr};
use crate::witness::Assignment;

pub const X: &str = "X";
pub const Y: &str = "Y";

/// "I know `X` and `Y` such that `X * X == Y`" (both public)
pub fn square_circuit() -> Circuit {
    Circuit::builder("square")
        .public(X)
        .public(Y)
        .assert_eq(Expr::var(X) * Expr::var(X), Expr::var(Y))
        .build()
}

pub fn square_assignment(x: u64, y: u64) -> Assignment {
    Assignment::new().with(X, x).with(Y, y)
}

/// Count constraints in the square circuit over `F`
pub fn constraint_count<F: PrimeField>() -> Result<usize, CompileError> {
    compile::<F>(&square_circuit()).map(|compiled| compiled.num_constraints())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Synthesizer;
    use crate::witness::derive_witness;
    use ark_bls12_381::Fr as BlsFr;
    use ark_bn254::Fr;
    use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};

    fn is_satisfied(x: u64, y: u64) -> bool {
        let circuit = square_circuit();
        let witness = derive_witness::<Fr>(&circuit, &square_assignment(x, y)).unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        Synthesizer::for_proving(&circuit, &witness)
            .generate_constraints(cs.clone())
            .unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_valid_square() {
        assert!(is_satisfied(3, 9));
        assert!(is_satisfied(0, 0));
        assert!(is_satisfied(1_000_000, 1_000_000_000_000));
    }

    #[test]
    fn test_wrong_square() {
        assert!(!is_satisfied(3, 10), "should fail: 3 * 3 != 10");
        assert!(!is_satisfied(9, 3), "should fail: roles swapped");
    }

    #[test]
    fn test_square_declares_two_public_inputs() {
        let circuit = square_circuit();
        assert_eq!(circuit.num_public(), 2);
        assert!(circuit.validate().is_ok());
    }

    #[test]
    fn test_square_constraint_count() {
        // one multiplication gate plus the equality check
        let count = constraint_count::<Fr>().unwrap();
        println!("Square circuit constraints: {count}");
        assert_eq!(count, 2);
        assert_eq!(constraint_count::<BlsFr>().unwrap(), count);
    }
}
