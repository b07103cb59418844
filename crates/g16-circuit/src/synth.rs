use std::collections::HashMap;

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::definition::{Circuit, Expr, Visibility};
use crate::witness::Witness;

/// Lowers a [`Circuit`] into arkworks constraints.
///
/// Public variables become instance inputs and private variables become
/// witnesses, both in declaration order, so the instance vector always
/// matches [`Witness::public`].
pub struct Synthesizer<'a, F: PrimeField> {
    circuit: &'a Circuit,
    values: Option<&'a [F]>,
}

impl<'a, F: PrimeField> Synthesizer<'a, F> {
    /// No values; used for compilation and key generation
    pub fn for_setup(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            values: None,
        }
    }

    pub fn for_proving(circuit: &'a Circuit, witness: &'a Witness<F>) -> Self {
        Self {
            circuit,
            values: Some(witness.full()),
        }
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for Synthesizer<'_, F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let mut allocated: HashMap<&str, FpVar<F>> =
            HashMap::with_capacity(self.circuit.variables().len());

        for (i, var) in self.circuit.variables().iter().enumerate() {
            let value = || {
                self.values
                    .and_then(|values| values.get(i).copied())
                    .ok_or(SynthesisError::AssignmentMissing)
            };
            let fp = match var.visibility {
                Visibility::Public => FpVar::new_input(cs.clone(), value)?,
                Visibility::Private => FpVar::new_witness(cs.clone(), value)?,
            };
            allocated.insert(var.name.as_str(), fp);
        }

        for assertion in self.circuit.assertions() {
            let lhs = lower(&assertion.lhs, &allocated)?;
            let rhs = lower(&assertion.rhs, &allocated)?;
            // enforce_equal emits nothing for two constants
            if let (FpVar::Constant(l), FpVar::Constant(r)) = (&lhs, &rhs) {
                if l != r {
                    return Err(SynthesisError::Unsatisfiable);
                }
                continue;
            }
            lhs.enforce_equal(&rhs)?;
        }

        Ok(())
    }
}

fn lower<F: PrimeField>(
    expr: &Expr,
    allocated: &HashMap<&str, FpVar<F>>,
) -> Result<FpVar<F>, SynthesisError> {
    Ok(match expr {
        Expr::Var(name) => allocated
            .get(name.as_str())
            .cloned()
            .ok_or(SynthesisError::AssignmentMissing)?,
        Expr::Const(c) => FpVar::Constant(F::from(*c)),
        Expr::Add(a, b) => lower(a, allocated)? + lower(b, allocated)?,
        Expr::Sub(a, b) => lower(a, allocated)? - lower(b, allocated)?,
        Expr::Mul(a, b) => lower(a, allocated)? * lower(b, allocated)?,
        // rejected by Circuit::validate
        Expr::Div(..) => return Err(SynthesisError::Unsatisfiable),
    })
}
