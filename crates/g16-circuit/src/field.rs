//! Decimal <-> field element conversion.
//!
//! Values are never reduced: anything at or above the modulus is rejected.

use ark_ff::PrimeField;
use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldElementError {
    #[error("`{0}` is not a non-negative decimal integer")]
    Malformed(String),

    #[error("`{0}` is not below the field modulus")]
    OutOfField(String),
}

pub fn parse_field_element<F: PrimeField>(raw: &str) -> Result<F, FieldElementError> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldElementError::Malformed(raw.to_string()));
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| FieldElementError::Malformed(raw.to_string()))?;

    let modulus: BigUint = F::MODULUS.into();
    if value >= modulus {
        return Err(FieldElementError::OutOfField(raw.to_string()));
    }
    Ok(F::from(value))
}

pub fn field_to_decimal<F: PrimeField>(value: &F) -> String {
    let big: BigUint = value.into_bigint().into();
    big.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr as BlsFr;
    use ark_bn254::Fr;

    const BN254_MODULUS: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn small_values_parse() {
        assert_eq!(parse_field_element::<Fr>("9").unwrap(), Fr::from(9u64));
        assert_eq!(parse_field_element::<Fr>(" 0 ").unwrap(), Fr::from(0u64));
    }

    #[test]
    fn modulus_is_out_of_field() {
        assert_eq!(
            parse_field_element::<Fr>(BN254_MODULUS),
            Err(FieldElementError::OutOfField(BN254_MODULUS.into()))
        );
    }

    #[test]
    fn modulus_minus_one_is_in_field() {
        let max = "21888242871839275222246405745257275088548364400416034343698204186575808495616";
        let parsed = parse_field_element::<Fr>(max).unwrap();
        assert_eq!(parsed, -Fr::from(1u64));
    }

    #[test]
    fn membership_depends_on_the_field() {
        // BN254's modulus is smaller than BLS12-381's scalar modulus
        assert!(parse_field_element::<BlsFr>(BN254_MODULUS).is_ok());
        assert!(parse_field_element::<Fr>(BN254_MODULUS).is_err());
    }

    #[test]
    fn malformed_values_rejected() {
        for raw in ["", "-1", "0x10", "3.0", "nine"] {
            assert_eq!(
                parse_field_element::<Fr>(raw),
                Err(FieldElementError::Malformed(raw.into())),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn decimal_roundtrip() {
        let value = -Fr::from(2u64);
        let text = field_to_decimal(&value);
        assert_eq!(parse_field_element::<Fr>(&text).unwrap(), value);
        assert_eq!(field_to_decimal(&Fr::from(9u64)), "9");
    }
}
