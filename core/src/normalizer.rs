//! Normalizer: raw form strings to a typed transaction record.
//!
//! RULE: Normalization never fails. Any numeric field that is missing,
//! empty or not a strict integer becomes 0.

use crate::types::{InputField, TransactionInput};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Unemployed,
    /// Empty field.
    Unspecified,
    /// Anything the form did not offer, kept verbatim.
    Other(String),
}

impl EmploymentType {
    /// Exact, case-sensitive match against the form's option values.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "salaried"      => Self::Salaried,
            "self-employed" => Self::SelfEmployed,
            "unemployed"    => Self::Unemployed,
            ""              => Self::Unspecified,
            other           => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Salaried     => "salaried",
            Self::SelfEmployed => "self-employed",
            Self::Unemployed   => "unemployed",
            Self::Unspecified  => "",
            Self::Other(raw)   => raw,
        }
    }
}

/// Typed projection of a [`TransactionInput`].
///
/// `credit_score` is expected in 0–100 and `income` in 0–10000, but neither
/// range is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTransaction {
    pub age:             i64,
    pub credit_score:    i64,
    pub income:          i64,
    pub employment_type: EmploymentType,
    // Display-only pass-through fields.
    pub gender:          String,
    pub marital_status:  String,
    pub education_level: String,
    /// Generic numeric slots A8–A14, in order.
    pub features:        [i64; 7],
}

/// Strict integer parse. Surrounding whitespace is ignored; fractions,
/// trailing text and out-of-range values all yield 0.
pub fn parse_int_or_zero(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

pub fn normalize(input: &TransactionInput) -> NormalizedTransaction {
    let mut features = [0i64; 7];
    for (slot, field) in features.iter_mut().zip(InputField::FEATURES) {
        *slot = parse_int_or_zero(input.get(field));
    }

    NormalizedTransaction {
        age:             parse_int_or_zero(&input.age),
        credit_score:    parse_int_or_zero(&input.credit_score),
        income:          parse_int_or_zero(&input.income),
        employment_type: EmploymentType::parse(&input.employment_type),
        gender:          input.gender.clone(),
        marital_status:  input.marital_status.clone(),
        education_level: input.education_level.clone(),
        features,
    }
}
