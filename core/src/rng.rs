//! Deterministic synthetic transaction inputs.
//!
//! RULE: Generated inputs depend only on the seed. Two generators built
//! from the same seed produce identical sequences.

use crate::types::{InputField, TransactionInput};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const GENDERS: &[&str] = &["male", "female", ""];
const EMPLOYMENT: &[&str] = &["salaried", "self-employed", "unemployed", ""];
const MARITAL: &[&str] = &["single", "married", "divorced", "widowed", ""];
const EDUCATION: &[&str] = &["high-school", "bachelors", "masters", "phd", ""];

/// Income slider bounds.
const INCOME_MAX: u64 = 10_000;
const INCOME_STEP: u64 = 100;

pub struct InputRng {
    inner: Pcg64Mcg,
}

impl InputRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.next_u64_below(options.len() as u64) as usize]
    }

    /// A plausible form submission. About one numeric field in twenty is
    /// left blank or garbled so normalization gets exercised.
    pub fn transaction(&mut self) -> TransactionInput {
        let mut input = TransactionInput {
            gender:          self.pick(GENDERS).into(),
            age:             (18 + self.next_u64_below(63)).to_string(),
            credit_score:    self.next_u64_below(101).to_string(),
            employment_type: self.pick(EMPLOYMENT).into(),
            marital_status:  self.pick(MARITAL).into(),
            education_level: self.pick(EDUCATION).into(),
            income:          (self.next_u64_below(INCOME_MAX / INCOME_STEP + 1) * INCOME_STEP).to_string(),
            ..Default::default()
        };
        for field in InputField::FEATURES {
            let value = self.next_u64_below(1_000).to_string();
            input.set(field, value);
        }
        for field in [InputField::Age, InputField::CreditScore, InputField::Income] {
            if self.chance(0.05) {
                let garbled = self.pick(&["", "n/a", "12.5"]);
                input.set(field, garbled);
            }
        }
        input
    }
}
