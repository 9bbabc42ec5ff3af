//! RuleEngine: ordered, first-match-wins classification.
//!
//! RULES:
//!   - Priority is list order, never specificity.
//!   - The first rule whose condition holds produces the outcome.
//!   - If no rule holds, DEFAULT_OUTCOME is returned. Evaluation is total.
//!
//! STANDARD TABLE (fixed order):
//!   1. credit < 20 AND income > 1000        → Fraudulent  91 Decline
//!   2. credit > 60 AND income < 1000        → Legitimate  75 Proceed
//!   3. age < 25    AND credit > 70          → MediumRisk  60 AdditionalVerification
//!   4. unemployed  AND income > 3000        → Fraudulent  85 Decline
//!   default                                 → MediumRisk  50 AdditionalVerification

use crate::{
    config::RuleThresholds,
    normalizer::{EmploymentType, NormalizedTransaction},
    types::{Recommendation, RiskOutcome, RiskStatus},
};
use serde::Serialize;

// ── Outcomes ─────────────────────────────────────────────────────────────────

pub const LOW_CREDIT_HIGH_INCOME: RiskOutcome =
    RiskOutcome::new(RiskStatus::Fraudulent, 91, Recommendation::Decline);
pub const GOOD_CREDIT_LOW_INCOME: RiskOutcome =
    RiskOutcome::new(RiskStatus::Legitimate, 75, Recommendation::Proceed);
pub const YOUNG_HIGH_CREDIT: RiskOutcome =
    RiskOutcome::new(RiskStatus::MediumRisk, 60, Recommendation::AdditionalVerification);
pub const UNEMPLOYED_HIGH_INCOME: RiskOutcome =
    RiskOutcome::new(RiskStatus::Fraudulent, 85, Recommendation::Decline);
pub const DEFAULT_OUTCOME: RiskOutcome =
    RiskOutcome::new(RiskStatus::MediumRisk, 50, Recommendation::AdditionalVerification);

// ── Rule ─────────────────────────────────────────────────────────────────────

type Condition = Box<dyn Fn(&NormalizedTransaction) -> bool + Send + Sync>;

/// A named predicate paired with the outcome it produces.
pub struct Rule {
    pub name:    &'static str,
    pub outcome: RiskOutcome,
    condition:   Condition,
}

impl Rule {
    pub fn new<F>(name: &'static str, outcome: RiskOutcome, condition: F) -> Self
    where
        F: Fn(&NormalizedTransaction) -> bool + Send + Sync + 'static,
    {
        Self { name, outcome, condition: Box::new(condition) }
    }

    pub fn matches(&self, txn: &NormalizedTransaction) -> bool {
        (self.condition)(txn)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// The four-rule table, parameterised by thresholds.
pub fn standard_rules(t: &RuleThresholds) -> Vec<Rule> {
    let t = *t;
    vec![
        Rule::new("low_credit_high_income", LOW_CREDIT_HIGH_INCOME, move |x| {
            x.credit_score < t.low_credit_score && x.income > t.low_credit_min_income
        }),
        Rule::new("good_credit_low_income", GOOD_CREDIT_LOW_INCOME, move |x| {
            x.credit_score > t.good_credit_score && x.income < t.good_credit_max_income
        }),
        Rule::new("young_high_credit", YOUNG_HIGH_CREDIT, move |x| {
            x.age < t.young_age && x.credit_score > t.young_high_credit_score
        }),
        Rule::new("unemployed_high_income", UNEMPLOYED_HIGH_INCOME, move |x| {
            x.employment_type == EmploymentType::Unemployed && x.income > t.unemployed_min_income
        }),
    ]
}

// ── Evaluation ───────────────────────────────────────────────────────────────

/// Which entry of the table produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchedRule {
    /// `priority` is 1-based list position.
    Rule { priority: usize, name: &'static str },
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub outcome: RiskOutcome,
    pub matched: MatchedRule,
}

#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Engine over the standard table.
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self::with_rules(standard_rules(thresholds))
    }

    /// Engine over an arbitrary ordered rule list.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn explain(&self, txn: &NormalizedTransaction) -> Evaluation {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(txn))
            .map(|(i, rule)| Evaluation {
                outcome: rule.outcome,
                matched: MatchedRule::Rule { priority: i + 1, name: rule.name },
            })
            .unwrap_or(Evaluation {
                outcome: DEFAULT_OUTCOME,
                matched: MatchedRule::Default,
            })
    }

    pub fn evaluate(&self, txn: &NormalizedTransaction) -> RiskOutcome {
        self.explain(txn).outcome
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(&RuleThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalizer::normalize, types::TransactionInput};

    fn txn(credit: &str, income: &str, age: &str, employment: &str) -> NormalizedTransaction {
        normalize(&TransactionInput {
            credit_score: credit.into(),
            income: income.into(),
            age: age.into(),
            employment_type: employment.into(),
            ..Default::default()
        })
    }

    #[test]
    fn earlier_rule_wins_when_conditions_overlap() {
        let engine = RuleEngine::with_rules(vec![
            Rule::new("first", LOW_CREDIT_HIGH_INCOME, |x| x.income > 100),
            Rule::new("second", GOOD_CREDIT_LOW_INCOME, |x| x.income > 100 && x.credit_score > 50),
        ]);
        let eval = engine.explain(&txn("90", "500", "30", ""));
        assert_eq!(eval.outcome, LOW_CREDIT_HIGH_INCOME);
        assert_eq!(eval.matched, MatchedRule::Rule { priority: 1, name: "first" });
    }

    #[test]
    fn empty_table_always_defaults() {
        let engine = RuleEngine::with_rules(Vec::new());
        let eval = engine.explain(&txn("10", "2000", "30", ""));
        assert_eq!(eval.outcome, DEFAULT_OUTCOME);
        assert_eq!(eval.matched, MatchedRule::Default);
    }

    #[test]
    fn thresholds_are_strict_inequalities() {
        let engine = RuleEngine::default();
        // credit == 20 and income == 1000 sit on the boundary of rule 1.
        assert_eq!(engine.evaluate(&txn("20", "2000", "30", "")), DEFAULT_OUTCOME);
        assert_eq!(engine.evaluate(&txn("10", "1000", "30", "")), DEFAULT_OUTCOME);
        // age == 25 is not young.
        assert_eq!(engine.evaluate(&txn("75", "5000", "25", "")), DEFAULT_OUTCOME);
        // income == 3000 does not trip rule 4.
        assert_eq!(engine.evaluate(&txn("50", "3000", "40", "unemployed")), DEFAULT_OUTCOME);
    }

    #[test]
    fn custom_thresholds_move_the_boundary() {
        let thresholds = RuleThresholds { low_credit_score: 30, ..Default::default() };
        let engine = RuleEngine::new(&thresholds);
        assert_eq!(engine.evaluate(&txn("25", "2000", "30", "")), LOW_CREDIT_HIGH_INCOME);
    }

    #[test]
    fn standard_table_order_is_fixed() {
        let engine = RuleEngine::default();
        let names: Vec<_> = engine.rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["low_credit_high_income", "good_credit_low_income", "young_high_credit", "unemployed_high_income"]
        );
    }
}
