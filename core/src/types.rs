//! Shared data model used across the decision engine and history.
//!
//! RULE: Nothing in this module performs I/O or parsing.
//! Raw form values stay strings here; typing happens in normalizer.rs.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// A stable, unique identifier for a stored result record.
pub type RecordId = String;

/// Highest score any outcome may carry.
pub const MAX_SCORE: u8 = 100;

// ── Raw input ────────────────────────────────────────────────────────────────

/// One submission from the transaction form.
///
/// Every attribute is a raw, possibly empty string exactly as entered.
/// Field names on the wire follow the form's naming (`creditScore`, `a8`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionInput {
    pub gender:          String,
    pub age:             String,
    pub credit_score:    String,
    pub employment_type: String,
    pub marital_status:  String,
    pub education_level: String,
    pub income:          String,
    pub a8:              String,
    pub a9:              String,
    pub a10:             String,
    pub a11:             String,
    pub a12:             String,
    pub a13:             String,
    pub a14:             String,
}

impl TransactionInput {
    pub fn get(&self, field: InputField) -> &str {
        match field {
            InputField::Gender         => &self.gender,
            InputField::Age            => &self.age,
            InputField::CreditScore    => &self.credit_score,
            InputField::EmploymentType => &self.employment_type,
            InputField::MaritalStatus  => &self.marital_status,
            InputField::EducationLevel => &self.education_level,
            InputField::Income         => &self.income,
            InputField::A8             => &self.a8,
            InputField::A9             => &self.a9,
            InputField::A10            => &self.a10,
            InputField::A11            => &self.a11,
            InputField::A12            => &self.a12,
            InputField::A13            => &self.a13,
            InputField::A14            => &self.a14,
        }
    }

    pub fn set(&mut self, field: InputField, value: impl Into<String>) {
        let slot = match field {
            InputField::Gender         => &mut self.gender,
            InputField::Age            => &mut self.age,
            InputField::CreditScore    => &mut self.credit_score,
            InputField::EmploymentType => &mut self.employment_type,
            InputField::MaritalStatus  => &mut self.marital_status,
            InputField::EducationLevel => &mut self.education_level,
            InputField::Income         => &mut self.income,
            InputField::A8             => &mut self.a8,
            InputField::A9             => &mut self.a9,
            InputField::A10            => &mut self.a10,
            InputField::A11            => &mut self.a11,
            InputField::A12            => &mut self.a12,
            InputField::A13            => &mut self.a13,
            InputField::A14            => &mut self.a14,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, field: InputField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

/// The fourteen form attributes, A1 through A14.
/// Order matches the form and is never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Gender,
    Age,
    CreditScore,
    EmploymentType,
    MaritalStatus,
    EducationLevel,
    Income,
    A8,
    A9,
    A10,
    A11,
    A12,
    A13,
    A14,
}

impl InputField {
    pub const ALL: [InputField; 14] = [
        Self::Gender,
        Self::Age,
        Self::CreditScore,
        Self::EmploymentType,
        Self::MaritalStatus,
        Self::EducationLevel,
        Self::Income,
        Self::A8,
        Self::A9,
        Self::A10,
        Self::A11,
        Self::A12,
        Self::A13,
        Self::A14,
    ];

    /// The generic numeric feature slots (A8–A14).
    pub const FEATURES: [InputField; 7] = [
        Self::A8,
        Self::A9,
        Self::A10,
        Self::A11,
        Self::A12,
        Self::A13,
        Self::A14,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gender         => "A1: Gender",
            Self::Age            => "A2: Age",
            Self::CreditScore    => "A3: Credit Score",
            Self::EmploymentType => "A4: Employment Type",
            Self::MaritalStatus  => "A5: Marital Status",
            Self::EducationLevel => "A6: Education Level",
            Self::Income         => "A7: Income",
            Self::A8             => "A8: Transaction Feature 8",
            Self::A9             => "A9: Transaction Feature 9",
            Self::A10            => "A10: Transaction Feature 10",
            Self::A11            => "A11: Transaction Feature 11",
            Self::A12            => "A12: Transaction Feature 12",
            Self::A13            => "A13: Transaction Feature 13",
            Self::A14            => "A14: Transaction Feature 14",
        }
    }
}

// ── Outcome ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(alias = "⚠️ Likely Fraudulent")]
    Fraudulent,
    #[serde(alias = "✅ Legitimate Transaction")]
    Legitimate,
    #[serde(alias = "🟡 Medium Risk")]
    MediumRisk,
}

impl RiskStatus {
    /// The recommendation every table row pairs with this status.
    pub fn recommendation(&self) -> Recommendation {
        match self {
            Self::Fraudulent => Recommendation::Decline,
            Self::Legitimate => Recommendation::Proceed,
            Self::MediumRisk => Recommendation::AdditionalVerification,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fraudulent => "Likely Fraudulent",
            Self::Legitimate => "Legitimate Transaction",
            Self::MediumRisk => "Medium Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(alias = "Decline Transaction")]
    Decline,
    Proceed,
    #[serde(alias = "Additional Verification Required")]
    AdditionalVerification,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Decline                => "Decline Transaction",
            Self::Proceed                => "Proceed",
            Self::AdditionalVerification => "Additional Verification Required",
        }
    }
}

/// Coarse banding of a score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Low,      // 0..=40
    Elevated, // 41..=70
    High,     // 71..=100
}

/// The (status, score, recommendation) triple produced for one transaction.
///
/// Fields are private: an outcome is created whole by a rule and never
/// edited afterwards. The score is always within `0..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RiskOutcome {
    status:         RiskStatus,
    score:          u8,
    recommendation: Recommendation,
}

impl RiskOutcome {
    /// Scores above `MAX_SCORE` are clamped.
    pub const fn new(status: RiskStatus, score: u8, recommendation: Recommendation) -> Self {
        let score = if score > MAX_SCORE { MAX_SCORE } else { score };
        Self { status, score, recommendation }
    }

    pub fn status(&self) -> RiskStatus {
        self.status
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    /// True when status and recommendation form a pair the table can produce.
    pub fn is_consistent(&self) -> bool {
        self.status.recommendation() == self.recommendation
    }

    pub fn severity_band(&self) -> SeverityBand {
        match self.score {
            0..=40  => SeverityBand::Low,
            41..=70 => SeverityBand::Elevated,
            _       => SeverityBand::High,
        }
    }
}
