//! User settings document: budget, review questions, KPIs and mentors.
//!
//! This is the `settings` document in the store, edited by the user. It is
//! distinct from the on-disk [`crate::config::Config`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::review::DailyReviewQuestion;

/// A tracked numeric target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default = "default_kpi_target")]
    pub target: f64,
}

fn default_kpi_target() -> f64 {
    100.0
}

impl Kpi {
    pub fn new(name: impl Into<String>, start: f64, current: f64, target: f64) -> Self {
        Self {
            name: name.into(),
            start,
            current,
            target,
        }
    }

    /// `(current - start) / (target - start)` as a percentage in [0, 100].
    /// A zero span reports 0.
    pub fn progress_pct(&self) -> f64 {
        let span = self.target - self.start;
        if span == 0.0 || !span.is_finite() {
            return 0.0;
        }
        let pct = (self.current - self.start) / span * 100.0;
        if pct.is_nan() {
            0.0
        } else {
            pct.clamp(0.0, 100.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_financial_budget")]
    pub financial_budget: f64,
    #[serde(default = "default_monthly_spend")]
    pub monthly_spend: f64,
    #[serde(default)]
    pub daily_review_questions: Vec<DailyReviewQuestion>,
    #[serde(default)]
    pub mentors: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<Kpi>,
}

fn default_financial_budget() -> f64 {
    6000.0
}
fn default_monthly_spend() -> f64 {
    1500.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            financial_budget: default_financial_budget(),
            monthly_spend: default_monthly_spend(),
            daily_review_questions: Vec::new(),
            mentors: Vec::new(),
            kpis: Vec::new(),
        }
    }
}

impl Settings {
    /// Months the budget lasts at the current spend. `None` means unbounded.
    pub fn runway_months(&self) -> Option<f64> {
        (self.monthly_spend > 0.0).then(|| self.financial_budget / self.monthly_spend)
    }

    pub fn add_question(&mut self, question: DailyReviewQuestion) -> Result<(), ValidationError> {
        if question.text.trim().is_empty() {
            return Err(ValidationError::empty("question text"));
        }
        self.daily_review_questions.push(question);
        Ok(())
    }

    pub fn remove_question(&mut self, index: usize) -> Result<DailyReviewQuestion, ValidationError> {
        if index >= self.daily_review_questions.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "daily review questions".into(),
                index,
                len: self.daily_review_questions.len(),
            });
        }
        Ok(self.daily_review_questions.remove(index))
    }

    pub fn add_kpi(&mut self, kpi: Kpi) -> Result<(), ValidationError> {
        if kpi.name.trim().is_empty() {
            return Err(ValidationError::empty("KPI name"));
        }
        self.kpis.push(kpi);
        Ok(())
    }

    pub fn remove_kpi(&mut self, index: usize) -> Result<Kpi, ValidationError> {
        if index >= self.kpis.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "kpis".into(),
                index,
                len: self.kpis.len(),
            });
        }
        Ok(self.kpis.remove(index))
    }

    /// Add a mentor by name, trimmed. Blank names are rejected.
    pub fn add_mentor(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty("mentor name"));
        }
        self.mentors.push(name.to_string());
        Ok(())
    }

    /// Remove every mentor with this name.
    pub fn remove_mentor(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        let before = self.mentors.len();
        self.mentors.retain(|m| m != name);
        if self.mentors.len() == before {
            return Err(ValidationError::NotFound {
                kind: "mentor".into(),
                id: name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pillar::Pillar;

    #[test]
    fn test_kpi_progress() {
        assert_eq!(Kpi::new("weight", 90.0, 85.0, 80.0).progress_pct(), 50.0);
        assert_eq!(Kpi::new("books", 0.0, 30.0, 20.0).progress_pct(), 100.0);
        assert_eq!(Kpi::new("books", 10.0, 5.0, 20.0).progress_pct(), 0.0);
        assert_eq!(Kpi::new("flat", 5.0, 5.0, 5.0).progress_pct(), 0.0);
    }

    #[test]
    fn test_runway() {
        let settings = Settings::default();
        assert_eq!(settings.runway_months(), Some(4.0));
        let free = Settings {
            monthly_spend: 0.0,
            ..Settings::default()
        };
        assert_eq!(free.runway_months(), None);
    }

    #[test]
    fn test_default_document_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["financialBudget"], 6000.0);
        assert_eq!(json["monthlySpend"], 1500.0);
        assert_eq!(json["dailyReviewQuestions"], serde_json::json!([]));

        let partial: Settings = serde_json::from_str(r#"{"mentors": ["Seneca"]}"#).unwrap();
        assert_eq!(partial.financial_budget, 6000.0);
        assert_eq!(partial.mentors, vec!["Seneca"]);
    }

    #[test]
    fn test_editing_helpers() {
        let mut settings = Settings::default();
        settings
            .add_question(DailyReviewQuestion::new("Trained?", Pillar::Body, 10))
            .unwrap();
        assert!(settings
            .add_question(DailyReviewQuestion::new(" ", Pillar::Body, 10))
            .is_err());
        assert!(settings.remove_question(3).is_err());
        assert_eq!(settings.remove_question(0).unwrap().text, "Trained?");

        settings.add_mentor("  Marcus Aurelius ").unwrap();
        assert!(settings.add_mentor("").is_err());
        assert_eq!(settings.mentors, vec!["Marcus Aurelius"]);
        settings.remove_mentor("Marcus Aurelius").unwrap();
        assert!(settings.mentors.is_empty());
        assert!(settings.remove_mentor("Seneca").is_err());

        settings.add_kpi(Kpi::new("runs", 0.0, 1.0, 10.0)).unwrap();
        assert_eq!(settings.remove_kpi(0).unwrap().name, "runs");
    }
}
