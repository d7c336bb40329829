//! Monthly financial history.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One month of figures. `month` is `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntry {
    pub month: String,
    pub net_worth: f64,
    pub income: f64,
    pub expenses: f64,
}

impl FinancialEntry {
    pub fn new(month: impl Into<String>, net_worth: f64, income: f64, expenses: f64) -> Result<Self, ValidationError> {
        let month = month.into();
        validate_month(&month)?;
        Ok(Self {
            month,
            net_worth,
            income,
            expenses,
        })
    }

    pub fn savings(&self) -> f64 {
        self.income - self.expenses
    }
}

fn validate_month(month: &str) -> Result<(), ValidationError> {
    chrono::NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidValue {
            field: "month".into(),
            message: format!("expected YYYY-MM, got '{month}'"),
        })
}

/// Insert or replace the entry for its month, keeping the list sorted by month.
pub fn upsert_entry(history: &[FinancialEntry], entry: FinancialEntry) -> Vec<FinancialEntry> {
    let mut out = history.to_vec();
    match out.iter_mut().find(|e| e.month == entry.month) {
        Some(existing) => *existing = entry,
        None => out.push(entry),
    }
    // YYYY-MM sorts chronologically as text.
    out.sort_by(|a, b| a.month.cmp(&b.month));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month: &str, net: f64) -> FinancialEntry {
        FinancialEntry::new(month, net, 3000.0, 1800.0).unwrap()
    }

    #[test]
    fn test_upsert_appends_and_sorts() {
        let history = vec![entry("2026-03", 10.0), entry("2026-01", 5.0)];
        let out = upsert_entry(&history, entry("2026-02", 7.0));
        let months: Vec<_> = out.iter().map(|e| e.month.as_str()).collect();
        assert_eq!(months, vec!["2026-01", "2026-02", "2026-03"]);
    }

    #[test]
    fn test_upsert_replaces_existing_month() {
        let history = vec![entry("2026-01", 5.0)];
        let out = upsert_entry(&history, entry("2026-01", 9.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].net_worth, 9.0);
    }

    #[test]
    fn test_month_validation() {
        assert!(FinancialEntry::new("2026-13", 0.0, 0.0, 0.0).is_err());
        assert!(FinancialEntry::new("March", 0.0, 0.0, 0.0).is_err());
        assert!(FinancialEntry::new("2026-12", 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_savings() {
        assert_eq!(entry("2026-01", 0.0).savings(), 1200.0);
    }
}
