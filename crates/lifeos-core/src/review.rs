//! Daily self-review: configured questions, scoring and history records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pillar::{Pillar, PillarXp};

/// A configured yes/no question worth points in one pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReviewQuestion {
    pub text: String,
    pub pillar: Pillar,
    pub points: u32,
}

impl DailyReviewQuestion {
    pub fn new(text: impl Into<String>, pillar: Pillar, points: u32) -> Self {
        Self {
            text: text.into(),
            pillar,
            points,
        }
    }
}

/// One submitted review. At most one record exists per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReviewRecord {
    pub date: NaiveDate,
    /// Question index to answer.
    #[serde(default)]
    pub answers: BTreeMap<usize, bool>,
    #[serde(default)]
    pub total_score: u32,
}

/// A question paired with its answer, as embedded in the coaching prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: &'static str,
}

/// Result of scoring a set of answers against the configured questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewScore {
    pub total_score: u32,
    pub xp_by_pillar: BTreeMap<Pillar, u32>,
    pub transcript: Vec<AnsweredQuestion>,
}

impl ReviewScore {
    /// Apply the earned XP to a pillar map.
    pub fn apply_to(&self, pillars: &mut PillarXp) {
        for (pillar, points) in &self.xp_by_pillar {
            pillars.award(*pillar, *points);
        }
    }
}

/// Score answers. Indices without an answer, or answered `false`, count as "no".
pub fn score_review(
    questions: &[DailyReviewQuestion],
    answers: &BTreeMap<usize, bool>,
) -> ReviewScore {
    let mut score = ReviewScore::default();
    for (index, question) in questions.iter().enumerate() {
        let yes = answers.get(&index).copied().unwrap_or(false);
        if yes {
            score.total_score = score.total_score.saturating_add(question.points);
            *score.xp_by_pillar.entry(question.pillar).or_insert(0) += question.points;
        }
        score.transcript.push(AnsweredQuestion {
            question: question.text.clone(),
            answer: if yes { "Yes" } else { "No" },
        });
    }
    score
}

/// Whether a review has already been recorded for `date`.
pub fn has_reviewed_on(reviews: &[DailyReviewRecord], date: NaiveDate) -> bool {
    reviews.iter().any(|r| r.date == date)
}

/// Score series for the most recent `limit` reviews, oldest first.
pub fn recent_scores(reviews: &[DailyReviewRecord], limit: usize) -> Vec<(NaiveDate, u32)> {
    let start = reviews.len().saturating_sub(limit);
    reviews[start..]
        .iter()
        .map(|r| (r.date, r.total_score))
        .collect()
}
