//! Life OS service: the operations behind every user action.
//!
//! Each operation reads a snapshot of the cached state, computes the new
//! documents with the pure modules, and writes them to the store. The cache
//! is refreshed only through store subscriptions, so a failed write leaves
//! it untouched. Writes within one operation are independent; an earlier
//! write is never rolled back when a later one fails.
//!
//! Validation problems and AI failures end in a notification, never in an
//! error returned to the caller.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::ai::prompts::{self, ReportContext};
use crate::ai::{AiProtocol, CompletionService, PriorityReply, SubdivisionReply};
use crate::config::TasksConfig;
use crate::error::{AiError, StoreError, ValidationError};
use crate::finance::{upsert_entry, FinancialEntry};
use crate::goals::{self, LifeGoal};
use crate::notify::{Notification, NotificationSink};
use crate::pillar::{LevelProgress, Pillar};
use crate::review::{self, DailyReviewRecord};
use crate::settings::Settings;
use crate::state::AppState;
use crate::store::{self, DocumentStore, OnChange, StoreKey, Subscription};
use crate::streak::{StreakTracker, StreakUpdate};
use crate::task::{self, NewTask, OpenTaskSnapshot, Task};

/// Long-running operations guarded against re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Subdivide,
    Prioritize,
    DailyReview,
    Report,
    GoalSuggestion,
    MentorHelp,
}

/// Advisory in-flight flags, set before dispatch and cleared on settlement.
#[derive(Debug, Default)]
struct BusyFlags(Mutex<HashSet<Operation>>);

struct BusyGuard<'a> {
    flags: &'a BusyFlags,
    op: Operation,
}

impl BusyFlags {
    fn try_begin(&self, op: Operation) -> Option<BusyGuard<'_>> {
        let mut set = self.0.lock().unwrap_or_else(|e| e.into_inner());
        set.insert(op).then_some(BusyGuard { flags: self, op })
    }

    fn is_set(&self, op: Operation) -> bool {
        self.0
            .lock()
            .map(|set| set.contains(&op))
            .unwrap_or(false)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.flags.0.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.op);
    }
}

/// Level card for one pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarLevel {
    pub pillar: Pillar,
    pub xp: u64,
    pub progress: LevelProgress,
    /// Progress through the current level, 0 to 100.
    pub percent: f64,
}

/// Progress of one KPI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiProgress {
    pub name: String,
    pub percent: f64,
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub pillars: Vec<PillarLevel>,
    pub streak: u32,
    /// `None` when monthly spend is zero.
    pub runway_months: Option<f64>,
    pub kpis: Vec<KpiProgress>,
    pub goal_of_the_day: Option<LifeGoal>,
    pub recent_scores: Vec<(NaiveDate, u32)>,
    pub open_tasks: usize,
    pub completed_tasks: usize,
    /// Income minus expenses of the most recent recorded month.
    pub latest_savings: Option<f64>,
}

/// Result of a submitted daily review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    pub record: DailyReviewRecord,
    pub streak: StreakUpdate,
    /// Coaching text; empty when the AI gave no usable answer.
    pub analysis: String,
}

pub struct LifeOs<S: DocumentStore, C: CompletionService> {
    store: Arc<S>,
    ai: AiProtocol<C>,
    sink: Arc<dyn NotificationSink>,
    state: Arc<Mutex<AppState>>,
    tasks_config: TasksConfig,
    busy: BusyFlags,
    subscriptions: Vec<Subscription>,
}

impl<S: DocumentStore, C: CompletionService> LifeOs<S, C> {
    /// Subscribe to every document and populate the cache.
    ///
    /// Absent documents are seeded with their defaults by the store.
    pub fn connect(
        store: Arc<S>,
        service: C,
        sink: Arc<dyn NotificationSink>,
        tasks_config: TasksConfig,
    ) -> Result<Self, StoreError> {
        let state = Arc::new(Mutex::new(AppState::default()));
        let mut subscriptions = Vec::with_capacity(StoreKey::ALL.len());

        for key in StoreKey::ALL {
            let target = state.clone();
            let on_change: OnChange = Arc::new(move |value: &Value| {
                let mut state = target.lock().unwrap_or_else(|e| e.into_inner());
                if let Err(err) = state.apply(key, value.clone()) {
                    warn!(%key, error = %err, "ignoring malformed document");
                }
            });
            subscriptions.push(store.subscribe(key, on_change)?);
        }

        Ok(Self {
            store,
            ai: AiProtocol::new(service, sink.clone()),
            sink,
            state,
            tasks_config,
            busy: BusyFlags::default(),
            subscriptions,
        })
    }

    /// Copy of the cached state.
    pub fn state(&self) -> AppState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ai(&self) -> &AiProtocol<C> {
        &self.ai
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        self.busy.is_set(op)
    }

    fn notify(&self, notification: Notification) {
        self.sink.notify(notification);
    }

    fn reject(&self, err: ValidationError) {
        info!(error = %err, "rejected input");
        self.notify(Notification::error(err.to_string()));
    }

    fn begin(&self, op: Operation) -> Option<BusyGuard<'_>> {
        let guard = self.busy.try_begin(op);
        if guard.is_none() {
            self.notify(Notification::info("Already in progress."));
        }
        guard
    }

    /// Write one document. Failures are logged and notified.
    fn write<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> bool {
        match store::save(&*self.store, key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(%key, error = %err, "write failed");
                self.notify(Notification::error(format!("Failed to save {key}")));
                false
            }
        }
    }

    // ---- tasks ----

    /// Open tasks in display order.
    pub fn sorted_open_tasks(&self) -> Vec<Task> {
        let state = self.state();
        task::sorted_open_tasks(&state.tasks)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Add a task. `points` defaults to the configured value.
    pub fn add_task(&self, text: &str, pillar: Pillar, points: Option<u32>) -> Option<Task> {
        let tasks = self.state().tasks;
        let points = points.unwrap_or(self.tasks_config.default_points);
        match task::add_task(&tasks, NewTask::new(text, pillar, points)) {
            Ok(updated) => {
                let added = updated.last().cloned();
                self.write(StoreKey::TodoList, &updated).then_some(())?;
                added
            }
            Err(err) => {
                self.reject(err);
                None
            }
        }
    }

    /// Flip a task's completion flag, awarding XP on completion.
    pub fn toggle_task(&self, id: &str) -> Option<Task> {
        let state = self.state();
        let toggle = match task::toggle_complete(&state.tasks, id) {
            Ok(toggle) => toggle,
            Err(err) => {
                self.reject(err);
                return None;
            }
        };

        if let Some(award) = &toggle.award {
            let mut pillars = state.pillars.clone();
            pillars.award(award.pillar, award.points);
            if self.write(StoreKey::Pillars, &pillars) {
                info!(pillar = %award.pillar, points = award.points, "xp awarded");
                self.notify(Notification::info(format!(
                    "+{} XP for {}!",
                    award.points, award.pillar
                )));
            }
        }

        let toggled = toggle.tasks.iter().find(|t| t.id == id).cloned();
        self.write(StoreKey::TodoList, &toggle.tasks);
        toggled
    }

    pub fn delete_task(&self, id: &str) -> bool {
        let tasks = self.state().tasks;
        let updated = task::delete_task(&tasks, id);
        if updated.len() == tasks.len() {
            self.reject(ValidationError::NotFound {
                kind: "task".into(),
                id: id.to_string(),
            });
            return false;
        }
        let ok = self.write(StoreKey::TodoList, &updated);
        if ok {
            self.notify(Notification::info("Task deleted."));
        }
        ok
    }

    /// Ask the AI to split `goal` into subtasks and append them.
    ///
    /// Returns the new tasks; empty when nothing was added.
    pub async fn subdivide_task(&self, goal: &str, pillar: Pillar, points: Option<u32>) -> Vec<Task> {
        let goal = goal.trim();
        if goal.is_empty() {
            self.reject(ValidationError::empty("goal text"));
            return Vec::new();
        }
        let Some(_guard) = self.begin(Operation::Subdivide) else {
            return Vec::new();
        };
        let points = points.unwrap_or(self.tasks_config.default_points);

        let value = self.ai.complete_json(&prompts::subdivision(goal)).await;
        let reply = match SubdivisionReply::from_value(&value) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "unusable subdivision reply");
                self.notify(Notification::error("The AI did not provide a valid subdivision."));
                return Vec::new();
            }
        };

        let tasks = self.state().tasks;
        let updated = match task::subdivide(&tasks, goal, pillar, points, &reply.tasks) {
            Ok(updated) => updated,
            Err(err) => {
                warn!(error = %err, "subdivision rejected");
                self.notify(Notification::error("The AI did not provide a valid subdivision."));
                return Vec::new();
            }
        };
        if !self.write(StoreKey::TodoList, &updated) {
            return Vec::new();
        }
        self.notify(Notification::success(format!(
            "Task split into {} subtasks!",
            reply.tasks.len()
        )));
        updated[tasks.len()..].to_vec()
    }

    /// Ask the AI to bucket the open tasks by priority.
    pub async fn prioritize_tasks(&self) -> bool {
        let Some(_guard) = self.begin(Operation::Prioritize) else {
            return false;
        };
        let state = self.state();
        let snapshot = OpenTaskSnapshot::capture(&state.tasks);
        if snapshot.is_empty() {
            self.notify(Notification::info("No open tasks to prioritize."));
            return false;
        }

        let prompt = prompts::prioritization(&state.memory, &snapshot);
        let value = self.ai.complete_json(&prompt).await;
        let reply = match PriorityReply::from_value(&value) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "unusable priority reply");
                self.notify(Notification::error("The AI did not set priorities."));
                return false;
            }
        };

        let tasks = self.state().tasks;
        if !snapshot.is_current(&tasks) {
            if self.tasks_config.reject_stale_priorities {
                warn!(error = %AiError::Stale, "dropping priority reply");
                self.notify(Notification::error(
                    "The task list changed while prioritizing. Try again.",
                ));
                return false;
            }
            warn!("open tasks changed during prioritization, applying by snapshot");
        }

        let updated = task::prioritize(&tasks, &snapshot, &reply);
        let ok = self.write(StoreKey::TodoList, &updated);
        if ok {
            self.notify(Notification::success("Priorities set by the AI!"));
        }
        ok
    }

    // ---- daily review ----

    /// Score today's answers, update XP and streak, and append the record.
    pub async fn submit_daily_review(
        &self,
        answers: BTreeMap<usize, bool>,
        today: NaiveDate,
    ) -> Option<ReviewSummary> {
        let state = self.state();
        if review::has_reviewed_on(&state.reviews, today) {
            self.notify(Notification::info("Today's review is already done."));
            return None;
        }
        // The streak reads the last record as the most recent day.
        if let Some(last) = state.reviews.last().filter(|r| today < r.date) {
            self.reject(ValidationError::InvalidValue {
                field: "review date".into(),
                message: format!("{today} is before the last review on {}", last.date),
            });
            return None;
        }
        let _guard = self.begin(Operation::DailyReview)?;

        let score = review::score_review(&state.settings.daily_review_questions, &answers);
        let mut pillars = state.pillars.clone();
        score.apply_to(&mut pillars);

        let mut tracker = StreakTracker::new(state.streak);
        let streak = tracker.record(&state.reviews, today);

        let record = DailyReviewRecord {
            date: today,
            answers,
            total_score: score.total_score,
        };
        let mut reviews = state.reviews.clone();
        reviews.push(record.clone());

        let analysis = self
            .ai
            .complete_text(&prompts::review_analysis(&state.memory, &score.transcript))
            .await;

        self.write(StoreKey::Pillars, &pillars);
        self.write(StoreKey::DailyReviewStreak, &tracker.current_streak());
        self.write(StoreKey::DailyReviews, &reviews);
        info!(%today, score = score.total_score, streak = streak.after, "daily review recorded");
        self.notify(Notification::success("Review completed and saved!"));

        Some(ReviewSummary {
            record,
            streak,
            analysis,
        })
    }

    // ---- goals ----

    pub fn add_goal(&self, text: &str, pillar: Pillar) -> Option<LifeGoal> {
        let current = self.state().goals;
        match goals::add_goal(&current, text, pillar) {
            Ok(updated) => {
                let added = updated.last().cloned();
                self.write(StoreKey::LifeGoals, &updated).then_some(())?;
                self.notify(Notification::success("Life goal added!"));
                added
            }
            Err(err) => {
                self.reject(err);
                None
            }
        }
    }

    pub fn remove_goal(&self, id: &str) -> bool {
        let current = self.state().goals;
        let updated = goals::remove_goal(&current, id);
        if updated.len() == current.len() {
            self.reject(ValidationError::NotFound {
                kind: "goal".into(),
                id: id.to_string(),
            });
            return false;
        }
        let ok = self.write(StoreKey::LifeGoals, &updated);
        if ok {
            self.notify(Notification::info("Goal removed."));
        }
        ok
    }

    /// Ask for one action towards a life goal, phrased as a task.
    pub async fn suggest_goal_action(&self) -> Option<String> {
        let state = self.state();
        if state.goals.is_empty() {
            self.reject(ValidationError::EmptyCollection("life goals".into()));
            return None;
        }
        let _guard = self.begin(Operation::GoalSuggestion)?;
        let suggestion = self
            .ai
            .complete_text(&prompts::goal_action(&state.memory, &state.goals))
            .await;
        let suggestion = suggestion.trim();
        (!suggestion.is_empty()).then(|| suggestion.to_string())
    }

    /// Append an accepted suggestion to the to-do list.
    pub fn accept_suggestion(&self, suggestion: &str) -> Option<Task> {
        let task = match goals::suggestion_task(suggestion, self.tasks_config.suggestion_points) {
            Ok(task) => task,
            Err(err) => {
                self.reject(err);
                return None;
            }
        };
        let mut tasks = self.state().tasks;
        tasks.push(task.clone());
        self.write(StoreKey::TodoList, &tasks).then_some(())?;
        self.notify(Notification::success("Suggested task added to the to-do list!"));
        Some(task)
    }

    // ---- coaching ----

    pub async fn mentor_help(&self, mentor: &str, doubt: &str) -> Option<String> {
        if mentor.trim().is_empty() || doubt.trim().is_empty() {
            self.notify(Notification::error("Select a mentor and a question."));
            return None;
        }
        let _guard = self.begin(Operation::MentorHelp)?;
        let memory = self.state().memory;
        let answer = self
            .ai
            .complete_text(&prompts::mentor_help(mentor.trim(), &memory, doubt.trim()))
            .await;
        (!answer.is_empty()).then_some(answer)
    }

    pub async fn generate_report(&self) -> Option<String> {
        let _guard = self.begin(Operation::Report)?;
        let state = self.state();
        let ctx = ReportContext {
            memory: &state.memory,
            pillars: &state.pillars,
            goals: &state.goals,
            tasks: &state.tasks,
            financial: &state.financial,
            reviews: &state.reviews,
        };
        let report = self.ai.complete_text(&prompts::strategic_report(&ctx)).await;
        (!report.is_empty()).then_some(report)
    }

    // ---- memory, settings, finances ----

    pub fn save_memory(&self, text: &str) -> bool {
        let ok = self.write(StoreKey::AiMemories, text);
        if ok {
            self.notify(Notification::success("AI memory saved!"));
        }
        ok
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        let ok = self.write(StoreKey::Settings, settings);
        if ok {
            self.notify(Notification::success("Settings saved!"));
        }
        ok
    }

    /// Edit the settings document in place and save it.
    pub fn update_settings<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut Settings) -> Result<(), ValidationError>,
    {
        let mut settings = self.state().settings;
        if let Err(err) = edit(&mut settings) {
            self.reject(err);
            return false;
        }
        self.save_settings(&settings)
    }

    pub fn upsert_financial(&self, entry: FinancialEntry) -> bool {
        let history = self.state().financial;
        let ok = self.write(StoreKey::FinancialData, &upsert_entry(&history, entry));
        if ok {
            self.notify(Notification::success("Financial data saved!"));
        }
        ok
    }

    // ---- dashboard ----

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let state = self.state();
        Dashboard {
            pillars: state
                .pillars
                .iter()
                .map(|(pillar, xp)| {
                    let progress = state.pillars.level(pillar);
                    PillarLevel {
                        pillar,
                        xp,
                        progress,
                        percent: progress.percent(),
                    }
                })
                .collect(),
            streak: state.streak,
            runway_months: state.settings.runway_months(),
            kpis: state
                .settings
                .kpis
                .iter()
                .map(|k| KpiProgress {
                    name: k.name.clone(),
                    percent: k.progress_pct(),
                })
                .collect(),
            goal_of_the_day: goals::goal_of_the_day(&state.goals, today.ordinal()).cloned(),
            recent_scores: review::recent_scores(&state.reviews, 30),
            open_tasks: task::open_tasks(&state.tasks).len(),
            completed_tasks: task::completed_tasks(&state.tasks).len(),
            latest_savings: state.financial.last().map(FinancialEntry::savings),
        }
    }
}

impl<S: DocumentStore, C: CompletionService> Drop for LifeOs<S, C> {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            self.store.unsubscribe(subscription);
        }
    }
}
