//! Prompt builders.
//!
//! Every prompt embeds the user's memory text plus whatever serialized state
//! the request needs. The completion protocol itself never inspects them.

use indoc::formatdoc;
use serde::Serialize;

use crate::finance::FinancialEntry;
use crate::goals::LifeGoal;
use crate::pillar::PillarXp;
use crate::review::{AnsweredQuestion, DailyReviewRecord};
use crate::task::{OpenTaskSnapshot, Task};

/// Fixed questions offered to the mentor.
pub const MENTOR_DOUBTS: [&str; 4] = [
    "I don't know what to do!",
    "What is my priority?",
    "How am I doing?",
    "Give me advice based on my situation!",
];

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Inputs for the strategic report.
pub struct ReportContext<'a> {
    pub memory: &'a str,
    pub pillars: &'a PillarXp,
    pub goals: &'a [LifeGoal],
    pub tasks: &'a [Task],
    pub financial: &'a [FinancialEntry],
    pub reviews: &'a [DailyReviewRecord],
}

/// Full coaching report: strategy, strengths, risks, next-week plan.
pub fn strategic_report(ctx: &ReportContext<'_>) -> String {
    let completed: Vec<&Task> = ctx.tasks.iter().filter(|t| t.completed).collect();
    let open: Vec<&Task> = ctx.tasks.iter().filter(|t| !t.completed).take(10).collect();

    formatdoc! {"
        You are my personal strategic coach. Analyse the following data from my \"Life OS\" and produce a complete, actionable report.

        **1. Context and core memory (who I am):**
        {memory}

        **2. Current state of the pillars (XP):**
        {pillars}

        **3. Life goals (my long-term vision):**
        {goals}

        **4. Recent tasks:**
        - Completed: {completed}
        - To do: {open}

        **5. Recent financial data (last 3 months):**
        {financial}

        **6. Recent daily reviews (last 7):**
        {reviews}

        **TASK:**
        Using ALL of the data above, write a structured Markdown report with these sections:

        ### 1. Overall strategic analysis
        A high-level assessment (2-3 sentences) of how I am doing against my vision and goals. Are my daily actions aligned with my long-term goals?

        ### 2. Strengths and recent wins
        Identify 2-3 clear successes or positive patterns in the data.

        ### 3. Areas to improve and risks
        Identify 2-3 weaknesses, risks or negative patterns.

        ### 4. Action plan for next week
        Give 3 concrete, prioritised actions for next week that address the weak areas and speed up progress towards the goals. Be specific.
        ",
        memory = ctx.memory,
        pillars = to_json(ctx.pillars),
        goals = to_json(ctx.goals),
        completed = to_json(tail(&completed, 10)),
        open = to_json(&open),
        financial = to_json(tail(ctx.financial, 3)),
        reviews = to_json(tail(ctx.reviews, 7)),
    }
}

/// Short motivating analysis of today's review answers.
pub fn review_analysis(memory: &str, transcript: &[AnsweredQuestion]) -> String {
    formatdoc! {"
        Context about me: {memory}

        Today I answered my daily review like this:
        {answers}

        Give a concise (at most 3 sentences), motivating analysis of my day, linking the answers to my overall goals. Be a coach, not a summariser.
        ",
        memory = memory,
        answers = to_json(transcript),
    }
}

/// Ask for 3-5 concrete subtasks as `{"tasks": [...]}`.
pub fn subdivision(goal: &str) -> String {
    formatdoc! {r#"
        Break this main goal into a list of 3-5 concrete, actionable subtasks. Goal: "{goal}". Reply with a JSON object with a single key "tasks" holding an array of strings. Example: {{"tasks": ["Research initial data", "Outline the report structure", "Write the first draft"]}}.
        "#,
        goal = goal,
    }
}

/// Ask for a bucket classification of the open-task view.
pub fn prioritization(memory: &str, snapshot: &OpenTaskSnapshot) -> String {
    formatdoc! {r#"
        Context about me and my goals: {memory}

        This is my current to-do list:
        {lines}

        Analyse the list against my goals. Pick 1 high-priority task, up to 3 medium-priority tasks and up to 5 low-priority tasks. Reply with a JSON object with keys "high", "medium", "low" holding the numeric indices of the tasks. Example: {{"high": [2], "medium": [0, 4], "low": [1, 3]}}
        "#,
        memory = memory,
        lines = snapshot.numbered_lines(),
    }
}

/// Ask for one small action towards a life goal, phrased as a task.
pub fn goal_action(memory: &str, goals: &[LifeGoal]) -> String {
    let goals = goals
        .iter()
        .map(|g| g.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    formatdoc! {"
        Context: {memory}

        Life goals: {goals}

        Pick one of the goals and suggest one small, concrete action I can take TODAY to get closer to it. Phrase the answer as a task to add to my to-do list. Reply with the task text only.
        ",
        memory = memory,
        goals = goals,
    }
}

/// Role-play a named mentor answering one of [`MENTOR_DOUBTS`].
pub fn mentor_help(mentor: &str, memory: &str, doubt: &str) -> String {
    formatdoc! {r#"
        Act as my mentor, {mentor}. Be as direct, wise and incisive as they are. Based on what I have shared about myself: "{memory}", answer this specific request: "{doubt}". Give a strategic, actionable answer.
        "#,
        mentor = mentor,
        memory = memory,
        doubt = doubt,
    }
}
