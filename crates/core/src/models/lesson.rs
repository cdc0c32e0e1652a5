use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic bucket a lesson belongs to. Drives the category tabs in the
/// lesson list and the per-category progress breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonCategory {
    /// Allowances, piggy banks, saving goals
    Saving,
    /// Stocks, funds, risk and return
    Investing,
    /// Budgets, smart spending, wants vs. needs
    Spending,
    /// Prices, inflation, how markets work
    Economy,
}

impl std::fmt::Display for LessonCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonCategory::Saving => write!(f, "Saving"),
            LessonCategory::Investing => write!(f, "Investing"),
            LessonCategory::Spending => write!(f, "Spending"),
            LessonCategory::Economy => write!(f, "Economy"),
        }
    }
}

/// Difficulty tier shown next to each lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "Beginner"),
            Difficulty::Intermediate => write!(f, "Intermediate"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Sort order for lesson listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonSortOrder {
    TitleAsc,
    TitleDesc,
    /// Easiest first
    DifficultyAsc,
    /// Hardest first
    DifficultyDesc,
}

/// One concept lesson as fetched from the backend.
/// The core only shapes lists of these; authoring lives server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Backend-assigned identifier
    pub id: u64,

    pub title: String,

    pub category: LessonCategory,

    pub difficulty: Difficulty,

    /// One-line teaser shown in the lesson list
    pub summary: String,

    /// Full lesson body (markdown)
    pub body: String,
}

/// One multiple-choice question attached to a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Backend-assigned identifier
    pub id: u64,

    /// Lesson this quiz belongs to
    pub lesson_id: u64,

    pub question: String,

    /// Answer choices in display order
    pub choices: Vec<String>,

    /// Index into `choices` of the correct answer
    pub answer_index: usize,

    /// Shown after answering, right or wrong
    pub explanation: String,
}

/// A graded quiz answer, kept in the sandbox state so progress
/// survives save/load and feeds the parent report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub quiz_id: u64,
    pub lesson_id: u64,
    pub chosen_index: usize,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// What the UI shows immediately after an answer is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub correct: bool,
    pub answer_index: usize,
    pub explanation: String,
}
