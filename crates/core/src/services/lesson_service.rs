use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::analytics::QuizProgress;
use crate::models::lesson::{
    Difficulty, Lesson, LessonCategory, LessonSortOrder, Quiz, QuizRecord, QuizResult,
};
use crate::models::sandbox::SandboxState;

/// Shapes lesson lists and grades quizzes.
///
/// Lessons arrive pre-fetched from the backend; everything here is
/// client-side filtering, sorting, and searching of those lists, plus
/// grading against the sandbox's quiz records.
pub struct LessonService;

impl LessonService {
    pub fn new() -> Self {
        Self
    }

    /// Lessons in one category, preserving fetch order.
    pub fn filter_by_category<'a>(
        &self,
        lessons: &'a [Lesson],
        category: LessonCategory,
    ) -> Vec<&'a Lesson> {
        lessons.iter().filter(|l| l.category == category).collect()
    }

    /// Lessons at one difficulty tier, preserving fetch order.
    pub fn filter_by_difficulty<'a>(
        &self,
        lessons: &'a [Lesson],
        difficulty: Difficulty,
    ) -> Vec<&'a Lesson> {
        lessons
            .iter()
            .filter(|l| l.difficulty == difficulty)
            .collect()
    }

    /// Case-insensitive search over title and summary.
    pub fn search<'a>(&self, lessons: &'a [Lesson], query: &str) -> Vec<&'a Lesson> {
        let q = query.to_lowercase();
        lessons
            .iter()
            .filter(|l| {
                l.title.to_lowercase().contains(&q) || l.summary.to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Lessons in an explicit sort order.
    pub fn sorted<'a>(
        &self,
        lessons: &'a [Lesson],
        order: &LessonSortOrder,
    ) -> Vec<&'a Lesson> {
        let mut sorted: Vec<&Lesson> = lessons.iter().collect();
        match order {
            LessonSortOrder::TitleAsc => sorted.sort_by(|a, b| a.title.cmp(&b.title)),
            LessonSortOrder::TitleDesc => sorted.sort_by(|a, b| b.title.cmp(&a.title)),
            LessonSortOrder::DifficultyAsc => {
                sorted.sort_by(|a, b| a.difficulty.cmp(&b.difficulty));
            }
            LessonSortOrder::DifficultyDesc => {
                sorted.sort_by(|a, b| b.difficulty.cmp(&a.difficulty));
            }
        }
        sorted
    }

    /// Grade an answer and record it in the sandbox state.
    ///
    /// Every submission is recorded, including repeat attempts at the
    /// same quiz — the progress view counts attempts, not quizzes.
    pub fn grade(
        &self,
        state: &mut SandboxState,
        quiz: &Quiz,
        chosen_index: usize,
        at: DateTime<Utc>,
    ) -> Result<QuizResult, CoreError> {
        if chosen_index >= quiz.choices.len() {
            return Err(CoreError::Validation(format!(
                "Choice index {chosen_index} is out of bounds for a quiz with {} choices",
                quiz.choices.len()
            )));
        }

        let correct = chosen_index == quiz.answer_index;
        state.quiz_records.push(QuizRecord {
            quiz_id: quiz.id,
            lesson_id: quiz.lesson_id,
            chosen_index,
            correct,
            answered_at: at,
        });

        Ok(QuizResult {
            correct,
            answer_index: quiz.answer_index,
            explanation: quiz.explanation.clone(),
        })
    }

    /// Overall quiz progress across all recorded answers.
    pub fn progress(&self, state: &SandboxState) -> QuizProgress {
        let answered = state.quiz_records.len();
        let correct = state.quiz_records.iter().filter(|r| r.correct).count();
        let accuracy_pct = if answered > 0 {
            correct as f64 / answered as f64 * 100.0
        } else {
            0.0
        };
        QuizProgress {
            answered,
            correct,
            accuracy_pct,
        }
    }

    /// Progress split by lesson category. Records whose lesson is no
    /// longer in the fetched list are skipped — the category lives on
    /// the lesson, not the record.
    pub fn progress_by_category(
        &self,
        state: &SandboxState,
        lessons: &[Lesson],
    ) -> HashMap<LessonCategory, QuizProgress> {
        let category_by_lesson: HashMap<u64, LessonCategory> =
            lessons.iter().map(|l| (l.id, l.category)).collect();

        let mut counts: HashMap<LessonCategory, (usize, usize)> = HashMap::new();
        for record in &state.quiz_records {
            let Some(&category) = category_by_lesson.get(&record.lesson_id) else {
                continue;
            };
            let (answered, correct) = counts.entry(category).or_insert((0, 0));
            *answered += 1;
            if record.correct {
                *correct += 1;
            }
        }

        counts
            .into_iter()
            .map(|(category, (answered, correct))| {
                let accuracy_pct = if answered > 0 {
                    correct as f64 / answered as f64 * 100.0
                } else {
                    0.0
                };
                (
                    category,
                    QuizProgress {
                        answered,
                        correct,
                        accuracy_pct,
                    },
                )
            })
            .collect()
    }
}

impl Default for LessonService {
    fn default() -> Self {
        Self::new()
    }
}
