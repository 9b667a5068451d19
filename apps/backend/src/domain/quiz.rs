//! Quiz run: three questions, one per difficulty tier.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Question;
use crate::errors::domain::{ActionKind, DomainError};

/// Answer submitted by clients when the question timer runs out.
pub const TIMED_OUT_ANSWER: &str = "__timeout__";

/// Used when a quiz card carries no reward string.
pub const DEFAULT_REWARD_PATTERN: &str = "1b;2b;3b";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRun {
    pub theme: String,
    pub questions: Vec<Question>,
    /// Berries awarded per question rank.
    pub rewards: Vec<u32>,
    pub cursor: usize,
    pub correct: u32,
    pub earned: u32,
    /// Set once the question at `cursor - 1` has been answered.
    pub awaiting_next: bool,
}

/// Question as shown to clients (no answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_index: usize,
    pub total_questions: usize,
    pub theme: String,
    pub difficulty: u8,
    pub description: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub correct: bool,
    pub correct_answer: String,
    pub reward: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub correct_answers: u32,
    pub total_questions: usize,
    pub earned_berries: u32,
}

/// What follows an answered question once the pacing delay elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Next(QuestionView),
    Finished(QuizSummary),
}

impl QuizRun {
    pub fn new(theme: String, questions: Vec<Question>, rewards: Vec<u32>) -> Self {
        Self {
            theme,
            questions,
            rewards,
            cursor: 0,
            correct: 0,
            earned: 0,
            awaiting_next: false,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    /// The open question, if one is waiting for an answer.
    pub fn current_view(&self) -> Option<QuestionView> {
        if self.awaiting_next {
            return None;
        }
        self.questions.get(self.cursor).map(|q| QuestionView {
            question_index: self.cursor,
            total_questions: self.total(),
            theme: self.theme.clone(),
            difficulty: q.difficulty,
            description: q.description.clone(),
            options: q.options.clone(),
        })
    }

    /// Score one answer. The cursor advances exactly once per question;
    /// repeated or stale submissions are rejected without side effects.
    pub fn answer(
        &mut self,
        answer: &str,
        question_index: Option<usize>,
    ) -> Result<AnswerOutcome, DomainError> {
        if self.awaiting_next || self.is_exhausted() {
            return Err(DomainError::invalid(
                ActionKind::NoActiveQuestion,
                "no question is waiting for an answer",
            ));
        }
        if let Some(idx) = question_index {
            if idx != self.cursor {
                return Err(DomainError::invalid(
                    ActionKind::StaleAnswer,
                    format!("answer for question {idx}, current is {}", self.cursor),
                ));
            }
        }
        let question = &self.questions[self.cursor];
        let correct = answer != TIMED_OUT_ANSWER && answer.trim() == question.answer.trim();
        let reward = if correct {
            self.rewards.get(self.cursor).copied().unwrap_or(0)
        } else {
            0
        };
        let outcome = AnswerOutcome {
            question_index: self.cursor,
            correct,
            correct_answer: question.answer.clone(),
            reward,
        };
        if correct {
            self.correct += 1;
            self.earned += reward;
        }
        self.cursor += 1;
        self.awaiting_next = true;
        Ok(outcome)
    }

    /// Lift the guard after the pacing delay and report what comes next.
    /// Returns `None` when no answer is pending (stale timer).
    pub fn release(&mut self) -> Option<QuizStep> {
        if !self.awaiting_next {
            return None;
        }
        self.awaiting_next = false;
        match self.current_view() {
            Some(view) => Some(QuizStep::Next(view)),
            None => Some(QuizStep::Finished(self.summary())),
        }
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            correct_answers: self.correct,
            total_questions: self.total(),
            earned_berries: self.earned,
        }
    }
}
