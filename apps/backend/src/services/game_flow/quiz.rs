use tracing::info;

use super::{ActionOutcome, GameFlowService, Timer};
use crate::domain::cards::DIFFICULTY_TIERS;
use crate::domain::dispatch::{require_kind, CardKind};
use crate::domain::events::GameEvent;
use crate::domain::quiz::{QuizRun, QuizStep, DEFAULT_REWARD_PATTERN};
use crate::domain::rewards::parse_reward_pattern;
use crate::domain::session::{Phase, Session};
use crate::domain::turn::require_active_actor;
use crate::errors::domain::{ActionKind, DomainError, NotFoundKind};

impl GameFlowService {
    pub(super) async fn start_quiz(
        &mut self,
        session: &mut Session,
        player_id: &str,
        theme: &str,
    ) -> Result<ActionOutcome, DomainError> {
        require_active_actor(session, player_id)?;
        if session.phase != Phase::CardDrawn {
            return Err(DomainError::phase_mismatch(format!(
                "quiz cannot start during {}",
                session.phase.as_str()
            )));
        }
        let card = require_kind(session, CardKind::Quiz)?;
        let pattern = if card.reward.trim().is_empty() {
            DEFAULT_REWARD_PATTERN
        } else {
            card.reward.as_str()
        };
        let rewards = parse_reward_pattern(pattern)?;

        let mut questions = Vec::with_capacity(DIFFICULTY_TIERS.len());
        for tier in DIFFICULTY_TIERS {
            let question = self
                .catalog
                .random_question(theme, tier)
                .await?
                .ok_or_else(|| {
                    DomainError::not_found(
                        NotFoundKind::Question,
                        format!("no '{theme}' question of difficulty {tier}"),
                    )
                })?;
            questions.push(question);
        }

        let run = QuizRun::new(theme.to_string(), questions, rewards);
        let first = run
            .current_view()
            .ok_or_else(|| DomainError::invalid(ActionKind::NoActiveQuestion, "quiz is empty"))?;
        let total_questions = run.total();
        session.quiz = Some(run);
        session.phase = Phase::QuizInProgress;
        session.opening_draw = false;
        info!(game_id = %session.code, player_id, theme, "Quiz started");

        Ok(ActionOutcome::broadcast(vec![
            GameEvent::QuizStarted {
                theme: theme.to_string(),
                total_questions,
            },
            GameEvent::QuizQuestion { question: first },
        ]))
    }

    pub(super) fn quiz_answer(
        session: &mut Session,
        player_id: &str,
        answer: &str,
        question_index: Option<usize>,
    ) -> Result<ActionOutcome, DomainError> {
        require_active_actor(session, player_id)?;
        if session.phase != Phase::QuizInProgress {
            return Err(DomainError::invalid(
                ActionKind::NoActiveQuestion,
                "no quiz is running",
            ));
        }
        let run = session.quiz.as_mut().ok_or_else(|| {
            DomainError::invalid(ActionKind::NoActiveQuestion, "no quiz is running")
        })?;
        let outcome = run.answer(answer, question_index)?;
        Ok(ActionOutcome::broadcast(vec![GameEvent::QuizAnswerResult {
            question_index: outcome.question_index,
            is_correct: outcome.correct,
            correct_answer: outcome.correct_answer,
            reward: outcome.reward,
        }])
        .with_timer(Timer::NextQuestion {
            active_player_id: player_id.to_string(),
            answered_index: outcome.question_index,
        }))
    }

    /// Emit the next question, or finalise the quiz after the last one.
    pub(super) fn next_question(
        session: &mut Session,
        active_player_id: &str,
        answered_index: usize,
    ) -> Result<ActionOutcome, DomainError> {
        if session.phase != Phase::QuizInProgress || !session.is_active(active_player_id) {
            return Ok(ActionOutcome::idle());
        }
        let Some(run) = session.quiz.as_mut() else {
            return Ok(ActionOutcome::idle());
        };
        if run.cursor != answered_index + 1 {
            return Ok(ActionOutcome::idle());
        }
        let Some(step) = run.release() else {
            return Ok(ActionOutcome::idle());
        };

        match step {
            QuizStep::Next(question) => Ok(ActionOutcome::broadcast(vec![
                GameEvent::QuizQuestion { question },
            ])),
            QuizStep::Finished(summary) => {
                session.require_player_mut(active_player_id)?.berries += summary.earned_berries;
                session.phase = Phase::QuizResult;
                info!(
                    game_id = %session.code,
                    player_id = active_player_id,
                    correct = summary.correct_answers,
                    earned = summary.earned_berries,
                    "Quiz finished"
                );
                Ok(ActionOutcome::broadcast(vec![GameEvent::QuizEnd { summary }]))
            }
        }
    }
}
