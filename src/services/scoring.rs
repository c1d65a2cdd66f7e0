//! Deterministic answer scoring.
//!
//! Difficulty sets the ceiling and the time taken decays it linearly, with a
//! floor so a correct answer at the wire still pays out.

use crate::dao::models::Difficulty;

/// Share of the base points a correct answer always keeps.
const MIN_TIME_BONUS: f64 = 0.1;

/// Breakdown of the points awarded for one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerScore {
    /// Points actually awarded.
    pub points: u32,
    /// Maximum points the question's difficulty allows.
    pub base_points: u32,
    /// Share of the base points kept after the time decay, in percent.
    pub time_bonus_percent: u8,
}

/// Maximum points for a question of the given difficulty.
pub fn base_points(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 500,
        Difficulty::Medium => 1_000,
        Difficulty::Hard => 1_500,
    }
}

/// Score one answer.
///
/// Incorrect answers score zero. Correct answers keep
/// `max(10%, 1 - answerTime/duration)` of the difficulty's base points,
/// rounded to the nearest point; answer times beyond the duration count as
/// the full duration.
pub fn score_answer(
    is_correct: bool,
    difficulty: Difficulty,
    answer_time_ms: u64,
    question_duration_ms: u64,
) -> AnswerScore {
    let base = base_points(difficulty);

    if !is_correct {
        return AnswerScore {
            points: 0,
            base_points: base,
            time_bonus_percent: 0,
        };
    }

    let duration = question_duration_ms.max(1) as f64;
    let time_percentage = (answer_time_ms as f64 / duration).min(1.0);
    let bonus = (1.0 - time_percentage).max(MIN_TIME_BONUS);

    AnswerScore {
        points: (f64::from(base) * bonus).round() as u32,
        base_points: base,
        time_bonus_percent: (bonus * 100.0).round() as u8,
    }
}
