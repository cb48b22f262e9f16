use crate::quiz::QuizState;
use rand::prelude::*;
use serde_derive::*;

/// How one graded question was answered.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct QuestionScore {
    pub question: usize,
    pub chosen: Option<usize>,
    pub correct: usize,
    pub is_correct: bool,
}

/// The outcome of grading a submission against a quiz snapshot.
///
/// Questions whose correct answer is still unset are not gradable and do not
/// appear here at all.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct ScoreReport {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub breakdown: Vec<QuestionScore>,
}

/// Grade a submission. `submitted[i]` is the choice made for `questions[i]`;
/// missing or `None` entries count as unanswered.
pub fn evaluate(state: &QuizState, submitted: &[Option<usize>]) -> ScoreReport {
    let mut report = ScoreReport {
        total: 0,
        answered: 0,
        correct: 0,
        breakdown: Vec::new(),
    };

    for question in 0..state.questions.len() {
        let correct = match state.correct_answers.get(question).copied().flatten() {
            Some(v) => v,
            None => continue,
        };

        let chosen = submitted.get(question).copied().flatten();
        let is_correct = chosen == Some(correct);

        report.total += 1;
        if chosen.is_some() {
            report.answered += 1;
        }
        if is_correct {
            report.correct += 1;
        }
        report.breakdown.push(QuestionScore {
            question,
            chosen,
            correct,
            is_correct,
        });
    }

    report
}

/// A shuffled order to pose the questions in during practice runs.
///
/// Only the question order is shuffled. Answer indices stay as stored, so a
/// submission built from a practice sheet still lines up with the snapshot.
pub fn practice_order(state: &QuizState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..state.questions.len()).collect();
    order.shuffle(&mut thread_rng());
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Question;

    fn quiz() -> QuizState {
        QuizState {
            questions: vec![
                Question {
                    text: "Capital of France?".to_string(),
                    answers: vec!["Paris".to_string(), "London".to_string()],
                },
                Question {
                    text: "Draft question".to_string(),
                    answers: vec!["".to_string()],
                },
                Question {
                    text: "2 + 2?".to_string(),
                    answers: vec!["3".to_string(), "4".to_string()],
                },
            ],
            correct_answers: vec![Some(0), None, Some(1)],
        }
    }

    #[test]
    fn grades_only_questions_with_a_correct_answer() {
        let report = evaluate(&quiz(), &[Some(0), Some(0), Some(0)]);

        assert_eq!(report.total, 2);
        assert_eq!(report.answered, 2);
        assert_eq!(report.correct, 1);
        assert_eq!(report.breakdown.len(), 2);
        assert_eq!(report.breakdown[1].question, 2);
        assert!(!report.breakdown[1].is_correct);
    }

    #[test]
    fn short_submissions_count_as_unanswered() {
        let report = evaluate(&quiz(), &[Some(0)]);

        assert_eq!(report.total, 2);
        assert_eq!(report.answered, 1);
        assert_eq!(report.correct, 1);
        assert_eq!(report.breakdown[1].chosen, None);
        assert!(!report.breakdown[1].is_correct);
    }

    #[test]
    fn empty_submission_scores_zero() {
        let report = evaluate(&quiz(), &[]);

        assert_eq!(report.total, 2);
        assert_eq!(report.answered, 0);
        assert_eq!(report.correct, 0);
    }

    #[test]
    fn practice_order_is_a_permutation_of_all_questions() {
        let mut order = practice_order(&quiz());
        order.sort();

        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn practice_order_of_empty_quiz_is_empty() {
        let state = QuizState {
            questions: vec![],
            correct_answers: vec![],
        };

        assert!(practice_order(&state).is_empty());
    }
}
