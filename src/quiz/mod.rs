pub mod edit;
pub mod evaluate;

use serde_derive::*;
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct Question {
    pub text: String,

    #[serde(default)]
    pub answers: Vec<String>,
}

impl Question {
    /// A fresh question as the editor first shows it: no text, one blank answer.
    pub fn blank() -> Self {
        Question {
            text: String::new(),
            answers: vec![String::new()],
        }
    }
}

/// The full quiz definition as the host persists it.
///
/// `correct_answers[i]` belongs to `questions[i]`: `None` means the editor has
/// not picked a correct answer yet, `Some(j)` points into
/// `questions[i].answers`. Both sequences always have the same length.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct QuizState {
    pub questions: Vec<Question>,

    #[serde(default)]
    pub correct_answers: Vec<Option<usize>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ValidationError {
    #[error("{questions} questions but {correct_answers} correct-answer entries")]
    LengthMismatch {
        questions: usize,
        correct_answers: usize,
    },
    #[error("question {question}: correct answer {index} out of range ({answers} answers)")]
    CorrectAnswerOutOfRange {
        question: usize,
        index: usize,
        answers: usize,
    },
}

impl Default for QuizState {
    fn default() -> Self {
        QuizState {
            questions: vec![Question::blank()],
            correct_answers: vec![None],
        }
    }
}

impl QuizState {
    /// Check the parallel-array invariant.
    ///
    /// The edit operations preserve it by construction, so this only runs on
    /// states that come from outside, i.e. seed files read from disk.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.len() != self.correct_answers.len() {
            return Err(ValidationError::LengthMismatch {
                questions: self.questions.len(),
                correct_answers: self.correct_answers.len(),
            });
        }

        for (i, question) in self.questions.iter().enumerate() {
            if let Some(index) = self.correct_answers[i] {
                if index >= question.answers.len() {
                    return Err(ValidationError::CorrectAnswerOutOfRange {
                        question: i,
                        index,
                        answers: question.answers.len(),
                    });
                }
            }
        }

        Ok(())
    }
}
