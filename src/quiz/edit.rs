use crate::quiz::{Question, QuizState};
use serde_derive::*;
use thiserror::Error;

/// One discrete edit coming from the editor UI.
///
/// Mirrors the edit functions below one to one, so the wire protocol and the
/// reducer share a single dispatch point.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum EditOp {
    AddQuestion,
    RemoveQuestion {
        question: usize,
    },
    UpdateQuestionText {
        question: usize,
        text: String,
    },
    AddAnswer {
        question: usize,
    },
    UpdateAnswerText {
        question: usize,
        answer: usize,
        text: String,
    },
    RemoveAnswer {
        question: usize,
        answer: usize,
    },
    SetCorrectAnswer {
        question: usize,
        answer: usize,
    },
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum EditError {
    #[error("question index {index} out of range, quiz has {len} questions")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("answer index {index} out of range, question has {len} answers")]
    AnswerOutOfRange { index: usize, len: usize },
}

/// Apply one edit to a snapshot, producing the next snapshot.
///
/// The input is never mutated; the caller decides whether to commit the
/// result. Out-of-range indices are the only failure mode.
pub fn apply(state: &QuizState, op: EditOp) -> Result<QuizState, EditError> {
    match op {
        EditOp::AddQuestion => Ok(add_question(state)),
        EditOp::RemoveQuestion { question } => remove_question(state, question),
        EditOp::UpdateQuestionText { question, text } => {
            update_question_text(state, question, text)
        }
        EditOp::AddAnswer { question } => add_answer(state, question),
        EditOp::UpdateAnswerText {
            question,
            answer,
            text,
        } => update_answer_text(state, question, answer, text),
        EditOp::RemoveAnswer { question, answer } => remove_answer(state, question, answer),
        EditOp::SetCorrectAnswer { question, answer } => {
            set_correct_answer(state, question, answer)
        }
    }
}

/// Append a blank question together with its unset correct-answer slot.
pub fn add_question(state: &QuizState) -> QuizState {
    let mut next = state.clone();
    next.questions.push(Question::blank());
    next.correct_answers.push(None);
    next
}

/// Remove a question and its correct-answer slot.
pub fn remove_question(state: &QuizState, question: usize) -> Result<QuizState, EditError> {
    check_question(state, question)?;

    let mut next = state.clone();
    next.questions.remove(question);
    next.correct_answers.remove(question);
    Ok(next)
}

pub fn update_question_text(
    state: &QuizState,
    question: usize,
    text: String,
) -> Result<QuizState, EditError> {
    check_question(state, question)?;

    let mut next = state.clone();
    next.questions[question].text = text;
    Ok(next)
}

/// Append a blank answer. The correct-answer slot keeps pointing where it did.
pub fn add_answer(state: &QuizState, question: usize) -> Result<QuizState, EditError> {
    check_question(state, question)?;

    let mut next = state.clone();
    next.questions[question].answers.push(String::new());
    Ok(next)
}

pub fn update_answer_text(
    state: &QuizState,
    question: usize,
    answer: usize,
    text: String,
) -> Result<QuizState, EditError> {
    check_answer(state, question, answer)?;

    let mut next = state.clone();
    next.questions[question].answers[answer] = text;
    Ok(next)
}

/// Remove an answer and keep the correct-answer slot pointing at the answer it
/// pointed at before:
///
/// * the removed answer was the correct one: the slot becomes unset,
/// * the correct answer sat after the removed one: its index shifts down,
/// * the correct answer sat before the removed one: untouched.
pub fn remove_answer(
    state: &QuizState,
    question: usize,
    answer: usize,
) -> Result<QuizState, EditError> {
    check_answer(state, question, answer)?;

    let mut next = state.clone();
    next.questions[question].answers.remove(answer);
    next.correct_answers[question] = match next.correct_answers[question] {
        Some(correct) if correct == answer => None,
        Some(correct) if correct > answer => Some(correct - 1),
        other => other,
    };
    Ok(next)
}

pub fn set_correct_answer(
    state: &QuizState,
    question: usize,
    answer: usize,
) -> Result<QuizState, EditError> {
    check_answer(state, question, answer)?;

    let mut next = state.clone();
    next.correct_answers[question] = Some(answer);
    Ok(next)
}

fn check_question(state: &QuizState, question: usize) -> Result<(), EditError> {
    if question >= state.questions.len() {
        return Err(EditError::QuestionOutOfRange {
            index: question,
            len: state.questions.len(),
        });
    }
    Ok(())
}

fn check_answer(state: &QuizState, question: usize, answer: usize) -> Result<(), EditError> {
    check_question(state, question)?;

    let answers = state.questions[question].answers.len();
    if answer >= answers {
        return Err(EditError::AnswerOutOfRange {
            index: answer,
            len: answers,
        });
    }
    Ok(())
}
