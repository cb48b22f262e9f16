use crate::quiz::edit::EditOp;
use crate::quiz::evaluate::ScoreReport;
use crate::quiz::{Question, QuizState};
use serde_derive::*;

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum FromEditorMessage {
    Initialize { name: String },
    CreateQuiz { quiz: String },
    Edit { quiz: String, op: EditOp },
    Submit { quiz: String, answers: Vec<Option<usize>> },
    Practice { quiz: String },
    Disconnect,
}

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum ToEditorMessage {
    EditorList {
        editors: Vec<String>,
    },
    QuizList {
        quizzes: Vec<String>,
    },
    /// A committed snapshot; replaces whatever the editor holds for `quiz`.
    QuizSnapshot {
        quiz: String,
        state: QuizState,
    },
    EditRejected {
        quiz: String,
        reason: String,
    },
    Score {
        quiz: String,
        report: ScoreReport,
    },
    /// Questions in practice order, tagged with their stored indices.
    PracticeSheet {
        quiz: String,
        questions: Vec<(usize, Question)>,
    },
}
