use crate::message::*;
use crate::quiz::{edit, evaluate, QuizState};
use futures::channel::mpsc::*;
use futures::*;
use log::*;
use std::collections::{HashMap, HashSet};
use std::pin::Pin;

/// The shared editing session.
///
/// Owns the authoritative quiz snapshots. Editors send discrete edit
/// operations; the room runs them through the reducer, commits the resulting
/// snapshot and broadcasts it. The snapshots themselves are never mutated in
/// place.
pub struct EditorRoom {
    pub quizzes: HashMap<String, QuizState>,

    pub editors: HashMap<String, UnboundedSender<ToEditorMessage>>,

    receiver: UnboundedReceiver<(String, FromEditorMessage)>,

    new_editor_receiver: UnboundedReceiver<(String, UnboundedSender<ToEditorMessage>)>,
}

impl EditorRoom {
    pub fn new(
        new_editor_receiver: UnboundedReceiver<(String, UnboundedSender<ToEditorMessage>)>,
        quizzes: HashMap<String, QuizState>,
    ) -> (Self, UnboundedSender<(String, FromEditorMessage)>) {
        let (sender, receiver) = unbounded();

        let room = EditorRoom {
            quizzes,
            editors: Default::default(),

            receiver,

            new_editor_receiver,
        };

        info!("EditorRoom started with {} quizzes", room.quizzes.len());

        (room, sender)
    }

    /// The session main loop
    pub async fn run(mut self: Pin<&mut Self>) {
        loop {
            let EditorRoom {
                quizzes: _,
                editors: _,
                receiver,
                new_editor_receiver,
            } = &mut *self;

            let mut editor_message = receiver.next();
            let mut new_editor = new_editor_receiver.next();

            select! {
                editor_message = editor_message => {
                    let (editor, message) = match editor_message {
                        Some(v) => v,
                        _ => return,
                    };
                    self.handle_editor_message(editor, message);
                },
                new_editor = new_editor => {
                    let (editor, sender) = match new_editor {
                        Some(v) => v,
                        _ => return,
                    };
                    self.join_editor(editor, sender);
                },
            };
        }
    }

    /// React to a message sent by an editor
    fn handle_editor_message(&mut self, editor: String, message: FromEditorMessage) {
        info!("Received message from {}: {:?}", editor, message);

        match message {
            // An editor has disconnected
            FromEditorMessage::Disconnect => {
                let mut dropped_editors = HashSet::new();
                dropped_editors.insert(editor);
                self.handle_dropped_editors(dropped_editors);
            }

            // Only valid as the first message on a fresh connection
            FromEditorMessage::Initialize { .. } => (),

            FromEditorMessage::CreateQuiz { quiz } => self.create_quiz(editor, quiz),

            FromEditorMessage::Edit { quiz, op } => self.apply_edit(editor, quiz, op),

            FromEditorMessage::Submit { quiz, answers } => {
                self.score_submission(editor, quiz, answers)
            }

            FromEditorMessage::Practice { quiz } => self.send_practice_sheet(editor, quiz),
        }
    }

    /// Run one edit through the reducer. A successful edit is committed and
    /// broadcast to everyone; a rejected edit goes back to the sender only.
    fn apply_edit(&mut self, editor: String, quiz: String, op: edit::EditOp) {
        let state = match self.quizzes.get(&quiz) {
            Some(v) => v,
            None => {
                self.reject(&editor, quiz, "unknown quiz".to_string());
                return;
            }
        };

        match edit::apply(state, op) {
            Ok(next) => {
                self.quizzes.insert(quiz.clone(), next.clone());
                self.broadcast(ToEditorMessage::QuizSnapshot { quiz, state: next });
            }
            Err(err) => self.reject(&editor, quiz, err.to_string()),
        }
    }

    fn create_quiz(&mut self, editor: String, quiz: String) {
        if self.quizzes.contains_key(&quiz) {
            self.reject(&editor, quiz, "quiz already exists".to_string());
            return;
        }

        let state = QuizState::default();
        self.quizzes.insert(quiz.clone(), state.clone());
        self.broadcast_quizzes();
        self.broadcast(ToEditorMessage::QuizSnapshot { quiz, state });
    }

    fn score_submission(&mut self, editor: String, quiz: String, answers: Vec<Option<usize>>) {
        let report = match self.quizzes.get(&quiz) {
            Some(state) => evaluate::evaluate(state, &answers),
            None => {
                self.reject(&editor, quiz, "unknown quiz".to_string());
                return;
            }
        };

        self.send_to(&editor, ToEditorMessage::Score { quiz, report });
    }

    fn send_practice_sheet(&mut self, editor: String, quiz: String) {
        let questions = match self.quizzes.get(&quiz) {
            Some(state) => evaluate::practice_order(state)
                .into_iter()
                .map(|i| (i, state.questions[i].clone()))
                .collect(),
            None => {
                self.reject(&editor, quiz, "unknown quiz".to_string());
                return;
            }
        };

        self.send_to(&editor, ToEditorMessage::PracticeSheet { quiz, questions });
    }

    fn reject(&mut self, editor: &str, quiz: String, reason: String) {
        warn!("Rejecting edit of {} by {}: {}", quiz, editor, reason);

        self.send_to(editor, ToEditorMessage::EditRejected { quiz, reason });
    }

    fn join_editor(&mut self, name: String, sender: UnboundedSender<ToEditorMessage>) {
        let quizzes = self.quiz_names();

        if sender
            .unbounded_send(ToEditorMessage::QuizList { quizzes })
            .is_err()
        {
            return;
        }

        self.editors.insert(name, sender);
        self.broadcast_editors();
    }

    fn quiz_names(&self) -> Vec<String> {
        let mut quizzes: Vec<String> = self.quizzes.keys().cloned().collect();
        quizzes.sort();
        quizzes
    }

    /// Send to a single editor, pruning it on a closed channel
    fn send_to(&mut self, editor: &str, message: ToEditorMessage) {
        let sender = match self.editors.get(editor) {
            Some(v) => v,
            None => return,
        };

        if sender.unbounded_send(message).is_err() {
            let mut dropped_editors = HashSet::new();
            dropped_editors.insert(editor.to_string());
            self.handle_dropped_editors(dropped_editors);
        }
    }

    /// Broadcast the list of connected editors
    fn broadcast_editors(&mut self) {
        let editors = self.editors.keys().cloned().collect();

        self.broadcast(ToEditorMessage::EditorList { editors })
    }

    /// Broadcast the list of quizzes
    fn broadcast_quizzes(&mut self) {
        let quizzes = self.quiz_names();

        self.broadcast(ToEditorMessage::QuizList { quizzes })
    }

    /// Broadcast a message to all editors
    fn broadcast(&mut self, message: ToEditorMessage) {
        info!("Broadcast {:?}", message);

        let mut dropped_editors = HashSet::new();

        for (editor, sender) in self.editors.iter() {
            if sender.unbounded_send(message.clone()).is_err() {
                dropped_editors.insert(editor.clone());
            }
        }

        self.handle_dropped_editors(dropped_editors);
    }

    /// Take care of editors that have dropped
    ///
    /// The remaining editors must be informed
    fn handle_dropped_editors(&mut self, dropped_editors: HashSet<String>) {
        if dropped_editors.is_empty() {
            return;
        }

        self.editors.retain(|key, _| !dropped_editors.contains(key));
        self.broadcast_editors();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::edit::EditOp;
    use crate::quiz::Question;

    fn room_with_capitals() -> (EditorRoom, UnboundedSender<(String, FromEditorMessage)>) {
        let (_, new_editor_receiver) = unbounded();

        let mut quizzes = HashMap::new();
        quizzes.insert(
            "capitals".to_string(),
            QuizState {
                questions: vec![Question {
                    text: "Capital of France?".to_string(),
                    answers: vec!["Paris".to_string(), "London".to_string()],
                }],
                correct_answers: vec![Some(0)],
            },
        );

        EditorRoom::new(new_editor_receiver, quizzes)
    }

    fn join(room: &mut EditorRoom, name: &str) -> UnboundedReceiver<ToEditorMessage> {
        let (sender, receiver) = unbounded();
        room.join_editor(name.to_string(), sender);
        receiver
    }

    fn drain(receiver: &mut UnboundedReceiver<ToEditorMessage>) -> Vec<ToEditorMessage> {
        let mut messages = Vec::new();
        while let Ok(Some(message)) = receiver.try_next() {
            messages.push(message);
        }
        messages
    }

    #[test]
    fn joining_editor_receives_quiz_list() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");

        let messages = drain(&mut ada);
        assert_eq!(
            messages[0],
            ToEditorMessage::QuizList {
                quizzes: vec!["capitals".to_string()],
            }
        );
    }

    #[test]
    fn committed_edit_is_broadcast_to_all_editors() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        let mut ben = join(&mut room, "ben");

        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::Edit {
                quiz: "capitals".to_string(),
                op: EditOp::AddQuestion,
            },
        );

        let expected = ToEditorMessage::QuizSnapshot {
            quiz: "capitals".to_string(),
            state: room.quizzes["capitals"].clone(),
        };
        assert_eq!(drain(&mut ada).last(), Some(&expected));
        assert_eq!(drain(&mut ben).last(), Some(&expected));
        assert_eq!(room.quizzes["capitals"].questions.len(), 2);
    }

    #[test]
    fn rejected_edit_goes_to_the_sender_only() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        let mut ben = join(&mut room, "ben");
        drain(&mut ada);
        drain(&mut ben);

        let before = room.quizzes["capitals"].clone();
        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::Edit {
                quiz: "capitals".to_string(),
                op: EditOp::RemoveQuestion { question: 7 },
            },
        );

        let to_ada = drain(&mut ada);
        assert_eq!(to_ada.len(), 1);
        match &to_ada[0] {
            ToEditorMessage::EditRejected { quiz, .. } => assert_eq!(quiz, "capitals"),
            other => panic!("expected EditRejected, got {:?}", other),
        }
        assert!(drain(&mut ben).is_empty());
        assert_eq!(room.quizzes["capitals"], before);
    }

    #[test]
    fn edit_of_unknown_quiz_is_rejected() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        drain(&mut ada);

        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::Edit {
                quiz: "nope".to_string(),
                op: EditOp::AddQuestion,
            },
        );

        match drain(&mut ada).as_slice() {
            [ToEditorMessage::EditRejected { quiz, reason }] => {
                assert_eq!(quiz, "nope");
                assert_eq!(reason, "unknown quiz");
            }
            other => panic!("expected one EditRejected, got {:?}", other),
        }
    }

    #[test]
    fn create_quiz_starts_from_the_default_state_and_rejects_duplicates() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        drain(&mut ada);

        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::CreateQuiz {
                quiz: "fresh".to_string(),
            },
        );

        assert_eq!(room.quizzes["fresh"], QuizState::default());
        let messages = drain(&mut ada);
        assert!(messages.contains(&ToEditorMessage::QuizList {
            quizzes: vec!["capitals".to_string(), "fresh".to_string()],
        }));

        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::CreateQuiz {
                quiz: "fresh".to_string(),
            },
        );

        match drain(&mut ada).as_slice() {
            [ToEditorMessage::EditRejected { reason, .. }] => {
                assert_eq!(reason, "quiz already exists");
            }
            other => panic!("expected one EditRejected, got {:?}", other),
        }
    }

    #[test]
    fn submission_is_scored_against_the_current_snapshot() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        drain(&mut ada);

        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::Submit {
                quiz: "capitals".to_string(),
                answers: vec![Some(0)],
            },
        );

        match drain(&mut ada).as_slice() {
            [ToEditorMessage::Score { quiz, report }] => {
                assert_eq!(quiz, "capitals");
                assert_eq!(report.total, 1);
                assert_eq!(report.correct, 1);
            }
            other => panic!("expected one Score, got {:?}", other),
        }
    }

    #[test]
    fn practice_sheet_covers_every_question_with_stored_indices() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        drain(&mut ada);

        room.handle_editor_message(
            "ada".to_string(),
            FromEditorMessage::Practice {
                quiz: "capitals".to_string(),
            },
        );

        match drain(&mut ada).as_slice() {
            [ToEditorMessage::PracticeSheet { questions, .. }] => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].0, 0);
                assert_eq!(questions[0].1, room.quizzes["capitals"].questions[0]);
            }
            other => panic!("expected one PracticeSheet, got {:?}", other),
        }
    }

    #[test]
    fn disconnect_prunes_the_editor_and_informs_the_rest() {
        let (mut room, _sender) = room_with_capitals();
        let mut ada = join(&mut room, "ada");
        let mut ben = join(&mut room, "ben");
        drain(&mut ada);
        drain(&mut ben);

        room.handle_editor_message("ada".to_string(), FromEditorMessage::Disconnect);

        assert!(!room.editors.contains_key("ada"));
        assert_eq!(
            drain(&mut ben),
            vec![ToEditorMessage::EditorList {
                editors: vec!["ben".to_string()],
            }]
        );
    }
}
