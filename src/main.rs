use crate::editor::Editor;
use crate::quiz::QuizState;
use crate::session::EditorRoom;
use async_std::net::TcpListener;
use futures::channel::mpsc::*;
use futures::executor::block_on;
use futures::*;
use log::*;
use std::collections::HashMap;
use walkdir::WalkDir;

pub mod editor;
pub mod message;
pub mod posts;
pub mod quiz;
pub mod session;
pub mod testimonial;

pub async fn run_server(quizzes: HashMap<String, QuizState>) {
    let listener = TcpListener::bind("127.0.0.1:8010")
        .await
        .expect("Could not open socket");

    let (new_editor_sender, new_editor_receiver) = unbounded();

    let (room, editor_message_sender) = EditorRoom::new(new_editor_receiver, quizzes);

    async_std::task::spawn(async move {
        pin_mut!(room);
        room.run().await;
    });

    while let Ok((stream, addr)) = listener.accept().await {
        let new_editor_sender = new_editor_sender.clone();
        let editor_message_sender = editor_message_sender.clone();

        async_std::task::spawn(async move {
            let editor = match Editor::accept(stream, addr).await {
                Some(v) => v,
                None => return,
            };

            info!("{} ({}) connected", editor.name, editor.address);

            let (to_editor_sender, to_editor_receiver) = unbounded();

            if new_editor_sender
                .unbounded_send((editor.name.clone(), to_editor_sender))
                .is_err()
            {
                return;
            }

            editor.run(editor_message_sender, to_editor_receiver).await;
        });
    }
}

/// Load seed quizzes from the `quizzes` directory.
///
/// One `.ron` file per quiz, named after the file stem. Files that do not
/// parse or break the state invariant are skipped with a warning instead of
/// taking the server down.
fn load_quizzes() -> HashMap<String, QuizState> {
    let mut result = HashMap::new();

    for file in WalkDir::new("quizzes")
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        match file.path().extension().map(|e| e.to_string_lossy()) {
            Some(v) if v == "ron" => (),
            _ => continue,
        }

        let name = match file.path().file_stem() {
            Some(v) => v.to_string_lossy().to_string(),
            None => continue,
        };

        let contents = match std::fs::read_to_string(file.path()) {
            Ok(v) => v,
            Err(err) => {
                warn!("Skipping {}: {}", file.path().display(), err);
                continue;
            }
        };

        let state: QuizState = match ron::de::from_str(&contents) {
            Ok(v) => v,
            Err(err) => {
                warn!("Skipping {}: {}", file.path().display(), err);
                continue;
            }
        };

        if let Err(err) = state.validate() {
            warn!("Skipping {}: {}", file.path().display(), err);
            continue;
        }

        result.insert(name, state);
    }

    info!("Loaded {} quizzes", result.len());

    result
}

fn main() {
    env_logger::init();

    let quizzes = load_quizzes();

    block_on(run_server(quizzes));
}
