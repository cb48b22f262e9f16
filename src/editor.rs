use crate::message::{FromEditorMessage, ToEditorMessage};
use async_std::net::SocketAddr;
use async_std::net::TcpStream;
use async_tungstenite::WebSocketStream;
use futures::channel::mpsc::*;
use futures::*;
use log::*;
use tungstenite::Message;

pub struct Editor {
    pub name: String,
    pub stream: WebSocketStream<TcpStream>,
    pub address: SocketAddr,
}

impl Editor {
    /// Perform the WebSocket handshake and wait for the `Initialize` message.
    /// Anything else as the first message drops the connection.
    pub async fn accept(stream: TcpStream, address: SocketAddr) -> Option<Self> {
        let mut stream = async_tungstenite::accept_async(stream).await.ok()?;

        match Self::receive_from_editor_message(&mut stream).await? {
            FromEditorMessage::Initialize { name } => Some(Editor {
                name,
                stream,
                address,
            }),
            other => {
                warn!("{} sent {:?} before Initialize", address, other);
                None
            }
        }
    }

    async fn receive_from_editor_message(
        stream: &mut WebSocketStream<TcpStream>,
    ) -> Option<FromEditorMessage> {
        loop {
            let message = stream.next().await?.ok()?;

            match message {
                Message::Text(text) => match serde_json::from_str(&text) {
                    Ok(message) => return Some(message),
                    Err(err) => warn!("Dropping malformed frame: {}", err),
                },
                Message::Close(_) => return None,
                // Ping/pong are handled by the socket layer
                _ => (),
            }
        }
    }

    pub async fn send_message(&mut self, message: ToEditorMessage) -> Option<()> {
        let value = serde_json::to_string(&message).ok()?;
        self.stream.send(Message::Text(value)).await.ok()
    }

    /// Pump frames between the socket and the room until either side closes.
    pub async fn run(
        mut self,
        to_room: UnboundedSender<(String, FromEditorMessage)>,
        mut from_room: UnboundedReceiver<ToEditorMessage>,
    ) {
        loop {
            let mut from_editor = self.stream.next().fuse();
            let mut to_editor = from_room.next();

            let result = select! {
                from_editor = from_editor => {
                    match from_editor.and_then(|v| v.ok()) {
                        Some(Message::Text(text)) => {
                            match serde_json::from_str::<FromEditorMessage>(&text) {
                                Ok(message) => to_room
                                    .unbounded_send((self.name.clone(), message))
                                    .ok(),
                                Err(err) => {
                                    warn!("{}: malformed frame: {}", self.name, err);
                                    Some(())
                                }
                            }
                        }
                        Some(Message::Close(_)) | None => None,
                        Some(_) => Some(()),
                    }
                },
                to_editor = to_editor => {
                    match to_editor {
                        Some(message) => self.send_message(message).await,
                        None => None,
                    }
                },
            };

            if result.is_none() {
                let _ = to_room.unbounded_send((self.name.clone(), FromEditorMessage::Disconnect));
                return;
            }
        }
    }
}
