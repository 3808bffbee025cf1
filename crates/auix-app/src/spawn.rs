//! Runs a view instance as a tokio task fed through an mpsc inbox.
//!
//! One task per client session; the task is the only owner of its state.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use auix_core::prelude::*;

use crate::instance::ViewInstance;
use crate::message::Message;
use crate::state::ViewState;

const INBOX_CAPACITY: usize = 64;

#[derive(Debug)]
enum Command {
    Dispatch(Message),
    Patch(String, oneshot::Sender<Result<()>>),
    Snapshot(oneshot::Sender<ViewState>),
}

/// Sending side of a spawned view instance.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    tx: mpsc::Sender<Command>,
}

impl ViewHandle {
    pub async fn dispatch(&self, message: Message) -> Result<()> {
        self.tx
            .send(Command::Dispatch(message))
            .await
            .map_err(|e| Error::inbox_closed(e.to_string()))
    }

    pub async fn patch(&self, path: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Patch(path.into(), reply))
            .await
            .map_err(|e| Error::inbox_closed(e.to_string()))?;
        rx.await
            .map_err(|_| Error::inbox_closed("instance stopped before replying"))?
    }

    /// Copy of the state after every earlier command was processed.
    pub async fn snapshot(&self) -> Result<ViewState> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot(reply))
            .await
            .map_err(|e| Error::inbox_closed(e.to_string()))?;
        rx.await
            .map_err(|_| Error::inbox_closed("instance stopped before replying"))
    }
}

/// Spawn `instance`; it stops when every handle is dropped.
pub fn spawn(instance: ViewInstance) -> (ViewHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(INBOX_CAPACITY);
    let task = tokio::spawn(async move {
        let mut instance = instance;
        while let Some(command) = rx.recv().await {
            match command {
                Command::Dispatch(message) => instance.dispatch(message),
                Command::Patch(path, reply) => {
                    let _ = reply.send(instance.patch(&path));
                }
                Command::Snapshot(reply) => {
                    let _ = reply.send(instance.state().clone());
                }
            }
        }
        debug!("View instance for {} stopped", instance.state().resource);
    });
    (ViewHandle { tx }, task)
}
