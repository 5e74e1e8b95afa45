//! The seam between page abstractions and a live browser

use async_trait::async_trait;

use crate::error::E2eResult;
use crate::protocol::Command;

/// Executes protocol commands against one isolated browser context.
///
/// Implementations must process commands in the order they are issued and
/// must release the context on [`Driver::close`] and on drop.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn execute(&self, command: Command) -> E2eResult<serde_json::Value>;

    async fn close(&self) -> E2eResult<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::E2eError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    type Answer = Box<dyn Fn(&Command) -> serde_json::Value + Send + Sync>;

    /// Records every command and answers from a closure. Optionally fails
    /// the n-th command (0-based) with an action failure.
    pub struct RecordingDriver {
        commands: Arc<Mutex<Vec<Command>>>,
        closed: Arc<AtomicBool>,
        fail_at: Option<usize>,
        answer: Answer,
    }

    /// Handle kept by the test to inspect a driver after it has been moved
    /// into a session.
    #[derive(Clone)]
    pub struct Recording {
        commands: Arc<Mutex<Vec<Command>>>,
        closed: Arc<AtomicBool>,
    }

    impl Recording {
        pub fn commands(&self) -> Vec<Command> {
            self.commands.lock().unwrap().clone()
        }

        pub fn ops(&self) -> Vec<&'static str> {
            self.commands().iter().map(Command::name).collect()
        }

        pub fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    impl RecordingDriver {
        pub fn new() -> (Self, Recording) {
            let commands = Arc::new(Mutex::new(Vec::new()));
            let closed = Arc::new(AtomicBool::new(false));
            let recording = Recording {
                commands: commands.clone(),
                closed: closed.clone(),
            };
            let driver = Self {
                commands,
                closed,
                fail_at: None,
                answer: Box::new(|_| serde_json::Value::Null),
            };
            (driver, recording)
        }

        pub fn fail_at(mut self, index: usize) -> Self {
            self.fail_at = Some(index);
            self
        }

        pub fn answer<F>(mut self, answer: F) -> Self
        where
            F: Fn(&Command) -> serde_json::Value + Send + Sync + 'static,
        {
            self.answer = Box::new(answer);
            self
        }
    }

    #[async_trait]
    impl Driver for RecordingDriver {
        async fn execute(&self, command: Command) -> E2eResult<serde_json::Value> {
            let index = {
                let mut commands = self.commands.lock().unwrap();
                commands.push(command.clone());
                commands.len() - 1
            };
            if self.fail_at == Some(index) {
                return Err(E2eError::ActionFailed {
                    action: command.name().to_string(),
                    locator: command.target(),
                    reason: "element not interactable".to_string(),
                });
            }
            Ok((self.answer)(&command))
        }

        async fn close(&self) -> E2eResult<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
