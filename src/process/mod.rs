//! Narrow interface over the external process manager.
//!
//! The custom bot supervisor treats the process manager as a single-node
//! scheduler: it spawns one detached child per provisioned bot, lists what is
//! running, and kills what should not be. The `ProcessManager` trait keeps the
//! supervisor logic (validation pipeline, reconciliation policy) independent
//! of the concrete manager so tests substitute an in-memory fake.

pub mod local;

use async_trait::async_trait;
use thiserror::Error;

/// Error raised by process manager operations.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// An operation was issued before `connect` succeeded.
    ///
    /// This is a fatal precondition of every call and is never retried.
    #[error("Process manager is not connected")]
    NotConnected,

    /// The child process could not be spawned.
    #[error("Failed to spawn process '{name}': {reason}")]
    Spawn {
        /// Process name the spawn was issued under
        name: String,
        /// Underlying failure description
        reason: String,
    },

    /// I/O error while talking to a managed process.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A process as reported by the process manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    /// Name the process was spawned under.
    pub name: String,
    /// OS process id, when the process is alive.
    pub pid: Option<u32>,
}

/// Parameters for spawning a managed child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    /// Unique name to register the process under.
    pub name: String,
    /// Script or executable to run.
    pub script: String,
    /// CLI-style arguments passed to the child.
    pub args: Vec<String>,
}

/// Child process operations consumed by the custom bot supervisor.
#[async_trait]
pub trait ProcessManager: Send + Sync {
    /// Establishes the connection to the manager. Must be called once before
    /// any other operation.
    async fn connect(&self) -> Result<(), ProcessError>;

    /// Lists all processes known to the manager.
    async fn list(&self) -> Result<Vec<ProcessDescriptor>, ProcessError>;

    /// Spawns a detached child process.
    async fn spawn(&self, spec: SpawnSpec) -> Result<(), ProcessError>;

    /// Kills and forgets the named process. Unknown names are a no-op.
    async fn kill(&self, name: &str) -> Result<(), ProcessError>;

    /// Describes the named process, if the manager knows it.
    async fn describe(&self, name: &str) -> Result<Option<ProcessDescriptor>, ProcessError>;

    /// Sends a line of data to the named process.
    async fn send(&self, name: &str, data: &str) -> Result<(), ProcessError>;
}
