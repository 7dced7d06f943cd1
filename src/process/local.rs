//! Process manager running children directly on the local host.

use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use super::{ProcessDescriptor, ProcessError, ProcessManager, SpawnSpec};

/// Supervises child processes spawned on the same machine.
///
/// Children are detached from the supervisor's lifetime only in the sense
/// that nothing awaits them; killing the helpdesk process tears them down
/// with it, which the daily reconciliation corrects on the next boot.
pub struct LocalProcessManager {
    connected: AtomicBool,
    children: Mutex<HashMap<String, Child>>,
}

impl LocalProcessManager {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            children: Mutex::new(HashMap::new()),
        }
    }

    fn ensure_connected(&self) -> Result<(), ProcessError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProcessError::NotConnected)
        }
    }
}

impl Default for LocalProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessManager for LocalProcessManager {
    async fn connect(&self) -> Result<(), ProcessError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ProcessDescriptor>, ProcessError> {
        self.ensure_connected()?;

        let children = self.children.lock().await;
        Ok(children
            .iter()
            .map(|(name, child)| ProcessDescriptor {
                name: name.clone(),
                pid: child.id(),
            })
            .collect())
    }

    async fn spawn(&self, spec: SpawnSpec) -> Result<(), ProcessError> {
        self.ensure_connected()?;

        let child = Command::new(&spec.script)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ProcessError::Spawn {
                name: spec.name.clone(),
                reason: e.to_string(),
            })?;

        let mut children = self.children.lock().await;
        children.insert(spec.name, child);

        Ok(())
    }

    async fn kill(&self, name: &str) -> Result<(), ProcessError> {
        self.ensure_connected()?;

        let mut children = self.children.lock().await;
        if let Some(mut child) = children.remove(name) {
            child.kill().await?;
        }

        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<Option<ProcessDescriptor>, ProcessError> {
        self.ensure_connected()?;

        let children = self.children.lock().await;
        Ok(children.get(name).map(|child| ProcessDescriptor {
            name: name.to_string(),
            pid: child.id(),
        }))
    }

    async fn send(&self, name: &str, data: &str) -> Result<(), ProcessError> {
        self.ensure_connected()?;

        let mut children = self.children.lock().await;
        let child = children
            .get_mut(name)
            .ok_or_else(|| ProcessError::Spawn {
                name: name.to_string(),
                reason: "process is not managed".to_string(),
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(data.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
        }

        Ok(())
    }
}
