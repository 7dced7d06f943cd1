//! In-memory process manager recording spawns and kills.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use helpdesk::process::{ProcessDescriptor, ProcessError, ProcessManager, SpawnSpec};

/// Process manager fake backed by an in-memory process table.
///
/// Starts out connected so most tests need no setup; call `disconnect()` to
/// exercise the fail-fast path. `register_process` plants an externally
/// running process the reconciliation job will discover.
pub struct FakeProcessManager {
    connected: AtomicBool,
    processes: Mutex<HashMap<String, ProcessDescriptor>>,
    spawned: Mutex<Vec<SpawnSpec>>,
    killed: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String)>>,
    fail_spawn: AtomicBool,
}

impl FakeProcessManager {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            processes: Mutex::new(HashMap::new()),
            spawned: Mutex::new(Vec::new()),
            killed: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            fail_spawn: AtomicBool::new(false),
        }
    }

    /// Simulates a manager nobody connected to.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Plants an externally running process.
    pub fn register_process(&self, name: &str) {
        self.processes.lock().unwrap().insert(
            name.to_string(),
            ProcessDescriptor {
                name: name.to_string(),
                pid: Some(4242),
            },
        );
    }

    /// Makes subsequent spawns fail.
    pub fn fail_spawns(&self) {
        self.fail_spawn.store(true, Ordering::SeqCst);
    }

    /// Removes a process as if it died outside the manager's control.
    ///
    /// Unlike `kill`, nothing is recorded; the next `list` simply no longer
    /// reports the process.
    pub fn drop_process(&self, name: &str) {
        self.processes.lock().unwrap().remove(name);
    }

    /// Every spawn issued, in order.
    pub fn spawned(&self) -> Vec<SpawnSpec> {
        self.spawned.lock().unwrap().clone()
    }

    /// Every kill issued, in order.
    pub fn killed(&self) -> Vec<String> {
        self.killed.lock().unwrap().clone()
    }

    /// Every payload sent to a process, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Names of the processes currently running.
    pub fn running(&self) -> Vec<String> {
        self.processes.lock().unwrap().keys().cloned().collect()
    }

    fn ensure_connected(&self) -> Result<(), ProcessError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProcessError::NotConnected)
        }
    }
}

impl Default for FakeProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessManager for FakeProcessManager {
    async fn connect(&self) -> Result<(), ProcessError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ProcessDescriptor>, ProcessError> {
        self.ensure_connected()?;

        Ok(self.processes.lock().unwrap().values().cloned().collect())
    }

    async fn spawn(&self, spec: SpawnSpec) -> Result<(), ProcessError> {
        self.ensure_connected()?;

        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(ProcessError::Spawn {
                name: spec.name.clone(),
                reason: "spawn disabled by test".to_string(),
            });
        }

        self.processes.lock().unwrap().insert(
            spec.name.clone(),
            ProcessDescriptor {
                name: spec.name.clone(),
                pid: Some(4242),
            },
        );
        self.spawned.lock().unwrap().push(spec);

        Ok(())
    }

    async fn kill(&self, name: &str) -> Result<(), ProcessError> {
        self.ensure_connected()?;

        self.processes.lock().unwrap().remove(name);
        self.killed.lock().unwrap().push(name.to_string());

        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<Option<ProcessDescriptor>, ProcessError> {
        self.ensure_connected()?;

        Ok(self.processes.lock().unwrap().get(name).cloned())
    }

    async fn send(&self, name: &str, data: &str) -> Result<(), ProcessError> {
        self.ensure_connected()?;

        self.sent
            .lock()
            .unwrap()
            .push((name.to_string(), data.to_string()));

        Ok(())
    }
}
