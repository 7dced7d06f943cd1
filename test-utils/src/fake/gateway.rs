//! In-memory support gateway recording every call.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use helpdesk::gateway::{GatewayError, GatewayMember, SupportGateway};

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    FetchMember { guild_id: u64, user_id: u64 },
    CreateThread { channel_id: u64, name: String },
    AddThreadMember { thread_id: u64, user_id: u64 },
    SendMessage { channel_id: u64, content: String },
    ArchiveThread { thread_id: u64 },
    AddRole { guild_id: u64, user_id: u64, role_id: u64 },
    RemoveRole { guild_id: u64, user_id: u64, role_id: u64 },
    SendFollowup { token: String, content: String },
}

/// Support gateway fake backed by in-memory guild state.
///
/// Members, roles and channels are configured up front; thread creation hands
/// out fresh ids. Every mutating call is recorded for assertions.
pub struct FakeGateway {
    members: Mutex<HashMap<(u64, u64), GatewayMember>>,
    roles: Mutex<HashMap<(u64, String), u64>>,
    channels: Mutex<HashMap<(u64, String), u64>>,
    calls: Mutex<Vec<GatewayCall>>,
    next_id: AtomicU64,
    /// When set, every operation fails with this message.
    fail_with: Mutex<Option<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            roles: Mutex::new(HashMap::new()),
            channels: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(9_000_000),
            fail_with: Mutex::new(None),
        }
    }

    /// Puts a member into a guild.
    pub fn insert_member(&self, guild_id: u64, member: GatewayMember) {
        self.members
            .lock()
            .unwrap()
            .insert((guild_id, member.user_id), member);
    }

    /// Removes a member from a guild, simulating them leaving.
    pub fn remove_member(&self, guild_id: u64, user_id: u64) {
        self.members.lock().unwrap().remove(&(guild_id, user_id));
    }

    /// Defines a role in a guild and returns its generated id.
    pub fn define_role(&self, guild_id: u64, name: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.roles
            .lock()
            .unwrap()
            .insert((guild_id, name.to_string()), id);
        id
    }

    /// Defines a channel in a guild and returns its generated id.
    pub fn define_channel(&self, guild_id: u64, name: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.channels
            .lock()
            .unwrap()
            .insert((guild_id, name.to_string()), id);
        id
    }

    /// Makes every subsequent operation fail.
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Contents of the messages sent to a channel or thread.
    pub fn messages_to(&self, channel_id: u64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::SendMessage {
                    channel_id: target,
                    content,
                } if target == channel_id => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Members added to a thread.
    pub fn thread_members(&self, thread_id: u64) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::AddThreadMember {
                    thread_id: target,
                    user_id,
                } if target == thread_id => Some(user_id),
                _ => None,
            })
            .collect()
    }

    /// Threads that were archived and locked.
    pub fn archived_threads(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::ArchiveThread { thread_id } => Some(thread_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self) -> Result<(), GatewayError> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(GatewayError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SupportGateway for FakeGateway {
    async fn fetch_member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<GatewayMember>, GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::FetchMember { guild_id, user_id });

        Ok(self.members.lock().unwrap().get(&(guild_id, user_id)).cloned())
    }

    async fn find_role_by_name(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<u64>, GatewayError> {
        self.check_failure()?;

        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&(guild_id, name.to_string()))
            .copied())
    }

    async fn find_channel_by_name(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<u64>, GatewayError> {
        self.check_failure()?;

        Ok(self
            .channels
            .lock()
            .unwrap()
            .get(&(guild_id, name.to_string()))
            .copied())
    }

    async fn create_thread(&self, channel_id: u64, name: &str) -> Result<u64, GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::CreateThread {
            channel_id,
            name: name.to_string(),
        });

        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn add_thread_member(&self, thread_id: u64, user_id: u64) -> Result<(), GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::AddThreadMember { thread_id, user_id });

        Ok(())
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::SendMessage {
            channel_id,
            content: content.to_string(),
        });

        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn archive_thread(&self, thread_id: u64) -> Result<(), GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::ArchiveThread { thread_id });

        Ok(())
    }

    async fn add_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::AddRole {
            guild_id,
            user_id,
            role_id,
        });

        if let Some(member) = self.members.lock().unwrap().get_mut(&(guild_id, user_id)) {
            if !member.roles.contains(&role_id) {
                member.roles.push(role_id);
            }
        }

        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::RemoveRole {
            guild_id,
            user_id,
            role_id,
        });

        if let Some(member) = self.members.lock().unwrap().get_mut(&(guild_id, user_id)) {
            member.roles.retain(|role| *role != role_id);
        }

        Ok(())
    }

    async fn send_followup(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> Result<(), GatewayError> {
        self.check_failure()?;
        self.record(GatewayCall::SendFollowup {
            token: interaction_token.to_string(),
            content: content.to_string(),
        });

        Ok(())
    }
}
