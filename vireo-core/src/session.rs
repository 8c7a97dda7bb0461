//! Remote-control session plumbing.
//!
//! The transport (a persistent bidirectional message channel) lives outside
//! the core; this module only guarantees that entity identifiers stay
//! resolvable, that remote-controllable sessions can be enumerated before a
//! directive is issued, and that failures are typed: unknown identifiers
//! are `NotFound`, targets without the capability are `Unsupported`, and a
//! missing live channel is `ChannelUnavailable`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;
use vireo_model::{EntityId, MediaKind, SessionId};

use crate::entity::EntityArena;
use crate::error::{LibraryError, Result};

/// How a play directive should be queued on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayCommand {
    PlayNow,
    PlayNext,
    PlayLast,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BrowseRequest {
    pub item_id: EntityId,
    pub item_type: MediaKind,
    pub item_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayRequest {
    pub item_ids: Vec<EntityId>,
    pub play_command: PlayCommand,
    pub start_position_ticks: Option<i64>,
}

/// Message envelope: a message-type tag plus a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "MessageType", content = "Data")]
pub enum RemoteMessage {
    Browse(BrowseRequest),
    Play(PlayRequest),
}

/// Minimal contract a transport must satisfy to carry directives.
#[async_trait]
pub trait DirectiveChannel: Send + Sync {
    async fn send(&self, message: RemoteMessage) -> Result<()>;
}

/// One connected client session.
pub struct Session {
    pub id: SessionId,
    pub device_name: String,
    pub supports_remote_control: bool,
    last_activity: RwLock<DateTime<Utc>>,
    channel: RwLock<Option<Arc<dyn DirectiveChannel>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("device_name", &self.device_name)
            .field("supports_remote_control", &self.supports_remote_control)
            .field("has_channel", &self.channel.read().is_some())
            .finish()
    }
}

impl Session {
    fn new(device_name: String, supports_remote_control: bool) -> Self {
        Self {
            id: SessionId::new(),
            device_name,
            supports_remote_control,
            last_activity: RwLock::new(Utc::now()),
            channel: RwLock::new(None),
        }
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.read()
    }

    fn touch(&self) {
        *self.last_activity.write() = Utc::now();
    }
}

/// Registry of connected sessions plus the directive entry points.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register_session(
        &self,
        device_name: impl Into<String>,
        supports_remote_control: bool,
    ) -> Arc<Session> {
        let session = Arc::new(Session::new(device_name.into(), supports_remote_control));
        self.sessions.insert(session.id, session.clone());
        debug!(session = %session.id, device = %session.device_name, "registered session");
        session
    }

    pub fn remove_session(&self, id: SessionId) {
        self.sessions.remove(&id);
    }

    pub fn attach_channel(&self, id: SessionId, channel: Arc<dyn DirectiveChannel>) -> Result<()> {
        let session = self.require(id)?;
        *session.channel.write() = Some(channel);
        session.touch();
        Ok(())
    }

    pub fn detach_channel(&self, id: SessionId) -> Result<()> {
        let session = self.require(id)?;
        *session.channel.write() = None;
        Ok(())
    }

    /// Active sessions, optionally narrowed to remote-controllable ones.
    pub fn sessions(&self, remote_control_only: bool) -> Vec<Arc<Session>> {
        let mut out: Vec<Arc<Session>> = self
            .sessions
            .iter()
            .map(|s| s.clone())
            .filter(|s| !remote_control_only || s.supports_remote_control)
            .collect();
        out.sort_by_key(|s| std::cmp::Reverse(s.last_activity()));
        out
    }

    fn require(&self, id: SessionId) -> Result<Arc<Session>> {
        self.sessions
            .get(&id)
            .map(|s| s.clone())
            .ok_or_else(|| LibraryError::NotFound(format!("session {id} not found")))
    }

    /// Instruct a session to browse to a library entity.
    ///
    /// The target entity is validated first: an unknown identifier fails
    /// with `NotFound` before anything touches a channel.
    pub async fn browse_to(
        &self,
        arena: &EntityArena,
        session_id: SessionId,
        item_id: EntityId,
    ) -> Result<()> {
        let entity = arena.require(item_id)?;
        let session = self.require(session_id)?;
        if !session.supports_remote_control {
            return Err(LibraryError::Unsupported(format!(
                "session {session_id} does not support remote control"
            )));
        }
        let channel = session.channel.read().clone();
        let Some(channel) = channel else {
            return Err(LibraryError::ChannelUnavailable(format!(
                "session {session_id} has no open channel"
            )));
        };
        session.touch();
        channel
            .send(RemoteMessage::Browse(BrowseRequest {
                item_id: entity.id(),
                item_type: entity.kind(),
                item_name: entity.name().to_string(),
            }))
            .await
    }

    /// Instruct a session to play a list of library entities.
    ///
    /// Every identifier must resolve; the first unknown one fails the whole
    /// directive with `NotFound` and nothing is sent.
    pub async fn play(
        &self,
        arena: &EntityArena,
        session_id: SessionId,
        item_ids: Vec<EntityId>,
        play_command: PlayCommand,
        start_position_ticks: Option<i64>,
    ) -> Result<()> {
        for id in &item_ids {
            arena.require(*id)?;
        }
        let session = self.require(session_id)?;
        if !session.supports_remote_control {
            return Err(LibraryError::Unsupported(format!(
                "session {session_id} does not support remote control"
            )));
        }
        let channel = session.channel.read().clone();
        let Some(channel) = channel else {
            return Err(LibraryError::ChannelUnavailable(format!(
                "session {session_id} has no open channel"
            )));
        };
        session.touch();
        channel
            .send(RemoteMessage::Play(PlayRequest {
                item_ids,
                play_command,
                start_position_ticks,
            }))
            .await
    }
}
