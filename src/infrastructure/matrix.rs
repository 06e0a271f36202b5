//! # Matrix Service Adapter
//!
//! Implements the chat, roster and presentation traits for the Matrix protocol using
//! `matrix_sdk`. This module is the bridge between the generic interfaces used by the
//! bot's core logic and the specific details of the Matrix SDK.

use crate::domain::traits::{ChatProvider, PresentationSink, RosterProvider};
use crate::domain::types::{MemberStatus, Mood, RosterSnapshot};
use crate::strings::logs;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::api::client::presence::set_presence;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;
use matrix_sdk::ruma::presence::PresenceState;
use matrix_sdk::ruma::{MxcUri, OwnedMxcUri, OwnedRoomId, OwnedUserId, RoomId, UserId};
use matrix_sdk::{Client, RoomMemberships};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }
}

/// Last known presence per user, fed by the sync loop's presence events.
#[derive(Clone, Default)]
pub struct PresenceTracker {
    states: Arc<RwLock<HashMap<OwnedUserId, PresenceState>>>,
}

impl PresenceTracker {
    pub fn update(&self, user: OwnedUserId, state: PresenceState) {
        if let Ok(mut states) = self.states.write() {
            states.insert(user, state);
        }
    }

    /// Online or idle. Users never seen are offline.
    pub fn is_online(&self, user: &UserId) -> bool {
        self.states
            .read()
            .ok()
            .and_then(|states| states.get(user).cloned())
            .is_some_and(|state| state != PresenceState::Offline)
    }
}

/// Community roster: joined members of the community room. A member is in voice
/// while online and joined to one of the voice rooms.
pub struct MatrixRoster {
    client: Client,
    community_room: OwnedRoomId,
    voice_rooms: Vec<OwnedRoomId>,
    presence: PresenceTracker,
}

impl MatrixRoster {
    pub fn new(
        client: Client,
        community_room: &str,
        voice_rooms: &[String],
        presence: PresenceTracker,
    ) -> Result<Self> {
        let community_room = RoomId::parse(community_room)
            .with_context(|| format!("Invalid community room id: {community_room}"))?;
        let voice_rooms = voice_rooms
            .iter()
            .map(|id| RoomId::parse(id).with_context(|| format!("Invalid voice room id: {id}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            client,
            community_room,
            voice_rooms,
            presence,
        })
    }

    async fn voice_occupants(&self) -> Result<HashSet<OwnedUserId>> {
        let mut occupants = HashSet::new();
        for room_id in &self.voice_rooms {
            let Some(room) = self.client.get_room(room_id) else {
                tracing::debug!("Not joined to voice room {}", room_id);
                continue;
            };
            for member in room.members(RoomMemberships::JOIN).await? {
                occupants.insert(member.user_id().to_owned());
            }
        }
        Ok(occupants)
    }
}

#[async_trait]
impl RosterProvider for MatrixRoster {
    async fn snapshot(&self) -> Result<RosterSnapshot> {
        let room = self
            .client
            .get_room(&self.community_room)
            .ok_or_else(|| anyhow!("Not joined to community room {}", self.community_room))?;
        let own_id = self.client.user_id().map(ToOwned::to_owned);
        let voice = self.voice_occupants().await?;

        let members = room
            .members(RoomMemberships::JOIN)
            .await?
            .into_iter()
            .filter(|m| Some(m.user_id()) != own_id.as_deref())
            .map(|m| {
                let online = self.presence.is_online(m.user_id());
                MemberStatus {
                    user_id: m.user_id().to_string(),
                    online,
                    in_voice: online && voice.contains(m.user_id()),
                }
            })
            .collect();

        Ok(RosterSnapshot { members })
    }
}

/// Shows the mood as the bot's presence status message and swaps its avatar.
pub struct MatrixPresentation {
    client: Client,
    avatars: HashMap<String, OwnedMxcUri>,
}

impl MatrixPresentation {
    /// `avatars` maps mood names (e.g. `Happy`) to `mxc://` URIs.
    pub fn new(client: Client, avatars: &HashMap<String, String>) -> Self {
        let avatars = avatars
            .iter()
            .map(|(mood, uri)| (mood.clone(), OwnedMxcUri::from(uri.as_str())))
            .collect();
        Self { client, avatars }
    }
}

#[async_trait]
impl PresentationSink for MatrixPresentation {
    async fn present(&self, mood: Mood) -> Result<()> {
        let user_id = self
            .client
            .user_id()
            .ok_or_else(|| anyhow!("Client is not logged in"))?
            .to_owned();

        let mut request = set_presence::v3::Request::new(user_id, PresenceState::Online);
        request.status_msg = Some(mood.to_string());
        self.client.send(request).await.context("Failed to set presence status")?;

        match self.avatars.get(mood.as_str()) {
            Some(uri) => {
                let uri: &MxcUri = uri;
                self.client
                    .account()
                    .set_avatar_url(Some(uri))
                    .await
                    .context("Failed to set avatar")?;
            }
            None => tracing::debug!("{}", logs::avatar_missing(mood)),
        }
        Ok(())
    }
}
