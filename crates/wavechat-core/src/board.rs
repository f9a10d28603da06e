//! The tabbed-view state machine: which channel is selected, and how many
//! unread messages each inactive channel has accumulated.
//!
//! `ChannelBoard` is the single owner of all channel and tab state for the
//! lifetime of the process. Renderers receive `&` snapshots; every mutation
//! goes through the explicit operations below, which is where the
//! one-active-tab invariant is enforced.

use serde_json::Value;
use thiserror::Error;

use crate::ident::{channel_slug, ChannelIds};
use crate::{Channel, ChannelEvent, Message};

/// The page bootstraps with at most this many messages per channel; live
/// appends afterwards are uncapped.
const BOOTSTRAP_MESSAGE_CAP: usize = 50;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("malformed channel entry: {reason}")]
    MalformedChannel { reason: String },
    #[error("channel '{name}' collides with an existing tab ('{slug}')")]
    DuplicateChannel { name: String, slug: String },
    #[error("unknown channel '{name}'")]
    UnknownChannel { name: String },
}

/// One channel plus its derived tab state.
#[derive(Debug, Clone)]
pub struct ChannelTab {
    pub channel: Channel,
    pub ids: ChannelIds,
    pub slug: String,
    pub is_active: bool,
    pub unread: u32,
}

impl ChannelTab {
    /// Tab label, always rendered with the `#` prefix.
    pub fn label(&self) -> String {
        format!(
            "#{}",
            self.channel.name.strip_prefix('#').unwrap_or(&self.channel.name)
        )
    }

    /// The badge shows only while there is something unread.
    pub fn badge_visible(&self) -> bool {
        self.unread > 0
    }
}

/// Owner of the ordered channel collection and all tab state.
#[derive(Debug, Default)]
pub struct ChannelBoard {
    tabs: Vec<ChannelTab>,
}

impl ChannelBoard {
    pub fn new() -> Self {
        Self { tabs: Vec::new() }
    }

    /// Build a board from raw bootstrap entries. Bad entries are rejected
    /// one by one and reported back; the survivors initialize in order and
    /// the first of them becomes the selected tab.
    pub fn bootstrap(entries: &[Value]) -> (Self, Vec<BoardError>) {
        let mut board = Self::new();
        let mut rejected = Vec::new();
        for entry in entries {
            let outcome = Channel::from_value(entry).and_then(|channel| board.add_channel(channel));
            if let Err(err) = outcome {
                rejected.push(err);
            }
        }
        (board, rejected)
    }

    pub fn tabs(&self) -> &[ChannelTab] {
        &self.tabs
    }

    pub fn get(&self, name: &str) -> Option<&ChannelTab> {
        let slug = channel_slug(name);
        self.tabs.iter().find(|tab| tab.slug == slug)
    }

    pub fn selected(&self) -> Option<&ChannelTab> {
        self.tabs.iter().find(|tab| tab.is_active)
    }

    /// Activate `name` (with or without its `#`), deactivate every other
    /// tab, and clear the target's unread count. Unknown names are a caller
    /// bug: the board stays untouched and the error carries the diagnostic.
    /// Selection never creates a tab.
    pub fn select(&mut self, name: &str) -> Result<(), BoardError> {
        let slug = channel_slug(name);
        if !self.tabs.iter().any(|tab| tab.slug == slug) {
            return Err(BoardError::UnknownChannel {
                name: name.to_string(),
            });
        }
        for tab in &mut self.tabs {
            tab.is_active = tab.slug == slug;
            if tab.is_active {
                tab.unread = 0;
            }
        }
        self.assert_single_active();
        Ok(())
    }

    /// Append a message to a channel's log. The active channel reads it
    /// immediately; any other channel counts it as unread. A channel not
    /// seen before is created on first observation.
    pub fn append_message(&mut self, name: &str, message: Message) -> Result<(), BoardError> {
        let idx = self.observe(name)?;
        let tab = &mut self.tabs[idx];
        tab.channel.messages.push(message);
        if !tab.is_active {
            tab.unread += 1;
        }
        self.assert_single_active();
        Ok(())
    }

    /// Insert a user into a channel's set. Duplicate joins are no-ops.
    pub fn user_joined(&mut self, name: &str, user: &str) -> Result<(), BoardError> {
        let idx = self.observe(name)?;
        let users = &mut self.tabs[idx].channel.users;
        if let Err(pos) = users.binary_search_by(|existing| existing.as_str().cmp(user)) {
            users.insert(pos, user.to_string());
        }
        Ok(())
    }

    /// Remove a user from a channel's set. Unknown users are no-ops.
    pub fn user_left(&mut self, name: &str, user: &str) -> Result<(), BoardError> {
        let idx = self.observe(name)?;
        let users = &mut self.tabs[idx].channel.users;
        if let Ok(pos) = users.binary_search_by(|existing| existing.as_str().cmp(user)) {
            users.remove(pos);
        }
        Ok(())
    }

    /// Route one inbound gateway event to the matching mutation.
    pub fn apply(&mut self, event: ChannelEvent) -> Result<(), BoardError> {
        match event {
            ChannelEvent::Message { channel, message } => self.append_message(&channel, message),
            ChannelEvent::Join { channel, user } => self.user_joined(&channel, &user),
            ChannelEvent::Leave { channel, user } => self.user_left(&channel, &user),
        }
    }

    /// The channel's most recent messages in chronological order.
    pub fn recent_messages(&self, name: &str, limit: usize) -> Option<&[Message]> {
        let tab = self.get(name)?;
        let messages = &tab.channel.messages;
        let start = messages.len().saturating_sub(limit);
        Some(&messages[start..])
    }

    fn observe(&mut self, name: &str) -> Result<usize, BoardError> {
        let slug = channel_slug(name);
        if let Some(idx) = self.tabs.iter().position(|tab| tab.slug == slug) {
            return Ok(idx);
        }
        self.add_channel(Channel {
            name: name.to_string(),
            messages: Vec::new(),
            users: Vec::new(),
        })
    }

    fn add_channel(&mut self, mut channel: Channel) -> Result<usize, BoardError> {
        let slug = channel_slug(&channel.name);
        if slug.is_empty() {
            return Err(BoardError::MalformedChannel {
                reason: format!("channel name '{}' is empty after '#' stripping", channel.name),
            });
        }
        if self.tabs.iter().any(|tab| tab.slug == slug) {
            return Err(BoardError::DuplicateChannel {
                name: channel.name,
                slug,
            });
        }

        let overflow = channel.messages.len().saturating_sub(BOOTSTRAP_MESSAGE_CAP);
        if overflow > 0 {
            channel.messages.drain(..overflow);
        }
        channel.users.sort();
        channel.users.dedup();

        let ids = ChannelIds::for_channel(&channel.name);
        let is_active = self.tabs.is_empty();
        let idx = self.tabs.len();
        self.tabs.push(ChannelTab {
            channel,
            ids,
            slug,
            is_active,
            unread: 0,
        });
        self.assert_single_active();
        Ok(idx)
    }

    fn assert_single_active(&self) {
        debug_assert!(
            self.tabs.is_empty() || self.tabs.iter().filter(|tab| tab.is_active).count() == 1,
            "tab invariant violated: expected exactly one active tab"
        );
    }
}
