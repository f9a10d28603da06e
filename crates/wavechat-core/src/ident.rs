//! Element-id derivation for a channel's UI parts.
//!
//! Every channel owns six addressable elements: the tab button, the list
//! item wrapping it, the content pane, the messages column, the users
//! column, and the notification badge. Consumers (styling layer, test
//! harness) address them solely through these ids, so the derivation must
//! be deterministic across renders and collision-free across channels.

/// The derived element ids for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIds {
    pub tab: String,
    pub tab_item: String,
    pub content: String,
    pub messages: String,
    pub users: String,
    pub badge: String,
}

impl ChannelIds {
    pub fn for_channel(name: &str) -> Self {
        let base = format!("msgs{}", channel_slug(name));
        Self {
            tab: base.clone(),
            tab_item: format!("{base}Li"),
            content: format!("{base}Content"),
            messages: format!("{base}messages"),
            users: format!("{base}users"),
            badge: format!("{base}notify"),
        }
    }
}

/// Key form of a channel name: one leading `#` stripped, then sanitized
/// into the id-safe alphabet. ASCII alphanumerics and `-` pass through;
/// every other byte (including `_`, the escape lead) encodes as `_` plus
/// two hex digits, so distinct post-strip names always produce distinct
/// slugs. Names that differ only by the stripped `#` do collide here;
/// the board rejects the later one rather than merging them.
pub fn channel_slug(name: &str) -> String {
    let stripped = name.strip_prefix('#').unwrap_or(name);
    let mut slug = String::with_capacity(stripped.len());
    for byte in stripped.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' => slug.push(byte as char),
            other => {
                slug.push('_');
                slug.push_str(&format!("{other:02x}"));
            }
        }
    }
    slug
}
