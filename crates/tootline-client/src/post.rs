//! Timeline entries as decoded from the Mastodon `Status` entity.
//!
//! Posts are plain value data: once a page is decoded nothing in the core
//! mutates them. Field names follow the API JSON where they differ from Rust
//! naming (`media_attachments`, `type`).

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Deserializer};

/// Stable, opaque post identifier.
///
/// Mastodon ids are numeric strings of varying width, so ordering compares
/// length first and then bytes. For numeric ids this is numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Wrap a raw id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id string, as sent in `max_id` / `min_id`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for PostId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for PostId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: PostId,
    /// ISO-8601 creation timestamp, as sent by the server.
    #[serde(default)]
    pub created_at: String,
    /// Public URL of the post. `None` for some remote posts.
    #[serde(default)]
    pub url: Option<String>,
    /// Author (or booster, when `reblog` is set).
    pub account: Account,
    /// HTML content. `None` when the post has no text.
    #[serde(default, deserialize_with = "non_empty_html")]
    pub content: Option<String>,
    /// Attached media, in display order.
    #[serde(default, rename = "media_attachments")]
    pub media: Vec<MediaAttachment>,
    /// Link preview descriptor.
    #[serde(default)]
    pub card: Option<PreviewCard>,
    /// The boosted post, when this entry is a boost.
    #[serde(default)]
    pub reblog: Option<Box<Post>>,
}

impl Post {
    /// Minimal post with no content, media or card.
    pub fn new(id: impl Into<PostId>, account: Account) -> Self {
        Self {
            id: id.into(),
            created_at: String::new(),
            url: None,
            account,
            content: None,
            media: Vec::new(),
            card: None,
            reblog: None,
        }
    }

    /// Set the HTML content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// The post to show: the boosted post for a boost, otherwise `self`.
    pub fn display_post(&self) -> &Post {
        self.reblog.as_deref().unwrap_or(self)
    }

    /// Account that boosted this entry. `None` for original posts.
    pub fn booster(&self) -> Option<&Account> {
        self.reblog.as_ref().map(|_| &self.account)
    }

    /// URL of the link preview, only for cards of kind `link`.
    pub fn link_card_url(&self) -> Option<&str> {
        self.card.as_ref().filter(|card| card.kind == CardKind::Link).map(|card| card.url.as_str())
    }

    /// Image attachments. `None` when the post has no images.
    pub fn image_attachments(&self) -> Option<Vec<&MediaAttachment>> {
        let images: Vec<_> = self.media.iter().filter(|m| m.kind == MediaKind::Image).collect();
        if images.is_empty() { None } else { Some(images) }
    }
}

/// Post author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: String,
    /// Local username.
    #[serde(default)]
    pub username: String,
    /// `user` for local accounts, `user@host` for remote ones.
    pub acct: String,
    /// Display name as set by the user.
    #[serde(default)]
    pub display_name: String,
    /// Static avatar image URL.
    #[serde(default)]
    pub avatar_static: Option<String>,
}

/// Handle split for display: `@user` and, for remote accounts, `@host`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameParts {
    /// `@user`.
    pub handle: String,
    /// `@host` for remote accounts.
    pub server: Option<String>,
}

impl Account {
    /// Account with the given id and `acct`; username is derived from `acct`.
    pub fn new(id: impl Into<String>, acct: impl Into<String>) -> Self {
        let acct = acct.into();
        let username = acct.split('@').next().unwrap_or_default().to_string();
        Self { id: id.into(), username, acct, display_name: String::new(), avatar_static: None }
    }

    /// Display name, or `None` when it is blank.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.display_name.trim();
        if name.is_empty() { None } else { Some(name) }
    }

    /// Handle parts for display.
    pub fn handle(&self) -> UsernameParts {
        match self.acct.split_once('@') {
            Some((user, server)) if !server.is_empty() => UsernameParts {
                handle: format!("@{user}"),
                server: Some(format!("@{server}")),
            },
            _ => UsernameParts { handle: format!("@{}", self.acct), server: None },
        }
    }
}

/// Media attachment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Static image.
    Image,
    /// Looping silent video.
    Gifv,
    /// Video.
    Video,
    /// Audio.
    Audio,
    /// Anything the server marks `unknown` or a type this client predates.
    #[serde(other)]
    Unknown,
}

/// Media attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaAttachment {
    /// Attachment identifier.
    pub id: String,
    /// Media type.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Full-size media URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Alt text.
    #[serde(default)]
    pub description: Option<String>,
}

/// Link preview type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Plain link.
    Link,
    /// Embedded video.
    Video,
    /// Embedded photo.
    Photo,
    /// Rich embed.
    Rich,
    /// Unrecognised card type.
    #[serde(other)]
    Unknown,
}

/// Link preview descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreviewCard {
    /// Card type.
    #[serde(rename = "type")]
    pub kind: CardKind,
    /// Linked URL.
    pub url: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
}

fn non_empty_html<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let content = Option::<String>::deserialize(deserializer)?;
    Ok(content.filter(|html| !html.trim().is_empty()))
}
