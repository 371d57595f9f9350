//! Apple release announcements from the public RSS feed.
//!
//! The feed lists announcements newest first; only `<item>` titles drive the
//! sync, with link and publication date carried along for display.

pub mod filter;

pub use filter::{filter_titles, TitleFilter};

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};

const USER_AGENT: &str = concat!("osfloor/", env!("CARGO_PKG_VERSION"));

/// One `<item>` of the release feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReleaseAnnouncement {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<String>,
}

impl ReleaseAnnouncement {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Downloads the release feed and picks the newest matching announcement.
pub struct ReleaseFeedReader {
    url: String,
    filter: TitleFilter,
    http_client: Client,
}

impl ReleaseFeedReader {
    pub fn new(url: impl Into<String>, filter: TitleFilter) -> Result<Self> {
        let http_client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http_client(url, filter, http_client))
    }

    pub fn with_http_client(url: impl Into<String>, filter: TitleFilter, http_client: Client) -> Self {
        Self {
            url: url.into(),
            filter,
            http_client,
        }
    }

    pub fn filter(&self) -> &TitleFilter {
        &self.filter
    }

    /// Download and parse every announcement, in feed order.
    pub async fn fetch_all(&self) -> Result<Vec<ReleaseAnnouncement>> {
        let resp = self.http_client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::error!(url = %self.url, status = status.as_u16(), "release feed request failed");
            return Err(FeedError::Http {
                status: status.as_u16(),
            }
            .into());
        }

        let raw = resp.text().await?;
        let items = parse_items(&sanitize(&raw))?;
        tracing::debug!(url = %self.url, count = items.len(), "parsed release feed");
        Ok(items)
    }

    /// Newest announcement passing the title filter, if any.
    pub async fn latest(&self) -> Result<Option<ReleaseAnnouncement>> {
        let items = self.fetch_all().await?;
        Ok(self.filter.newest(&items).cloned())
    }
}

/// Strip characters XML 1.0 does not allow (C0 controls other than tab, LF, CR).
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}'))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
}

/// Parse the `<item>` entries of an RSS document.
pub fn parse_items(xml: &str) -> Result<Vec<ReleaseAnnouncement>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ReleaseAnnouncement> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            FeedError::Parse(format!("at byte {}: {e}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" => current = Some(ReleaseAnnouncement::default()),
                b"title" if current.is_some() => start_field(&mut field, &mut text, Field::Title),
                b"link" if current.is_some() => start_field(&mut field, &mut text, Field::Link),
                b"pubDate" if current.is_some() => start_field(&mut field, &mut text, Field::PubDate),
                _ => {}
            },
            Event::Text(t) if field.is_some() => {
                let unescaped = t.unescape().map_err(|e| FeedError::Parse(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
                b"title" | b"link" | b"pubDate" => {
                    if let (Some(item), Some(f)) = (current.as_mut(), field.take()) {
                        let value = text.trim().to_string();
                        match f {
                            Field::Title => item.title = value,
                            Field::Link => item.link = Some(value),
                            Field::PubDate => item.published = Some(value),
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn start_field(field: &mut Option<Field>, text: &mut String, which: Field) {
    *field = Some(which);
    text.clear();
}
