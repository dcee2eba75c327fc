//! Minimal RSS 2.0 item extraction.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::CollectError;
use crate::text::strip_html;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// Title and description joined for text analysis.
    #[must_use]
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.description)
        }
    }
}

/// Parse `<item>` elements, pulling `<title>`, `<link>`, `<description>` and
/// `<pubDate>`. Items without a title or link are skipped. Stops after
/// `max_items`.
///
/// # Errors
///
/// Returns [`CollectError::Xml`] when the document is malformed.
pub fn parse_rss_feed(xml: &str, max_items: usize) -> Result<Vec<FeedItem>, CollectError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    description.clear();
                    pub_date.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" && in_item {
                    in_item = false;
                    if !title.is_empty() && !link.is_empty() {
                        items.push(FeedItem {
                            title: title.clone(),
                            link: link.clone(),
                            description: strip_html(&description),
                            published: DateTime::parse_from_rfc2822(pub_date.trim())
                                .ok()
                                .map(|d| d.with_timezone(&Utc)),
                        });
                        if items.len() >= max_items {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    append_field(&current_tag, &text, &mut title, &mut link, &mut description, &mut pub_date);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    append_field(&current_tag, &text, &mut title, &mut link, &mut description, &mut pub_date);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CollectError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn append_field(
    tag: &str,
    text: &str,
    title: &mut String,
    link: &mut String,
    description: &mut String,
    pub_date: &mut String,
) {
    let target = match tag {
        "title" => title,
        "link" => link,
        "description" => description,
        "pubDate" => pub_date,
        _ => return,
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text.trim());
}
