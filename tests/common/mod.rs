//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Escape a value for use inside a double-quoted HTML attribute
fn attr_escape(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Builder for a sidebar member span
#[derive(Clone)]
pub struct MemberBuilder {
    name: Option<String>,
    identifier: Option<String>,
}

impl MemberBuilder {
    pub fn new(name: &str, identifier: &str) -> Self {
        Self { name: Some(name.to_string()), identifier: Some(identifier.to_string()) }
    }

    pub fn without_identifier(name: &str) -> Self {
        Self { name: Some(name.to_string()), identifier: None }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<span data-member-id="m""#);
        if let Some(name) = &self.name {
            html.push_str(&format!(r#" data-name="{}""#, attr_escape(name)));
        }
        if let Some(identifier) = &self.identifier {
            html.push_str(&format!(r#" data-hovercard-id="{}""#, attr_escape(identifier)));
        }
        html.push_str(&format!(">{}</span>", self.name.as_deref().unwrap_or_default()));
        html
    }
}

/// Builder for one sidebar row
pub struct ConversationRowBuilder {
    group_id: Option<String>,
    topic: Option<String>,
    timestamp: Option<String>,
    unread: bool,
    members: Vec<MemberBuilder>,
}

impl ConversationRowBuilder {
    pub fn new(group_id: &str) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            topic: None,
            timestamp: None,
            unread: false,
            members: Vec::new(),
        }
    }

    pub fn without_group_id() -> Self {
        Self { group_id: None, ..Self::new("") }
    }

    pub fn topic(mut self, topic: &str) -> Self {
        self.topic = Some(topic.to_string());
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn unread(mut self) -> Self {
        self.unread = true;
        self
    }

    pub fn member(mut self, member: MemberBuilder) -> Self {
        self.members.push(member);
        self
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<span role="listitem""#);
        if let Some(group_id) = &self.group_id {
            html.push_str(&format!(r#" data-group-id="{}""#, attr_escape(group_id)));
        }
        html.push('>');
        if let Some(topic) = &self.topic {
            html.push_str(&format!(
                r#"<span role="presentation" title="{}">{}</span>"#,
                attr_escape(topic),
                topic
            ));
        }
        for member in &self.members {
            html.push_str(&member.to_html());
        }
        if let Some(timestamp) = &self.timestamp {
            html.push_str(&format!(r#"<span data-absolute-timestamp="{}">now</span>"#, timestamp));
        }
        if self.unread {
            html.push_str("<span>Unread</span>");
        }
        html.push_str("</span>");
        html
    }
}

/// Builder for one top-level message
pub struct MessageBuilder {
    author: Option<MemberBuilder>,
    timestamp: Option<String>,
    text: Option<String>,
    image: Option<(Option<String>, Option<String>)>,
    thread_timestamp: Option<String>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self { author: None, timestamp: None, text: None, image: None, thread_timestamp: None }
    }

    pub fn author(mut self, name: &str, identifier: &str) -> Self {
        self.author = Some(MemberBuilder::new(name, identifier));
        self
    }

    pub fn author_member(mut self, member: MemberBuilder) -> Self {
        self.author = Some(member);
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Markup placed inside the rich-content block, not escaped
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn image(mut self, caption: Option<&str>, href: Option<&str>) -> Self {
        self.image = Some((caption.map(str::to_string), href.map(str::to_string)));
        self
    }

    /// Timestamp of the latest reply, shown on the thread handle
    pub fn thread_reply(mut self, timestamp: &str) -> Self {
        self.thread_timestamp = Some(timestamp.to_string());
        self
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<c-wiz data-is-user-topic="true">"#);
        if let Some(author) = &self.author {
            html.push_str(&author.to_html());
        }
        if let Some(timestamp) = &self.timestamp {
            html.push_str(&format!(r#"<span data-absolute-timestamp="{}">time</span>"#, timestamp));
        }
        if let Some(text) = &self.text {
            html.push_str(&format!(
                r#"<div jsaction="mouseenter:hover" jslog="123; impression"><div jscontroller="body">{}</div></div>"#,
                text
            ));
        }
        if let Some((caption, href)) = &self.image {
            html.push_str(r#"<a aria-label="Image attachment""#);
            if let Some(caption) = caption {
                html.push_str(&format!(r#" title="{}""#, attr_escape(caption)));
            }
            if let Some(href) = href {
                html.push_str(&format!(r#" href="{}""#, attr_escape(href)));
            }
            html.push_str("></a>");
        }
        if let Some(timestamp) = &self.thread_timestamp {
            html.push_str(&format!(
                r#"<div role="button">Replies <span data-absolute-timestamp="{}">later</span></div>"#,
                timestamp
            ));
        }
        html.push_str("</c-wiz>");
        html
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a full page: a sidebar and a message stream
pub struct PageBuilder {
    rows: Vec<ConversationRowBuilder>,
    messages: Vec<MessageBuilder>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new(), messages: Vec::new() }
    }

    pub fn row(mut self, row: ConversationRowBuilder) -> Self {
        self.rows.push(row);
        self
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    pub fn to_html(&self) -> String {
        let rows: String = self.rows.iter().map(|r| r.to_html()).collect();
        let messages: String = self.messages.iter().map(|m| m.to_html()).collect();
        format!(
            "<!DOCTYPE html><html><head><title>Chat</title></head><body>\
             <nav>{}</nav><main>{}</main></body></html>",
            rows, messages
        )
    }

    /// Write the page to a temporary `.html` file
    pub fn write_html(&self) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".html")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(self.to_html().as_bytes()).expect("Failed to write snapshot");
        file.flush().expect("Failed to flush snapshot");
        file
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Page with a realistic mix of channels, direct messages and messages
pub fn realistic_page() -> PageBuilder {
    PageBuilder::new()
        .row(
            ConversationRowBuilder::new("space/AAAA")
                .topic("Engine design")
                .member(MemberBuilder::new("Ada Lovelace", "ada@example.com"))
                .member(MemberBuilder::new("Charles Babbage", "charles@example.com"))
                .timestamp("1700003600.125")
                .unread(),
        )
        .row(
            ConversationRowBuilder::new("dm/alan")
                .member(MemberBuilder::new("Alan Turing", "alan@example.com"))
                .timestamp("1699990000.5"),
        )
        .message(
            MessageBuilder::new()
                .author("Ada Lovelace", "ada@example.com")
                .timestamp("1700000000.1")
                .text("Notes on the <b>engine</b>")
                .thread_reply("1700003600.125"),
        )
        .message(
            MessageBuilder::new()
                .author("Charles Babbage", "charles@example.com")
                .timestamp("1700000100.2")
                .image(
                    Some("Diagram"),
                    Some("https://chat.example.com/api/get_attachment_url?url_type=DOWNLOAD_URL&auto=true"),
                ),
        )
}
