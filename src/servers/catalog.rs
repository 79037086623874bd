//! Read-only catalog servers
//!
//! A catalog exposes `<scheme>://catalog` with every entry as JSON, and one
//! `<scheme>://item/<id>` resource per entry.

use crate::config::{Book, Media};
use crate::mcp::protocol::{ReadResourceResult, Resource, ServerCapabilities, ServerInfo};
use crate::mcp::service::{capabilities, McpService};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::Serialize;

const JSON: &str = "application/json";

pub trait CatalogEntry: Serialize + Send + Sync {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    /// One-line description shown in `resources/list`
    fn summary(&self) -> String;
}

impl CatalogEntry for Book {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> String {
        format!("By {} ({})", self.author, self.year)
    }
}

impl CatalogEntry for Media {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> String {
        format!("{} by {} ({})", self.genre, self.creator, self.year)
    }
}

pub struct CatalogServer<T> {
    server_name: &'static str,
    scheme: &'static str,
    catalog_name: &'static str,
    entries: Vec<T>,
}

impl CatalogServer<Book> {
    pub fn books(entries: Vec<Book>) -> Self {
        Self {
            server_name: "book-library-server",
            scheme: "books",
            catalog_name: "Book catalog",
            entries,
        }
    }
}

impl CatalogServer<Media> {
    pub fn media(entries: Vec<Media>) -> Self {
        Self {
            server_name: "media-catalog-server",
            scheme: "media",
            catalog_name: "Media catalog",
            entries,
        }
    }
}

impl<T: CatalogEntry> CatalogServer<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn catalog_uri(&self) -> String {
        format!("{}://catalog", self.scheme)
    }

    fn item_uri(&self, id: &str) -> String {
        format!("{}://item/{}", self.scheme, id)
    }

    fn item_id<'a>(&self, uri: &'a str) -> Option<&'a str> {
        uri.strip_prefix(self.scheme)
            .and_then(|rest| rest.strip_prefix("://item/"))
            .filter(|id| !id.is_empty())
    }
}

#[async_trait]
impl<T: CatalogEntry> McpService for CatalogServer<T> {
    fn info(&self) -> ServerInfo {
        ServerInfo::new(self.server_name, "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(false, true, false)
    }

    async fn resources(&self) -> Result<Vec<Resource>> {
        let mut resources = vec![Resource {
            uri: self.catalog_uri(),
            name: self.catalog_name.to_string(),
            description: Some(format!("All {} entries", self.entries.len())),
            mime_type: Some(JSON.to_string()),
        }];

        resources.extend(self.entries.iter().map(|entry| Resource {
            uri: self.item_uri(entry.id()),
            name: entry.title().to_string(),
            description: Some(entry.summary()),
            mime_type: Some(JSON.to_string()),
        }));

        Ok(resources)
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        if uri == self.catalog_uri() {
            let text = serde_json::to_string_pretty(&self.entries)?;
            return Ok(ReadResourceResult::single(uri, JSON, text));
        }

        if let Some(id) = self.item_id(uri) {
            let entry = self
                .entries
                .iter()
                .find(|e| e.id() == id)
                .ok_or_else(|| HandsOnError::UnknownResource(uri.to_string()))?;
            let text = serde_json::to_string_pretty(entry)?;
            return Ok(ReadResourceResult::single(uri, JSON, text));
        }

        Err(HandsOnError::UnknownResource(uri.to_string()))
    }
}
