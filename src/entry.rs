//! The record of one discovered, validated link
//!
//! An `Entry` is a union of every field any service can report. Only the
//! service name, the link and the paste it was found on are always present;
//! everything else stays `None` when a module could not extract it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a link points at a single file or a folder/album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    File,
    Folder,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Folder => "Folder",
        }
    }

    /// Maps a service-reported kind string onto a content type
    ///
    /// Services use their own vocabulary ("folder", "file", "dir"); anything
    /// unrecognized yields `None`.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "folder" | "dir" | "directory" | "album" => Some(Self::Folder),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered link plus the metadata its service module could extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The paste URL the link was found on
    pub source: String,

    /// The link exactly as matched in the paste (after mirror rewriting)
    pub link: String,

    /// Display name of the service that validated the link
    pub service: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Upload or modification date as reported by the service
    #[serde(default)]
    pub uploaded: Option<String>,

    #[serde(rename = "type", default)]
    pub content_type: Option<ContentType>,

    /// Human-readable size (e.g. `1.5 GB`) or a byte count
    #[serde(default)]
    pub size: Option<String>,

    #[serde(rename = "filecount", default)]
    pub file_count: Option<u64>,

    #[serde(default)]
    pub thumbnail: Option<String>,

    #[serde(default)]
    pub downloads: Option<u64>,

    #[serde(default)]
    pub views: Option<u64>,

    #[serde(rename = "hash", default)]
    pub integrity_hash: Option<String>,

    #[serde(rename = "malware", default)]
    pub malware_status: Option<String>,
}

impl Entry {
    /// Column names in record order, shared by the CSV header
    pub const FIELDS: [&'static str; 14] = [
        "source",
        "link",
        "service",
        "title",
        "description",
        "uploaded",
        "type",
        "size",
        "filecount",
        "thumbnail",
        "downloads",
        "views",
        "hash",
        "malware",
    ];

    /// Creates an entry with only the mandatory fields set
    pub fn new(
        service: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            link: link.into(),
            service: service.into(),
            title: None,
            description: None,
            uploaded: None,
            content_type: None,
            size: None,
            file_count: None,
            thumbnail: None,
            downloads: None,
            views: None,
            integrity_hash: None,
            malware_status: None,
        }
    }

    /// The natural identity of an entry: service plus link
    pub fn key(&self) -> (&str, &str) {
        (&self.service, &self.link)
    }

    /// Flattens the entry into one string per column, in `FIELDS` order
    pub fn to_record(&self) -> [String; 14] {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }
        fn number(value: Option<u64>) -> String {
            value.map(|n| n.to_string()).unwrap_or_default()
        }

        [
            self.source.clone(),
            self.link.clone(),
            self.service.clone(),
            text(&self.title),
            text(&self.description),
            text(&self.uploaded),
            self.content_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            text(&self.size),
            number(self.file_count),
            text(&self.thumbnail),
            number(self.downloads),
            number(self.views),
            text(&self.integrity_hash),
            text(&self.malware_status),
        ]
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.service, self.link)
    }
}
