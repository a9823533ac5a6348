/// Shared data structures for the catalog state
///
/// These structs represent the data model that flows between
/// the catalog store, the modal session and the UI layer.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidEntry;

/// Author shown when the uploader leaves the field blank
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Provenance string stamped on freshly added entries
pub const JUST_NOW: &str = "Just now";

/// Stable identifier of a compose entry, unique within the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of categories a compose entry can belong to.
///
/// Declaration order is the display order used by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    Databases,
    WebServers,
    Development,
    Monitoring,
    Cicd,
    Messaging,
    Storage,
    Security,
}

impl CategoryId {
    /// Every category, in enumeration order
    pub const ALL: [CategoryId; 8] = [
        CategoryId::Databases,
        CategoryId::WebServers,
        CategoryId::Development,
        CategoryId::Monitoring,
        CategoryId::Cicd,
        CategoryId::Messaging,
        CategoryId::Storage,
        CategoryId::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Databases => "databases",
            CategoryId::WebServers => "web-servers",
            CategoryId::Development => "development",
            CategoryId::Monitoring => "monitoring",
            CategoryId::Cicd => "cicd",
            CategoryId::Messaging => "messaging",
            CategoryId::Storage => "storage",
            CategoryId::Security => "security",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryId::Databases => "Databases",
            CategoryId::WebServers => "Web Servers",
            CategoryId::Development => "Development",
            CategoryId::Monitoring => "Monitoring",
            CategoryId::Cicd => "CI/CD",
            CategoryId::Messaging => "Message Queues",
            CategoryId::Storage => "Storage",
            CategoryId::Security => "Security",
        }
    }
}

impl FromStr for CategoryId {
    type Err = InvalidEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryId::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| InvalidEntry::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Category selection used by the filter: either the "all" pseudo-category
/// or one concrete category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    pub const ALL_ID: &'static str = "all";

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => Self::ALL_ID,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.display_name(),
        }
    }

    /// Whether an entry in `category` passes this selection
    pub fn admits(&self, category: CategoryId) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = InvalidEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_ID {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// Reference to the image shown on an entry's card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Thumbnail {
    /// Image hosted elsewhere (bundled asset path or URL)
    Url(String),
    /// Uploaded image bytes kept inside the entry record
    Data { media_type: String, bytes: Vec<u8> },
}

/// Represents a single compose recipe in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeEntry {
    /// Identity key, never reassigned
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub category: CategoryId,
    /// Free-form labels in the order they were entered (duplicates allowed)
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    /// Display-only provenance ("2 days ago", "Just now")
    pub created_at: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    /// The raw docker-compose YAML, stored verbatim
    pub docker_compose: String,
}

impl ComposeEntry {
    /// First required text field that is blank, if any
    pub fn missing_required_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("docker compose", &self.docker_compose),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// Number of lines in the compose document, as shown by the editor
    pub fn line_count(&self) -> usize {
        self.docker_compose.split('\n').count()
    }
}
