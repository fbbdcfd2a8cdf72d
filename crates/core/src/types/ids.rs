//! Identifier newtypes for nodes, edges, accounts, origins and pipelines

use crate::errors::{Error, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;
use xxhash_rust::xxh3::xxh3_64;

/// Length of freshly generated node and edge ids
pub const GENERATED_ID_LEN: usize = 22;

/// Upper bound accepted for ids produced elsewhere
pub const MAX_ID_LEN: usize = 64;

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LEN)
        .map(char::from)
        .collect()
}

fn id_is_well_formed(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A node id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nid(String);

impl Nid {
    /// Create a new Nid with validation
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id_is_well_formed(&id) {
            Ok(Nid(id))
        } else {
            Err(Error::invalid_argument(
                "nid",
                format!("'{id}' must be 1-{MAX_ID_LEN} ASCII alphanumerics, '-' or '_'"),
            ))
        }
    }

    /// Create a Nid without validation (use only when input is already validated)
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh random node id
    pub fn generate() -> Self {
        Self(generate_id())
    }

    /// Re-check the id shape, for ids that arrived through `new_unchecked` or serde
    pub fn is_well_formed(&self) -> bool {
        id_is_well_formed(&self.0)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Nid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Nid {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Nid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// An edge id, drawn from the same generator as node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Eid(String);

impl Eid {
    /// Allocate a fresh random edge id
    pub fn generate() -> Self {
        Self(generate_id())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Eid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of the account that owns a node or edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new AccountId
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier derived from an external source location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OriginId {
    pub id: u64,
}

impl OriginId {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    /// Hash a source location into an origin id.
    ///
    /// URLs are normalised first: the fragment is dropped and the scheme and
    /// host are lower-cased by parsing. Input that does not parse as a URL is
    /// hashed verbatim.
    pub fn from_url(location: &str) -> Self {
        let normalised = match url::Url::parse(location) {
            Ok(mut parsed) => {
                parsed.set_fragment(None);
                parsed.to_string()
            }
            Err(_) => location.to_string(),
        };
        Self {
            id: xxh3_64(normalised.as_bytes()),
        }
    }
}

impl Display for OriginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Identity of an external ingestion pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineId {
    pub id: String,
}

impl PipelineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
