//! YAML fixtures for seeding a [`MemoryStore`](crate::MemoryStore).
//!
//! ```yaml
//! sites:
//!   - id: 1
//!     name: Main
//!     host: example.com
//! pages:
//!   - id: 1
//!     site: 1
//!     name: Home
//!   - id: 2
//!     site: 1
//!     parent: 1
//!     name: About
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::{Page, Site};
use crate::store::{StoreError, StoreErrorKind};

/// Sites and pages as stored in a fixture file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Fixture {
    /// Parse a fixture from YAML content.
    ///
    /// Empty content yields an empty fixture.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::Serialization`] if the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, StoreError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(trimmed).map_err(|e| {
            StoreError::new(StoreErrorKind::Serialization)
                .with_message(format!("Invalid YAML: {e}"))
        })
    }

    /// Serialize the fixture to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::Serialization`] if a settings value cannot
    /// be represented in YAML.
    pub fn to_yaml(&self) -> Result<String, StoreError> {
        serde_yaml::to_string(self)
            .map_err(|e| StoreError::new(StoreErrorKind::Serialization).with_source(e))
    }
}
