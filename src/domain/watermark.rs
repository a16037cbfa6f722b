use serde::{Deserialize, Serialize};

/// Identifier of the newest entry handled so far.
///
/// `None` means no check has ever completed. Persisted as
/// `{"lastGuid": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    #[serde(rename = "lastGuid", default)]
    pub last_guid: Option<String>,
}

impl Watermark {
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            last_guid: Some(guid.into()),
        }
    }

    pub fn last_guid(&self) -> Option<&str> {
        self.last_guid.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.last_guid.is_some()
    }

    /// Whether moving to `candidate` would change the stored value.
    pub fn differs_from(&self, candidate: &str) -> bool {
        self.last_guid.as_deref() != Some(candidate)
    }
}
