//! # Design Sessions
//!
//! A `DesignSession` is what gets written to a `.pcap` file: who is working
//! on which job, plus the layout grid and design form values. Pile
//! coordinates, reactions and results live with the calculation service
//! and are regenerated after loading.
//!
//! ```rust
//! use cap_core::session::DesignSession;
//!
//! let session = DesignSession::new("Jane Engineer", "25-042", "County DOT");
//! let json = serde_json::to_string_pretty(&session).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::{DesignInputs, LayoutRequest};

/// Current schema version for .pcap files
pub const SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSession {
    pub meta: SessionMetadata,
    #[serde(default)]
    pub inputs: DesignInputs,
    #[serde(default)]
    pub layout: LayoutRequest,
}

impl DesignSession {
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        DesignSession {
            meta: SessionMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            inputs: DesignInputs::default(),
            layout: LayoutRequest::default(),
        }
    }

    /// Replace the stored form values. Only bumps `modified` when something changed.
    pub fn update(&mut self, layout: &LayoutRequest, inputs: &DesignInputs) -> bool {
        if self.layout == *layout && self.inputs == *inputs {
            return false;
        }
        self.layout = *layout;
        self.inputs = inputs.clone();
        self.touch();
        true
    }

    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Short label for window titles: job id, or "Untitled".
    pub fn title(&self) -> &str {
        if self.meta.job_id.trim().is_empty() {
            "Untitled"
        } else {
            &self.meta.job_id
        }
    }
}

impl Default for DesignSession {
    fn default() -> Self {
        DesignSession::new("", "", "")
    }
}

/// Session header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub id: Uuid,
    /// Schema version (for migration compatibility)
    pub version: String,
    pub engineer: String,
    pub job_id: String,
    pub client: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = DesignSession::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(session.meta.engineer, "John Doe");
        assert_eq!(session.meta.version, SCHEMA_VERSION);
        assert_eq!(session.meta.created, session.meta.modified);
        assert_eq!(session.layout, LayoutRequest::default());
        assert_eq!(session.title(), "25-001");
        assert_eq!(DesignSession::default().title(), "Untitled");
    }

    #[test]
    fn test_session_serialization() {
        let mut session = DesignSession::new("Jane Engineer", "25-042", "Test Client");
        session.layout.n_x = 8;
        let json = serde_json::to_string_pretty(&session).unwrap();
        assert!(json.contains("Jane Engineer"));

        let roundtrip: DesignSession = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, session);
    }

    #[test]
    fn test_update_only_touches_on_change() {
        let mut session = DesignSession::new("E", "J", "C");
        let layout = session.layout;
        let inputs = session.inputs.clone();
        assert!(!session.update(&layout, &inputs));

        let mut wider = layout;
        wider.s_x = 5.0;
        assert!(session.update(&wider, &inputs));
        assert_eq!(session.layout.s_x, 5.0);
        assert!(session.meta.modified >= session.meta.created);
    }

    #[test]
    fn test_missing_form_sections_default() {
        let session = DesignSession::new("E", "J", "C");
        let mut value = serde_json::to_value(&session).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("inputs");
        obj.remove("layout");
        let loaded: DesignSession = serde_json::from_value(value).unwrap();
        assert_eq!(loaded.inputs, DesignInputs::default());
    }
}
