//! Persona descriptors consumed as opaque input.
//!
//! Personas are produced by an upstream ETL step from survey records; the
//! engine treats them as opaque apart from the numeric partisanship score,
//! which the `other_partisan` timeline strategy reads. Field names mirror
//! the persona catalog file so the catalog deserializes directly.

use serde::{Deserialize, Serialize};

/// One persona record from the persona catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Free-text persona description used as the agent's system message.
    #[serde(rename = "persona")]
    pub description: String,

    /// Party label used only for stratified sampling at run start.
    pub party: String,

    /// Partisanship score in [-1, 1]; the only field the engine reads.
    #[serde(rename = "partisan")]
    pub partisanship: f64,

    /// Short informal biography, generated at run start when the link
    /// policy shows profiles. Absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
}

impl Persona {
    /// Create a persona with no biography.
    pub fn new(description: impl Into<String>, party: impl Into<String>, partisanship: f64) -> Self {
        Self {
            description: description.into(),
            party: party.into(),
            partisanship,
            biography: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_field_names_deserialize() {
        let raw = r#"{"persona": "A retired teacher from Ohio.", "party": "Democrat", "partisan": -0.6}"#;
        let parsed: Result<Persona, _> = serde_json::from_str(raw);
        let Ok(persona) = parsed else {
            assert!(parsed.is_ok());
            return;
        };
        assert_eq!(persona.description, "A retired teacher from Ohio.");
        assert_eq!(persona.party, "Democrat");
        assert!((persona.partisanship - (-0.6)).abs() < f64::EPSILON);
        assert!(persona.biography.is_none());
    }

    #[test]
    fn biography_omitted_when_absent() {
        let persona = Persona::new("desc", "Non-partisan", 0.0);
        let json = serde_json::to_string(&persona).unwrap_or_default();
        assert!(!json.contains("biography"));
    }
}
