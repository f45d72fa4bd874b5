//! Domain types for stored simulations.
//!
//! A simulation is an HTML document filed under a subject and a free-text
//! chapter label, addressable by a backend-generated identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed set of academic subjects used to namespace simulations.
///
/// The set is closed: anything outside it is rejected at parse time, so an
/// invalid subject can never reach the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Physics,
    Maths,
    Chemistry,
    Biology,
}

impl Subject {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Physics => "Physics",
            Self::Maths => "Maths",
            Self::Chemistry => "Chemistry",
            Self::Biology => "Biology",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = InvalidSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Physics" => Ok(Self::Physics),
            "Maths" => Ok(Self::Maths),
            "Chemistry" => Ok(Self::Chemistry),
            "Biology" => Ok(Self::Biology),
            _ => Err(InvalidSubject),
        }
    }
}

/// Error returned when a string is not a member of the subject set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSubject;

impl fmt::Display for InvalidSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid subject")
    }
}

impl std::error::Error for InvalidSubject {}

/// A validated upload, ready to be persisted.
#[derive(Debug, Clone, Serialize)]
pub struct NewSimulation {
    pub subject: Subject,
    pub chapter: String,
    pub html_content: String,
}

/// Row shape returned by the listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub id: Uuid,
    pub chapter: String,
    pub html_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_parse_valid() {
        assert_eq!("Physics".parse::<Subject>(), Ok(Subject::Physics));
        assert_eq!("Maths".parse::<Subject>(), Ok(Subject::Maths));
        assert_eq!("Chemistry".parse::<Subject>(), Ok(Subject::Chemistry));
        assert_eq!("Biology".parse::<Subject>(), Ok(Subject::Biology));
    }

    #[test]
    fn test_subject_parse_rejects_unknown() {
        assert!("History".parse::<Subject>().is_err());
        assert!("physics".parse::<Subject>().is_err());
        assert!("".parse::<Subject>().is_err());
    }

    #[test]
    fn test_subject_serde_uses_capitalized_names() {
        let json = serde_json::to_string(&Subject::Chemistry).unwrap();
        assert_eq!(json, "\"Chemistry\"");

        let parsed: Subject = serde_json::from_str("\"Biology\"").unwrap();
        assert_eq!(parsed, Subject::Biology);

        assert!(serde_json::from_str::<Subject>("\"Geography\"").is_err());
    }

    #[test]
    fn test_subject_display_round_trip() {
        let all = [
            Subject::Physics,
            Subject::Maths,
            Subject::Chemistry,
            Subject::Biology,
        ];
        for subject in all {
            assert_eq!(subject.as_str().parse::<Subject>(), Ok(subject));
        }
    }
}
