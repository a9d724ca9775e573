//! Pattern payloads
//!
//! A pattern is the top-level record of the catalog. Wire field names match
//! the public API: `amigurumi_id`, `autor`,
//! `amigurumi_id_of_linked_amigurumi`.

use chrono::NaiveDate;
use serde::Deserialize;

use super::validation::{Checker, ValidationError};

/// Create payload for a pattern. The primary key and, when absent, the
/// date are filled in by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPattern {
    pub name: String,
    pub size: f64,
    pub autor: String,
    pub date: Option<NaiveDate>,
    pub link: Option<String>,
    /// Optional back-reference to the principal pattern this one belongs to.
    pub amigurumi_id_of_linked_amigurumi: Option<i64>,
    pub note: Option<String>,
}

impl NewPattern {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        check.non_empty("name", &self.name);
        check.non_empty("autor", &self.autor);
        check.positive_f64("size", self.size);
        check.finish()
    }
}

/// Partial update for a pattern. Absent fields are left unchanged;
/// unknown keys are ignored rather than applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternUpdate {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub autor: Option<String>,
    pub date: Option<NaiveDate>,
    pub link: Option<String>,
    pub amigurumi_id_of_linked_amigurumi: Option<i64>,
    pub note: Option<String>,
}

impl PatternUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        if let Some(name) = &self.name {
            check.non_empty("name", name);
        }
        if let Some(autor) = &self.autor {
            check.non_empty("autor", autor);
        }
        if let Some(size) = self.size {
            check.positive_f64("size", size);
        }
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bear() -> NewPattern {
        NewPattern {
            name: "Bear".into(),
            size: 20.0,
            autor: "Ana".into(),
            date: None,
            link: None,
            amigurumi_id_of_linked_amigurumi: None,
            note: None,
        }
    }

    #[test]
    fn valid_pattern() {
        assert!(bear().validate().is_ok());
    }

    #[test]
    fn rejects_empty_name_and_author() {
        let mut p = bear();
        p.name = "  ".into();
        p.autor = String::new();
        let err = p.validate().unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.errors[0].loc, vec!["body", "name"]);
    }

    #[test]
    fn rejects_nonpositive_size() {
        let mut p = bear();
        p.size = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn update_only_checks_present_fields() {
        let update = PatternUpdate {
            size: Some(12.5),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = PatternUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn deserializes_wire_names() {
        let p: NewPattern = serde_json::from_str(
            r#"{"name":"Bear","size":20,"autor":"Ana","amigurumi_id_of_linked_amigurumi":3}"#,
        )
        .unwrap();
        assert_eq!(p.amigurumi_id_of_linked_amigurumi, Some(3));
    }
}
