//! Stitch row payloads
//!
//! A stitch row is one line of crochet instructions inside a construction
//! part (`element_id`). The wire name `stich_sequence` is kept as the
//! public API spells it.

use serde::Deserialize;

use super::validation::{Checker, ValidationError};

/// Create payload for a stitch row.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStitchRow {
    pub amigurumi_id: i64,
    pub element_id: i64,
    pub number_row: i64,
    pub colour_id: i64,
    pub stich_sequence: String,
    pub observation: String,
}

impl NewStitchRow {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        check.positive("amigurumi_id", self.amigurumi_id);
        check.positive("element_id", self.element_id);
        check.positive("number_row", self.number_row);
        check.non_empty("stich_sequence", &self.stich_sequence);
        check.finish()
    }
}

/// Partial update for a stitch row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StitchRowUpdate {
    pub element_id: Option<i64>,
    pub number_row: Option<i64>,
    pub colour_id: Option<i64>,
    pub stich_sequence: Option<String>,
    pub observation: Option<String>,
}

impl StitchRowUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        if let Some(element_id) = self.element_id {
            check.positive("element_id", element_id);
        }
        if let Some(number_row) = self.number_row {
            check.positive("number_row", number_row);
        }
        if let Some(seq) = &self.stich_sequence {
            check.non_empty("stich_sequence", seq);
        }
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_row() {
        let row = NewStitchRow {
            amigurumi_id: 1,
            element_id: 1,
            number_row: 1,
            colour_id: 2,
            stich_sequence: "6sc".into(),
            observation: "ring".into(),
        };
        assert!(row.validate().is_ok());
    }

    #[test]
    fn rejects_zero_row_number() {
        let row = NewStitchRow {
            amigurumi_id: 1,
            element_id: 1,
            number_row: 0,
            colour_id: 2,
            stich_sequence: "6sc".into(),
            observation: String::new(),
        };
        let err = row.validate().unwrap_err();
        assert_eq!(err.errors[0].loc, vec!["body", "number_row"]);
    }
}
