//! Sequence element payloads
//!
//! A sequence element is one named construction part of a pattern ("head",
//! "arm") with its position in the build order and how many copies to make.

use serde::Deserialize;

use super::validation::{Checker, ValidationError};

/// Create payload for a sequence element.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSequenceElement {
    pub amigurumi_id: i64,
    pub element_order: i64,
    pub element_name: String,
    pub repetition: i64,
}

impl NewSequenceElement {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        check.positive("amigurumi_id", self.amigurumi_id);
        check.positive("element_order", self.element_order);
        check.non_empty("element_name", &self.element_name);
        check.positive("repetition", self.repetition);
        check.finish()
    }
}

/// Partial update for a sequence element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SequenceElementUpdate {
    pub element_order: Option<i64>,
    pub element_name: Option<String>,
    pub repetition: Option<i64>,
}

impl SequenceElementUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        if let Some(order) = self.element_order {
            check.positive("element_order", order);
        }
        if let Some(name) = &self.element_name {
            check.non_empty("element_name", name);
        }
        if let Some(repetition) = self.repetition {
            check.positive("repetition", repetition);
        }
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_element() {
        let e = NewSequenceElement {
            amigurumi_id: 1,
            element_order: 1,
            element_name: "Head".into(),
            repetition: 1,
        };
        assert!(e.validate().is_ok());
    }

    #[test]
    fn rejects_zero_repetition() {
        let e = NewSequenceElement {
            amigurumi_id: 1,
            element_order: 1,
            element_name: "Arm".into(),
            repetition: 0,
        };
        assert!(e.validate().is_err());
    }
}
