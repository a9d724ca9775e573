//! Image payloads
//!
//! Image creation goes through multipart upload, so there is no JSON
//! create payload here; the update payload covers the metadata the caller
//! may change after upload.

use serde::Deserialize;

use super::validation::{Checker, ValidationError};

/// Parse the multipart `main_image` flag. The original clients send the
/// strings "true"/"false" in arbitrary case; anything else is false.
pub fn parse_main_image_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Partial update for an image record. Setting `main_image` to true
/// demotes every other image of the same pattern.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUpdate {
    pub main_image: Option<bool>,
    pub recipe_id: Option<i64>,
    pub observation: Option<String>,
}

impl ImageUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        if let Some(recipe_id) = self.recipe_id {
            check.positive("recipe_id", recipe_id);
        }
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing_is_case_insensitive() {
        assert!(parse_main_image_flag("true"));
        assert!(parse_main_image_flag("TRUE"));
        assert!(parse_main_image_flag(" True "));
        assert!(!parse_main_image_flag("false"));
        assert!(!parse_main_image_flag("yes"));
        assert!(!parse_main_image_flag(""));
    }

    #[test]
    fn update_rejects_bad_recipe() {
        let update = ImageUpdate {
            recipe_id: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
