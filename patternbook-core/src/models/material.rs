//! Material payloads
//!
//! One material line belongs to a pattern and to a material set
//! (`recipe_id`); several alternative sets can exist for the same pattern.

use serde::Deserialize;

use super::validation::{Checker, ValidationError};

/// Create payload for a material line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMaterial {
    pub amigurumi_id: i64,
    pub material_name: String,
    pub quantity: String,
    /// Material-set grouping number.
    pub recipe_id: i64,
    /// Colour this material maps to in the stitch rows, when it is a yarn.
    pub colour_id: Option<i64>,
}

impl NewMaterial {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        check.positive("amigurumi_id", self.amigurumi_id);
        check.non_empty("material_name", &self.material_name);
        check.non_empty("quantity", &self.quantity);
        check.positive("recipe_id", self.recipe_id);
        check.finish()
    }
}

/// Partial update for a material line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialUpdate {
    pub material_name: Option<String>,
    pub quantity: Option<String>,
    pub recipe_id: Option<i64>,
    pub colour_id: Option<i64>,
}

impl MaterialUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = Checker::new();
        if let Some(name) = &self.material_name {
            check.non_empty("material_name", name);
        }
        if let Some(quantity) = &self.quantity {
            check.non_empty("quantity", quantity);
        }
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
    fn valid_material() {
        let m = NewMaterial {
            amigurumi_id: 1,
            material_name: "cotton yarn".into(),
            quantity: "2 skeins".into(),
            recipe_id: 1,
            colour_id: Some(2),
        };
        assert!(m.validate().is_ok());
    }

    #[test]
    fn rejects_blank_quantity() {
        let m = NewMaterial {
            amigurumi_id: 1,
            material_name: "stuffing".into(),
            quantity: " ".into(),
            recipe_id: 1,
            colour_id: None,
        };
        let err = m.validate().unwrap_err();
        assert_eq!(err.errors[0].loc, vec!["body", "quantity"]);
    }
}
