//! Request payloads with validation
//!
//! Each entity gets two hand-written payloads: a create payload (no
//! primary key, the server generates it) and an update payload where every
//! field is optional and only the fields present in the body are applied.
//! `validate()` returns the accumulated field errors, never panics.

pub mod image;
pub mod material;
pub mod pattern;
pub mod sequence;
pub mod stitch_row;
pub mod validation;

pub use image::{parse_main_image_flag, ImageUpdate};
pub use material::{MaterialUpdate, NewMaterial};
pub use pattern::{NewPattern, PatternUpdate};
pub use sequence::{NewSequenceElement, SequenceElementUpdate};
pub use stitch_row::{NewStitchRow, StitchRowUpdate};
pub use validation::{Checker, FieldError, ValidationError};
