//! File storage for uploaded images.

pub mod images;

pub use images::{ImageStore, StoreError};
