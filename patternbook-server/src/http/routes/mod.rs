//! Route modules, one per entity plus the support pages.

pub mod images;
pub mod materials;
pub mod pages;
pub mod patterns;
pub mod sequence;
pub mod stitchbook;
