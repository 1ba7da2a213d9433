//! Passes driven by the target basis.

pub mod translation;

pub use translation::{BasisTranslation, UnrollCustomDefinitions};
