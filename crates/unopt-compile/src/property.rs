//! `PropertySet` and related types for pass communication.
//!
//! Passes share data through a [`PropertySet`]: the target basis lives in a
//! dedicated field, anything else is stored as a typed custom property.
//!
//! ```
//! use unopt_compile::{BasisGates, PropertySet};
//!
//! #[derive(Debug, PartialEq)]
//! struct Rounds(usize);
//!
//! let mut props = PropertySet::new().with_basis(BasisGates::cx_u());
//! props.insert(Rounds(2));
//!
//! assert!(props.basis_gates.as_ref().unwrap().contains("u"));
//! assert_eq!(props.get::<Rounds>(), Some(&Rounds(2)));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// Gate names a translated circuit may contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGates {
    gates: Vec<String>,
}

impl BasisGates {
    /// Create a new basis gates set.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a gate is in the basis.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    /// Get the basis gates.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// The resynthesis target: `cx` plus the generic single-qubit `u`.
    pub fn cx_u() -> Self {
        Self::new(["cx", "u"])
    }

}

impl Default for BasisGates {
    fn default() -> Self {
        Self::cx_u()
    }
}

/// Properties shared between compilation passes.
pub struct PropertySet {
    /// Target basis for translation passes.
    pub basis_gates: Option<BasisGates>,

    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self {
            basis_gates: None,
            custom: FxHashMap::default(),
        }
    }

    /// Set the target basis.
    #[must_use]
    pub fn with_basis(mut self, basis_gates: BasisGates) -> Self {
        self.basis_gates = Some(basis_gates);
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }
}

impl Default for PropertySet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySet")
            .field("basis_gates", &self.basis_gates)
            .field("custom", &self.custom.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_gates() {
        let basis = BasisGates::cx_u();
        assert!(basis.contains("cx"));
        assert!(basis.contains("u"));
        assert!(!basis.contains("h"));
        assert_eq!(BasisGates::default(), basis);
    }

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_custom() {
        let mut props = PropertySet::new();

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        assert_eq!(props.get::<CustomData>(), None);
        props.insert(CustomData(42));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));

        // A later insert of the same type replaces the earlier one.
        props.insert(CustomData(43));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(43)));
    }
}
