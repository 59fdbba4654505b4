//! RotorCatalog: ownership arena for every available rotor.
//!
//! Machine slots refer to rotors by [`RotorId`] instead of holding
//! references, so the catalog is the single owner of each rotor's mutable
//! setting. Stepping a rotor through a slot is visible through the catalog
//! and through any other slot bound to the same id.

use crate::rotor::Rotor;

/// Identifier of a rotor within a [`RotorCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Arena of rotors, addressable by [`RotorId`] or by name.
#[derive(Debug, Clone, Default)]
pub struct RotorCatalog {
    rotors: Vec<Rotor>,
}

impl RotorCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        RotorCatalog { rotors: Vec::new() }
    }

    /// Creates a new empty catalog with room for `capacity` rotors.
    pub fn with_capacity(capacity: usize) -> Self {
        RotorCatalog {
            rotors: Vec::with_capacity(capacity),
        }
    }

    /// Adds `rotor` to the catalog.
    ///
    /// # Returns
    /// The [`RotorId`] of the new entry.
    pub fn add(&mut self, rotor: Rotor) -> RotorId {
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        id
    }

    /// Returns the rotor at `id`, if any.
    pub fn get(&self, id: RotorId) -> Option<&Rotor> {
        self.rotors.get(id.0)
    }

    /// Returns the rotor at `id` mutably, if any.
    pub fn get_mut(&mut self, id: RotorId) -> Option<&mut Rotor> {
        self.rotors.get_mut(id.0)
    }

    /// Finds the first rotor whose name matches `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|r| r.name().eq_ignore_ascii_case(name))
            .map(RotorId)
    }

    /// Returns the number of rotors.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the catalog holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates over `(id, rotor)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RotorId, &Rotor)> + '_ {
        self.rotors.iter().enumerate().map(|(i, r)| (RotorId(i), r))
    }
}

impl FromIterator<Rotor> for RotorCatalog {
    fn from_iter<T: IntoIterator<Item = Rotor>>(iter: T) -> Self {
        RotorCatalog {
            rotors: iter.into_iter().collect(),
        }
    }
}
