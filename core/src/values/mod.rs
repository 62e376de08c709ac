//! Bound value arena
//!
//! Host variables the overlay observes live in a [`ValueStore`]. Inserting a
//! value hands back a typed [`ValueKey`]; the key's [`ValueId`] is the
//! identity the binding registry groups widgets under. The registry never
//! reads through an id, it only uses it as a map key.

mod image;

pub use image::DebugImage;

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{OverlayError, Result};

/// Source of per-store identities
static NEXT_STORE: AtomicU32 = AtomicU32::new(0);

/// Opaque identity of one bound value: the issuing store and its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId {
    store: u32,
    slot: u32,
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value#{}.{}", self.store, self.slot)
    }
}

/// Typed handle to a value owned by a [`ValueStore`]
pub struct ValueKey<T> {
    id: ValueId,
    marker: PhantomData<fn() -> T>,
}

impl<T> ValueKey<T> {
    /// Identity used by the binding registry
    pub fn id(&self) -> ValueId {
        self.id
    }
}

impl<T> Clone for ValueKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ValueKey<T> {}

impl<T> PartialEq for ValueKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ValueKey<T> {}

impl<T> fmt::Debug for ValueKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueKey({})", self.id)
    }
}

/// Storage slot for one bound value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSlot {
    Flag(bool),
    Scalar(f64),
    Series(Vec<f64>),
    Image(DebugImage),
}

/// Types that can be stored in a [`ValueStore`] and bound to widgets
pub trait BindableValue: Sized + 'static {
    fn into_slot(self) -> ValueSlot;
    fn from_slot(slot: &ValueSlot) -> Option<&Self>;
    fn from_slot_mut(slot: &mut ValueSlot) -> Option<&mut Self>;
}

macro_rules! bindable {
    ($ty:ty, $variant:ident) => {
        impl BindableValue for $ty {
            fn into_slot(self) -> ValueSlot {
                ValueSlot::$variant(self)
            }

            fn from_slot(slot: &ValueSlot) -> Option<&Self> {
                match slot {
                    ValueSlot::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_slot_mut(slot: &mut ValueSlot) -> Option<&mut Self> {
                match slot {
                    ValueSlot::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

bindable!(bool, Flag);
bindable!(f64, Scalar);
bindable!(Vec<f64>, Series);
bindable!(DebugImage, Image);

/// Arena of host values observed by the overlay
///
/// Every store gets its own identity, so a key only resolves in the store
/// that issued it (or a clone of that store).
#[derive(Debug, Clone)]
pub struct ValueStore {
    id: u32,
    slots: Vec<ValueSlot>,
}

impl Default for ValueStore {
    fn default() -> Self {
        Self {
            id: NEXT_STORE.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
        }
    }
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a value into the store and return its key
    pub fn insert<T: BindableValue>(&mut self, value: T) -> ValueKey<T> {
        let id = ValueId {
            store: self.id,
            slot: self.slots.len() as u32,
        };
        self.slots.push(value.into_slot());
        ValueKey {
            id,
            marker: PhantomData,
        }
    }

    pub fn get<T: BindableValue>(&self, key: ValueKey<T>) -> Option<&T> {
        let slot = self.slot_index(key.id)?;
        T::from_slot(&self.slots[slot])
    }

    pub fn get_mut<T: BindableValue>(&mut self, key: ValueKey<T>) -> Option<&mut T> {
        let slot = self.slot_index(key.id)?;
        T::from_slot_mut(&mut self.slots[slot])
    }

    /// Slot of an id issued by this store
    fn slot_index(&self, id: ValueId) -> Option<usize> {
        let slot = id.slot as usize;
        (id.store == self.id && slot < self.slots.len()).then_some(slot)
    }

    /// Overwrite a stored value
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::UnknownValue`] if the key does not name a slot
    /// of this store holding a `T`.
    pub fn set<T: BindableValue>(&mut self, key: ValueKey<T>, value: T) -> Result<()> {
        let slot = self
            .get_mut(key)
            .ok_or(OverlayError::UnknownValue(key.id))?;
        *slot = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut store = ValueStore::new();
        let flag = store.insert(true);
        let speed = store.insert(2.5_f64);

        assert_eq!(store.get(flag), Some(&true));
        assert_eq!(store.get(speed), Some(&2.5));
        assert_ne!(flag.id(), speed.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = ValueStore::new();
        let series = store.insert(vec![1.0, 2.0]);
        store.set(series, vec![3.0]).unwrap();
        assert_eq!(store.get(series), Some(&vec![3.0]));
    }

    #[test]
    fn test_foreign_key_is_rejected() {
        let mut other = ValueStore::new();
        let foreign = other.insert(1.0_f64);

        // Same kind at the same slot index
        let mut store = ValueStore::new();
        let local = store.insert(42.0_f64);
        assert_ne!(local.id(), foreign.id());

        assert!(store.get(foreign).is_none());
        assert!(store.get_mut(foreign).is_none());
        assert!(matches!(
            store.set(foreign, 7.0),
            Err(OverlayError::UnknownValue(id)) if id == foreign.id()
        ));
        assert_eq!(store.get(local), Some(&42.0));
        assert_eq!(other.get(foreign), Some(&1.0));
    }

    #[test]
    fn test_clone_resolves_original_keys() {
        let mut store = ValueStore::new();
        let flag = store.insert(true);
        let snapshot = store.clone();
        assert_eq!(snapshot.get(flag), Some(&true));
    }

    #[test]
    fn test_kind_mismatch_reads_none() {
        let mut store = ValueStore::new();
        let flag = store.insert(false);
        let as_scalar = ValueKey::<f64> {
            id: flag.id(),
            marker: PhantomData,
        };
        assert!(store.get(as_scalar).is_none());
        assert!(store.set(as_scalar, 1.0).is_err());
        assert_eq!(store.get(flag), Some(&false));
    }
}
