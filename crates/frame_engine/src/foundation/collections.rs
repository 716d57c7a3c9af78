//! Specialized collection types

pub use slotmap::{new_key_type, Key, SlotMap};

/// Ordered list of arena keys
///
/// Registries never own what they list: an entry may point at a slot that
/// has already been released, so callers resolve every key against its
/// arena before use and skip the ones that no longer resolve.
///
/// Iteration is index based ([`Registry::get`] with a bound re-read on every
/// step) so entries appended during a pass are still visited by that pass.
#[derive(Debug, Clone)]
pub struct Registry<K> {
    items: Vec<K>,
}

impl<K: Copy + PartialEq> Registry<K> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a key at the end
    pub fn push(&mut self, key: K) {
        self.items.push(key);
    }

    /// Remove the first entry equal to `key`
    ///
    /// Returns `false` when nothing matched, so a second removal of the same
    /// key is a no-op.
    pub fn remove(&mut self, key: K) -> bool {
        match self.items.iter().position(|k| *k == key) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Key at `index`, if any
    pub fn get(&self, index: usize) -> Option<K> {
        self.items.get(index).copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the current entries
    pub fn snapshot(&self) -> Vec<K> {
        self.items.clone()
    }

    /// Mutable view for in-place reordering
    pub(crate) fn as_mut_slice(&mut self) -> &mut [K] {
        &mut self.items
    }
}

impl<K: Copy + PartialEq> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut registry = Registry::new();
        registry.push(3);
        registry.push(1);
        registry.push(2);
        assert_eq!(registry.snapshot(), vec![3, 1, 2]);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut registry = Registry::new();
        registry.push(7);
        registry.push(8);
        registry.push(7);
        assert!(registry.remove(7));
        assert_eq!(registry.snapshot(), vec![8, 7]);
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut registry = Registry::new();
        registry.push(1);
        registry.push(2);
        assert!(registry.remove(1));
        assert!(!registry.remove(1));
        assert_eq!(registry.snapshot(), vec![2]);
    }

    #[test]
    fn test_index_iteration_sees_appends() {
        let mut registry = Registry::new();
        registry.push(0);
        let mut visited = Vec::new();
        let mut i = 0;
        while let Some(k) = registry.get(i) {
            visited.push(k);
            if k < 3 {
                registry.push(k + 1);
            }
            i += 1;
        }
        assert_eq!(visited, vec![0, 1, 2, 3]);
    }
}
