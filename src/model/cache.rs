//! Bounded structural-element cache
//!
//! Keyed by the exact source text of an element occurrence, so identical
//! markup recurring anywhere (copy-paste, templated repetition, other
//! documents) reuses one parsed tree. A hit returns a clone rebased to the
//! caller's offset. The cache is the only shared mutable state across
//! concurrent document passes, so lookup and insertion sit under one mutex.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::model::builder::build_element;
use crate::model::element::XamlElement;

pub struct ElementCache {
    inner: Mutex<LruCache<String, XamlElement>>,
}

impl ElementCache {
    pub const DEFAULT_CAPACITY: usize = 200;

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        ElementCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the structural model for `text` at `offset`, building and
    /// caching it on a miss
    pub fn get_or_build(&self, text: &str, offset: usize) -> XamlElement {
        if let Some(mut hit) = self.lookup(text) {
            hit.rebase(offset);
            return hit;
        }

        // Built outside the lock; a racing builder for the same key just
        // overwrites with an equivalent tree
        let element = build_element(text, offset);
        self.lock().put(text.to_string(), element.clone());
        element
    }

    fn lookup(&self, text: &str) -> Option<XamlElement> {
        self.lock().get(text).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, XamlElement>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for ElementCache {
    fn default() -> Self {
        ElementCache::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rebases_offsets() {
        let cache = ElementCache::default();
        let text = r#"<TextBlock Text="Hi" />"#;

        let first = cache.get_or_build(text, 10);
        let second = cache.get_or_build(text, 250);

        assert_eq!(first.name, second.name);
        assert_eq!(first.attributes.len(), second.attributes.len());
        assert_eq!(second.offset, 250);
        assert_eq!(
            second.attributes[0].offset - second.offset,
            first.attributes[0].offset - first.offset
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rebased_shape_identical() {
        let cache = ElementCache::default();
        let text = "<Grid><TextBlock Text=\"A\" /><Border /></Grid>";

        let a = cache.get_or_build(text, 0);
        let b = cache.get_or_build(text, 1000);

        assert_eq!(a.children.len(), b.children.len());
        assert_eq!(b.children[0].offset, 1000 + 6);
        assert_eq!(b.children[0].attributes[0].offset - 1000, a.children[0].attributes[0].offset);
    }

    #[test]
    fn test_capacity_bound() {
        let cache = ElementCache::new(2);
        cache.get_or_build("<A />", 0);
        cache.get_or_build("<B />", 0);
        cache.get_or_build("<C />", 0);
        assert_eq!(cache.len(), 2);
    }
}
