//! Box registry: stable identities for named diagram entities
//!
//! Every shape is keyed by its name, the text before the first `|`. The first
//! time a name is seen it gets the next identifier; re-declaring it only
//! updates the stored label when the new label is strictly longer, so a rich
//! `[Customer|name;email]` declaration survives later bare `[Customer]`
//! references.

use std::collections::HashMap;
use std::fmt;

use super::error::DiagramError;

/// Identifier assigned in first-seen order.
///
/// Displays as `A000`, `A001`, ... which is a valid identifier in both the
/// graph and the picture markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(usize);

impl BoxId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{:03}", self.0)
    }
}

/// Name key of a label: everything before the first `|`, trimmed.
pub fn record_name(spec: &str) -> &str {
    spec.split('|').next().unwrap_or_default().trim()
}

/// A registered entity
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramBox {
    name: String,
    spec: String,
    id: BoxId,
    width: Option<f64>,
    right_margin: f64,
}

impl DiagramBox {
    fn new(name: &str, spec: &str, id: BoxId) -> Self {
        Self {
            name: name.to_string(),
            spec: spec.to_string(),
            id,
            width: None,
            right_margin: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The richest label seen for this name so far.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn right_margin(&self) -> f64 {
        self.right_margin
    }

    /// Keep `spec` if it is strictly longer than the stored label.
    fn merge(&mut self, spec: &str) -> bool {
        if spec.chars().count() > self.spec.chars().count() {
            self.spec = spec.to_string();
            true
        } else {
            false
        }
    }

    /// Width in layout units, computed from the current label on first use.
    ///
    /// Once set the width never changes, even if a longer label arrives later.
    pub fn size(&mut self, unit_per_char: f64) -> f64 {
        let chars = self.spec.chars().count();
        *self
            .width
            .get_or_insert_with(|| chars as f64 * unit_per_char)
    }

    /// Grow the right margin to `gap` if it is larger; margins never shrink.
    pub fn reserve_right_margin(&mut self, gap: f64) -> bool {
        if gap > self.right_margin {
            self.right_margin = gap;
            true
        } else {
            false
        }
    }
}

/// Per-run registry of boxes in identifier order
#[derive(Debug, Default, Clone)]
pub struct BoxRegistry {
    boxes: Vec<DiagramBox>,
    by_name: HashMap<String, BoxId>,
}

impl BoxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, returning the stable identifier for its name.
    pub fn register(&mut self, spec: &str) -> BoxId {
        let name = record_name(spec);
        if let Some(&id) = self.by_name.get(name) {
            self.boxes[id.0].merge(spec);
            return id;
        }
        let id = BoxId(self.boxes.len());
        self.boxes.push(DiagramBox::new(name, spec, id));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<BoxId> {
        self.by_name.get(name.trim()).copied()
    }

    /// Look up `name`, failing with an unresolved reference error.
    pub fn resolve(&self, name: &str, context: &str) -> Result<BoxId, DiagramError> {
        self.lookup(name)
            .ok_or_else(|| DiagramError::unresolved(name.trim(), context))
    }

    pub fn get(&self, id: BoxId) -> &DiagramBox {
        &self.boxes[id.0]
    }

    pub fn get_mut(&mut self, id: BoxId) -> &mut DiagramBox {
        &mut self.boxes[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&DiagramBox> {
        self.lookup(name).map(|id| self.get(id))
    }

    /// All boxes ordered by identifier.
    pub fn all_sorted(&self) -> impl Iterator<Item = &DiagramBox> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name() {
        assert_eq!(record_name("Customer|name;email|save()"), "Customer");
        assert_eq!(record_name("  Order  "), "Order");
        assert_eq!(record_name(""), "");
    }

    #[test]
    fn test_register_merges_richest_spec() {
        let mut registry = BoxRegistry::new();
        let first = registry.register("Foo");
        let second = registry.register("Foo|bar");
        let third = registry.register("Foo");

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(first).spec(), "Foo|bar");
    }

    #[test]
    fn test_equal_length_spec_does_not_replace() {
        let mut registry = BoxRegistry::new();
        let id = registry.register("Foo|ab");
        registry.register("Foo|cd");
        assert_eq!(registry.get(id).spec(), "Foo|ab");
    }

    #[test]
    fn test_identifiers_follow_first_seen_order() {
        let mut registry = BoxRegistry::new();
        registry.register("B");
        registry.register("A");
        registry.register("B|x");
        let names: Vec<_> = registry.all_sorted().map(|b| b.name()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(registry.lookup("A").unwrap().to_string(), "A001");
    }

    #[test]
    fn test_width_is_frozen_after_first_size() {
        let mut registry = BoxRegistry::new();
        let id = registry.register("Foo");
        let width = registry.get_mut(id).size(0.5);
        assert_eq!(width, 1.5);

        // A longer label arrives after sizing: the label changes, the width does not.
        registry.register("Foo|longer");
        assert_eq!(registry.get(id).spec(), "Foo|longer");
        assert_eq!(registry.get_mut(id).size(0.5), 1.5);
    }

    #[test]
    fn test_right_margin_only_grows() {
        let mut registry = BoxRegistry::new();
        let id = registry.register("Foo");
        assert!(registry.get_mut(id).reserve_right_margin(2.0));
        assert!(!registry.get_mut(id).reserve_right_margin(1.0));
        assert!(!registry.get_mut(id).reserve_right_margin(0.0));
        assert_eq!(registry.get(id).right_margin(), 2.0);
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = BoxRegistry::new();
        let err = registry.resolve("Ghost", "edge").unwrap_err();
        assert!(matches!(err, DiagramError::UnresolvedReference { .. }));
    }
}
