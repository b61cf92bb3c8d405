use cellspace_common::CellspaceError;
use cellspace_kernel::Rule;
use std::collections::BTreeMap;
use std::fmt;

use crate::life::LifeCell;
use crate::planes::{Plane, PlaneSet};
use crate::virus::Virus;

type Factory = Box<dyn Fn() -> Box<dyn Rule>>;

struct Entry {
    description: String,
    factory: Factory,
}

/// Named rule constructors, used for user placement and scenario seeding.
pub struct RuleCatalog {
    entries: BTreeMap<String, Entry>,
}

impl RuleCatalog {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Every shipped variant: alive, dead, anchor and dead anchor per plane,
    /// the universal anchors, and the virus.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        for plane in Plane::ALL {
            let planes = PlaneSet::only(plane);
            let tag = plane.tag();
            catalog.register(
                format!("alive-{tag}"),
                format!("live Life cell on the {tag} plane"),
                move || Box::new(LifeCell::alive(planes)),
            );
            catalog.register(
                format!("dead-{tag}"),
                format!("dead Life cell on the {tag} plane"),
                move || Box::new(LifeCell::dead(planes)),
            );
            catalog.register(
                format!("anchor-{tag}"),
                format!("live anchor activating the {tag} plane along its axis lines"),
                move || Box::new(LifeCell::alive_anchor(planes)),
            );
            catalog.register(
                format!("dead-anchor-{tag}"),
                format!("dead anchor on the {tag} plane"),
                move || Box::new(LifeCell::dead_anchor(planes)),
            );
        }
        catalog.register(
            "anchor-universal",
            "live anchor on all three planes",
            || Box::new(LifeCell::universal_anchor()),
        );
        catalog.register(
            "dead-anchor-universal",
            "dead anchor on all three planes",
            || Box::new(LifeCell::dead_anchor(PlaneSet::ALL)),
        );
        catalog.register(
            "virus",
            "spreads to its six faces and dies, every cycle",
            || Box::new(Virus),
        );
        catalog
    }

    /// Add or replace a constructor under `name`.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        factory: F,
    ) where
        F: Fn() -> Box<dyn Rule> + 'static,
    {
        self.entries.insert(
            name.into(),
            Entry {
                description: description.into(),
                factory: Box::new(factory),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn describe(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.description.as_str())
    }

    /// Build a fresh rule instance.
    pub fn create(&self, name: &str) -> Result<Box<dyn Rule>, CellspaceError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| CellspaceError::UnknownRule(name.to_string()))?;
        tracing::trace!(name, "creating rule");
        Ok((entry.factory)())
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::{ALIVE, ALIVE_ANCHOR, DEAD_ANCHOR};
    use crate::virus::VIRUS;

    #[test]
    fn standard_catalog_lists_every_variant() {
        let catalog = RuleCatalog::standard();
        assert_eq!(catalog.len(), 15);
        for name in ["alive-xy", "dead-yz", "anchor-zx", "dead-anchor-xy", "anchor-universal", "virus"] {
            assert!(catalog.contains(name), "{name}");
        }
        let names: Vec<&str> = catalog.names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn create_builds_fresh_instances() {
        let catalog = RuleCatalog::standard();
        assert_eq!(catalog.create("alive-xy").unwrap().kind(), ALIVE);
        assert_eq!(catalog.create("anchor-universal").unwrap().kind(), ALIVE_ANCHOR);
        assert_eq!(catalog.create("dead-anchor-yz").unwrap().kind(), DEAD_ANCHOR);
        assert_eq!(catalog.create("virus").unwrap().kind(), VIRUS);
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let catalog = RuleCatalog::standard();
        let err = catalog.create("glider").unwrap_err();
        assert_eq!(err, CellspaceError::UnknownRule("glider".into()));
    }

    #[test]
    fn register_overrides() {
        let mut catalog = RuleCatalog::empty();
        assert!(catalog.is_empty());
        catalog.register("x", "first", || Box::new(Virus));
        catalog.register("x", "second", || Box::new(LifeCell::universal_anchor()));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.describe("x"), Some("second"));
        assert_eq!(catalog.create("x").unwrap().kind(), ALIVE_ANCHOR);
    }
}
