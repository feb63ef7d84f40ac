//! Read-only reference databases: classes, enemies, spells, effects.
//!
//! Loaded once (from JSON) and injected into the simulation as a resource.
//! The core never mutates them. Every lookup is fallible and a miss reports
//! the list of valid names.

pub mod models;

use std::collections::BTreeMap;

use bevy::prelude::*;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DatabaseError;
pub use models::{ClassDef, EffectDef, EffectKind, EnemyDef, SpellDef, SpellKind};

const BUILTIN_DATA: &str = include_str!("builtin.json");

/// A record type stored in a [`Catalog`]
pub trait Record {
    const KIND: &'static str;

    fn set_name(&mut self, name: &str);
}

impl Record for ClassDef {
    const KIND: &'static str = "class";

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

impl Record for EnemyDef {
    const KIND: &'static str = "enemy";

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

impl Record for SpellDef {
    const KIND: &'static str = "spell";

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

impl Record for EffectDef {
    const KIND: &'static str = "effect";

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Name-keyed dictionary with sorted iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Record> Catalog<T> {
    pub fn get(&self, name: &str) -> Result<&T, DatabaseError> {
        self.entries
            .get(name)
            .ok_or_else(|| DatabaseError::not_found(T::KIND, name, self.entries.keys()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, mut record: T) {
        record.set_name(name);
        self.entries.insert(name.to_string(), record);
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy each key into the record's `name` field
    fn sync_names(&mut self) {
        for (name, record) in self.entries.iter_mut() {
            record.set_name(name);
        }
    }
}

/// All reference data the core consults
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Databases {
    #[serde(default)]
    pub classes: Catalog<ClassDef>,
    #[serde(default)]
    pub enemies: Catalog<EnemyDef>,
    #[serde(default)]
    pub spells: Catalog<SpellDef>,
    #[serde(default)]
    pub effects: Catalog<EffectDef>,
}

impl Databases {
    /// Parse and validate a JSON document with `classes`, `enemies`,
    /// `spells` and `effects` objects
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        let mut db: Databases = serde_json::from_str(json)?;
        db.validate()?;
        Ok(db)
    }

    /// Data set shipped with the crate
    pub fn builtin() -> Result<Self, DatabaseError> {
        Self::from_json(BUILTIN_DATA)
    }

    /// Fill record names, drop unknown class children, reject class cycles
    pub fn validate(&mut self) -> Result<(), DatabaseError> {
        self.classes.sync_names();
        self.enemies.sync_names();
        self.spells.sync_names();
        self.effects.sync_names();

        let known: Vec<String> = self.classes.names().cloned().collect();
        for (name, class) in self.classes.entries.iter_mut() {
            class.children.retain(|child| {
                let exists = known.contains(child);
                if !exists {
                    warn!(class = %name, child = %child, "ignoring unknown child class");
                }
                exists
            });
        }

        let mut graph = DiGraph::<&str, ()>::new();
        let nodes: BTreeMap<&str, _> = self
            .classes
            .names()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();
        for (name, class) in self.classes.iter() {
            for child in &class.children {
                if let (Some(&from), Some(&to)) = (nodes.get(name.as_str()), nodes.get(child.as_str())) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        if is_cyclic_directed(&graph) {
            return Err(DatabaseError::CyclicClassTree);
        }
        Ok(())
    }

    pub fn class(&self, name: &str) -> Result<&ClassDef, DatabaseError> {
        self.classes.get(name)
    }

    pub fn enemy(&self, name: &str) -> Result<&EnemyDef, DatabaseError> {
        self.enemies.get(name)
    }

    pub fn spell(&self, name: &str) -> Result<&SpellDef, DatabaseError> {
        self.spells.get(name)
    }

    pub fn effect(&self, name: &str) -> Result<&EffectDef, DatabaseError> {
        self.effects.get(name)
    }

    /// First starter class in name order
    pub fn starter_class(&self) -> Result<&ClassDef, DatabaseError> {
        self.classes
            .iter()
            .map(|(_, class)| class)
            .find(|class| class.starter)
            .ok_or(DatabaseError::NoStarterClass)
    }

    /// Whether `name` may be bought given the classes already owned
    pub fn is_unlocked(&self, name: &str, owned: &[String]) -> bool {
        match self.classes.get(name) {
            Ok(class) if class.starter && owned.is_empty() => true,
            Ok(_) => owned.iter().any(|parent| {
                self.classes
                    .get(parent)
                    .map(|p| p.children.iter().any(|c| c == name))
                    .unwrap_or(false)
            }),
            Err(_) => false,
        }
    }

    /// Classes that can be bought next: starters for a fresh character,
    /// otherwise the not-yet-owned children of owned classes
    pub fn purchasable_classes(&self, owned: &[String]) -> Vec<&ClassDef> {
        self.classes
            .iter()
            .map(|(_, class)| class)
            .filter(|class| !owned.contains(&class.name))
            .filter(|class| self.is_unlocked(&class.name, owned))
            .collect()
    }
}
