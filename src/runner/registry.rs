//! Target registry
//!
//! Targets are stored as graph nodes addressed by a dense index. The
//! registry is built once from the merged configuration and never changes
//! during a run.

use crate::config::{Config, Target};
use std::collections::HashMap;

/// Index of a target in the registry
pub type TargetId = usize;

/// A classified dependency entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency<'a> {
    /// A file path (the entry contains a `.`)
    File(&'a str),

    /// Another target, by name
    Target(&'a str),
}

impl<'a> Dependency<'a> {
    pub fn parse(entry: &'a str) -> Self {
        if entry.contains('.') {
            Dependency::File(entry)
        } else {
            Dependency::Target(entry)
        }
    }
}

/// Classify every dependency of a target, in declaration order
pub fn dependencies(target: &Target) -> impl Iterator<Item = Dependency<'_>> {
    target.deps.iter().map(|entry| Dependency::parse(entry))
}

#[derive(Debug)]
struct Node<'a> {
    name: &'a str,
    target: &'a Target,
}

/// Name-to-target lookup over a configuration
#[derive(Debug)]
pub struct TargetRegistry<'a> {
    nodes: Vec<Node<'a>>,
    index: HashMap<&'a str, TargetId>,
}

impl<'a> TargetRegistry<'a> {
    /// Build the registry from a configuration; ids follow sorted name order
    pub fn new(config: &'a Config) -> Self {
        let mut entries: Vec<(&'a str, &'a Target)> = config
            .targets
            .iter()
            .map(|(name, target)| (name.as_str(), target))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);

        let index = entries
            .iter()
            .enumerate()
            .map(|(id, (name, _))| (*name, id))
            .collect();
        let nodes = entries
            .into_iter()
            .map(|(name, target)| Node { name, target })
            .collect();

        TargetRegistry { nodes, index }
    }

    /// Look up a target by name
    pub fn lookup(&self, name: &str) -> Option<&'a Target> {
        self.id_of(name).map(|id| self.nodes[id].target)
    }

    pub fn id_of(&self, name: &str) -> Option<TargetId> {
        self.index.get(name).copied()
    }

    /// Target for an id handed out by this registry
    pub fn get(&self, id: TargetId) -> &'a Target {
        self.nodes[id].target
    }

    pub fn name(&self, id: TargetId) -> &'a str {
        self.nodes[id].name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids, in name order
    pub fn ids(&self) -> impl Iterator<Item = TargetId> {
        0..self.nodes.len()
    }
}
