//! Retained visual scene
//!
//! The renderer is external; this is the data it draws from. Each physics
//! entity owns exactly one node here and the orchestrator rewrites node
//! transforms from body transforms every frame.

use crate::shape::MeshSpec;
use crate::types::{Color, Transform};
use std::collections::BTreeMap;

/// Handle to one node in a [`VisualScene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub mesh: MeshSpec,
    pub color: Color,
    pub transform: Transform,
}

#[derive(Debug, Default)]
pub struct VisualScene {
    nodes: BTreeMap<VisualHandle, VisualNode>,
    next: u64,
}

impl VisualScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: VisualNode) -> VisualHandle {
        let handle = VisualHandle(self.next);
        self.next += 1;
        self.nodes.insert(handle, node);
        handle
    }

    /// Returns false if the node no longer exists
    pub fn set_transform(&mut self, handle: VisualHandle, transform: Transform) -> bool {
        match self.nodes.get_mut(&handle) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, handle: VisualHandle) -> Option<VisualNode> {
        self.nodes.remove(&handle)
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&VisualNode> {
        self.nodes.get(&handle)
    }

    pub fn contains(&self, handle: VisualHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (VisualHandle, &VisualNode)> {
        self.nodes.iter().map(|(h, n)| (*h, n))
    }
}
