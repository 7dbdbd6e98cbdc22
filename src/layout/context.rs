//! Per-call scratch state of the layout engine
//!
//! Column, row and replacement bookkeeping lives here instead of on the graph
//! objects, so nothing from one layout pass is visible to the next.

use std::collections::HashMap;

use crate::graph::GraphObject;

/// Scratch data of one graph object during a layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessData {
    /// Horizontal rank; relative to the parent flow until columns are resolved
    pub col: i32,
    /// Vertical rank, once assigned
    pub row: Option<usize>,
    /// Object standing in for this one when it sits inside a collapsed flow
    pub replacement: Option<GraphObject>,
    /// Lowest row a merging branch requires
    pub merge_row: Option<usize>,
    /// Last row occupied by a flow
    pub last_row: Option<usize>,
}

/// Scratch data keyed by object identity, dropped at the end of the pass
#[derive(Debug, Default)]
pub struct LayoutContext {
    data: HashMap<GraphObject, ProcessData>,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object: impl Into<GraphObject>) -> Option<&ProcessData> {
        self.data.get(&object.into())
    }

    pub fn entry(&mut self, object: impl Into<GraphObject>) -> &mut ProcessData {
        self.data.entry(object.into()).or_default()
    }

    pub fn row(&self, object: impl Into<GraphObject>) -> Option<usize> {
        self.get(object).and_then(|data| data.row)
    }

    pub fn col(&self, object: impl Into<GraphObject>) -> i32 {
        self.get(object).map_or(0, |data| data.col)
    }

    /// The object that represents `object` in the layout: its replacement, or itself
    pub fn resolve(&self, object: impl Into<GraphObject>) -> GraphObject {
        let object = object.into();
        self.get(object)
            .and_then(|data| data.replacement)
            .unwrap_or(object)
    }

    /// Objects that received a row, in no particular order
    pub fn placed(&self) -> impl Iterator<Item = (GraphObject, &ProcessData)> {
        self.data
            .iter()
            .filter(|(_, data)| data.row.is_some())
            .map(|(object, data)| (*object, data))
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
