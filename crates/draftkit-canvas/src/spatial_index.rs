//! Quadtree spatial index over entity bounding boxes.
//!
//! Broad-phase only: `query` answers "which entities' boxes intersect
//! this region" with false positives allowed and false negatives
//! forbidden. Callers always run their own fine test on the returned
//! candidates. The index is a derived cache keyed by entity id; it is
//! rebuildable from the store at any time and is never authoritative.
//!
//! Nodes subdivide into four quadrants once they hold more than
//! `max_items` entries, stopping at `max_depth` or once a quadrant
//! would shrink below a minimum cell size. An item's box is stored in
//! the deepest node that fully contains it, so boxes straddling a
//! quadrant boundary live at interior nodes. Boxes that fall outside
//! the root's bounds are kept at the root itself; queries always scan
//! the node they visit, so such items are still found.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use draftkit_core::constants::INDEX_WORLD_EXTENT;

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Builds bounds from the (min_x, min_y, max_x, max_y) tuple the
    /// entity model produces.
    pub fn from_tuple(t: (f64, f64, f64, f64)) -> Self {
        Self::new(t.0, t.1, t.2, t.3)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Whether `other` lies entirely inside these bounds.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Inclusive intersection test (touching edges count).
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Smallest bounds covering both inputs.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Bounds grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Bounds {
        Bounds::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }
}

/// Smallest quadrant side the tree will subdivide into.
const MIN_CELL_SIZE: f64 = 1.0;

#[derive(Debug, Clone)]
struct QuadtreeNode {
    bounds: Bounds,
    depth: usize,
    items: Vec<(u64, Bounds)>,
    children: Option<Box<[QuadtreeNode; 4]>>,
}

impl QuadtreeNode {
    fn new(bounds: Bounds, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, id: u64, bounds: Bounds, max_depth: usize, max_items: usize) {
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.bounds.contains_bounds(&bounds) {
                    child.insert(id, bounds, max_depth, max_items);
                    return;
                }
            }
        }
        self.items.push((id, bounds));

        if self.children.is_none()
            && self.items.len() > max_items
            && self.depth < max_depth
            && self.bounds.width() / 2.0 >= MIN_CELL_SIZE
            && self.bounds.height() / 2.0 >= MIN_CELL_SIZE
        {
            self.subdivide(max_depth, max_items);
        }
    }

    fn subdivide(&mut self, max_depth: usize, max_items: usize) {
        let (cx, cy) = self.bounds.center();
        let b = &self.bounds;
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            QuadtreeNode::new(Bounds::new(b.min_x, b.min_y, cx, cy), depth),
            QuadtreeNode::new(Bounds::new(cx, b.min_y, b.max_x, cy), depth),
            QuadtreeNode::new(Bounds::new(b.min_x, cy, cx, b.max_y), depth),
            QuadtreeNode::new(Bounds::new(cx, cy, b.max_x, b.max_y), depth),
        ]));

        // Push down every item a single child fully contains.
        let items = std::mem::take(&mut self.items);
        for (id, bounds) in items {
            let mut placed = false;
            if let Some(children) = self.children.as_mut() {
                for child in children.iter_mut() {
                    if child.bounds.contains_bounds(&bounds) {
                        child.insert(id, bounds, max_depth, max_items);
                        placed = true;
                        break;
                    }
                }
            }
            if !placed {
                self.items.push((id, bounds));
            }
        }
    }

    fn remove(&mut self, id: u64, bounds: &Bounds) -> bool {
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.bounds.contains_bounds(bounds) {
                    return child.remove(id, bounds);
                }
            }
        }
        if let Some(pos) = self.items.iter().position(|(item_id, _)| *item_id == id) {
            self.items.swap_remove(pos);
            true
        } else {
            false
        }
    }

    fn query(&self, region: &Bounds, out: &mut Vec<u64>) {
        for (id, bounds) in &self.items {
            if bounds.intersects(region) {
                out.push(*id);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                if child.bounds.intersects(region) {
                    child.query(region, out);
                }
            }
        }
    }

    fn collect_stats(&self, stats: &mut SpatialIndexStats) {
        stats.total_nodes += 1;
        stats.total_items += self.items.len();
        stats.max_depth_reached = stats.max_depth_reached.max(self.depth);
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_stats(stats);
            }
        }
    }
}

/// Structure statistics, mostly for tests and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpatialIndexStats {
    pub total_items: usize,
    pub total_nodes: usize,
    pub max_depth_reached: usize,
}

/// Quadtree over entity bounding boxes, keyed by entity id.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    root: QuadtreeNode,
    item_bounds: HashMap<u64, Bounds>,
    max_depth: usize,
    max_items: usize,
}

impl SpatialIndex {
    /// Creates an index over `bounds`, subdividing nodes holding more
    /// than `max_items` entries down to at most `max_depth` levels.
    pub fn new(bounds: Bounds, max_depth: usize, max_items: usize) -> Self {
        Self {
            root: QuadtreeNode::new(bounds, 0),
            item_bounds: HashMap::new(),
            max_depth,
            max_items: max_items.max(1),
        }
    }

    /// Inserts or replaces an entity's bounds.
    pub fn insert(&mut self, id: u64, bounds: &Bounds) {
        if let Some(old) = self.item_bounds.remove(&id) {
            self.root.remove(id, &old);
        }
        self.item_bounds.insert(id, *bounds);
        self.root
            .insert(id, *bounds, self.max_depth, self.max_items);
    }

    /// Moves an entity to new bounds (remove + insert).
    pub fn update(&mut self, id: u64, bounds: &Bounds) {
        self.insert(id, bounds);
    }

    /// Drops an entity from the index. Unknown ids are a no-op.
    pub fn remove(&mut self, id: u64) {
        if let Some(bounds) = self.item_bounds.remove(&id) {
            self.root.remove(id, &bounds);
        }
    }

    /// The bounds currently indexed for an entity.
    pub fn bounds_of(&self, id: u64) -> Option<&Bounds> {
        self.item_bounds.get(&id)
    }

    /// All ids whose indexed bounds intersect `region`.
    ///
    /// Over-approximates: callers run their own fine test. Never misses
    /// a true intersection.
    pub fn query(&self, region: &Bounds) -> Vec<u64> {
        let mut out = Vec::new();
        self.root.query(region, &mut out);
        out
    }

    /// All ids whose indexed bounds contain the point.
    pub fn query_point(&self, x: f64, y: f64) -> Vec<u64> {
        let mut out = Vec::new();
        self.root.query(&Bounds::new(x, y, x, y), &mut out);
        out.retain(|id| {
            self.item_bounds
                .get(id)
                .is_some_and(|b| b.contains_point(x, y))
        });
        out
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.item_bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_bounds.is_empty()
    }

    /// Removes every entry, keeping the root bounds and tuning.
    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
        self.item_bounds.clear();
    }

    /// Walks the tree and reports node/item counts.
    pub fn stats(&self) -> SpatialIndexStats {
        let mut stats = SpatialIndexStats::default();
        self.root.collect_stats(&mut stats);
        stats
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(
            Bounds::new(
                -INDEX_WORLD_EXTENT,
                -INDEX_WORLD_EXTENT,
                INDEX_WORLD_EXTENT,
                INDEX_WORLD_EXTENT,
            ),
            8,
            16,
        )
    }
}
