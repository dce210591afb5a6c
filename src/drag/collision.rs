//! Drop target resolution.
//!
//! Uses R-trees over the registered drop targets so that each hover tick is a
//! logarithmic query instead of a scan over every card on screen.
//!
//! Resolution is two-tiered:
//! 1. Any target whose bounding box overlaps the active item's box. When
//!    several overlap, the earliest registered wins.
//! 2. If nothing overlaps, the target whose center is nearest the active
//!    item's center (Euclidean). Ties go to the earliest registered.
//!
//! The first tier keeps dense grids precise; the fallback keeps sparse or
//! empty containers reachable.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use std::collections::HashMap;

/// A point in layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same size, centered on `center`.
    pub fn centered_at(&self, center: Point) -> Self {
        Self::new(center.x - self.width / 2.0, center.y - self.height / 2.0, self.width, self.height)
    }

    /// True when the two boxes share a region of positive area. Touching edges do not count.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x() && other.x < self.max_x() && self.y < other.max_y() && other.y < self.max_y()
    }

    fn envelope(&self) -> AABB<[f32; 2]> {
        AABB::from_corners([self.x, self.y], [self.max_x(), self.max_y()])
    }
}

/// A droppable region: a sentence card, a paragraph container or the bank.
#[derive(Clone, Debug, PartialEq)]
pub struct DropTarget {
    pub id: String,
    pub rect: Rect,
}

impl DropTarget {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self { id: id.into(), rect }
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxEntry {
    order: usize,
    rect: Rect,
}

impl RTreeObject for BoxEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.rect.envelope()
    }
}

impl PartialEq for BoxEntry {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

#[derive(Debug, Clone, Copy)]
struct CenterEntry {
    order: usize,
    center: [f32; 2],
}

impl RTreeObject for CenterEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.center)
    }
}

impl PointDistance for CenterEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.center[0] - point[0];
        let dy = self.center[1] - point[1];
        dx * dx + dy * dy
    }
}

impl PartialEq for CenterEntry {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

/// Registry of drop targets with hybrid intersection / nearest-center lookup.
pub struct CollisionResolver {
    boxes: RTree<BoxEntry>,
    centers: RTree<CenterEntry>,
    /// Registration order -> target id
    ids: Vec<String>,
    entries: HashMap<String, BoxEntry>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self {
            boxes: RTree::new(),
            centers: RTree::new(),
            ids: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Build a resolver from targets in registration order.
    pub fn from_targets<I>(targets: I) -> Self
    where
        I: IntoIterator<Item = DropTarget>,
    {
        let mut resolver = Self::new();
        resolver.rebuild(targets);
        resolver
    }

    /// Register a target, or move an already registered one without changing its order.
    pub fn register(&mut self, id: impl Into<String>, rect: Rect) {
        let id = id.into();
        let order = match self.entries.remove(&id) {
            Some(old) => {
                let old_center = old.rect.center();
                self.boxes.remove(&old);
                self.centers.remove(&CenterEntry {
                    order: old.order,
                    center: [old_center.x, old_center.y],
                });
                old.order
            }
            None => {
                self.ids.push(id.clone());
                self.ids.len() - 1
            }
        };

        let entry = BoxEntry { order, rect };
        let center = rect.center();
        self.boxes.insert(entry);
        self.centers.insert(CenterEntry {
            order,
            center: [center.x, center.y],
        });
        self.entries.insert(id, entry);
    }

    pub fn rebuild<I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = DropTarget>,
    {
        self.ids.clear();
        self.entries.clear();
        let mut boxes = Vec::new();
        let mut centers = Vec::new();
        for target in targets {
            if self.entries.contains_key(&target.id) {
                continue;
            }
            let order = self.ids.len();
            let entry = BoxEntry {
                order,
                rect: target.rect,
            };
            let center = target.rect.center();
            boxes.push(entry);
            centers.push(CenterEntry {
                order,
                center: [center.x, center.y],
            });
            self.entries.insert(target.id.clone(), entry);
            self.ids.push(target.id);
        }
        self.boxes = RTree::bulk_load(boxes);
        self.centers = RTree::bulk_load(centers);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.boxes = RTree::new();
        self.centers = RTree::new();
        self.ids.clear();
        self.entries.clear();
    }

    /// Resolve the hovered target for the active item. The active item's own
    /// registration (if any) is never a candidate.
    pub fn resolve(&self, active_id: &str, active_rect: &Rect) -> Option<&str> {
        self.intersecting(active_id, active_rect)
            .or_else(|| self.nearest_center(active_id, active_rect.center()))
            .map(|order| self.ids[order].as_str())
    }

    fn intersecting(&self, active_id: &str, active_rect: &Rect) -> Option<usize> {
        self.boxes
            .locate_in_envelope_intersecting(&active_rect.envelope())
            .filter(|entry| entry.rect.intersects(active_rect))
            .filter(|entry| self.ids[entry.order] != active_id)
            .map(|entry| entry.order)
            .min()
    }

    fn nearest_center(&self, active_id: &str, center: Point) -> Option<usize> {
        let query = [center.x, center.y];
        let mut best: Option<(f32, usize)> = None;
        for entry in self.centers.nearest_neighbor_iter(&query) {
            if self.ids[entry.order] == active_id {
                continue;
            }
            let distance = entry.distance_2(&query);
            match best {
                None => best = Some((distance, entry.order)),
                Some((best_distance, best_order)) => {
                    if distance > best_distance {
                        break;
                    }
                    if entry.order < best_order {
                        best = Some((best_distance, entry.order));
                    }
                }
            }
        }
        best.map(|(_, order)| order)
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}
