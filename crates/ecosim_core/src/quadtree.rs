//! Recursive quadrant index over point occupants.
//!
//! Every leaf holds at most one occupant. Inserting into an occupied leaf
//! splits it into four equal quadrants (repeatedly, while both occupants
//! keep landing in the same one). Removing an occupant collapses any subtree
//! left holding exactly one object back into a single leaf.
//!
//! Each occupant carries a resize hook `H`. When an operation changes the
//! shape of a leaf that belongs to an occupant *other* than the one being
//! inserted, removed or moved, the tree hands that occupant's hook back in a
//! [`Resized`] instead of calling it. The caller fires the hooks once it no
//! longer borrows the tree, so hook code may freely query or modify the
//! index and always sees it in a consistent state.
//!
//! At most one hook comes back from an insert (only the leaf we descend into
//! can split) and at most one from a remove (a collapse happens only when a
//! single sibling still has an occupant). A move returns at most two.
//!
//! Regions are half-open: `[x_min, x_max) × [y_min, y_max)`. With `y` growing
//! downward, a region owns its top and left edges but not its bottom and
//! right ones, which settles which quadrant gets points on a split line.

use ecosim_data::{Point, POINT_TOLERANCE};
use std::array;
use std::iter::Flatten;

/// Axis-aligned rectangle `[x_min, x_max) × [y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Region {
    #[must_use]
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        assert!(
            x_min < x_max && y_min < y_max,
            "degenerate region ({x_min}, {y_min}) .. ({x_max}, {y_max})"
        );
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x_min && p.x < self.x_max && p.y >= self.y_min && p.y < self.y_max
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[inline]
    fn midpoint(&self) -> (f64, f64) {
        (
            self.x_min + self.width() / 2.0,
            self.y_min + self.height() / 2.0,
        )
    }

    /// Distance from `p` to the nearest point of the region; zero inside.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, p: &Point) -> f64 {
        let dx = (self.x_min - p.x).max(p.x - self.x_max).max(0.0);
        let dy = (self.y_min - p.y).max(p.y - self.y_max).max(0.0);
        dx.hypot(dy)
    }

    #[inline]
    #[must_use]
    pub fn intersects_circle(&self, center: &Point, radius: f64) -> bool {
        self.distance_to(center) <= radius
    }

    /// Distance from `p` (inside the region) to the edge it would cross
    /// travelling along `course`.
    #[must_use]
    pub fn distance_to_edge(&self, p: &Point, course: f64) -> f64 {
        let (sin, cos) = course.sin_cos();

        let x_span = if cos < 0.0 {
            p.x - self.x_min
        } else {
            self.x_max - p.x
        };
        let x_dist = if cos.abs() > POINT_TOLERANCE {
            x_span / cos.abs()
        } else {
            f64::INFINITY
        };

        let y_span = if sin > 0.0 {
            self.y_max - p.y
        } else {
            p.y - self.y_min
        };
        let y_dist = if sin.abs() > POINT_TOLERANCE {
            y_span / sin.abs()
        } else {
            f64::INFINITY
        };

        assert!(
            x_dist >= 0.0 && y_dist >= 0.0,
            "({}, {}) lies outside the region it was measured against",
            p.x,
            p.y
        );
        x_dist.min(y_dist)
    }

    /// Child quadrants, indexed `row * 2 + col` (top-left, top-right,
    /// bottom-left, bottom-right).
    fn quadrants(&self) -> [Region; 4] {
        let (mx, my) = self.midpoint();
        [
            Region::new(self.x_min, self.y_min, mx, my),
            Region::new(mx, self.y_min, self.x_max, my),
            Region::new(self.x_min, my, mx, self.y_max),
            Region::new(mx, my, self.x_max, self.y_max),
        ]
    }

    #[inline]
    fn quadrant_of(&self, p: &Point) -> usize {
        let (mx, my) = self.midpoint();
        usize::from(p.y >= my) * 2 + usize::from(p.x >= mx)
    }
}

/// Resize hooks owed to occupants whose leaf changed shape.
#[must_use = "resize hooks must be fired once the tree is no longer borrowed"]
#[derive(Debug)]
pub struct Resized<H> {
    hooks: [Option<H>; 2],
}

impl<H> Resized<H> {
    fn one(hook: Option<H>) -> Self {
        Self {
            hooks: [hook, None],
        }
    }

    fn two(first: Option<H>, second: Option<H>) -> Self {
        Self {
            hooks: [first, second],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.iter().filter(|h| h.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> IntoIterator for Resized<H> {
    type Item = H;
    type IntoIter = Flatten<array::IntoIter<Option<H>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hooks.into_iter().flatten()
    }
}

struct Occupant<T, H> {
    item: T,
    pos: Point,
    on_resize: H,
}

enum Body<T, H> {
    Leaf(Option<Occupant<T, H>>),
    Branch {
        count: usize,
        children: Box<[Node<T, H>; 4]>,
    },
}

struct Node<T, H> {
    region: Region,
    body: Body<T, H>,
}

enum Relocation<H> {
    Moved(Option<H>),
    /// The occupant left its parent's region; the move must go through the root.
    Escaped,
}

impl<T, H: Clone> Node<T, H> {
    fn leaf(region: Region) -> Self {
        Self {
            region,
            body: Body::Leaf(None),
        }
    }

    fn count(&self) -> usize {
        match &self.body {
            Body::Leaf(slot) => usize::from(slot.is_some()),
            Body::Branch { count, .. } => *count,
        }
    }

    /// Returns the hook of the occupant displaced by a split, if any.
    fn insert(&mut self, occupant: Occupant<T, H>) -> Option<H> {
        debug_assert!(self.region.contains(&occupant.pos));

        if let Body::Branch { count, children } = &mut self.body {
            *count += 1;
            let q = self.region.quadrant_of(&occupant.pos);
            return children[q].insert(occupant);
        }

        let Body::Leaf(slot) = &mut self.body else {
            unreachable!("branch handled above");
        };
        let Some(existing) = slot.take() else {
            *slot = Some(occupant);
            return None;
        };
        assert!(
            !existing.pos.coincides(&occupant.pos),
            "({}, {}) is already occupied",
            occupant.pos.x,
            occupant.pos.y
        );

        let displaced = existing.on_resize.clone();
        let mut children = self.region.quadrants().map(Node::leaf);
        let q = self.region.quadrant_of(&existing.pos);
        children[q].body = Body::Leaf(Some(existing));
        self.body = Body::Branch {
            count: 1,
            children: Box::new(children),
        };
        // further splits below only ever involve the same two occupants
        let _ = self.insert(occupant);
        Some(displaced)
    }

    /// Returns the removed occupant and the hook of a collapse survivor, if any.
    fn remove(&mut self, pos: &Point) -> (Occupant<T, H>, Option<H>) {
        match &mut self.body {
            Body::Leaf(slot) => match slot.take() {
                Some(occupant) if occupant.pos.coincides(pos) => (occupant, None),
                other => {
                    let found = other.as_ref().map(|o| o.pos);
                    panic!(
                        "no occupant at ({}, {}); leaf holds {found:?}",
                        pos.x, pos.y
                    );
                }
            },
            Body::Branch { count, children } => {
                let q = self.region.quadrant_of(pos);
                let (removed, hook) = children[q].remove(pos);
                *count -= 1;
                if *count > 1 {
                    return (removed, hook);
                }

                let survivor = children
                    .iter_mut()
                    .find_map(Node::take_sole)
                    .unwrap_or_else(|| panic!("branch with one object has no occupied leaf"));
                let hook = survivor.on_resize.clone();
                self.body = Body::Leaf(Some(survivor));
                (removed, Some(hook))
            }
        }
    }

    fn take_sole(&mut self) -> Option<Occupant<T, H>> {
        match &mut self.body {
            Body::Leaf(slot) => slot.take(),
            Body::Branch { .. } => None,
        }
    }

    fn occupant_at_mut(&mut self, pos: &Point) -> &mut Occupant<T, H> {
        match &mut self.body {
            Body::Leaf(Some(occupant)) if occupant.pos.coincides(pos) => occupant,
            _ => panic!("no occupant at ({}, {})", pos.x, pos.y),
        }
    }

    fn relocate(&mut self, old: &Point, new: Point) -> Relocation<H> {
        let Body::Branch { count, children } = &mut self.body else {
            // a lone root leaf; the caller has checked `new` is in bounds
            self.occupant_at_mut(old).pos = new;
            return Relocation::Moved(None);
        };

        let q = self.region.quadrant_of(old);
        let child = &mut children[q];
        if matches!(child.body, Body::Branch { .. }) {
            return child.relocate(old, new);
        }

        // `child` is the leaf holding the occupant and `self` is its parent
        if child.region.contains(&new) {
            child.occupant_at_mut(old).pos = new;
            return Relocation::Moved(None);
        }
        if !self.region.contains(&new) {
            return Relocation::Escaped;
        }

        // take it out of the leaf without collapsing anything, then reinsert
        // from here so restructuring stays inside this subtree
        let mut occupant = child
            .take_sole()
            .filter(|o| o.pos.coincides(old))
            .unwrap_or_else(|| panic!("no occupant at ({}, {})", old.x, old.y));
        occupant.pos = new;
        *count -= 1;
        Relocation::Moved(self.insert(occupant))
    }

    fn closest<'a>(&'a self, center: &Point, best: &mut f64, found: &mut Option<&'a Occupant<T, H>>) {
        if self.region.distance_to(center) > *best {
            return;
        }
        match &self.body {
            Body::Leaf(None) => {}
            Body::Leaf(Some(occupant)) => {
                let d = occupant.pos.distance(center);
                if d < *best && !occupant.pos.coincides(center) {
                    *best = d;
                    *found = Some(occupant);
                }
            }
            Body::Branch { children, .. } => {
                let mut order = [0usize, 1, 2, 3];
                order.sort_by(|&a, &b| {
                    children[a]
                        .region
                        .distance_to(center)
                        .total_cmp(&children[b].region.distance_to(center))
                });
                for k in order {
                    children[k].closest(center, best, found);
                }
            }
        }
    }

    fn nearby<'a>(&'a self, center: &Point, radius: f64, out: &mut Vec<&'a T>) {
        if !self.region.intersects_circle(center, radius) {
            return;
        }
        match &self.body {
            Body::Leaf(Some(occupant)) => {
                if !occupant.pos.coincides(center) && occupant.pos.distance(center) <= radius {
                    out.push(&occupant.item);
                }
            }
            Body::Leaf(None) => {}
            Body::Branch { children, .. } => {
                for child in children.iter() {
                    child.nearby(center, radius, out);
                }
            }
        }
    }

    fn reachable<'a>(&'a self, center: &Point, radius: f64, out: &mut Vec<&'a T>) {
        if !self.region.intersects_circle(center, radius) {
            return;
        }
        match &self.body {
            Body::Leaf(Some(occupant)) => out.push(&occupant.item),
            Body::Leaf(None) => {}
            Body::Branch { children, .. } => {
                for child in children.iter() {
                    child.reachable(center, radius, out);
                }
            }
        }
    }

    fn leaf_at(&self, pos: &Point) -> &Node<T, H> {
        let mut node = self;
        while let Body::Branch { children, .. } = &node.body {
            node = &children[node.region.quadrant_of(pos)];
        }
        node
    }

    fn drain_into(&mut self, out: &mut Vec<T>) {
        match std::mem::replace(&mut self.body, Body::Leaf(None)) {
            Body::Leaf(Some(occupant)) => out.push(occupant.item),
            Body::Leaf(None) => {}
            Body::Branch { mut children, .. } => {
                for child in children.iter_mut() {
                    child.drain_into(out);
                }
            }
        }
    }

    fn check(&self) -> usize {
        match &self.body {
            Body::Leaf(slot) => {
                if let Some(occupant) = slot {
                    assert!(
                        self.region.contains(&occupant.pos),
                        "occupant at ({}, {}) stored outside its leaf",
                        occupant.pos.x,
                        occupant.pos.y
                    );
                }
                usize::from(slot.is_some())
            }
            Body::Branch { count, children } => {
                let sum: usize = children.iter().map(Node::check).sum();
                assert_eq!(*count, sum, "branch count disagrees with its children");
                assert!(sum > 1, "branch holding {sum} object(s) should have collapsed");
                sum
            }
        }
    }
}

/// Quadrant tree mapping positions to items `T`, each with a resize hook `H`.
pub struct QuadTree<T, H = ()> {
    root: Node<T, H>,
}

impl<T, H: Clone> QuadTree<T, H> {
    #[must_use]
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::with_region(Region::new(x_min, y_min, x_max, y_max))
    }

    #[must_use]
    pub fn with_region(region: Region) -> Self {
        Self {
            root: Node::leaf(region),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Region {
        self.root.region
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_out_of_bounds(&self, pos: &Point) -> bool {
        !self.root.region.contains(pos)
    }

    /// Stores `item` at `pos`.
    ///
    /// # Panics
    /// If `pos` is outside the tree or coincides with an existing occupant.
    pub fn insert(&mut self, item: T, pos: Point, on_resize: H) -> Resized<H> {
        assert!(
            !self.is_out_of_bounds(&pos),
            "insert at ({}, {}) is outside the tree",
            pos.x,
            pos.y
        );
        Resized::one(self.root.insert(Occupant {
            item,
            pos,
            on_resize,
        }))
    }

    /// Removes and returns the item located at `pos`.
    ///
    /// # Panics
    /// If nothing is stored at `pos`.
    pub fn remove(&mut self, pos: &Point) -> (T, Resized<H>) {
        assert!(
            !self.is_out_of_bounds(pos),
            "remove at ({}, {}) is outside the tree",
            pos.x,
            pos.y
        );
        let (occupant, hook) = self.root.remove(pos);
        (occupant.item, Resized::one(hook))
    }

    /// Moves the item at `old` to `new`.
    ///
    /// Staying inside the same leaf is a plain coordinate update. Leaving the
    /// leaf but staying inside its parent reinserts from the parent. Anything
    /// else is a remove followed by an insert from the root.
    ///
    /// # Panics
    /// If nothing is stored at `old` or `new` is outside the tree.
    pub fn update_position(&mut self, old: &Point, new: Point) -> Resized<H> {
        assert!(
            !self.is_out_of_bounds(&new),
            "move to ({}, {}) leaves the tree",
            new.x,
            new.y
        );
        match self.root.relocate(old, new) {
            Relocation::Moved(hook) => Resized::one(hook),
            Relocation::Escaped => {
                let (mut occupant, removed) = self.root.remove(old);
                occupant.pos = new;
                let inserted = self.root.insert(occupant);
                Resized::two(removed, inserted)
            }
        }
    }

    #[must_use]
    pub fn is_occupied(&self, pos: &Point) -> bool {
        if self.is_out_of_bounds(pos) {
            return false;
        }
        matches!(&self.root.leaf_at(pos).body, Body::Leaf(Some(o)) if o.pos.coincides(pos))
    }

    /// Region of the leaf that contains (or would contain) `pos`.
    #[must_use]
    pub fn leaf_region(&self, pos: &Point) -> Region {
        assert!(
            !self.is_out_of_bounds(pos),
            "({}, {}) is outside the tree",
            pos.x,
            pos.y
        );
        self.root.leaf_at(pos).region
    }

    /// Distance from `pos` to the boundary of its leaf along `course`.
    #[must_use]
    pub fn distance_to_edge(&self, pos: &Point, course: f64) -> f64 {
        self.leaf_region(pos).distance_to_edge(pos, course)
    }

    /// Closest item to `pos`, ignoring one stored exactly at `pos`,
    /// together with its distance.
    #[must_use]
    pub fn closest(&self, pos: &Point) -> Option<(&T, f64)> {
        let mut best = f64::INFINITY;
        let mut found = None;
        self.root.closest(pos, &mut best, &mut found);
        found.map(|o| (&o.item, best))
    }

    /// Items within `radius` of `center` (inclusive), ignoring one stored at `center`.
    #[must_use]
    pub fn nearby(&self, center: &Point, radius: f64) -> Vec<&T> {
        let mut out = Vec::new();
        self.root.nearby(center, radius, &mut out);
        out
    }

    /// Items whose leaf comes within `radius` of `center`, wherever in the
    /// leaf they are stored. A superset of [`QuadTree::nearby`] that also
    /// covers occupants whose stored position lags their true one, as long
    /// as they have not left their leaf.
    #[must_use]
    pub fn reachable(&self, center: &Point, radius: f64) -> Vec<&T> {
        let mut out = Vec::new();
        self.root.reachable(center, radius, &mut out);
        out
    }

    /// Empties the tree, returning every item. No hooks fire.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        self.root.drain_into(&mut out);
        out
    }

    /// Walks the whole tree asserting its structural invariants and returns
    /// the number of stored items.
    pub fn check_invariants(&self) -> usize {
        self.root.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Tagged = QuadTree<u32, u32>;

    fn fired(resized: Resized<u32>) -> Vec<u32> {
        resized.into_iter().collect()
    }

    #[test]
    fn test_region_is_half_open() {
        let r = Region::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(&Point::new(0.0, 0.0)));
        assert!(r.contains(&Point::new(9.999, 9.999)));
        assert!(!r.contains(&Point::new(10.0, 5.0)));
        assert!(!r.contains(&Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_split_line_goes_to_lower_right_quadrant() {
        let r = Region::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.quadrant_of(&Point::new(5.0, 5.0)), 3);
        assert_eq!(r.quadrant_of(&Point::new(4.9, 5.0)), 2);
        assert_eq!(r.quadrant_of(&Point::new(5.0, 4.9)), 1);
        for (k, q) in r.quadrants().iter().enumerate() {
            let c = Point::new(q.x_min, q.y_min);
            assert_eq!(r.quadrant_of(&c), k);
        }
    }

    #[test]
    fn test_distance_to_region() {
        let r = Region::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(r.distance_to(&Point::new(15.0, 15.0)), 0.0);
        assert!((r.distance_to(&Point::new(7.0, 6.0)) - 5.0).abs() < 1e-12);
        assert!((r.distance_to(&Point::new(25.0, 15.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_insert_into_empty_leaf_fires_nothing() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        assert!(fired(tree.insert(1, Point::new(10.0, 10.0), 1)).is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.check_invariants(), 1);
    }

    #[test]
    fn test_split_fires_displaced_hook_once() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        // close enough to cascade several splits
        let hooks = fired(tree.insert(2, Point::new(11.0, 11.0), 2));
        assert_eq!(hooks, vec![1]);
        assert_eq!(tree.check_invariants(), 2);
        assert!(tree.leaf_region(&Point::new(10.0, 10.0)).width() < 10.0);
    }

    #[test]
    fn test_insert_into_other_quadrant_only_resizes_occupant() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(90.0, 90.0), 2);
        // lands in an empty quadrant of an existing branch
        assert!(fired(tree.insert(3, Point::new(90.0, 10.0), 3)).is_empty());
        assert_eq!(tree.check_invariants(), 3);
    }

    #[test]
    fn test_remove_collapses_and_fires_survivor() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(11.0, 11.0), 2);

        let (item, resized) = tree.remove(&Point::new(11.0, 11.0));
        assert_eq!(item, 2);
        assert_eq!(fired(resized), vec![1]);
        assert_eq!(tree.check_invariants(), 1);
        assert_eq!(tree.leaf_region(&Point::new(10.0, 10.0)), tree.bounds());
    }

    #[test]
    fn test_remove_with_two_siblings_left_does_not_collapse() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(90.0, 10.0), 2);
        let _ = tree.insert(3, Point::new(90.0, 90.0), 3);

        let (item, resized) = tree.remove(&Point::new(90.0, 90.0));
        assert_eq!(item, 3);
        assert!(resized.is_empty());
        assert_eq!(tree.check_invariants(), 2);
    }

    #[test]
    #[should_panic(expected = "no occupant")]
    fn test_remove_absent_is_fatal() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.remove(&Point::new(20.0, 20.0));
    }

    #[test]
    #[should_panic(expected = "outside the tree")]
    fn test_insert_out_of_bounds_is_fatal() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(100.0, 5.0), 1);
    }

    #[test]
    fn test_closest_and_update_position() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 10.0);
        let _ = tree.insert(1, a, 1);
        let _ = tree.insert(2, b, 2);

        let (item, d) = tree.closest(&a).expect("b is in the tree");
        assert_eq!(*item, 2);
        assert!((d - 200f64.sqrt()).abs() < 1e-9);

        let moved = Point::new(9.0, 9.0);
        let _ = tree.update_position(&a, moved);
        let (item, d) = tree.closest(&moved).expect("b is in the tree");
        assert_eq!(*item, 2);
        assert!((d - 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(tree.check_invariants(), 2);
    }

    #[test]
    fn test_closest_ignores_item_at_center() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(50.0, 50.0), 1);
        assert!(tree.closest(&Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_nearby_is_exact_and_excludes_center() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let center = Point::new(50.0, 50.0);
        let _ = tree.insert(0, center, 0);
        let _ = tree.insert(1, Point::new(53.0, 54.0), 1); // exactly 5 away
        let _ = tree.insert(2, Point::new(54.0, 54.0), 2); // ~5.66 away, region intersects
        let _ = tree.insert(3, Point::new(10.0, 90.0), 3);

        let mut found: Vec<u32> = tree.nearby(&center, 5.0).into_iter().copied().collect();
        found.sort_unstable();
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn test_move_inside_leaf_fires_nothing() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(90.0, 90.0), 2);
        let resized = tree.update_position(&Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert!(resized.is_empty());
        assert!(tree.is_occupied(&Point::new(20.0, 20.0)));
        assert!(!tree.is_occupied(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_move_into_occupied_sibling_fires_one_hook() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(60.0, 10.0), 2);
        let _ = tree.insert(3, Point::new(60.0, 60.0), 3);

        // 1 crosses into the top-right quadrant held by 2
        let hooks = fired(tree.update_position(&Point::new(10.0, 10.0), Point::new(70.0, 20.0)));
        assert_eq!(hooks, vec![2]);
        assert_eq!(tree.check_invariants(), 3);
    }

    #[test]
    fn test_escape_through_root_fires_up_to_two_hooks() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(12.0, 12.0), 2);
        let _ = tree.insert(3, Point::new(90.0, 90.0), 3);

        // 2 leaves its deep leaf and the parent; 1 is left alone in a
        // subtree that collapses, and 3 gets split
        let hooks = fired(tree.update_position(&Point::new(12.0, 12.0), Point::new(91.0, 91.0)));
        assert_eq!(hooks, vec![1, 3]);
        assert_eq!(tree.check_invariants(), 3);
    }

    #[test]
    fn test_distance_to_edge_of_leaf() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(90.0, 90.0), 2);
        // leaf of (10, 10) is [0, 50) × [0, 50)
        let d = tree.distance_to_edge(&Point::new(10.0, 10.0), 0.0);
        assert!((d - 40.0).abs() < 1e-9);
        let d = tree.distance_to_edge(&Point::new(10.0, 10.0), std::f64::consts::PI);
        assert!((d - 10.0).abs() < 1e-9);
        let d = tree.distance_to_edge(&Point::new(10.0, 10.0), std::f64::consts::FRAC_PI_2);
        assert!((d - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_reachable_covers_whole_leaves() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        let _ = tree.insert(1, Point::new(10.0, 10.0), 1);
        let _ = tree.insert(2, Point::new(90.0, 10.0), 2);
        let _ = tree.insert(3, Point::new(90.0, 90.0), 3);

        // 2 is stored 41 away, but its leaf [50, 100) × [0, 50) starts 1 away
        let center = Point::new(49.0, 10.0);
        let near: Vec<u32> = tree.nearby(&center, 2.0).into_iter().copied().collect();
        assert!(near.is_empty());
        let mut reach: Vec<u32> = tree.reachable(&center, 2.0).into_iter().copied().collect();
        reach.sort_unstable();
        assert_eq!(reach, vec![1, 2]);
    }

    #[test]
    fn test_drain_empties_tree() {
        let mut tree = Tagged::new(0.0, 0.0, 100.0, 100.0);
        for (k, p) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
            let _ = tree.insert(k, Point::new(p, p), k);
        }
        let mut items = tree.drain();
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3]);
        assert!(tree.is_empty());
        assert_eq!(tree.check_invariants(), 0);
    }
}
