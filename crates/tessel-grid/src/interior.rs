//! Interior marking: flag every element enclosed by a fitted ring.
//!
//! Marking starts from a seed known to lie inside. Straight runs are
//! marched from the seed until they hit the ring; one of them (towards
//! [`Lattice::UP`]) lands on the ring, and from there the marker walks the
//! ring, rotating through each ring element's neighbours and marching inward
//! lines. A ring walk alone can miss pockets behind concave stretches, so a
//! final flood over [`Lattice::MARCH_DIRECTIONS`] closes the interior.
//!
//! The same marker serves domain boundaries and region boundaries; only the
//! flag pair differs.

use std::collections::VecDeque;

use tessel_core::{ElementFlags, ElementId};
use tracing::{trace, warn};

use crate::arena::ElementArena;
use crate::element::DISTANCE_UNSET;
use crate::lattice::Lattice;
use crate::parallel;

/// Bounded memory of the most recently visited ring elements, so the walk
/// does not step back onto where it came from.
#[derive(Debug)]
pub(crate) struct RecentRing {
    depth: usize,
    items: VecDeque<ElementId>,
}

impl RecentRing {
    pub(crate) fn new(depth: usize) -> Self {
        Self {
            depth: depth.max(1),
            items: VecDeque::with_capacity(depth.max(1)),
        }
    }

    pub(crate) fn push(&mut self, id: ElementId) {
        if self.items.len() == self.depth {
            self.items.pop_front();
        }
        self.items.push_back(id);
    }

    pub(crate) fn contains(&self, id: ElementId) -> bool {
        self.items.contains(&id)
    }
}

/// Marks the interior of a ring carrying `boundary` with `inside`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InteriorMarker {
    boundary: ElementFlags,
    inside: ElementFlags,
    memory: usize,
}

impl InteriorMarker {
    /// Marker for the domain boundary.
    pub(crate) fn boundary(memory: usize) -> Self {
        Self {
            boundary: ElementFlags::IS_BOUNDARY,
            inside: ElementFlags::INSIDE_BOUNDARY,
            memory,
        }
    }

    /// Marker for a region boundary.
    pub(crate) fn region(memory: usize) -> Self {
        Self {
            boundary: ElementFlags::IS_REGION_BOUNDARY,
            inside: ElementFlags::INSIDE_REGION,
            memory,
        }
    }

    fn on_ring(&self, arena: &ElementArena, id: ElementId) -> bool {
        arena[id].flags().contains(self.boundary)
    }

    fn is_inside(&self, arena: &ElementArena, id: ElementId) -> bool {
        arena[id].flags().contains(self.inside)
    }

    /// Inside and not on the ring.
    fn is_open_inside(&self, arena: &ElementArena, id: ElementId) -> bool {
        !self.on_ring(arena, id) && self.is_inside(arena, id)
    }

    fn set_inside(&self, arena: &mut ElementArena, id: ElementId) {
        arena.get_mut(id).flags.insert(self.inside);
    }

    /// Mark the interior reachable from `seed`. With no seed only the ring
    /// itself counts as inside.
    pub(crate) fn mark<L: Lattice>(&self, arena: &mut ElementArena, seed: Option<ElementId>) {
        let Some(seed) = seed else {
            warn!("no interior seed; only the ring is inside");
            return;
        };

        let start = if self.on_ring(arena, seed) {
            seed
        } else {
            self.set_inside(arena, seed);
            for &dir in L::MARCH_DIRECTIONS {
                self.march(arena, seed, dir);
            }
            match self.run_to_ring(arena, seed, L::UP) {
                Some(hit) => hit,
                None => {
                    warn!(seed = %seed, "interior run left the grid without meeting the ring");
                    self.close::<L>(arena);
                    return;
                }
            }
        };

        let steps = self.walk_ring::<L>(arena, start);
        trace!(steps, "ring walk finished");
        self.close::<L>(arena);
    }

    /// March from `from` along `dir`, marking until the ring or the grid edge.
    fn march(&self, arena: &mut ElementArena, from: ElementId, dir: usize) {
        let mut cur = arena[from].neighbour(dir);
        let mut budget = arena.len();
        while let Some(id) = cur {
            if self.on_ring(arena, id) || budget == 0 {
                break;
            }
            self.set_inside(arena, id);
            cur = arena[id].neighbour(dir);
            budget -= 1;
        }
    }

    /// Like [`march`](Self::march) but returns the ring element it stops on.
    fn run_to_ring(&self, arena: &mut ElementArena, from: ElementId, dir: usize) -> Option<ElementId> {
        let mut cur = arena[from].neighbour(dir);
        let mut budget = arena.len();
        while let Some(id) = cur {
            if self.on_ring(arena, id) {
                return Some(id);
            }
            if budget == 0 {
                return None;
            }
            self.set_inside(arena, id);
            cur = arena[id].neighbour(dir);
            budget -= 1;
        }
        None
    }

    /// Walk the ring from `start`; returns the number of ring elements visited.
    fn walk_ring<L: Lattice>(&self, arena: &mut ElementArena, start: ElementId) -> usize {
        let mut recent = RecentRing::new(self.memory);
        let mut current = start;
        let cap = 2 * arena.len();
        let mut steps = 0;
        while steps < cap {
            self.mark_from_ring::<L>(arena, current);
            recent.push(current);
            steps += 1;
            match self.next_on_ring(arena, current, &recent) {
                Some(next) if next != start => current = next,
                _ => break,
            }
        }
        steps
    }

    /// From ring element `b`, rotate both ways away from an inward neighbour
    /// until the ring is met, marching inward lines along the way.
    fn mark_from_ring<L: Lattice>(&self, arena: &mut ElementArena, b: ElementId) {
        let degree = L::DEGREE;
        let Some(first) = (0..degree).find(|&dir| {
            arena[b]
                .neighbour(dir)
                .is_some_and(|n| self.is_open_inside(arena, n))
        }) else {
            return;
        };
        let marches = |dir: usize| L::MARCH_DIRECTIONS.contains(&dir);

        if marches(first) {
            self.march(arena, b, first);
        }
        for turn in [1, degree - 1] {
            for step in 1..degree {
                let dir = (first + turn * step) % degree;
                match arena[b].neighbour(dir) {
                    Some(n) if !self.on_ring(arena, n) => {
                        if marches(dir) {
                            self.march(arena, b, dir);
                        }
                    }
                    _ => break,
                }
            }
        }
    }

    /// An adjacent ring element not recently visited that borders the
    /// marked interior.
    fn next_on_ring(
        &self,
        arena: &ElementArena,
        current: ElementId,
        recent: &RecentRing,
    ) -> Option<ElementId> {
        (0..arena.degree())
            .filter_map(|dir| arena[current].neighbour(dir))
            .find(|&n| {
                self.on_ring(arena, n)
                    && !recent.contains(n)
                    && (0..arena.degree())
                        .filter_map(|dir| arena[n].neighbour(dir))
                        .any(|m| self.is_open_inside(arena, m))
            })
    }

    /// Flood from every marked element to unmarked, non-ring neighbours.
    fn close<L: Lattice>(&self, arena: &mut ElementArena) {
        let mut stack: Vec<ElementId> = arena
            .iter()
            .filter(|(id, _)| self.is_open_inside(arena, *id))
            .map(|(id, _)| id)
            .collect();
        while let Some(id) = stack.pop() {
            for &dir in L::MARCH_DIRECTIONS {
                if let Some(n) = arena[id].neighbour(dir) {
                    if !self.on_ring(arena, n) && !self.is_inside(arena, n) {
                        self.set_inside(arena, n);
                        stack.push(n);
                    }
                }
            }
        }
    }
}

/// Distance from every inside element to the nearest boundary element:
/// zero on the boundary, [`DISTANCE_UNSET`] outside.
pub(crate) fn compute_distance_to_boundary(arena: &mut ElementArena, threshold: usize) {
    let ring: Vec<_> = arena
        .elements()
        .iter()
        .filter(|e| e.is_boundary())
        .map(|e| e.position())
        .collect();
    parallel::for_each_indexed_mut(arena.elements_mut(), threshold, |_, e| {
        e.dist_to_boundary = if e.is_boundary() {
            0.0
        } else if e.inside_boundary() && !ring.is_empty() {
            ring.iter()
                .map(|p| p.distance(e.position()))
                .fold(f64::INFINITY, f64::min)
        } else {
            DISTANCE_UNSET
        };
    });
}
