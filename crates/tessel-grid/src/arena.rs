//! Element arena: contiguous storage addressed by [`ElementId`].
//!
//! Neighbour relations are slot indices into the same arena. Removal is
//! mark-then-compact: discarded elements are first disconnected from every
//! survivor, then survivors are packed in raster order and their neighbour
//! slots rewritten through a remap table.

use std::ops::Index;

use indexmap::IndexMap;
use tessel_core::{ElementId, GridError, LatticeCoord, Point2, NO_NEIGHBOUR};

use crate::element::GridElement;

/// Owning store of every element of a grid.
#[derive(Clone, Debug)]
pub struct ElementArena {
    degree: usize,
    elements: Vec<GridElement>,
    index: IndexMap<LatticeCoord, ElementId>,
}

impl ElementArena {
    pub(crate) fn with_capacity(degree: usize, capacity: usize) -> Self {
        Self {
            degree,
            elements: Vec::with_capacity(capacity),
            index: IndexMap::with_capacity(capacity),
        }
    }

    /// Rebuild an arena from elements whose neighbour slots are already set.
    pub(crate) fn from_elements(degree: usize, elements: Vec<GridElement>) -> Self {
        let index = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.coord, ElementId(i as u32)))
            .collect();
        Self {
            degree,
            elements,
            index,
        }
    }

    /// Append a new, unconnected element.
    pub(crate) fn push(
        &mut self,
        coord: LatticeCoord,
        position: Point2,
    ) -> Result<ElementId, GridError> {
        let slot = u32::try_from(self.elements.len())
            .ok()
            .filter(|&s| s < NO_NEIGHBOUR)
            .ok_or_else(|| GridError::config("element count exceeds u32 range"))?;
        let id = ElementId(slot);
        if self.index.insert(coord, id).is_some() {
            return Err(GridError::config(format!(
                "duplicate lattice coordinate {coord}"
            )));
        }
        self.elements.push(GridElement::new(coord, position));
        Ok(id)
    }

    /// Direction opposite to `dir`.
    pub fn opposite(&self, dir: usize) -> usize {
        (dir + self.degree / 2) % self.degree
    }

    /// Connect `a` to `b` in direction `dir`, and `b` to `a` in the opposite
    /// direction.
    pub(crate) fn link(&mut self, a: ElementId, dir: usize, b: ElementId) {
        let opp = self.opposite(dir);
        self.elements[a.index()].neighbours[dir] = Some(b);
        self.elements[b.index()].neighbours[opp] = Some(a);
    }

    /// Number of neighbour directions.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` if the arena holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `id`, or `None` if the slot does not exist.
    pub fn get(&self, id: ElementId) -> Option<&GridElement> {
        self.elements.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> &mut GridElement {
        &mut self.elements[id.index()]
    }

    /// Slot of the element at lattice coordinate `coord`.
    pub fn find(&self, coord: LatticeCoord) -> Option<ElementId> {
        self.index.get(&coord).copied()
    }

    /// Iterate `(id, element)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &GridElement)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    /// Elements in slot order.
    pub fn elements(&self) -> &[GridElement] {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [GridElement] {
        &mut self.elements
    }

    /// Discard every element for which `keep` is false and pack the
    /// survivors in raster order. Returns the number removed.
    pub(crate) fn compact(&mut self, keep: impl Fn(&GridElement) -> bool) -> usize {
        let n = self.elements.len();
        let keep_mask: Vec<bool> = self.elements.iter().map(&keep).collect();

        // Clear back-references into every discarded element first.
        for i in 0..n {
            if keep_mask[i] {
                continue;
            }
            for dir in 0..self.degree {
                if let Some(nb) = self.elements[i].neighbours[dir] {
                    let opp = self.opposite(dir);
                    self.elements[nb.index()].neighbours[opp] = None;
                    self.elements[i].neighbours[dir] = None;
                }
            }
        }

        let mut order: Vec<usize> = (0..n).filter(|&i| keep_mask[i]).collect();
        order.sort_by_key(|&i| self.elements[i].coord);

        let mut remap: Vec<Option<ElementId>> = vec![None; n];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = Some(ElementId(new as u32));
        }

        let mut old: Vec<Option<GridElement>> = std::mem::take(&mut self.elements)
            .into_iter()
            .map(Some)
            .collect();
        let mut packed = Vec::with_capacity(order.len());
        for &o in &order {
            if let Some(mut e) = old[o].take() {
                for slot in e.neighbours.iter_mut() {
                    *slot = slot.and_then(|nb| remap[nb.index()]);
                }
                packed.push(e);
            }
        }

        self.index = packed
            .iter()
            .enumerate()
            .map(|(i, e)| (e.coord, ElementId(i as u32)))
            .collect();
        self.elements = packed;
        n - order.len()
    }
}

impl Index<ElementId> for ElementArena {
    type Output = GridElement;

    fn index(&self, id: ElementId) -> &GridElement {
        &self.elements[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 1-D strip of `n` elements linked east/west in a degree-2 arena.
    fn strip(n: i32) -> ElementArena {
        let mut arena = ElementArena::with_capacity(2, n as usize);
        let mut prev = None;
        for a in 0..n {
            let id = arena
                .push(LatticeCoord::new(a, 0), Point2::new(a as f64, 0.0))
                .unwrap();
            if let Some(p) = prev {
                arena.link(p, 0, id);
            }
            prev = Some(id);
        }
        arena
    }

    #[test]
    fn link_is_symmetric() {
        let arena = strip(3);
        assert_eq!(arena[ElementId(0)].neighbour(0), Some(ElementId(1)));
        assert_eq!(arena[ElementId(1)].neighbour(1), Some(ElementId(0)));
    }

    #[test]
    fn duplicate_coord_rejected() {
        let mut arena = strip(2);
        let err = arena.push(LatticeCoord::new(1, 0), Point2::ZERO).unwrap_err();
        assert!(matches!(err, GridError::Configuration { .. }));
    }

    #[test]
    fn compact_disconnects_and_renumbers() {
        let mut arena = strip(5);
        let removed = arena.compact(|e| e.coord.a != 2);
        assert_eq!(removed, 1);
        assert_eq!(arena.len(), 4);
        // (1,0) lost its east neighbour, (3,0) lost its west neighbour.
        let left = arena.find(LatticeCoord::new(1, 0)).unwrap();
        let right = arena.find(LatticeCoord::new(3, 0)).unwrap();
        assert_eq!(arena[left].neighbour(0), None);
        assert_eq!(arena[right].neighbour(1), None);
        assert_eq!(right, ElementId(2));
        // Remaining links were rewritten to the new slots.
        let last = arena.find(LatticeCoord::new(4, 0)).unwrap();
        assert_eq!(arena[right].neighbour(0), Some(last));
        assert_eq!(arena[last].neighbour(1), Some(right));
    }

    #[test]
    fn compact_orders_by_raster() {
        let mut arena = ElementArena::with_capacity(2, 3);
        arena.push(LatticeCoord::new(0, 1), Point2::ZERO).unwrap();
        arena.push(LatticeCoord::new(5, 0), Point2::ZERO).unwrap();
        arena.push(LatticeCoord::new(-5, 0), Point2::ZERO).unwrap();
        arena.compact(|_| true);
        let coords: Vec<_> = arena.elements().iter().map(|e| e.coord()).collect();
        assert_eq!(
            coords,
            vec![
                LatticeCoord::new(-5, 0),
                LatticeCoord::new(5, 0),
                LatticeCoord::new(0, 1)
            ]
        );
        assert_eq!(arena.find(LatticeCoord::new(0, 1)), Some(ElementId(2)));
    }
}
