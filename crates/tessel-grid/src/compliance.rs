//! Grid invariant test helpers.
//!
//! Every reduced grid must satisfy these regardless of lattice, boundary or
//! domain shape. Reused by the lattice, boundary, domain and grid test
//! modules.

use tessel_core::{ElementFlags, ElementId, NO_NEIGHBOUR};

use crate::arena::ElementArena;
use crate::grid::Grid;
use crate::lattice::Lattice;

/// Assert that `b = neighbour(a, d)` implies `a = neighbour(b, opposite(d))`.
pub fn assert_arena_symmetric(arena: &ElementArena) {
    for (id, e) in arena.iter() {
        for dir in 0..arena.degree() {
            if let Some(nb) = e.neighbour(dir) {
                let back = arena[nb].neighbour(arena.opposite(dir));
                assert_eq!(
                    back,
                    Some(id),
                    "symmetry violated: {} -> {} in direction {dir}, back link {back:?}",
                    e.coord(),
                    arena[nb].coord()
                );
            }
        }
    }
}

/// Assert that the lattice index maps every coordinate to its own slot.
pub fn assert_index_consistent(arena: &ElementArena) {
    for (id, e) in arena.iter() {
        assert_eq!(arena.find(e.coord()), Some(id), "index stale at {}", e.coord());
    }
}

/// Assert that dense indices are the permutation `0..N` in raster order.
pub fn assert_dense_permutation<L: Lattice>(grid: &Grid<L>) {
    let dense = grid.dense();
    assert_eq!(dense.len(), grid.len());
    let coords: Vec<_> = (0..dense.len())
        .map(|i| (dense.lattice_b()[i], dense.lattice_a()[i]))
        .collect();
    assert!(
        coords.windows(2).all(|w| w[0] < w[1]),
        "dense order is not strictly raster"
    );
    for (i, e) in grid.arena().elements().iter().enumerate() {
        assert_eq!(e.coord().a, dense.lattice_a()[i]);
        assert_eq!(e.coord().b, dense.lattice_b()[i]);
    }
}

/// Assert that absent neighbours use the sentinel and present ones are in range.
pub fn assert_sentinel<L: Lattice>(grid: &Grid<L>) {
    let dense = grid.dense();
    let n = dense.len() as u32;
    for dir in 0..dense.degree() {
        for (i, &nb) in dense.neighbours(dir).iter().enumerate() {
            assert!(nb == NO_NEIGHBOUR || nb < n, "element {i} dir {dir}: {nb}");
            let expected = grid.arena()[ElementId(i as u32)]
                .neighbour(dir)
                .map_or(NO_NEIGHBOUR, |id| id.0);
            assert_eq!(nb, expected);
        }
    }
}

/// Assert boundary implies inside, for both the domain and region pairs.
pub fn assert_flags_consistent<L: Lattice>(grid: &Grid<L>) {
    for i in 0..grid.dense().len() {
        let f = grid.dense().element_flags(i);
        if f.contains(ElementFlags::IS_BOUNDARY) {
            assert!(f.contains(ElementFlags::INSIDE_BOUNDARY), "element {i}: {f:?}");
        }
        if f.contains(ElementFlags::IS_REGION_BOUNDARY) {
            assert!(f.contains(ElementFlags::INSIDE_REGION), "element {i}: {f:?}");
        }
    }
}

/// Run every invariant check.
pub fn run_full_compliance<L: Lattice>(grid: &Grid<L>) {
    assert_arena_symmetric(grid.arena());
    assert_index_consistent(grid.arena());
    assert_dense_permutation(grid);
    assert_sentinel(grid);
    assert_flags_consistent(grid);
}
