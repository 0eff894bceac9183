//! Saving to and loading from files, across every fixture scenario.

use std::path::PathBuf;

use tessel_core::ElementFlags;
use tessel_grid::{DomainShape, GridConfig, HexGrid, HexLattice, RectGrid, RectLattice};
use tessel_snapshot::{grid_hash, load, save, SnapshotError};
use tessel_test_utils::fixtures::Scenario;
use tessel_test_utils::init_tracing;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tessel-{}-{name}.tssl", std::process::id()))
}

#[test]
fn hex_scenarios_reload_identically() {
    init_tracing();
    for scenario in Scenario::all() {
        let mut grid = HexGrid::new(GridConfig::hex(scenario.pitch, scenario.span)).unwrap();
        grid.set_boundary(&scenario.boundary, true).unwrap();

        let path = temp_path(&format!("hex-{}", scenario.name));
        save(&path, &grid).unwrap();
        let back = load::<HexLattice>(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(grid_hash(back.dense()), grid_hash(grid.dense()), "{}", scenario.name);
        assert_eq!(back.original_centroid(), grid.original_centroid());
        assert_eq!(back.centroid(), grid.centroid());
        assert_eq!(back.enclosed_tiles(), grid.enclosed_tiles());
        assert_eq!(
            back.count_with(ElementFlags::IS_BOUNDARY),
            grid.count_with(ElementFlags::IS_BOUNDARY)
        );
    }
}

#[test]
fn rect_parallelogram_domain_reloads() {
    let scenario = Scenario::square();
    let config = GridConfig::square(scenario.pitch, scenario.span)
        .with_domain_shape(DomainShape::Parallelogram);
    let mut grid = RectGrid::new(config).unwrap();
    grid.set_boundary(&scenario.boundary, false).unwrap();

    let path = temp_path("rect-parallelogram");
    save(&path, &grid).unwrap();
    let back = load::<RectLattice>(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(back.dense(), grid.dense());
    assert_eq!(back.extents(), grid.extents());
}

#[test]
fn reloaded_grid_answers_region_queries() {
    let scenario = Scenario::small_circle();
    let mut grid = HexGrid::new(GridConfig::hex(scenario.pitch, scenario.span)).unwrap();
    grid.set_boundary(&scenario.boundary, false).unwrap();

    let path = temp_path("region");
    save(&path, &grid).unwrap();
    let mut back = load::<HexLattice>(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let square = tessel_test_utils::square_points(4.0, tessel_core::Point2::ZERO, 0.25);
    let original = grid.region(&square, false);
    let reloaded = back.region(&square, false);
    assert!(!original.is_empty());
    assert_eq!(original, reloaded);
}

#[test]
fn missing_file_is_io_error() {
    let err = load::<HexLattice>(temp_path("does-not-exist")).unwrap_err();
    assert!(matches!(err, SnapshotError::Io(_)));
}
