//! Integration tests for maze generation: spanning-tree structure,
//! determinism, cutoff behavior and marker refresh.

use std::collections::VecDeque;

use pretty_assertions::assert_eq;
use test_case::test_case;

use oubliette::dungeon::Dungeon;
use oubliette::factory::RecordingFactory;
use oubliette::grid::{GridPos, Layer, DIRECTIONS};
use oubliette::settings::MazeSettings;

fn fixed_settings(size: usize, seed: u64) -> MazeSettings {
    MazeSettings {
        maze_size: size,
        seed,
        use_random_seed: false,
        ..Default::default()
    }
}

fn generate(size: usize, seed: u64) -> Dungeon<RecordingFactory> {
    let mut dungeon = Dungeon::new(fixed_settings(size, seed), RecordingFactory::new());
    dungeon.generate().unwrap();
    dungeon
}

/// Cells reachable from `start` by walking passable doorways.
fn reachable_count(layer: &Layer, start: GridPos) -> usize {
    let size = layer.size();
    let mut seen = vec![false; size * size];
    let mut queue = VecDeque::from([start.index(size)]);
    seen[start.index(size)] = true;

    while let Some(index) = queue.pop_front() {
        let cell = layer.cell(index);
        for dir in DIRECTIONS {
            if !cell.has_doorway(dir) {
                continue;
            }
            let Some(next) = dir.step(cell.pos, size) else {
                continue; // the outward entrance doorway
            };
            let next_index = next.index(size);
            if !seen[next_index] {
                seen[next_index] = true;
                queue.push_back(next_index);
            }
        }
    }
    seen.iter().filter(|&&s| s).count()
}

fn doorway_snapshot(layer: &Layer) -> Vec<[bool; 4]> {
    layer.cells().iter().map(|c| c.doorways).collect()
}

#[test_case(2, 1)]
#[test_case(3, 99)]
#[test_case(5, 7)]
#[test_case(8, 123)]
#[test_case(12, 54321)]
fn spanning_tree_covers_every_cell(size: usize, seed: u64) {
    let dungeon = generate(size, seed);
    let layer = dungeon.active_layer().unwrap();
    let entrance = GridPos::new(0, if size % 2 == 1 { (size - 1) / 2 } else { size / 2 - 1 });

    // every cell reachable from the entrance
    assert_eq!(reachable_count(layer, entrance), size * size);
    // a spanning tree has exactly n - 1 edges, so no cycles
    assert_eq!(layer.doorway_pair_count(), size * size - 1);
    // traversal fully backtracked home
    assert!(layer.stack.is_empty());
}

#[test_case(4, 11)]
#[test_case(7, 2024)]
fn doorways_are_symmetric(size: usize, seed: u64) {
    let dungeon = generate(size, seed);
    let layer = dungeon.active_layer().unwrap();

    for cell in layer.cells() {
        for dir in DIRECTIONS {
            let Some(neighbor_pos) = dir.step(cell.pos, size) else {
                continue;
            };
            let neighbor = layer.cell(neighbor_pos.index(size));
            assert_eq!(
                cell.has_doorway(dir),
                neighbor.has_doorway(dir.opposite()),
                "asymmetric wall between ({}, {}) and ({}, {})",
                cell.pos.x,
                cell.pos.z,
                neighbor_pos.x,
                neighbor_pos.z
            );
        }
    }
}

#[test]
fn same_seed_reproduces_the_maze() {
    let first = generate(9, 4242);
    let second = generate(9, 4242);

    let layer_a = first.active_layer().unwrap();
    let layer_b = second.active_layer().unwrap();

    assert_eq!(doorway_snapshot(layer_a), doorway_snapshot(layer_b));
    assert_eq!(layer_a.deadends, layer_b.deadends);
    assert_eq!(layer_a.longest_path, layer_b.longest_path);
    assert_eq!(layer_a.end_cell, layer_b.end_cell);
}

#[test]
fn different_seeds_differ() {
    let first = generate(9, 1);
    let second = generate(9, 2);
    assert_ne!(
        doorway_snapshot(first.active_layer().unwrap()),
        doorway_snapshot(second.active_layer().unwrap())
    );
}

#[test]
fn minimal_maze_scenario() {
    // N=2, seed=1, no cutoff: one spanning tree over 4 cells
    let dungeon = generate(2, 1);
    let layer = dungeon.active_layer().unwrap();

    assert_eq!(layer.cells().len(), 4);
    assert!(layer.cells().iter().all(|c| c.visited));
    assert_eq!(layer.doorway_pair_count(), 3);
    assert!(layer.stack.is_empty());
}

#[test_case(5, 2; "odd entrance row")]
#[test_case(4, 1; "even entrance row")]
fn entrance_position(size: usize, expected_z: usize) {
    let mut dungeon = Dungeon::new(fixed_settings(size, 1), RecordingFactory::new());
    let report = dungeon.generate().unwrap();
    assert_eq!(report.entrance, GridPos::new(0, expected_z));
}

#[test]
fn cutoff_is_monotone_in_the_cutoff_point() {
    let mut previous_visited = 0;
    for point in [10, 25, 40, 55, 70, 85, 100] {
        let settings = MazeSettings {
            cutoff: true,
            cutoff_point: point,
            mark_deadends: false,
            mark_longest_path: false,
            ..fixed_settings(10, 77)
        };
        let mut dungeon = Dungeon::new(settings, RecordingFactory::new());
        let report = dungeon.generate().unwrap();

        assert!(
            report.visited_cells >= previous_visited,
            "visited count dropped from {previous_visited} to {} at cutoff {point}",
            report.visited_cells
        );
        previous_visited = report.visited_cells;
    }
}

#[test]
fn cutoff_keeps_only_visited_rooms() {
    let settings = MazeSettings {
        cutoff: true,
        cutoff_point: 25,
        mark_deadends: false,
        mark_longest_path: false,
        ..fixed_settings(10, 5)
    };
    let mut dungeon = Dungeon::new(settings, RecordingFactory::new());
    let report = dungeon.generate().unwrap();

    assert!(report.cutoff_fired);
    assert_eq!(dungeon.factory().live_rooms(), report.visited_cells);
}

#[test]
fn refresh_markers_is_idempotent() {
    let mut dungeon = generate(7, 31);
    dungeon.refresh_markers().unwrap();

    let markers: Vec<_> = dungeon
        .factory()
        .rooms_of_variant(&dungeon.settings().deadend_marker)
        .iter()
        .map(|h| dungeon.factory().room(*h).unwrap().position)
        .collect();
    let painted = dungeon
        .factory()
        .tiles_with_material(&dungeon.settings().path_material);
    assert!(!markers.is_empty());
    assert!(!painted.is_empty());

    dungeon.refresh_markers().unwrap();

    let markers_again: Vec<_> = dungeon
        .factory()
        .rooms_of_variant(&dungeon.settings().deadend_marker)
        .iter()
        .map(|h| dungeon.factory().room(*h).unwrap().position)
        .collect();
    assert_eq!(markers_again, markers);
    assert_eq!(
        dungeon
            .factory()
            .tiles_with_material(&dungeon.settings().path_material),
        painted
    );
}

#[test]
fn regeneration_replaces_the_previous_maze() {
    let mut dungeon = generate(8, 15);
    let rooms_after_first = dungeon.factory().live_rooms();

    dungeon.generate().unwrap();
    let rooms_after_second = dungeon.factory().live_rooms();

    assert_eq!(rooms_after_first, rooms_after_second);
}

#[test]
fn longest_path_is_a_walkable_corridor() {
    let dungeon = generate(9, 500);
    let layer = dungeon.active_layer().unwrap();

    assert!(!layer.longest_path.is_empty());
    for pair in layer.longest_path.windows(2) {
        let here = layer.cell(pair[0]);
        let there_pos = layer.cell(pair[1]).pos;
        let dir = DIRECTIONS
            .into_iter()
            .find(|d| d.step(here.pos, layer.size()) == Some(there_pos))
            .expect("longest path cells must be adjacent");
        assert!(here.has_doorway(dir), "longest path crosses a closed wall");
    }
    // the recorded end cell extends the captured path
    let end = layer.end_cell.expect("a longest path records its end cell");
    assert!(!layer.longest_path.contains(&end));
}
