/// Fuzzes the search by checking for many random grids that a path is found exactly when the goal
/// is part of the same connected component, that the path is a shortest one, and that the
/// predecessor map forms a tree rooted at the start.
use grid_dijkstra::*;
use itertools::Itertools;
use rand::prelude::*;
use std::collections::VecDeque;

fn random_grid(n: usize, rng: &mut StdRng, density: f64) -> PathingGrid {
    let mut pathing_grid = PathingGrid::new(n).unwrap();
    for row in 0..n {
        for col in 0..n {
            if rng.gen_bool(density) {
                pathing_grid.set_barrier(row, col).unwrap();
            }
        }
    }
    pathing_grid
}

fn visualize_grid(grid: &PathingGrid, path: &[Cell]) {
    for row in 0..grid.rows() {
        let line: String = (0..grid.rows())
            .map(|col| {
                let cell = Cell::new(row, col);
                if path.contains(&cell) {
                    '*'
                } else {
                    grid.state(cell).unwrap().symbol()
                }
            })
            .collect();
        println!("{line}");
    }
}

/// Plain breadth-first distance, independent of the event machinery.
fn bfs_distance(grid: &PathingGrid, start: Cell, end: Cell) -> Option<usize> {
    let n = grid.rows();
    let mut dist = vec![None; n * n];
    dist[start.row * n + start.col] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        let d = dist[cell.row * n + cell.col].unwrap();
        if cell == end {
            return Some(d);
        }
        for next in grid.neighbors(cell) {
            let slot = &mut dist[next.row * n + next.col];
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let start = Cell::new(0, 0);
    let end = Cell::new(N - 1, N - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng, 0.35);
        grid.set_start(start.row, start.col).unwrap();
        grid.set_end(end.row, end.col).unwrap();
        let reachable = grid.reachable(start, end);
        let run = grid.search().unwrap();
        // Show the grid if the search and the components disagree
        if run.reached != reachable {
            visualize_grid(&grid, &[]);
        }
        assert_eq!(run.reached, reachable);
        assert_eq!(run.reached, bfs_distance(&grid, start, end).is_some());
        if !run.reached {
            assert_eq!(run.outcome(), SearchOutcome::Unreachable);
            continue;
        }

        let path = reconstruct_inclusive(&run.predecessors, start, end).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        assert!(path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b)));
        assert!(path
            .iter()
            .all(|c| grid.state(*c).is_some_and(|s| s.is_passable())));
        assert_eq!(Some(path.len() - 1), bfs_distance(&grid, start, end));
        assert_eq!(grid.distance(end), Some((path.len() - 1) as u32));
        assert_eq!(run.outcome(), SearchOutcome::PathFound(path[1..path.len() - 1].to_vec()));
    }
}

#[test]
fn predecessors_form_a_tree() {
    const N: usize = 12;
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let mut grid = random_grid(N, &mut rng, 0.25);
        let start = Cell::new(rng.gen_range(0..N), rng.gen_range(0..N));
        let mut end = Cell::new(rng.gen_range(0..N), rng.gen_range(0..N));
        if end == start {
            end = Cell::new((start.row + 1) % N, start.col);
        }
        grid.clear_barrier(start.row, start.col).unwrap();
        grid.clear_barrier(end.row, end.col).unwrap();
        let run = run(&mut grid, start, end).unwrap();
        assert!(!run.predecessors.contains(&start));
        for (cell, _) in run.predecessors.iter() {
            let walk = reconstruct_inclusive(&run.predecessors, start, *cell).unwrap();
            assert!(walk.len() <= run.predecessors.len() + 1);
            assert_eq!(grid.distance(*cell), Some((walk.len() - 1) as u32));
        }
    }
}

#[test]
fn open_grid_paths_are_manhattan() {
    const N: usize = 15;
    let mut rng = StdRng::seed_from_u64(3);
    let mut grid = PathingGrid::new(N).unwrap();
    for _ in 0..300 {
        let start = Cell::new(rng.gen_range(0..N), rng.gen_range(0..N));
        let end = Cell::new(rng.gen_range(0..N), rng.gen_range(0..N));
        if start == end {
            continue;
        }
        let run = run(&mut grid, start, end).unwrap();
        let path = run.path().unwrap();
        assert_eq!(path.len() + 1, start.manhattan_distance(&end));
    }
}

#[test]
fn reset_then_run_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let grid = random_grid(8, &mut rng, 0.3);
        let mut session = Session::from_grid(grid, 800).unwrap();
        session.apply(Command::SetStart(0, 7)).unwrap();
        session.apply(Command::SetEnd(7, 0)).unwrap();
        let Response::Searched(first) = session.apply(Command::Run).unwrap() else {
            panic!("run did not search");
        };
        session.apply(Command::Reset).unwrap();
        let Response::Searched(second) = session.apply(Command::Run).unwrap() else {
            panic!("run did not search");
        };
        assert_eq!(first, second);
    }
}
