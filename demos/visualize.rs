use grid_dijkstra::{Cell, EventKind, PathingGrid, Recording, Session};

// In this example the search is replayed in the terminal on a grid with shape
//  ______
// |S  #  |
// | # #  |
// | #   #|
// | ####E|
// |      |
// |      |
//  ______
// where
// - # marks a barrier
// - S marks the start
// - E marks the end
//
// Cells entering the frontier are drawn as 'o', finalized cells as '+', the path as '*'.

const LAYOUT: &str = "
S..#..
.#.#..
.#...#
.####E
......
......";

fn draw(grid: &PathingGrid, marks: &[(Cell, char)]) {
    let mut rows: Vec<Vec<char>> = grid
        .to_string()
        .lines()
        .map(|line| line.chars().collect())
        .collect();
    for (cell, mark) in marks {
        rows[cell.row][cell.col] = *mark;
    }
    for row in rows {
        println!("{}", row.into_iter().collect::<String>());
    }
    println!();
}

fn replay(grid: &PathingGrid, recording: &Recording) {
    let mut marks = Vec::new();
    for event in &recording.events {
        let mark = match event.kind {
            EventKind::Frontier => 'o',
            EventKind::Finalized => '+',
        };
        marks.push((event.cell, mark));
        if event.kind == EventKind::Finalized {
            draw(grid, &marks);
        }
    }
    marks.extend(recording.path().iter().map(|cell| (*cell, '*')));
    draw(grid, &marks);
}

fn main() {
    let grid: PathingGrid = LAYOUT.parse().unwrap();
    let mut session = Session::from_grid(grid, 600).unwrap();
    let recording = session.run().unwrap();
    replay(session.grid(), &recording);
    println!("Path:");
    for cell in recording.path() {
        println!("{}", cell);
    }
}
