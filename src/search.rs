//! Dijkstra's algorithm over the 4-connected unit-cost grid. Every step of the expansion is
//! reported as a [SearchEvent] so a renderer can animate the search afterwards or while it
//! runs.
use crate::cell::{Cell, CellState, Role};
use crate::error::GridError;
use crate::path::reconstruct;
use crate::pathing_grid::PathingGrid;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use log::{info, trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// What happened to a cell during the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The cell was queued for expansion. Never reported for the end cell.
    Frontier,
    /// The cell was popped and its neighbours relaxed. Never reported for the start cell.
    Finalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchEvent {
    pub cell: Cell,
    pub kind: EventKind,
}

/// Receives events in the order the search produces them.
pub trait SearchObserver {
    fn on_event(&mut self, event: SearchEvent);
}

impl<F: FnMut(SearchEvent)> SearchObserver for F {
    fn on_event(&mut self, event: SearchEvent) {
        self(event)
    }
}

/// Maps every reached cell to the cell it was reached from. Iteration follows the order in
/// which cells were first reached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredecessorMap {
    parents: FxIndexMap<Cell, Cell>,
}

impl PredecessorMap {
    pub fn insert(&mut self, cell: Cell, predecessor: Cell) {
        self.parents.insert(cell, predecessor);
    }

    pub fn get(&self, cell: &Cell) -> Option<&Cell> {
        self.parents.get(cell)
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.parents.contains_key(cell)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &Cell)> {
        self.parents.iter()
    }
}

impl FromIterator<(Cell, Cell)> for PredecessorMap {
    fn from_iter<I: IntoIterator<Item = (Cell, Cell)>>(iter: I) -> PredecessorMap {
        PredecessorMap {
            parents: iter.into_iter().collect(),
        }
    }
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The cells strictly between start and end, in walking order.
    PathFound(Vec<Cell>),
    Unreachable,
}

/// Everything a finished search produced.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRun {
    pub start: Cell,
    pub end: Cell,
    pub predecessors: PredecessorMap,
    pub events: Vec<SearchEvent>,
    /// Whether the end cell was popped from the queue.
    pub reached: bool,
}

impl SearchRun {
    pub fn outcome(&self) -> SearchOutcome {
        match self.path() {
            Ok(path) => SearchOutcome::PathFound(path),
            Err(_) => SearchOutcome::Unreachable,
        }
    }

    /// The interior path cells, or [GridError::Unreachable] if the search ran dry.
    pub fn path(&self) -> Result<Vec<Cell>, GridError> {
        if !self.reached {
            return Err(GridError::Unreachable {
                start: self.start,
                end: self.end,
            });
        }
        reconstruct(&self.predecessors, self.start, self.end)
    }

    pub fn finalized(&self) -> impl Iterator<Item = Cell> + '_ {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Finalized)
            .map(|e| e.cell)
    }
}

struct SmallestCostHolder {
    distance: u32,
    sequence: u64,
    cell: Cell,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.sequence == other.sequence
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest distance, and among equal distances the
        // entry that was queued first
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Runs the search from `start` to `end`, collecting the events. See [run_with].
pub fn run(grid: &mut PathingGrid, start: Cell, end: Cell) -> Result<SearchRun, GridError> {
    run_with(grid, start, end, &mut |_: SearchEvent| {})
}

/// Runs the search from `start` to `end`, handing each event to `observer` as soon as it
/// happens and also recording it in the returned [SearchRun].
///
/// The search state stored in the grid is reset first and left in place afterwards, so
/// [PathingGrid::distance] reflects this run. Not finding the end is a normal outcome
/// (`reached == false`); errors are only returned for cells outside the grid, barrier
/// endpoints or `start == end`.
pub fn run_with<O: SearchObserver>(
    grid: &mut PathingGrid,
    start: Cell,
    end: Cell,
    observer: &mut O,
) -> Result<SearchRun, GridError> {
    grid.check(start)?;
    grid.check(end)?;
    for cell in [start, end] {
        if grid.state(cell) == Some(CellState::Barrier) {
            return Err(GridError::InvalidTransition {
                cell,
                state: CellState::Barrier,
            });
        }
    }
    if start == end {
        return Err(GridError::RoleConflict {
            cell: end,
            role: Role::End,
        });
    }
    info!("Searching from {} to {}", start, end);
    grid.reset_transient_state();

    let mut events = Vec::new();
    let mut emit = |cell: Cell, kind: EventKind| {
        let event = SearchEvent { cell, kind };
        observer.on_event(event);
        events.push(event);
    };
    let mut predecessors = PredecessorMap::default();
    let mut to_see = BinaryHeap::new();
    let mut sequence: u64 = 0;
    let mut reached = false;

    let slot = grid.slot_mut(start);
    slot.distance = 0;
    slot.in_frontier = true;
    to_see.push(SmallestCostHolder {
        distance: 0,
        sequence,
        cell: start,
    });

    while let Some(SmallestCostHolder { cell, .. }) = to_see.pop() {
        let slot = grid.slot_mut(cell);
        slot.in_frontier = false;
        let distance = slot.distance;
        if cell == end {
            reached = true;
            break;
        }
        let candidate = distance + 1;
        for neighbour in grid.neighbors(cell) {
            let slot = grid.slot_mut(neighbour);
            if candidate >= slot.distance {
                continue;
            }
            slot.distance = candidate;
            slot.predecessor = Some(cell);
            predecessors.insert(neighbour, cell);
            // A cell has at most one pending queue entry
            if !slot.in_frontier {
                slot.in_frontier = true;
                sequence += 1;
                to_see.push(SmallestCostHolder {
                    distance: candidate,
                    sequence,
                    cell: neighbour,
                });
                if neighbour != end {
                    emit(neighbour, EventKind::Frontier);
                }
            }
        }
        if cell != start {
            trace!("Finalized {} at distance {}", cell, distance);
            emit(cell, EventKind::Finalized);
        }
    }

    if reached {
        info!(
            "Reached {} at distance {} after {} events",
            end,
            grid.distance(end).unwrap_or_default(),
            events.len()
        );
    } else {
        info!("{} is not reachable from {}", end, start);
        if grid.reachable(start, end) {
            warn!("Components claim {} is reachable from {}", end, start);
        }
    }
    Ok(SearchRun {
        start,
        end,
        predecessors,
        events,
        reached,
    })
}

impl PathingGrid {
    /// Searches between the grid's own start and end cells.
    pub fn search(&mut self) -> Result<SearchRun, GridError> {
        self.search_with(&mut |_: SearchEvent| {})
    }

    pub fn search_with<O: SearchObserver>(
        &mut self,
        observer: &mut O,
    ) -> Result<SearchRun, GridError> {
        let start = self.start().ok_or(GridError::RoleUnset(Role::Start))?;
        let end = self.end().ok_or(GridError::RoleUnset(Role::End))?;
        run_with(self, start, end, observer)
    }
}
