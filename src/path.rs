use crate::cell::Cell;
use crate::error::GridError;
use crate::search::PredecessorMap;
use log::warn;

/// Follows predecessors back from `end` to `start` and returns the walk in start-to-end order,
/// both endpoints included.
///
/// Fails with [GridError::NoPath] when the chain breaks off before reaching `start`, which is
/// the case for every end cell a search did not reach. Chains that loop are treated the same
/// way; maps built by [run](crate::search::run) never contain them.
pub fn reconstruct_inclusive(
    predecessors: &PredecessorMap,
    start: Cell,
    end: Cell,
) -> Result<Vec<Cell>, GridError> {
    let no_path = || GridError::NoPath { end };
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        // Every cell but the start has to come from the map, so a longer walk revisits a cell
        if path.len() > predecessors.len() {
            warn!("Predecessor chain from {} loops without reaching {}", end, start);
            return Err(no_path());
        }
        current = *predecessors.get(&current).ok_or_else(no_path)?;
        path.push(current);
    }
    path.reverse();
    Ok(path)
}

/// The cells strictly between `start` and `end` on the recorded path. Adjacent endpoints give
/// an empty path.
pub fn reconstruct(
    predecessors: &PredecessorMap,
    start: Cell,
    end: Cell,
) -> Result<Vec<Cell>, GridError> {
    let mut path = reconstruct_inclusive(predecessors, start, end)?;
    path.pop();
    if !path.is_empty() {
        path.remove(0);
    }
    Ok(path)
}
