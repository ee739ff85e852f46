use rand::{Rng, seq::SliceRandom};

use crate::{
    board::{Board, Position, Rect},
    catalog::{Catalog, KindId},
    matching::{MatchFrame, find_match_at},
    record::MatchRecord,
};

/// Resolves a confirmed match: removes the three tiles, compacts the
/// affected column(s), and refills the vacated rectangle. Matched, fallen,
/// and spawned tiles are accumulated into `record`. Returns the refill
/// anomaly count.
///
/// A vertical run vacates three contiguous cells in one column, so a single
/// collapse with a probe distance of 3 closes the gap. A horizontal run
/// costs each of its three columns exactly one cell, so each collapses
/// independently with a probe distance of 1, and all three final holes land
/// on the same row.
pub fn resolve(
    board: &mut Board,
    catalog: &Catalog,
    rng: &mut impl Rng,
    frame: &MatchFrame,
    record: &mut MatchRecord,
) -> usize {
    for &pos in &frame.positions {
        let tile = board
            .take(pos)
            .unwrap_or_else(|| panic!("match frame cell {pos} is vacant"));
        record.matched.push(tile);
    }

    let max_y = board.bounds().max.y;
    let rect = if frame.is_vertical() {
        let hole = frame.low_end();
        let final_hole = collapse_column(board, hole, 3, record);
        Rect::new(
            Position::new(hole.x, final_hole.y),
            Position::new(hole.x, max_y),
        )
    } else {
        let [p1, _, p3] = frame.positions;
        let mut final_row = p1.y;

        for (i, &pos) in frame.positions.iter().enumerate() {
            let final_hole = collapse_column(board, pos, 1, record);
            debug_assert!(
                i == 0 || final_hole.y == final_row,
                "columns of one row collapsed to different hole rows"
            );
            final_row = final_hole.y;
        }

        Rect::new(
            Position::new(p1.x, final_row),
            Position::new(p3.x, max_y),
        )
    };

    refill(board, catalog, rng, rect, Some(record))
}

/// Slides tiles down into `hole`, probing `skip` rows above it: while the
/// probed cell holds a tile, the tile drops into the hole and the hole
/// advances one row. Returns the stopping hole, the bottom of the vacancy
/// left for refill.
fn collapse_column(
    board: &mut Board,
    mut hole: Position,
    skip: i32,
    record: &mut MatchRecord,
) -> Position {
    let max_y = board.bounds().max.y;

    while hole.y < max_y {
        let probe = Position::new(hole.x, hole.y + skip);
        let Some(id) = board.remove(probe) else {
            break;
        };

        board.place(id, hole);
        record.moved.push(*board.tile(id));
        log::trace!("tile {id:?} fell {probe} -> {hole}");
        hole.y += 1;
    }

    hole
}

/// Fills every cell of `rect` (x ascending, then y ascending) with a fresh
/// tile, drawing a new kind permutation per cell and keeping the first
/// placement that does not complete a match. When every kind in the catalog
/// re-matches at a cell, the last attempt is kept anyway and the cell is
/// counted as an anomaly; the fill never aborts. Spawned tiles go into
/// `record.created` when a record is supplied.
pub fn refill(
    board: &mut Board,
    catalog: &Catalog,
    rng: &mut impl Rng,
    rect: Rect,
    mut record: Option<&mut MatchRecord>,
) -> usize {
    let mut kinds: Vec<KindId> = catalog.ids().collect();
    let mut anomalies = 0;

    for cell in rect.cells() {
        debug_assert!(board.get(cell).is_none(), "refill over occupied cell {cell}");
        kinds.shuffle(rng);

        let mut placed = None;
        for (attempt, &kind) in kinds.iter().enumerate() {
            let id = board.spawn(cell, kind);

            if find_match_at(board, cell).is_none() {
                placed = Some(id);
                break;
            }

            if attempt + 1 == kinds.len() {
                // Every kind re-matches here; keep the final attempt rather
                // than leave the cell vacant. A later pass resolves it.
                log::warn!("refill anomaly at {cell}: every catalog kind completes a match");
                anomalies += 1;
                placed = Some(id);
            } else {
                board.remove(cell);
                board.release(id);
            }
        }

        let id = placed.expect("catalog holds at least one kind");
        if let Some(record) = record.as_deref_mut() {
            record.created.push(*board.tile(id));
        }
    }

    anomalies
}
