use thiserror::Error;

use crate::{
    board::{Board, Position, TileId},
    matching::{MatchFrame, frame_matches},
};

/// Expected terminal condition of [`find_possible_move`]: no swap anywhere
/// on the board would produce a match. The caller reacts by reshuffling.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no swap on the board would produce a match")]
pub struct NoPossibleMove;

const DIRECTIONS: [Position; 4] = [
    Position::UP,
    Position::DOWN,
    Position::LEFT,
    Position::RIGHT,
];

fn perpendicular(dir: Position) -> Position {
    Position::new(dir.y, dir.x)
}

/// The eight swap candidates probed at a position, in tie-break order.
///
/// Edge-break (one per direction): the tile at `pos` slides one cell into
/// `hole` and completes a run lying two and three cells out.
/// Center-break (one per direction): the tile slides into `hole` and becomes
/// the middle of a run across the perpendicular axis.
fn candidate_moves(pos: Position) -> [MatchFrame; 8] {
    let edge = |dir: Position| MatchFrame {
        positions: [pos, pos + dir * 2, pos + dir * 3],
        hole: Some(pos + dir),
    };

    let center = |dir: Position| {
        let hole = pos + dir;
        let perp = perpendicular(dir);
        MatchFrame {
            positions: [pos, hole + perp, hole - perp],
            hole: Some(hole),
        }
    };

    [
        edge(Position::UP),
        edge(Position::DOWN),
        edge(Position::LEFT),
        edge(Position::RIGHT),
        center(Position::UP),
        center(Position::DOWN),
        center(Position::LEFT),
        center(Position::RIGHT),
    ]
}

/// Scans the whole board in deterministic order for a swap that would create
/// a match. Returns the run tile and its swap partner (the occupant of the
/// frame's hole); first hit wins, so a given board always yields the same
/// move.
pub fn find_possible_move(board: &Board) -> Result<(TileId, TileId), NoPossibleMove> {
    for pos in board.occupied_positions() {
        for frame in candidate_moves(pos) {
            let hole = frame.hole.expect("move frames carry a hole");

            if frame_matches(board, &frame) {
                if let Some(partner) = board.id_at(hole) {
                    let origin = board.id_at(pos).expect("scan visits occupied cells");
                    return Ok((origin, partner));
                }
            }
        }
    }

    Err(NoPossibleMove)
}
