use crate::board::{Board, Tile};

/// Per-operation accumulator consumed by the rendering collaborator:
/// which tiles vanished, which slid down, which spawned. Holds copies of
/// tile state; the matched tiles' arena slots stay live until [`clear`]
/// so a removed id and a created id never alias within one record.
///
/// [`clear`]: MatchRecord::clear
#[derive(Debug, Default)]
pub struct MatchRecord {
    pub matched: Vec<Tile>,
    pub moved: Vec<Tile>,
    pub created: Vec<Tile>,
}

impl MatchRecord {
    pub fn new() -> Self {
        Self {
            matched: Vec::with_capacity(3),
            moved: Vec::with_capacity(16),
            created: Vec::with_capacity(16),
        }
    }

    pub fn has_match(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Releases the matched tiles back to the board's arena and empties all
    /// three lists. Call between operations, after the renderer has drained
    /// the record.
    pub fn clear(&mut self, board: &mut Board) {
        for tile in self.matched.drain(..) {
            board.release(tile.id);
        }
        self.moved.clear();
        self.created.clear();
    }
}
