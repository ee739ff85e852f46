use crate::board::{Board, Position};

/// A candidate three-in-a-row: three cells along a straight line. `hole` is
/// only populated by move search and names the cell whose occupant would
/// swap into the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFrame {
    pub positions: [Position; 3],
    pub hole: Option<Position>,
}

impl MatchFrame {
    /// Three cells starting at `origin`, stepping by `direction`.
    pub fn along(origin: Position, direction: Position) -> Self {
        Self {
            positions: [origin, origin + direction, origin + direction * 2],
            hole: None,
        }
    }

    pub fn is_vertical(&self) -> bool {
        let [p1, p2, p3] = self.positions;
        p1.x == p2.x && p2.x == p3.x
    }

    /// The lowest-y cell of the frame's first column. For a vertical frame
    /// this is where gravity collapse starts.
    pub fn low_end(&self) -> Position {
        let [p1, p2, p3] = self.positions;
        Position::new(p1.x, p1.y.min(p2.y).min(p3.y))
    }
}

/// The six windows probed around a position, in tie-break order: the three
/// horizontal windows left to right, then the three vertical windows bottom
/// to top. Each frame is built low-end first (p1 is the leftmost or
/// bottommost cell).
fn candidate_frames(pos: Position) -> [MatchFrame; 6] {
    [
        MatchFrame::along(pos + Position::LEFT * 2, Position::RIGHT),
        MatchFrame::along(pos + Position::LEFT, Position::RIGHT),
        MatchFrame::along(pos, Position::RIGHT),
        MatchFrame::along(pos + Position::DOWN * 2, Position::UP),
        MatchFrame::along(pos + Position::DOWN, Position::UP),
        MatchFrame::along(pos, Position::UP),
    ]
}

/// True when all three cells are occupied by tiles of one kind.
pub(crate) fn frame_matches(board: &Board, frame: &MatchFrame) -> bool {
    let [p1, p2, p3] = frame.positions;
    let (Some(a), Some(b), Some(c)) = (board.get(p1), board.get(p2), board.get(p3)) else {
        return false;
    };

    a.kind == b.kind && b.kind == c.kind
}

/// Finds a matching triple touching `pos`, or `None`. The first window in
/// fixed order wins, so results are reproducible.
pub fn find_match_at(board: &Board, pos: Position) -> Option<MatchFrame> {
    candidate_frames(pos)
        .into_iter()
        .find(|frame| frame_matches(board, frame))
}

/// Probes both halves of a swapped pair; tile A's own matches take priority
/// over tile B's.
pub fn find_match_near(board: &Board, a: Position, b: Position) -> Option<MatchFrame> {
    find_match_at(board, a).or_else(|| find_match_at(board, b))
}
