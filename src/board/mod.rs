use std::{
    fmt::{self, Write},
    ops::{Add, Mul, Sub},
};

use fxhash::FxHashMap;
use itertools::Itertools as _;

use crate::catalog::KindId;

pub mod arena;

pub use arena::{TileArena, TileId};

/// Grid-cell address. `y` grows upward; gravity pulls tiles toward `min.y`.
/// The derived ordering (x, then y) is the deterministic scan order used by
/// refill and move search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const UP: Self = Self { x: 0, y: 1 };
    pub const DOWN: Self = Self { x: 0, y: -1 };
    pub const LEFT: Self = Self { x: -1, y: 0 };
    pub const RIGHT: Self = Self { x: 1, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Position {
    type Output = Position;

    fn mul(self, rhs: i32) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive board bounds, fixed for the lifetime of a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    /// Bounds for a `width` x `height` grid centered at the origin:
    /// `min = -(dims / 2)`, `max = min + dims - 1`.
    pub fn centered(width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0);
        let min = Position::new(-(width / 2), -(height / 2));
        let max = Position::new(min.x + width - 1, min.y + height - 1);
        Self { min, max }
    }

    pub fn center(&self) -> Position {
        Position::new(-self.min.x, -self.min.y)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// The whole board as a refill rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect {
            min: self.min,
            max: self.max,
        }
    }
}

/// Inclusive cell rectangle. Iteration order is x ascending, then y
/// ascending, which is the contract between gravity and refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min: Position,
    pub max: Position,
}

impl Rect {
    pub fn new(min: Position, max: Position) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    pub fn cells(self) -> impl Iterator<Item = Position> {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| Position::new(x, y)))
    }
}

/// A placed tile. Plain copyable state; the board's arena owns the canonical
/// version while the tile occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub kind: KindId,
    pub position: Position,
}

/// The position -> tile mapping plus bounds and tile-identity bookkeeping.
///
/// Invariant: the cell map is a bijection over occupied cells: each occupied
/// position holds exactly one live tile whose `.position` equals the key.
/// Bounds and adjacency are NOT validated here; callers stay in-bounds.
#[derive(Debug, Clone)]
pub struct Board {
    bounds: Bounds,
    cells: FxHashMap<Position, TileId>,
    arena: TileArena,
}

impl Board {
    pub fn new(bounds: Bounds) -> Self {
        let capacity = (bounds.width() * bounds.height()) as usize;
        Self {
            bounds,
            cells: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            arena: TileArena::with_capacity(capacity),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells.get(&pos).map(|&id| self.tile(id))
    }

    pub fn id_at(&self, pos: Position) -> Option<TileId> {
        self.cells.get(&pos).copied()
    }

    /// Resolves a live tile handle. A stale handle is a caller bug.
    pub fn tile(&self, id: TileId) -> &Tile {
        self.arena
            .get(id)
            .unwrap_or_else(|| panic!("stale tile handle {id:?}"))
    }

    pub fn try_tile(&self, id: TileId) -> Option<&Tile> {
        self.arena.get(id)
    }

    fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        self.arena
            .get_mut(id)
            .unwrap_or_else(|| panic!("stale tile handle {id:?}"))
    }

    /// Creates a tile at `pos`. The cell must be vacant.
    pub fn spawn(&mut self, pos: Position, kind: KindId) -> TileId {
        debug_assert!(self.bounds.contains(pos), "spawn out of bounds at {pos}");
        let id = self.arena.alloc(kind, pos);
        let previous = self.cells.insert(pos, id);
        debug_assert!(previous.is_none(), "spawn over occupied cell {pos}");
        id
    }

    /// Vacates a cell. The tile's arena slot stays live so records can keep
    /// referring to it; pair with [`Board::release`].
    pub fn remove(&mut self, pos: Position) -> Option<TileId> {
        self.cells.remove(&pos)
    }

    /// Vacates a cell and copies the tile out, slot kept live.
    pub fn take(&mut self, pos: Position) -> Option<Tile> {
        let id = self.cells.remove(&pos)?;
        Some(*self.tile(id))
    }

    /// Returns a tile's slot to the arena. The tile must already be off the
    /// cell map.
    pub fn release(&mut self, id: TileId) {
        debug_assert!(
            self.try_tile(id)
                .is_none_or(|tile| self.cells.get(&tile.position) != Some(&id)),
            "released tile still occupies a cell"
        );
        self.arena.free(id);
    }

    /// Moves a live tile to `pos`, updating both the map entry and the
    /// tile's own position. The previous map entry must already be gone.
    pub fn place(&mut self, id: TileId, pos: Position) {
        self.tile_mut(id).position = pos;
        self.cells.insert(pos, id);
    }

    /// Exchanges two tiles' cells: both map entries and both `.position`
    /// fields.
    pub fn swap_tiles(&mut self, a: TileId, b: TileId) {
        let pos_a = self.tile(a).position;
        let pos_b = self.tile(b).position;
        debug_assert_eq!(self.cells.get(&pos_a), Some(&a));
        debug_assert_eq!(self.cells.get(&pos_b), Some(&b));

        self.tile_mut(a).position = pos_b;
        self.tile_mut(b).position = pos_a;
        self.cells.insert(pos_a, b);
        self.cells.insert(pos_b, a);
    }

    /// Occupied positions in ascending (x, y) order. The cell map itself
    /// hashes; scans that must be reproducible go through this.
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.cells.keys().copied().sorted().collect()
    }

    /// Live tiles in deterministic position order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.occupied_positions()
            .into_iter()
            .map(|pos| self.tile(self.cells[&pos]))
    }
}

impl fmt::Display for Board {
    /// Renders rows top to bottom; kinds print as `A`, `B`, ... and vacant
    /// cells as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (self.bounds.min.y..=self.bounds.max.y).rev() {
            for x in self.bounds.min.x..=self.bounds.max.x {
                match self.get(Position::new(x, y)) {
                    Some(tile) => f.write_char((b'A' + tile.kind.0) as char)?,
                    None => f.write_char('.')?,
                }
            }
            if y > self.bounds.min.y {
                f.write_char('\n')?;
            }
        }

        Ok(())
    }
}

pub mod test_utils {
    use super::*;

    /// Builds a board from ASCII rows, top row first: `'A'` is kind 0,
    /// `'B'` kind 1, and so on; `'.'` leaves the cell vacant. Bounds are
    /// centered like [`Bounds::centered`].
    pub fn board_from_rows(rows: &[&str]) -> Board {
        let height = rows.len() as i32;
        let width = rows[0].len() as i32;
        let bounds = Bounds::centered(width, height);
        let mut board = Board::new(bounds);

        for (row_idx, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as i32, width, "ragged row {row:?}");
            let y = bounds.max.y - row_idx as i32;

            for (col_idx, ch) in row.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let x = bounds.min.x + col_idx as i32;
                board.spawn(Position::new(x, y), KindId(ch as u8 - b'A'));
            }
        }

        board
    }

    /// Sorted (position, kind) pairs, for whole-board equality assertions.
    pub fn snapshot(board: &Board) -> Vec<(Position, KindId)> {
        board
            .tiles()
            .map(|tile| (tile.position, tile.kind))
            .collect()
    }

    /// Asserts the position<->tile bijection: every map entry points at a
    /// live tile whose position is the key.
    pub fn assert_bijection(board: &Board) {
        let mut seen = std::collections::HashSet::new();
        for pos in board.occupied_positions() {
            let tile = board.get(pos).expect("occupied cell has a tile");
            assert_eq!(tile.position, pos, "tile {:?} desynced from cell", tile.id);
            assert!(seen.insert(tile.id), "tile {:?} occupies two cells", tile.id);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{test_utils::*, *};

    #[test]
    fn centered_bounds_cover_exact_dims() {
        let bounds = Bounds::centered(4, 4);
        assert_eq!(bounds.min, Position::new(-2, -2));
        assert_eq!(bounds.max, Position::new(1, 1));
        assert_eq!(bounds.center(), Position::new(2, 2));

        // Odd dims still span the full requested width.
        let bounds = Bounds::centered(5, 3);
        assert_eq!(bounds.min, Position::new(-2, -1));
        assert_eq!(bounds.max, Position::new(2, 1));
        assert_eq!(bounds.width(), 5);
        assert_eq!(bounds.height(), 3);
    }

    #[test]
    fn position_order_is_x_then_y() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(0, 0),
            Position::new(1, -1),
        ];
        positions.sort();

        assert_eq!(positions, vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, -1),
            Position::new(1, 0),
        ]);
    }

    #[test]
    fn rect_cells_iterate_x_then_y_ascending() {
        let rect = Rect::new(Position::new(0, 0), Position::new(1, 1));
        let cells: Vec<_> = rect.cells().collect();

        assert_eq!(cells, vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
        ]);
    }

    #[test]
    fn spawn_take_release_roundtrip() {
        let mut board = Board::new(Bounds::centered(4, 4));
        let pos = Position::new(0, 0);

        let id = board.spawn(pos, KindId(2));
        assert_eq!(board.get(pos).unwrap().id, id);
        assert_eq!(board.len(), 1);

        let tile = board.take(pos).unwrap();
        assert_eq!(tile.id, id);
        assert_eq!(tile.kind, KindId(2));
        assert!(board.get(pos).is_none());

        // Slot is still live until released.
        assert_eq!(board.tile(id).kind, KindId(2));
        board.release(id);
        assert!(board.try_tile(id).is_none());
    }

    #[test]
    fn swap_tiles_exchanges_cells_and_positions() {
        let mut board = Board::new(Bounds::centered(4, 4));
        let pos_a = Position::new(0, 0);
        let pos_b = Position::new(0, 1);
        let a = board.spawn(pos_a, KindId(0));
        let b = board.spawn(pos_b, KindId(1));

        board.swap_tiles(a, b);

        assert_eq!(board.tile(a).position, pos_b);
        assert_eq!(board.tile(b).position, pos_a);
        assert_eq!(board.id_at(pos_a), Some(b));
        assert_eq!(board.id_at(pos_b), Some(a));
        assert_bijection(&board);
    }

    #[test]
    fn occupied_positions_are_sorted() {
        let board = board_from_rows(&["AB", "CD"]);
        let positions = board.occupied_positions();

        let mut expected = positions.clone();
        expected.sort();
        assert_eq!(positions, expected);
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn board_from_rows_places_top_row_at_max_y() {
        let board = board_from_rows(&["AB", "CD"]);
        let bounds = board.bounds();

        // Top-left char lands at (min.x, max.y).
        let top_left = board
            .get(Position::new(bounds.min.x, bounds.max.y))
            .unwrap();
        assert_eq!(top_left.kind, KindId(0));

        let bottom_right = board
            .get(Position::new(bounds.max.x, bounds.min.y))
            .unwrap();
        assert_eq!(bottom_right.kind, KindId(3));

        assert_eq!(board.to_string(), "AB\nCD");
    }
}
