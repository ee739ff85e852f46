use super::{Position, Tile};
use crate::catalog::KindId;

/// Dense handle of a tile slot. Ids are reused after [`TileArena::free`],
/// so a handle is only meaningful while its tile is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub(crate) u32);

impl TileId {
    /// Slot index, usable as a key into dense side tables (view handles).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Slot storage for tiles with a LIFO free list. Freed slots are handed out
/// again by the next allocation, so long sessions do not grow the arena
/// beyond the board's high-water mark.
#[derive(Debug, Clone, Default)]
pub struct TileArena {
    slots: Vec<Option<Tile>>,
    free: Vec<u32>,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, kind: KindId, position: Position) -> TileId {
        match self.free.pop() {
            Some(slot) => {
                let id = TileId(slot);
                self.slots[slot as usize] = Some(Tile { id, kind, position });
                id
            }
            None => {
                let id = TileId(self.slots.len() as u32);
                self.slots.push(Some(Tile { id, kind, position }));
                id
            }
        }
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Returns the slot to the free list. Freeing a dead handle is a
    /// caller bug and panics.
    pub fn free(&mut self, id: TileId) {
        let slot = self
            .slots
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("tile id {id:?} out of arena range"));

        assert!(slot.take().is_some(), "tile {id:?} freed twice");
        self.free.push(id.0);
    }

    /// Number of live tiles.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Total slots ever allocated, live or free.
    pub fn high_water(&self) -> usize {
        self.slots.len()
    }
}
