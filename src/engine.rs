use rand::{SeedableRng, rngs::StdRng};

use crate::{
    board::{Board, Bounds, Position, Tile, TileId},
    cascade::{refill, resolve},
    catalog::Catalog,
    matching::{MatchFrame, find_match_at, find_match_near},
    moves::{NoPossibleMove, find_possible_move},
    record::MatchRecord,
};

/// Outcome of a swap request.
#[derive(Debug)]
pub enum SwapOutcome {
    /// The swap completed no run; the board was restored to its pre-swap
    /// state. A legal move with no board effect; the caller replays a
    /// reverse visual swap.
    NoMatch,

    /// The swap matched. The record holds the removed, fallen, and spawned
    /// tiles of the first resolve step; further matches may remain on the
    /// board, drive them with [`Engine::cascade`].
    Matched(MatchRecord),
}

/// The board simulation: owns the grid, the kind catalog, and the seeded
/// generator shared by map creation and refill. Synchronous and
/// single-threaded; callers serialize board-mutating calls (at most one in
/// flight by contract).
pub struct Engine {
    board: Board,
    catalog: Catalog,
    rng: StdRng,
}

impl Engine {
    /// Builds and populates a `width` x `height` board centered at the
    /// origin. The fill avoids any initial three-in-a-row (best effort:
    /// with a degenerate catalog the impossible cells are kept and logged).
    /// A fixed seed reproduces the identical board and all later refills.
    pub fn new(catalog: Catalog, width: i32, height: i32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new(Bounds::centered(width, height));

        let rect = board.bounds().as_rect();
        let anomalies = refill(&mut board, &catalog, &mut rng, rect, None);
        if anomalies > 0 {
            log::warn!("{anomalies} cells could not avoid an initial match");
        }

        Self {
            board,
            catalog,
            rng,
        }
    }

    #[cfg(test)]
    fn from_parts(board: Board, catalog: Catalog, seed: u64) -> Self {
        Self {
            board,
            catalog,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Swaps two adjacent tiles. Adjacency and board membership are the
    /// input collaborator's contract; stale handles panic.
    pub fn swap(&mut self, a: TileId, b: TileId) -> SwapOutcome {
        self.board.swap_tiles(a, b);

        let pos_a = self.board.tile(a).position;
        let pos_b = self.board.tile(b).position;

        match find_match_near(&self.board, pos_a, pos_b) {
            Some(frame) => {
                log::trace!("swap {pos_b} <-> {pos_a} matched");
                let mut record = MatchRecord::new();
                resolve(
                    &mut self.board,
                    &self.catalog,
                    &mut self.rng,
                    &frame,
                    &mut record,
                );
                SwapOutcome::Matched(record)
            }
            None => {
                self.board.swap_tiles(a, b);
                SwapOutcome::NoMatch
            }
        }
    }

    /// Resolves every remaining match on the board into `record`, rescanning
    /// until none is left. A no-op on a match-free board.
    pub fn cascade(&mut self, record: &mut MatchRecord) {
        while let Some(frame) = self.find_any_match() {
            log::trace!("cascading {:?}", frame.positions);
            resolve(
                &mut self.board,
                &self.catalog,
                &mut self.rng,
                &frame,
                record,
            );
        }
    }

    fn find_any_match(&self) -> Option<MatchFrame> {
        self.board
            .occupied_positions()
            .into_iter()
            .find_map(|pos| find_match_at(&self.board, pos))
    }

    /// Searches for any swap that would produce a match. The `Err` case is
    /// the signal to [`reshuffle`](Engine::reshuffle).
    pub fn find_possible_move(&self) -> Result<(TileId, TileId), NoPossibleMove> {
        find_possible_move(&self.board)
    }

    /// Rebuilds the whole board with fresh tiles: the recovery from
    /// [`NoPossibleMove`]. Existing tile handles become stale; views rebind
    /// from [`tiles`](Engine::tiles).
    pub fn reshuffle(&mut self) {
        log::debug!("reshuffling {} tiles", self.board.len());

        for pos in self.board.occupied_positions() {
            let id = self.board.remove(pos).expect("scan visits occupied cells");
            self.board.release(id);
        }

        let rect = self.board.bounds().as_rect();
        let anomalies = refill(&mut self.board, &self.catalog, &mut self.rng, rect, None);
        if anomalies > 0 {
            log::warn!("{anomalies} cells could not avoid a match after reshuffle");
        }
    }

    /// Releases a drained record's matched tiles. Call once the rendering
    /// collaborator has consumed the record, before the next operation.
    pub fn clear_record(&mut self, record: &mut MatchRecord) {
        record.clear(&mut self.board);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.board.tiles()
    }

    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.board.get(pos)
    }

    pub fn tile(&self, id: TileId) -> &Tile {
        self.board.tile(id)
    }
}
