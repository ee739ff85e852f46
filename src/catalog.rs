use std::fmt;

use thiserror::Error;

/// Dense index of a kind within its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindId(pub u8);

/// Immutable description of a tile category: its string id and whether it
/// counts as a bonus tile (reserved, never consulted by matching).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileKind {
    id: String,
    is_bonus: bool,
}

impl TileKind {
    pub fn new(id: impl Into<String>, is_bonus: bool) -> Self {
        Self {
            id: id.into(),
            is_bonus,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_bonus(&self) -> bool {
        self.is_bonus
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one kind")]
    Empty,

    #[error("duplicate kind id {0:?}")]
    DuplicateId(String),
}

/// Fixed, ordered registry of tile kinds. Built once at startup and passed
/// by reference into everything that needs to name or spawn kinds.
#[derive(Debug, Clone)]
pub struct Catalog {
    kinds: Vec<TileKind>,
}

impl Catalog {
    pub fn new(kinds: Vec<TileKind>) -> Result<Self, CatalogError> {
        if kinds.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (i, kind) in kinds.iter().enumerate() {
            if kinds[..i].iter().any(|other| other.id == kind.id) {
                return Err(CatalogError::DuplicateId(kind.id.clone()));
            }
        }

        Ok(Self { kinds })
    }

    /// The stock four-kind catalog.
    pub fn classic() -> Self {
        Self::new(vec![
            TileKind::new("Tile.Circle", false),
            TileKind::new("Tile.Triangle", false),
            TileKind::new("Tile.Square", false),
            TileKind::new("Tile.Hexagon", false),
        ])
        .expect("stock catalog is valid")
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kind(&self, id: KindId) -> &TileKind {
        &self.kinds[id.0 as usize]
    }

    pub fn ids(&self) -> impl Iterator<Item = KindId> {
        (0..self.kinds.len() as u8).map(KindId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KindId, &TileKind)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| (KindId(i as u8), kind))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classic_has_four_unique_kinds() {
        let catalog = Catalog::classic();
        assert_eq!(catalog.len(), 4);

        let ids: Vec<_> = catalog.iter().map(|(_, kind)| kind.id()).collect();
        for (i, id) in ids.iter().enumerate() {
            assert!(!ids[..i].contains(id), "duplicate id {id}");
        }
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![
            TileKind::new("Tile.Circle", false),
            TileKind::new("Tile.Circle", true),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn kind_lookup_follows_insertion_order() {
        let catalog = Catalog::classic();
        assert_eq!(catalog.kind(KindId(0)).id(), "Tile.Circle");
        assert_eq!(catalog.kind(KindId(3)).id(), "Tile.Hexagon");
        assert!(!catalog.kind(KindId(3)).is_bonus());
    }
}
