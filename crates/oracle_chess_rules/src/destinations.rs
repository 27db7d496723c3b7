//! Origin → legal destination index for the side to move.

use crate::rules::RulesEngine;
use crate::types::Square;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Legal destinations keyed by origin square.
///
/// A square is a key only if at least one legal move starts there.
/// Destination sets carry no ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationMap {
    entries: HashMap<Square, HashSet<Square>>,
}

impl DestinationMap {
    /// Destinations reachable from `origin`.
    pub fn destinations(&self, origin: Square) -> Option<&HashSet<Square>> {
        self.entries.get(&origin)
    }

    /// Returns true if a piece on `origin` may move.
    pub fn contains_origin(&self, origin: Square) -> bool {
        self.entries.contains_key(&origin)
    }

    /// Returns true if `origin → destination` is a legal move.
    pub fn contains(&self, origin: Square, destination: Square) -> bool {
        self.entries
            .get(&origin)
            .is_some_and(|targets| targets.contains(&destination))
    }

    /// Origins with at least one legal move.
    pub fn origins(&self) -> impl Iterator<Item = Square> + '_ {
        self.entries.keys().copied()
    }

    /// All entries.
    pub fn iter(&self) -> impl Iterator<Item = (Square, &HashSet<Square>)> + '_ {
        self.entries.iter().map(|(origin, targets)| (*origin, targets))
    }

    /// Number of movable origins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the side to move has no legal move.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of origin/destination pairs.
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }
}

impl FromIterator<(Square, Square)> for DestinationMap {
    fn from_iter<I: IntoIterator<Item = (Square, Square)>>(pairs: I) -> Self {
        let mut entries: HashMap<Square, HashSet<Square>> = HashMap::new();
        for (origin, destination) in pairs {
            entries.entry(origin).or_default().insert(destination);
        }
        Self { entries }
    }
}

/// Builds [`DestinationMap`]s from positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationIndex;

impl DestinationIndex {
    /// Computes the full destination map for the side to move.
    ///
    /// Pure function of the position; always rebuilt from scratch.
    #[instrument(skip_all)]
    pub fn recompute<R: RulesEngine>(rules: &R, position: &R::Position) -> DestinationMap {
        let entries: HashMap<Square, HashSet<Square>> = Square::all()
            .filter_map(|origin| {
                let targets: HashSet<Square> = rules
                    .legal_moves_from(position, origin)
                    .iter()
                    .map(|m| m.destination())
                    .collect();
                (!targets.is_empty()).then_some((origin, targets))
            })
            .collect();

        let map = DestinationMap { entries };
        debug!(origins = map.len(), pairs = map.pair_count(), "Destinations recomputed");
        map
    }
}
