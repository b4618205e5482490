// In-memory cache over the store for hot league documents.
//
// Reads go through the cache and fall back to SQLite on a miss. Writes
// go to SQLite first, then update the cache. When the two disagree
// (another process wrote the database), `reconcile` adopts the stored
// version: last write wins.

use std::collections::HashMap;

use anyhow::Result;
use tracing::warn;

use crate::cards::LegendaryCard;
use crate::db::{Store, TeamRecord};

#[derive(Default)]
pub struct LeagueCache {
    teams: HashMap<String, TeamRecord>,
    cards: HashMap<String, LegendaryCard>,
}

impl LeagueCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------

    /// Read-through team lookup.
    pub fn team(&mut self, store: &Store, team_id: &str) -> Result<Option<&TeamRecord>> {
        if !self.teams.contains_key(team_id) {
            if let Some(team) = store.load_team(team_id)? {
                self.teams.insert(team_id.to_string(), team);
            }
        }
        Ok(self.teams.get(team_id))
    }

    /// Write-through team update. The store write happens first so the
    /// cache never holds a team the database lost.
    pub fn put_team(&mut self, store: &Store, team: TeamRecord) -> Result<()> {
        store.upsert_team(&team)?;
        self.teams.insert(team.id.clone(), team);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cards
    // ------------------------------------------------------------------

    /// Read-through card lookup.
    pub fn card(&mut self, store: &Store, card_id: &str) -> Result<Option<&LegendaryCard>> {
        if !self.cards.contains_key(card_id) {
            if let Some(card) = store.load_card(card_id)? {
                self.cards.insert(card_id.to_string(), card);
            }
        }
        Ok(self.cards.get(card_id))
    }

    /// Write-through card update.
    pub fn put_card(&mut self, store: &Store, card: LegendaryCard) -> Result<()> {
        store.save_card(&card)?;
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Refresh the cached copy of a card that was already persisted by a
    /// store-side transition (activate, reveal, ...).
    pub fn note_card(&mut self, card: LegendaryCard) {
        self.cards.insert(card.id.clone(), card);
    }

    /// Drop a card from the cache after a store-side delete.
    pub fn forget_card(&mut self, card_id: &str) {
        self.cards.remove(card_id);
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Compare every cached entry against the store and adopt the stored
    /// version wherever they differ. Entries the store no longer has are
    /// evicted. Returns the number of corrected entries.
    pub fn reconcile(&mut self, store: &Store) -> Result<usize> {
        let mut corrected = 0;

        let team_ids: Vec<String> = self.teams.keys().cloned().collect();
        for id in team_ids {
            match store.load_team(&id)? {
                Some(stored) => {
                    if !same_doc(&self.teams[&id], &stored) {
                        warn!(team_id = %id, "cached team diverged from store, adopting stored version");
                        self.teams.insert(id, stored);
                        corrected += 1;
                    }
                }
                None => {
                    warn!(team_id = %id, "cached team no longer in store, evicting");
                    self.teams.remove(&id);
                    corrected += 1;
                }
            }
        }

        let card_ids: Vec<String> = self.cards.keys().cloned().collect();
        for id in card_ids {
            match store.load_card(&id)? {
                Some(stored) => {
                    if !same_doc(&self.cards[&id], &stored) {
                        warn!(card_id = %id, "cached card diverged from store, adopting stored version");
                        self.cards.insert(id, stored);
                        corrected += 1;
                    }
                }
                None => {
                    warn!(card_id = %id, "cached card no longer in store, evicting");
                    self.cards.remove(&id);
                    corrected += 1;
                }
            }
        }

        Ok(corrected)
    }

    /// Drop everything. The next reads repopulate from the store.
    pub fn clear(&mut self) {
        self.teams.clear();
        self.cards.clear();
    }
}

/// Document equality via the serialized form, which is what the store
/// actually persists.
fn same_doc<T: serde::Serialize>(a: &T, b: &T) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
