// SQLite persistence layer for league state.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use rand::Rng;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::cards::{lifecycle, DistributionMechanic, LegendaryCard, PerformancePool, TeamStanding};
use crate::config::CardModifiers;
use crate::roster::Roster;
use crate::scoring::{team_week_score, ScoringRules};

/// A persisted fantasy team: identity, record, and full roster document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub id: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub roster: Roster,
}

impl TeamRecord {
    /// The team's scoreboard entry for a distribution week, given its
    /// computed starter total.
    pub fn standing(&self, score: f64) -> TeamStanding {
        TeamStanding {
            team_id: self.id.clone(),
            team_name: self.name.clone(),
            score,
        }
    }
}

/// The persisted league document: settings that belong to the league as a
/// whole rather than any one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueDoc {
    pub name: String,
    pub total_teams: usize,
    pub roster_settings: HashMap<String, usize>,
    pub scoring_settings: ScoringRules,
    pub card_settings: CardSettings,
}

/// Card-related league settings. The modifier toggles are persisted but
/// have no gameplay effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSettings {
    pub mechanic: DistributionMechanic,
    #[serde(flatten)]
    pub modifiers: CardModifiers,
}

/// SQLite-backed persistence for teams, legendary cards, and key-value
/// league state.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS teams (
                id     TEXT PRIMARY KEY,
                name   TEXT NOT NULL,
                wins   INTEGER NOT NULL DEFAULT 0,
                losses INTEGER NOT NULL DEFAULT 0,
                roster TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cards (
                id       TEXT PRIMARY KEY,
                team_id  TEXT NOT NULL REFERENCES teams(id),
                status   TEXT NOT NULL,
                position TEXT NOT NULL,
                doc      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS league_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        // The pending-card invariants are checked per team, so card lookups
        // filter by team before status.
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_cards_team_status ON cards(team_id, status);",
        )
        .context("failed to create cards index")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------

    /// Insert a team or overwrite its record if the id already exists.
    /// The roster is stored as a JSON document.
    pub fn upsert_team(&self, team: &TeamRecord) -> Result<()> {
        let conn = self.conn();
        let roster_json =
            serde_json::to_string(&team.roster).context("failed to serialize roster")?;
        conn.execute(
            "INSERT INTO teams (id, name, wins, losses, roster)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name   = excluded.name,
                wins   = excluded.wins,
                losses = excluded.losses,
                roster = excluded.roster",
            params![team.id, team.name, team.wins, team.losses, roster_json],
        )
        .context("failed to upsert team")?;
        Ok(())
    }

    /// Load a single team by id. Returns `None` if the team does not exist.
    pub fn load_team(&self, team_id: &str) -> Result<Option<TeamRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, wins, losses, roster FROM teams WHERE id = ?1")
            .context("failed to prepare load_team query")?;

        let mut rows = stmt
            .query_map(params![team_id], Self::team_from_row)
            .context("failed to query team")?;

        match rows.next() {
            Some(row) => Ok(Some(row.context("failed to read team row")?)),
            None => Ok(None),
        }
    }

    /// Load all teams in insertion order. Pack distribution ranks by weekly
    /// score with ties broken by this order, so it must be stable.
    pub fn load_teams(&self) -> Result<Vec<TeamRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, wins, losses, roster FROM teams ORDER BY rowid")
            .context("failed to prepare load_teams query")?;

        let teams = stmt
            .query_map([], Self::team_from_row)
            .context("failed to query teams")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map team rows")?;

        Ok(teams)
    }

    /// Build the weekly scoreboard pack distribution ranks on: every
    /// team's starter total for the week, in insertion order.
    pub fn weekly_standings(&self, week: u32, rules: &ScoringRules) -> Result<Vec<TeamStanding>> {
        let teams = self.load_teams()?;
        let mut standings = Vec::with_capacity(teams.len());
        for team in &teams {
            let cards = self.load_team_cards(&team.id)?;
            let score = team_week_score(&team.roster, &cards, week, rules);
            standings.push(team.standing(score.total));
        }
        Ok(standings)
    }

    fn team_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeamRecord> {
        let roster_json: String = row.get(4)?;
        let roster = serde_json::from_str(&roster_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(TeamRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            wins: row.get(2)?,
            losses: row.get(3)?,
            roster,
        })
    }

    // ------------------------------------------------------------------
    // Cards
    // ------------------------------------------------------------------

    /// Insert or overwrite a card document. Status and position are
    /// mirrored into their own columns for invariant queries.
    pub fn save_card(&self, card: &LegendaryCard) -> Result<()> {
        let conn = self.conn();
        Self::write_card(&conn, card)
    }

    /// Persist a batch of freshly opened cards in a single transaction.
    pub fn record_issuance(&self, cards: &[LegendaryCard]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin issuance transaction")?;
        for card in cards {
            Self::write_card(&tx, card)?;
        }
        tx.commit().context("failed to commit issuance")?;
        Ok(())
    }

    /// Load a single card by id. Returns `None` if the card does not exist.
    pub fn load_card(&self, card_id: &str) -> Result<Option<LegendaryCard>> {
        let conn = self.conn();
        Self::card_by_id(&conn, card_id)
    }

    /// Load a team's full card collection in acquisition order.
    pub fn load_team_cards(&self, team_id: &str) -> Result<Vec<LegendaryCard>> {
        let conn = self.conn();
        Self::cards_for_team(&conn, team_id)
    }

    fn write_card(conn: &Connection, card: &LegendaryCard) -> Result<()> {
        let doc = serde_json::to_string(card).context("failed to serialize card")?;
        conn.execute(
            "INSERT OR REPLACE INTO cards (id, team_id, status, position, doc)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                card.id,
                card.team_id,
                card.status.to_string(),
                card.position.display_str(),
                doc,
            ],
        )
        .context("failed to write card")?;
        Ok(())
    }

    fn card_by_id(conn: &Connection, card_id: &str) -> Result<Option<LegendaryCard>> {
        let mut stmt = conn
            .prepare("SELECT doc FROM cards WHERE id = ?1")
            .context("failed to prepare card query")?;

        let mut rows = stmt
            .query_map(params![card_id], |row| {
                let doc: String = row.get(0)?;
                Ok(doc)
            })
            .context("failed to query card")?;

        match rows.next() {
            Some(row) => {
                let doc = row.context("failed to read card row")?;
                let card =
                    serde_json::from_str(&doc).context("failed to deserialize card")?;
                Ok(Some(card))
            }
            None => Ok(None),
        }
    }

    fn cards_for_team(conn: &Connection, team_id: &str) -> Result<Vec<LegendaryCard>> {
        let mut stmt = conn
            .prepare("SELECT doc FROM cards WHERE team_id = ?1 ORDER BY rowid")
            .context("failed to prepare team cards query")?;

        let docs = stmt
            .query_map(params![team_id], |row| {
                let doc: String = row.get(0)?;
                Ok(doc)
            })
            .context("failed to query team cards")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map card rows")?;

        docs.iter()
            .map(|doc| serde_json::from_str(doc).context("failed to deserialize card"))
            .collect()
    }

    // ------------------------------------------------------------------
    // Card transitions
    // ------------------------------------------------------------------

    /// Activate a card onto a starter slot inside a transaction.
    ///
    /// The card and its team's collection are re-read under the
    /// transaction, so two concurrent activations for the same team
    /// serialize and the second one fails the pending-card check instead
    /// of both committing.
    pub fn activate_card(
        &self,
        card_id: &str,
        roster: &Roster,
        slot_id: &str,
        week: u32,
        now: DateTime<Local>,
        cutoff: DateTime<Local>,
    ) -> Result<LegendaryCard> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin activation transaction")?;

        let mut card = Self::card_by_id(&tx, card_id)?
            .ok_or_else(|| anyhow!("card not found: {card_id}"))?;
        let team_cards = Self::cards_for_team(&tx, &card.team_id)?;

        lifecycle::activate(&mut card, &team_cards, roster, slot_id, week, now, cutoff)?;

        Self::write_card(&tx, &card)?;
        tx.commit().context("failed to commit activation")?;
        Ok(card)
    }

    /// Return a pending card to unplayed inside a transaction.
    pub fn deactivate_card(
        &self,
        card_id: &str,
        now: DateTime<Local>,
        cutoff: DateTime<Local>,
    ) -> Result<LegendaryCard> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin deactivation transaction")?;

        let mut card = Self::card_by_id(&tx, card_id)?
            .ok_or_else(|| anyhow!("card not found: {card_id}"))?;

        lifecycle::deactivate(&mut card, now, cutoff)?;

        Self::write_card(&tx, &card)?;
        tx.commit().context("failed to commit deactivation")?;
        Ok(card)
    }

    /// Reveal a pending card inside a transaction. The drawn performance
    /// is frozen on the card before commit, so a crash either leaves the
    /// card pending or fully revealed, never half-revealed.
    pub fn reveal_card(
        &self,
        card_id: &str,
        pool: &PerformancePool,
        now: DateTime<Local>,
        cutoff: DateTime<Local>,
        rng: &mut impl Rng,
    ) -> Result<LegendaryCard> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin reveal transaction")?;

        let mut card = Self::card_by_id(&tx, card_id)?
            .ok_or_else(|| anyhow!("card not found: {card_id}"))?;

        lifecycle::reveal(&mut card, pool, now, cutoff, rng)?;

        Self::write_card(&tx, &card)?;
        tx.commit().context("failed to commit reveal")?;
        Ok(card)
    }

    /// Delete an unplayed card. Pending and played cards are refused.
    pub fn delete_card(&self, card_id: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin delete transaction")?;

        let card = Self::card_by_id(&tx, card_id)?
            .ok_or_else(|| anyhow!("card not found: {card_id}"))?;

        lifecycle::ensure_deletable(&card)?;

        tx.execute("DELETE FROM cards WHERE id = ?1", params![card_id])
            .context("failed to delete card")?;
        tx.commit().context("failed to commit delete")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // League state (key-value)
    // ------------------------------------------------------------------

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO league_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM league_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query league state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Key used in league_state for the persisted league document.
    const LEAGUE_KEY: &'static str = "league";

    /// Persist the league document (name, roster settings, scoring
    /// settings, card settings).
    pub fn save_league(&self, league: &LeagueDoc) -> Result<()> {
        let value =
            serde_json::to_value(league).context("failed to serialize league document")?;
        self.save_state(Self::LEAGUE_KEY, &value)
    }

    /// Load the league document, if one has been saved.
    pub fn load_league(&self) -> Result<Option<LeagueDoc>> {
        match self.load_state(Self::LEAGUE_KEY)? {
            Some(value) => Ok(Some(
                serde_json::from_value(value)
                    .context("failed to deserialize league document")?,
            )),
            None => Ok(None),
        }
    }

    /// The league's scoring rules: the persisted settings when a league
    /// document exists, the standard defaults otherwise.
    pub fn scoring_rules(&self) -> Result<ScoringRules> {
        Ok(self
            .load_league()?
            .map(|league| league.scoring_settings)
            .unwrap_or_else(ScoringRules::league_defaults))
    }

    /// Key used in league_state to record the last completed issuance week.
    const ISSUANCE_WEEK_KEY: &'static str = "last_issuance_week";

    /// Week of the most recent pack distribution, if one has run.
    pub fn last_issuance_week(&self) -> Result<Option<u32>> {
        let value = self.load_state(Self::ISSUANCE_WEEK_KEY)?;
        Ok(value.and_then(|v| v.as_u64().map(|w| w as u32)))
    }

    /// Record the week of a completed pack distribution.
    pub fn set_last_issuance_week(&self, week: u32) -> Result<()> {
        self.save_state(Self::ISSUANCE_WEEK_KEY, &serde_json::json!(week))
    }
}
