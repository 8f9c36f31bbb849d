// SQLite persistence layer for league seasons and round sets.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{ensure, Context, Result};
use chrono::{Days, NaiveDate};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::schedule::model::{Bye, Game, GameId, PlayerId, Week, WeekStatus};

/// SQLite-backed persistence for players, seasons, weeks, and the games
/// and byes that make up each week's round set.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
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
            CREATE TABLE IF NOT EXISTS players (
                id   INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS seasons (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                start_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS weeks (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                season_id     INTEGER NOT NULL REFERENCES seasons(id),
                week_number   INTEGER NOT NULL,
                scheduled_for TEXT NOT NULL,
                status        TEXT NOT NULL DEFAULT 'draft',
                UNIQUE(season_id, week_number)
            );

            CREATE TABLE IF NOT EXISTS games (
                id            INTEGER PRIMARY KEY,
                week_id       INTEGER NOT NULL REFERENCES weeks(id),
                round_number  INTEGER NOT NULL,
                court_number  INTEGER NOT NULL,
                team1_player1 INTEGER NOT NULL REFERENCES players(id),
                team1_player2 INTEGER NOT NULL REFERENCES players(id),
                team2_player1 INTEGER NOT NULL REFERENCES players(id),
                team2_player2 INTEGER NOT NULL REFERENCES players(id),
                team1_score   INTEGER,
                team2_score   INTEGER,
                UNIQUE(week_id, round_number, court_number)
            );

            CREATE TABLE IF NOT EXISTS byes (
                week_id      INTEGER NOT NULL REFERENCES weeks(id),
                round_number INTEGER NOT NULL,
                player_id    INTEGER NOT NULL REFERENCES players(id),
                PRIMARY KEY (week_id, round_number, player_id)
            );

            CREATE TABLE IF NOT EXISTS roundset_snapshots (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                week_id    INTEGER NOT NULL REFERENCES weeks(id),
                created_at TEXT NOT NULL,
                payload    TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        // Migration: rebuild pre-court databases where games carried no
        // court assignment.
        Self::migrate_games_add_court_number(&conn)?;

        // Snapshots are fetched newest-first per week. The table is keyed
        // by id alone, so week_id lookups need their own index.
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_snapshots_week_id ON roundset_snapshots(week_id);",
        )
        .context("failed to create snapshot index")?;

        info!("opened league database at {path}");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Migrate the `games` table from the old schema (no court assignment)
    /// to the new schema with a `court_number` column and the
    /// (week_id, round_number, court_number) uniqueness constraint.
    ///
    /// This is a no-op if the table already has the `court_number` column
    /// (new schema or previously migrated). For legacy databases it rebuilds
    /// the table using SQLite's rename-create-copy-drop pattern, since the
    /// new column participates in a UNIQUE constraint that ALTER TABLE
    /// ADD COLUMN cannot create. Legacy games are assigned courts in
    /// insertion order within their round.
    fn migrate_games_add_court_number(conn: &Connection) -> Result<()> {
        // Check if court_number column already exists
        let has_court_number: bool = conn
            .prepare("SELECT court_number FROM games LIMIT 0")
            .is_ok();

        if has_court_number {
            return Ok(()); // Already migrated or new schema
        }

        info!("adding court numbers to legacy games table");

        conn.execute_batch(
            "
            ALTER TABLE games RENAME TO games_old;

            CREATE TABLE games (
                id            INTEGER PRIMARY KEY,
                week_id       INTEGER NOT NULL REFERENCES weeks(id),
                round_number  INTEGER NOT NULL,
                court_number  INTEGER NOT NULL,
                team1_player1 INTEGER NOT NULL REFERENCES players(id),
                team1_player2 INTEGER NOT NULL REFERENCES players(id),
                team2_player1 INTEGER NOT NULL REFERENCES players(id),
                team2_player2 INTEGER NOT NULL REFERENCES players(id),
                team1_score   INTEGER,
                team2_score   INTEGER,
                UNIQUE(week_id, round_number, court_number)
            );

            INSERT INTO games (id, week_id, round_number, court_number,
                               team1_player1, team1_player2, team2_player1, team2_player2,
                               team1_score, team2_score)
                SELECT id, week_id, round_number,
                       ROW_NUMBER() OVER (PARTITION BY week_id, round_number ORDER BY id),
                       team1_player1, team1_player2, team2_player1, team2_player2,
                       team1_score, team2_score
                FROM games_old;

            DROP TABLE games_old;
            ",
        )
        .context("failed to migrate games table for court numbers")?;

        Ok(())
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Decode a game row in the canonical column order.
    fn game_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Game> {
        Ok(Game {
            id: row.get(0)?,
            week_id: row.get(1)?,
            round_number: row.get(2)?,
            court_number: row.get(3)?,
            team1_player1: row.get(4)?,
            team1_player2: row.get(5)?,
            team2_player1: row.get(6)?,
            team2_player2: row.get(7)?,
            team1_score: row.get(8)?,
            team2_score: row.get(9)?,
        })
    }

    /// Decode a week row's text columns into model types.
    fn week_from_parts(
        id: i64,
        season_id: i64,
        week_number: u32,
        scheduled_for: &str,
        status: &str,
    ) -> Result<Week> {
        let scheduled_for = NaiveDate::parse_from_str(scheduled_for, "%Y-%m-%d")
            .with_context(|| format!("week {id} has an invalid scheduled_for date"))?;
        let status = WeekStatus::from_db_str(status)
            .with_context(|| format!("week {id} has an unknown status"))?;
        Ok(Week {
            id,
            season_id,
            week_number,
            scheduled_for,
            status,
        })
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Insert a player, or return the existing row id if the name is
    /// already registered. A single atomic statement, so re-importing a
    /// roster never creates duplicate players.
    pub fn add_player(&self, name: &str) -> Result<PlayerId> {
        let conn = self.conn();
        let id: PlayerId = conn
            .query_row(
                "INSERT INTO players (name) VALUES (?1)
                 ON CONFLICT(name) DO UPDATE SET name = excluded.name
                 RETURNING id",
                params![name],
                |row| row.get(0),
            )
            .context("failed to add player")?;
        Ok(id)
    }

    /// Map every registered player's id to their display name.
    pub fn player_names(&self) -> Result<HashMap<PlayerId, String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name FROM players")
            .context("failed to prepare player_names query")?;

        let names = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .context("failed to query players")?
            .collect::<std::result::Result<HashMap<_, _>, _>>()
            .context("failed to map player rows")?;

        Ok(names)
    }

    // ------------------------------------------------------------------
    // Seasons and weeks
    // ------------------------------------------------------------------

    /// Create a season and its schedule skeleton: one draft week per week
    /// number, played on a seven-day cadence from `start_date`. Returns
    /// the season's row id.
    pub fn create_season(&self, name: &str, start_date: NaiveDate, weeks: u32) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin season transaction")?;

        tx.execute(
            "INSERT INTO seasons (name, start_date) VALUES (?1, ?2)",
            params![name, start_date.to_string()],
        )
        .context("failed to insert season")?;
        let season_id = tx.last_insert_rowid();

        for week_number in 1..=weeks {
            let scheduled_for = start_date
                .checked_add_days(Days::new(7 * (week_number as u64 - 1)))
                .context("week date out of calendar range")?;
            tx.execute(
                "INSERT INTO weeks (season_id, week_number, scheduled_for, status)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    season_id,
                    week_number,
                    scheduled_for.to_string(),
                    WeekStatus::Draft.as_db_str(),
                ],
            )
            .context("failed to insert week")?;
        }

        tx.commit().context("failed to commit season")?;
        Ok(season_id)
    }

    /// Load a season's weeks in week-number order.
    pub fn weeks_for_season(&self, season_id: i64) -> Result<Vec<Week>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, season_id, week_number, scheduled_for, status
                 FROM weeks WHERE season_id = ?1 ORDER BY week_number",
            )
            .context("failed to prepare weeks_for_season query")?;

        let rows = stmt
            .query_map(params![season_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .context("failed to query weeks")?;

        let mut weeks = Vec::new();
        for row in rows {
            let (id, season_id, week_number, scheduled_for, status) =
                row.context("failed to read week row")?;
            weeks.push(Self::week_from_parts(
                id,
                season_id,
                week_number,
                &scheduled_for,
                &status,
            )?);
        }
        Ok(weeks)
    }

    /// Load a single week by id. Returns `None` if the id is unknown.
    pub fn week(&self, week_id: i64) -> Result<Option<Week>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, season_id, week_number, scheduled_for, status
                 FROM weeks WHERE id = ?1",
            )
            .context("failed to prepare week query")?;

        let mut rows = stmt
            .query_map(params![week_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .context("failed to query week")?;

        match rows.next() {
            Some(row) => {
                let (id, season_id, week_number, scheduled_for, status) =
                    row.context("failed to read week row")?;
                Ok(Some(Self::week_from_parts(
                    id,
                    season_id,
                    week_number,
                    &scheduled_for,
                    &status,
                )?))
            }
            None => Ok(None),
        }
    }

    /// Update a week's lifecycle status. Callers are expected to have run
    /// the gate checks first; this does not re-validate the transition.
    pub fn set_week_status(&self, week_id: i64, status: WeekStatus) -> Result<()> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE weeks SET status = ?1 WHERE id = ?2",
                params![status.as_db_str(), week_id],
            )
            .context("failed to update week status")?;
        ensure!(updated == 1, "no week with id {week_id}");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Round sets
    // ------------------------------------------------------------------

    /// Load a week's full round set of games, ordered by round then court.
    pub fn games_for_week(&self, week_id: i64) -> Result<Vec<Game>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, week_id, round_number, court_number,
                        team1_player1, team1_player2, team2_player1, team2_player2,
                        team1_score, team2_score
                 FROM games WHERE week_id = ?1
                 ORDER BY round_number, court_number",
            )
            .context("failed to prepare games_for_week query")?;

        let games = stmt
            .query_map(params![week_id], Self::game_from_row)
            .context("failed to query games")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map game rows")?;

        Ok(games)
    }

    /// Load a week's bye entries, ordered by round then player.
    pub fn byes_for_week(&self, week_id: i64) -> Result<Vec<Bye>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT player_id, round_number FROM byes
                 WHERE week_id = ?1 ORDER BY round_number, player_id",
            )
            .context("failed to prepare byes_for_week query")?;

        let byes = stmt
            .query_map(params![week_id], |row| {
                Ok(Bye {
                    player_id: row.get(0)?,
                    round_number: row.get(1)?,
                })
            })
            .context("failed to query byes")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map bye rows")?;

        Ok(byes)
    }

    /// Replace a week's entire round set in one transaction. Games are
    /// stored under the ids they carry, so position locators and snapshots
    /// stay valid across rewrites; swap results are written back through
    /// this.
    pub fn replace_round_set(&self, week_id: i64, games: &[Game], byes: &[Bye]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin round set transaction")?;

        tx.execute("DELETE FROM games WHERE week_id = ?1", params![week_id])
            .context("failed to delete games")?;
        tx.execute("DELETE FROM byes WHERE week_id = ?1", params![week_id])
            .context("failed to delete byes")?;

        for game in games {
            ensure!(
                game.week_id == week_id,
                "game {} belongs to week {}, not week {week_id}",
                game.id,
                game.week_id
            );
            tx.execute(
                "INSERT INTO games
                    (id, week_id, round_number, court_number,
                     team1_player1, team1_player2, team2_player1, team2_player2,
                     team1_score, team2_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    game.id,
                    game.week_id,
                    game.round_number,
                    game.court_number,
                    game.team1_player1,
                    game.team1_player2,
                    game.team2_player1,
                    game.team2_player2,
                    game.team1_score,
                    game.team2_score,
                ],
            )
            .context("failed to insert game")?;
        }

        for bye in byes {
            tx.execute(
                "INSERT INTO byes (week_id, round_number, player_id) VALUES (?1, ?2, ?3)",
                params![week_id, bye.round_number, bye.player_id],
            )
            .context("failed to insert bye")?;
        }

        tx.commit().context("failed to commit round set")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scores
    // ------------------------------------------------------------------

    /// Record both team scores for a game. Scores must be non-negative;
    /// both sides are always written together so a game is never left
    /// half-scored.
    pub fn record_score(&self, game_id: GameId, team1_score: i32, team2_score: i32) -> Result<()> {
        ensure!(
            team1_score >= 0 && team2_score >= 0,
            "scores cannot be negative"
        );
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE games SET team1_score = ?1, team2_score = ?2 WHERE id = ?3",
                params![team1_score, team2_score, game_id],
            )
            .context("failed to record score")?;
        ensure!(updated == 1, "no game with id {game_id}");
        Ok(())
    }

    /// Clear both scores for a game, returning it to unscored. Used when a
    /// finalized week is reopened for schedule repairs.
    pub fn clear_scores(&self, game_id: GameId) -> Result<()> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE games SET team1_score = NULL, team2_score = NULL WHERE id = ?1",
                params![game_id],
            )
            .context("failed to clear scores")?;
        ensure!(updated == 1, "no game with id {game_id}");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Standings input
    // ------------------------------------------------------------------

    /// Every fully scored game in a season, in week then round then court
    /// order. Games missing either score are excluded; this is the input
    /// to standings aggregation.
    pub fn scored_games_for_season(&self, season_id: i64) -> Result<Vec<Game>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT g.id, g.week_id, g.round_number, g.court_number,
                        g.team1_player1, g.team1_player2, g.team2_player1, g.team2_player2,
                        g.team1_score, g.team2_score
                 FROM games g
                 JOIN weeks w ON w.id = g.week_id
                 WHERE w.season_id = ?1
                   AND g.team1_score IS NOT NULL
                   AND g.team2_score IS NOT NULL
                 ORDER BY w.week_number, g.round_number, g.court_number",
            )
            .context("failed to prepare scored_games_for_season query")?;

        let games = stmt
            .query_map(params![season_id], Self::game_from_row)
            .context("failed to query scored games")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map scored game rows")?;

        Ok(games)
    }

    // ------------------------------------------------------------------
    // Round set snapshots
    // ------------------------------------------------------------------

    /// Store a snapshot of a week's round set with an RFC 3339 timestamp.
    /// Taken before a manual repair pass so the previous arrangement can
    /// be restored.
    pub fn save_round_set_snapshot(
        &self,
        week_id: i64,
        games: &[Game],
        byes: &[Bye],
    ) -> Result<()> {
        let conn = self.conn();
        let payload = RoundSetPayload {
            games: games.to_vec(),
            byes: byes.to_vec(),
        };
        let payload_json =
            serde_json::to_string(&payload).context("failed to serialize round set snapshot")?;
        conn.execute(
            "INSERT INTO roundset_snapshots (week_id, created_at, payload) VALUES (?1, ?2, ?3)",
            params![week_id, chrono::Utc::now().to_rfc3339(), payload_json],
        )
        .context("failed to save round set snapshot")?;
        Ok(())
    }

    /// Load the most recent snapshot for a week. Returns `None` when the
    /// week has never been snapshotted.
    pub fn latest_round_set_snapshot(
        &self,
        week_id: i64,
    ) -> Result<Option<(Vec<Game>, Vec<Bye>)>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT payload FROM roundset_snapshots
                 WHERE week_id = ?1 ORDER BY id DESC LIMIT 1",
            )
            .context("failed to prepare snapshot query")?;

        let mut rows = stmt
            .query_map(params![week_id], |row| row.get::<_, String>(0))
            .context("failed to query snapshots")?;

        match rows.next() {
            Some(row) => {
                let payload_json = row.context("failed to read snapshot row")?;
                let payload: RoundSetPayload = serde_json::from_str(&payload_json)
                    .context("failed to deserialize round set snapshot")?;
                Ok(Some((payload.games, payload.byes)))
            }
            None => Ok(None),
        }
    }
}

/// Serialized form of a week's round set. Stored as a JSON payload so a
/// bad repair pass can be rolled back wholesale.
#[derive(Serialize, Deserialize)]
struct RoundSetPayload {
    games: Vec<Game>,
    byes: Vec<Bye>,
}
