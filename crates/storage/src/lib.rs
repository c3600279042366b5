use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{TeamId, TeamRef, User, UserId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_user(&self, name: &str) -> Result<UserId> {
        let rec = sqlx::query("INSERT INTO users (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(UserId(rec.get::<i64, _>(0)))
    }

    pub async fn create_team(
        &self,
        name: &str,
        idea: &str,
        suggestions: &str,
        tracks: &str,
    ) -> Result<TeamId> {
        let rec = sqlx::query(
            "INSERT INTO teams (name, idea, suggestions, tracks, is_selected)
             VALUES (?, ?, ?, ?, 0) RETURNING id",
        )
        .bind(name)
        .bind(idea)
        .bind(suggestions)
        .bind(tracks)
        .fetch_one(&self.pool)
        .await?;
        Ok(TeamId(rec.get::<i64, _>(0)))
    }

    pub async fn add_membership(&self, user_id: UserId, team_id: TeamId) -> Result<()> {
        sqlx::query(
            "INSERT INTO team_memberships (user_id, team_id) VALUES (?, ?)
             ON CONFLICT(user_id, team_id) DO NOTHING",
        )
        .bind(user_id.0)
        .bind(team_id.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Full roster in user insertion order, with each user's team
    /// associations embedded in membership insertion order. Users with no
    /// membership come back with an empty association list; the HTTP layer
    /// decides how to represent them on the wire.
    pub async fn list_roster(&self) -> Result<Vec<User>> {
        let user_rows = sqlx::query("SELECT id, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut roster = Vec::with_capacity(user_rows.len());
        for user_row in user_rows {
            let user_id = UserId(user_row.get::<i64, _>(0));
            let association_rows = sqlx::query(
                "SELECT t.id, t.name, t.idea, t.suggestions, t.tracks, t.is_selected
                 FROM team_memberships m JOIN teams t ON t.id = m.team_id
                 WHERE m.user_id = ?
                 ORDER BY m.rowid",
            )
            .bind(user_id.0)
            .fetch_all(&self.pool)
            .await?;

            let team_associations = association_rows
                .into_iter()
                .map(|row| TeamRef {
                    id: Some(TeamId(row.get::<i64, _>(0))),
                    name: row.get::<String, _>(1),
                    idea: row.get::<String, _>(2),
                    suggestions: row.get::<String, _>(3),
                    tracks: row.get::<String, _>(4),
                    is_selected: row.get::<bool, _>(5),
                })
                .collect();

            roster.push(User {
                id: user_id,
                name: user_row.get::<String, _>(1),
                team_associations,
            });
        }

        Ok(roster)
    }

    /// Flips one team's selection flag. Returns false when no team with
    /// that id exists so the caller can report it on the explicit failure
    /// channel instead of claiming success.
    pub async fn set_team_selected(&self, team_id: TeamId, is_selected: bool) -> Result<bool> {
        let affected = sqlx::query("UPDATE teams SET is_selected = ? WHERE id = ?")
            .bind(is_selected)
            .bind(team_id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn team_is_selected(&self, team_id: TeamId) -> Result<Option<bool>> {
        let row = sqlx::query("SELECT is_selected FROM teams WHERE id = ?")
            .bind(team_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<bool, _>(0)))
    }

    pub async fn user_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
