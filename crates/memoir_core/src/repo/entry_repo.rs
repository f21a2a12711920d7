//! Entry store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed-by-`(user, date)` store used by the journal service.
//! - Keep SQL and JSON column encoding inside the persistence boundary.
//!
//! # Invariants
//! - Writes call `Entry::validate()` before touching SQL.
//! - Saving an entry for a date that already has one replaces its fields
//!   (upsert); the stored row id and `created_at` are kept.
//! - Reads are owner-filtered and ordered by `date DESC`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::entry::{
    parse_date_key, Entry, EntryId, EntryValidationError, VoiceNote, DATE_FORMAT,
};
use crate::model::mood::Mood;
use crate::model::photo::Photo;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    date,
    title,
    caption,
    photos,
    mood,
    hashtags,
    song_url,
    voice_note,
    created_at
FROM entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "entry store is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing one user's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    pub user_id: String,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl EntryListQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Entry store contract.
pub trait EntryRepository {
    /// Inserts or replaces the entry for `(entry.user_id, entry.date)` and
    /// returns the stored row id.
    fn upsert_entry(&self, entry: &Entry) -> RepoResult<EntryId>;
    fn get_entry(&self, user_id: &str, id: EntryId) -> RepoResult<Option<Entry>>;
    fn get_entry_by_date(&self, user_id: &str, date: NaiveDate) -> RepoResult<Option<Entry>>;
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>>;
    /// Deletes an entry owned by `user_id`.
    fn delete_entry(&self, user_id: &str, id: EntryId) -> RepoResult<()>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "entries")? {
            return Err(RepoError::MissingRequiredTable("entries"));
        }
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn upsert_entry(&self, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;

        let photos = encode_json(&entry.photos, "photos")?;
        let hashtags = encode_json(&entry.hashtags, "hashtags")?;
        let voice_note = entry
            .voice_note
            .as_ref()
            .map(|note| encode_json(note, "voice_note"))
            .transpose()?;

        let stored_id: String = self.conn.query_row(
            "INSERT INTO entries (
                id,
                user_id,
                date,
                title,
                caption,
                photos,
                mood,
                hashtags,
                song_url,
                voice_note,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT (user_id, date) DO UPDATE SET
                title = excluded.title,
                caption = excluded.caption,
                photos = excluded.photos,
                mood = excluded.mood,
                hashtags = excluded.hashtags,
                song_url = excluded.song_url,
                voice_note = excluded.voice_note,
                updated_at = (strftime('%s', 'now') * 1000)
            RETURNING id;",
            params![
                entry.id.to_string(),
                entry.user_id.as_str(),
                entry.date_key(),
                entry.title.as_str(),
                entry.caption.as_str(),
                photos,
                entry.mood.as_str(),
                hashtags,
                entry.song_url.as_deref(),
                voice_note,
                entry.created_at,
            ],
            |row| row.get(0),
        )?;

        parse_uuid(&stored_id)
    }

    fn get_entry(&self, user_id: &str, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
               AND id = ?2;"
        ))?;
        let mut rows = stmt.query(params![user_id, id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn get_entry_by_date(&self, user_id: &str, date: NaiveDate) -> RepoResult<Option<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
               AND date = ?2;"
        ))?;
        let mut rows = stmt.query(params![user_id, date.format(DATE_FORMAT).to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.user_id.clone())];

        if let Some(from) = query.from {
            sql.push_str(" AND date >= ?");
            bind_values.push(Value::Text(from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = query.to {
            sql.push_str(" AND date <= ?");
            bind_values.push(Value::Text(to.format(DATE_FORMAT).to_string()));
        }

        sql.push_str(" ORDER BY date DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn delete_entry(&self, user_id: &str, id: EntryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM entries
             WHERE id = ?1
               AND user_id = ?2;",
            params![id.to_string(), user_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text)?;

    let date_text: String = row.get("date")?;
    let date = parse_date_key(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in entries.date"))
    })?;

    let mood_text: String = row.get("mood")?;
    let mood = Mood::parse(&mood_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid mood `{mood_text}` in entries.mood"))
    })?;

    let photos: Vec<Photo> = decode_json(&row.get::<_, String>("photos")?, "photos")?;
    let hashtags: Vec<String> = decode_json(&row.get::<_, String>("hashtags")?, "hashtags")?;
    let voice_note: Option<VoiceNote> = match row.get::<_, Option<String>>("voice_note")? {
        Some(text) => Some(decode_json(&text, "voice_note")?),
        None => None,
    };

    let entry = Entry {
        id,
        user_id: row.get("user_id")?,
        date,
        title: row.get("title")?,
        caption: row.get("caption")?,
        photos,
        mood,
        hashtags,
        song_url: row.get("song_url")?,
        voice_note,
        created_at: row.get("created_at")?,
    };
    entry.validate()?;
    Ok(entry)
}

fn parse_uuid(value: &str) -> RepoResult<EntryId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in entries.id")))
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T, column: &str) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode entries.{column}: {err}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(text: &str, column: &str) -> RepoResult<T> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("invalid json in entries.{column}: {err}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
