//! Detail storage operations (CRUD and search)

use crate::detail::{Area, Detail, DetailInput};
use crate::storage::db::DatabaseError;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};

/// Detail storage operations
pub struct DetailStore<'a> {
    conn: &'a Connection,
}

type RawRow = (i64, String, Option<String>, Value, Option<String>);

impl<'a> DetailStore<'a> {
    /// Create a new detail store
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List details whose name contains `filter`, in insertion order
    ///
    /// Matching is ASCII case-insensitive. `%` and `_` match literally.
    /// An empty filter lists everything.
    ///
    /// # Errors
    /// Returns an error if the details cannot be listed
    pub fn list(&self, filter: &str) -> Result<Vec<Detail>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, name, description, area, image_path
            FROM details
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY id
            ",
        )?;

        let rows = stmt.query_map(params![like_pattern(filter)], raw_row)?;

        let mut details = Vec::new();
        for row in rows {
            details.push(into_detail(row?)?);
        }

        log::debug!("listed {} details for filter {filter:?}", details.len());
        Ok(details)
    }

    /// Get a detail by ID
    ///
    /// # Errors
    /// Returns `NotFound` if no detail has this ID
    pub fn get(&self, id: i64) -> Result<Detail, DatabaseError> {
        let raw = self
            .conn
            .query_row(
                r"
                SELECT id, name, description, area, image_path
                FROM details WHERE id = ?1
                ",
                params![id],
                raw_row,
            )
            .optional()?
            .ok_or(DatabaseError::NotFound(id))?;

        into_detail(raw)
    }

    /// Insert a new detail and return its ID
    ///
    /// # Errors
    /// Returns an error if the detail cannot be created
    pub fn create(&self, input: &DetailInput) -> Result<i64, DatabaseError> {
        self.conn.execute(
            r"
            INSERT INTO details (name, description, area, image_path)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                input.name(),
                input.description(),
                input.area().value(),
                input.image_path(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        log::info!("created detail {id} ({})", input.name());
        Ok(id)
    }

    /// Replace every field of an existing detail
    ///
    /// # Errors
    /// Returns `NotFound` if no detail has this ID
    pub fn update(&self, id: i64, input: &DetailInput) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            r"
            UPDATE details SET
                name = ?1,
                description = ?2,
                area = ?3,
                image_path = ?4
            WHERE id = ?5
            ",
            params![
                input.name(),
                input.description(),
                input.area().value(),
                input.image_path(),
                id,
            ],
        )?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(id));
        }

        log::info!("updated detail {id}");
        Ok(())
    }

    /// Delete a detail row (does not delete the image file)
    ///
    /// # Errors
    /// Returns `NotFound` if no detail has this ID
    pub fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM details WHERE id = ?1", params![id])?;

        if deleted == 0 {
            return Err(DatabaseError::NotFound(id));
        }

        log::info!("deleted detail {id}");
        Ok(())
    }

    /// Number of stored details
    ///
    /// # Errors
    /// Returns an error if the count query fails
    pub fn count(&self) -> Result<u64, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM details", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }

    /// Number of details pointing at `image_path`
    ///
    /// # Errors
    /// Returns an error if the count query fails
    pub fn count_image_references(&self, image_path: &str) -> Result<u64, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM details WHERE image_path = ?1",
            params![image_path],
            |row| row.get(0),
        )?;
        Ok(count.unsigned_abs())
    }
}

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn into_detail(raw: RawRow) -> Result<Detail, DatabaseError> {
    let (id, name, description, area, image_path) = raw;
    Ok(Detail {
        id,
        name,
        description: description.filter(|d| !d.is_empty()),
        area: read_area(id, area)?,
        image_path: image_path.unwrap_or_default(),
    })
}

/// Older files store the area as text, newer ones as REAL
#[allow(clippy::cast_precision_loss)]
fn read_area(id: i64, value: Value) -> Result<Area, DatabaseError> {
    let number = match value {
        Value::Real(v) => v,
        Value::Integer(v) => v as f64,
        Value::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            DatabaseError::InvalidRow(format!("detail {id} has non-numeric area {text:?}"))
        })?,
        Value::Null | Value::Blob(_) => {
            return Err(DatabaseError::InvalidRow(format!(
                "detail {id} has no area"
            )))
        }
    };

    let area = Area::from_stored(number).ok_or_else(|| {
        DatabaseError::InvalidRow(format!("detail {id} has non-finite area {number}"))
    })?;
    if !(Area::MIN..=Area::MAX).contains(&area.value()) {
        log::warn!("detail {id} has out-of-range area {area}");
    }
    Ok(area)
}

fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
