//! SQLite-backed label store.
//!
//! One database file per annotated directory holds a single `label` table:
//!
//! ```sql
//! CREATE TABLE label (
//!     img_name TEXT PRIMARY KEY,
//!     valid INTEGER NOT NULL,
//!     x1 INTEGER NOT NULL, y1 INTEGER NOT NULL,
//!     x2 INTEGER NOT NULL, y2 INTEGER NOT NULL,
//!     x3 INTEGER NOT NULL, y3 INTEGER NOT NULL,
//!     x4 INTEGER NOT NULL, y4 INTEGER NOT NULL,
//!     tsp INTEGER NOT NULL
//! );
//! ```
//!
//! This column layout is the on-disk contract; label files written by
//! earlier tools with the same table open unchanged. The connection runs in
//! autocommit mode, so every write is durable when the call returns.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};

use crate::error::{LabelError, Result};
use crate::model::{AnnotationRecord, Field, LabelUpdate, LabelView, Point, Quad};

/// Default database filename inside an annotated directory.
pub const DEFAULT_STORE_FILENAME: &str = "label.sqllite3";

/// Columns of the `label` table, in declaration order.
const COLUMNS: [&str; 11] = [
    "img_name", "valid", "x1", "y1", "x2", "y2", "x3", "y3", "x4", "y4", "tsp",
];

const CREATE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS label (
    img_name text PRIMARY KEY,
    valid INTEGER NOT NULL,
    x1 INTEGER NOT NULL,
    y1 INTEGER NOT NULL,
    x2 INTEGER NOT NULL,
    y2 INTEGER NOT NULL,
    x3 INTEGER NOT NULL,
    y3 INTEGER NOT NULL,
    x4 INTEGER NOT NULL,
    y4 INTEGER NOT NULL,
    tsp INTEGER NOT NULL
);";

const UPSERT_FULL: &str = r"
INSERT INTO label (img_name, valid, x1, y1, x2, y2, x3, y3, x4, y4, tsp)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
ON CONFLICT(img_name) DO UPDATE SET
    valid = excluded.valid,
    x1 = excluded.x1, y1 = excluded.y1,
    x2 = excluded.x2, y2 = excluded.y2,
    x3 = excluded.x3, y3 = excluded.y3,
    x4 = excluded.x4, y4 = excluded.y4,
    tsp = excluded.tsp;";

/// Record counts for a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    pub total: usize,
    pub valid: usize,
    pub voided: usize,
}

/// Durable per-image label records keyed by filename.
#[derive(Debug)]
pub struct LabelStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl LabelStore {
    /// Open (or create) the label database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        ensure_schema(&conn)?;
        log::info!("Opened label store {:?}", path);
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the default label database inside an image directory.
    pub fn open_in_dir(dir: impl AsRef<Path>, filename: &str) -> Result<Self> {
        Self::open(dir.as_ref().join(filename))
    }

    /// A throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the requested fields of one record.
    ///
    /// Returns `Ok(None)` when the image has no record yet.
    pub fn get(&self, image: &str, fields: &[Field]) -> Result<Option<LabelView>> {
        let mut wanted: Vec<Field> = Vec::with_capacity(fields.len());
        for field in fields {
            if !wanted.contains(field) {
                wanted.push(*field);
            }
        }

        let columns: Vec<&str> = if wanted.is_empty() {
            vec!["valid"]
        } else {
            wanted.iter().flat_map(|f| f.columns().iter().copied()).collect()
        };
        let sql = format!(
            "SELECT {} FROM label WHERE img_name = ?1",
            columns.join(",")
        );

        let Some(values) = self.select_integers(&sql, image, columns.len())? else {
            return Ok(None);
        };

        let mut view = LabelView::default();
        let mut idx = 0;
        for field in &wanted {
            match field {
                Field::Valid => {
                    view.valid = Some(values[idx] != 0);
                    idx += 1;
                }
                Field::Points => {
                    view.points = Some(quad_from_columns(&values[idx..idx + 8])?);
                    idx += 8;
                }
            }
        }
        Ok(Some(view))
    }

    /// Like [`LabelStore::get`], with field names checked at the boundary.
    pub fn get_named(&self, image: &str, names: &[&str]) -> Result<Option<LabelView>> {
        let fields = names
            .iter()
            .map(|name| name.parse::<Field>())
            .collect::<Result<Vec<_>>>()?;
        self.get(image, &fields)
    }

    /// Read a full record, including its modification time.
    pub fn get_record(&self, image: &str) -> Result<Option<AnnotationRecord>> {
        let sql = format!(
            "SELECT {} FROM label WHERE img_name = ?1",
            COLUMNS[1..].join(",")
        );
        let Some(values) = self.select_integers(&sql, image, COLUMNS.len() - 1)? else {
            return Ok(None);
        };
        Ok(Some(AnnotationRecord {
            valid: values[0] != 0,
            points: quad_from_columns(&values[1..9])?,
            modified_at: values[9],
        }))
    }

    /// Write the supplied fields of one record and refresh its timestamp.
    ///
    /// An empty update does nothing. A full update inserts the row or
    /// overwrites it. A partial update requires the row to exist already and
    /// fails with [`LabelError::IncompleteRecord`] otherwise.
    pub fn upsert(&self, image: &str, update: LabelUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let tsp = now_epoch();

        if let (Some(valid), Some(points)) = (update.valid, update.points) {
            let mut values = Vec::with_capacity(COLUMNS.len());
            values.push(Value::Text(image.to_string()));
            values.push(Value::Integer(valid as i64));
            values.extend(quad_to_columns(&points).map(Value::Integer));
            values.push(Value::Integer(tsp));

            self.conn
                .prepare_cached(UPSERT_FULL)?
                .execute(params_from_iter(values.iter()))?;
            log::debug!("Wrote label for {} (valid={})", image, valid);
            return Ok(());
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(valid) = update.valid {
            assignments.push("valid");
            values.push(Value::Integer(valid as i64));
        }
        if let Some(points) = update.points {
            assignments.extend(Field::Points.columns());
            values.extend(quad_to_columns(&points).map(Value::Integer));
        }
        assignments.push("tsp");
        values.push(Value::Integer(tsp));
        values.push(Value::Text(image.to_string()));

        let set = assignments
            .iter()
            .map(|column| format!("{column}=?"))
            .collect::<Vec<_>>()
            .join(",");
        let sql = format!("UPDATE label SET {set} WHERE img_name=?");

        let changed = self
            .conn
            .prepare_cached(&sql)?
            .execute(params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(LabelError::IncompleteRecord {
                image: image.to_string(),
            });
        }
        log::trace!("Updated {} for {}", assignments.join(","), image);
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        Ok(self.summary()?.total)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Count records by validity.
    pub fn summary(&self) -> Result<StoreSummary> {
        let (total, valid): (i64, i64) = self
            .conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(valid != 0), 0) FROM label",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(row_error)?;
        let total = total.max(0) as usize;
        let valid = valid.max(0) as usize;
        Ok(StoreSummary {
            total,
            valid,
            voided: total.saturating_sub(valid),
        })
    }

    fn select_integers(&self, sql: &str, image: &str, count: usize) -> Result<Option<Vec<i64>>> {
        self.conn
            .prepare_cached(sql)?
            .query_row([image], |row| {
                (0..count).map(|i| row.get::<_, i64>(i)).collect()
            })
            .optional()
            .map_err(row_error)
    }
}

/// Create the label table if needed and check that its columns match.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE)?;

    let mut stmt = conn.prepare("PRAGMA table_info(label)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let layout_ok = columns.len() == COLUMNS.len()
        && columns
            .iter()
            .zip(COLUMNS.iter())
            .all(|(found, expected)| found.eq_ignore_ascii_case(expected));
    if !layout_ok {
        return Err(LabelError::schema(format!(
            "expected columns ({}), found ({})",
            COLUMNS.join(", "),
            columns.join(", ")
        )));
    }
    Ok(())
}

/// Column type problems mean the file was not written with this layout.
fn row_error(err: rusqlite::Error) -> LabelError {
    match err {
        rusqlite::Error::InvalidColumnType(idx, name, ty) => {
            LabelError::schema(format!("column {idx} ({name}) holds {ty}"))
        }
        rusqlite::Error::IntegralValueOutOfRange(idx, value) => {
            LabelError::schema(format!("column {idx} value {value} out of range"))
        }
        rusqlite::Error::FromSqlConversionFailure(idx, ty, source) => {
            LabelError::schema(format!("column {idx} ({ty}): {source}"))
        }
        other => LabelError::StoreIo(other),
    }
}

fn quad_to_columns(points: &Quad) -> [i64; 8] {
    let [a, b, c, d] = *points;
    [a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y].map(i64::from)
}

fn quad_from_columns(values: &[i64]) -> Result<Quad> {
    let coord = |v: i64| {
        i32::try_from(v).map_err(|_| LabelError::schema(format!("coordinate {v} out of range")))
    };
    let mut quad = [Point::default(); 4];
    for (i, point) in quad.iter_mut().enumerate() {
        *point = Point::new(coord(values[2 * i])?, coord(values[2 * i + 1])?);
    }
    Ok(quad)
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
