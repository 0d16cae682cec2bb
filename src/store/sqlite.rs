//! SQLite-backed output store.

use rusqlite::{params_from_iter, Connection};

use crate::error::ImportResult;
use crate::store::OutputStore;
use crate::types::{ColumnType, InferredSchema, Value};

/// Output store writing into a SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `database`.
    pub fn open(database: &str) -> ImportResult<Self> {
        Ok(Self {
            conn: Connection::open(database)?,
        })
    }
}

impl OutputStore for SqliteStore {
    fn prepare(&mut self, table: &str, schema: &InferredSchema) -> ImportResult<()> {
        let columns: Vec<String> = schema
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), declared_type(c.ty, c.storage_length())))
            .collect();
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_ident(table),
                columns.join(", ")
            ),
            [],
        )?;
        self.conn
            .execute(&format!("DELETE FROM {}", quote_ident(table)), [])?;
        Ok(())
    }

    fn insert_batch(
        &mut self,
        table: &str,
        schema: &InferredSchema,
        rows: &[Vec<Value>],
    ) -> ImportResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; schema.columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} VALUES ({placeholders})",
            quote_ident(table)
        );

        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn declared_type(ty: ColumnType, storage_length: usize) -> String {
    match ty {
        ColumnType::String => format!("VARCHAR({storage_length})"),
        ColumnType::Integer => "INTEGER".to_owned(),
        ColumnType::Decimal => "REAL".to_owned(),
        ColumnType::Date => "DATE".to_owned(),
        ColumnType::Boolean => "BOOLEAN".to_owned(),
    }
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Decimal(f) => rusqlite::types::Value::Real(*f),
        Value::Date(d) => rusqlite::types::Value::Text(d.format("%Y-%m-%d").to_string()),
        Value::Boolean(b) => rusqlite::types::Value::Integer(i64::from(*b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnDescriptor, TextLayout};

    fn schema() -> InferredSchema {
        InferredSchema {
            layout: TextLayout::Delimited { delimiter: b',' },
            has_header: true,
            columns: vec![
                ColumnDescriptor {
                    name: "Name".into(),
                    ty: ColumnType::String,
                    max_length: 10,
                },
                ColumnDescriptor {
                    name: "Created".into(),
                    ty: ColumnType::Date,
                    max_length: 10,
                },
            ],
        }
    }

    #[test]
    fn prepare_is_idempotent_and_clears_prior_rows() {
        let mut store = SqliteStore::open(":memory:").unwrap();
        let schema = schema();
        store.prepare("companies", &schema).unwrap();

        let rows = vec![vec![
            Value::String("Google".into()),
            Value::Date(chrono::NaiveDate::from_ymd_opt(1998, 9, 4).unwrap()),
        ]];
        assert_eq!(store.insert_batch("companies", &schema, &rows).unwrap(), 1);

        // A second prepare starts the full load over instead of appending.
        store.prepare("companies", &schema).unwrap();
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM \"companies\"", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn dates_land_as_iso_text() {
        let mut store = SqliteStore::open(":memory:").unwrap();
        let schema = schema();
        store.prepare("t", &schema).unwrap();
        store
            .insert_batch(
                "t",
                &schema,
                &[vec![
                    Value::String("Apple".into()),
                    Value::Date(chrono::NaiveDate::from_ymd_opt(1976, 4, 1).unwrap()),
                ]],
            )
            .unwrap();
        let created: String = store
            .conn
            .query_row("SELECT \"Created\" FROM \"t\"", [], |r| r.get(0))
            .unwrap();
        assert_eq!(created, "1976-04-01");
    }
}
