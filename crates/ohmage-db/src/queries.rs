use crate::models::SurveyRow;
use crate::values::Values;
use crate::Database;
use anyhow::{bail, Result};
use rusqlite::types::Value;
use rusqlite::Connection;

impl Database {
    // -- Generic table operations, driven by the resource provider --

    /// Filtered read. `projection` of `None` selects every column;
    /// `selection` is a SQL fragment with `?` placeholders bound to `args`.
    /// Returns the column names alongside the rows.
    pub fn query_table(
        &self,
        table: &str,
        projection: Option<&[String]>,
        selection: Option<&str>,
        args: &[Value],
        sort: Option<&str>,
    ) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        let columns = match projection {
            Some(cols) if !cols.is_empty() => cols.join(", "),
            _ => "*".to_string(),
        };

        let mut sql = format!("SELECT {} FROM {}", columns, table);
        if let Some(filter) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        if let Some(order) = sort {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let names: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();

            let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Vec::with_capacity(names.len());
                for i in 0..names.len() {
                    record.push(row.get::<_, Value>(i)?);
                }
                out.push(record);
            }
            Ok((names, out))
        })
    }

    /// Upsert: INSERT OR REPLACE keyed by the table's declared primary key.
    /// Returns the number of rows written.
    pub fn replace_into(&self, table: &str, values: &Values) -> Result<usize> {
        if values.is_empty() {
            bail!("replace into {}: empty value set", table);
        }

        let columns: Vec<&str> = values.iter().map(|(c, _)| c).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        self.with_conn(|conn| {
            let count = conn.execute(
                &sql,
                rusqlite::params_from_iter(values.iter().map(|(_, v)| v)),
            )?;
            Ok(count)
        })
    }

    /// Filtered update. Set-clause placeholders come first, then the
    /// selection's own `args`.
    pub fn update_table(
        &self,
        table: &str,
        values: &Values,
        selection: Option<&str>,
        args: &[Value],
    ) -> Result<usize> {
        if values.is_empty() {
            bail!("update {}: empty value set", table);
        }

        let assignments: Vec<String> = values.iter().map(|(c, _)| format!("{} = ?", c)).collect();
        let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));
        if let Some(filter) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }

        self.with_conn(|conn| {
            let params: Vec<&dyn rusqlite::types::ToSql> = values
                .iter()
                .map(|(_, v)| v as &dyn rusqlite::types::ToSql)
                .chain(args.iter().map(|v| v as &dyn rusqlite::types::ToSql))
                .collect();
            let count = conn.execute(&sql, params.as_slice())?;
            Ok(count)
        })
    }

    /// Filtered delete. An absent selection clears the whole table.
    pub fn delete_from(&self, table: &str, selection: Option<&str>, args: &[Value]) -> Result<usize> {
        let mut sql = format!("DELETE FROM {}", table);
        if let Some(filter) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }

        self.with_conn(|conn| {
            let count = conn.execute(&sql, rusqlite::params_from_iter(args.iter()))?;
            Ok(count)
        })
    }

    // -- Typed reads --

    pub fn get_survey(&self, id: &str, version: i64) -> Result<Option<SurveyRow>> {
        self.with_conn(|conn| query_survey(conn, id, version))
    }
}

fn query_survey(conn: &Connection, id: &str, version: i64) -> Result<Option<SurveyRow>> {
    let mut stmt = conn.prepare(
        "SELECT survey_id, survey_version, survey_name, survey_description,
                survey_pending_time, survey_pending_timezone, survey_items
         FROM surveys WHERE survey_id = ?1 AND survey_version = ?2",
    )?;

    let row = stmt
        .query_row(rusqlite::params![id, version], |row| {
            Ok(SurveyRow {
                survey_id: row.get(0)?,
                survey_version: row.get(1)?,
                survey_name: row.get(2)?,
                survey_description: row.get(3)?,
                survey_pending_time: row.get(4)?,
                survey_pending_timezone: row.get(5)?,
                survey_items: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
