// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::Result;
use rusqlite::{Connection, ToSql, types::Value};

use crate::error::statement_error;

/// Statement execution shared by auto-commit stores and open transactions.
pub trait Queryable {
	fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R>;

	/// Runs a statement, returning the number of affected rows.
	fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
		self.with_connection(|conn| conn.execute(sql, params).map_err(|e| statement_error(sql, e)))
	}

	fn execute_batch(&self, sql: &str) -> Result<()> {
		self.with_connection(|conn| conn.execute_batch(sql).map_err(|e| statement_error(sql, e)))
	}

	fn query(&self, sql: &str, params: &[&dyn ToSql]) -> Result<RowSet> {
		self.with_connection(|conn| {
			let mut stmt = conn.prepare(sql).map_err(|e| statement_error(sql, e))?;
			let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
			let width = columns.len();

			let mut rows = stmt.query(params).map_err(|e| statement_error(sql, e))?;
			let mut result = Vec::new();
			while let Some(row) = rows.next().map_err(|e| statement_error(sql, e))? {
				let mut values = Vec::with_capacity(width);
				for idx in 0..width {
					values.push(row.get::<_, Value>(idx).map_err(|e| statement_error(sql, e))?);
				}
				result.push(Row {
					values,
				});
			}

			Ok(RowSet {
				columns,
				rows: result,
			})
		})
	}

	fn last_insert_id(&self) -> Result<i64> {
		self.with_connection(|conn| Ok(conn.last_insert_rowid()))
	}

	fn table_exists(&self, table: &str) -> Result<bool> {
		let rows = self.query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1", &[&table])?;
		Ok(!rows.is_empty())
	}

	/// Column names of `table` in declaration order.
	fn table_columns(&self, table: &str) -> Result<Vec<String>> {
		let rows = self.query(&format!("PRAGMA TABLE_INFO({})", table), &[])?;
		Ok(rows.iter().map(|row| row.get_string(1)).collect())
	}

	fn has_column(&self, table: &str, column: &str) -> Result<bool> {
		Ok(self.table_columns(table)?.iter().any(|c| c.eq_ignore_ascii_case(column)))
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
	columns: Vec<String>,
	rows: Vec<Row>,
}

impl RowSet {
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn first(&self) -> Option<&Row> {
		self.rows.first()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Row> {
		self.rows.iter()
	}
}

impl IntoIterator for RowSet {
	type Item = Row;
	type IntoIter = std::vec::IntoIter<Row>;

	fn into_iter(self) -> Self::IntoIter {
		self.rows.into_iter()
	}
}

impl<'a> IntoIterator for &'a RowSet {
	type Item = &'a Row;
	type IntoIter = std::slice::Iter<'a, Row>;

	fn into_iter(self) -> Self::IntoIter {
		self.rows.iter()
	}
}

/// One result row. Accessors coerce between SQLite storage classes since
/// older catalogs stored booleans and numbers inconsistently.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
	values: Vec<Value>,
}

impl Row {
	pub fn value(&self, idx: usize) -> &Value {
		self.values.get(idx).unwrap_or(&Value::Null)
	}

	pub fn is_null(&self, idx: usize) -> bool {
		matches!(self.value(idx), Value::Null)
	}

	pub fn get_i64(&self, idx: usize) -> i64 {
		match self.value(idx) {
			Value::Integer(v) => *v,
			Value::Real(v) => *v as i64,
			Value::Text(v) => v.trim().parse().unwrap_or(0),
			Value::Null | Value::Blob(_) => 0,
		}
	}

	pub fn get_i32(&self, idx: usize) -> i32 {
		self.get_i64(idx) as i32
	}

	pub fn get_bool(&self, idx: usize) -> bool {
		match self.value(idx) {
			Value::Integer(v) => *v != 0,
			Value::Real(v) => *v != 0.0,
			Value::Text(v) => {
				let v = v.trim();
				v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("t")
			}
			Value::Null | Value::Blob(_) => false,
		}
	}

	pub fn get_string(&self, idx: usize) -> String {
		match self.value(idx) {
			Value::Text(v) => v.clone(),
			Value::Integer(v) => v.to_string(),
			Value::Real(v) => v.to_string(),
			Value::Blob(v) => String::from_utf8_lossy(v).into_owned(),
			Value::Null => String::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(values: Vec<Value>) -> Row {
		Row {
			values,
		}
	}

	#[test]
	fn test_bool_from_text_and_integer() {
		let r = row(vec![Value::Integer(1), Value::Text("false".into()), Value::Text("true".into())]);
		assert!(r.get_bool(0));
		assert!(!r.get_bool(1));
		assert!(r.get_bool(2));
	}

	#[test]
	fn test_null_text_reads_empty() {
		let r = row(vec![Value::Null]);
		assert_eq!(r.get_string(0), "");
		assert_eq!(r.get_i32(0), 0);
	}

	#[test]
	fn test_out_of_range_index_reads_null() {
		let r = row(vec![]);
		assert!(r.is_null(3));
	}

	#[test]
	fn test_numeric_text() {
		let r = row(vec![Value::Text(" 42".into())]);
		assert_eq!(r.get_i64(0), 42);
	}
}
