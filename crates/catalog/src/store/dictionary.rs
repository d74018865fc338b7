// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_sqlite::Queryable;
use anacat_type::DictionaryId;

use crate::{CatalogStore, Result};

/// A row of `mapd_dictionaries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DictionaryRow {
	pub id: DictionaryId,
	pub name: String,
	pub nbits: i32,
	pub is_shared: bool,
	pub refcount: i32,
}

impl CatalogStore {
	/// Inserts a dictionary with refcount 1 under `name` and returns its id.
	pub(crate) fn create_dictionary(
		tx: &impl Queryable,
		name: &str,
		nbits: i32,
		is_shared: bool,
	) -> Result<DictionaryId> {
		tx.execute(
			"INSERT INTO mapd_dictionaries (name, nbits, is_shared, refcount) VALUES (?1, ?2, ?3, 1)",
			&[&name, &nbits, &is_shared],
		)?;
		Ok(DictionaryId(tx.last_insert_id()? as i32))
	}

	pub(crate) fn rename_dictionary(tx: &impl Queryable, id: DictionaryId, name: &str) -> Result<()> {
		tx.execute("UPDATE mapd_dictionaries SET name = ?1 WHERE dictid = ?2", &[&name, &*id])?;
		Ok(())
	}

	pub(crate) fn set_dictionary_refcount(tx: &impl Queryable, id: DictionaryId, refcount: i32) -> Result<()> {
		tx.execute("UPDATE mapd_dictionaries SET refcount = ?1 WHERE dictid = ?2", &[&refcount, &*id])?;
		Ok(())
	}

	pub(crate) fn delete_dictionary(tx: &impl Queryable, id: DictionaryId) -> Result<()> {
		tx.execute("DELETE FROM mapd_dictionaries WHERE dictid = ?1", &[&*id])?;
		Ok(())
	}

	pub(crate) fn list_dictionaries(rx: &impl Queryable) -> Result<Vec<DictionaryRow>> {
		let rows =
			rx.query("SELECT dictid, name, nbits, is_shared, refcount FROM mapd_dictionaries ORDER BY dictid", &[])?;
		Ok(rows
			.iter()
			.map(|row| DictionaryRow {
				id: DictionaryId(row.get_i32(0)),
				name: row.get_string(1),
				nbits: row.get_i32(2),
				is_shared: row.get_bool(3),
				refcount: row.get_i32(4),
			})
			.collect())
	}
}
