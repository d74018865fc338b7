// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashSet, sync::Arc};

use anacat_core::interface::{ColumnDef, TableDef};
use anacat_type::TableId;
use once_cell::sync::OnceCell;

use super::{FragmenterCell, MaterializedCatalog, Registry, TableEntry, name_key};
use crate::{
	Result,
	error::{CatalogError, CatalogObjectKind},
};

impl Registry {
	/// Publishes a table together with its columns.
	pub(crate) fn add_table(&mut self, table: TableDef, columns: Vec<ColumnDef>) {
		let id = table.id;
		assert!(!self.tables.contains_key(&id), "table {} published twice", id);

		for column in columns {
			assert_eq!(column.table, id);
			if column.is_deleted {
				self.deleted_columns.insert(id, column.id);
			}
			self.columns_by_name.insert((id, name_key(&column.name)), column.id);
			self.columns.insert((id, column.id), column);
		}

		self.tables_by_name.insert(name_key(&table.name), id);
		self.tables.insert(
			id,
			TableEntry {
				def: table,
				fragmenter: Arc::new(OnceCell::new()),
			},
		);
	}

	/// Unpublishes a table and its columns, returning them.
	pub(crate) fn remove_table(&mut self, id: TableId) -> Option<(TableDef, Vec<ColumnDef>)> {
		let entry = self.tables.remove(&id)?;
		self.tables_by_name.remove(&name_key(&entry.def.name));
		self.deleted_columns.remove(&id);

		let mut columns: Vec<ColumnDef> = Vec::new();
		self.columns.retain(|(table, _), column| {
			if *table == id {
				columns.push(column.clone());
				false
			} else {
				true
			}
		});
		self.columns_by_name.retain(|(table, _), _| *table != id);
		columns.sort_by_key(|c| c.id);

		Some((entry.def, columns))
	}

	/// Renames one table. Fails when the name belongs to another table.
	pub(crate) fn rename_table(&mut self, id: TableId, new_name: &str) -> Result<()> {
		self.rename_tables(&[(id, new_name.to_string())])
	}

	/// Renames a group of tables at once, such as a logical table and its
	/// shards. Names may move between members of the group but must not be
	/// held by any other table. Nothing changes when a name is taken.
	pub(crate) fn rename_tables(&mut self, renames: &[(TableId, String)]) -> Result<()> {
		self.check_renames(renames)?;

		for (id, _) in renames {
			if let Some(entry) = self.tables.get(id) {
				self.tables_by_name.remove(&name_key(&entry.def.name));
			}
		}
		for (id, new_name) in renames {
			if let Some(entry) = self.tables.get_mut(id) {
				entry.def.name = new_name.clone();
				self.tables_by_name.insert(name_key(new_name), *id);
			}
		}
		Ok(())
	}

	pub(crate) fn check_renames(&self, renames: &[(TableId, String)]) -> Result<()> {
		let mut claimed = HashSet::new();
		for (_, new_name) in renames {
			let key = name_key(new_name);
			let held_outside = self
				.tables_by_name
				.get(&key)
				.is_some_and(|holder| !renames.iter().any(|(id, _)| id == holder));
			if held_outside || !claimed.insert(key) {
				return Err(CatalogError::AlreadyExists {
					kind: CatalogObjectKind::Table,
					name: new_name.clone(),
				}
				.into());
			}
		}
		Ok(())
	}

	pub(crate) fn find_table(&self, id: TableId) -> Option<&TableDef> {
		self.tables.get(&id).map(|entry| &entry.def)
	}

	pub(crate) fn find_table_by_name(&self, name: &str) -> Option<&TableDef> {
		self.tables_by_name.get(&name_key(name)).and_then(|id| self.find_table(*id))
	}

	pub(crate) fn list_tables(&self) -> Vec<TableDef> {
		let mut result: Vec<TableDef> = self.tables.values().map(|e| e.def.clone()).collect();
		result.sort_by_key(|t| t.id);
		result
	}

	pub(crate) fn fragmenter_cell(&self, id: TableId) -> Option<FragmenterCell> {
		self.tables.get(&id).map(|entry| entry.fragmenter.clone())
	}

	/// Drops the cached fragmenter; the next lookup builds a fresh one.
	pub(crate) fn reset_fragmenter(&mut self, id: TableId) {
		if let Some(entry) = self.tables.get_mut(&id) {
			entry.fragmenter = Arc::new(OnceCell::new());
		}
	}
}

impl MaterializedCatalog {
	pub fn find_table(&self, id: TableId) -> Option<TableDef> {
		self.read(|r| r.find_table(id).cloned())
	}

	pub fn find_table_by_name(&self, name: &str) -> Option<TableDef> {
		self.read(|r| r.find_table_by_name(name).cloned())
	}

	pub fn list_tables(&self) -> Vec<TableDef> {
		self.read(|r| r.list_tables())
	}
}
