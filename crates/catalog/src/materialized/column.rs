// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{ColumnDef, ColumnFilter};
use anacat_type::{ColumnId, TableId};

use super::{MaterializedCatalog, Registry, name_key};

impl Registry {
	pub(crate) fn find_column(&self, table: TableId, id: ColumnId) -> Option<&ColumnDef> {
		self.columns.get(&(table, id))
	}

	pub(crate) fn find_column_by_name(&self, table: TableId, name: &str) -> Option<&ColumnDef> {
		self.columns_by_name.get(&(table, name_key(name))).and_then(|id| self.find_column(table, *id))
	}

	/// Columns of `table` ordered by id.
	pub(crate) fn list_columns(&self, table: TableId) -> Vec<ColumnDef> {
		let count = self.find_table(table).map(|t| t.column_count).unwrap_or(0);
		(1..=count).filter_map(|id| self.find_column(table, ColumnId(id)).cloned()).collect()
	}

	pub(crate) fn list_columns_filtered(&self, table: TableId, filter: ColumnFilter) -> Vec<ColumnDef> {
		let mut physical_left = 0;
		self.list_columns(table)
			.into_iter()
			.filter(|column| {
				if physical_left > 0 {
					physical_left -= 1;
					return filter.fetch_physical;
				}
				physical_left = column.ty.physical_column_count();
				(filter.fetch_system || !column.is_system) && (filter.fetch_virtual || !column.is_virtual)
			})
			.collect()
	}

	pub(crate) fn rename_column(&mut self, table: TableId, id: ColumnId, new_name: &str) {
		let Some(column) = self.columns.get_mut(&(table, id)) else {
			return;
		};
		self.columns_by_name.remove(&(table, name_key(&column.name)));
		column.name = new_name.to_string();
		self.columns_by_name.insert((table, name_key(new_name)), id);
	}

	pub(crate) fn deleted_column(&self, table: TableId) -> Option<&ColumnDef> {
		self.deleted_columns.get(&table).and_then(|id| self.find_column(table, *id))
	}
}

impl MaterializedCatalog {
	pub fn find_column(&self, table: TableId, id: ColumnId) -> Option<ColumnDef> {
		self.read(|r| r.find_column(table, id).cloned())
	}

	pub fn find_column_by_name(&self, table: TableId, name: &str) -> Option<ColumnDef> {
		self.read(|r| r.find_column_by_name(table, name).cloned())
	}

	pub fn list_columns(&self, table: TableId) -> Vec<ColumnDef> {
		self.read(|r| r.list_columns(table))
	}

	pub fn list_columns_filtered(&self, table: TableId, filter: ColumnFilter) -> Vec<ColumnDef> {
		self.read(|r| r.list_columns_filtered(table, filter))
	}

	pub fn deleted_column(&self, table: TableId) -> Option<ColumnDef> {
		self.read(|r| r.deleted_column(table).cloned())
	}
}
