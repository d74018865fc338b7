// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::TableId;

use super::{MaterializedCatalog, Registry};

impl Registry {
	pub(crate) fn set_physical_tables(&mut self, logical: TableId, physical: Vec<TableId>) {
		assert!(!physical.is_empty(), "logical table {} without shards", logical);
		self.physical_tables.insert(logical, physical);
	}

	pub(crate) fn remove_physical_tables(&mut self, logical: TableId) -> Option<Vec<TableId>> {
		self.physical_tables.remove(&logical)
	}

	pub(crate) fn physical_tables(&self, logical: TableId) -> Option<&Vec<TableId>> {
		self.physical_tables.get(&logical)
	}

	pub(crate) fn logical_table_of(&self, physical: TableId) -> Option<TableId> {
		self.physical_tables.iter().find(|(_, shards)| shards.contains(&physical)).map(|(logical, _)| *logical)
	}
}

impl MaterializedCatalog {
	pub fn physical_tables(&self, logical: TableId) -> Option<Vec<TableId>> {
		self.read(|r| r.physical_tables(logical).cloned())
	}

	pub fn logical_table_of(&self, physical: TableId) -> Option<TableId> {
		self.read(|r| r.logical_table_of(physical))
	}
}
