// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::iter::once;

use anacat_core::interface::TableDef;
use anacat_type::DictionaryId;
use tracing::{debug, info, instrument};

use super::Catalog;
use crate::Result;

impl Catalog {
	/// Deletes every row of a table while keeping its definition. A dictionary
	/// referenced by this table alone is emptied as well.
	#[instrument(name = "catalog::table::truncate", level = "info", skip(self), fields(db = %self.db.name))]
	pub fn truncate_table(&self, name: &str) -> Result<()> {
		let _ddl = self.lock_ddl();
		let table = self.require_table(name)?;
		let shards = self.shards_of(&table);

		for truncated in shards.iter().chain(once(&table)) {
			self.truncate_one(truncated)?;
		}

		self.notify(&table.name)?;
		info!(table = *table.id, shards = shards.len(), "table truncated");
		Ok(())
	}

	fn truncate_one(&self, table: &TableDef) -> Result<()> {
		self.materialized.update(|r| r.reset_fragmenter(table.id));

		let storage = &self.ports().storage;
		storage.delete_chunks_with_prefix(&[*self.db.id, *table.id], None)?;
		storage.checkpoint(self.db.id, table.id)?;
		storage.remove_table_related_ds(self.db.id, table.id)?;

		let dictionaries = self.dictionaries();
		for column in self.materialized.list_columns(table.id) {
			if !column.ty.is_dict_encoded() || column.ty.comp_param == *DictionaryId::NONE {
				continue;
			}
			let id = DictionaryId(column.ty.comp_param);
			match self.materialized.find_dictionary(id) {
				Some(dict) if dict.refcount == 1 => dictionaries.reset(&self.materialized, id)?,
				Some(dict) => debug!(dict = *id, refcount = dict.refcount, "shared dictionary kept on truncate"),
				None => {}
			}
		}
		Ok(())
	}
}
