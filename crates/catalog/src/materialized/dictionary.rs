// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use anacat_core::interface::{DictRef, DictionaryDef};
use anacat_type::{ColumnId, DictionaryId, TableId};
use once_cell::sync::OnceCell;

use super::{DictionaryEntry, MaterializedCatalog, Registry, StringDictionaryCell};

impl Registry {
	pub(crate) fn add_dictionary(&mut self, def: DictionaryDef) {
		self.dictionaries.insert(
			def.dict_ref.dict,
			DictionaryEntry {
				def,
				string_dict: Arc::new(OnceCell::new()),
			},
		);
	}

	pub(crate) fn remove_dictionary(&mut self, id: DictionaryId) -> Option<DictionaryDef> {
		self.dictionaries.remove(&id).map(|entry| entry.def)
	}

	pub(crate) fn find_dictionary(&self, id: DictionaryId) -> Option<&DictionaryDef> {
		self.dictionaries.get(&id).map(|entry| &entry.def)
	}

	pub(crate) fn set_dictionary_refcount(&mut self, id: DictionaryId, refcount: i32) {
		assert!(refcount >= 0, "dictionary {} refcount would become {}", id, refcount);
		if let Some(entry) = self.dictionaries.get_mut(&id) {
			entry.def.refcount = refcount;
		}
	}

	pub(crate) fn string_dictionary_cell(&self, id: DictionaryId) -> Option<StringDictionaryCell> {
		self.dictionaries.get(&id).map(|entry| entry.string_dict.clone())
	}

	/// Closes the loaded string table, if any.
	pub(crate) fn reset_string_dictionary(&mut self, id: DictionaryId) {
		if let Some(entry) = self.dictionaries.get_mut(&id) {
			entry.string_dict = Arc::new(OnceCell::new());
		}
	}

	pub(crate) fn list_dictionaries(&self) -> Vec<DictionaryDef> {
		let mut result: Vec<DictionaryDef> = self.dictionaries.values().map(|e| e.def.clone()).collect();
		result.sort_by_key(|d| d.dict_ref.dict);
		result
	}

	/// Dictionary behind a dictionary encoded column. Physical shards store
	/// the placeholder id 0 and resolve through their logical table.
	pub(crate) fn resolve_column_dictionary(&self, table: TableId, column: ColumnId) -> Option<DictRef> {
		let col = self.find_column(table, column)?;
		if !col.ty.is_dict_encoded() {
			return None;
		}

		let dict = DictionaryId(col.ty.comp_param);
		if dict != DictionaryId::NONE {
			return self.find_dictionary(dict).map(|d| d.dict_ref);
		}

		let logical = self.logical_table_of(table)?;
		let logical_col = self.find_column(logical, column)?;
		self.find_dictionary(DictionaryId(logical_col.ty.comp_param)).map(|d| d.dict_ref)
	}
}

impl MaterializedCatalog {
	pub fn find_dictionary(&self, id: DictionaryId) -> Option<DictionaryDef> {
		self.read(|r| r.find_dictionary(id).cloned())
	}

	pub fn list_dictionaries(&self) -> Vec<DictionaryDef> {
		self.read(|r| r.list_dictionaries())
	}

	pub fn resolve_column_dictionary(&self, table: TableId, column: ColumnId) -> Option<DictRef> {
		self.read(|r| r.resolve_column_dictionary(table, column))
	}
}

#[cfg(test)]
mod tests {
	use anacat_type::{ColumnId, DictionaryId, TableId, TypeInfo};

	use crate::{
		MaterializedCatalog,
		test_utils::{column_def, dictionary_def, table_def},
	};

	#[test]
	fn test_refcount_update() {
		let catalog = MaterializedCatalog::new();
		catalog.update(|r| r.add_dictionary(dictionary_def(1, 7)));
		catalog.update(|r| r.set_dictionary_refcount(DictionaryId(7), 3));
		assert_eq!(catalog.find_dictionary(DictionaryId(7)).unwrap().refcount, 3);
	}

	#[test]
	#[should_panic(expected = "refcount would become -1")]
	fn test_negative_refcount_panics() {
		let catalog = MaterializedCatalog::new();
		catalog.update(|r| r.add_dictionary(dictionary_def(1, 7)));
		catalog.update(|r| r.set_dictionary_refcount(DictionaryId(7), -1));
	}

	#[test]
	fn test_shard_placeholder_resolves_through_logical() {
		let catalog = MaterializedCatalog::new();
		let mut logical_col = column_def(1, 1, "name", anacat_type::SqlType::Text);
		logical_col.ty = TypeInfo {
			comp_param: 7,
			..TypeInfo::dict_text(32)
		};
		let mut shard_col = column_def(2, 1, "name", anacat_type::SqlType::Text);
		shard_col.ty = TypeInfo {
			comp_param: 0,
			..TypeInfo::dict_text(32)
		};

		let mut logical = table_def(1, "t");
		logical.shard_count = 1;
		let mut shard = table_def(2, "t_shard_#1");
		shard.shard = 0;

		catalog.update(|r| {
			r.add_dictionary(dictionary_def(1, 7));
			r.add_table(logical, vec![logical_col]);
			r.add_table(shard, vec![shard_col]);
			r.set_physical_tables(TableId(1), vec![TableId(2)]);
		});

		let resolved = catalog.resolve_column_dictionary(TableId(2), ColumnId(1)).unwrap();
		assert_eq!(resolved.dict, DictionaryId(7));
	}
}
