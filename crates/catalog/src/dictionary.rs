// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Dictionary lifecycle: creation alongside a column, sharing between
//! columns, reference counting, removal and lazy loading of string tables.
//!
//! Row changes go through the caller's transaction and are staged in
//! [`DictionaryChanges`], which the caller applies to the registry once the
//! transaction committed.

use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use anacat_core::interface::{
	CatalogPorts, ColumnDef, DictRef, DictionaryDef, DictionaryLocation, SharedDictionaryDef, StringDictionary,
};
use anacat_sqlite::Queryable;
use anacat_type::{DatabaseId, DictionaryId};
use tracing::{debug, warn};

use crate::{
	CatalogConfig, CatalogStore, MaterializedCatalog, Result,
	error::{CatalogError, CatalogObjectKind},
	layout,
	materialized::{Registry, name_key},
};

/// Name a dictionary row carries until its id is known.
const INITIAL_NAME: &str = "Initial_key";

/// Dictionary effects of one transaction, applied to the registry after commit.
#[derive(Debug, Default)]
pub(crate) struct DictionaryChanges {
	created: Vec<DictionaryDef>,
	refcounts: HashMap<DictionaryId, i32>,
	dropped: Vec<DictionaryDef>,
}

impl DictionaryChanges {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn created(&self) -> &[DictionaryDef] {
		&self.created
	}

	pub(crate) fn dropped(&self) -> &[DictionaryDef] {
		&self.dropped
	}

	fn created_mut(&mut self, id: DictionaryId) -> Option<&mut DictionaryDef> {
		self.created.iter_mut().find(|d| d.dict_ref.dict == id)
	}

	/// Refcount as seen by this transaction.
	fn refcount(&self, catalog: &MaterializedCatalog, id: DictionaryId) -> Option<i32> {
		if let Some(created) = self.created.iter().find(|d| d.dict_ref.dict == id) {
			return Some(created.refcount);
		}
		if let Some(refcount) = self.refcounts.get(&id) {
			return Some(*refcount);
		}
		catalog.find_dictionary(id).map(|d| d.refcount)
	}

	pub(crate) fn apply(self, registry: &mut Registry) {
		for def in self.created {
			registry.add_dictionary(def);
		}
		for (id, refcount) in self.refcounts {
			registry.set_dictionary_refcount(id, refcount);
		}
		for def in self.dropped {
			registry.remove_dictionary(def.dict_ref.dict);
		}
	}
}

pub(crate) struct DictionaryManager<'a> {
	db: DatabaseId,
	config: &'a CatalogConfig,
	ports: &'a CatalogPorts,
}

impl<'a> DictionaryManager<'a> {
	pub(crate) fn new(db: DatabaseId, config: &'a CatalogConfig, ports: &'a CatalogPorts) -> Self {
		Self {
			db,
			config,
			ports,
		}
	}

	/// Creates the dictionary owned by `column` and points the column at it.
	/// The folder and the remote string table are created right away and
	/// undone by [`rollback`](Self::rollback) if the transaction fails.
	pub(crate) fn create(
		&self,
		tx: &impl Queryable,
		changes: &mut DictionaryChanges,
		table_name: &str,
		column: &mut ColumnDef,
	) -> Result<()> {
		let nbits = column.ty.comp_param;
		let id = CatalogStore::create_dictionary(tx, INITIAL_NAME, nbits, false)?;
		let name = format!("{}_{}_dict{}", table_name, column.name, id);
		CatalogStore::rename_dictionary(tx, id, &name)?;

		let def = DictionaryDef {
			dict_ref: DictRef::new(self.db, id),
			name,
			nbits,
			is_shared: false,
			refcount: 1,
			folder: layout::dictionary_folder(&self.config.base_path, self.db, id),
			is_temp: false,
		};

		point_column_at(column, id);
		// staged first so that rollback also sees a half created dictionary
		changes.created.push(def.clone());
		self.materialize(&def)?;
		Ok(())
	}

	/// Temporary tables keep dictionaries in memory only.
	pub(crate) fn create_temporary(
		&self,
		changes: &mut DictionaryChanges,
		id: DictionaryId,
		column: &mut ColumnDef,
	) -> Result<()> {
		let def = DictionaryDef {
			dict_ref: DictRef::new(self.db, id),
			name: String::new(),
			nbits: column.ty.comp_param,
			is_shared: false,
			refcount: 1,
			folder: PathBuf::new(),
			is_temp: true,
		};

		point_column_at(column, id);
		changes.created.push(def.clone());
		self.materialize(&def)?;
		Ok(())
	}

	/// Physical shards resolve dictionaries through their logical table.
	pub(crate) fn placeholder(column: &mut ColumnDef) {
		point_column_at(column, DictionaryId::NONE);
	}

	/// Makes `column` reuse an existing dictionary as declared by `shared`.
	///
	/// `pending` holds the columns of the table being created that precede
	/// `column`; their dictionaries are staged in `changes`.
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn share(
		&self,
		tx: &impl Queryable,
		catalog: &MaterializedCatalog,
		changes: &mut DictionaryChanges,
		table_name: &str,
		pending: &[ColumnDef],
		column: &mut ColumnDef,
		shared: &SharedDictionaryDef,
		defs: &[SharedDictionaryDef],
	) -> Result<()> {
		let root = root_reference(table_name, shared, defs)?;

		if !same_name(&root.foreign_table, table_name) {
			return self.share_foreign(tx, catalog, changes, column, root);
		}

		let Some(referenced) = pending.iter().find(|c| same_name(&c.name, &root.foreign_column)) else {
			return Err(CatalogError::InvalidArgument {
				message: format!(
					"column `{}` shares the dictionary of `{}` which is not declared before it",
					column.name, root.foreign_column
				),
			}
			.into());
		};

		let dict = DictionaryId(referenced.ty.comp_param);
		let Some(created) = changes.created_mut(dict) else {
			return Err(CatalogError::InvalidArgument {
				message: format!("column `{}` of table `{}` does not own a dictionary", referenced.name, table_name),
			}
			.into());
		};

		assert!(created.refcount >= 1);
		created.refcount += 1;
		if !created.is_temp {
			CatalogStore::set_dictionary_refcount(tx, dict, created.refcount)?;
		}
		column.ty = referenced.ty.clone();
		Ok(())
	}

	fn share_foreign(
		&self,
		tx: &impl Queryable,
		catalog: &MaterializedCatalog,
		changes: &mut DictionaryChanges,
		column: &mut ColumnDef,
		shared: &SharedDictionaryDef,
	) -> Result<()> {
		let Some(table) = catalog.find_table_by_name(&shared.foreign_table) else {
			return Err(not_found(CatalogObjectKind::Table, &shared.foreign_table));
		};
		let Some(foreign) = catalog.find_column_by_name(table.id, &shared.foreign_column) else {
			return Err(not_found(
				CatalogObjectKind::Column,
				&format!("{}.{}", shared.foreign_table, shared.foreign_column),
			));
		};
		if !foreign.ty.is_dict_encoded() {
			return Err(CatalogError::InvalidArgument {
				message: format!(
					"column `{}.{}` is not dictionary encoded",
					shared.foreign_table, shared.foreign_column
				),
			}
			.into());
		}

		let Some(dict_ref) = catalog.resolve_column_dictionary(table.id, foreign.id) else {
			return Err(not_found(
				CatalogObjectKind::Dictionary,
				&format!("{}.{}", shared.foreign_table, shared.foreign_column),
			));
		};

		column.ty = foreign.ty.clone();
		column.ty.comp_param = *dict_ref.dict;
		self.acquire(tx, catalog, changes, dict_ref.dict)
	}

	fn acquire(
		&self,
		tx: &impl Queryable,
		catalog: &MaterializedCatalog,
		changes: &mut DictionaryChanges,
		id: DictionaryId,
	) -> Result<()> {
		let Some(current) = changes.refcount(catalog, id) else {
			return Err(not_found(CatalogObjectKind::Dictionary, &id.to_string()));
		};
		assert!(current >= 1, "dictionary {} is referenced with refcount {}", id, current);

		if !id.is_temporary() {
			CatalogStore::set_dictionary_refcount(tx, id, current + 1)?;
		}
		changes.refcounts.insert(id, current + 1);
		Ok(())
	}

	/// Drops one reference to a dictionary; the last one removes its row.
	/// Files and the remote string table go in [`finish`](Self::finish).
	pub(crate) fn release(
		&self,
		tx: &impl Queryable,
		catalog: &MaterializedCatalog,
		changes: &mut DictionaryChanges,
		id: DictionaryId,
	) -> Result<()> {
		if id == DictionaryId::NONE || changes.dropped.iter().any(|d| d.dict_ref.dict == id) {
			return Ok(());
		}
		let Some(def) = catalog.find_dictionary(id) else {
			return Err(CatalogError::Inconsistent {
				message: format!("released dictionary {} is not registered", id),
			}
			.into());
		};

		let refcount = changes.refcount(catalog, id).unwrap_or(def.refcount) - 1;
		if refcount < 0 {
			return Err(CatalogError::Inconsistent {
				message: format!("dictionary {} refcount would become {}", id, refcount),
			}
			.into());
		}

		if refcount == 0 {
			if !def.is_temp {
				CatalogStore::delete_dictionary(tx, id)?;
			}
			changes.refcounts.remove(&id);
			changes.dropped.push(def);
		} else {
			if !def.is_temp {
				CatalogStore::set_dictionary_refcount(tx, id, refcount)?;
			}
			changes.refcounts.insert(id, refcount);
		}
		Ok(())
	}

	/// Post commit effects of dropped dictionaries. Rows are already gone, so
	/// failures here are logged and leave only garbage behind.
	pub(crate) fn finish(&self, changes: &DictionaryChanges) {
		for def in changes.dropped() {
			if !def.is_temp {
				if let Err(err) = remove_folder(&def.folder) {
					warn!(dict = *def.dict_ref.dict, folder = %def.folder.display(), "cannot remove dictionary folder: {}", err);
				}
			}
			if self.config.has_remote_dictionaries() {
				if let Err(err) = self.ports.dictionaries.drop_dictionary(def.dict_ref) {
					warn!(dict = *def.dict_ref.dict, "remote dictionary drop failed: {}", err.message);
				}
			}
		}
	}

	/// Undoes the file and remote effects of dictionaries created in a
	/// transaction that did not commit.
	pub(crate) fn rollback(&self, changes: &DictionaryChanges) {
		for def in changes.created() {
			if !def.is_temp {
				if let Err(err) = remove_folder(&def.folder) {
					warn!(folder = %def.folder.display(), "cannot remove dictionary folder: {}", err);
				}
			}
			if self.config.has_remote_dictionaries() {
				if let Err(err) = self.ports.dictionaries.drop_dictionary(def.dict_ref) {
					warn!(dict = *def.dict_ref.dict, "remote dictionary drop failed: {}", err.message);
				}
			}
		}
	}

	/// Empties a dictionary in place. Used when the only table referencing it
	/// is truncated; the refcount stays as it is.
	pub(crate) fn reset(&self, catalog: &MaterializedCatalog, id: DictionaryId) -> Result<()> {
		let Some(def) = catalog.find_dictionary(id) else {
			return Ok(());
		};

		catalog.update(|r| r.reset_string_dictionary(id));

		if !def.is_temp {
			remove_folder(&def.folder)?;
		}
		if self.config.has_remote_dictionaries() {
			self.ports.dictionaries.drop_dictionary(def.dict_ref)?;
		}
		self.materialize(&def)?;

		debug!(dict = *id, "dictionary reset");
		self.load(catalog, id)?;
		Ok(())
	}

	/// The string table of a dictionary, opened on first use.
	pub(crate) fn load(
		&self,
		catalog: &MaterializedCatalog,
		id: DictionaryId,
	) -> Result<Option<Arc<dyn StringDictionary>>> {
		let Some((def, cell)) =
			catalog.read(|r| Some((r.find_dictionary(id)?.clone(), r.string_dictionary_cell(id)?)))
		else {
			return Ok(None);
		};

		let dict = cell.get_or_try_init(|| self.ports.dictionaries.open(self.location(&def)))?;
		Ok(Some(dict.clone()))
	}

	fn location(&self, def: &DictionaryDef) -> DictionaryLocation {
		match self.config.string_dict_hosts.first() {
			Some(host) => DictionaryLocation::Remote {
				host: host.clone(),
				dict_ref: def.dict_ref,
			},
			None => DictionaryLocation::Local {
				folder: def.folder.clone(),
				is_temp: def.is_temp,
			},
		}
	}

	fn materialize(&self, def: &DictionaryDef) -> Result<()> {
		if !def.is_temp {
			fs::create_dir_all(&def.folder)?;
		}
		if self.config.has_remote_dictionaries() {
			self.ports.dictionaries.create(def.dict_ref, def.is_temp)?;
		}
		Ok(())
	}
}

fn point_column_at(column: &mut ColumnDef, id: DictionaryId) {
	if !column.ty.is_array() {
		column.ty.size = column.ty.comp_param / 8;
	}
	column.ty.comp_param = *id;
}

fn remove_folder(folder: &Path) -> std::io::Result<()> {
	if folder.as_os_str().is_empty() || !folder.exists() {
		return Ok(());
	}
	fs::remove_dir_all(folder)
}

fn same_name(a: &str, b: &str) -> bool {
	name_key(a) == name_key(b)
}

fn not_found(kind: CatalogObjectKind, name: &str) -> crate::Error {
	CatalogError::NotFound {
		kind,
		name: name.to_string(),
	}
	.into()
}

/// Follows references between columns of the table being created until one
/// names another table or a column that owns its dictionary.
fn root_reference<'d>(
	table_name: &str,
	shared: &'d SharedDictionaryDef,
	defs: &'d [SharedDictionaryDef],
) -> Result<&'d SharedDictionaryDef> {
	let mut current = shared;
	for _ in 0..=defs.len() {
		if !same_name(&current.foreign_table, table_name) {
			return Ok(current);
		}
		match defs.iter().find(|d| same_name(&d.column, &current.foreign_column)) {
			Some(next) => current = next,
			None => return Ok(current),
		}
	}

	Err(CatalogError::InvalidArgument {
		message: format!("shared dictionary reference of column `{}` does not terminate", shared.column),
	}
	.into())
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::SharedDictionaryDef;

	use super::root_reference;

	#[test]
	fn test_root_reference_follows_same_table_chain() {
		let defs = vec![
			SharedDictionaryDef::new("b", "t", "a"),
			SharedDictionaryDef::new("a", "other", "name"),
		];
		let root = root_reference("t", &defs[0], &defs).unwrap();
		assert_eq!(root.foreign_table, "other");
		assert_eq!(root.foreign_column, "name");
	}

	#[test]
	fn test_root_reference_stops_at_owning_column() {
		let defs = vec![SharedDictionaryDef::new("b", "T", "a")];
		let root = root_reference("t", &defs[0], &defs).unwrap();
		assert_eq!(root.foreign_column, "a");
	}

	#[test]
	fn test_root_reference_cycle() {
		let defs = vec![SharedDictionaryDef::new("a", "t", "b"), SharedDictionaryDef::new("b", "t", "a")];
		let err = root_reference("t", &defs[0], &defs).unwrap_err();
		assert_eq!(err.code, "CA_003");
	}
}
