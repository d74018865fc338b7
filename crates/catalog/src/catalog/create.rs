// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::iter::once;

use anacat_core::interface::{ColumnDef, ColumnToCreate, FragmenterKind, Persistence, TableDef, TableToCreate};
use anacat_sqlite::Queryable;
use anacat_type::{ColumnId, TableId, UserId};
use tracing::{error, info, instrument, warn};

use super::{Catalog, DualTxn, geometry::expand_columns, require_owner};
use crate::{
	CatalogStore, Result,
	dictionary::{DictionaryChanges, DictionaryManager},
	error::{CatalogError, CatalogObjectKind},
	materialized::name_key,
	role::RoleState,
};

/// Shard index of anything that is not a physical shard.
const NOT_A_SHARD: i32 = -1;

/// A table and its columns as written in the current transaction.
type Staged = (TableDef, Vec<ColumnDef>);

impl Catalog {
	/// Creates a table, a view (when `view_sql` is set) or, when
	/// `shard_count` is positive, a sharded table.
	#[instrument(name = "catalog::table::create", level = "info", skip(self, request), fields(db = %self.db.name, table = %request.name))]
	pub fn create_table(&self, request: TableToCreate) -> Result<TableDef> {
		if request.shard_count > 0 {
			return self.create_sharded_table(request);
		}

		let columns = expand_columns(&request)?;
		if request.persistence == Persistence::Temporary {
			return self.create_temporary_table(&request, columns);
		}

		let _writer = self.system.lock_writer();
		let _ddl = self.lock_ddl();
		self.check_table_name_free(&request.name)?;

		let dictionaries = self.dictionaries();
		let mut changes = DictionaryChanges::new();
		let mut roles = self.system.working_roles();
		let txn = DualTxn::begin(self.system.store(), &self.store)?;

		let written = self.write_table(&txn, &dictionaries, &mut changes, &mut roles, &request, &columns);
		let (table, table_columns) = match written.and_then(|staged| txn.commit().map(|()| staged)) {
			Ok(staged) => staged,
			Err(err) => {
				dictionaries.rollback(&changes);
				return Err(err);
			}
		};

		self.system.publish_roles(roles);
		self.materialized.update(|r| {
			changes.apply(r);
			r.add_table(table.clone(), table_columns);
		});

		self.announce(&table, &[])?;
		info!(table = *table.id, columns = table.column_count, view = table.is_view, "table created");
		Ok(table)
	}

	/// Creates a view over `sql`. The view has no data and no fragmenter.
	pub fn create_view(
		&self,
		name: &str,
		owner: UserId,
		sql: &str,
		columns: Vec<ColumnToCreate>,
	) -> Result<TableDef> {
		let mut request = TableToCreate::new(name, owner);
		request.columns = columns;
		request.view_sql = Some(sql.to_string());
		self.create_table(request)
	}

	/// Creates a logical table and `shard_count` physical shards named
	/// `<name>_shard_#1..` in one transaction. Shard columns carry placeholder
	/// dictionaries that resolve through the logical table.
	#[instrument(name = "catalog::table::create_sharded", level = "info", skip(self, request), fields(
		db = %self.db.name,
		table = %request.name,
		shards = request.shard_count
	))]
	pub fn create_sharded_table(&self, request: TableToCreate) -> Result<TableDef> {
		let declared = request.columns.len() as i32;
		if request.shard_column_id < 1 || request.shard_column_id > declared {
			return Err(CatalogError::InvalidShardColumn {
				table: request.name.clone(),
				column_id: request.shard_column_id,
				column_count: declared,
			}
			.into());
		}
		if request.shard_count < 1 {
			return Err(CatalogError::InvalidArgument {
				message: format!("table `{}` needs at least one shard", request.name),
			}
			.into());
		}
		if request.persistence == Persistence::Temporary {
			return Err(CatalogError::InvalidArgument {
				message: format!("temporary table `{}` cannot be sharded", request.name),
			}
			.into());
		}

		let columns = expand_columns(&request)?;

		let _writer = self.system.lock_writer();
		let _ddl = self.lock_ddl();
		self.check_table_name_free(&request.name)?;
		for index in 0..request.shard_count {
			self.check_table_name_free(&TableDef::shard_name(&request.name, index))?;
		}

		let dictionaries = self.dictionaries();
		let mut changes = DictionaryChanges::new();
		let mut roles = self.system.working_roles();
		let txn = DualTxn::begin(self.system.store(), &self.store)?;

		let written = self.write_sharded_table(&txn, &dictionaries, &mut changes, &mut roles, &request, &columns);
		let ((logical, logical_columns), shards) = match written.and_then(|staged| txn.commit().map(|()| staged)) {
			Ok(staged) => staged,
			Err(err) => {
				dictionaries.rollback(&changes);
				return Err(err);
			}
		};

		self.system.publish_roles(roles);
		let shard_defs: Vec<TableDef> = shards.iter().map(|(def, _)| def.clone()).collect();
		self.materialized.update(|r| {
			changes.apply(r);
			r.add_table(logical.clone(), logical_columns);
			for (shard, shard_columns) in shards {
				r.add_table(shard, shard_columns);
			}
			r.set_physical_tables(logical.id, shard_defs.iter().map(|s| s.id).collect());
		});

		self.announce(&logical, &shard_defs)?;
		info!(table = *logical.id, shards = shard_defs.len(), "sharded table created");
		Ok(logical)
	}

	fn create_temporary_table(&self, request: &TableToCreate, columns: Vec<ColumnDef>) -> Result<TableDef> {
		if let Some(geometry) = request.columns.iter().find(|c| c.ty.is_geometry()) {
			return Err(CatalogError::TemporaryGeometry {
				table: request.name.clone(),
				column: geometry.name.clone(),
			}
			.into());
		}

		let _ddl = self.lock_ddl();
		self.check_table_name_free(&request.name)?;

		let mut table = new_table_def(request, &request.name, NOT_A_SHARD, columns.len());
		table.id = self.next_temp_table_id();

		let dictionaries = self.dictionaries();
		let mut changes = DictionaryChanges::new();
		let mut table_columns = Vec::with_capacity(columns.len());
		for (index, mut column) in columns.into_iter().enumerate() {
			column.table = table.id;
			column.id = ColumnId(index as i32 + 1);
			if column.ty.is_dict_encoded() {
				let id = self.next_temp_dictionary_id();
				if let Err(err) = dictionaries.create_temporary(&mut changes, id, &mut column) {
					dictionaries.rollback(&changes);
					return Err(err);
				}
			}
			table_columns.push(column);
		}

		self.materialized.update(|r| {
			changes.apply(r);
			r.add_table(table.clone(), table_columns);
		});

		self.announce(&table, &[])?;
		info!(table = *table.id, "temporary table created");
		Ok(table)
	}

	fn write_table(
		&self,
		txn: &DualTxn<'_>,
		dictionaries: &DictionaryManager<'_>,
		changes: &mut DictionaryChanges,
		roles: &mut RoleState,
		request: &TableToCreate,
		columns: &[ColumnDef],
	) -> Result<Staged> {
		let owner = require_owner(txn.sys(), request.owner)?;
		let staged = self.stage_table(txn.db(), dictionaries, changes, request, &request.name, NOT_A_SHARD, columns)?;
		self.system.grant_ownership(roles, txn.sys(), &owner, self.object_key(&staged.0), &staged.0.name)?;
		Ok(staged)
	}

	fn write_sharded_table(
		&self,
		txn: &DualTxn<'_>,
		dictionaries: &DictionaryManager<'_>,
		changes: &mut DictionaryChanges,
		roles: &mut RoleState,
		request: &TableToCreate,
		columns: &[ColumnDef],
	) -> Result<(Staged, Vec<Staged>)> {
		let owner = require_owner(txn.sys(), request.owner)?;
		let logical = self.stage_table(txn.db(), dictionaries, changes, request, &request.name, NOT_A_SHARD, columns)?;

		let mut shards = Vec::with_capacity(request.shard_count as usize);
		for index in 0..request.shard_count {
			let name = TableDef::shard_name(&request.name, index);
			let shard = self.stage_table(txn.db(), dictionaries, changes, request, &name, index, columns)?;
			CatalogStore::create_physical_table_link(txn.db(), logical.0.id, shard.0.id)?;
			shards.push(shard);
		}

		self.system.grant_ownership(roles, txn.sys(), &owner, self.object_key(&logical.0), &logical.0.name)?;
		Ok((logical, shards))
	}

	/// Writes the table row, its columns with their dictionaries and the view
	/// SQL. Column ids are dense from 1 in the given order.
	#[allow(clippy::too_many_arguments)]
	fn stage_table(
		&self,
		tx: &impl Queryable,
		dictionaries: &DictionaryManager<'_>,
		changes: &mut DictionaryChanges,
		request: &TableToCreate,
		name: &str,
		shard: i32,
		columns: &[ColumnDef],
	) -> Result<Staged> {
		let mut table = new_table_def(request, name, shard, columns.len());
		table.id = CatalogStore::create_table(tx, &table)?;

		let mut written: Vec<ColumnDef> = Vec::with_capacity(columns.len());
		for (index, template) in columns.iter().enumerate() {
			let mut column = template.clone();
			column.table = table.id;
			column.id = ColumnId(index as i32 + 1);

			if column.ty.is_dict_encoded() {
				let shared = request
					.shared_dictionaries
					.iter()
					.find(|s| name_key(&s.column) == name_key(&column.name));
				if shard != NOT_A_SHARD {
					DictionaryManager::placeholder(&mut column);
				} else if let Some(shared) = shared {
					dictionaries.share(
						tx,
						&self.materialized,
						changes,
						&request.name,
						&written,
						&mut column,
						shared,
						&request.shared_dictionaries,
					)?;
				} else {
					dictionaries.create(tx, changes, name, &mut column)?;
				}
			}

			CatalogStore::create_column(tx, &column)?;
			written.push(column);
		}

		if let Some(sql) = &request.view_sql {
			CatalogStore::create_view(tx, table.id, sql)?;
		}
		Ok((table, written))
	}

	pub(super) fn check_table_name_free(&self, name: &str) -> Result<()> {
		if let Some(existing) = self.materialized.find_table_by_name(name) {
			let kind = if existing.is_view {
				CatalogObjectKind::View
			} else {
				CatalogObjectKind::Table
			};
			return Err(CatalogError::AlreadyExists {
				kind,
				name: name.to_string(),
			}
			.into());
		}
		Ok(())
	}

	/// Notifies the plan cache of a published table and its shards. If the
	/// cache refuses, the table is dropped again and the error returned.
	fn announce(&self, table: &TableDef, shards: &[TableDef]) -> Result<()> {
		for announced in shards.iter().chain(once(table)) {
			if let Err(err) = self.notify(&announced.name) {
				warn!(table = %table.name, "plan cache refused new table, dropping it: {}", err.message);
				if let Err(undo) = self.drop_locked(table, false) {
					error!(table = %table.name, "cannot undo table creation: {}", undo.message);
				}
				return Err(err);
			}
		}
		Ok(())
	}
}

fn new_table_def(request: &TableToCreate, name: &str, shard: i32, column_count: usize) -> TableDef {
	TableDef {
		id: TableId(0),
		name: name.to_string(),
		owner: request.owner,
		column_count: column_count as i32,
		is_view: request.is_view(),
		view_sql: request.view_sql.clone().unwrap_or_default(),
		fragments: String::new(),
		fragmenter: FragmenterKind::InsertOrder,
		max_fragment_rows: request.max_fragment_rows,
		max_chunk_size: request.max_chunk_size,
		page_size: request.page_size,
		max_rows: request.max_rows,
		partitions: request.partitions.clone(),
		shard_column_id: request.shard_column_id,
		shard,
		shard_count: if shard == NOT_A_SHARD {
			request.shard_count
		} else {
			0
		},
		key_metainfo: request.key_metainfo.clone(),
		has_deleted_column: request.with_deleted_column,
		persistence: request.persistence,
	}
}
