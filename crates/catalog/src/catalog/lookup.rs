// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use anacat_core::interface::{
	ColumnDef, ColumnFilter, DashboardDef, DictionaryDef, Fragmenter, FragmenterRequest, LinkDef, StringDictionary, TableDef,
};
use anacat_type::{ColumnId, DashboardId, DictionaryId, LinkId, TableId, UserId};
use tracing::debug;

use super::Catalog;
use crate::Result;

impl Catalog {
	pub fn find_table(&self, id: TableId) -> Option<TableDef> {
		self.materialized.find_table(id)
	}

	pub fn find_table_by_name(&self, name: &str) -> Option<TableDef> {
		self.materialized.find_table_by_name(name)
	}

	/// Every table, view and physical shard, ordered by id.
	pub fn list_tables(&self) -> Vec<TableDef> {
		self.materialized.list_tables()
	}

	pub fn find_column(&self, table: TableId, id: ColumnId) -> Option<ColumnDef> {
		self.materialized.find_column(table, id)
	}

	pub fn find_column_by_name(&self, table: TableId, name: &str) -> Option<ColumnDef> {
		self.materialized.find_column_by_name(table, name)
	}

	/// Columns of a table ordered by id, hidden and system columns included.
	pub fn list_columns(&self, table: TableId) -> Vec<ColumnDef> {
		self.materialized.list_columns(table)
	}

	pub fn list_columns_filtered(&self, table: TableId, filter: ColumnFilter) -> Vec<ColumnDef> {
		self.materialized.list_columns_filtered(table, filter)
	}

	pub fn deleted_column(&self, table: TableId) -> Option<ColumnDef> {
		self.materialized.deleted_column(table)
	}

	pub fn find_dictionary(&self, id: DictionaryId) -> Option<DictionaryDef> {
		self.materialized.find_dictionary(id)
	}

	/// The string table behind a dictionary, loaded on first use.
	pub fn dictionary(&self, id: DictionaryId) -> Result<Option<Arc<dyn StringDictionary>>> {
		self.dictionaries().load(&self.materialized, id)
	}

	/// The string table a column encodes against. Shard columns resolve
	/// through their logical table.
	pub fn column_dictionary(&self, table: TableId, column: ColumnId) -> Result<Option<Arc<dyn StringDictionary>>> {
		match self.materialized.resolve_column_dictionary(table, column) {
			Some(dict_ref) => self.dictionary(dict_ref.dict),
			None => Ok(None),
		}
	}

	pub fn find_dashboard(&self, id: DashboardId) -> Option<DashboardDef> {
		self.materialized.find_dashboard(id)
	}

	pub fn find_dashboard_by_name(&self, user: UserId, name: &str) -> Option<DashboardDef> {
		self.materialized.find_dashboard_by_name(user, name)
	}

	pub fn list_dashboards(&self) -> Vec<DashboardDef> {
		self.materialized.list_dashboards()
	}

	pub fn find_link(&self, id: LinkId) -> Option<LinkDef> {
		self.materialized.find_link(id)
	}

	pub fn find_link_by_token(&self, token: &str) -> Option<LinkDef> {
		self.materialized.find_link_by_token(token)
	}

	/// The tables holding a table's data: its shards in index order for a
	/// logical table, the table itself otherwise.
	pub fn physical_tables(&self, table: TableId) -> Vec<TableDef> {
		let Some(def) = self.materialized.find_table(table) else {
			return vec![];
		};
		let shards = self.shards_of(&def);
		if shards.is_empty() {
			vec![def]
		} else {
			shards
		}
	}

	/// The fragmenter of a table, built by the storage engine on first
	/// request and cached until the table is truncated or its epoch reset.
	/// Views and logical tables have none.
	pub fn fragmenter(&self, table: TableId) -> Result<Option<Arc<dyn Fragmenter>>> {
		let Some((def, cell)) =
			self.materialized.read(|r| Some((r.find_table(table)?.clone(), r.fragmenter_cell(table)?)))
		else {
			return Ok(None);
		};
		if !def.needs_fragmenter() {
			return Ok(None);
		}

		let fragmenter = cell.get_or_try_init(|| {
			let columns: Vec<ColumnDef> = self
				.materialized
				.list_columns(table)
				.into_iter()
				.filter(|c| c.has_storage() && !c.is_deleted)
				.collect();
			debug!(table = *table, columns = columns.len(), "building fragmenter");

			self.ports().storage.create_fragmenter(FragmenterRequest {
				db: self.db.id,
				table,
				columns,
				max_fragment_rows: def.max_fragment_rows,
				max_chunk_size: def.max_chunk_size,
				page_size: def.page_size,
				max_rows: def.max_rows,
				persistence: def.persistence,
			})
		})?;
		Ok(Some(fragmenter.clone()))
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use anacat_core::interface::{ColumnFilter, ColumnToCreate, TableToCreate};
	use anacat_testing::StorageCall;
	use anacat_type::{ColumnId, SqlType, TypeInfo, UserId};

	use crate::test_utils::{default_catalog, with_context};

	#[test]
	fn test_fragmenter_built_once() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			let table = catalog
				.create_table(
					TableToCreate::new("t", UserId::ROOT)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
						.with_column(ColumnToCreate::new("b", TypeInfo::dict_text(32)))
						.with_deleted_column(),
				)
				.unwrap();

			let handles: Vec<_> = (0..4)
				.map(|_| {
					let catalog = catalog.clone();
					thread::spawn(move || catalog.fragmenter(table.id).unwrap().unwrap())
				})
				.collect();
			let fragmenters: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

			assert_eq!(ports.storage.fragmenters_created(table.id), 1);
			assert!(fragmenters.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
			assert!(ports.storage.calls().contains(&StorageCall::CreateFragmenter {
				table: table.id,
				columns: vec![ColumnId(1), ColumnId(2)],
			}));
		});
	}

	#[test]
	fn test_logical_table_has_no_fragmenter() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let logical = catalog
				.create_table(
					TableToCreate::new("s", UserId::ROOT)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
						.sharded(2, 1),
				)
				.unwrap();
			assert!(catalog.fragmenter(logical.id).unwrap().is_none());
			let shard = &catalog.physical_tables(logical.id)[0];
			assert!(catalog.fragmenter(shard.id).unwrap().is_some());
		});
	}

	#[test]
	fn test_column_filters() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let table = catalog
				.create_table(
					TableToCreate::new("shapes", UserId::ROOT)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
						.with_column(ColumnToCreate::new("area", TypeInfo::new(SqlType::Polygon)))
						.with_deleted_column(),
				)
				.unwrap();
			let names = |filter| -> Vec<String> {
				catalog.list_columns_filtered(table.id, filter).into_iter().map(|c| c.name).collect()
			};

			assert_eq!(names(ColumnFilter::USER), vec!["a", "area"]);
			assert_eq!(names(ColumnFilter::ALL).len(), 8);
			assert_eq!(
				names(ColumnFilter {
					fetch_system: true,
					..ColumnFilter::USER
				}),
				vec!["a", "area", "$deleted$"]
			);
			assert_eq!(
				names(ColumnFilter {
					fetch_physical: true,
					..ColumnFilter::USER
				}),
				vec!["a", "area", "area_coords", "area_ring_sizes", "area_poly_rings", "area_render_group"]
			);
		});
	}

	#[test]
	fn test_physical_tables_of_plain_table() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let table = catalog
				.create_table(
					TableToCreate::new("t", UserId::ROOT)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int))),
				)
				.unwrap();
			assert_eq!(catalog.physical_tables(table.id), vec![table]);
		});
	}

	#[test]
	fn test_column_dictionary_of_shard_resolves_to_logical() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let logical = catalog
				.create_table(
					TableToCreate::new("s", UserId::ROOT)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
						.with_column(ColumnToCreate::new("name", TypeInfo::dict_text(32)))
						.sharded(2, 1),
				)
				.unwrap();
			let shard = &catalog.physical_tables(logical.id)[1];

			let from_shard = catalog.column_dictionary(shard.id, ColumnId(2)).unwrap().unwrap();
			let from_logical = catalog.column_dictionary(logical.id, ColumnId(2)).unwrap().unwrap();
			assert!(Arc::ptr_eq(&from_shard, &from_logical));
		});
	}
}
