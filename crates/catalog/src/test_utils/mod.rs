// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, sync::Arc};

use anacat_core::interface::{
	ColumnDef, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_FRAGMENT_ROWS, DEFAULT_MAX_ROWS, DEFAULT_PAGE_SIZE, DashboardDef,
	DictRef, DictionaryDef, FragmenterKind, Persistence, TableDef,
};
use anacat_testing::{TestPorts, temp_dir};
use anacat_type::{ColumnId, DashboardId, DatabaseId, DictionaryId, SqlType, TableId, TypeInfo, UserId};

use crate::{CatalogConfig, CatalogContext};

pub(crate) fn table_def(id: i32, name: &str) -> TableDef {
	TableDef {
		id: TableId(id),
		name: name.to_string(),
		owner: UserId::ROOT,
		column_count: 0,
		is_view: false,
		view_sql: String::new(),
		fragments: String::new(),
		fragmenter: FragmenterKind::InsertOrder,
		max_fragment_rows: DEFAULT_MAX_FRAGMENT_ROWS,
		max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
		page_size: DEFAULT_PAGE_SIZE,
		max_rows: DEFAULT_MAX_ROWS,
		partitions: String::new(),
		shard_column_id: 0,
		shard: -1,
		shard_count: 0,
		key_metainfo: "[]".to_string(),
		has_deleted_column: false,
		persistence: Persistence::Disk,
	}
}

pub(crate) fn column_def(table: i32, id: i32, name: &str, sql_type: SqlType) -> ColumnDef {
	ColumnDef {
		table: TableId(table),
		id: ColumnId(id),
		name: name.to_string(),
		ty: TypeInfo::new(sql_type),
		is_system: false,
		is_virtual: false,
		virtual_expr: String::new(),
		is_deleted: false,
	}
}

pub(crate) fn dictionary_def(db: i32, dict: i32) -> DictionaryDef {
	DictionaryDef {
		dict_ref: DictRef::new(DatabaseId(db), DictionaryId(dict)),
		name: format!("dict{}", dict),
		nbits: 32,
		is_shared: false,
		refcount: 1,
		folder: PathBuf::from(format!("DB_{}_DICT_{}", db, dict)),
		is_temp: false,
	}
}

pub(crate) fn dashboard_def(id: i32, user: i32, name: &str) -> DashboardDef {
	DashboardDef {
		id: DashboardId(id),
		name: name.to_string(),
		user: UserId(user),
		state: String::new(),
		image_hash: String::new(),
		update_time: String::new(),
		metadata: String::new(),
	}
}

/// Runs `f` against a freshly initialized installation in a temp directory.
pub(crate) fn with_context<R>(privileges: bool, f: impl FnOnce(&CatalogContext, &TestPorts) -> R) -> R {
	temp_dir(|dir| {
		let ports = TestPorts::new();
		let config = CatalogConfig::new(dir).with_privileges(privileges);
		let context = CatalogContext::init(config, true, ports.ports()).unwrap();
		f(&context, &ports)
	})
}

pub(crate) fn default_catalog(context: &CatalogContext) -> Arc<crate::Catalog> {
	context.catalog(anacat_core::interface::SYSTEM_DATABASE_NAME).unwrap()
}
