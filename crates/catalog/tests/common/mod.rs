// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use anacat_catalog::{Catalog, CatalogConfig, CatalogContext, layout};
use anacat_core::interface::{ColumnToCreate, TableToCreate};
use anacat_sqlite::{Queryable, RowStore, SqliteConfig, ToSql};
use anacat_testing::{TestPorts, init_test_logging, temp_dir};
use anacat_type::{DbObjectKey, SqlType, TypeInfo, UserId};

/// A fresh installation with privilege checking enabled.
pub fn with_installation<R>(f: impl FnOnce(&Path, &CatalogContext, &TestPorts) -> R) -> R {
	init_test_logging();
	temp_dir(|dir| {
		let ports = TestPorts::new();
		let context = CatalogContext::init(CatalogConfig::new(dir), true, ports.ports()).unwrap();
		f(dir, &context, &ports)
	})
}

/// Opens an existing installation, as a restarted server would.
pub fn reopen(dir: &Path) -> (CatalogContext, TestPorts) {
	let ports = TestPorts::new();
	let context = CatalogContext::init(CatalogConfig::new(dir), false, ports.ports()).unwrap();
	(context, ports)
}

pub fn default_catalog(context: &CatalogContext) -> Arc<Catalog> {
	context.catalog("mapd").unwrap()
}

pub fn int(name: &str) -> ColumnToCreate {
	ColumnToCreate::new(name, TypeInfo::new(SqlType::Int))
}

pub fn text(name: &str) -> ColumnToCreate {
	ColumnToCreate::new(name, TypeInfo::dict_text(32))
}

pub fn table(name: &str, owner: UserId, columns: Vec<ColumnToCreate>) -> TableToCreate {
	columns.into_iter().fold(TableToCreate::new(name, owner), |request, column| request.with_column(column))
}

fn count_grant_rows(dir: &Path, filter: &str, params: &[&dyn ToSql]) -> i64 {
	let store = RowStore::open(SqliteConfig::new(layout::system_catalog_file(dir))).unwrap();
	let sql = format!("SELECT count(*) FROM mapd_object_permissions WHERE {}", filter);
	store.query(&sql, params).unwrap().first().unwrap().get_i64(0)
}

/// Grant rows on `key` as written to the system store file.
pub fn stored_grants_on(dir: &Path, key: DbObjectKey) -> i64 {
	count_grant_rows(
		dir,
		"objectPermissionsType = ?1 AND dbId = ?2 AND objectId = ?3",
		&[&key.object_type.code(), &*key.db_id, &key.object_id],
	)
}

/// Grant rows held by `role`, its marker row included.
pub fn stored_grants_of(dir: &Path, role: &str) -> i64 {
	count_grant_rows(dir, "upper(roleName) = upper(?1)", &[&role])
}
