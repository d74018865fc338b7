// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory indices over one database's schema.
//!
//! Descriptors live in id keyed maps; every name index stores ids only. All
//! indices sit behind one mutex, and mutations go through [`Registry`]
//! methods inside [`MaterializedCatalog::update`] so index pairs stay in sync.

use std::{collections::HashMap, sync::Arc};

use anacat_core::interface::{
	ColumnDef, DashboardDef, DictionaryDef, Fragmenter, LinkDef, StringDictionary, TableDef,
};
use anacat_type::{ColumnId, DashboardId, DictionaryId, LinkId, TableId, UserId};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

mod column;
mod dashboard;
mod dictionary;
mod link;
pub(crate) mod load;
mod physical;
mod table;

pub(crate) type FragmenterCell = Arc<OnceCell<Arc<dyn Fragmenter>>>;
pub(crate) type StringDictionaryCell = Arc<OnceCell<Arc<dyn StringDictionary>>>;

pub(crate) struct TableEntry {
	pub def: TableDef,
	pub fragmenter: FragmenterCell,
}

pub(crate) struct DictionaryEntry {
	pub def: DictionaryDef,
	pub string_dict: StringDictionaryCell,
}

#[derive(Default)]
pub(crate) struct Registry {
	tables: HashMap<TableId, TableEntry>,
	tables_by_name: HashMap<String, TableId>,
	columns: HashMap<(TableId, ColumnId), ColumnDef>,
	columns_by_name: HashMap<(TableId, String), ColumnId>,
	dictionaries: HashMap<DictionaryId, DictionaryEntry>,
	dashboards: HashMap<DashboardId, DashboardDef>,
	dashboards_by_name: HashMap<(UserId, String), DashboardId>,
	links: HashMap<LinkId, LinkDef>,
	links_by_token: HashMap<String, LinkId>,
	physical_tables: HashMap<TableId, Vec<TableId>>,
	deleted_columns: HashMap<TableId, ColumnId>,
}

/// Names are matched case-insensitively.
pub(crate) fn name_key(name: &str) -> String {
	name.to_uppercase()
}

#[derive(Default)]
pub struct MaterializedCatalog {
	inner: Mutex<Registry>,
}

impl MaterializedCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Runs `f` with the registry locked. The whole mutation is visible to
	/// readers at once.
	pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
		let mut registry = self.inner.lock();
		f(&mut registry)
	}

	pub(crate) fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
		let registry = self.inner.lock();
		f(&registry)
	}
}
