// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod column;
mod dashboard;
mod database;
mod dictionary;
mod link;
mod object;
mod table;
mod user;

pub use column::{ColumnDef, ColumnFilter, ColumnToCreate, DELETED_COLUMN_NAME, ROWID_COLUMN_NAME, ROWID_EXPRESSION};
pub use dashboard::{DashboardDef, DashboardToCreate};
pub use database::{DatabaseDef, SYSTEM_DATABASE_NAME};
pub use dictionary::{DictRef, DictionaryDef, SharedDictionaryDef};
pub use link::LinkDef;
pub use object::DbObject;
pub use table::{
	DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_FRAGMENT_ROWS, DEFAULT_MAX_ROWS, DEFAULT_PAGE_SIZE, FragmenterKind, Persistence, SHARD_TAG,
	TableDef, TableToCreate,
};
pub use user::{ROOT_USER_NAME, UserDef};
