// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod id;
pub mod privilege;
pub mod sql;

pub use error::{Diagnostic, Error, IntoDiagnostic, TypeError};
pub use id::{ColumnId, DashboardId, DatabaseId, DictionaryId, LinkId, TEMPORARY_ID_START, TableId, UserId};
pub use privilege::{AccessPrivileges, DbObjectKey, DbObjectType};
pub use sql::{Encoding, SqlType, TypeInfo};

pub type Result<T> = std::result::Result<T, Error>;
