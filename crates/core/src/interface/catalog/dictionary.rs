// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use anacat_type::{DatabaseId, DictionaryId};
use serde::{Deserialize, Serialize};

/// Globally unique reference to a dictionary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DictRef {
	pub db: DatabaseId,
	pub dict: DictionaryId,
}

impl DictRef {
	pub fn new(db: DatabaseId, dict: DictionaryId) -> Self {
		Self {
			db,
			dict,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryDef {
	pub dict_ref: DictRef,
	pub name: String,
	pub nbits: i32,
	pub is_shared: bool,
	pub refcount: i32,
	pub folder: PathBuf,
	pub is_temp: bool,
}

/// Declares that `column` reuses the dictionary of `foreign_table.foreign_column`.
///
/// `foreign_table` may name the table being created, in which case the
/// dictionary is shared between two columns of the same table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedDictionaryDef {
	pub column: String,
	pub foreign_table: String,
	pub foreign_column: String,
}

impl SharedDictionaryDef {
	pub fn new(
		column: impl Into<String>,
		foreign_table: impl Into<String>,
		foreign_column: impl Into<String>,
	) -> Self {
		Self {
			column: column.into(),
			foreign_table: foreign_table.into(),
			foreign_column: foreign_column.into(),
		}
	}
}
