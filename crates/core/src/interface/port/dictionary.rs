// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, sync::Arc};

use crate::interface::catalog::DictRef;

/// Where a string table is materialized from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryLocation {
	Local {
		folder: PathBuf,
		is_temp: bool,
	},
	Remote {
		host: String,
		dict_ref: DictRef,
	},
}

/// An opened string table.
pub trait StringDictionary: Send + Sync {
	fn location(&self) -> &DictionaryLocation;

	fn entry_count(&self) -> usize;
}

/// The string dictionary server, local or remote.
pub trait DictionaryService: Send + Sync {
	fn create(&self, dict_ref: DictRef, is_temp: bool) -> crate::Result<()>;

	fn drop_dictionary(&self, dict_ref: DictRef) -> crate::Result<()>;

	fn open(&self, location: DictionaryLocation) -> crate::Result<Arc<dyn StringDictionary>>;
}
