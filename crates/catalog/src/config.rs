// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::{Path, PathBuf};

use anacat_sqlite::SqliteConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
	/// Root of the on-disk layout. See [`crate::layout`].
	pub base_path: PathBuf,
	/// Object level privileges; when off the legacy select/insert ACL applies.
	pub privileges_enabled: bool,
	/// Remote string dictionary servers. Empty means dictionaries are local.
	pub string_dict_hosts: Vec<String>,
	/// Connection settings applied to every catalog file. The path is ignored.
	pub sqlite: SqliteConfig,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			base_path: PathBuf::from("data"),
			privileges_enabled: true,
			string_dict_hosts: vec![],
			sqlite: SqliteConfig::default(),
		}
	}
}

impl CatalogConfig {
	pub fn new(base_path: impl AsRef<Path>) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
			..Self::default()
		}
	}

	pub fn with_privileges(mut self, enabled: bool) -> Self {
		self.privileges_enabled = enabled;
		self
	}

	pub fn with_string_dict_hosts(mut self, hosts: Vec<String>) -> Self {
		self.string_dict_hosts = hosts;
		self
	}

	pub fn with_sqlite(mut self, sqlite: SqliteConfig) -> Self {
		self.sqlite = sqlite;
		self
	}

	pub fn has_remote_dictionaries(&self) -> bool {
		!self.string_dict_hosts.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_fields_take_defaults() {
		let config: CatalogConfig = serde_json::from_str(r#"{"base_path": "/srv/db"}"#).unwrap();
		assert_eq!(config.base_path, PathBuf::from("/srv/db"));
		assert!(config.privileges_enabled);
		assert!(!config.has_remote_dictionaries());
	}
}
