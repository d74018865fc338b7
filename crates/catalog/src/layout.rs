// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! On-disk layout below the base path:
//!
//! ```text
//! <base>/mapd_catalogs/<dbname>          one row store per database
//! <base>/mapd_data/DB_<db>_DICT_<dict>   one folder per dictionary
//! ```
//!
//! The system tables live in the file of the default database.

use std::path::{Path, PathBuf};

use anacat_core::interface::SYSTEM_DATABASE_NAME;
use anacat_type::{DatabaseId, DictionaryId};

pub const CATALOGS_DIR: &str = "mapd_catalogs";
pub const DATA_DIR: &str = "mapd_data";

pub fn catalogs_dir(base: &Path) -> PathBuf {
	base.join(CATALOGS_DIR)
}

pub fn data_dir(base: &Path) -> PathBuf {
	base.join(DATA_DIR)
}

pub fn catalog_file(base: &Path, db_name: &str) -> PathBuf {
	catalogs_dir(base).join(db_name)
}

pub fn system_catalog_file(base: &Path) -> PathBuf {
	catalog_file(base, SYSTEM_DATABASE_NAME)
}

pub fn dictionary_folder(base: &Path, db: DatabaseId, dict: DictionaryId) -> PathBuf {
	data_dir(base).join(dictionary_folder_name(db, dict))
}

pub fn dictionary_folder_name(db: DatabaseId, dict: DictionaryId) -> String {
	format!("DB_{}_DICT_{}", db, dict)
}

/// Folder naming used before dictionary folders were keyed by id.
pub fn legacy_dictionary_folder(base: &Path, db_name: &str, dict_name: &str) -> PathBuf {
	data_dir(base).join(format!("{}_{}", db_name, dict_name))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dictionary_folder() {
		let path = dictionary_folder(Path::new("/base"), DatabaseId(2), DictionaryId(7));
		assert_eq!(path, PathBuf::from("/base/mapd_data/DB_2_DICT_7"));
	}

	#[test]
	fn test_system_file_is_default_database() {
		assert_eq!(system_catalog_file(Path::new("/b")), PathBuf::from("/b/mapd_catalogs/mapd"));
	}
}
