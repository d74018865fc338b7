// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{
	Error,
	error,
	error::diagnostic::store::{statement_failure, store_failure},
};

pub fn store_error(err: rusqlite::Error) -> Error {
	error!(store_failure(err.to_string()))
}

pub(crate) fn statement_error(sql: &str, err: rusqlite::Error) -> Error {
	error!(statement_failure(sql, err.to_string()))
}
