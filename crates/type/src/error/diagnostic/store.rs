// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// STORE_001: the row store rejected or failed a statement
pub fn store_failure(message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_001".to_string(),
		statement: None,
		message: message.into(),
		column: None,
		label: Some("row store operation failed".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// STORE_001 with the offending statement attached
pub fn statement_failure(sql: &str, message: impl Into<String>) -> Diagnostic {
	let mut result = store_failure(message);
	result.statement = Some(sql.to_string());
	result
}
