// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn io_error(err: std::io::Error) -> Diagnostic {
	Diagnostic {
		code: "IO_001".to_string(),
		message: format!("i/o failure: {}", err),
		label: Some(format!("{:?}", err.kind())),
		..Diagnostic::default()
	}
}

pub fn json_error(err: serde_json::Error) -> Diagnostic {
	Diagnostic {
		code: "IO_002".to_string(),
		message: format!("malformed json: {}", err),
		label: Some(format!("line {} column {}", err.line(), err.column())),
		..Diagnostic::default()
	}
}
