// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

pub mod diagnostic;
mod r#macro;

pub use diagnostic::{Diagnostic, IntoDiagnostic, render::DefaultRenderer};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn code(&self) -> &str {
		self.0.code.as_str()
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		crate::error!(diagnostic::io::io_error(err))
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		crate::error!(diagnostic::io::json_error(err))
	}
}

/// Failures decoding persisted type descriptors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
	#[error("unknown sql type code {code}")]
	UnknownSqlType {
		code: i32,
	},

	#[error("unknown encoding code {code}")]
	UnknownEncoding {
		code: i32,
	},

	#[error("unknown object type code {code}")]
	UnknownObjectType {
		code: i32,
	},
}

impl IntoDiagnostic for TypeError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		let code = match self {
			TypeError::UnknownSqlType {
				..
			} => "TYPE_001",
			TypeError::UnknownEncoding {
				..
			} => "TYPE_002",
			TypeError::UnknownObjectType {
				..
			} => "TYPE_003",
		};

		Diagnostic {
			code: code.to_string(),
			message,
			label: Some("persisted code is not recognized".to_string()),
			help: Some("the catalog was likely written by a newer version".to_string()),
			..Diagnostic::default()
		}
	}
}

impl From<TypeError> for Error {
	fn from(err: TypeError) -> Self {
		Error(err.into_diagnostic())
	}
}
