// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use anacat_type::{Diagnostic, Error, IntoDiagnostic};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CatalogObjectKind {
	Database,
	User,
	Role,
	Table,
	View,
	Column,
	Dictionary,
	Dashboard,
	Link,
	Grant,
}

impl Display for CatalogObjectKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			CatalogObjectKind::Database => "database",
			CatalogObjectKind::User => "user",
			CatalogObjectKind::Role => "role",
			CatalogObjectKind::Table => "table",
			CatalogObjectKind::View => "view",
			CatalogObjectKind::Column => "column",
			CatalogObjectKind::Dictionary => "dictionary",
			CatalogObjectKind::Dashboard => "dashboard",
			CatalogObjectKind::Link => "link",
			CatalogObjectKind::Grant => "grant",
		})
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
	#[error("{kind} `{name}` already exists")]
	AlreadyExists {
		kind: CatalogObjectKind,
		name: String,
	},

	#[error("{kind} `{name}` not found")]
	NotFound {
		kind: CatalogObjectKind,
		name: String,
	},

	#[error("shard column id {column_id} of table `{table}` is outside 1..={column_count}")]
	InvalidShardColumn {
		table: String,
		column_id: i32,
		column_count: i32,
	},

	#[error("column name `{column}` of table `{table}` is reserved")]
	ReservedColumnName {
		table: String,
		column: String,
	},

	#[error("geometry column `{column}` is not supported in temporary table `{table}`")]
	TemporaryGeometry {
		table: String,
		column: String,
	},

	#[error("role `{role}` is the private role of a user")]
	PrivateRole {
		role: String,
	},

	#[error("role `{role}` is not granted to user `{user}`")]
	RoleNotGranted {
		role: String,
		user: String,
	},

	#[error("privilege checking is disabled")]
	PrivilegesDisabled,

	#[error("{message}")]
	InvalidArgument {
		message: String,
	},

	#[error("{message}")]
	PermissionDenied {
		message: String,
	},

	#[error("{message}")]
	Inconsistent {
		message: String,
	},
}

impl CatalogError {
	pub fn code(&self) -> &'static str {
		match self {
			CatalogError::AlreadyExists {
				..
			} => "CA_001",
			CatalogError::NotFound {
				..
			} => "CA_002",
			CatalogError::InvalidShardColumn {
				..
			}
			| CatalogError::ReservedColumnName {
				..
			}
			| CatalogError::TemporaryGeometry {
				..
			}
			| CatalogError::PrivateRole {
				..
			}
			| CatalogError::RoleNotGranted {
				..
			}
			| CatalogError::PrivilegesDisabled
			| CatalogError::InvalidArgument {
				..
			} => "CA_003",
			CatalogError::PermissionDenied {
				..
			} => "CA_004",
			CatalogError::Inconsistent {
				..
			} => "CA_005",
		}
	}

	fn help(&self) -> Option<String> {
		match self {
			CatalogError::AlreadyExists {
				kind,
				..
			} => Some(format!("choose a different {} name", kind)),
			CatalogError::NotFound {
				kind,
				..
			} => Some(format!("check the {} name and the current database", kind)),
			CatalogError::InvalidShardColumn {
				..
			} => Some("the shard column must be one of the declared columns".to_string()),
			CatalogError::ReservedColumnName {
				..
			} => Some("rename the column".to_string()),
			CatalogError::PrivateRole {
				..
			} => Some("private roles are removed together with their user".to_string()),
			CatalogError::PrivilegesDisabled => {
				Some("enable privilege checking in the catalog configuration".to_string())
			}
			CatalogError::Inconsistent {
				..
			} => Some("restart the server to rebuild the catalog from storage".to_string()),
			_ => None,
		}
	}
}

impl IntoDiagnostic for CatalogError {
	fn into_diagnostic(self) -> Diagnostic {
		let label = match &self {
			CatalogError::AlreadyExists {
				..
			} => Some("duplicate name".to_string()),
			CatalogError::NotFound {
				..
			} => Some("unknown name".to_string()),
			CatalogError::PermissionDenied {
				..
			} => Some("insufficient privileges".to_string()),
			CatalogError::Inconsistent {
				..
			} => Some("catalog state is inconsistent".to_string()),
			_ => Some("invalid request".to_string()),
		};

		let column = match &self {
			CatalogError::ReservedColumnName {
				column,
				..
			}
			| CatalogError::TemporaryGeometry {
				column,
				..
			} => Some(column.clone()),
			_ => None,
		};

		Diagnostic {
			code: self.code().to_string(),
			statement: None,
			message: self.to_string(),
			column,
			label,
			help: self.help(),
			notes: vec![],
			cause: None,
		}
	}
}

impl From<CatalogError> for Error {
	fn from(err: CatalogError) -> Self {
		Error(err.into_diagnostic())
	}
}
