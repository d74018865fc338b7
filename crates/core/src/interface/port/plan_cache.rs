// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// Metadata cache of the SQL compiler.
pub trait PlanCache: Send + Sync {
	/// Invalidates cached metadata for `table` in `database`. An empty table
	/// name invalidates the whole database.
	fn update_metadata(&self, database: &str, table: &str) -> crate::Result<()>;
}
