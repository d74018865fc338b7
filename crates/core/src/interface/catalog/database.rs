// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{DatabaseId, UserId};
use serde::{Deserialize, Serialize};

/// Name of the default database; its catalog shares the system store.
pub const SYSTEM_DATABASE_NAME: &str = "mapd";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDef {
	pub id: DatabaseId,
	pub name: String,
	pub owner: UserId,
}
