// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{DashboardId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDef {
	pub id: DashboardId,
	pub name: String,
	pub user: UserId,
	pub state: String,
	pub image_hash: String,
	pub update_time: String,
	pub metadata: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardToCreate {
	pub name: String,
	pub user: UserId,
	pub state: String,
	pub image_hash: String,
	pub metadata: String,
}
