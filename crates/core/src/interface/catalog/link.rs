// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{LinkId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDef {
	pub id: LinkId,
	pub user: UserId,
	/// Short token derived from the view state, unique per database.
	pub link: String,
	pub view_state: String,
	pub update_time: String,
	pub view_metadata: String,
}
