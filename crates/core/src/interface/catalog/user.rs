// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::UserId;
use serde::{Deserialize, Serialize};

pub const ROOT_USER_NAME: &str = "mapd";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDef {
	pub id: UserId,
	pub name: String,
	#[serde(skip_serializing, default)]
	pub password: String,
	pub is_super: bool,
}

impl UserDef {
	pub fn is_root(&self) -> bool {
		self.id.is_root()
	}
}
