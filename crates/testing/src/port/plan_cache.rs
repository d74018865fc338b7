// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{Result, internal_err};
use parking_lot::Mutex;

#[derive(Default)]
struct State {
	notifications: Vec<(String, String)>,
	fail_next: bool,
}

/// Plan cache fake. Records notifications and can be told to fail once.
#[derive(Default)]
pub struct RecordingPlanCache {
	state: Mutex<State>,
}

impl RecordingPlanCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// The next `update_metadata` call returns an error.
	pub fn fail_next(&self) {
		self.state.lock().fail_next = true;
	}

	pub fn notifications(&self) -> Vec<(String, String)> {
		self.state.lock().notifications.clone()
	}

	pub fn was_notified(&self, database: &str, table: &str) -> bool {
		self.state.lock().notifications.iter().any(|(d, t)| d == database && t == table)
	}
}

impl anacat_core::interface::PlanCache for RecordingPlanCache {
	fn update_metadata(&self, database: &str, table: &str) -> Result<()> {
		let mut state = self.state.lock();
		if state.fail_next {
			state.fail_next = false;
			return internal_err!("plan cache unavailable while refreshing {}.{}", database, table);
		}
		state.notifications.push((database.to_string(), table.to_string()));
		Ok(())
	}
}
