// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{env, fs, path::Path};

use uuid::Uuid;

/// Runs `f` with a fresh, empty directory that is removed afterwards.
pub fn temp_dir<F, R>(f: F) -> R
where
	F: FnOnce(&Path) -> R,
{
	let mut path = env::temp_dir();
	path.push(format!("anacat-{}", Uuid::new_v4()));

	fs::create_dir(&path).unwrap_or_else(|e| panic!("cannot create {}: {}", path.display(), e));
	let result = f(&path);

	let _ = fs::remove_dir_all(&path);
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_removed_afterwards() {
		let kept = temp_dir(|path| {
			assert!(path.is_dir());
			path.to_path_buf()
		});
		assert!(!kept.exists());
	}
}
