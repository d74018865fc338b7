// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// Wraps a diagnostic into an [`Error`](crate::error::Error).
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::error::Error($diagnostic)
	};
}

/// Returns early with an error built from a diagnostic.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::error::Error($diagnostic))
	};
}

/// Builds an `Err` from a diagnostic.
#[macro_export]
macro_rules! err {
	($diagnostic:expr) => {
		Err($crate::error::Error($diagnostic))
	};
}

#[cfg(test)]
mod tests {
	use crate::error::diagnostic::internal::internal;

	#[test]
	fn test_error_macro() {
		let err = error!(internal("boom"));
		assert_eq!(err.code, "INTERNAL_ERROR");
	}

	#[test]
	fn test_return_error_macro() {
		fn fail() -> crate::Result<()> {
			return_error!(internal("early"));
		}

		let err = fail().unwrap_err();
		assert!(err.message.contains("early"));
	}

	#[test]
	fn test_err_macro() {
		let result: crate::Result<()> = err!(internal("nope"));
		assert!(result.is_err());
	}
}
