// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// Diagnostic for conditions that indicate a bug rather than bad input.
pub fn internal_with_context(
	reason: impl Into<String>,
	file: &str,
	line: u32,
	column: u32,
	function: &str,
	module_path: &str,
) -> Diagnostic {
	let reason = reason.into();
	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		statement: None,
		message: format!("internal error: {}", reason),
		column: None,
		label: Some(format!("at {}:{}:{}", file, line, column)),
		help: Some("this is a bug, please report it together with the log output".to_string()),
		notes: vec![format!("function: {}", function), format!("module: {}", module_path)],
		cause: None,
	}
}

pub fn internal(reason: impl Into<String>) -> Diagnostic {
	internal_with_context(reason, "unknown", 0, 0, "unknown", "unknown")
}

/// Builds an internal error diagnostic carrying the call site.
#[macro_export]
macro_rules! internal_error {
	($reason:expr) => {
		$crate::error::diagnostic::internal::internal_with_context(
			$reason,
			file!(),
			line!(),
			column!(),
			{
				fn f() {}
				fn type_name_of<T>(_: T) -> &'static str {
					std::any::type_name::<T>()
				}
				let name = type_name_of(f);
				name.strip_suffix("::f").unwrap_or(name)
			},
			module_path!(),
		)
	};
	($fmt:expr, $($arg:tt)*) => {
		$crate::internal_error!(format!($fmt, $($arg)*))
	};
}

#[macro_export]
macro_rules! internal_err {
	($($arg:tt)*) => {
		Err($crate::error::Error($crate::internal_error!($($arg)*)))
	};
}

#[macro_export]
macro_rules! return_internal_error {
	($($arg:tt)*) => {
		return $crate::internal_err!($($arg)*)
	};
}
