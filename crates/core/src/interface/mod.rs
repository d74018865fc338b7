// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod catalog;
pub mod port;

pub use catalog::*;
pub use port::*;
