// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test support: temporary directories, logging and in-memory fakes of the
//! services the catalog talks to.

pub mod logging;
pub mod port;
pub mod tempdir;

pub use logging::init_test_logging;
pub use port::{
	MemoryDictionaryService, MemoryFragmenter, MemoryStorageEngine, MemoryStringDictionary, RecordingPlanCache,
	StorageCall, TestPorts,
};
pub use tempdir::temp_dir;
