//! Cache module for storing price sheets to disk
//!
//! Each (service, region) pair maps to one JSON file. Files are write-once:
//! once a file exists the pair is considered populated and is skipped on
//! later runs, which makes interrupted runs safe to resume.

mod manager;

pub use manager::{RegionCache, DEFAULT_BASE_DIR};
