//! Detects conflicts between a local metadata source tree and a copy of the same
//! source retrieved from an org.
//!
//! The usual flow is: [`diff::diff_directories`] walks both trees and produces a
//! [`diff::DirectoryDiffResults`], [`conflict::build_entries`] turns each differing
//! file into a [`conflict::ConflictEntry`], the user picks a side for each entry, and
//! once [`conflict::all_resolved`] holds the [`apply`] functions copy files across.

#[macro_use]
extern crate log;

pub mod apply;
pub mod classify;
pub mod config;
pub mod conflict;
pub mod diff;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod util;
pub mod walk;
mod compare_files;

pub use crate::compare_files::file_contents_differ;
