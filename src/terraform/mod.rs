//! Terraform file detection, extraction and rewriting
//!
//! This module provides functionality to:
//! - Detect Terraform files in a directory
//! - Extract version-bearing declarations from them
//! - Index declarations by target and name
//! - Rewrite a declaration's version or constraint in place

mod detector;
mod extractor;
mod index;
mod rewrite;
mod writer;

pub use detector::{detect_terraform_files, DEFAULT_PATTERN};
pub use extractor::extract_dependencies;
pub use index::{scan_files, DependencyIndex};
pub use rewrite::{rewrite, rewrite_span, Attribute};
pub use writer::{read_terraform_file, write_terraform_file, TerraformWriter, WriteResult};
