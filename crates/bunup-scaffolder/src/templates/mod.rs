//! Template selection, fetching and placeholder substitution
//!
//! This module provides:
//! - Static template descriptors and directory resolution
//! - Template fetching from a remote archive or a local directory
//! - Placeholder replacement and package directory renaming

pub mod descriptor;
pub mod fetcher;
pub mod replace;

pub use descriptor::{descriptors, Placeholders, TemplateDescriptor, TemplateKind, Variant, VariantMap};
pub use fetcher::{TemplateFetcher, TemplateFile, TemplateSource};
pub use replace::{
    rename_package_dir, replace_in_tree, replacements, PlaceholderReplacement, ProjectIdentity,
};
