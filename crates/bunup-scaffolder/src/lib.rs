//! Bunup Scaffolder - Shared library for the bunup project tools
//!
//! This library provides the two flows behind `bunup-tools`:
//!
//! - **create**: pick a template (kind, variant, monorepo), download it, and
//!   replace its placeholder tokens with the user's project identity
//! - **init**: collect entry files, formats and plugins for an existing
//!   project, render `bunup.config.ts`, merge build scripts into
//!   `package.json` and install bunup
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - Pure or filesystem-only functions:
//!   template resolution and fetching, placeholder replacement, validators,
//!   config rendering, manifest merging, package manager detection
//! - **Layer 2: CLI/TUI Interface** - Optional cliclack-based prompts
//!   (feature-gated) that sequence the core operations
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompt flows
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use bunup_scaffolder::config::{render_config, BuildLayout, Format, InitConfig};
//!
//! let text = render_config(&InitConfig {
//!     layout: BuildLayout::Single {
//!         entries: vec!["src/index.ts".into()],
//!         formats: vec![Format::Esm],
//!     },
//!     plugins: vec![],
//! });
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod runtime;
pub mod templates;
pub mod validate;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{render_config, BuildLayout, Format, InitConfig, Plugin, WorkspacePackageSpec};
pub use error::ScaffoldError;
pub use logging::init_logging;
pub use manifest::{Manifest, MergeOutcome, ScriptSet};
pub use runtime::{detect_package_manager, PackageManager};
pub use templates::{TemplateDescriptor, TemplateFetcher, TemplateKind, TemplateSource, Variant};

#[cfg(feature = "tui")]
pub use tui::{run_create, run_init, CreateArgs};
