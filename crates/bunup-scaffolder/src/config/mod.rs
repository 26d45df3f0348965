//! Configuration file generation

pub mod generator;

pub use generator::{
    render_config, BuildLayout, Format, InitConfig, Plugin, WorkspacePackageSpec, CONFIG_FILE,
};
