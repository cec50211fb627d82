//! Configuration file parsing and validation

pub mod argo_toml;

pub use argo_toml::{
    ArgoMeta, CONFIG_FILE, ColorOption, Config, OutputConfig, OutputFormat, parse_override,
};
