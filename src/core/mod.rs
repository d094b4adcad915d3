//! Core types shared by the converter and the binary.
//!
//! This module contains the configuration and the error types.

mod config;
mod error;

pub use config::{Config, ConvertConfig, MarkdownConfig, LOCAL_CONFIG_FILE};
pub use error::{ConvertError, ConvertResult};
