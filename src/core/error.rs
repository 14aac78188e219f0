use std::path::PathBuf;
use thiserror::Error;

/// The scene parser could not produce a usable scene graph.
#[derive(Error, Debug)]
pub enum SceneParseError {
    #[error("scene file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse scene '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("scene '{0}' is incomplete")]
    Incomplete(PathBuf),

    #[error("scene '{0}' has no root node")]
    NoRoot(PathBuf),
}

/// An image file could not be read or decoded. Never fatal for a model load.
#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to decode image '{path}': {message}")]
    Decode { path: PathBuf, message: String },
}

/// Errors surfaced by the model importer.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    SceneParse(#[from] SceneParseError),

    /// No upload format exists for this channel count.
    #[error("invalid image format for '{path}': {channels} channels")]
    InvalidImageFormat { path: PathBuf, channels: u8 },
}

/// Errors raised while reading or validating a scene configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Building a walkthrough from a configuration failed.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),
}
