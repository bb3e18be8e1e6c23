use std::{io, path::PathBuf};

use thiserror::Error;

use annosketch::{FilterError, SketchError, style::StyleError};

use crate::config::ConfigError;

/// Errors reported by the `gt` command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Output file `{}` exists, use -force to overwrite it", .0.display())]
    OutputExists(PathBuf),
}

macro_rules! via_sketch_error {
    ($($err:ty),* $(,)?) => {$(
        impl From<$err> for CliError {
            fn from(err: $err) -> Self {
                Self::Sketch(err.into())
            }
        }
    )*};
}

via_sketch_error!(io::Error, FilterError, StyleError);
