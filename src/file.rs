//! File utilities.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::from_reader;

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, anyhow::Error> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    from_reader(file).with_context(|| format!("cannot decode {}", path.display()))
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, anyhow::Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, anyhow::Error> {
        read_json(path)
    }
}
