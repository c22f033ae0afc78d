//! Config file discovery

use std::{
    env,
    path::{Path, PathBuf},
};

pub const CONFIG_FILE: &str = ".redux-pipeline.toml";

/// A config file that was found and read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
}

impl ConfigFile {
    /// Read the first existing config file, CWD first, then home directory
    pub fn find() -> Option<Self> {
        Self::first_readable(&candidate_paths())
    }

    /// Read the first of `paths` that exists
    pub fn first_readable(paths: &[PathBuf]) -> Option<Self> {
        paths.iter().find_map(|path| Self::read(path))
    }

    fn read(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(Self {
                path: path.to_path_buf(),
                content,
            }),
            Err(e) => {
                log::trace!("No config at {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Lookup order: ./.redux-pipeline.toml, then ~/.redux-pipeline.toml if HOME is set
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    paths
}
