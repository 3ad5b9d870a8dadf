use crate::error::StoreError;
use configuration::DumpLayout;
use core_types::EventCategory;
use std::path::{Path, PathBuf};

/// Resolved locations of everything inside one dump directory.
#[derive(Debug, Clone)]
pub struct DumpPaths {
    root: PathBuf,
    layout: DumpLayout,
}

impl DumpPaths {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mapping(&self) -> PathBuf {
        self.root.join(&self.layout.mapping_file)
    }

    pub fn category(&self, category: EventCategory) -> PathBuf {
        self.root
            .join(&self.layout.events_dir)
            .join(self.layout.category_file(category))
    }

    /// Artifacts are written next to the inputs, at the top of the dump.
    pub fn artifact(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

/// Checks that `root` is an existing directory and resolves the dump layout against it.
pub fn open(root: impl Into<PathBuf>, layout: DumpLayout) -> Result<DumpPaths, StoreError> {
    let root = root.into();
    if !root.is_dir() {
        return Err(StoreError::DirectoryNotFound(root));
    }
    Ok(DumpPaths { root, layout })
}
