use std::path::{Path, PathBuf};

use super::Document;
use crate::error::{CoreError, Result};
use crate::storage::{parse_document, write_document};

impl Document {
    /// Load a document from a `.trk` file.
    pub fn load(path: &Path) -> Result<Document> {
        let mut doc = parse_document(path)?;
        doc.file_path = Some(path.to_path_buf());
        doc.modified = false;
        Ok(doc)
    }

    /// Load a document if the file exists, otherwise create a fresh one that
    /// will save to that path.
    pub fn load_or_new(path: &Path) -> Result<Document> {
        if path.exists() {
            Document::load(path)
        } else {
            let mut doc = Document::new();
            doc.file_path = Some(path.to_path_buf());
            Ok(doc)
        }
    }

    /// Save to the current file path. Returns the path saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(CoreError::NoFilePath);
        };
        write_document(&path, self)?;
        self.modified = false;
        Ok(path)
    }

    /// Save to a new path and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.file_path = Some(path.to_path_buf());
        self.save()
    }
}
