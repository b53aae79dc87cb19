//! The assessment pass: link every student to an assessment document, then
//! fill the document's fields from the roster row.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use trackline_core::Document;
use trackline_grid::{DynamicGrid, Row};

use crate::assessment::{AssessmentFields, fill_in};
use crate::cacher::list_files;
use crate::error::Result;
use crate::student::{Cell, fields};

/// Seam over the assessment folder: find or create a student's assessment
/// document by name, and fill one by url.
pub trait AssessmentStore {
    /// Url of an existing assessment for this student, if any.
    fn find(&self, student_name: &str) -> Option<String>;
    /// Create a fresh assessment from the template; returns its url.
    fn create(&mut self, student_name: &str) -> Result<String>;
    /// Fill the assessment's fields.
    fn fill(&mut self, fields: &AssessmentFields, url: &str) -> Result<()>;
}

/// Two passes over the assessment column: link rows that have no assessment
/// yet (fetch-or-create by student name), then fill every linked document
/// from its row. Failures are per-row: one student's trouble never stops the
/// others.
pub fn update_assessments(
    grid: &DynamicGrid<Cell>,
    store: &mut impl AssessmentStore,
) -> Result<DynamicGrid<Cell>> {
    let linked = grid.update_col(
        fields::ASSESSMENT,
        |row| fetch_or_create(store, row),
        Cell::is_blank,
    )?;
    let filled = linked.update_col(
        fields::ASSESSMENT,
        |row| fill_from_row(store, row),
        Cell::has_url,
    )?;
    Ok(filled)
}

fn fetch_or_create(store: &mut impl AssessmentStore, row: Row<'_, Cell>) -> Cell {
    let current = current_cell(row);
    let name = row.get(fields::FULL_NAME).map(Cell::as_text).unwrap_or("");
    if name.is_empty() {
        return current;
    }
    let url = match store.find(name) {
        Some(url) => url,
        None => match store.create(name) {
            Ok(url) => url,
            Err(err) => {
                log::warn!("could not create assessment for {name:?}: {err}");
                return current;
            }
        },
    };
    Cell::link("LINK", Some(url))
}

fn fill_from_row(store: &mut impl AssessmentStore, row: Row<'_, Cell>) -> Cell {
    let current = current_cell(row);
    if let Some(url) = current.url() {
        let responses = AssessmentFields::from_row(row);
        if let Err(err) = store.fill(&responses, url) {
            log::warn!("could not fill assessment {url:?}: {err}");
        }
    }
    current
}

fn current_cell(row: Row<'_, Cell>) -> Cell {
    row.get(fields::ASSESSMENT).cloned().unwrap_or_else(Cell::blank)
}

/// Filesystem-backed assessment store: a folder of `.trk` documents keyed by
/// uppercased student name, plus a template to copy for new students.
pub struct FolderStore {
    folder: PathBuf,
    template: PathBuf,
    files: BTreeMap<String, PathBuf>,
}

impl FolderStore {
    pub fn open(folder: &Path, template: &Path) -> Result<Self> {
        Ok(FolderStore {
            folder: folder.to_path_buf(),
            template: template.to_path_buf(),
            files: list_files(folder)?,
        })
    }
}

impl AssessmentStore for FolderStore {
    fn find(&self, student_name: &str) -> Option<String> {
        self.files
            .get(&student_name.to_uppercase())
            .map(|path| path.display().to_string())
    }

    fn create(&mut self, student_name: &str) -> Result<String> {
        let file_name = student_name.to_uppercase();
        let destination = self.folder.join(format!("{}.trk", file_name));
        fs::copy(&self.template, &destination)?;
        self.files.insert(file_name, destination.clone());
        Ok(destination.display().to_string())
    }

    fn fill(&mut self, responses: &AssessmentFields, url: &str) -> Result<()> {
        let mut doc = Document::load(Path::new(url))?;
        fill_in(responses, &mut doc);
        doc.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::student::mocks;

    /// In-memory store that counts its calls.
    #[derive(Default)]
    struct MockStore {
        existing: HashMap<String, String>,
        finds: RefCell<usize>,
        creates: usize,
        fills: usize,
        fail_create: bool,
    }

    impl AssessmentStore for MockStore {
        fn find(&self, student_name: &str) -> Option<String> {
            *self.finds.borrow_mut() += 1;
            self.existing.get(student_name).cloned()
        }

        fn create(&mut self, student_name: &str) -> Result<String> {
            self.creates += 1;
            if self.fail_create {
                return Err(crate::AppError::Io(std::io::Error::other("disk full")));
            }
            Ok(format!("{}.trk", student_name))
        }

        fn fill(&mut self, _fields: &AssessmentFields, _url: &str) -> Result<()> {
            self.fills += 1;
            Ok(())
        }
    }

    #[test]
    fn test_existing_link_is_kept_and_filled() {
        let grid = mocks::grid(vec![mocks::filled_row()]);
        let mut store = MockStore::default();

        let updated = update_assessments(&grid, &mut store).unwrap();

        assert_eq!(
            updated.lookup_col(fields::ASSESSMENT).unwrap(),
            grid.lookup_col(fields::ASSESSMENT).unwrap()
        );
        assert_eq!(*store.finds.borrow(), 0);
        assert_eq!(store.creates, 0);
        assert_eq!(store.fills, 1);
    }

    #[test]
    fn test_blank_assessment_is_fetched_then_filled() {
        let mut row = mocks::filled_row();
        let column = mocks::headers().column(fields::ASSESSMENT).unwrap();
        row[column] = Cell::link("", None);
        let grid = mocks::grid(vec![row]);

        let mut store = MockStore {
            existing: HashMap::from([("full_name".to_string(), "stored.trk".to_string())]),
            ..MockStore::default()
        };
        let updated = update_assessments(&grid, &mut store).unwrap();

        assert_eq!(
            updated.lookup_col(fields::ASSESSMENT).unwrap(),
            vec![Cell::link("LINK", Some("stored.trk".to_string()))]
        );
        assert_eq!(store.creates, 0);
        assert_eq!(store.fills, 1);
    }

    #[test]
    fn test_unknown_student_gets_created_assessment() {
        let mut row = mocks::filled_row();
        let column = mocks::headers().column(fields::ASSESSMENT).unwrap();
        row[column] = Cell::link("", None);
        let grid = mocks::grid(vec![row]);

        let mut store = MockStore::default();
        let updated = update_assessments(&grid, &mut store).unwrap();

        assert_eq!(
            updated.lookup_col(fields::ASSESSMENT).unwrap(),
            vec![Cell::link("LINK", Some("full_name.trk".to_string()))]
        );
        assert_eq!(store.creates, 1);
        assert_eq!(store.fills, 1);
    }

    #[test]
    fn test_create_failure_leaves_row_unchanged() {
        let mut row = mocks::filled_row();
        let column = mocks::headers().column(fields::ASSESSMENT).unwrap();
        row[column] = Cell::link("", None);
        let grid = mocks::grid(vec![row]);

        let mut store = MockStore {
            fail_create: true,
            ..MockStore::default()
        };
        let updated = update_assessments(&grid, &mut store).unwrap();

        assert_eq!(
            updated.lookup_col(fields::ASSESSMENT).unwrap(),
            vec![Cell::link("", None)]
        );
        assert_eq!(store.fills, 0);
    }

    #[test]
    fn test_blank_student_without_name_is_skipped() {
        let grid = mocks::grid(vec![mocks::empty_row()]);
        let mut store = MockStore::default();

        let updated = update_assessments(&grid, &mut store).unwrap();

        assert!(updated.lookup_col(fields::ASSESSMENT).unwrap()[0].is_blank());
        assert_eq!(*store.finds.borrow(), 0);
        assert_eq!(store.fills, 0);
    }

    #[test]
    fn test_folder_store_creates_from_template() {
        let dir = std::env::temp_dir().join(format!(
            "trackline_store_{}_{}_{:?}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            std::thread::current().id(),
        ));
        struct Cleanup(PathBuf);
        impl Drop for Cleanup {
            fn drop(&mut self) {
                let _ = std::fs::remove_dir_all(&self.0);
            }
        }
        let _cleanup = Cleanup(dir.clone());
        let folder = dir.join("assessments");
        fs::create_dir_all(&folder).unwrap();

        let template = dir.join("template.trk");
        let mut template_doc = Document::new();
        template_doc.append_block("First Name:");
        template_doc.save_as(&template).unwrap();

        let mut store = FolderStore::open(&folder, &template).unwrap();
        assert_eq!(store.find("Ada Lovelace"), None);

        let url = store.create("Ada Lovelace").unwrap();
        assert!(url.ends_with("ADA LOVELACE.trk"));
        assert_eq!(store.find("Ada Lovelace"), Some(url.clone()));

        // A fresh store sees the created file too.
        let reopened = FolderStore::open(&folder, &template).unwrap();
        assert_eq!(reopened.find("ada lovelace"), Some(url));
    }
}
