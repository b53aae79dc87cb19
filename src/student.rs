//! The student roster schema: cell values and field names.

use std::fmt;

/// One roster cell: plain text, or a link as shown in the sheet (display
/// text plus an optional target url).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Link { text: String, url: Option<String> },
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Cell {
        Cell::Text(text.into())
    }

    pub fn link(text: impl Into<String>, url: Option<String>) -> Cell {
        Cell::Link {
            text: text.into(),
            url,
        }
    }

    pub fn blank() -> Cell {
        Cell::Text(String::new())
    }

    /// The cell's display text.
    pub fn as_text(&self) -> &str {
        match self {
            Cell::Text(text) => text,
            Cell::Link { text, .. } => text,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Cell::Text(_) => None,
            Cell::Link { url, .. } => url.as_deref(),
        }
    }

    /// The blank convention: empty display text means "not yet populated".
    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }

    pub fn has_url(&self) -> bool {
        self.url().is_some()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => write!(f, "{}", text),
            Cell::Link { text, url: Some(url) } => write!(f, "{} <{}>", text, url),
            Cell::Link { text, url: None } => write!(f, "{}", text),
        }
    }
}

/// Field names of the roster columns.
pub mod fields {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const FULL_NAME: &str = "full_name";
    pub const ASSESSMENT_DATE: &str = "assessment_date";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const EMPLOYER: &str = "employer";
    pub const JOB: &str = "job";
    pub const IN_CONSTRUCTION: &str = "in_construction";
    pub const HAS_OSHA10_CARD: &str = "has_osha10_card";
    pub const ADDRESS: &str = "address";
    pub const FORMATTED_ADDRESS: &str = "formatted_address";
    pub const BOROUGH: &str = "borough";
    pub const COUNCIL_DISTRICT: &str = "council_district";
    pub const IS_NYCHA_RESIDENT: &str = "is_nycha_resident";
    pub const DEVELOPMENT: &str = "development";
    pub const HAS_VALID_ID: &str = "has_valid_id";
    pub const ASSESSMENT: &str = "assessment";
    pub const PHOTO_ID: &str = "photo_id";
    pub const COMPLETION_CERTIFICATE: &str = "completion_certificate";
    pub const OSHA30_CARD: &str = "osha30_card";

    /// Every roster field, in sheet column order.
    pub const ALL: [&str; 21] = [
        FIRST_NAME,
        LAST_NAME,
        FULL_NAME,
        ASSESSMENT_DATE,
        PHONE,
        EMAIL,
        EMPLOYER,
        JOB,
        IN_CONSTRUCTION,
        HAS_OSHA10_CARD,
        ADDRESS,
        FORMATTED_ADDRESS,
        BOROUGH,
        COUNCIL_DISTRICT,
        IS_NYCHA_RESIDENT,
        DEVELOPMENT,
        HAS_VALID_ID,
        ASSESSMENT,
        PHOTO_ID,
        COMPLETION_CERTIFICATE,
        OSHA30_CARD,
    ];

    /// The columns that hold links to student documents.
    pub const LINKS: [&str; 4] = [ASSESSMENT, PHOTO_ID, COMPLETION_CERTIFICATE, OSHA30_CARD];
}

/// Ready-made student rows for tests and dry runs.
pub mod mocks {
    use trackline_grid::{DynamicGrid, Headers};

    use super::{Cell, fields};

    /// Header mapping covering every roster field, in [`fields::ALL`] order.
    pub fn headers() -> Headers {
        Headers::new(
            fields::ALL
                .iter()
                .enumerate()
                .map(|(index, &field)| (field, index)),
        )
        .expect("mock headers are valid")
    }

    /// A row with every cell blank.
    pub fn empty_row() -> Vec<Cell> {
        fields::ALL
            .iter()
            .map(|&field| {
                if fields::LINKS.contains(&field) {
                    Cell::link("", None)
                } else {
                    Cell::blank()
                }
            })
            .collect()
    }

    /// A row with every cell filled with its own field name.
    pub fn filled_row() -> Vec<Cell> {
        fields::ALL
            .iter()
            .map(|&field| {
                if fields::LINKS.contains(&field) {
                    Cell::link(field, Some(field.to_string()))
                } else {
                    Cell::text(field)
                }
            })
            .collect()
    }

    pub fn grid(rows: Vec<Vec<Cell>>) -> DynamicGrid<Cell> {
        DynamicGrid::of(rows, headers()).expect("mock rows are rectangular")
    }
}
