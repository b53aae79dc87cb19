//! Template fill for assessment documents.
//!
//! The template carries one labelled line per field ("First Name: ...",
//! "Borough: ..."). Filling replaces each label's rest-of-line with the
//! student's answer; yes/no questions get their answer letter marked.

use chrono::{Datelike, Local};
use regex::Regex;
use trackline_core::Document;
use trackline_grid::Row;

use crate::student::{Cell, fields};

/// The template fields, read off one roster row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssessmentFields {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub borough: String,
    pub council_district: String,
    pub phone: String,
    pub email: String,
    pub is_nycha_resident: String,
    pub has_osha10_card: String,
    pub in_construction: String,
    pub development: String,
    pub employer: String,
    pub job: String,
}

impl AssessmentFields {
    pub fn from_row(row: Row<'_, Cell>) -> Self {
        let text = |field: &str| {
            row.get(field)
                .map(Cell::as_text)
                .unwrap_or("")
                .to_string()
        };
        AssessmentFields {
            first_name: text(fields::FIRST_NAME),
            last_name: text(fields::LAST_NAME),
            address: text(fields::ADDRESS),
            borough: text(fields::BOROUGH),
            council_district: text(fields::COUNCIL_DISTRICT),
            phone: text(fields::PHONE),
            email: text(fields::EMAIL),
            is_nycha_resident: text(fields::IS_NYCHA_RESIDENT),
            has_osha10_card: text(fields::HAS_OSHA10_CARD),
            in_construction: text(fields::IN_CONSTRUCTION),
            development: text(fields::DEVELOPMENT),
            employer: text(fields::EMPLOYER),
            job: text(fields::JOB),
        }
    }
}

/// Fill an assessment document in place from one student's responses.
pub fn fill_in(responses: &AssessmentFields, doc: &mut Document) {
    replace(doc, r"Date[^\t\n]*", &format!("Date: {}", today()));

    replace(doc, r"First[^\t\n]*", &format!("First Name: {}", responses.first_name));
    replace(doc, r"Last[^\t\n]*", &format!("Last Name: {}", responses.last_name));
    replace(doc, r"Address[^\t\n]*", &format!("Address: {}", responses.address));
    replace(doc, r"Borough[^\t\n]*", &format!("Borough: {}", responses.borough));
    replace(
        doc,
        r"Council[^\t\n]*",
        &format!("Council District #: {}", responses.council_district),
    );

    // The template mentions phone, employer and job more than once; only the
    // labelled blank is filled.
    replace_first(doc, r"Phone[^\t\n]*", &format!("Phone Number: {}", responses.phone));

    replace(doc, r"Email[^\t\n]*", &format!("Email: {}", responses.email));

    mark_answer(doc, r"NYCHA development[^\t\n]*", &responses.is_nycha_resident);
    mark_answer(doc, r"OSHA 10 card[^\t\n]*", &responses.has_osha10_card);
    mark_answer(doc, r"construction-related[^\t\n]*", &responses.in_construction);

    replace(doc, r"Which one[^\t\n]*", &format!("Which one? {}", responses.development));

    replace_first(doc, r"Employer[^\t\n]*", &format!("Employer: {}", responses.employer));
    replace_first(doc, r"Job[^\t\n]*", &format!("Job/position: {}", responses.job));
}

fn today() -> String {
    let now = Local::now();
    format!("{}/{}/{}", now.month(), now.day(), now.year())
}

fn replace(doc: &mut Document, pattern: &str, replacement: &str) {
    let re = Regex::new(pattern).unwrap();
    doc.replace_text(&re, replacement);
}

fn replace_first(doc: &mut Document, pattern: &str, replacement: &str) {
    let re = Regex::new(pattern).unwrap();
    doc.replace_first(&re, replacement);
}

/// Mark a yes/no answer on the line matching `label_pattern` by bracketing
/// the answer letter. Applied only for a literal "Y" or "N" answer.
fn mark_answer(doc: &mut Document, label_pattern: &str, answer: &str) {
    if answer != "Y" && answer != "N" {
        return;
    }
    let label = Regex::new(label_pattern).unwrap();
    let target = doc
        .blocks()
        .iter()
        .find(|block| label.is_match(block.text()))
        .map(|block| (block.id(), block.text().to_string()));
    let Some((id, text)) = target else {
        return;
    };
    if text.contains(&format!("[{}]", answer)) {
        return;
    }
    let letter = Regex::new(&format!(r"\b{}\b", answer)).unwrap();
    let marked = letter.replace(&text, format!("[{}]", answer));
    if marked != text {
        let _ = doc.set_block_text(id, marked.into_owned());
    }
}
