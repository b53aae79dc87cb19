//! The address pass: fill geocoded fields for rows that have an address.

use std::sync::OnceLock;

use regex::Regex;
use trackline_grid::{DynamicGrid, Row, RowPatch};

use crate::address::{processed_geoclient_data, processed_nycha_data};
use crate::api::{GeoclientClient, OpenDataClient};
use crate::error::Result;
use crate::student::{Cell, fields};

/// The address-derived roster fields produced by one lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressFields {
    pub address: String,
    pub formatted_address: String,
    pub borough: String,
    pub council_district: String,
    pub development: String,
    pub is_nycha_resident: String,
}

/// The columns this pass owns. `address` itself is input, never written.
pub const TARGET_FIELDS: [&str; 5] = [
    fields::FORMATTED_ADDRESS,
    fields::BOROUGH,
    fields::COUNCIL_DISTRICT,
    fields::DEVELOPMENT,
    fields::IS_NYCHA_RESIDENT,
];

/// Fill the address sub-fields of every row whose address is present but
/// incomplete. `fetch` runs once per such row, not once per field.
pub fn update_address_fields<F>(grid: &DynamicGrid<Cell>, mut fetch: F) -> Result<DynamicGrid<Cell>>
where
    F: FnMut(&str) -> AddressFields,
{
    let updated = grid.update_row(
        &TARGET_FIELDS,
        |row| patch_from(fetch(text_of(row, fields::ADDRESS))),
        |_, row| address_fields_missing_data(row),
    )?;
    Ok(updated)
}

/// The production lookup: geocode the address, then match the building
/// against NYCHA developments. Every absence has a fallback.
pub fn lookup_address_fields(
    geoclient: &GeoclientClient,
    open_data: &OpenDataClient,
    address: &str,
) -> AddressFields {
    let geocoded = processed_geoclient_data(geoclient, address);
    let development = geocoded
        .as_ref()
        .and_then(|data| processed_nycha_data(open_data, data.bin));

    AddressFields {
        address: address.to_string(),
        formatted_address: geocoded
            .as_ref()
            .map(|data| data.address.clone())
            .unwrap_or_else(|| squeeze_upper(address)),
        borough: geocoded
            .as_ref()
            .map(|data| data.borough.clone())
            .unwrap_or_default(),
        council_district: geocoded
            .as_ref()
            .map(|data| data.council_district.to_string())
            .unwrap_or_default(),
        development: development
            .as_ref()
            .map(|data| data.development.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        is_nycha_resident: if development.is_some() { "Y" } else { "N" }.to_string(),
    }
}

/// The pass fires only for rows with an address and at least one blank
/// address sub-field.
fn address_fields_missing_data(row: Row<'_, Cell>) -> bool {
    has_address(row) && is_missing_address_data(row)
}

fn has_address(row: Row<'_, Cell>) -> bool {
    !is_empty(row, fields::ADDRESS)
}

fn is_missing_address_data(row: Row<'_, Cell>) -> bool {
    is_empty(row, fields::BOROUGH)
        || is_empty(row, fields::COUNCIL_DISTRICT)
        || is_empty(row, fields::DEVELOPMENT)
        || is_empty(row, fields::IS_NYCHA_RESIDENT)
}

fn is_empty(row: Row<'_, Cell>, field: &str) -> bool {
    row.get(field).map(Cell::is_blank).unwrap_or(true)
}

fn text_of<'a>(row: Row<'a, Cell>, field: &str) -> &'a str {
    row.get(field).map(Cell::as_text).unwrap_or("")
}

fn patch_from(data: AddressFields) -> RowPatch<Cell> {
    RowPatch::from([
        (fields::FORMATTED_ADDRESS.to_string(), Cell::text(data.formatted_address)),
        (fields::BOROUGH.to_string(), Cell::text(data.borough)),
        (fields::COUNCIL_DISTRICT.to_string(), Cell::text(data.council_district)),
        (fields::DEVELOPMENT.to_string(), Cell::text(data.development)),
        (fields::IS_NYCHA_RESIDENT.to_string(), Cell::text(data.is_nycha_resident)),
    ])
}

/// Fallback formatting when geocoding finds nothing: squeeze out runs of
/// whitespace and uppercase the raw input.
fn squeeze_upper(address: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s{2,}").unwrap());
    re.replace_all(address, "").to_uppercase()
}
