//! Processed views over the raw lookup responses.

use crate::api::{GeoclientClient, OpenDataClient, RawGeoclientData, RawNychaRecord};

/// Geocoded address data, formatted the way the roster wants it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedAddress {
    pub bin: u64,
    pub address: String,
    pub borough: String,
    pub council_district: u32,
}

/// A NYCHA development match for a building.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Development {
    pub development: String,
}

pub fn processed_geoclient_data(
    client: &GeoclientClient,
    address: &str,
) -> Option<ProcessedAddress> {
    client.lookup(address).map(process_geoclient_data)
}

pub fn processed_nycha_data(client: &OpenDataClient, bin: u64) -> Option<Development> {
    client.lookup_development(bin).map(process_nycha_data)
}

fn process_geoclient_data(raw: RawGeoclientData) -> ProcessedAddress {
    ProcessedAddress {
        bin: raw.building_identification_number,
        address: format!(
            "{} {}, {}, NY, {}",
            raw.house_number_in,
            raw.first_street_name_normalized,
            raw.first_borough_name,
            raw.zip_code
        ),
        borough: raw.first_borough_name,
        council_district: raw.city_council_district,
    }
}

fn process_nycha_data(raw: RawNychaRecord) -> Development {
    Development {
        development: raw.development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geoclient_data_is_formatted_for_the_roster() {
        let raw = RawGeoclientData {
            building_identification_number: 4036970,
            house_number_in: 425,
            first_street_name_normalized: "ASTORIA BOULEVARD".to_string(),
            first_borough_name: "QUEENS".to_string(),
            zip_code: 11103,
            city_council_district: 22,
        };
        let processed = process_geoclient_data(raw);
        assert_eq!(processed.address, "425 ASTORIA BOULEVARD, QUEENS, NY, 11103");
        assert_eq!(processed.borough, "QUEENS");
        assert_eq!(processed.bin, 4036970);
        assert_eq!(processed.council_district, 22);
    }

    #[test]
    fn test_nycha_data_keeps_development_name() {
        let raw = RawNychaRecord {
            development: "QUEENSBRIDGE NORTH".to_string(),
            borough: Some("QUEENS".to_string()),
        };
        assert_eq!(
            process_nycha_data(raw),
            Development {
                development: "QUEENSBRIDGE NORTH".to_string()
            }
        );
    }
}
