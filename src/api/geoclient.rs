//! NYC Geoclient address search.

use serde::Deserialize;

const GEOCLIENT_URL: &str = "https://api.nyc.gov/geo/geoclient/v1/search.json";

/// The slice of a Geoclient search hit the pipeline consumes.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGeoclientData {
    /// Id assigned to each building in NYC.
    pub building_identification_number: u64,
    /// House number as an integer (i.e. 425).
    pub house_number_in: i64,
    /// Full street name (i.e. Astoria Boulevard).
    pub first_street_name_normalized: String,
    pub first_borough_name: String,
    pub zip_code: u32,
    pub city_council_district: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    response: Option<RawGeoclientData>,
}

pub struct GeoclientClient {
    http: reqwest::blocking::Client,
    base_url: String,
    app_id: String,
    secret_key: String,
}

impl GeoclientClient {
    pub fn new(app_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        GeoclientClient {
            http: reqwest::blocking::Client::new(),
            base_url: GEOCLIENT_URL.to_string(),
            app_id: app_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Look an address up. Transient failures degrade to `None`.
    pub fn lookup(&self, address: &str) -> Option<RawGeoclientData> {
        match self.fetch(address) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("geoclient lookup failed for {address:?}: {err}");
                None
            }
        }
    }

    fn fetch(&self, address: &str) -> reqwest::Result<Option<RawGeoclientData>> {
        let response: SearchResponse = self
            .http
            .get(&self.base_url)
            .query(&[("input", address), ("appId", self.app_id.as_str())])
            .header("Ocp-Apim-Subscription-Key", &self.secret_key)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.results.into_iter().next().and_then(|hit| hit.response))
    }
}
