//! NYC Open Data: NYCHA residential addresses by building id.

use serde::Deserialize;

const NYCHA_RESIDENTIAL_URL: &str = "https://data.cityofnewyork.us/resource/3ub5-4ph8.json";

/// The slice of a NYCHA residential-address record the pipeline consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNychaRecord {
    pub development: String,
    #[serde(default)]
    pub borough: Option<String>,
}

pub struct OpenDataClient {
    http: reqwest::blocking::Client,
    base_url: String,
    app_token: String,
}

impl OpenDataClient {
    pub fn new(app_token: impl Into<String>) -> Self {
        OpenDataClient {
            http: reqwest::blocking::Client::new(),
            base_url: NYCHA_RESIDENTIAL_URL.to_string(),
            app_token: app_token.into(),
        }
    }

    /// Look up the NYCHA development for a building id. Transient failures
    /// degrade to `None`.
    pub fn lookup_development(&self, bin: u64) -> Option<RawNychaRecord> {
        match self.fetch(bin) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("open-data lookup failed for bin {bin}: {err}");
                None
            }
        }
    }

    fn fetch(&self, bin: u64) -> reqwest::Result<Option<RawNychaRecord>> {
        let bin = bin.to_string();
        let records: Vec<RawNychaRecord> = self
            .http
            .get(&self.base_url)
            .query(&[("bin", bin.as_str()), ("$$app_token", self.app_token.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(records.into_iter().next())
    }
}
