//! Clients for the external lookup services.
//!
//! Both clients share the same failure contract: network or parse trouble is
//! logged and becomes "no data" - never an error the pipeline has to handle.

pub mod geoclient;
pub mod open_data;

pub use geoclient::{GeoclientClient, RawGeoclientData};
pub use open_data::{OpenDataClient, RawNychaRecord};
