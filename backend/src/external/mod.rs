//! External API integrations

pub mod geocoding;

pub use geocoding::{DisabledGeocoder, GeocodeResult, Geocoder, NominatimGeocoder};
