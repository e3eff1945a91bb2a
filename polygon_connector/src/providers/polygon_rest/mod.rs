pub mod params;
pub mod provider;
pub mod response;

pub use params::{PolygonAggsParams, Sort};
pub use provider::PolygonProvider;
