pub mod aggregate_bar;
pub mod request_params;
pub mod timespan;
