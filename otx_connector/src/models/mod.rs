pub mod indicator;
pub mod lookup;
