//! Data structures describing measured quantities and the records built from them.

pub mod measurement;
pub mod record;
pub mod units;
