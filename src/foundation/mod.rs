pub(crate) mod cancel;
pub(crate) mod color;
pub(crate) mod error;
pub mod units;
