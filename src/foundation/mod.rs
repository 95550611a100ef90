//! Error taxonomy and numeric helpers shared by every module.

pub(crate) mod error;
pub(crate) mod math;
