//! Transform request assembly, submission and response decoding.

pub(crate) mod client;
pub(crate) mod form;
pub(crate) mod params;
pub(crate) mod response;
