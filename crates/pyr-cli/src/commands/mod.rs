//! CLI command implementations

pub(crate) mod check;
pub(crate) mod diff;
pub(crate) mod normalize;
pub(crate) mod pyramid;
