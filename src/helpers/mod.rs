pub(crate) mod export;
pub(crate) mod json;

pub(crate) use export::*;
pub(crate) use json::*;
