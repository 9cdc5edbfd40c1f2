//! Handlers serving the rendered site.

pub(crate) mod pages;
