//! Flutter bridge surface for the Memoir core.

pub mod api;
