//! Flutter-facing bridge over `taskflow_core`.

pub mod api;
