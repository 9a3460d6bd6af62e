//! Property tests entry point.

mod placement_properties;
mod ranking_properties;
