//! E2E test suite entry point.

mod embedding_workflow;
mod fixture;
mod placement_workflow;
mod search_workflow;
