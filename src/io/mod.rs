//! Reading feed and weather documents, writing reports and trajectories.

pub mod csv;
pub mod feed;
pub mod json;
pub mod weather;
