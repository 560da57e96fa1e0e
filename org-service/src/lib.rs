//! org-service: organizational directory core.
//!
//! Manages sites, departments, user groups and the permission catalog behind
//! repository ports. Every mutating or list operation is gated by the
//! permission resolver in [`services::access`]; persistence and transport are
//! owned by external collaborators.

pub mod config;
pub mod models;
pub mod paging;
pub mod repos;
pub mod services;
