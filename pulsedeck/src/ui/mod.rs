//! UI module root: exposes drawing functions for individual panels.

pub mod header;
pub mod heartbeat;
pub mod lists;
pub mod login;
pub mod projects;
pub mod stats;
pub mod theme;
pub mod tree;
pub mod util;
pub mod viewer;
