//! Core infrastructure shared by the amalgamator and the package builder

pub mod fs_utils;
pub mod line_ending;
pub mod output;
pub mod revision;
