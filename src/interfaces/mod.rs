//! Input and output formats used by the command line front end.

pub mod csv;
pub mod json;
