//! Setting handlers for the individual configuration keys.

pub mod simple;

pub use simple::*;
