//! Downstream training-data formats built on the labeled output.

pub mod bio;
pub mod mrc;

pub use bio::{render_bio, TagScheme};
pub use mrc::{export_mrc, MrcSplit};
