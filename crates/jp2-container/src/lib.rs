//! This crate provides a reader for the box structure of JPEG 2000 (JP2) files.
//!
//! Boxes are walked by their declared lengths, starting from the beginning of the buffer.
//! Superboxes such as `jp2h` can be walked further with [`RawBox::children`].

mod box_header;
mod boxes;
mod error;

pub use box_header::*;
pub use boxes::*;
pub use error::{Error, Result};
