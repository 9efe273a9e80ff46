//! Rupture descriptions: structured documents, legacy text, and the factory
//! that turns either into a `Rupture`.
//!
//! Format detection: the input is first parsed as JSON. Only a JSON syntax or
//! end-of-input error sends it to the legacy text parser; JSON that parses but
//! does not describe a rupture is an error.

mod doc;
mod factory;
mod text;

pub use doc::{
    first_non_quad_ring, is_quad_representable, validate_doc, Coordinates, Feature, Geometry,
    RuptureDoc,
};
pub use factory::{doc_to_rupture, parse_doc, parse_rupture, read_rupture_file};
pub use text::{text_to_doc, write_text};

#[cfg(test)]
mod tests;
