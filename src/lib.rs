//! # framed
//!
//! Two instant-camera looks for ordinary photos: a single warm Polaroid and
//! a noir film strip of up to four frames. Filtered photos can be written out
//! or saved to a photo library behind an authorization check.
//!
//! # Architecture: Acquire → Filter → Save
//!
//! Every user action runs one strictly sequential flow:
//!
//! ```text
//! 1. Acquire   picked paths  →  Selection → RgbaImage   (filter to images, cap, decode)
//! 2. Filter    RgbaImage     →  square RgbaImage        (fixed chain per variant)
//! 3. Save      RgbaImage     →  status message          (authorize, then write)
//! ```
//!
//! Nothing is retried or cancelled. A photo that fails to decode is skipped, a
//! filter chain that fails yields the unfiltered photo, and a save that is not
//! allowed or fails ends in a message rather than an error.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`acquire`] | Picker selection (media filter, pick limit) and lazy decoding |
//! | [`imaging`] | Filter parameters, pixel operations, the two pipelines, codecs |
//! | [`library`] | Photo library trait, authorization states, directory-backed library |
//! | [`screens`] | Polaroid and film-strip screen state with their event handlers |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Filters Are Data
//!
//! Each look is an ordered list of [`imaging::FilterStep`] values built from
//! plain parameter structs. The order is fixed and every step is a pure
//! function of its input, so the same photo always produces the same pixels.
//! The centre-square crop is always first; later steps never change the size.
//!
//! ## Screens Without a UI Toolkit
//!
//! [`screens::PolaroidScreen`] and [`screens::PhotoStripScreen`] hold exactly
//! the state a screen would display. Event handlers (`on_pick`, `on_save`)
//! take the codec or library they need as arguments, which keeps them
//! testable with the mocks in the test modules. The `framed` binary is one
//! such caller.
//!
//! ## Content-Addressed Library
//!
//! [`library::DirectoryLibrary`] names each saved photo after a hash of its
//! encoded bytes. Saving twice is harmless, and the listing order is stable.

pub mod acquire;
pub mod config;
pub mod imaging;
pub mod library;
pub mod output;
pub mod screens;

#[cfg(test)]
pub(crate) mod test_helpers;
