//! Per-format export parsers
//!
//! Each parser wraps the raw contents it was built from, answers whether it
//! recognizes them, and turns them into an [`Archive`]. `parse` returns
//! `None` when the contents were recognized but lack the structure the
//! format requires; it never returns a partial archive.

pub mod cue;
pub mod m3u;
pub mod rekordbox_txt;
pub mod rekordbox_xml;
pub mod traktor;

pub use cue::CueParser;
pub use m3u::M3uParser;
pub use rekordbox_txt::RekordboxTxtParser;
pub use rekordbox_xml::RekordboxXmlParser;
pub use traktor::TraktorParser;

use crate::archive::Archive;

pub trait Parser<'a>: Sized {
    /// Label stored in [`Archive::format`]
    const FORMAT: &'static str;
    /// File extensions this format is usually saved with
    const EXTENSIONS: &'static [&'static str];

    fn new(contents: &'a str) -> Self;

    fn supports(&self) -> bool;

    fn parse(&self) -> Option<Archive>;
}
