//! Format detection and dispatch
//!
//! Formats are tried in [`Format::ALL`] order and the first one whose
//! `supports` check passes parses the contents. The XML dialects come
//! first: their checks are strict, while a text file can easily pass one
//! of the looser line-based checks.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::parsers::{CueParser, M3uParser, Parser, RekordboxTxtParser, RekordboxXmlParser, TraktorParser};
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    TraktorNml,
    RekordboxXml,
    M3u,
    Cue,
    RekordboxTxt,
}

impl Format {
    /// Dispatch priority order
    pub const ALL: [Format; 5] = [
        Format::TraktorNml,
        Format::RekordboxXml,
        Format::M3u,
        Format::Cue,
        Format::RekordboxTxt,
    ];

    /// Label the parsed [`Archive`] carries
    pub fn label(self) -> &'static str {
        match self {
            Format::TraktorNml => TraktorParser::FORMAT,
            Format::RekordboxXml => RekordboxXmlParser::FORMAT,
            Format::M3u => M3uParser::FORMAT,
            Format::Cue => CueParser::FORMAT,
            Format::RekordboxTxt => RekordboxTxtParser::FORMAT,
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::TraktorNml => TraktorParser::EXTENSIONS,
            Format::RekordboxXml => RekordboxXmlParser::EXTENSIONS,
            Format::M3u => M3uParser::EXTENSIONS,
            Format::Cue => CueParser::EXTENSIONS,
            Format::RekordboxTxt => RekordboxTxtParser::EXTENSIONS,
        }
    }

    pub fn supports(self, contents: &str) -> bool {
        match self {
            Format::TraktorNml => TraktorParser::new(contents).supports(),
            Format::RekordboxXml => RekordboxXmlParser::new(contents).supports(),
            Format::M3u => M3uParser::new(contents).supports(),
            Format::Cue => CueParser::new(contents).supports(),
            Format::RekordboxTxt => RekordboxTxtParser::new(contents).supports(),
        }
    }

    /// `None` if this format does not recognize the contents or finds
    /// them structurally invalid
    pub fn parse(self, contents: &str) -> Option<Archive> {
        match self {
            Format::TraktorNml => attempt::<TraktorParser>(contents)?,
            Format::RekordboxXml => attempt::<RekordboxXmlParser>(contents)?,
            Format::M3u => attempt::<M3uParser>(contents)?,
            Format::Cue => attempt::<CueParser>(contents)?,
            Format::RekordboxTxt => attempt::<RekordboxTxtParser>(contents)?,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outer `None`: not recognized. Inner `None`: recognized but invalid.
fn attempt<'a, P: Parser<'a>>(contents: &'a str) -> Option<Option<Archive>> {
    let parser = P::new(contents);
    if !parser.supports() {
        return None;
    }
    Some(parser.parse())
}

/// First format in priority order that recognizes `contents`
pub fn detect(contents: &str) -> Option<Format> {
    let contents = text::strip_bom(contents);
    Format::ALL.into_iter().find(|format| format.supports(contents))
}

/// Parse with the first recognizing format.
///
/// No fallback to later formats: once a format has claimed the contents,
/// its verdict stands.
pub fn detect_and_parse(contents: &str) -> Option<Archive> {
    parse_archive(contents).ok()
}

/// Like [`detect_and_parse`], but says why nothing came out
pub fn parse_archive(contents: &str) -> Result<Archive> {
    let contents = text::strip_bom(contents);
    let format = detect(contents).ok_or(Error::UnsupportedFormat)?;
    debug!("Detected {} export", format);

    let archive = format.parse(contents).ok_or(Error::StructurallyInvalid {
        format: format.label(),
    })?;
    debug!(
        "Parsed {} playlists, {} collection tracks",
        archive.playlists.len(),
        archive.collection.len()
    );
    Ok(archive)
}

/// Every extension a supported export may have, in dispatch order
pub fn supported_extensions() -> Vec<&'static str> {
    Format::ALL
        .into_iter()
        .flat_map(|format| format.extensions().iter().copied())
        .collect()
}
