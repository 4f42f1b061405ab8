//! rekordbox TXT parser
//!
//! Tab-separated export of one playlist. The first line names the columns
//! (`#`, `Artwork`, `Track Title`, `Artist`, ...); every following line is
//! one track in playlist order.

use std::collections::HashMap;

use tracing::debug;

use crate::archive::{self, Archive, ArchiveTrack, Playlist, PlaylistTrack};
use crate::parsers::Parser;
use crate::reader;

const SEPARATOR: char = '\t';

/// Header names, upper-cased, of the columns that are read
const KEY_HEADER: &str = "#";
const TITLE_HEADER: &str = "TRACK TITLE";
const ARTIST_HEADER: &str = "ARTIST";

/// Column positions of the fields a track is built from
#[derive(Debug, Default)]
struct Columns {
    key: Option<usize>,
    title: Option<usize>,
    artist: Option<usize>,
}

impl Columns {
    fn from_header(line: &str) -> Self {
        let positions: HashMap<String, usize> = line
            .split(SEPARATOR)
            .enumerate()
            .map(|(index, name)| (name.trim().to_uppercase(), index))
            .collect();

        Self {
            key: positions.get(KEY_HEADER).copied(),
            title: positions.get(TITLE_HEADER).copied(),
            artist: positions.get(ARTIST_HEADER).copied(),
        }
    }

    fn track(&self, line: &str) -> ArchiveTrack {
        let fields: Vec<&str> = line.split(SEPARATOR).collect();

        ArchiveTrack::new(
            field(&fields, self.key).map_or_else(archive::generated_key, str::to_string),
            field(&fields, self.title).unwrap_or(""),
            field(&fields, self.artist).unwrap_or(""),
        )
    }
}

/// Non-empty value of `column`
fn field<'l>(fields: &[&'l str], column: Option<usize>) -> Option<&'l str> {
    let value = fields.get(column?).copied()?.trim();
    (!value.is_empty()).then_some(value)
}

pub struct RekordboxTxtParser<'a> {
    contents: &'a str,
}

impl<'a> Parser<'a> for RekordboxTxtParser<'a> {
    const FORMAT: &'static str = "RekordBox TXT";
    const EXTENSIONS: &'static [&'static str] = &[".txt"];

    fn new(contents: &'a str) -> Self {
        Self { contents }
    }

    fn supports(&self) -> bool {
        self.contents.trim().starts_with("#\t")
    }

    fn parse(&self) -> Option<Archive> {
        if !self.supports() {
            return None;
        }

        let mut archive = Archive::new(Self::FORMAT);
        let mut lines = reader::lines_keeping(self.contents, SEPARATOR);
        let columns = Columns::from_header(lines.next()?);
        if columns.key.is_none() {
            debug!("No '#' column, track keys will be generated");
        }

        let mut playlist = Playlist::new("");
        for line in lines {
            let track = columns.track(line);
            playlist.tracks.push(PlaylistTrack::new(track.key.as_str()));
            archive.collection.insert(track);
        }

        // header-only exports have no playlist at all
        if !playlist.is_empty() {
            archive.playlists.push(playlist);
        }
        Some(archive)
    }
}
