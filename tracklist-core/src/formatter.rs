//! Template rendering of playlist entries
//!
//! A template is free text with `${FIELD}` placeholders. Fields are applied
//! one after another in [`TRACK_FIELDS`] order, each replacing its first
//! occurrence in the text produced so far. A value that contains a later
//! field's placeholder is therefore expanded as well. Unknown fields and
//! repeats are left verbatim.

use crate::archive::{Collection, Playlist};

pub const DEFAULT_FORMAT_STRING: &str = "${INDEX}. ${TITLE} - ${ARTIST}";

/// Field names recognized inside `${...}`
pub const TRACK_FIELDS: [&str; FIELD_COUNT] = ["INDEX", "INDEX_PADDED", "TITLE", "ARTIST", "OFFSET"];

const FIELD_COUNT: usize = 5;
const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Index,
    IndexPadded,
    Title,
    Artist,
    Offset,
}

impl Field {
    const ALL: [Field; FIELD_COUNT] = [
        Field::Index,
        Field::IndexPadded,
        Field::Title,
        Field::Artist,
        Field::Offset,
    ];

    fn name(self) -> &'static str {
        TRACK_FIELDS[self as usize]
    }

    fn value(self, collection: &Collection, playlist: &Playlist, index: usize) -> String {
        let track = playlist.tracks.get(index);
        let entry = track.and_then(|t| collection.get(&t.key));

        match self {
            Field::Index => (index + 1).to_string(),
            Field::IndexPadded => {
                let width = playlist.tracks.len().to_string().len();
                format!("{:0width$}", index + 1, width = width)
            }
            Field::Title => match entry {
                Some(e) if !e.title.is_empty() => e.title.clone(),
                _ => UNKNOWN_TITLE.to_string(),
            },
            Field::Artist => match entry {
                Some(e) if !e.artist.is_empty() => e.artist.clone(),
                _ => UNKNOWN_ARTIST.to_string(),
            },
            Field::Offset => track
                .and_then(|t| t.time_offset_string.clone())
                .unwrap_or_default(),
        }
    }
}

/// Render the track at zero-based `index` of `playlist` through `template`.
///
/// `collection` is the collection of the archive the playlist came from.
pub fn render(collection: &Collection, playlist: &Playlist, index: usize, template: &str) -> String {
    Field::ALL.into_iter().fold(template.to_string(), |output, field| {
        let token = format!("${{{}}}", field.name());
        if output.contains(&token) {
            output.replacen(&token, &field.value(collection, playlist, index), 1)
        } else {
            output
        }
    })
}

/// Playlist name followed by one rendered line per track
pub fn playlist_to_readable(collection: &Collection, playlist: &Playlist, template: &str) -> String {
    let mut lines = Vec::with_capacity(playlist.tracks.len() + 1);
    lines.push(playlist.name.clone());
    for index in 0..playlist.tracks.len() {
        lines.push(render(collection, playlist, index, template));
    }
    lines.join("\n")
}
