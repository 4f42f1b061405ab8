//! Extended M3U parser
//!
//! ```text
//! #EXTM3U
//! #PLAYLIST:Rezidence 20
//! #EXTINF:293,Block & Crown - Boogie Renegade (Original Mix)
//! /Music/Block & Crown/Boogie Renegade.mp3
//! ```
//!
//! The path line following an `#EXTINF` is the track key; the duration is
//! not unique enough to identify a track. The label is split into artist
//! and title at its last `" - "`. That split is guesswork built into the
//! format: a title that itself contains `" - "` puts part of the title in
//! the artist.

use tracing::debug;

use crate::archive::{Archive, ArchiveTrack, Playlist, PlaylistTrack};
use crate::parsers::Parser;
use crate::reader;

const HEADER: &str = "#EXTM3U";
const EXTINF: &str = "#EXTINF:";
const PLAYLIST: &str = "#PLAYLIST:";
const DIRECTIVE: char = '#';
const LABEL_SEPARATOR: &str = " - ";

pub const DEFAULT_PLAYLIST_NAME: &str = "Untitled Playlist";

pub struct M3uParser<'a> {
    contents: &'a str,
}

impl<'a> Parser<'a> for M3uParser<'a> {
    const FORMAT: &'static str = "M3U";
    const EXTENSIONS: &'static [&'static str] = &[".m3u", ".m3u8"];

    fn new(contents: &'a str) -> Self {
        Self { contents }
    }

    fn supports(&self) -> bool {
        self.contents.trim_start().starts_with(HEADER)
    }

    fn parse(&self) -> Option<Archive> {
        if !self.supports() {
            return None;
        }

        let mut archive = Archive::new(Self::FORMAT);
        let mut playlist = Playlist::new(DEFAULT_PLAYLIST_NAME);
        let mut pending: Option<ArchiveTrack> = None;

        for line in reader::lines(self.contents) {
            if let Some(info) = line.strip_prefix(EXTINF) {
                pending = parse_extinf(info);
                if pending.is_none() {
                    debug!("Skipping malformed EXTINF: {}", line);
                }
            } else if let Some(name) = line.strip_prefix(PLAYLIST) {
                playlist.name = name.trim().to_string();
            } else if line.starts_with(DIRECTIVE) {
                continue;
            } else if let Some(mut track) = pending.take() {
                track.key = line.to_string();
                playlist.tracks.push(PlaylistTrack::new(line));
                archive.collection.insert(track);
            }
        }

        archive.playlists.push(playlist);
        Some(archive)
    }
}

/// `<duration>,<label>` into a keyless track
fn parse_extinf(info: &str) -> Option<ArchiveTrack> {
    let (duration, label) = info.split_once(',')?;
    duration.trim().parse::<i64>().ok()?;

    let (artist, title) = split_label(label.trim());
    Some(ArchiveTrack::new(String::new(), title, artist))
}

/// `(artist, title)`; no separator means the whole label is the title
pub fn split_label(label: &str) -> (&str, &str) {
    match label.rsplit_once(LABEL_SEPARATOR) {
        Some((artist, title)) => (artist, title),
        None => ("", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = include_str!("../../testdata/rekordbox_rezidence20.m3u8");

    fn parse(contents: &str) -> Archive {
        let parser = M3uParser::new(contents);
        assert!(parser.supports());
        parser.parse().unwrap()
    }

    #[test]
    fn test_empty_playlist() {
        let archive = parse("#EXTM3U");
        assert!(archive.collection.is_empty());
        assert_eq!(archive.playlists.len(), 1);
        assert!(archive.playlists[0].is_empty());
        assert_eq!(archive.playlists[0].name, DEFAULT_PLAYLIST_NAME);
    }

    #[test]
    fn test_duplicate_durations() {
        let archive = parse(
            "#EXTM3U
            #EXTINF:293,Block & Crown - Boogie Renegade (Original Mix)
            /Music/Block & Crown/16599425_Boogie Renegade_(Original Mix)_PN.mp3
            #EXTINF:293,Da Funk Junkies, Rubber People - Holdin On (Original Mix)
            /Music/Da Funk Junkies, Rubber People/16266992_Holdin On_(Original Mix)_PN.mp3
            ",
        );
        assert_eq!(archive.collection.len(), 2);
        assert_eq!(archive.playlists[0].len(), 2);
    }

    #[test]
    fn test_split_artist_title() {
        let archive = parse(
            "#EXTM3U
            #EXTINF:293,Block & Crown - Boogie Renegade (Original Mix)
            __FILE_PATH__
            ",
        );
        let track = archive.collection.get("__FILE_PATH__").unwrap();
        assert_eq!(track.artist, "Block & Crown");
        assert_eq!(track.title, "Boogie Renegade (Original Mix)");
    }

    #[test]
    fn test_no_separator() {
        let archive = parse(
            "#EXTM3U
            #EXTINF:391,Angelo Ferreri  Man In Soul (Original Mix)
            __FILE_PATH__
            ",
        );
        let track = archive.collection.get("__FILE_PATH__").unwrap();
        assert_eq!(track.artist, "");
        assert_eq!(track.title, "Angelo Ferreri  Man In Soul (Original Mix)");
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("Jay-Z - Song"), ("Jay-Z", "Song"));
        assert_eq!(split_label("Jay-Z Song"), ("", "Jay-Z Song"));
        assert_eq!(split_label("A - B - C"), ("A - B", "C"));
    }

    #[test]
    fn test_export() {
        let archive = parse(EXPORT);
        assert_eq!(archive.format, "M3U");
        assert_eq!(archive.collection.len(), 3);

        let playlist = &archive.playlists[0];
        assert_eq!(playlist.name, "Rezidence 20");
        assert_eq!(playlist.len(), 3);

        // the EXTVLCOPT directive between EXTINF and path is skipped
        let last = archive.entry(&playlist.tracks[2]).unwrap();
        assert_eq!(last.key, "/Users/dj/Music/Angelo Ferreri/Man In Soul.mp3");
        assert_eq!(last.title, "Angelo Ferreri  Man In Soul (Original Mix)");
    }

    #[test]
    fn test_paths_without_extinf_ignored() {
        let archive = parse("#EXTM3U\n/Music/a.mp3\n#EXTINF:-1,Stream\nhttp://radio.example/stream\n/Music/b.mp3\n");
        let keys: Vec<_> = archive.playlists[0].tracks.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["http://radio.example/stream"]);
        assert_eq!(archive.collection.get("http://radio.example/stream").unwrap().title, "Stream");
    }

    #[test]
    fn test_malformed_extinf() {
        let archive = parse("#EXTM3U\n#EXTINF:abc,Nope\n/Music/a.mp3\n");
        assert!(archive.playlists[0].is_empty());
    }

    #[test]
    fn test_rejects_other_text() {
        assert!(!M3uParser::new("/Music/a.mp3").supports());
        assert!(M3uParser::new("/Music/a.mp3").parse().is_none());
    }
}
