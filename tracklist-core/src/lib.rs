//! tracklist-core: DJ software exports to playlists
//!
//! Reads the playlist exports of:
//! - Traktor (NML history and playlist files)
//! - rekordbox (XML library, TXT playlist, M3U playlist, CUE recording)
//!
//! into one [`Archive`] shape: a deduplicated track collection plus ordered
//! playlists whose entries refer back to it by key. Recorded Traktor sets
//! additionally carry per-track offsets from the start of the set.

pub mod archive;
pub mod detect;
pub mod error;
pub mod formatter;
pub mod parsers;
pub mod reader;
pub mod text;
pub mod time;

pub use archive::{Archive, ArchiveTrack, Collection, Playlist, PlaylistKind, PlaylistTrack};
pub use detect::{detect_and_parse, parse_archive, Format};
pub use error::{Error, Result};
pub use formatter::{playlist_to_readable, render};
