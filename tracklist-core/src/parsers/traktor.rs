//! Traktor NML parser
//!
//! NML layout (only the parts read here):
//! - NML > COLLECTION > ENTRY[TITLE, ARTIST] > LOCATION[VOLUME, DIR, FILE]
//! - NML > PLAYLISTS > ... > NODE[TYPE=PLAYLIST, NAME] > PLAYLIST > ENTRY
//!   > PRIMARYKEY[KEY], EXTENDEDDATA[PLAYEDPUBLIC, STARTDATE, STARTTIME]
//!
//! Collection entries carry no key of their own: the key is VOLUME, DIR and
//! FILE concatenated, which is exactly what playlist PRIMARYKEY values
//! already contain.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::archive::{Archive, ArchiveTrack, Collection, Playlist, PlaylistKind, PlaylistTrack};
use crate::parsers::Parser;
use crate::reader::{self, attribute_or_empty, first_descendant, Step};
use crate::time::{self, PlayedDate, PlayedTime};

const ROOT: &str = "NML";

const COLLECTION_ENTRIES: [Step<'static>; 3] = [
    Step::child(ROOT),
    Step::child("COLLECTION"),
    Step::child("ENTRY"),
];

const PLAYLIST_NODES: [Step<'static>; 3] = [
    Step::child(ROOT),
    Step::child("PLAYLISTS"),
    Step::descendant("NODE").with_attribute("TYPE", "PLAYLIST"),
];

const PLAYLIST_ENTRIES: [Step<'static>; 2] = [Step::child("PLAYLIST"), Step::child("ENTRY")];

pub struct TraktorParser<'a> {
    document: Option<Document<'a>>,
}

impl<'a> Parser<'a> for TraktorParser<'a> {
    const FORMAT: &'static str = "Traktor NML";
    const EXTENSIONS: &'static [&'static str] = &[".nml"];

    fn new(contents: &'a str) -> Self {
        Self {
            document: reader::parse_document(contents).ok(),
        }
    }

    /// Well-formed XML containing an NML element
    fn supports(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| {
            doc.descendants()
                .any(|n| n.is_element() && n.tag_name().name() == ROOT)
        })
    }

    fn parse(&self) -> Option<Archive> {
        let doc = self.document.as_ref()?;
        if doc.root_element().tag_name().name() != ROOT {
            debug!("NML element is not the document root");
            return None;
        }

        let mut archive = Archive::new(Self::FORMAT);
        archive.collection = parse_collection(doc);
        archive.playlists = reader::select(doc.root(), &PLAYLIST_NODES)
            .into_iter()
            .map(parse_playlist)
            .collect();

        debug!(
            "Parsed {} collection entries and {} playlists",
            archive.collection.len(),
            archive.playlists.len()
        );
        Some(archive)
    }
}

fn parse_collection(doc: &Document) -> Collection {
    reader::select(doc.root(), &COLLECTION_ENTRIES)
        .into_iter()
        .map(|entry| {
            ArchiveTrack::new(
                collection_key(entry),
                attribute_or_empty(entry, "TITLE"),
                attribute_or_empty(entry, "ARTIST"),
            )
        })
        .collect()
}

/// VOLUME + DIR + FILE of the entry's LOCATION, absent parts empty
fn collection_key(entry: Node) -> String {
    match first_descendant(entry, "LOCATION") {
        Some(location) => [
            attribute_or_empty(location, "VOLUME"),
            attribute_or_empty(location, "DIR"),
            attribute_or_empty(location, "FILE"),
        ]
        .concat(),
        None => String::new(),
    }
}

fn parse_playlist(node: Node) -> Playlist {
    let mut playlist = Playlist::with_kind(attribute_or_empty(node, "NAME"), PlaylistKind::LiveSet);
    playlist.tracks = reader::select(node, &PLAYLIST_ENTRIES)
        .into_iter()
        .map(parse_entry)
        .collect();
    time::compute_offsets(&mut playlist.tracks);
    playlist
}

fn parse_entry(entry: Node) -> PlaylistTrack {
    let key = first_descendant(entry, "PRIMARYKEY")
        .map(|primary| attribute_or_empty(primary, "KEY"))
        .unwrap_or("");
    let mut track = PlaylistTrack::new(key);

    if let Some(extended) = first_descendant(entry, "EXTENDEDDATA") {
        track.played_public = extended
            .attribute("PLAYEDPUBLIC")
            .map_or(true, |flag| numeric(flag) != 0);

        let date = PlayedDate::from_packed(numeric(attribute_or_empty(extended, "STARTDATE")));
        let start = PlayedTime::from_seconds(numeric(attribute_or_empty(extended, "STARTTIME")));
        track.start_date = Some(date);
        track.start_time = Some(start);
        track.start_instant = time::start_instant(date, start);
    }

    track
}

/// Unsigned attribute value; absent or malformed reads as zero
fn numeric(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}
