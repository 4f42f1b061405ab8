//! Print tracklists from DJ software exports

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tracklist_core::formatter::{DEFAULT_FORMAT_STRING, TRACK_FIELDS};
use tracklist_core::{detect, playlist_to_readable, text, Archive, ArchiveTrack, Playlist, PlaylistTrack};

use config::{Config, OutputMode, PlaylistSelector};

#[derive(Parser)]
#[command(name = "tracklist")]
#[command(about = "Print tracklists from Traktor and rekordbox exports")]
#[command(version)]
struct Cli {
    #[arg(required_unless_present = "fields", help = input_help())]
    input: Option<PathBuf>,

    /// Playlist to print, by 1-based number or exact name (default: all)
    #[arg(short, long)]
    playlist: Option<String>,

    /// First track to print, 1-based
    #[arg(short, long, default_value = "1")]
    start: usize,

    /// Only print tracks played to the audience
    #[arg(long)]
    public_only: bool,

    /// Line template, see --fields for the recognized ${FIELD}s
    #[arg(short, long, default_value = DEFAULT_FORMAT_STRING)]
    template: String,

    /// Print JSON instead of text
    #[arg(long, conflicts_with = "list")]
    json: bool,

    /// Only list the playlist names
    #[arg(short, long)]
    list: bool,

    /// Print the template fields and exit
    #[arg(long)]
    fields: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for the tracklist
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.fields {
        for field in TRACK_FIELDS {
            println!("${{{}}}", field);
        }
        return Ok(());
    }

    let output = if cli.json {
        OutputMode::Json
    } else if cli.list {
        OutputMode::List
    } else {
        OutputMode::Text
    };
    let input = cli.input.context("No export file given")?;
    let config = Config {
        input,
        playlist: cli.playlist.as_deref().map(PlaylistSelector::parse),
        start_track: cli.start,
        only_public: cli.public_only,
        template: cli.template,
        output,
    };
    debug!("{:?}", config);

    println!("{}", run(&config)?);
    Ok(())
}

/// Help for the input argument, listing what the dispatcher accepts
fn input_help() -> String {
    format!("Export file ({})", detect::supported_extensions().join(", "))
}

fn run(config: &Config) -> anyhow::Result<String> {
    let archive = load_archive(&config.input)?;
    if archive.playlists.is_empty() {
        warn!("{} export contains no playlists", archive.format);
    }

    let playlists = select_playlists(&archive, config.playlist.as_ref())?
        .into_iter()
        .map(|(number, playlist)| {
            let mut filtered = playlist.filter(config.start_index(), config.only_public);
            filtered.name = display_name(number, playlist);
            filtered
        })
        .collect::<Vec<_>>();

    let output = match config.output {
        OutputMode::Text => playlists
            .iter()
            .map(|playlist| playlist_to_readable(&archive.collection, playlist, &config.template))
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputMode::List => playlists
            .iter()
            .map(|playlist| playlist.name.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputMode::Json => {
            let views: Vec<_> = playlists
                .iter()
                .map(|playlist| PlaylistView::new(&archive, playlist))
                .collect();
            serde_json::to_string_pretty(&views)?
        }
    };
    Ok(output)
}

/// Read, decode and parse an export file
fn load_archive(path: &Path) -> anyhow::Result<Archive> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let contents = text::decode(&bytes).with_context(|| format!("Failed to decode {}", path.display()))?;

    let archive = detect::parse_archive(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(
        "{}: {} export, {} playlists",
        path.display(),
        archive.format,
        archive.playlists.len()
    );
    Ok(archive)
}

/// Playlists to print, paired with their 1-based number in the export
fn select_playlists<'a>(
    archive: &'a Archive,
    selector: Option<&PlaylistSelector>,
) -> anyhow::Result<Vec<(usize, &'a Playlist)>> {
    let numbered = archive.playlists.iter().enumerate().map(|(i, p)| (i + 1, p));

    let selected: Vec<_> = match selector {
        None => numbered.collect(),
        Some(PlaylistSelector::Index(index)) => numbered.filter(|(number, _)| number == index).collect(),
        Some(PlaylistSelector::Name(name)) => numbered.filter(|(_, p)| &p.name == name).collect(),
    };

    if selected.is_empty() {
        if let Some(selector) = selector {
            bail!(
                "No playlist {:?} among {} playlists",
                selector,
                archive.playlists.len()
            );
        }
    }
    Ok(selected)
}

/// rekordbox TXT playlists and some CUE sheets are unnamed
fn display_name(number: usize, playlist: &Playlist) -> String {
    if playlist.name.is_empty() {
        format!("Playlist {}", number)
    } else {
        playlist.name.clone()
    }
}

#[derive(Serialize)]
struct PlaylistView<'a> {
    name: &'a str,
    format: &'static str,
    tracks: Vec<TrackView<'a>>,
}

#[derive(Serialize)]
struct TrackView<'a> {
    #[serde(flatten)]
    track: &'a PlaylistTrack,
    entry: Option<&'a ArchiveTrack>,
}

impl<'a> PlaylistView<'a> {
    fn new(archive: &'a Archive, playlist: &'a Playlist) -> Self {
        Self {
            name: &playlist.name,
            format: archive.format,
            tracks: playlist
                .tracks
                .iter()
                .map(|track| TrackView {
                    track,
                    entry: archive.entry(track),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    const NML: &str = include_str!("../../tracklist-core/testdata/history_2022y07m17d_20h06m38s.nml");
    const XML: &str = include_str!("../../tracklist-core/testdata/rekordbox.xml");

    fn write_export(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn make_config(file: &NamedTempFile) -> Config {
        Config {
            input: file.path().to_path_buf(),
            playlist: None,
            start_track: 1,
            only_public: false,
            template: DEFAULT_FORMAT_STRING.to_string(),
            output: OutputMode::Text,
        }
    }

    #[test]
    fn test_fields_without_input() {
        let cli = Cli::try_parse_from(["tracklist", "--fields"]).unwrap();
        assert!(cli.fields);
        assert!(cli.input.is_none());

        assert!(Cli::try_parse_from(["tracklist"]).is_err());
        let cli = Cli::try_parse_from(["tracklist", "set.nml", "-p", "2"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("set.nml")));
    }

    #[test]
    fn test_input_help_lists_extensions() {
        use clap::CommandFactory;

        let command = Cli::command();
        let input = command
            .get_arguments()
            .find(|arg| arg.get_id() == "input")
            .unwrap();
        let help = input.get_help().unwrap().to_string();
        assert_eq!(help, "Export file (.nml, .xml, .m3u, .m3u8, .cue, .txt)");
    }

    #[test]
    fn test_text_output() {
        let file = write_export(XML.as_bytes());
        let mut config = make_config(&file);
        config.playlist = Some(PlaylistSelector::Name("Rezidence 22".to_string()));

        assert_eq!(
            run(&config).unwrap(),
            "Rezidence 22\n\
             1. Like I Used To - Steven Weston feat. Låpsley\n\
             2. Westcoast Boogie - Unknown Artist\n\
             3. Unknown Title - Unknown Artist"
        );
    }

    #[test]
    fn test_live_set_offsets() {
        let file = write_export(NML.as_bytes());
        let mut config = make_config(&file);
        config.playlist = Some(PlaylistSelector::Index(1));
        config.start_track = 2;
        config.only_public = true;
        config.template = "${OFFSET} ${TITLE}".to_string();

        assert_eq!(
            run(&config).unwrap(),
            "HISTORY 2022-07-17\n\
             00:00 Holdin On (Original Mix)\n\
             15:00 Boogie Renegade (Original Mix)\n\
             30:00 Unknown Title"
        );
    }

    #[test]
    fn test_list_output() {
        let file = write_export(NML.as_bytes());
        let mut config = make_config(&file);
        config.output = OutputMode::List;
        assert_eq!(run(&config).unwrap(), "HISTORY 2022-07-17\nWarmup");
    }

    #[test]
    fn test_utf16_txt_export() {
        let contents = "#\tTrack Title\tArtist\r\n1\tChannel\tNile Delta\r\n";
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(contents.encode_utf16().flat_map(u16::to_le_bytes));
        let file = write_export(&bytes);

        assert_eq!(run(&make_config(&file)).unwrap(), "Playlist 1\n1. Channel - Nile Delta");
    }

    #[test]
    fn test_json_output() {
        let file = write_export(XML.as_bytes());
        let mut config = make_config(&file);
        config.playlist = Some(PlaylistSelector::Index(1));
        config.output = OutputMode::Json;

        let json: serde_json::Value = serde_json::from_str(&run(&config).unwrap()).unwrap();
        let playlist = &json[0];
        assert_eq!(playlist["name"], "Rezidence 22");
        assert_eq!(playlist["format"], "RekordBox");
        assert_eq!(playlist["tracks"][0]["key"], "101");
        assert_eq!(playlist["tracks"][0]["played_public"], true);
        assert_eq!(playlist["tracks"][0]["entry"]["title"], "Like I Used To");
        assert!(playlist["tracks"][2]["entry"].is_null());
    }

    #[test]
    fn test_unknown_playlist() {
        let file = write_export(XML.as_bytes());
        let mut config = make_config(&file);
        config.playlist = Some(PlaylistSelector::Index(5));
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_unsupported_file() {
        let file = write_export(b"just some notes");
        let error = run(&make_config(&file)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<tracklist_core::Error>(),
            Some(tracklist_core::Error::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_missing_file() {
        let config = Config {
            input: PathBuf::from("/nonexistent/export.nml"),
            playlist: None,
            start_track: 1,
            only_public: false,
            template: DEFAULT_FORMAT_STRING.to_string(),
            output: OutputMode::Text,
        };
        assert!(run(&config).is_err());
    }
}
