//! Command-line arguments and the validated scan configuration
//!
//! Flags override the TOML file, which overrides built-in defaults. Boolean
//! flags can only switch a feature on.

use crate::db::{build_sink, PersistenceSink};
use crate::error::{Error, Result};
use crate::extractors::source_for;
use crate::fusion::{ConsolePrompt, TagMerger};
use crate::services::file_scanner::FileScanner;
use crate::services::filename_parser::{FileNameSchema, FilenameParser};
use crate::services::metadata_resolver::MetadataResolver;
use crate::services::scan_session::ScanSession;
use crate::types::{PathMode, TagStandard};
use clap::{ArgAction, Parser};
use mp3scan_common::config::{DatabaseConfig, TomlConfig, CONFIG_ENV_VAR};
use mp3scan_common::db::TableName;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Debug, Parser)]
#[clap(name = "mp3scan", version, disable_version_flag = true)]
#[clap(about = "Scan a directory to find mp3 files and insert their tags into a database")]
pub struct Args {
    /// Directory to scan for mp3 files
    #[clap(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Display program version and exit
    #[clap(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Verbose output
    #[clap(short = 'V', long)]
    pub verbose: bool,

    /// Print the sum of the size of all mp3 files found
    #[clap(short = 'f', long = "fsize")]
    pub fsize: bool,

    /// Recursively search mp3 files in subdirectories
    #[clap(short = 'r', long)]
    pub recursive: bool,

    /// Create a new or use an existing table named TAB (default MP3)
    #[clap(short = 'c', long = "createtab", value_name = "TAB")]
    pub createtab: Option<Option<String>>,

    /// Store paths relative to PATH instead of absolute
    #[clap(short = 'p', long = "relativepath")]
    pub relative_path: bool,

    /// Use color for command line output
    #[clap(short = 'u', long = "usecolor")]
    pub use_color: bool,

    /// Ask when two tag standards disagree
    #[clap(short = 'i', long)]
    pub interactive: bool,

    /// Use only ID3v1 tags
    #[clap(short = '1', long = "id3v1", alias = "ID3V1")]
    pub id3v1: bool,

    /// Use only ID3v2 tags
    #[clap(short = '2', long = "id3v2", alias = "ID3V2")]
    pub id3v2: bool,

    /// Filename schema used when no tag is found
    /// (A = Artist, T = Title, Y = Year, M = Album, last character = separator)
    #[clap(short = 'n', long = "usefilename", value_name = "SEQTAG")]
    pub use_filename: Option<String>,

    /// Characters replaced with a space before parsing the filename
    #[clap(short = 's', long = "spacechar", value_name = "SEPLIST")]
    pub space_chars: Option<String>,

    /// Store records in MySQL: HOST USER [PASSWORD] DATABASE
    #[clap(
        short = 'm',
        long,
        num_args = 3..=4,
        value_names = ["HOST", "USER", "PASSWORD", "DATABASE"],
        conflicts_with = "sqlite"
    )]
    pub mysql: Option<Vec<String>>,

    /// Store records in the SQLite database FILENAME
    #[clap(short = 'l', long, value_name = "FILENAME")]
    pub sqlite: Option<PathBuf>,

    /// Configuration file
    #[clap(long, value_name = "FILE", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,
}

/// Values that depend on where PATH ended up on the command line
struct CommandLine<'a> {
    root: PathBuf,
    mysql: Option<&'a [String]>,
    table: Option<&'a str>,
}

impl Args {
    /// Recover PATH when an option with optional values consumed it
    ///
    /// `--mysql` takes up to four values and `--createtab` an optional one,
    /// so either may swallow a trailing PATH. A four-value `--mysql` gives its
    /// last value back first, then a `--createtab` value.
    fn command_line(&self) -> Result<CommandLine<'_>> {
        let mysql = self.mysql.as_deref();
        let table = self.createtab.as_ref().and_then(|tab| tab.as_deref());

        if let Some(path) = &self.path {
            return Ok(CommandLine {
                root: path.clone(),
                mysql,
                table,
            });
        }

        if let Some([values @ .., last]) = mysql {
            if values.len() == 3 {
                return Ok(CommandLine {
                    root: PathBuf::from(last),
                    mysql: Some(values),
                    table,
                });
            }
        }

        match table {
            Some(last) => Ok(CommandLine {
                root: PathBuf::from(last),
                mysql,
                table: None,
            }),
            None => Err(Error::InvalidConfig("missing PATH to scan".to_string())),
        }
    }
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub recursive: bool,
    pub verbose: bool,
    pub report_size: bool,
    pub use_color: bool,
    pub interactive: bool,
    pub path_mode: PathMode,
    /// Enabled standards; never empty
    pub tag_standards: Vec<TagStandard>,
    pub filename_parser: Option<FilenameParser>,
    pub database: DatabaseConfig,
    pub table: TableName,
}

impl ScanConfig {
    /// Merge command-line arguments over the config file
    pub fn from_args(args: &Args, file: &TomlConfig) -> Result<Self> {
        let CommandLine { root, mysql, table } = args.command_line()?;

        let database = match (mysql, &args.sqlite) {
            (Some(values), _) => mysql_config(values)?,
            (None, Some(path)) => DatabaseConfig::Sqlite { path: path.clone() },
            (None, None) => file.database.clone().ok_or_else(|| {
                Error::InvalidConfig(
                    "no database selected, use --mysql or --sqlite".to_string(),
                )
            })?,
        };

        let table = match table.or(file.table.as_deref()) {
            Some(name) => TableName::new(name)?,
            None => TableName::default(),
        };

        let tag_standards = tag_standards(args, file)?;

        let schema = args
            .use_filename
            .as_deref()
            .or(file.filename.as_ref().map(|f| f.schema.as_str()));
        let space_chars = args
            .space_chars
            .as_deref()
            .or(file.filename.as_ref().and_then(|f| f.space_chars.as_deref()));

        let filename_parser = match schema {
            Some(schema) => Some(FilenameParser::new(FileNameSchema::parse(schema)?, space_chars)),
            None => None,
        };

        let path_mode = if args.relative_path || file.relative_path {
            PathMode::Relative
        } else {
            PathMode::Absolute
        };

        Ok(Self {
            root,
            recursive: args.recursive || file.recursive,
            verbose: args.verbose || file.verbose,
            report_size: args.fsize || file.report_size,
            use_color: args.use_color || file.use_color,
            interactive: args.interactive || file.interactive,
            path_mode,
            tag_standards,
            filename_parser,
            database,
            table,
        })
    }

    /// Tag sources, merger and filename fallback for this run
    pub fn metadata_resolver(&self) -> MetadataResolver {
        let enabled = |standard: TagStandard| {
            self.tag_standards
                .contains(&standard)
                .then(|| source_for(standard))
        };

        let merger = if self.interactive {
            TagMerger::interactive(Box::new(ConsolePrompt::stdio()))
        } else {
            TagMerger::new()
        };

        let resolver = MetadataResolver::new(
            enabled(TagStandard::Id3v1),
            enabled(TagStandard::Id3v2),
            merger,
        )
        .verbose(self.verbose);

        match &self.filename_parser {
            Some(parser) => resolver.with_filename_fallback(parser.clone()),
            None => resolver,
        }
    }

    /// Session for this run
    pub fn scan_session(&self) -> ScanSession {
        ScanSession::new(
            self.root.clone(),
            FileScanner::new(self.recursive),
            self.metadata_resolver(),
        )
        .path_mode(self.path_mode)
        .report_size(self.report_size)
        .verbose(self.verbose)
    }

    /// Sink for the configured backend
    pub fn persistence_sink(&self) -> Result<Box<dyn PersistenceSink>> {
        Ok(build_sink(&self.database, self.table.clone())?)
    }
}

/// `HOST USER [PASSWORD] DATABASE`
fn mysql_config(values: &[String]) -> Result<DatabaseConfig> {
    match values {
        [host, user, database] => Ok(DatabaseConfig::Mysql {
            host: host.clone(),
            user: user.clone(),
            password: None,
            database: database.clone(),
        }),
        [host, user, password, database] => Ok(DatabaseConfig::Mysql {
            host: host.clone(),
            user: user.clone(),
            password: Some(password.clone()),
            database: database.clone(),
        }),
        _ => Err(Error::InvalidConfig(
            "--mysql expects HOST USER [PASSWORD] DATABASE".to_string(),
        )),
    }
}

/// `-1`/`-2` select standards explicitly; otherwise the file, defaulting to both
fn tag_standards(args: &Args, file: &TomlConfig) -> Result<Vec<TagStandard>> {
    let mut standards = Vec::new();

    if args.id3v1 || args.id3v2 {
        if args.id3v1 {
            standards.push(TagStandard::Id3v1);
        }
        if args.id3v2 {
            standards.push(TagStandard::Id3v2);
        }
        return Ok(standards);
    }

    let Some(labels) = &file.tag_standards else {
        return Ok(vec![TagStandard::Id3v1, TagStandard::Id3v2]);
    };

    for label in labels {
        let standard = TagStandard::from_label(label).ok_or_else(|| {
            Error::InvalidConfig(format!("unknown tag standard '{}'", label))
        })?;
        if !standards.contains(&standard) {
            standards.push(standard);
        }
    }

    if standards.is_empty() {
        return Err(Error::InvalidConfig(
            "tag_standards must enable at least one standard".to_string(),
        ));
    }

    Ok(standards)
}
