//! These structs provide the CLI interface for the costbook CLI.

use crate::model::{EntryForm, Header, SchemaVersion};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// costbook: A command-line tool for recording item cost entries.
///
/// Each entry describes an item along with its category, unit, costs, brand and date. Entries are
/// kept in a CSV file (cost_data.csv by default) that opens directly in a spreadsheet program.
/// The file is rewritten in full after every change.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory, the configuration file and the data file.
    ///
    /// This is the first command you should run. The schema version decides which columns the data
    /// file has and cannot be changed afterwards without converting the file yourself. If a data
    /// file already exists at the chosen path it is kept as is.
    Init(InitArgs),
    /// List entries, optionally only those matching QUERY.
    ///
    /// Matching is a case-insensitive substring match against the configured search columns. The
    /// index shown next to each entry is its position in the file, which is what `edit`, `delete`
    /// and `ref` expect.
    List(ListArgs),
    /// Add a new entry.
    Add(AddArgs),
    /// Change an existing entry. Fields that are not given keep their current values.
    Edit(EditArgs),
    /// Delete an entry. Later entries move down by one index.
    Delete(DeleteArgs),
    /// Show, set or clear the reference file of an entry.
    Ref(RefArgs),
    /// Show the columns of the active schema.
    Schema(SchemaArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where costbook configuration and data is held. Defaults to ~/costbook
    #[arg(long, env = "COSTBOOK_HOME", default_value_t = default_costbook_home())]
    costbook_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, costbook_home: PathBuf) -> Self {
        Self {
            log_level,
            costbook_home: costbook_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn costbook_home(&self) -> &DisplayPath {
        &self.costbook_home
    }
}

/// (Not shown): Args for the `costbook init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The header layout of the data file.
    #[arg(long, value_enum, default_value_t = SchemaVersion::default())]
    schema: SchemaVersion,

    /// Where to keep the data file. A relative path is resolved against the home directory.
    /// Defaults to cost_data.csv
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// The name filled into a blank "Logged By" field.
    #[arg(long)]
    logged_by: Option<String>,
}

impl InitArgs {
    pub fn new(
        schema: SchemaVersion,
        data_file: Option<PathBuf>,
        logged_by: Option<String>,
    ) -> Self {
        Self {
            schema,
            data_file,
            logged_by,
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    pub fn logged_by(&self) -> Option<&str> {
        self.logged_by.as_deref()
    }
}

/// (Not shown): Args for the `costbook list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only list entries containing this text. Lists everything when omitted.
    query: Option<String>,
}

impl ListArgs {
    pub fn new(query: Option<String>) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

/// (Not shown): Args for the `costbook add` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AddArgs {
    /// A field value in the form "Header=Value", e.g. --set "Item Description=Steel Beam".
    /// May be given any number of times.
    #[arg(long = "set", value_name = "HEADER=VALUE")]
    fields: Vec<FieldValue>,
}

impl AddArgs {
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }
}

/// (Not shown): Args for the `costbook edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The index of the entry, as shown by `costbook list`.
    index: usize,

    /// A field value in the form "Header=Value". May be given any number of times.
    #[arg(long = "set", value_name = "HEADER=VALUE")]
    fields: Vec<FieldValue>,
}

impl EditArgs {
    pub fn new(index: usize, fields: Vec<FieldValue>) -> Self {
        Self { index, fields }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }
}

/// (Not shown): Args for the `costbook delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The index of the entry, as shown by `costbook list`.
    index: usize,
}

impl DeleteArgs {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// (Not shown): Args for the `costbook ref` command.
#[derive(Debug, Parser, Clone)]
pub struct RefArgs {
    #[command(subcommand)]
    action: RefAction,
}

impl RefArgs {
    pub fn new(action: RefAction) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &RefAction {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum RefAction {
    /// Show the reference file of an entry.
    Show {
        /// The index of the entry.
        index: usize,
    },
    /// Set the reference file of an entry. The file does not need to exist.
    Set {
        /// The index of the entry.
        index: usize,
        /// The path to store.
        path: PathBuf,
    },
    /// Remove the reference file from an entry.
    Clear {
        /// The index of the entry.
        index: usize,
    },
}

/// (Not shown): Args for the `costbook schema` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SchemaArgs {}

/// A single `Header=Value` pair given on the command line. Only the first `=` separates the
/// header from the value, so values may contain `=`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FieldValue {
    header: Header,
    value: String,
}

impl FieldValue {
    pub fn new(header: impl Into<Header>, value: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            value: value.into(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sets every `FieldValue` of `fields` on `form`.
    pub fn apply_all(fields: &[FieldValue], form: &mut EntryForm) {
        for field in fields {
            form.set(field.header.clone(), field.value.clone());
        }
    }
}

impl FromStr for FieldValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((header, value)) = s.split_once('=') else {
            return Err(format!("Expected HEADER=VALUE but got '{s}'"));
        };
        let header = header.trim();
        if header.is_empty() {
            return Err(format!("The header is missing in '{s}'"));
        }
        Ok(Self::new(header, value))
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.header, self.value)
    }
}

fn default_costbook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("costbook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --costbook-home or COSTBOOK_HOME instead of relying on the \
                default costbook home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("costbook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
