//! mosaic - Run layout operations against a slide saved as JSON
//!
//! Reads a document (the serialized form of the in-memory surface), runs one
//! operation against the selected elements, and writes the changed document
//! back out. The outcome is printed to stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use mosaic_core::geometry::Axis;
use mosaic_core::model::{DuplicateSettings, ElementId, MarginSettings, Margins, MatrixSettings, SplitSettings};
use mosaic_core::units::cm_to_pt;
use mosaic_core::{BulkSelection, Command, Engine, EngineConfig, MemorySurface, Report, SpacingRequest};
use tracing_subscriber::EnvFilter;

/// Run grid and table layout operations on a slide document.
#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the document JSON
    input: PathBuf,

    /// Where to write the changed document (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Element ids to select, replacing the selection stored in the document
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<u64>,

    /// Engine configuration JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lengths on the command line are in centimetres instead of points
    #[arg(long, action = ArgAction::SetTrue)]
    cm: bool,

    /// Print the report as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Replace each selected table with one element per cell
    TableToElements,
    /// Build a table from a grid of selected elements
    ElementsToTable,
    /// Append a row below the grid or table
    AddRow,
    /// Append a column to the right of the grid or table
    AddColumn,
    /// Add a header row above the grid or table
    AddHeaderRow,
    /// Draw separator lines between grid rows
    CreateSeparators,
    /// Move existing separator lines back into the row gaps
    RealignSeparators,
    /// Delete all separator and header lines
    RemoveSeparators,
    /// Centre elements in the cells they fall into
    AssignToCells {
        /// Container element ids; the selected table's cells when omitted
        #[arg(long, value_delimiter = ',')]
        containers: Vec<u64>,
    },
    /// Create a new matrix of rectangles
    CreateMatrix {
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        columns: usize,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[arg(long, default_value_t = 0.0)]
        spacing: f64,
        /// Label each rectangle with its ordinal
        #[arg(long, action = ArgAction::SetTrue)]
        text: bool,
        /// Uniform text margin for every rectangle
        #[arg(long)]
        margin: Option<f64>,
    },
    /// Copy the selected element into a grid
    DuplicateToGrid {
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        columns: usize,
        #[arg(long, default_value_t = 0.0)]
        spacing: f64,
        /// Leave the copies empty
        #[arg(long, action = ArgAction::SetTrue)]
        no_text: bool,
    },
    /// Cut the selected element into equal pieces
    SplitElement {
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        columns: usize,
        #[arg(long, default_value_t = 0.0)]
        spacing: f64,
        /// Copy the source text into every piece
        #[arg(long, action = ArgAction::SetTrue)]
        text: bool,
    },
    /// Set text margins on the selection
    ApplyMargins {
        #[arg(long, default_value_t = 0.0)]
        left: f64,
        #[arg(long, default_value_t = 0.0)]
        top: f64,
        #[arg(long, default_value_t = 0.0)]
        right: f64,
        #[arg(long, default_value_t = 0.0)]
        bottom: f64,
    },
    /// Resize rows or columns and re-pack the grid
    AdjustSpacing {
        #[arg(long, value_enum, default_value_t = AxisArg::Rows)]
        axis: AxisArg,
        #[arg(long, value_enum)]
        bulk: Option<BulkArg>,
        /// Row or column indices to toggle, 0-based
        #[arg(long, value_delimiter = ',')]
        lines: Vec<usize>,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        delta: f64,
        #[arg(long)]
        spacing: Option<f64>,
    },
    /// Run a command given as JSON, e.g. '{"command": "add_row"}'
    Run {
        command: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    Rows,
    Columns,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BulkArg {
    All,
    None,
    Odd,
    Even,
    Edge,
}

impl From<AxisArg> for Axis {
    fn from(a: AxisArg) -> Self {
        match a {
            AxisArg::Rows => Axis::Rows,
            AxisArg::Columns => Axis::Columns,
        }
    }
}

impl From<BulkArg> for BulkSelection {
    fn from(b: BulkArg) -> Self {
        match b {
            BulkArg::All => BulkSelection::All,
            BulkArg::None => BulkSelection::None,
            BulkArg::Odd => BulkSelection::Odd,
            BulkArg::Even => BulkSelection::Even,
            BulkArg::Edge => BulkSelection::Edge,
        }
    }
}

fn ids(raw: &[u64]) -> Vec<ElementId> {
    raw.iter().copied().map(ElementId).collect()
}

/// Converts command-line arguments into an engine command.
fn build_command(cmd: Cmd, cm: bool) -> Result<Command> {
    let len = |v: f64| if cm { cm_to_pt(v) } else { v };
    let command = match cmd {
        Cmd::TableToElements => Command::TableToElements,
        Cmd::ElementsToTable => Command::ElementsToTable,
        Cmd::AddRow => Command::AddRow,
        Cmd::AddColumn => Command::AddColumn,
        Cmd::AddHeaderRow => Command::AddHeaderRow,
        Cmd::CreateSeparators => Command::CreateSeparators,
        Cmd::RealignSeparators => Command::RealignSeparators,
        Cmd::RemoveSeparators => Command::RemoveSeparators,
        Cmd::AssignToCells { containers } => Command::AssignToCells {
            containers: ids(&containers),
        },
        Cmd::CreateMatrix {
            rows,
            columns,
            width,
            height,
            spacing,
            text,
            margin,
        } => Command::CreateMatrix(MatrixSettings {
            rows,
            columns,
            cell_width: len(width),
            cell_height: len(height),
            spacing: len(spacing),
            include_text: text,
            margins: margin.map(|m| Margins::uniform(len(m))),
        }),
        Cmd::DuplicateToGrid {
            rows,
            columns,
            spacing,
            no_text,
        } => Command::DuplicateToGrid(DuplicateSettings {
            rows,
            columns,
            spacing: len(spacing),
            include_text: !no_text,
        }),
        Cmd::SplitElement {
            rows,
            columns,
            spacing,
            text,
        } => Command::SplitElement(SplitSettings {
            rows,
            columns,
            spacing: len(spacing),
            include_text: text,
        }),
        Cmd::ApplyMargins {
            left,
            top,
            right,
            bottom,
        } => Command::ApplyMargins(MarginSettings {
            margins: Margins {
                left: len(left),
                top: len(top),
                right: len(right),
                bottom: len(bottom),
            },
        }),
        Cmd::AdjustSpacing {
            axis,
            bulk,
            lines,
            delta,
            spacing,
        } => Command::AdjustSpacing(SpacingRequest {
            axis: axis.into(),
            select: bulk.map(Into::into),
            lines,
            delta: len(delta),
            spacing: spacing.map(len),
        }),
        Cmd::Run { command } => {
            if cm {
                bail!("--cm does not apply to JSON commands; give lengths in points");
            }
            serde_json::from_str(&command).context("invalid command JSON")?
        }
    };
    Ok(command)
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let file = File::open(path).with_context(|| format!("cannot open config {}", path.display()))?;
    let config: EngineConfig =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("invalid config {}", path.display()))?;
    config.validate().with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn load_document(path: &PathBuf) -> Result<MemorySurface> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("invalid document {}", path.display()))
}

fn write_document(surface: &MemorySurface, output: Option<&PathBuf>) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, surface)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    let config = load_config(args.config.as_ref())?;
    let mut surface = load_document(&args.input)?;
    if !args.select.is_empty() {
        surface.select(&ids(&args.select));
    }
    let command = build_command(args.command, args.cm)?;
    tracing::debug!(operation = ?command.operation(), "running");

    let mut engine = Engine::with_config(surface, config);
    let report = engine.run(&command);

    if args.json {
        eprintln!("{}", serde_json::to_string(&report)?);
    } else {
        eprintln!("{report}");
    }

    if let Report::Done { .. } = report {
        write_document(engine.surface(), args.output.as_ref())?;
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
