//! Command-line interface for the railyard utility
//!
//! Loads a grammar serialized as JSON and renders its productions as SVG or
//! text railroad diagrams.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use railyard::charset::CodePointSet;
use railyard::core::logging::init_logging;
use railyard::core::{BuilderOptions, Overrides, RenderOptions};
use railyard::diagram::{Diagram, DiagramBuilder};
use railyard::grammar::Grammar;
use railyard::plugins::{AsciiCanvas, GlyphStyle, SvgCanvas};
use railyard::render::{CanvasProvider, ShapeRenderer};

/// Railyard - Render grammars as railroad syntax diagrams
#[derive(Parser)]
#[command(name = "railyard")]
#[command(about = "A Rust utility to render formal grammars as railroad syntax diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error); falls back to
    /// RAILYARD_LOG_LEVEL, then RUST_LOG
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json); falls back to RAILYARD_LOG_FORMAT
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render productions as railroad diagrams
    Render {
        /// Grammar file in JSON form (use - for stdin)
        #[arg(short, long)]
        grammar: PathBuf,

        /// Production to render; repeat for several, omit for all
        #[arg(short, long = "root")]
        roots: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Glyph set for text output
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// Draw case-insensitive literals as upper/lower branches
        #[arg(long)]
        expand_any_case: bool,

        /// Option override such as render.arc_radius=4 or builder.factor_affixes=false
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Output file, or a directory for one file per production
        /// (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print built figure trees as JSON
    Figure {
        /// Grammar file in JSON form (use - for stdin)
        #[arg(short, long)]
        grammar: PathBuf,

        /// Production to build; repeat for several, omit for all
        #[arg(short, long = "root")]
        roots: Vec<String>,

        /// Draw case-insensitive literals as upper/lower branches
        #[arg(long)]
        expand_any_case: bool,
    },

    /// Parse a bracket expression and print its canonical form
    Charset {
        /// Character set such as "[a-z0-9_]"
        text: String,

        /// Print the code point ranges as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the productions of a grammar
    Productions {
        /// Grammar file in JSON form (use - for stdin)
        #[arg(short, long)]
        grammar: PathBuf,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Supported output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Ascii,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Ascii => "txt",
        }
    }
}

/// Supported glyph sets for text output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for GlyphStyle {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => GlyphStyle::Ascii,
            StyleChoice::Unicode => GlyphStyle::Unicode,
        }
    }
}

#[derive(Serialize)]
struct ProductionListing<'a> {
    language: &'a str,
    productions: Vec<&'a str>,
}

/// Main CLI application
#[derive(Default)]
pub struct RailyardApp {
    verbose: bool,
}

impl RailyardApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        let level = cli.log_level.map(|l| l.as_str());
        let format = cli.log_format.map(|f| f.as_str());
        if let Err(e) = init_logging(level, format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.verbose = cli.verbose;
        if self.verbose {
            eprintln!("Railyard v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                grammar,
                roots,
                format,
                style,
                expand_any_case,
                overrides,
                output,
            } => {
                let overrides = Overrides::parse(&overrides)?;
                let (builder, render) = split_overrides(&overrides, expand_any_case, format)?;
                self.render_command(&grammar, &roots, format, style, builder, render, output)
            }
            Commands::Figure {
                grammar,
                roots,
                expand_any_case,
            } => self.figure_command(&grammar, &roots, expand_any_case),
            Commands::Charset { text, json } => self.charset_command(&text, json),
            Commands::Productions { grammar, json } => self.productions_command(&grammar, json),
        }
    }

    /// Handle the render command
    #[allow(clippy::too_many_arguments)]
    fn render_command(
        &self,
        grammar: &Path,
        roots: &[String],
        format: OutputFormat,
        style: StyleChoice,
        builder: BuilderOptions,
        render: RenderOptions,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let grammar = self.load_grammar(grammar)?;
        let diagrams = build_diagrams(&grammar, roots, builder)?;
        let mut renderer = ShapeRenderer::new(render);

        let rendered = match format {
            OutputFormat::Svg => render_all(&diagrams, &mut renderer, &mut SvgCanvas::new())?,
            OutputFormat::Ascii => {
                render_all(&diagrams, &mut renderer, &mut AsciiCanvas::new(style.into()))?
            }
        };
        info!(diagrams = rendered.len(), format = format.extension(), "Rendered diagrams");

        match output {
            Some(dir) if dir.is_dir() => {
                let files = diagrams
                    .iter()
                    .map(|d| output_file_name(d.name(), format.extension()))
                    .collect::<Result<Vec<_>>>()?;
                for (file, content) in files.into_iter().zip(&rendered) {
                    self.write_output(Some(dir.join(file)), content)?;
                }
                Ok(())
            }
            output => self.write_output(output, &rendered.join("\n")),
        }
    }

    /// Handle the figure command
    fn figure_command(&self, grammar: &Path, roots: &[String], expand_any_case: bool) -> Result<()> {
        let grammar = self.load_grammar(grammar)?;
        let options = BuilderOptions::new().expand_any_case(expand_any_case);
        let diagrams = build_diagrams(&grammar, roots, options)?;
        self.write_output(None, &serde_json::to_string_pretty(&diagrams)?)
    }

    /// Handle the charset command
    fn charset_command(&self, text: &str, json: bool) -> Result<()> {
        let set = CodePointSet::parse(text)?;
        if self.verbose {
            eprintln!("{} code points in {} ranges", set.len(), set.ranges().len());
        }
        if json {
            self.write_output(None, &serde_json::to_string_pretty(&set)?)
        } else {
            self.write_output(None, &set.to_string())
        }
    }

    /// Handle the productions command
    fn productions_command(&self, grammar: &Path, json: bool) -> Result<()> {
        let grammar = self.load_grammar(grammar)?;
        if json {
            let listing = ProductionListing {
                language: grammar.language(),
                productions: grammar.names().collect(),
            };
            return self.write_output(None, &serde_json::to_string_pretty(&listing)?);
        }

        let mut text = format!("Language: {}\n", grammar.language());
        for name in grammar.names() {
            text.push_str("  ");
            text.push_str(name);
            text.push('\n');
        }
        text.push_str(&format!("\nTotal: {} productions", grammar.len()));
        self.write_output(None, &text)
    }

    /// Read and validate a grammar document
    pub fn load_grammar(&self, path: &Path) -> Result<Grammar> {
        let content = self.read_input(path)?;
        if self.verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let grammar: Grammar = serde_json::from_str(&content)
            .with_context(|| format!("Invalid grammar in '{}'", path.display()))?;
        debug!(
            language = grammar.language(),
            productions = grammar.len(),
            "Loaded grammar"
        );
        Ok(grammar)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, path: &Path) -> Result<String> {
        if path.to_string_lossy() == "-" {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        } else {
            fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e))
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                if self.verbose {
                    eprintln!("Wrote {}", path.display());
                }
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

/// Split `builder.*` and `render.*` overrides and merge them over the
/// defaults for `format`
fn split_overrides(
    overrides: &Overrides,
    expand_any_case: bool,
    format: OutputFormat,
) -> Result<(BuilderOptions, RenderOptions)> {
    if let Some(key) = overrides
        .keys()
        .find(|k| !k.starts_with("builder.") && !k.starts_with("render."))
    {
        bail!("Option '{}' must start with 'builder.' or 'render.'", key);
    }
    let builder = BuilderOptions::new()
        .expand_any_case(expand_any_case)
        .with_overrides(&overrides.scoped("builder"))?;
    let render = match format {
        OutputFormat::Svg => RenderOptions::default(),
        OutputFormat::Ascii => RenderOptions::grid(),
    }
    .with_overrides(&overrides.scoped("render"))?;
    Ok((builder, render))
}

/// File name for one diagram inside an output directory
///
/// Production names are free text, so names that would leave the directory
/// or name no file are rejected.
fn output_file_name(name: &str, extension: &str) -> Result<String> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
    {
        bail!(
            "Production '{}' cannot be written as a file; render it to a single output file instead",
            name
        );
    }
    Ok(format!("{}.{}", name, extension))
}

fn build_diagrams(grammar: &Grammar, roots: &[String], options: BuilderOptions) -> Result<Vec<Diagram>> {
    let builder = DiagramBuilder::new(grammar, options);
    let diagrams = if roots.is_empty() {
        builder.build_all()?
    } else {
        builder.build(roots)?
    };
    Ok(diagrams)
}

fn render_all<C>(
    diagrams: &[Diagram],
    renderer: &mut ShapeRenderer,
    canvas: &mut C,
) -> Result<Vec<String>>
where
    C: CanvasProvider<Output = String>,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    diagrams
        .iter()
        .map(|d| {
            d.convert(renderer, canvas)
                .with_context(|| format!("Failed to render '{}'", d.name()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const GRAMMAR: &str = r#"{
        "language": "demo",
        "productions": [
            {"name": "list", "term": {"kind": "sequence", "children": [
                {"kind": "non_terminal", "name": "item"},
                {"kind": "repeat", "min": 0, "body": {"kind": "sequence", "children": [
                    {"kind": "literal", "text": ","},
                    {"kind": "non_terminal", "name": "item"}
                ]}}
            ]}},
            {"name": "item", "term": {"kind": "literal", "text": "x"}}
        ]
    }"#;

    #[test]
    fn test_app_creation() {
        let app = RailyardApp::new();
        assert!(!app.verbose);
    }

    #[test]
    fn test_load_grammar() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.json");
        fs::write(&path, GRAMMAR).unwrap();

        let grammar = RailyardApp::new().load_grammar(&path).unwrap();
        assert_eq!(grammar.language(), "demo");
        assert_eq!(grammar.names().collect::<Vec<_>>(), ["list", "item"]);
    }

    #[test]
    fn test_load_grammar_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();

        let err = RailyardApp::new().load_grammar(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        RailyardApp::new()
            .write_output(Some(path.clone()), "Test output")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Test output");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("list", "svg").unwrap(), "list.svg");
        assert_eq!(output_file_name("a-b.c", "txt").unwrap(), "a-b.c.txt");
        for name in ["", ".", "..", "../escape", "a/b", "a\\b", "nul\0"] {
            assert!(output_file_name(name, "svg").is_err(), "{name:?}");
        }
    }

    #[test]
    fn test_split_overrides() {
        let overrides =
            Overrides::parse(["builder.factor_affixes=false", "render.arc_radius=3"]).unwrap();
        let (builder, render) = split_overrides(&overrides, true, OutputFormat::Ascii).unwrap();
        assert!(builder.expand_any_case);
        assert!(!builder.factor_affixes);
        assert_eq!(render.arc_radius, 3.0);
        assert_eq!(render.horizontal_gap, RenderOptions::grid().horizontal_gap);
    }

    #[test]
    fn test_split_overrides_requires_scope() {
        let overrides = Overrides::parse(["arc_radius=3"]).unwrap();
        assert!(split_overrides(&overrides, false, OutputFormat::Svg).is_err());
    }

    #[test]
    fn test_render_args() {
        let args = vec![
            "railyard", "render", "--grammar", "g.json", "--root", "a", "--root", "b",
            "--format", "ascii", "--set", "render.margin=1",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Render {
                roots,
                format,
                overrides,
                ..
            } => {
                assert_eq!(roots, ["a", "b"]);
                assert_eq!(format, OutputFormat::Ascii);
                assert_eq!(overrides, ["render.margin=1"]);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["railyard", "--verbose", "charset", "[a]"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.log_level.is_none());
    }
}
