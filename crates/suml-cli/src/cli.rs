//! Command-line interface for the suml utility
//!
//! Compiles class and sequence shorthand to backend markup, or all the way to
//! SVG and PNG through the external renderers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::external::{FcList, ImageMagick, ToolBackend};
use suml::core::logging::init_logging;
use suml::plugins::{DiagramKind, Orchestrator};
use suml::{DiagramError, RenderConfig};

/// suml - Turn yUML-style shorthand into diagrams
#[derive(Parser)]
#[command(name = "suml")]
#[command(about = "Compile yUML-style class and sequence shorthand into diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
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
    /// Convert shorthand to markup, SVG or PNG
    Convert {
        /// Grammar the input is written in
        #[arg(short, long, value_enum)]
        kind: KindChoice,

        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to produce
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markup)]
        format: OutputFormat,

        /// Give the rendered SVG a hand-drawn look
        #[arg(long)]
        scruffy: bool,

        /// Draw drop shadows behind sketched shapes
        #[arg(long)]
        shadow: bool,

        /// Keep flat fills instead of gradients when sketching
        #[arg(long)]
        no_gradient: bool,

        /// Font family for diagram text
        #[arg(long)]
        font: Option<String>,

        /// PIC macro file to `copy` instead of the bundled sequence macros
        #[arg(long)]
        prelude: Option<String>,

        /// Trim the uniform border from PNG output
        #[arg(long)]
        crop: bool,

        /// Seed for reproducible sketches
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show supported diagram kinds
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate shorthand syntax
    Validate {
        /// Grammar the input is written in
        #[arg(short, long, value_enum)]
        kind: KindChoice,

        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Diagram grammars
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum KindChoice {
    Class,
    #[value(alias = "seq")]
    Sequence,
}

impl From<KindChoice> for DiagramKind {
    fn from(value: KindChoice) -> Self {
        match value {
            KindChoice::Class => DiagramKind::Class,
            KindChoice::Sequence => DiagramKind::Sequence,
        }
    }
}

/// Output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Graphviz or PIC source, no external tools needed
    #[default]
    Markup,
    /// Rendered SVG
    Svg,
    /// Rasterized PNG
    Png,
}

/// Options of the convert command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub scruffy: bool,
    pub shadow: bool,
    pub no_gradient: bool,
    pub font: Option<String>,
    pub prelude: Option<String>,
    pub crop: bool,
    pub seed: Option<u64>,
}

impl ConvertOptions {
    /// Render configuration before the font probe runs
    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::new()
            .with_scruffy(self.scruffy)
            .with_shadow(self.shadow)
            .with_gradient(!self.no_gradient);
        if let Some(font) = &self.font {
            config = config.with_font(font.as_str());
        }
        if let Some(prelude) = &self.prelude {
            config = config.with_sequence_prelude(prelude.as_str());
        }
        config
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        }
    }
}

/// One entry of the `types` listing
#[derive(Debug, Serialize)]
struct KindInfo {
    name: &'static str,
    description: &'static str,
    markup: &'static str,
}

/// Main CLI application
pub struct SumlApp;

impl SumlApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags.
        let log_level_str = std::env::var("SUML_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("SUML_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("suml v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                kind,
                input,
                output,
                format,
                scruffy,
                shadow,
                no_gradient,
                font,
                prelude,
                crop,
                seed,
            } => {
                let options = ConvertOptions {
                    format,
                    scruffy,
                    shadow,
                    no_gradient,
                    font,
                    prelude,
                    crop,
                    seed,
                };
                self.convert_command(kind.into(), input, output, &options, cli.verbose)
            }
            Commands::Types { json } => self.types_command(json, cli.verbose),
            Commands::Validate { kind, input } => {
                self.validate_command(kind.into(), input, cli.verbose)
            }
        }
    }

    /// Handle the convert command
    fn convert_command(
        &self,
        kind: DiagramKind,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        options: &ConvertOptions,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let config = options.render_config().resolve_font(&FcList);
        if verbose {
            if let Some(font) = &config.font {
                eprintln!("Using font {}", font);
            }
        }
        let orchestrator = Orchestrator::new(config);
        let mut rng = options.rng();

        match options.format {
            OutputFormat::Markup => {
                let markup = orchestrator.compile(kind, &content)?;
                self.write_output(output, &markup)?;
            }
            OutputFormat::Svg => {
                let svg = orchestrator.render_svg(kind, &content, &ToolBackend, rng.as_mut())?;
                self.write_output(output, &svg)?;
            }
            OutputFormat::Png => {
                let png = orchestrator.render_png(
                    kind,
                    &content,
                    &ToolBackend,
                    &ImageMagick,
                    options.crop,
                    rng.as_mut(),
                )?;
                self.write_bytes(output, &png)?;
            }
        }

        if verbose {
            eprintln!("Successfully converted {} diagram", kind);
        }
        Ok(())
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported diagram kinds");
        }

        let kinds: Vec<KindInfo> = DiagramKind::variants()
            .iter()
            .map(|kind| KindInfo {
                name: kind.name(),
                description: kind.description(),
                markup: kind.markup_format(),
            })
            .collect();

        let total = kinds.len();
        if json {
            let types = serde_json::json!({
                "supported_types": kinds,
                "total": total,
            });
            println!("{}", serde_json::to_string_pretty(&types)?);
        } else {
            println!("Supported diagram kinds:");
            for kind in &kinds {
                println!("  {:<9} - {} ({})", kind.name, kind.description, kind.markup);
            }
            println!();
            println!("Total: {} diagram kinds supported", total);
        }

        Ok(())
    }

    /// Handle the validate command
    fn validate_command(
        &self,
        kind: DiagramKind,
        input: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match Orchestrator::default().compile(kind, &content) {
            Ok(_) => {
                println!("✓ Valid {} diagram", kind);
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid {} diagram: {}", kind, e);
                Err(e)
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(DiagramError::from)
                .with_context(|| format!("Failed to read input file '{}'", path.display())),
            _ => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .map_err(DiagramError::from)?;
                Ok(content)
            }
        }
    }

    /// Write text output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content)
                    .map_err(DiagramError::from)
                    .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Write binary output to file or stdout
    pub fn write_bytes(&self, output: Option<PathBuf>, content: &[u8]) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content)
                    .map_err(DiagramError::from)
                    .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for SumlApp {
    fn default() -> Self {
        Self::new()
    }
}
