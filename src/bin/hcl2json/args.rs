//! Command line arguments for hcl2json.

use clap::{Args, Parser, ValueHint};
use clap_complete::Shell;
use hcl2json::{ser::SerializeOptions, Sink, Source};
use log::LevelFilter;

/// Convert HCL documents into JSON.
///
/// Blocks are converted into arrays of objects nested below their labels. Literal values are
/// passed through, while all other expressions are emitted as interpolation strings, e.g.
/// `"${var.enabled ? 1 : 0}"`.
#[derive(Parser, Debug)]
#[command(
    name = "hcl2json",
    version,
    after_help = "Hint: `hcl2json -h` only provides a usage summary. Run `hcl2json --help` for the full details to each flag."
)]
pub struct Options {
    /// Input sources.
    ///
    /// If multiple files are provided, the converted documents are read into an array. Data may
    /// also be provided on stdin, either by passing '-' or by piping it without any other source.
    #[arg(name = "SOURCE", value_hint = ValueHint::AnyPath)]
    pub sources: Vec<Source>,

    /// Output sink. Defaults to stdout if omitted.
    ///
    /// Passing '-' as filename or providing no output file will write the data to stdout instead.
    #[arg(short = 'O', long = "sink", value_name = "SINK", value_hint = ValueHint::FilePath)]
    pub sink: Option<Sink>,

    /// Options for reading the input.
    #[clap(flatten)]
    pub input: InputOptions,

    /// Options for writing the output.
    #[clap(flatten)]
    pub output: OutputOptions,

    /// Increase log verbosity. Can be repeated up to three times.
    ///
    /// Without this flag only warnings are logged, unless the `HCL2JSON_LOG` environment variable
    /// configures a different filter.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long)]
    pub quiet: bool,

    /// If provided, outputs the completion file for the given shell.
    #[arg(value_enum, long, value_name = "SHELL")]
    pub generate_completion: Option<Shell>,
}

impl Options {
    /// Initializes the logger based on the verbosity flags.
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let env = env_logger::Env::new().filter_or("HCL2JSON_LOG", "warn");
        let mut builder = env_logger::Builder::from_env(env);

        if self.verbose > 0 {
            let level = match self.verbose {
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            };

            builder.filter_level(level);
        }

        builder.format_timestamp(None).init();
    }
}

/// Options that configure how input sources are read.
#[derive(Args, Debug)]
pub struct InputOptions {
    /// Glob pattern for directories.
    ///
    /// Required if any of the input paths is a directory. Ignored otherwise.
    #[arg(long, help_heading = "Input Options")]
    pub glob: Option<String>,

    /// Read input into a map keyed by file path of the origin file.
    ///
    /// If multiple input files or at least one directory is provided, this reads the result into
    /// a map keyed by file path instead of an array. If only one input file is provided, this
    /// option is ignored.
    #[arg(short = 'P', long, help_heading = "Input Options")]
    pub file_paths: bool,

    /// Continue on errors that occur while reading or converting input data.
    ///
    /// If the flag is provided, `hcl2json` will continue to read and convert the remaining input
    /// sources. For example, this is useful if you want to convert files using a glob pattern and
    /// one of the files is malformed. In this case a warning is logged to stderr and the source
    /// is skipped. This flag is ignored if input is read only from a single source that is not a
    /// directory.
    #[arg(short = 'C', long, help_heading = "Input Options")]
    pub continue_on_error: bool,
}

/// Options that configure the JSON output.
#[derive(Args, Debug)]
pub struct OutputOptions {
    /// Emit compact JSON instead of indented output.
    #[arg(short = 'c', long, help_heading = "Output Options")]
    pub compact: bool,

    /// Number of spaces per indentation level. Ignored with --compact.
    #[arg(
        long,
        value_name = "N",
        default_value_t = 4,
        help_heading = "Output Options"
    )]
    pub indent: usize,

    /// Add a trailing newline to the output.
    #[arg(short = 'n', long, help_heading = "Output Options")]
    pub newline: bool,

    /// Do not escape `<`, `>` and `&` as unicode escape sequences.
    #[arg(long, env = "HCL2JSON_NO_ESCAPE_HTML", help_heading = "Output Options")]
    pub no_escape_html: bool,

    /// Overwrite the output file if it exists.
    #[arg(long, help_heading = "Output Options")]
    pub overwrite: bool,
}

impl From<&OutputOptions> for SerializeOptions {
    fn from(opts: &OutputOptions) -> Self {
        Self {
            pretty: !opts.compact,
            indent: opts.indent,
            escape_html: !opts.no_escape_html,
            newline: opts.newline,
        }
    }
}
