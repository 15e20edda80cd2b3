mod args;

use crate::args::{InputOptions, Options, OutputOptions};
use anyhow::{anyhow, Context, Result};
use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use hcl2json::{ser::Serializer, Error, Sink, Source};
use log::{debug, warn};
use rayon::prelude::*;
use serde_json::Value;
use std::io::{self, BufWriter, IsTerminal};

fn convert(source: &Source) -> Result<Value> {
    let input = source
        .read_to_end()
        .with_context(|| format!("failed to read source `{}`", source))?;

    let input = std::str::from_utf8(&input)
        .map_err(Error::from)
        .with_context(|| format!("failed to read source `{}`", source))?;

    hcl2json::to_value(input, &source.filename())
        .with_context(|| format!("failed to convert `{}` to JSON", source))
}

fn convert_many(sources: &[Source], opts: &InputOptions) -> Result<Value> {
    let results = if opts.continue_on_error {
        sources
            .par_iter()
            .filter_map(|src| match convert(src) {
                Ok(val) => Some((src, val)),
                Err(err) => {
                    warn!("source `{}` skipped due to errors: {:#}", src, err);
                    None
                }
            })
            .collect::<Vec<_>>()
    } else {
        sources
            .par_iter()
            .map(|src| convert(src).map(|val| (src, val)))
            .collect::<Result<Vec<_>>>()?
    };

    if opts.file_paths {
        Ok(Value::Object(
            results
                .into_iter()
                .map(|res| (res.0.to_string(), res.1))
                .collect(),
        ))
    } else {
        Ok(Value::Array(results.into_iter().map(|res| res.1).collect()))
    }
}

fn serialize(sink: &Sink, value: Value, opts: &OutputOptions) -> Result<()> {
    let writer = sink
        .to_writer()
        .with_context(|| format!("failed to create writer for sink `{}`", sink))?;

    let mut ser = Serializer::with_options(BufWriter::new(writer), opts.into());

    match ser.serialize(&value) {
        Ok(()) => Ok(()),
        Err(Error::Io(err)) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(Error::Json(err)) if err.io_error_kind() == Some(io::ErrorKind::BrokenPipe) => Ok(()),
        Err(err) => Err(err),
    }
    .with_context(|| format!("failed to write JSON to `{}`", sink))
}

fn print_completions(cmd: &mut Command, shell: Shell) {
    generate(shell, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn main() -> Result<()> {
    let opts = Options::parse();

    if let Some(shell) = opts.generate_completion {
        let mut cmd = Options::command();
        print_completions(&mut cmd, shell);
        std::process::exit(0);
    }

    opts.init_logging();

    let mut sources = Vec::with_capacity(opts.sources.len());

    // Directory sources always produce a collection, even if the glob matches a single file, so
    // that the output structure does not depend on the number of matches.
    let dir_sources = opts.sources.iter().any(|s| s.is_dir());

    for source in opts.sources {
        match source.as_path() {
            Some(path) if path.is_dir() => {
                let pattern = opts
                    .input
                    .glob
                    .as_ref()
                    .context("--glob is required if sources contain directories")?;

                let mut matches = source.glob_files(pattern)?;
                debug!("glob `{}` matched {} files in `{}`", pattern, matches.len(), source);

                sources.append(&mut matches);
            }
            _ => sources.push(source),
        }
    }

    if sources.is_empty() && !io::stdin().is_terminal() {
        // Input is piped on stdin.
        sources.push(Source::Stdin);
    }

    let sink = opts.sink.unwrap_or(Sink::Stdout);

    sink.check_writable(opts.output.overwrite)?;

    let value = match (sources.len(), dir_sources) {
        (0, false) => return Err(anyhow!("input file or data on stdin expected")),
        (1, false) => convert(&sources[0])?,
        (_, _) => convert_many(&sources, &opts.input)?,
    };

    serialize(&sink, value, &opts.output)
}
