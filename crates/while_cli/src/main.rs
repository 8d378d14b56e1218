mod cli;
mod diagnostics;


use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser as _;
use cli::{Cli, Command, Input};
use diagnostics::{DiagnosticEmitter, PrettyDiagnosticEmitter};
use tracing::info;
use while_diagnostic::sources::{SourceFile, SourceMap};
use while_diagnostic::IntoDiagnostic;
use while_frontend::ast::Statement;
use while_interpreter::{Deadline, Environment, Interpreter, NoInterrupt, RunError};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("failed to read `{path}`: {source}")]
    Read { path: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("error while running: {0}")]
    Run(#[from] RunError),

    #[error("errors while parsing")]
    HadErrors,
}

type CliResult<T> = Result<T, CliError>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();
    let mut emitter = PrettyDiagnosticEmitter::default();

    match execute(cli.command, &mut stdout, &mut emitter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(
    command: Command,
    output: &mut impl Write,
    emitter: &mut impl DiagnosticEmitter,
) -> CliResult<()> {
    match command {
        Command::Run {
            input,
            args,
            timeout,
        } => {
            let program = load_program(&input, emitter)?;
            let env = Environment::from_args(args);

            let env = match timeout {
                Some(ms) => {
                    Interpreter::with_interrupt(Deadline::after(Duration::from_millis(ms)))
                        .run(&program, env)
                }
                None => Interpreter::with_interrupt(NoInterrupt).run(&program, env),
            }?;

            writeln!(output, "{}", env.output())?;
            Ok(())
        }

        Command::Check { input } => {
            load_program(&input, emitter)?;
            info!(input = %input.input, "program is well formed");
            Ok(())
        }
    }
}

/// Reads and parses the input, emitting a diagnostic if it is malformed.
fn load_program(input: &Input, emitter: &mut impl DiagnosticEmitter) -> CliResult<Statement> {
    let bytes = read_source(input)?;
    info!(input = %input.input, bytes = bytes.len(), "loaded source");

    let err = match while_frontend::parse(bytes.as_slice()) {
        Ok(program) => return Ok(program),
        Err(err) => err,
    };

    // the scanner has already reported any invalid UTF-8 at the offending byte
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let source = if input.source {
        SourceFile::new("<source>", text)
    } else if input.input == "-" {
        SourceFile::new("<stdin>", text)
    } else {
        SourceFile::new(input.input.as_str(), text).with_path(&input.input)
    };

    let mut sources = SourceMap::default();
    let source_id = sources.insert(source);

    emitter.emit_diagnostic(err.into_diagnostic(source_id), &sources)?;
    Err(CliError::HadErrors)
}

fn read_source(input: &Input) -> CliResult<Vec<u8>> {
    if input.source {
        return Ok(input.input.clone().into_bytes());
    }

    if input.input == "-" {
        let mut bytes = vec![];
        io::stdin().lock().read_to_end(&mut bytes)?;
        return Ok(bytes);
    }

    std::fs::read(&input.input).map_err(|source| CliError::Read {
        path: input.input.clone(),
        source,
    })
}
