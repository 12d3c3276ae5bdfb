//! esparse: parse ECMAScript source text and print the AST as JSON.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use esparse_parser::{parse_with_options, ParseError, ParserOptions};
use miette::{Diagnostic, NamedSource, SourceSpan};

#[derive(Parser)]
#[command(name = "esparse", version, about = "Parse ECMAScript source into a JSON syntax tree")]
struct Cli {
    /// File to parse; reads standard input when omitted.
    file: Option<PathBuf>,

    /// Parse with the module goal symbol (implies strict mode).
    #[arg(long)]
    module: bool,

    /// Start out in strict mode even without a directive.
    #[arg(long)]
    strict: bool,

    /// Attach line/column locations to every node.
    #[arg(long)]
    loc: bool,

    /// Reject the annex-B web-compatibility relaxations.
    #[arg(long = "no-web-compat")]
    no_web_compat: bool,

    /// Enable in-progress grammar extensions (logical assignment,
    /// numeric separators, class static blocks).
    #[arg(long)]
    next: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

/// A parse failure rendered against its source text.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
struct ParseFailure {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{kind} here")]
    span: SourceSpan,
    kind: String,
}

impl ParseFailure {
    fn new(name: &str, source: String, error: ParseError) -> Self {
        let span = error.span();
        let length = (span.length as usize).max(1);
        Self {
            message: error.message.clone(),
            source_code: NamedSource::new(name, source),
            span: SourceSpan::new((span.start as usize).into(), length),
            kind: error.kind.to_string(),
        }
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let (name, source) = read_input(&cli)?;

    let options = ParserOptions {
        strict: cli.strict,
        module: cli.module,
        location_tracking: cli.loc,
        disable_web_compat: cli.no_web_compat,
        next_syntax: cli.next,
    };

    let program = parse_with_options(&source, options)
        .map_err(|error| ParseFailure::new(&name, source.clone(), error))?;
    print_program(&cli, &program)
}

fn print_program(cli: &Cli, program: &esparse_parser::Program) -> miette::Result<()> {
    let json = if cli.pretty {
        serde_json::to_string_pretty(&program)
    } else {
        serde_json::to_string(&program)
    };
    match json {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(error) => Err(miette::miette!("failed to serialize syntax tree: {error}")),
    }
}

fn read_input(cli: &Cli) -> miette::Result<(String, String)> {
    match &cli.file {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .map_err(|error| miette::miette!("cannot read {}: {error}", path.display()))?;
            Ok((path.display().to_string(), source))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|error| miette::miette!("cannot read stdin: {error}"))?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}
