mod source;

use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use orc_errors::Renderer;
use orc_prefix_tree::PrefixTree;
use source::Input;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orc", about = "Front end for the OR declaration language")]
struct Options {
    /// Log parser internals at debug level when `RUST_LOG` is unset.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse `.or` sources and report diagnostics. `.wasm` inputs are
    /// passed through untouched.
    Check {
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,
    },
    /// Print the parsed node list of a source.
    Dump { path: Utf8PathBuf },
    /// Look up keys in a `key:value` build file.
    Config { path: Utf8PathBuf, keys: Vec<String> },
}

fn main() -> anyhow::Result<ExitCode> {
    let options = Options::parse();

    let default_filter = if options.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let renderer = Renderer::styled();

    match options.command {
        Command::Check { paths } => {
            let mut failed = false;

            for path in paths {
                match Input::open(path)? {
                    Input::Source(source) => {
                        let (context, document) = source.parse();
                        if source.report(&context, &renderer) {
                            failed = true;
                        } else {
                            println!("{}: ok, {} node(s)", source.path, document.len);
                        }
                    }
                    Input::Precompiled { path, bytes } => {
                        println!("{path}: precompiled, {} bytes", bytes.len());
                    }
                }
            }

            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Command::Dump { path } => {
            let Input::Source(source) = Input::open(path)? else {
                anyhow::bail!("`dump` expects a `.or` source");
            };

            let (context, document) = source.parse();
            if source.report(&context, &renderer) {
                return Ok(ExitCode::FAILURE);
            }

            print!("{}", context.debug_tree(&document, &source.text));
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { path, keys } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{path}`"))?;
            let tree = PrefixTree::from_config(&text)
                .with_context(|| format!("invalid build file `{path}`"))?;

            if keys.is_empty() {
                println!("{path}: {} entries", tree.len());
            }
            for key in keys {
                match tree.lookup(&key) {
                    Some(value) => println!("{key}: {value}"),
                    None => println!("{key}: <missing>"),
                }
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
