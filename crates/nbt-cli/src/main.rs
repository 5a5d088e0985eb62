//! nbt: convert NBT documents between gzip binary and text form.
//!
//! # Usage
//!
//! ```bash
//! # Print a binary document as text
//! nbt < level.dat
//!
//! # Compile text into a binary document
//! nbt -p -c < level.snbt > level.dat
//!
//! # Run with debug logging
//! nbt --debug < level.dat
//! ```

use std::io::{Read, Write};

use anyhow::Context;
use clap::Parser;
use nbt_cli::cli::Cli;
use nbt_cli::{Conversion, convert, exit_code, report};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(cli.stderr_color())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let input = match read_input() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{e:#}");
            return exit_code::IO_ERROR;
        }
    };
    debug!(bytes = input.len(), parse = cli.parse, compress = cli.compress, "read input");

    let conv = Conversion {
        parse: cli.parse,
        compress: cli.compress,
        print: cli.print_options(cli.stdout_color()),
    };

    let output = match convert(&input, &conv) {
        Ok(output) => output,
        Err(e) => {
            eprint!("{}", report(&e, &input, cli.stderr_color()));
            return exit_code::CONVERSION_ERROR;
        }
    };

    if let Err(e) = write_output(&output) {
        eprintln!("{e:#}");
        return exit_code::IO_ERROR;
    }
    exit_code::SUCCESS
}

fn read_input() -> anyhow::Result<Vec<u8>> {
    let mut input = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

fn write_output(output: &[u8]) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output).context("failed to write stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}
