//! tablec - command-line driver for the Table front-end.
//!
//! One positional argument: the source file. Diagnostics go to stderr;
//! the parsed AST goes to stdout on success. Exit code 0 on success, 1
//! on parse failure.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{bail, Result};
use tablec_par::Parser;
use tablec_util::{Emitter, Handler, SourceFile};

const FG_GREEN: &str = "\x1b[32m";
const FG_RED: &str = "\x1b[31m";
const CLEAR: &str = "\x1b[0m";

fn color_is_supported() -> bool {
    io::stderr().is_terminal()
        && env::var("TERM")
            .map(|term| term.starts_with("xterm"))
            .unwrap_or(false)
}

fn main() -> ExitCode {
    match run() {
        Ok(parsed) => {
            if parsed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<bool> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: tablec <source-file>");
    };

    let file = SourceFile::load(&path)?;
    let handler = Handler::new();
    let mut parser = Parser::new(&file, &handler);
    let root = parser.execute();

    let colors = color_is_supported();
    let emitter = Emitter::new(colors);
    let stderr = io::stderr();
    let mut out = stderr.lock();
    emitter.emit_all(&mut out, &file, &handler.diagnostics())?;

    match root {
        Some(module) => {
            status_line(&mut out, colors, FG_GREEN, "Parsing success!")?;
            println!("{:#?}", module);
            Ok(true)
        },
        None => {
            status_line(&mut out, colors, FG_RED, "Parsing failed.")?;
            Ok(false)
        },
    }
}

fn status_line(out: &mut dyn Write, colors: bool, color: &str, text: &str) -> io::Result<()> {
    if colors {
        writeln!(out, "{}{}{}", color, text, CLEAR)
    } else {
        writeln!(out, "{}", text)
    }
}
