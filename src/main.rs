use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use minipy::interpreter::Interpreter;
use minipy::{lexer, parser};

fn main() -> Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("Reading stdin")?;

    let tokens = lexer::tokenize(&source)?;
    let program = parser::parse_tokens(tokens)?;

    let stdout = io::stdout();
    let mut output = stdout.lock();
    Interpreter::new(&mut output).run(&program)?;
    output.flush().context("Flushing stdout")?;
    Ok(())
}
