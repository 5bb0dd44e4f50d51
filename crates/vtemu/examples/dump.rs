//! Minimal embedding: drain stdin through a host FIFO into the
//! interpreter and dump the resulting grid.
//!
//! ```text
//! printf 'hello\x1b[2;4Hworld\x1b[31m!' | cargo run --example dump
//! ```

use std::io::Read;

use tracing_subscriber::EnvFilter;
use vtemu::{Interpreter, Screen};
use vtfifo::ByteFifo;

const UART_FIFO_DEPTH: usize = 8;

fn drain(fifo: &mut ByteFifo, vt: &mut Interpreter, screen: &mut Screen) {
    while let Some(byte) = fifo.pop() {
        vt.feed(screen, byte);
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;

    let mut screen = Screen::new(80, 40);
    let mut vt = Interpreter::new();
    let mut fifo = ByteFifo::new(UART_FIFO_DEPTH);

    for &byte in &input {
        if !fifo.push(byte) {
            drain(&mut fifo, &mut vt, &mut screen);
            assert!(fifo.push(byte));
        }
    }
    drain(&mut fifo, &mut vt, &mut screen);

    println!("+{}+", "-".repeat(screen.width()));
    for (glyphs, _) in screen.rows() {
        let row: String = glyphs
            .iter()
            .map(|&g| if (0x20..0x7F).contains(&g) { g as char } else { '?' })
            .collect();
        println!("|{row}|");
    }
    println!("+{}+", "-".repeat(screen.width()));

    let (x, y, visible) = screen.cursor();
    println!("cursor at ({x}, {y}), {}", if visible { "visible" } else { "hidden" });
    Ok(())
}
