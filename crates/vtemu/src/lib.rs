//! Character-cell terminal emulator core.
//!
//! A byte-at-a-time interpreter for a useful subset of the VT100/ANSI
//! escape protocol, mutating a fixed glyph-and-attribute grid. Bytes from
//! the host (keyboard, simulated UART) go into [`Interpreter::feed`]; a
//! renderer reads the resulting [`Screen`] whenever it likes.
//!
//! ```
//! use vtemu::{Color, Interpreter, Screen};
//!
//! let mut screen = Screen::new(80, 40);
//! let mut vt = Interpreter::new();
//! vt.feed_bytes(&mut screen, b"\x1b[31mhello");
//!
//! assert_eq!(screen.glyph_at(0, 0), b'h');
//! assert_eq!(screen.attr_at(0, 0).foreground, Color::Red);
//! let (x, y, visible) = screen.cursor();
//! assert_eq!((x, y), (5, 0));
//! assert!(visible);
//! ```
//!
//! The interpreter never fails: malformed escape sequences are consumed
//! and discarded, and the parser drops back to its ground state. Screen
//! dimensions are fixed at construction (at most [`MAX_CELLS`] cells);
//! when the cursor runs off the end of the grid the display clears rather
//! than scrolls.

#![warn(clippy::pedantic)]

mod attr;
mod interp;
mod screen;

pub use attr::{AttrFlags, CellAttributes, Color};
pub use interp::{Interpreter, ParserState};
pub use screen::{MAX_CELLS, Screen};
