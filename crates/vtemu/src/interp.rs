//! The escape-sequence state machine.
//!
//! [`Interpreter::feed`] consumes one host byte at a time and mutates a
//! [`Screen`]. Printables and the C0 controls `BS TAB LF CR DEL` act
//! directly; `ESC [` opens a control sequence with at most two numeric
//! parameters of at most four digits each, terminated by one of
//! `A B C D E F G H J f i m n s`, plus the private-mode pair
//! `ESC [ ? 25 {h|l}` toggling cursor visibility.
//!
//! A sequence that deviates from this grammar is consumed up to and
//! including the offending byte and discarded: the machine drops back to
//! [`ParserState::Normal`] and the screen is left exactly as it stood
//! before the `ESC`. Nothing is reported to the caller.

use tracing::trace;

use crate::screen::{Motion, Screen};

const ESC: u8 = 0x1B;
const BS: u8 = 0x08;
const DEL: u8 = 0x7F;

/// Most digits accepted per numeric parameter.
const MAX_PARAM_DIGITS: u8 = 4;
/// Most digits accepted for the private-mode parameter.
const MAX_MODE_DIGITS: u8 = 2;

/// A sequence byte that deviates from the accepted grammar.
struct MalformedSequence;

type Step = Result<(), MalformedSequence>;

/// Where the interpreter stands in the escape-sequence grammar.
///
/// `digits` counts the digits consumed for the parameter currently being
/// accumulated; it is how a command terminal distinguishes an explicit
/// parameter from a defaulted one, and how overlong parameters are
/// rejected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    /// Awaiting a printable, control, or `ESC` byte.
    #[default]
    Normal,
    /// `ESC` seen; awaiting `[`.
    Csi,
    /// `ESC [` seen; awaiting the first byte of the sequence body.
    Command,
    /// Accumulating the first numeric parameter.
    Number1 { n1: u16, digits: u8 },
    /// Accumulating the second numeric parameter.
    Number2 { n1: u16, n2: u16, digits: u8 },
    /// Inside `ESC [ ?`, accumulating the private-mode parameter.
    Dectcem { n1: u16, digits: u8 },
}

/// The byte-consuming interpreter. Holds only parser state; the screen it
/// mutates is passed to [`feed`](Self::feed), so an embedding is free to
/// read the grid between calls.
#[derive(Debug, Default, Clone)]
pub struct Interpreter {
    state: ParserState,
}

impl Interpreter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ParserState::Normal,
        }
    }

    /// The current parser state.
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    /// Consume one byte and advance.
    ///
    /// Never fails: malformed sequences are discarded silently and the
    /// screen invariants hold on return.
    pub fn feed(&mut self, screen: &mut Screen, byte: u8) {
        let step = match self.state {
            ParserState::Normal => {
                self.normal(screen, byte);
                Ok(())
            }
            ParserState::Csi => self.csi(byte),
            ParserState::Command => self.command(screen, byte),
            ParserState::Number1 { n1, digits } => self.number1(screen, byte, n1, digits),
            ParserState::Number2 { n1, n2, digits } => self.number2(screen, byte, n1, n2, digits),
            ParserState::Dectcem { n1, digits } => self.dectcem(screen, byte, n1, digits),
        };
        if step.is_err() {
            trace!(byte, "discarding malformed escape sequence");
            self.state = ParserState::Normal;
        }
    }

    /// Feed a whole buffer, strictly left to right. Equivalent to calling
    /// [`feed`](Self::feed) once per byte in order.
    pub fn feed_bytes(&mut self, screen: &mut Screen, bytes: &[u8]) {
        for &byte in bytes {
            self.feed(screen, byte);
        }
    }

    fn normal(&mut self, screen: &mut Screen, byte: u8) {
        match byte {
            ESC => self.state = ParserState::Csi,
            b'\t' => screen.tab(),
            b'\n' | b'\r' => screen.line_feed(),
            BS | DEL => screen.backspace(),
            _ => screen.put(byte),
        }
        screen.wrap_overflow();
    }

    fn csi(&mut self, byte: u8) -> Step {
        if byte == b'[' {
            self.state = ParserState::Command;
            Ok(())
        } else {
            Err(MalformedSequence)
        }
    }

    fn command(&mut self, screen: &mut Screen, byte: u8) -> Step {
        match byte {
            b's' => {
                screen.save_cursor();
                self.done()
            }
            // A bare `n` restores the saved cursor. Device Status Report
            // (`6n`) is recognized under Number1; the collision resolves
            // in favor of restore when no digit was supplied.
            b'n' => {
                screen.restore_cursor();
                self.done()
            }
            b'?' => {
                self.state = ParserState::Dectcem { n1: 1, digits: 0 };
                Ok(())
            }
            b';' => {
                self.state = ParserState::Number2 {
                    n1: 1,
                    n2: 1,
                    digits: 0,
                };
                Ok(())
            }
            b'0'..=b'9' => {
                self.state = ParserState::Number1 {
                    n1: u16::from(byte - b'0'),
                    digits: 1,
                };
                Ok(())
            }
            _ => Err(MalformedSequence),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn number1(&mut self, screen: &mut Screen, byte: u8, n1: u16, digits: u8) -> Step {
        if byte.is_ascii_digit() {
            let (n1, digits) = accumulate(n1, digits, byte, MAX_PARAM_DIGITS)?;
            self.state = ParserState::Number1 { n1, digits };
            return Ok(());
        }
        match byte {
            b'A' => {
                screen.move_by(0, -i32::from(n1), Motion::Clamp);
                self.done()
            }
            b'B' => {
                screen.move_by(0, i32::from(n1), Motion::Clamp);
                self.done()
            }
            b'C' => {
                screen.move_by(i32::from(n1), 0, Motion::Clamp);
                self.done()
            }
            b'D' => {
                screen.move_by(-i32::from(n1), 0, Motion::Clamp);
                self.done()
            }
            b'E' => {
                let row = screen.cursor_y() + usize::from(n1);
                screen.move_to(0, row, Motion::Wrap);
                self.done()
            }
            b'F' => {
                // Modular subtraction: moving up past row 0 wraps to the
                // bottom of the grid.
                let height = screen.height();
                let row = (screen.cursor_y() + height - usize::from(n1) % height) % height;
                screen.move_to(0, row, Motion::Wrap);
                self.done()
            }
            b'G' => {
                screen.move_to(usize::from(n1), screen.cursor_y(), Motion::Clamp);
                self.done()
            }
            b'm' => {
                screen.pen_mut().apply_sgr(n1);
                screen.stamp_attr();
                self.done()
            }
            // AUX port off / on. Parsed and ignored.
            b'i' => {
                if n1 == 4 || n1 == 5 {
                    self.done()
                } else {
                    Err(MalformedSequence)
                }
            }
            // Device Status Report. Acknowledged; no reply is generated.
            b'n' => {
                if n1 == 6 {
                    self.done()
                } else {
                    Err(MalformedSequence)
                }
            }
            b'J' => self.erase_in_display(screen, n1, digits > 0),
            b';' => {
                self.state = ParserState::Number2 {
                    n1,
                    n2: 1,
                    digits: 0,
                };
                Ok(())
            }
            _ => Err(MalformedSequence),
        }
    }

    fn number2(&mut self, screen: &mut Screen, byte: u8, n1: u16, n2: u16, digits: u8) -> Step {
        if byte.is_ascii_digit() {
            let (n2, digits) = accumulate(n2, digits, byte, MAX_PARAM_DIGITS)?;
            self.state = ParserState::Number2 { n1, n2, digits };
            return Ok(());
        }
        match byte {
            b'm' => {
                let pen = screen.pen_mut();
                pen.apply_sgr(n1);
                pen.apply_sgr(n2);
                screen.stamp_attr();
                self.done()
            }
            b'H' | b'f' => {
                screen.move_to(usize::from(n2), usize::from(n1), Motion::Clamp);
                self.done()
            }
            _ => Err(MalformedSequence),
        }
    }

    fn dectcem(&mut self, screen: &mut Screen, byte: u8, n1: u16, digits: u8) -> Step {
        if byte.is_ascii_digit() {
            let (n1, digits) = accumulate(n1, digits, byte, MAX_MODE_DIGITS)?;
            self.state = ParserState::Dectcem { n1, digits };
            return Ok(());
        }
        if n1 != 25 {
            return Err(MalformedSequence);
        }
        match byte {
            b'l' => {
                screen.set_cursor_visible(false);
                self.done()
            }
            b'h' => {
                screen.set_cursor_visible(true);
                self.done()
            }
            _ => Err(MalformedSequence),
        }
    }

    /// Erase in display. `2` and `3` home the cursor and then clear the
    /// whole grid; an explicit `1` clears the whole grid in place; a
    /// defaulted `1` degrades to the erase-before-cursor form of `0`.
    fn erase_in_display(&mut self, screen: &mut Screen, n1: u16, explicit: bool) -> Step {
        match n1 {
            2 | 3 => {
                screen.set_cursor_index(0);
                screen.erase_display();
                self.done()
            }
            1 if explicit => {
                screen.erase_display();
                self.done()
            }
            0 | 1 => {
                screen.erase_to_cursor();
                self.done()
            }
            _ => Err(MalformedSequence),
        }
    }

    /// Success terminal: the sequence is complete.
    fn done(&mut self) -> Step {
        self.state = ParserState::Normal;
        Ok(())
    }
}

/// Fold one more digit into an accumulating parameter, rejecting the byte
/// once `max_digits` have already been consumed. With no digits consumed
/// yet the stored default is replaced rather than extended.
fn accumulate(value: u16, digits: u8, byte: u8, max_digits: u8) -> Result<(u16, u8), MalformedSequence> {
    if digits >= max_digits {
        return Err(MalformedSequence);
    }
    let digit = u16::from(byte - b'0');
    let value = if digits == 0 {
        digit
    } else {
        value * 10 + digit
    };
    Ok((value, digits + 1))
}
