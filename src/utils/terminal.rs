//! Terminal output sanitization utilities
//!
//! # Security: Terminal Injection Prevention
//!
//! Transcript text is user- and model-controlled. Message text shown in the preview pane
//! and in `--preview` output passes through [`strip_ansi_codes`] first so that embedded
//! escape sequences cannot clear the screen, move the cursor, retitle the window, or
//! restyle the terminal.

/// Width a tab expands to in sanitized text
const TAB_WIDTH: usize = 4;

/// Strips terminal escape sequences and control characters from a string
///
/// Removes CSI sequences (`ESC [ ... letter`), OSC sequences (`ESC ] ... BEL` or
/// `ESC ] ... ESC \`), and two-character escapes. Other control characters are
/// dropped except newlines; tabs become spaces and carriage returns are removed
/// so that line-oriented rendering stays aligned.
///
/// # Examples
///
/// ```
/// use ccs::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => match chars.next() {
                // CSI: parameters then a final byte in @..~
                Some('[') => {
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: terminated by BEL or ST (ESC \)
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\n' => result.push('\n'),
            '\t' => result.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}
