//! Terminal escape sanitizer
//!
//! Remote tools run under a pseudo-terminal and decorate their output with
//! colour codes, cursor movement and progress redraws. Observers get plain
//! text.

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';
const CSI_C1: char = '\u{9b}';

/// Strip terminal control sequences from a single line of output
///
/// Handles CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`),
/// two-byte escapes and the single-byte C1 CSI introducer. A carriage return
/// inside the line means the tool redrew it, so only the text after the last
/// `\r` is kept. Remaining control characters other than tab are dropped.
pub fn sanitize(raw: &str) -> String {
    let visible = match raw.trim_end_matches(['\r', '\n']).rsplit_once('\r') {
        Some((_, tail)) => tail,
        None => raw.trim_end_matches(['\r', '\n']),
    };

    if !visible.chars().any(|c| c.is_control() && c != '\t') {
        return visible.to_string();
    }

    let mut out = String::with_capacity(visible.len());
    let mut chars = visible.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.peek() {
                Some('[') => {
                    chars.next();
                    skip_csi(&mut chars);
                }
                Some(']') => {
                    chars.next();
                    skip_osc(&mut chars);
                }
                Some(_) => {
                    // Two-byte escape (charset selection, keypad mode, ...)
                    chars.next();
                }
                None => {}
            },
            CSI_C1 => skip_csi(&mut chars),
            '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn skip_csi(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    // Parameter and intermediate bytes are 0x20..=0x3F; the final byte ends it.
    for next in chars.by_ref() {
        if ('\u{40}'..='\u{7e}').contains(&next) {
            break;
        }
    }
}

fn skip_osc(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(next) = chars.next() {
        if next == BEL {
            break;
        }
        if next == ESC {
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
            break;
        }
    }
}
