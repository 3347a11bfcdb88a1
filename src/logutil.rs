//! Log sanitizing helpers.
//!
//! Command lines and mute/kick reasons come straight from operators (and,
//! via pasted links, from players). Anything logged from that text goes
//! through [escape_log] so audit lines stay single-line and grep-able.

/// Preview cap for logged operator text; command lines are short, anything
/// longer is noise.
const MAX_PREVIEW: usize = 200;

/// Escape a string for single-line logging: newlines, carriage returns and
/// tabs become their two-character escapes, other control characters become
/// `\xNN`, and text beyond the preview cap is elided.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("kick Thrall\nreason"), "kick Thrall\\nreason");
        assert_eq!(escape_log("a\r\tb\\"), "a\\r\\tb\\\\");
        assert_eq!(escape_log("bell\x07"), "bell\\x07");
    }

    #[test]
    fn long_input_is_elided() {
        let long = "x".repeat(400);
        let escaped = escape_log(&long);
        assert!(escaped.ends_with('…'));
        assert!(escaped.chars().count() <= 201);
    }
}
