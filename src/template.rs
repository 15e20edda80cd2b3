//! Helpers for string literals, templates and heredocs.

/// Returns `true` if `s` contains an interpolation (`${`) or directive (`%{`) sequence.
///
/// Escaped sequences (`$${` and `%%{`) are not considered template sequences.
pub fn has_template_sequences(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'$', b'$') | (b'%', b'%') if bytes.get(i + 2) == Some(&b'{') => i += 3,
            (b'$', b'{') | (b'%', b'{') => return true,
            _ => i += 1,
        }
    }

    false
}

/// Replaces escaped template markers with their literal counterparts.
pub fn unescape_markers(s: &str) -> String {
    s.replace("$${", "${").replace("%%{", "%{")
}

/// Decodes backslash escape sequences in a quoted string literal.
///
/// UTF-16 surrogate pairs written as two consecutive `\u` escapes are combined into a single
/// `char`. Returns `None` if the literal contains an invalid escape sequence or an escaped code
/// point which is not a valid `char`, e.g. a lone surrogate.
pub fn unescape_literal(s: &str) -> Option<String> {
    if !s.contains('\\') {
        return Some(s.to_owned());
    }

    let bytes = s.as_bytes();
    let mut unescaped = String::with_capacity(s.len());
    let (mut start, mut i) = (0, 0);

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }

        match surrogate_pair(&s[i..]) {
            Some(ch) => {
                unescaped.push_str(&unescape::unescape(&s[start..i])?);
                unescaped.push(ch);
                i += 12;
                start = i;
            }
            None => i += 2,
        }
    }

    unescaped.push_str(&unescape::unescape(&s[start..])?);

    Some(unescaped)
}

// Decodes a leading `\uXXXX\uXXXX` high and low surrogate pair.
fn surrogate_pair(s: &str) -> Option<char> {
    let high = s.strip_prefix("\\u")?.get(..4)?;
    let low = s.get(6..)?.strip_prefix("\\u")?.get(..4)?;
    let high = u16::from_str_radix(high, 16).ok()?;
    let low = u16::from_str_radix(low, 16).ok()?;

    if !(0xD800..=0xDBFF).contains(&high) || !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }

    char::decode_utf16([high, low]).next()?.ok()
}

/// Removes the common leading whitespace from all lines of a `<<-` heredoc.
///
/// Spaces and tabs both count as a single character. Blank lines do not take part in computing
/// the common indentation but lose at most that many leading characters.
pub fn strip_indent(content: &str) -> String {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let strip = leading_whitespace(line).min(indent);
            &line[strip..]
        })
        .collect()
}

fn leading_whitespace(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn template_sequences() {
        assert!(has_template_sequences("${foo}"));
        assert!(has_template_sequences("a %{if x}b%{endif}"));
        assert!(has_template_sequences("$${escaped} but ${not}"));
        assert!(!has_template_sequences("plain"));
        assert!(!has_template_sequences("$${escaped}"));
        assert!(!has_template_sequences("%%{escaped}"));
        assert!(!has_template_sequences("costs $5 or 10%"));
        assert!(!has_template_sequences("$"));
    }

    #[test]
    fn markers() {
        assert_eq!(unescape_markers("$${foo} %%{bar}"), "${foo} %{bar}");
        assert_eq!(unescape_markers("$$ %%"), "$$ %%");
    }

    #[test]
    fn literals() {
        assert_eq!(unescape_literal("plain").as_deref(), Some("plain"));
        assert_eq!(
            unescape_literal(r#"a\nb\t\"c\"\\"#).as_deref(),
            Some("a\nb\t\"c\"\\")
        );
        assert_eq!(unescape_literal("\\u00e9").as_deref(), Some("é"));
        assert_eq!(
            unescape_literal(r"smile \uD83D\uDE00!").as_deref(),
            Some("smile \u{1F600}!")
        );
        assert_eq!(
            unescape_literal(r"\uD83D\uDE00\n\ud83d\ude01").as_deref(),
            Some("\u{1F600}\n\u{1F601}")
        );
        assert_eq!(
            unescape_literal(r"\\uD83D\\uDE00").as_deref(),
            Some(r"\uD83D\uDE00")
        );
        assert_eq!(unescape_literal(r"\uD83D"), None);
        assert_eq!(unescape_literal(r"\uDE00\uD83D"), None);
        assert_eq!(unescape_literal(r"\uD83Dx"), None);
    }

    #[test]
    fn strip() {
        assert_eq!(
            strip_indent("\t\tThis is a heredoc template.\n\t\tIt references ${local.other.3}\n"),
            "This is a heredoc template.\nIt references ${local.other.3}\n"
        );
        assert_eq!(strip_indent("    a\n      b\n  c\n"), "  a\n    b\nc\n");
        assert_eq!(strip_indent("    a\n\n    b\n"), "a\n\nb\n");
        assert_eq!(strip_indent("    a\n  \n    b\n"), "a\n\nb\n");
        assert_eq!(strip_indent("no indent\n"), "no indent\n");
        assert_eq!(strip_indent(""), "");
    }
}
