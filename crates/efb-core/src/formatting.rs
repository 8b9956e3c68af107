//! Formatting utilities (Discord markdown, HTML for the registration pages, message splitting).

/// Escape HTML special characters for the registration server's pages.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape Discord markdown control characters in user-provided text (fit names, etc).
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '~' | '`' | '|' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Split `text` into chunks no longer than `limit` bytes, preferring line boundaries.
///
/// Lines longer than `limit` are cut at the last char boundary that fits.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut chunk = String::new();

    for line in text.split('\n') {
        let sep = usize::from(!chunk.is_empty());
        if chunk.len() + sep + line.len() <= limit {
            if sep == 1 {
                chunk.push('\n');
            }
            chunk.push_str(line);
            continue;
        }

        if !chunk.is_empty() {
            out.push(std::mem::take(&mut chunk));
        }

        let mut rest = line;
        while rest.len() > limit {
            let (head, tail) = split_utf8_prefix(rest, limit);
            out.push(head.to_string());
            rest = tail;
        }
        chunk.push_str(rest);
    }

    if !chunk.is_empty() {
        out.push(chunk);
    }
    out
}

fn split_utf8_prefix(s: &str, max: usize) -> (&str, &str) {
    let mut idx = max.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    if idx == 0 {
        // A single char wider than `max`; emit it whole rather than loop forever.
        idx = s.chars().next().map(char::len_utf8).unwrap_or(s.len());
    }
    s.split_at(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn escapes_markdown() {
        assert_eq!(escape_markdown("*Kiting* _Rifter_"), "\\*Kiting\\* \\_Rifter\\_");
        assert_eq!(escape_markdown("plain"), "plain");
    }

    #[test]
    fn keeps_short_messages_intact() {
        assert_eq!(split_message("a\nb", 2000), vec!["a\nb".to_string()]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = ["aaaa", "bbbb", "cccc"].join("\n");
        let chunks = split_message(&text, 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn hard_splits_long_lines_on_char_boundaries() {
        let text = "é".repeat(10);
        let chunks = split_message(&text, 5);
        assert!(chunks.iter().all(|c| c.len() <= 5));
        assert_eq!(chunks.concat(), text);
    }
}
