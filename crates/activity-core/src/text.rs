/// Derive a `TimelineItem.title` from a source's primary text:
/// take the first line, collapse whitespace runs to single spaces, trim,
/// and truncate to 72 chars (69 + `"..."`) if longer.
pub fn derive_title(source: &str) -> String {
    let first_line = source.lines().next().unwrap_or("");
    let collapsed = collapse_whitespace(first_line);
    let trimmed = collapsed.trim();

    if trimmed.chars().count() > 72 {
        let truncated: String = trimmed.chars().take(69).collect();
        format!("{truncated}...")
    } else {
        trimmed.to_string()
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_line_only() {
        assert_eq!(derive_title("hello\nworld"), "hello");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(derive_title("  a   b\tc  "), "a b c");
    }

    #[test]
    fn truncates_long_titles() {
        let long = "a".repeat(100);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), 72);
        assert!(title.ends_with("..."));
        assert!(!title.contains('\n'));
    }

    #[test]
    fn leaves_short_titles_untouched() {
        assert_eq!(derive_title("short title"), "short title");
    }

    #[test]
    fn empty_input_yields_empty_title() {
        assert_eq!(derive_title(""), "");
    }
}
