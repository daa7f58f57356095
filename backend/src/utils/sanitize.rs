use once_cell::sync::Lazy;
use regex::Regex;

// a tag opens with `<` directly followed by a non-space and is closed by `>`
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>\s][^>]*>").expect("tag pattern compiles"));

/// Trims the input, strips anything that looks like markup and drops control
/// characters other than newlines and tabs.
pub fn clean_text(raw: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(raw.trim(), "");
    stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Keeps only the characters an email address may contain.
pub fn clean_email(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(*c))
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A submitter address has to parse as a mailbox and carry a dotted domain,
/// since it ends up in the Reply-To header.
pub fn is_valid_email(addr: &str) -> bool {
    let Ok(parsed) = addr.parse::<lettre::Address>() else {
        return false;
    };
    let domain = parsed.domain();
    if domain.starts_with('[') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_markup_and_whitespace() {
        assert_eq!(clean_text("  <b>Jane</b> Doe  "), "Jane Doe");
        assert_eq!(clean_text("<script>alert(1)</script>"), "alert(1)");
        assert_eq!(clean_text("line one\nline two\u{0007}"), "line one\nline two");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn clean_text_keeps_a_bare_less_than() {
        assert_eq!(
            clean_text("Budget < 500 dollars, two rooms and a hall"),
            "Budget < 500 dollars, two rooms and a hall"
        );
        assert_eq!(clean_text("3 < 4 > 2"), "3 < 4 > 2");
        assert_eq!(clean_text("Paint <i>two</i> rooms < 40m2"), "Paint two rooms < 40m2");
    }

    #[test]
    fn clean_email_drops_disallowed_characters() {
        assert_eq!(clean_email(" jane doe@x.com "), "janedoe@x.com");
        assert_eq!(clean_email("jane<>@x.com"), "jane@x.com");
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("jane@x..com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email(""));
    }
}
