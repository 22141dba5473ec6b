use regex::Regex;
use std::sync::OnceLock;

/// Page name used when no Markdown change can be found in the diff.
pub const FALLBACK_PAGE: &str = "home";

/// Matches the first `diff --git` header whose path ends in `<name>.md`,
/// where `<name>` is letters, digits and hyphens. The path may contain
/// directories; only the final segment is captured.
fn page_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"diff --git a/(?:\S+/)?([A-Za-z0-9-]+)\.md\b").expect("page name regex")
    })
}

/// Pulls the changed wiki page name out of a rendered diff. Pure text
/// matching, deliberately ignorant of diff structure; a miss means the
/// caller falls back to [`FALLBACK_PAGE`].
pub fn extract_page_name(diff: &str) -> Option<String> {
    page_regex()
        .captures(diff)
        .map(|captures| captures[1].to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_from_plain_header() {
        let diff = "diff --git a/setup-guide.md b/setup-guide.md\nindex 000..111\n";
        assert_eq!(extract_page_name(diff).as_deref(), Some("setup-guide"));
    }

    #[test]
    fn extracts_name_from_nested_path() {
        let diff = "diff --git a/docs/setup-guide.md b/docs/setup-guide.md\n";
        assert_eq!(extract_page_name(diff).as_deref(), Some("setup-guide"));
    }

    #[test]
    fn name_is_lower_cased() {
        let diff = "diff --git a/Setup-Guide.md b/Setup-Guide.md\n";
        assert_eq!(extract_page_name(diff).as_deref(), Some("setup-guide"));
    }

    #[test]
    fn first_markdown_header_wins() {
        let diff = "\
diff --git a/first-page.md b/first-page.md
index 000..111
diff --git a/second-page.md b/second-page.md
";
        assert_eq!(extract_page_name(diff).as_deref(), Some("first-page"));
    }

    #[test]
    fn skips_non_markdown_files() {
        let diff = "\
diff --git a/logo.png b/logo.png
Binary files differ
diff --git a/notes/weekly-sync.md b/notes/weekly-sync.md
";
        assert_eq!(extract_page_name(diff).as_deref(), Some("weekly-sync"));
    }

    #[test]
    fn no_header_yields_none() {
        assert_eq!(extract_page_name("commit abc\n\nrandom text\n"), None);
        assert_eq!(extract_page_name(""), None);
    }

    #[test]
    fn mdx_extension_does_not_match() {
        let diff = "diff --git a/setup-guide.mdx b/setup-guide.mdx\n";
        assert_eq!(extract_page_name(diff), None);
    }

    #[test]
    fn filename_with_extra_dots_does_not_match() {
        let diff = "diff --git a/setup.guide.md b/setup.guide.md\n";
        assert_eq!(extract_page_name(diff), None);
    }
}
