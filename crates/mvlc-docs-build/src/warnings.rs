//! Scrubbing of known-benign Doxygen warnings.

use std::sync::LazyLock;

use regex::Regex;

/// Internal symbols Doxygen complains about being undocumented.
const INTERNAL_SYMBOLS: &[&str] = &["fmt::detail::.*", "basic_data<>", "fmt::type_identity"];

static DOXYGEN_NOISE: LazyLock<WarningFilter> = LazyLock::new(|| {
    let undocumented = format!(
        r"warning: (Compound|Member .* of class) ({}) is not documented.",
        INTERNAL_SYMBOLS.join("|")
    );
    WarningFilter::new([
        undocumented.as_str(),
        r"warning: Internal inconsistency: .* does not belong to any container!",
    ])
    .unwrap()
});

/// Removes log lines that end with one of a set of patterns.
#[derive(Debug, Clone)]
pub struct WarningFilter {
    patterns: Vec<Regex>,
}

/// A log with the noise taken out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredLog {
    /// Remaining lines, verbatim and in their original order
    pub text: String,

    /// Number of lines removed
    pub suppressed: usize,
}

impl WarningFilter {
    /// Build a filter from regular expressions.
    ///
    /// A line is dropped when a pattern matches somewhere in it and the match
    /// runs to the end of the line.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(&format!("(?:{})$", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The filter for Doxygen noise about the bundled fmt library.
    pub fn doxygen() -> &'static WarningFilter {
        &DOXYGEN_NOISE
    }

    /// Whether `line` (without its terminator) is noise.
    pub fn is_noise(&self, line: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(line))
    }

    /// Drop every noisy line from `log`.
    pub fn apply(&self, log: &str) -> FilteredLog {
        let mut filtered = FilteredLog::default();

        for line in log.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            if self.is_noise(content) {
                filtered.suppressed += 1;
            } else {
                filtered.text.push_str(line);
            }
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_undocumented_internal_symbols() {
        let log = "\
/src/fmt/core.h:120: warning: Compound fmt::detail::value is not documented.
/src/fmt/format.h:88: warning: Member grouping (function) of class fmt::detail::locale_ref is not documented.
/src/fmt/format.h:90: warning: Compound basic_data<> is not documented.
/src/fmt/core.h:300: warning: Compound fmt::type_identity is not documented.
";

        let filtered = WarningFilter::doxygen().apply(log);

        assert_eq!(filtered.text, "");
        assert_eq!(filtered.suppressed, 4);
    }

    #[test]
    fn removes_internal_inconsistency_warning() {
        let log = "warning: Internal inconsistency: member foo does not belong to any container!\n";

        let filtered = WarningFilter::doxygen().apply(log);

        assert_eq!(filtered.suppressed, 1);
        assert!(filtered.text.is_empty());
    }

    #[test]
    fn keeps_other_lines_verbatim_and_in_order() {
        let log = "\
mvlc.h:10: warning: Member connect() of class mesytec::mvlc::MVLC is not documented.
fmt/core.h:1: warning: Compound fmt::detail::buffer is not documented.
Generating XML output...
mvlc.h:12: warning: argument 'x' of command @param is not found
";

        let filtered = WarningFilter::doxygen().apply(log);

        assert_eq!(
            filtered.text,
            "\
mvlc.h:10: warning: Member connect() of class mesytec::mvlc::MVLC is not documented.
Generating XML output...
mvlc.h:12: warning: argument 'x' of command @param is not found
"
        );
        assert_eq!(filtered.suppressed, 1);
    }

    #[test]
    fn pattern_must_reach_end_of_line() {
        let filter = WarningFilter::new(["warning: noisy"]).unwrap();

        assert!(filter.is_noise("a.h:1: warning: noisy"));
        assert!(!filter.is_noise("a.h:1: warning: noisy, but more follows"));
    }

    #[test]
    fn last_line_without_newline_is_filtered_too() {
        let filter = WarningFilter::new(["warning: noisy"]).unwrap();

        let filtered = filter.apply("kept\nwarning: noisy");

        assert_eq!(filtered.text, "kept\n");
        assert_eq!(filtered.suppressed, 1);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(WarningFilter::new(["(unclosed"]).is_err());
    }
}
