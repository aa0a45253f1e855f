//! Doxygen configuration, written to the extractor's stdin.

use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Macros defined while Doxygen preprocesses the sources.
///
/// Both platform macros are set so platform-specific declarations show up.
pub const PREDEFINED_MACROS: &[&str] = &["_WIN32=1", "__linux__=1", "\"MVLC_DOC=1\""];

/// Bundled fmt library symbols kept out of the API model.
pub const EXCLUDED_SYMBOLS: &[&str] = &[
    "fmt::formatter",
    "fmt::printf_formatter",
    "fmt::arg_join",
    "fmt::basic_format_arg::handle",
];

/// Settings for one Doxygen run. Only XML output is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoxygenConfig {
    /// PROJECT_NAME
    pub project: String,

    /// Files listed in INPUT
    pub inputs: Vec<PathBuf>,

    /// XML_OUTPUT directory
    pub xml_output: PathBuf,

    /// PREDEFINED entries, rendered verbatim
    pub predefined: Vec<String>,

    /// EXCLUDE_SYMBOLS patterns
    pub exclude_symbols: Vec<String>,
}

impl DoxygenConfig {
    /// Configuration for `project` with the default macros and exclusions.
    pub fn new(project: impl Into<String>, inputs: Vec<PathBuf>, xml_output: &Path) -> Self {
        Self {
            project: project.into(),
            inputs,
            xml_output: xml_output.to_path_buf(),
            predefined: PREDEFINED_MACROS.iter().map(|m| m.to_string()).collect(),
            exclude_symbols: EXCLUDED_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Render as a Doxyfile.
    pub fn render(&self) -> String {
        let inputs = self
            .inputs
            .iter()
            .map(|p| quote(&p.display().to_string()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = String::new();
        set(&mut out, "PROJECT_NAME", &self.project);
        set(&mut out, "GENERATE_LATEX", "NO");
        set(&mut out, "GENERATE_MAN", "NO");
        set(&mut out, "GENERATE_RTF", "NO");
        set(&mut out, "CASE_SENSE_NAMES", "NO");
        set(&mut out, "INPUT", &inputs);
        set(&mut out, "QUIET", "YES");
        set(&mut out, "JAVADOC_AUTOBRIEF", "YES");
        set(&mut out, "AUTOLINK_SUPPORT", "NO");
        set(&mut out, "GENERATE_HTML", "NO");
        set(&mut out, "GENERATE_XML", "YES");
        set(&mut out, "XML_OUTPUT", &quote(&self.xml_output.display().to_string()));
        set(&mut out, "ALIASES", r#""rst=\verbatim embed:rst""#);
        append(&mut out, "ALIASES", r#""endrst=\endverbatim""#);
        set(&mut out, "MACRO_EXPANSION", "YES");
        set(&mut out, "PREDEFINED", &self.predefined.join(" "));
        set(&mut out, "EXCLUDE_SYMBOLS", &self.exclude_symbols.join(" "));
        out
    }
}

fn set(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{:<18}= {}", key, value);
}

fn append(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{:<17}+= {}", key, value);
}

/// Quote a value containing whitespace so Doxygen reads it as one item.
fn quote(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_xml_only_config() {
        let config = DoxygenConfig::new(
            "mesytec-mvlc",
            vec![
                PathBuf::from("src/mesytec-mvlc/mvlc.h"),
                PathBuf::from("src/mesytec-mvlc/mvlc.cc"),
            ],
            Path::new("./doxyxml"),
        );

        let expected = r#"PROJECT_NAME      = mesytec-mvlc
GENERATE_LATEX    = NO
GENERATE_MAN      = NO
GENERATE_RTF      = NO
CASE_SENSE_NAMES  = NO
INPUT             = src/mesytec-mvlc/mvlc.h src/mesytec-mvlc/mvlc.cc
QUIET             = YES
JAVADOC_AUTOBRIEF = YES
AUTOLINK_SUPPORT  = NO
GENERATE_HTML     = NO
GENERATE_XML      = YES
XML_OUTPUT        = ./doxyxml
ALIASES           = "rst=\verbatim embed:rst"
ALIASES          += "endrst=\endverbatim"
MACRO_EXPANSION   = YES
PREDEFINED        = _WIN32=1 __linux__=1 "MVLC_DOC=1"
EXCLUDE_SYMBOLS   = fmt::formatter fmt::printf_formatter fmt::arg_join fmt::basic_format_arg::handle
"#;

        assert_eq!(config.render(), expected);
    }

    #[test]
    fn quotes_paths_with_spaces() {
        let config = DoxygenConfig::new(
            "mesytec-mvlc",
            vec![PathBuf::from("my docs/a.h"), PathBuf::from("b.h")],
            Path::new("build dir/doxyxml"),
        );

        let rendered = config.render();

        assert!(rendered.contains("INPUT             = \"my docs/a.h\" b.h\n"));
        assert!(rendered.contains("XML_OUTPUT        = \"build dir/doxyxml\"\n"));
    }

    #[test]
    fn empty_input_list_renders_empty_value() {
        let config = DoxygenConfig::new("mesytec-mvlc", vec![], Path::new("doxyxml"));

        assert!(config.render().contains("INPUT             = \n"));
    }
}
