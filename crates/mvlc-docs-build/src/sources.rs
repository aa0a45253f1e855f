//! Input file discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Header extensions, collected first.
const HEADER_EXTENSIONS: &[&str] = &["h"];

/// Source extensions, collected after all headers.
const SOURCE_EXTENSIONS: &[&str] = &["cc"];

/// Find all headers and sources below `include_dir`.
///
/// Headers come first, then sources, each group sorted by path. Hidden files
/// and directories are skipped. A missing directory yields no inputs.
pub fn discover_sources(include_dir: &Path) -> Vec<PathBuf> {
    let mut headers = Vec::new();
    let mut sources = Vec::new();

    for entry in WalkDir::new(include_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        if HEADER_EXTENSIONS.contains(&ext) {
            headers.push(entry.into_path());
        } else if SOURCE_EXTENSIONS.contains(&ext) {
            sources.push(entry.into_path());
        }
    }

    headers.sort();
    sources.sort();
    headers.extend(sources);
    headers
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
