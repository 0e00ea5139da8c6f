//! Diff preparation and completion post-processing

const DIFF_HEADER: &str = "diff --git";
const SECTION_HEADERS: [&str; 2] = ["### File:", "### Overall"];

/// Drop every per-file diff that mentions `.json`
///
/// Lockfiles and fixtures bloat the prompt without adding anything
/// reviewable.
pub fn filter_diff(diff: &str) -> String {
    diff.split(DIFF_HEADER)
        .filter(|chunk| !chunk.contains(".json"))
        .collect::<Vec<_>>()
        .join(DIFF_HEADER)
}

/// Split a completion into review sections
///
/// A new section starts at every line beginning with `### File:` or
/// `### Overall`. Sections are trimmed; empty ones are dropped.
pub fn split_sections(completion: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in completion.split_inclusive('\n') {
        let is_header = SECTION_HEADERS
            .iter()
            .any(|header| line.starts_with(header));
        if is_header && !current.is_empty() {
            sections.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    sections.push(current);

    sections
        .into_iter()
        .map(|section| section.trim().to_string())
        .filter(|section| !section.is_empty())
        .collect()
}
