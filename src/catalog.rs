use std::fs;
use std::path::{Path, PathBuf};

pub const MATCH_EXTENSION: &str = "xlsx";

const FILE_SEPARATOR: &str = "_vs_";
const LABEL_SEPARATOR: &str = " vs ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    pub label: String,
    pub file: PathBuf,
}

impl MatchEntry {
    pub fn teams(&self) -> Vec<String> {
        teams_for_match(&self.file.to_string_lossy())
    }
}

/// Lists match workbooks in `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty catalog.
pub fn list_matches(dir: &Path) -> Vec<MatchEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut matches = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == MATCH_EXTENSION)
        })
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some(MatchEntry {
                label: match_label(&name),
                file: path,
            })
        })
        .collect::<Vec<_>>();

    matches.sort_by(|a, b| a.file.file_name().cmp(&b.file.file_name()));
    matches
}

/// `Home_vs_Away.xlsx` -> `Home vs Away`.
pub fn match_label(file_name: &str) -> String {
    strip_extension(file_name)
        .replace(FILE_SEPARATOR, LABEL_SEPARATOR)
        .replace('_', " ")
}

/// Recovers the team names from a match file name, path or label.
///
/// Falls back to a single team when no separator is present.
pub fn teams_for_match(name: &str) -> Vec<String> {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    let base = strip_extension(base);

    let parts: Vec<&str> = if base.contains(FILE_SEPARATOR) {
        base.split(FILE_SEPARATOR).collect()
    } else if base.contains(LABEL_SEPARATOR) {
        base.split(LABEL_SEPARATOR).collect()
    } else {
        vec![base]
    };

    parts
        .into_iter()
        .map(|team| team.replace('_', " ").trim().to_string())
        .collect()
}

fn strip_extension(name: &str) -> &str {
    name.strip_suffix(".xlsx").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_replaces_separator_then_underscores() {
        assert_eq!(
            match_label("NMF_vs_Etoile_Lavalloise.xlsx"),
            "NMF vs Etoile Lavalloise"
        );
    }

    #[test]
    fn teams_from_label_spelling() {
        assert_eq!(teams_for_match("Nantes vs Laval"), vec!["Nantes", "Laval"]);
    }

    #[test]
    fn single_team_without_separator() {
        assert_eq!(teams_for_match("training_session.xlsx"), vec!["training session"]);
    }
}
