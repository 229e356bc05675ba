//! Coarse error categorization and keyword-overlap file scoring, used when
//! no traceback frames are available to drive investigation directly.

use std::collections::HashSet;
use std::fs;

use faultline_core::types::{CandidateFile, ErrorCategory, ProjectDescriptor};
use faultline_parsers::registry::ParserRegistry;
use faultline_parsers::treesitter::detect_language;

/// HTTP methods kept as keywords regardless of length.
const HTTP_VERBS: &[&str] = &["get", "post", "put", "patch", "delete", "head", "options"];

/// How much of each candidate file's content is scanned for keyword
/// overlap -- bounded so scoring a large project stays cheap.
const CONTENT_SCAN_BYTES: usize = 64 * 1024;

/// Classifies a top-level error message into a broad category, used to
/// decide what to emphasize in the rendered prompt.
pub fn categorize_error(message: &str) -> ErrorCategory {
    let lowered = message.to_lowercase();
    if contains_any(&lowered, &["connection", "timeout", "http", "fetch", "socket"]) {
        ErrorCategory::Http
    } else if contains_any(&lowered, &["sql", "database", "query", "constraint", "deadlock"]) {
        ErrorCategory::Database
    } else if contains_any(&lowered, &["import", "module not found", "cannot find module", "no module named"]) {
        ErrorCategory::Import
    } else if contains_any(&lowered, &["type error", "cannot cast", "typeerror", "classcastexception"]) {
        ErrorCategory::Type
    } else if contains_any(&lowered, &["panic", "exception", "error", "fault"]) {
        ErrorCategory::Runtime
    } else {
        ErrorCategory::Other
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Identifiers longer than three characters, plus quoted literals, HTTP
/// verbs, and status codes kept regardless of length -- short signal words
/// that a length filter alone would otherwise discard.
pub fn extract_keywords(message: &str) -> Vec<String> {
    let mut keywords: HashSet<String> = message
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.len() > 3)
        .map(|w| w.to_lowercase())
        .collect();

    for word in message.split(|c: char| !c.is_alphanumeric() && c != '_') {
        let lowered = word.to_lowercase();
        let is_status_code = word.len() == 3 && word.chars().all(|c| c.is_ascii_digit());
        let is_http_verb = HTTP_VERBS.contains(&lowered.as_str());
        if is_status_code || is_http_verb {
            keywords.insert(lowered);
        }
    }

    for quote in ['\'', '"'] {
        let mut rest = message;
        while let Some(start) = rest.find(quote) {
            rest = &rest[start + quote.len_utf8()..];
            let Some(end) = rest.find(quote) else { break };
            let literal = &rest[..end];
            if !literal.is_empty() {
                keywords.insert(literal.to_lowercase());
            }
            rest = &rest[end + quote.len_utf8()..];
        }
    }

    for token in message.split_whitespace() {
        let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '_' && c != '.');
        if trimmed.len() > 1 && trimmed.contains('/') {
            keywords.insert(trimmed.to_lowercase());
        }
    }

    keywords.into_iter().collect()
}

/// Scores every scanned source file by how many error-message keywords
/// appear in its path, its defined symbol names, or its content (first
/// [`CONTENT_SCAN_BYTES`] bytes), highest first.
pub fn find_candidate_files(project: &ProjectDescriptor, message: &str) -> Vec<CandidateFile> {
    let keywords = extract_keywords(message);
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut registry = ParserRegistry::new();
    let mut scored: Vec<CandidateFile> = project
        .source_files
        .iter()
        .filter_map(|path| {
            let mut matched: HashSet<String> = HashSet::new();

            let path_text = path.to_string_lossy().to_lowercase();
            matched.extend(keywords.iter().filter(|k| path_text.contains(k.as_str())).cloned());

            if let Ok(full_contents) = fs::read_to_string(path) {
                let scanned: String = full_contents.chars().take(CONTENT_SCAN_BYTES).collect();
                let scanned_lower = scanned.to_lowercase();
                matched.extend(keywords.iter().filter(|k| scanned_lower.contains(k.as_str())).cloned());

                if let Some(language) = detect_language(path) {
                    let symbol_names: String = registry
                        .extract_all(language, path, &scanned)
                        .into_iter()
                        .map(|s| s.name.to_lowercase())
                        .collect::<Vec<_>>()
                        .join(" ");
                    matched.extend(keywords.iter().filter(|k| symbol_names.contains(k.as_str())).cloned());
                }
            }

            if matched.is_empty() {
                return None;
            }
            let matched: Vec<String> = matched.into_iter().collect();
            Some(CandidateFile {
                path: path.clone(),
                score: matched.len() as f64,
                matched_keywords: matched,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::types::ProjectType;
    use std::path::PathBuf;

    #[test]
    fn categorizes_database_errors() {
        assert_eq!(
            categorize_error("psycopg2.errors.UniqueViolation: duplicate key value violates unique constraint"),
            ErrorCategory::Database
        );
    }

    #[test]
    fn categorizes_import_errors() {
        assert_eq!(categorize_error("ModuleNotFoundError: No module named 'requests'"), ErrorCategory::Import);
    }

    #[test]
    fn scores_files_by_keyword_overlap_in_name() {
        let project = ProjectDescriptor {
            root: PathBuf::from("/app"),
            project_type: ProjectType::Python,
            frameworks: vec![],
            entry_points: vec![],
            source_files: vec![PathBuf::from("/app/payment_gateway.py"), PathBuf::from("/app/utils.py")],
        };
        let candidates = find_candidate_files(&project, "payment gateway timeout while charging card");
        assert_eq!(candidates[0].path, PathBuf::from("/app/payment_gateway.py"));
    }

    #[test]
    fn keeps_short_status_codes_and_http_verbs() {
        let keywords = extract_keywords("GET /v1/orders failed with 404 not found");
        assert!(keywords.contains(&"get".to_string()));
        assert!(keywords.contains(&"404".to_string()));
        assert!(keywords.contains(&"/v1/orders".to_string()));
    }

    #[test]
    fn matches_candidate_files_on_content_not_just_name() {
        let dir = tempfile::tempdir().unwrap();
        let unrelated_path = dir.path().join("unrelated.py");
        fs::write(&unrelated_path, "def noop():\n    return None\n").unwrap();
        let worker_path = dir.path().join("worker.py");
        fs::write(&worker_path, "def handle_refund(order_id):\n    raise ValueError('refund failed')\n").unwrap();

        let project = ProjectDescriptor {
            root: dir.path().to_path_buf(),
            project_type: ProjectType::Python,
            frameworks: vec![],
            entry_points: vec![],
            source_files: vec![unrelated_path, worker_path.clone()],
        };
        let candidates = find_candidate_files(&project, "refund processing raised ValueError");
        assert_eq!(candidates[0].path, worker_path);
    }
}
