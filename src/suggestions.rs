//! # Error Suggestions
//!
//! Turns library errors into CLI errors that say what went wrong and how to
//! fix it. Errors without an obvious next step pass through unchanged.
//!
//! ```rust,ignore
//! engine.remove(&args.path).map_err(|e| suggestions::explain(e, &known))?;
//! ```

use crate::defaults::MANIFEST_FILENAME;
use crate::error::Error;

/// Wraps `error` in an `anyhow::Error` carrying hints.
///
/// `known_paths` lists the manifest's dependency paths; it is used to
/// suggest a close match when a path is not found and may be empty.
pub fn explain(error: Error, known_paths: &[String]) -> anyhow::Error {
    let hints = hints_for(&error, known_paths);
    if hints.is_empty() {
        return anyhow::Error::new(error);
    }

    let hints: Vec<String> = hints.iter().map(|h| format!("hint: {h}")).collect();
    anyhow::anyhow!("{error}\n\n{}", hints.join("\n"))
}

fn hints_for(error: &Error, known_paths: &[String]) -> Vec<String> {
    match error {
        Error::NotInitialized { .. } => vec![
            "Run 'taglock init --name <NAME> --repository <URL>' to create a project".to_string(),
            "Use -C/--chdir or TAGLOCK_DIR to point at another project directory".to_string(),
        ],
        Error::AlreadyExists { .. } => vec![format!(
            "Edit the existing {MANIFEST_FILENAME} instead, or delete it to start over"
        )],
        Error::MissingLockHash { .. } => {
            vec!["Run 'taglock update' to resolve and lock every dependency".to_string()]
        }
        Error::DependencyExists { path } => vec![format!(
            "Run 'taglock remove {path}' first, or add it under another path"
        )],
        Error::DependencyNotFound { path } => {
            let mut hints = Vec::new();
            let candidates: Vec<&str> = known_paths.iter().map(String::as_str).collect();
            if let Some(similar) = find_similar(path, &candidates) {
                hints.push(format!("Did you mean '{similar}'?"));
            }
            hints.push("Run 'taglock list' to see the project's dependencies".to_string());
            hints
        }
        Error::InvalidConstraint { .. } => vec![
            "Use an exact version ('1.2.3') or a range ('^1.2', '>=1.0.0, <2.0.0')".to_string(),
            "Join alternative ranges with '||'".to_string(),
        ],
        Error::InvalidPath { .. } => vec![
            "Dependency paths are relative to the project directory, e.g. 'vendor/libfoo'"
                .to_string(),
        ],
        Error::ManifestParse { .. } => {
            vec!["Fix the YAML syntax in the file and run the command again".to_string()]
        }
        _ => Vec::new(),
    }
}

/// Finds a candidate within edit distance 2 of `input`, closest first.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance over chars, using a single rolling row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != *cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }

    row[b_chars.len()]
}
