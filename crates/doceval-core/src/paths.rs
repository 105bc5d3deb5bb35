//! Derived file names for document versions.
//!
//! Given `dir/name.ext`, iteration `n` lives at `dir/name_iter{n}.ext`. A
//! trailing `_iter<digits>` token on the stem is stripped first, so deriving
//! from an already-iterated path never stacks suffixes.

use std::path::{Path, PathBuf};

const ITER_TOKEN: &str = "_iter";

/// Path of the file written for iteration `iteration` of `original`
pub fn iteration_path(original: &Path, iteration: usize) -> PathBuf {
    let stem = file_stem(original);
    let base = strip_iteration_token(&stem);
    with_stem(original, &format!("{}{}{}", base, ITER_TOKEN, iteration))
}

/// Default output of the `improve` command: `dir/name_improved.ext`
pub fn improved_path(original: &Path) -> PathBuf {
    with_stem(original, &format!("{}_improved", file_stem(original)))
}

/// Default output of the `generate-qa` command: `dir/name_questions.jsonl`
pub fn questions_path(original: &Path) -> PathBuf {
    original.with_file_name(format!("{}_questions.jsonl", file_stem(original)))
}

/// Remove a trailing `_iter<digits>` token from a file stem
pub fn strip_iteration_token(stem: &str) -> &str {
    match stem.rfind(ITER_TOKEN) {
        Some(idx) => {
            let digits = &stem[idx + ITER_TOKEN.len()..];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                &stem[..idx]
            } else {
                stem
            }
        }
        None => stem,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn with_stem(original: &Path, stem: &str) -> PathBuf {
    let file_name = match original.extension() {
        Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
        None => stem.to_string(),
    };
    original.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_path_appends_suffix() {
        let path = iteration_path(Path::new("docs/guide.md"), 1);
        assert_eq!(path, PathBuf::from("docs/guide_iter1.md"));
    }

    #[test]
    fn test_iteration_path_without_directory() {
        let path = iteration_path(Path::new("guide.md"), 3);
        assert_eq!(path, PathBuf::from("guide_iter3.md"));
    }

    #[test]
    fn test_iteration_path_replaces_existing_token() {
        let path = iteration_path(Path::new("/tmp/docs/guide_iter2.md"), 5);
        assert_eq!(path, PathBuf::from("/tmp/docs/guide_iter5.md"));
    }

    #[test]
    fn test_iteration_path_without_extension() {
        let path = iteration_path(Path::new("notes/README"), 2);
        assert_eq!(path, PathBuf::from("notes/README_iter2"));
    }

    #[test]
    fn test_iteration_path_keeps_inner_dots() {
        let path = iteration_path(Path::new("api.v2.md"), 1);
        assert_eq!(path, PathBuf::from("api.v2_iter1.md"));
    }

    #[test]
    fn test_strip_only_numbered_tokens() {
        assert_eq!(strip_iteration_token("guide_iter12"), "guide");
        assert_eq!(strip_iteration_token("my_iterator"), "my_iterator");
        assert_eq!(strip_iteration_token("guide_iter"), "guide_iter");
        assert_eq!(strip_iteration_token("guide"), "guide");
    }

    #[test]
    fn test_improved_path() {
        let path = improved_path(Path::new("docs/guide.md"));
        assert_eq!(path, PathBuf::from("docs/guide_improved.md"));
    }

    #[test]
    fn test_questions_path() {
        let path = questions_path(Path::new("docs/guide.md"));
        assert_eq!(path, PathBuf::from("docs/guide_questions.jsonl"));
    }
}
