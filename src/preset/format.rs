//! Weight format detection
//!
//! Decides from a repository listing which weight files make up the model and
//! which config document describes it.

use glob::Pattern;
use once_cell::sync::Lazy;

use crate::error::{PresetError, Result};
use crate::hub::FileEntry;

static CONSOLIDATED: Lazy<Pattern> = Lazy::new(|| pattern("consolidated*.safetensors"));
static SAFETENSORS: Lazy<Pattern> = Lazy::new(|| pattern("*.safetensors"));
static BIN: Lazy<Pattern> = Lazy::new(|| pattern("*.bin"));

fn pattern(glob: &str) -> Pattern {
    Pattern::new(glob).expect("literal glob pattern")
}

const AUTO: &str = "auto";
const MISTRAL: &str = "mistral";

/// Outcome of format detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightFormat {
    /// Config document to fetch next
    pub config_file: &'static str,
    pub load_format: &'static str,
    pub config_format: &'static str,
    pub tokenizer_mode: &'static str,
    /// Files whose sizes make up the model
    pub files: Vec<FileEntry>,
}

impl WeightFormat {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Classify a repository listing.
///
/// Consolidated (`consolidated*.safetensors`) checkpoints take priority over
/// everything else. Otherwise safetensors are preferred over `.bin` so repos
/// shipping both are not counted twice.
pub fn classify(files: &[FileEntry]) -> Result<WeightFormat> {
    let consolidated: Vec<FileEntry> = files
        .iter()
        .filter(|f| CONSOLIDATED.matches(file_name(&f.path)))
        .cloned()
        .collect();

    if !consolidated.is_empty() {
        return Ok(WeightFormat {
            config_file: "params.json",
            load_format: MISTRAL,
            config_format: MISTRAL,
            tokenizer_mode: MISTRAL,
            files: consolidated,
        });
    }

    let (safetensors, bins): (Vec<&FileEntry>, Vec<&FileEntry>) = files
        .iter()
        .filter(|f| {
            let name = file_name(&f.path);
            SAFETENSORS.matches(name) || BIN.matches(name)
        })
        .partition(|f| SAFETENSORS.matches(file_name(&f.path)));

    let selected = if !safetensors.is_empty() {
        safetensors
    } else if !bins.is_empty() {
        bins
    } else {
        return Err(PresetError::NoWeightFiles);
    };

    Ok(WeightFormat {
        config_file: "config.json",
        load_format: AUTO,
        config_format: AUTO,
        tokenizer_mode: AUTO,
        files: selected.into_iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1 << 30;

    fn file(path: &str, size: u64) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            size,
            kind: "file".to_string(),
        }
    }

    #[test]
    fn test_patterns_are_valid() {
        for glob in ["consolidated*.safetensors", "*.safetensors", "*.bin"] {
            assert!(Pattern::new(glob).is_ok());
        }
        assert!(CONSOLIDATED.matches("consolidated-00001-of-00002.safetensors"));
        assert!(!CONSOLIDATED.matches("model.safetensors"));
    }

    #[test]
    fn test_safetensors_only() {
        let format = classify(&[
            file("config.json", 700),
            file("model-00001-of-00002.safetensors", 5 * GIB),
            file("model-00002-of-00002.safetensors", 3 * GIB),
            file("model.safetensors.index.json", 30_000),
        ])
        .unwrap();

        assert_eq!(format.config_file, "config.json");
        assert_eq!(format.load_format, "auto");
        assert_eq!(format.files.len(), 2);
        assert_eq!(format.total_bytes(), 8 * GIB);
    }

    #[test]
    fn test_mixed_formats_count_safetensors_once() {
        let format = classify(&[
            file("pytorch_model-00001-of-00002.bin", 10 * GIB),
            file("pytorch_model-00002-of-00002.bin", 4 * GIB),
            file("model-00001-of-00002.safetensors", 10 * GIB),
            file("model-00002-of-00002.safetensors", 4 * GIB),
        ])
        .unwrap();

        assert_eq!(format.total_bytes(), 14 * GIB);
        assert!(format.files.iter().all(|f| f.path.ends_with(".safetensors")));
    }

    #[test]
    fn test_bin_only() {
        let format = classify(&[file("pytorch_model.bin", 2 * GIB), file("README.md", 10)]).unwrap();
        assert_eq!(format.config_file, "config.json");
        assert_eq!(format.total_bytes(), 2 * GIB);
    }

    #[test]
    fn test_consolidated_wins_over_standard_weights() {
        let format = classify(&[
            file("consolidated.safetensors", 9 * GIB),
            file("model-00001-of-00002.safetensors", 5 * GIB),
            file("model-00002-of-00002.safetensors", 4 * GIB),
            file("params.json", 400),
        ])
        .unwrap();

        assert_eq!(format.config_file, "params.json");
        assert_eq!(format.load_format, "mistral");
        assert_eq!(format.config_format, "mistral");
        assert_eq!(format.tokenizer_mode, "mistral");
        assert_eq!(format.files.len(), 1);
        assert_eq!(format.total_bytes(), 9 * GIB);
    }

    #[test]
    fn test_nested_paths_match_on_file_name() {
        let format = classify(&[file("weights/model.safetensors", GIB)]).unwrap();
        assert_eq!(format.total_bytes(), GIB);
    }

    #[test]
    fn test_no_weights_is_error() {
        let err = classify(&[file("README.md", 10), file("original/consolidated.00.pth", GIB)])
            .unwrap_err();
        assert!(matches!(err, PresetError::NoWeightFiles));
        assert!(matches!(classify(&[]), Err(PresetError::NoWeightFiles)));
    }
}
