//! Worker configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::error::WorkerError;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// JSON-lines file with one game record per line
    pub input: PathBuf,

    /// Where annotated games are written, one JSON line per game
    pub output: PathBuf,

    /// Games annotated concurrently
    pub workers: usize,

    /// Whether each output ply carries its FEN snapshot
    pub include_fen: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let input = lookup("ANNOTATE_INPUT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| WorkerError::Config("ANNOTATE_INPUT not set".into()))?;

        let output = lookup("ANNOTATE_OUTPUT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("annotations.jsonl"));

        let workers = match lookup("ANNOTATE_WORKERS") {
            Some(v) => v.trim().parse::<usize>().map_err(|_| {
                WorkerError::Config(format!("ANNOTATE_WORKERS is not a number: {v}"))
            })?,
            None => num_cpus::get(),
        }
        .max(1);

        let include_fen = match lookup("ANNOTATE_INCLUDE_FEN") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                WorkerError::Config(format!("ANNOTATE_INCLUDE_FEN is not a boolean: {v}"))
            })?,
            None => true,
        };

        Ok(Self {
            input,
            output,
            workers,
            include_fen,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, WorkerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ANNOTATE_INPUT", "games.jsonl")]).unwrap();
        assert_eq!(config.input, PathBuf::from("games.jsonl"));
        assert_eq!(config.output, PathBuf::from("annotations.jsonl"));
        assert!(config.workers >= 1);
        assert!(config.include_fen);
    }

    #[test]
    fn test_input_required() {
        assert!(matches!(load(&[]), Err(WorkerError::Config(_))));
        assert!(matches!(
            load(&[("ANNOTATE_INPUT", "  ")]),
            Err(WorkerError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ANNOTATE_INPUT", "in.jsonl"),
            ("ANNOTATE_OUTPUT", "out.jsonl"),
            ("ANNOTATE_WORKERS", "0"),
            ("ANNOTATE_INCLUDE_FEN", "false"),
        ])
        .unwrap();
        assert_eq!(config.output, PathBuf::from("out.jsonl"));
        assert_eq!(config.workers, 1);
        assert!(!config.include_fen);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("ANNOTATE_INPUT", "in"), ("ANNOTATE_WORKERS", "many")]).is_err());
        assert!(load(&[("ANNOTATE_INPUT", "in"), ("ANNOTATE_INCLUDE_FEN", "maybe")]).is_err());
    }
}
