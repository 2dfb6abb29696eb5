use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use bim_finance_core::ingest::building::CategoryRow;

/// Read a JSON or YAML parameter file into a typed value, selecting the
/// parser by file extension (.yaml/.yml, anything else is JSON).
pub fn read_params<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;

    let is_yaml = resolved
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let value: T = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    };
    Ok(value)
}

/// Read a measured-category table from CSV with a
/// category,area,cost_per_area header.
pub fn read_category_csv(path: &str) -> Result<Vec<CategoryRow>, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let mut reader = csv::Reader::from_path(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CategoryRow =
            record.map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Resolve the path against the working directory and require a real file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}
