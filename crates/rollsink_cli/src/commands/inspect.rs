//! Inspect command implementation.

use rollsink::naming::{file_index, indexed_files, latest};
use rollsink::RotatingFileWriter;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Files produced by a template.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// The template as given.
    pub template: String,
    /// Matching files in family/index order.
    pub files: Vec<FileEntry>,
    /// Total bytes across all matching files.
    pub total_size: u64,
    /// The match a writer treats as current.
    pub latest: Option<String>,
    /// Where a fresh writer's first write would go.
    pub next: String,
}

/// One matching file.
#[derive(Debug, Serialize)]
pub struct FileEntry {
    /// Path on disk.
    pub path: String,
    /// Index parsed from the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    /// Size in bytes.
    pub size: u64,
}

/// Runs the inspect command.
pub fn run(template: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(template)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Collects the inspection report for `template`.
pub fn inspect(template: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let paths = indexed_files(template)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let path = path.display().to_string();
        let size = fs::metadata(&path)?.len();
        files.push(FileEntry {
            index: file_index(&path),
            size,
            path,
        });
    }

    let names: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    let current = latest(&names).map(|name| (*name).to_string());

    let next = RotatingFileWriter::with_template(template, 0)
        .next_name()
        .display()
        .to_string();

    Ok(InspectResult {
        template: template.display().to_string(),
        total_size: files.iter().map(|f| f.size).sum(),
        files,
        latest: current,
        next,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("Template: {}", result.template);
    println!();

    if result.files.is_empty() {
        println!("No files yet");
    } else {
        println!("{:>8}  {:>12}  Path", "Index", "Size");
        for file in &result.files {
            let index = file
                .index
                .map_or_else(|| "-".to_string(), |i| i.to_string());
            let marker = if result.latest.as_deref() == Some(file.path.as_str()) {
                " (latest)"
            } else {
                ""
            };
            println!("{:>8}  {:>12}  {}{}", index, file.size, file.path, marker);
        }
        println!();
        println!("Total: {} bytes in {} files", result.total_size, result.files.len());
    }

    println!("Next writer opens: {}", result.next);
}
