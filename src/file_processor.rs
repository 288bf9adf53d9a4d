//! Input discovery and file rendering

use crate::config::Config;
use crate::render::HtmlRenderer;
use ignore::WalkBuilder;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Extensions picked up when walking a directory
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Errors raised while reading, writing or discovering inputs
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("Refusing to overwrite {path} with its own rendered output")]
    WouldOverwriteInput { path: String },

    #[error("{0}")]
    Discovery(String),
}

/// Something to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// Where rendered HTML goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Next to the input, with the configured extension
    Sibling,
    /// Into this directory, keeping the input file stem
    Directory(PathBuf),
    Stdout,
}

#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub input: PathBuf,
    /// `None` when the HTML is meant for stdout
    pub output: Option<PathBuf>,
    pub html: String,
}

pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.iter().any(|md| ext.eq_ignore_ascii_case(md)))
}

/// Expand command line paths into inputs.
///
/// `-` means stdin. Files are taken as given. Directories are walked for
/// Markdown files, honoring `.gitignore` (unless disabled) and `global.exclude`.
pub fn discover_inputs(paths: &[String], config: &Config) -> Result<Vec<Input>, ProcessError> {
    let exclude = config.exclude_matcher();
    let mut stdin = false;
    let mut files = Vec::new();

    for path_str in paths {
        if path_str == "-" {
            stdin = true;
            continue;
        }

        let path = Path::new(path_str);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let walker = WalkBuilder::new(path)
                .git_ignore(config.global.respect_gitignore)
                .git_global(config.global.respect_gitignore)
                .git_exclude(config.global.respect_gitignore)
                .require_git(false)
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| ProcessError::Discovery(format!("Failed to walk {path_str}: {e}")))?;
                let file = entry.path();
                if !file.is_file() || !is_markdown_file(file) {
                    continue;
                }
                let relative = file.strip_prefix(path).unwrap_or(file);
                // A pattern naming a directory excludes everything below it
                if relative.ancestors().any(|dir| exclude.is_match(dir)) {
                    log::debug!("Excluded by config: {}", file.display());
                    continue;
                }
                files.push(file.to_path_buf());
            }
        } else {
            return Err(ProcessError::Discovery(format!("Path not found: {path_str}")));
        }
    }

    files.sort();
    files.dedup();

    let mut inputs: Vec<Input> = files.into_iter().map(Input::File).collect();
    if stdin {
        inputs.insert(0, Input::Stdin);
    }
    Ok(inputs)
}

/// Where the HTML for `input` is written, or `None` for stdout.
pub fn output_path(input: &Path, target: &OutputTarget, extension: &str) -> Option<PathBuf> {
    match target {
        OutputTarget::Sibling => Some(input.with_extension(extension)),
        OutputTarget::Directory(dir) => {
            let stem = input.file_stem().unwrap_or(input.as_os_str());
            Some(dir.join(stem).with_extension(extension))
        }
        OutputTarget::Stdout => None,
    }
}

fn is_same_file(input: &Path, output: &Path) -> bool {
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

pub fn render_file(
    input: &Path,
    renderer: &HtmlRenderer,
    target: &OutputTarget,
    extension: &str,
) -> Result<RenderedFile, ProcessError> {
    let output = output_path(input, target, extension);
    if let Some(output) = &output
        && is_same_file(input, output)
    {
        return Err(ProcessError::WouldOverwriteInput {
            path: input.display().to_string(),
        });
    }

    let markdown = fs::read_to_string(input).map_err(|source| ProcessError::Read {
        path: input.display().to_string(),
        source,
    })?;
    let html = renderer.render(&markdown);

    if let Some(output) = &output {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ProcessError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(output, &html).map_err(|source| ProcessError::Write {
            path: output.display().to_string(),
            source,
        })?;
        log::debug!("Rendered {} -> {}", input.display(), output.display());
    }

    Ok(RenderedFile {
        input: input.to_path_buf(),
        output,
        html,
    })
}

/// Render every file, in parallel when the `parallel` feature is on. Results keep input order.
pub fn render_files(
    files: &[PathBuf],
    renderer: &HtmlRenderer,
    target: &OutputTarget,
    extension: &str,
) -> Vec<Result<RenderedFile, ProcessError>> {
    #[cfg(feature = "parallel")]
    {
        files
            .par_iter()
            .map(|file| render_file(file, renderer, target, extension))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        files
            .iter()
            .map(|file| render_file(file, renderer, target, extension))
            .collect()
    }
}

/// Render everything readable from `reader`, typically stdin.
pub fn render_reader(mut reader: impl Read, renderer: &HtmlRenderer) -> Result<String, ProcessError> {
    let mut markdown = String::new();
    reader
        .read_to_string(&mut markdown)
        .map_err(|source| ProcessError::Read {
            path: "<stdin>".to_string(),
            source,
        })?;
    Ok(renderer.render(&markdown))
}
