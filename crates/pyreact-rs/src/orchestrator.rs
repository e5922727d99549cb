//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::html;
use crate::output::{self, FormattedFailure, JsonReport, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use pyreact_transpiler::{transpile_source, Bundle};
use rayon::prelude::*;
use source_span::LineIndex;
use std::fs;
use thiserror::Error;
use walkdir::WalkDir;

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Failed to write the output file.
    #[error("failed to write {path}: {message}")]
    WriteFailed { path: Utf8PathBuf, message: String },

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Runs one compile pass, or the watch loop.
pub fn run(args: Args) -> Result<RunSummary, OrchestratorError> {
    if args.watch {
        run_watch(&args)
    } else {
        let files = discover_files(&args.inputs);
        run_single(&args, &files)
    }
}

/// Expands the positional inputs into the list of files to compile.
///
/// Files named directly are taken as they are. Directories are walked
/// recursively for `.py` files and sorted, so bundle order never
/// depends on directory iteration order.
fn discover_files(inputs: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        let mut found: Vec<Utf8PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
            .filter(|p| p.extension() == Some("py"))
            .collect();
        found.sort();
        files.append(&mut found);
    }
    files
}

struct FileResult {
    path: Utf8PathBuf,
    source: String,
    bundle: Bundle,
    failures: Vec<FormattedFailure>,
    parse_error_count: usize,
}

fn compile_file(path: &Utf8Path) -> Option<FileResult> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            return None;
        }
    };

    let result = transpile_source(&source);
    let index = LineIndex::new(&source);
    let mut failures = Vec::new();
    for error in &result.parse_errors {
        failures.push(output::parse_failure(path, &index, error));
    }
    for failure in result.bundle.failures() {
        failures.push(output::transpile_failure(path, &index, failure));
    }

    Some(FileResult {
        path: path.to_owned(),
        source,
        bundle: result.bundle,
        failures,
        parse_error_count: result.parse_errors.len(),
    })
}

/// Compiles `files` into one bundle and emits the requested output.
fn run_single(args: &Args, files: &[Utf8PathBuf]) -> Result<RunSummary, OrchestratorError> {
    // Files compile independently, so the per-file work runs in
    // parallel; only the merge below is ordered.
    let results: Vec<FileResult> = files.par_iter().filter_map(|path| compile_file(path)).collect();

    let mut bundle = Bundle::new();
    let mut failures: Vec<FormattedFailure> = Vec::new();
    let mut parse_error_count = 0;
    for file in results {
        parse_error_count += file.parse_error_count;
        failures.extend(file.failures);
        let index = LineIndex::new(&file.source);
        for rejected in bundle.merge(file.bundle) {
            failures.push(output::transpile_failure(&file.path, &index, &rejected));
        }
    }

    let summary = RunSummary {
        file_count: files.len(),
        component_count: bundle.len(),
        failure_count: failures.len() - parse_error_count,
        parse_error_count,
    };

    emit_output(args, &bundle, failures, &summary)?;
    Ok(summary)
}

fn emit_output(
    args: &Args,
    bundle: &Bundle,
    failures: Vec<FormattedFailure>,
    summary: &RunSummary,
) -> Result<(), OrchestratorError> {
    let mounted = mounted_components(args, bundle);
    let mut text = if args.html {
        html::render_page(&bundle.source(), &mounted, &args.title)
    } else {
        bundle.source()
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match args.output {
        OutputFormat::Human => {
            for failure in &failures {
                eprint!("{}", output::format_human(failure));
            }
            match &args.out {
                Some(path) => write_output(path, &text)?,
                None => print!("{}", text),
            }
            eprintln!("{}", summary.format());
        }
        OutputFormat::Json => {
            // stdout carries exactly one JSON document, so the
            // generated code only goes to a file here.
            if let Some(path) = &args.out {
                write_output(path, &text)?;
            }
            let report = JsonReport {
                files: summary.file_count,
                components: bundle.names().map(|n| n.to_string()).collect(),
                failures,
            };
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
    Ok(())
}

/// Which components the HTML page should mount.
fn mounted_components<'a>(args: &'a Args, bundle: &'a Bundle) -> Vec<&'a str> {
    if args.components.is_empty() {
        return bundle.names().map(|n| n.as_str()).collect();
    }
    let mut mounted = Vec::new();
    for name in &args.components {
        if bundle.get(name).is_some() {
            mounted.push(name.as_str());
        } else {
            eprintln!("Warning: unknown component '{}', skipping", name);
        }
    }
    mounted
}

fn write_output(path: &Utf8Path, text: &str) -> Result<(), OrchestratorError> {
    fs::write(path, text).map_err(|e| OrchestratorError::WriteFailed {
        path: path.to_owned(),
        message: e.to_string(),
    })
}

/// Runs in watch mode.
fn run_watch(args: &Args) -> Result<RunSummary, OrchestratorError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc;
    use std::time::Duration;

    eprintln!("Starting watch mode...\n");

    let files = discover_files(&args.inputs);
    let _summary = run_single(args, &files)?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    for input in &args.inputs {
        watcher
            .watch(input.as_std_path(), RecursiveMode::Recursive)
            .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;
    }

    eprintln!("Watching for changes... (Ctrl+C to stop)\n");

    while let Ok(event) = rx.recv() {
        let py_changed = event
            .paths
            .iter()
            .any(|p| p.extension().map(|ext| ext == "py").unwrap_or(false));
        if py_changed {
            eprintln!("File changed, recompiling...\n");
            // Rescan so newly created files join the bundle.
            let files = discover_files(&args.inputs);
            let _ = run_single(args, &files);
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &std::path::Path, name: &str, contents: &str) -> Utf8PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn test_discover_sorts_directory_scan() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.py", "");
        write(dir.path(), "a.py", "");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "sub/c.py", "");

        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let files = discover_files(&[root]);
        let names: Vec<&str> = files.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["a.py", "b.py", "c.py"]);
    }

    #[test]
    fn test_discover_takes_named_files_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "components.txt", "");
        let files = discover_files(std::slice::from_ref(&path));
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_run_writes_bundle_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "banner.py",
            "class Banner(Component):\n    def render(self):\n        return h1('hi')\n",
        );
        let out = Utf8PathBuf::try_from(dir.path().join("bundle.js")).unwrap();

        let args = Args {
            inputs: vec![input],
            out: Some(out.clone()),
            html: false,
            title: "PyReact App".to_string(),
            components: Vec::new(),
            output: OutputFormat::Human,
            watch: false,
        };
        let summary = run(args).unwrap();
        assert_eq!(summary.component_count, 1);
        assert!(!summary.failed());

        let written = fs::read_to_string(out).unwrap();
        assert!(written.starts_with("// PyReact - Transpiled Components\n"));
        assert!(written.contains("function Banner(props)"));
        assert!(written.ends_with("}\n"));
    }
}
