//! File discovery and the parallel transform pass.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::Diagnostic;
use rayon::prelude::*;
use rinse_transformer::{transform, Options, SourceMapOptions, TransformError};
use std::fs;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// A failure tied to one input file.
#[derive(Debug, Error, Diagnostic)]
pub enum FileError {
    #[error("failed to read {path}")]
    #[diagnostic(code(rinse::io::read))]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    #[diagnostic(code(rinse::io::write))]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(rinse::transform))]
    Transform(#[from] TransformError),
}

/// Errors that stop the run before any file is transformed.
#[derive(Debug, Error, Diagnostic)]
pub enum DiscoveryError {
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(code(rinse::glob))]
    InvalidGlob(String),

    #[error("no such file or directory: {0}")]
    #[diagnostic(code(rinse::io::missing))]
    Missing(Utf8PathBuf),
}

/// One file to transform and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: Utf8PathBuf,
    /// `None` prints to stdout.
    pub output: Option<Utf8PathBuf>,
}

/// What happened to each job.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub transformed: usize,
    pub failures: Vec<FileError>,
}

/// Expands `args.paths` into jobs. Files named directly are always taken;
/// directories are walked and filtered by the include and exclude globs,
/// matched against the path relative to that directory.
pub fn discover(args: &Args) -> Result<Vec<Job>, DiscoveryError> {
    let include_set = build_glob_set(&args.include)?;
    let mut exclude_patterns = args.exclude.clone();
    exclude_patterns.push("**/node_modules/**".to_string());
    let exclude_set = build_glob_set(&exclude_patterns)?;

    let mut jobs = Vec::new();
    for root in &args.paths {
        if root.is_file() {
            let output = args.out_dir.as_ref().map(|out_dir| {
                let file_name = root.file_name().map_or_else(|| root.clone(), Utf8PathBuf::from);
                out_dir.join(output_path(&file_name))
            });
            jobs.push(Job {
                input: root.clone(),
                output,
            });
            continue;
        }
        if !root.is_dir() {
            return Err(DiscoveryError::Missing(root.clone()));
        }
        let mut files: Vec<Utf8PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
            .collect();
        files.sort();
        for input in files {
            let relative = input.strip_prefix(root).unwrap_or(input.as_path()).to_owned();
            if !include_set.is_match(relative.as_str()) || exclude_set.is_match(relative.as_str()) {
                continue;
            }
            let output = args.out_dir.as_ref().map(|out_dir| out_dir.join(output_path(&relative)));
            jobs.push(Job { input, output });
        }
    }
    debug!(jobs = jobs.len(), "discovered input files");
    Ok(jobs)
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, DiscoveryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| DiscoveryError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| DiscoveryError::InvalidGlob(e.to_string()))
}

/// The output file for `path`: TypeScript and JSX extensions become `.js`,
/// keeping the `m`/`c` module flavor.
pub fn output_path(path: &Utf8Path) -> Utf8PathBuf {
    match path.extension() {
        Some("ts" | "tsx" | "jsx") => path.with_extension("js"),
        Some("mts") => path.with_extension("mjs"),
        Some("cts") => path.with_extension("cjs"),
        _ => path.to_owned(),
    }
}

/// Transforms every job in parallel. Outputs for stdout are printed in job
/// order once all files are done.
pub fn run(jobs: &[Job], base_options: &Options, source_maps: bool) -> RunSummary {
    let results: Vec<Result<Option<String>, FileError>> = jobs
        .par_iter()
        .map(|job| run_job(job, base_options, source_maps))
        .collect();

    let mut summary = RunSummary::default();
    for result in results {
        match result {
            Ok(stdout) => {
                summary.transformed += 1;
                if let Some(code) = stdout {
                    println!("{code}");
                }
            }
            Err(error) => summary.failures.push(error),
        }
    }
    info!(
        transformed = summary.transformed,
        failed = summary.failures.len(),
        "finished"
    );
    summary
}

fn run_job(job: &Job, base_options: &Options, source_maps: bool) -> Result<Option<String>, FileError> {
    let source = fs::read_to_string(&job.input).map_err(|source| FileError::Read {
        path: job.input.clone(),
        source,
    })?;

    let mut options = base_options.clone();
    options.file_path = Some(job.input.to_string());
    let map_path = job
        .output
        .as_ref()
        .filter(|_| source_maps)
        .map(|output| Utf8PathBuf::from(format!("{output}.map")));
    if let Some(output) = &job.output {
        if source_maps {
            options.source_map_options = Some(SourceMapOptions {
                compiled_filename: output.file_name().unwrap_or_default().to_string(),
            });
        }
    }

    debug!(path = %job.input, "transforming");
    let result = transform(&source, &options)?;

    let Some(output) = &job.output else {
        return Ok(Some(result.code));
    };
    let mut code = result.code;
    if let (Some(map), Some(map_path)) = (&result.source_map, &map_path) {
        write_file(map_path, &map.to_json())?;
        let map_name = map_path.file_name().unwrap_or_default();
        code.push_str(&format!("\n//# sourceMappingURL={map_name}"));
    }
    write_file(output, &code)?;
    Ok(None)
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<(), FileError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };
    write().map_err(|source| FileError::Write {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rinse_transformer::Transforms;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Utf8Path::new("a/b.tsx")), Utf8PathBuf::from("a/b.js"));
        assert_eq!(output_path(Utf8Path::new("b.mts")), Utf8PathBuf::from("b.mjs"));
        assert_eq!(output_path(Utf8Path::new("b.cts")), Utf8PathBuf::from("b.cjs"));
        assert_eq!(output_path(Utf8Path::new("b.js")), Utf8PathBuf::from("b.js"));
    }

    #[test]
    fn test_discover_filters_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        fs::create_dir_all(root.join("src/node_modules/x")).unwrap();
        fs::write(root.join("src/a.ts"), "").unwrap();
        fs::write(root.join("src/b.css"), "").unwrap();
        fs::write(root.join("src/c.test.ts"), "").unwrap();
        fs::write(root.join("src/node_modules/x/index.js"), "").unwrap();

        let args = Args::parse_from([
            "rinse",
            "--exclude",
            "**/*.test.ts",
            "-d",
            "out",
            root.join("src").as_str(),
        ]);
        let jobs = discover(&args).unwrap();
        assert_eq!(
            jobs,
            vec![Job {
                input: root.join("src/a.ts"),
                output: Some(Utf8PathBuf::from("out/a.js")),
            }]
        );
    }

    #[test]
    fn test_discover_missing_path() {
        let args = Args::parse_from(["rinse", "/definitely/not/here"]);
        assert!(matches!(discover(&args), Err(DiscoveryError::Missing(_))));
    }

    #[test]
    fn test_run_writes_outputs_and_maps() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        fs::write(root.join("good.ts"), "let a: number = 1;\nlet b = a;").unwrap();
        fs::write(root.join("bad.ts"), "let = ;").unwrap();

        let jobs = vec![
            Job {
                input: root.join("good.ts"),
                output: Some(root.join("out/good.js")),
            },
            Job {
                input: root.join("bad.ts"),
                output: Some(root.join("out/bad.js")),
            },
        ];
        let summary = run(&jobs, &Options::new(Transforms::TYPESCRIPT), true);
        assert_eq!(summary.transformed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].to_string().contains("bad.ts"));

        let code = fs::read_to_string(root.join("out/good.js")).unwrap();
        assert_eq!(code, "let a = 1;\nlet b = a;\n//# sourceMappingURL=good.js.map");
        let map: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("out/good.js.map")).unwrap()).unwrap();
        assert_eq!(map["file"], "good.js");
        assert_eq!(map["mappings"], "AAAA;AACA");
    }
}
