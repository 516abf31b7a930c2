//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Strips types and lowers JSX, modules and newer syntax to plain JavaScript.
#[derive(Debug, Parser)]
#[command(name = "rinse")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to transform
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Transforms to apply (comma-separated: jsx,typescript,flow,imports,react-hot-loader,jest)
    #[arg(long, short = 't', value_delimiter = ',')]
    pub transforms: Vec<String>,

    /// Element factory for JSX, e.g. `h`
    #[arg(long = "jsx-pragma")]
    pub jsx_pragma: Option<String>,

    /// Fragment component for JSX, e.g. `Fragment`
    #[arg(long = "jsx-fragment-pragma")]
    pub jsx_fragment_pragma: Option<String>,

    /// Leave out JSX dev metadata
    #[arg(long)]
    pub production: bool,

    /// Keep optional chaining, nullish coalescing and other newer syntax as is
    #[arg(long = "disable-es-transforms")]
    pub disable_es_transforms: bool,

    /// TypeScript-style module interop for `imports`
    #[arg(long = "legacy-ts-interop")]
    pub legacy_ts_interop: bool,

    /// Babel 5-style `module.exports` for default-only modules
    #[arg(long = "legacy-babel5-interop")]
    pub legacy_babel5_interop: bool,

    /// Keep imports whose bindings are only used as types
    #[arg(long = "keep-unused-imports")]
    pub keep_unused_imports: bool,

    /// Leave `import()` alone under `imports`
    #[arg(long = "preserve-dynamic-import")]
    pub preserve_dynamic_import: bool,

    /// Write a `.map` file next to each output (requires --out-dir)
    #[arg(long = "source-maps", requires = "out_dir")]
    pub source_maps: bool,

    /// Directory to write outputs to; prints to stdout when omitted
    #[arg(long = "out-dir", short = 'd')]
    pub out_dir: Option<Utf8PathBuf>,

    /// JSON file with transform options (camelCase keys)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Glob patterns of files to pick up inside directories
    #[arg(long, default_values_t = default_includes())]
    pub include: Vec<String>,

    /// Glob patterns to skip inside directories
    #[arg(long)]
    pub exclude: Vec<String>,
}

fn default_includes() -> Vec<String> {
    ["**/*.js", "**/*.jsx", "**/*.ts", "**/*.tsx", "**/*.mjs", "**/*.cjs", "**/*.mts", "**/*.cts"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["rinse", "src"]);
        assert_eq!(args.paths, vec![Utf8PathBuf::from("src")]);
        assert!(args.transforms.is_empty());
        assert!(args.out_dir.is_none());
        assert!(args.include.contains(&"**/*.tsx".to_string()));
    }

    #[test]
    fn test_transform_list() {
        let args = Args::parse_from(["rinse", "-t", "jsx,typescript", "--transforms", "imports", "a.ts"]);
        assert_eq!(args.transforms, vec!["jsx", "typescript", "imports"]);
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Args::try_parse_from(["rinse"]).is_err());
    }

    #[test]
    fn test_source_maps_need_out_dir() {
        assert!(Args::try_parse_from(["rinse", "--source-maps", "a.js"]).is_err());
        let args = Args::parse_from(["rinse", "--source-maps", "-d", "out", "a.js"]);
        assert!(args.source_maps);
    }
}
