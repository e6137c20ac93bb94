//! importfmt - Canonical import-block formatter for JavaScript and TypeScript

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::Pattern;
use importfmt::process::{FormatOutcome, Formatter};
use importfmt::{find_directive, parse_args, CliArgs, Config, DirectiveOverrides, QuoteStyle, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Source file extensions to process
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = parse_args();
    init_tracing(args.debug);

    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        // Process stdin - use current directory for config discovery
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // For explicit config files, we use one config for all files.
    // For auto-discovery, each file may have its own config.
    let use_per_file_config = args.config.is_none();
    let base_config = if use_per_file_config {
        None
    } else {
        Some(build_config(&args, None)?)
    };

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    // Collect all files to process
    let files = collect_files(&args);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No source files found to format.");
        }
        return Ok(());
    }

    let changed_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let process_one = |path: &PathBuf| {
        let file_result = if let Some(config) = base_config.as_ref() {
            process_single_file(path, config, &args)
        } else {
            match build_config(&args, Some(path)) {
                Ok(config) => process_single_file(path, &config, &args),
                Err(e) => Err(e),
            }
        };
        match file_result {
            Ok(true) => {
                changed_count.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error formatting {}: {}", path.display(), e);
            }
        }
    };

    // Sequential processing keeps stdout output in input order
    let use_sequential = args.stdout || args.jobs == Some(1);
    if use_sequential {
        files.iter().for_each(process_one);
    } else {
        files.par_iter().for_each(process_one);
    }

    let changed = changed_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.silent {
        if args.check {
            eprintln!(
                "{changed} of {} files would be reformatted, {errors} errors.",
                files.len()
            );
        } else if errors == 0 {
            eprintln!("Formatted {} files, {changed} changed.", files.len());
        } else {
            eprintln!("Formatted {} files, {changed} changed, {errors} errors.", files.len());
        }
    }

    if (args.check && changed > 0) || errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize the tracing subscriber writing to stderr
fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if debug {
        EnvFilter::new("importfmt=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)?
    } else if let Some(path) = for_path {
        Config::from_discovered_files(path)
    } else {
        Config::from_discovered_files(&std::env::current_dir().unwrap_or_default())
    };

    // Override with CLI arguments
    if let Some(indent) = args.indent {
        config.indent = indent;
    }
    if let Some(quote) = &args.quote {
        config.quote = match quote.as_str() {
            "double" => QuoteStyle::Double,
            _ => QuoteStyle::Single,
        };
    }
    if args.no_group_comments {
        config.group_comments = false;
    }

    // Validate configuration
    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    // Compile exclude patterns
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let custom_extensions = &args.extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // Recursive directory traversal
                // Note: WalkDir detects symlink loops when follow_links(true) and
                // returns errors for them. We skip errors via filter_map(ok).
                // max_depth prevents runaway traversal in pathological directory structures.
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_source_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else {
                // Non-recursive: only direct children
                if let Ok(entries) = std::fs::read_dir(input) {
                    for entry in entries.filter_map(std::result::Result::ok) {
                        let path = entry.path();
                        if path.is_file()
                            && is_source_file(&path, custom_extensions)
                            && !is_excluded(&path, &exclude_patterns)
                        {
                            files.push(path);
                        }
                    }
                }
            }
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Match against full path
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against file name only
        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Match against each path component (for directory patterns)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a recognized source extension
/// Checks against both default extensions and any custom extensions provided
fn is_source_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            if SOURCE_EXTENSIONS.contains(&ext) {
                return true;
            }
            for custom in custom_extensions {
                let custom_ext = custom.strip_prefix('.').unwrap_or(custom);
                if ext == custom_ext {
                    return true;
                }
            }
            false
        })
}

/// Apply directive overrides from file contents to a configuration
///
/// Returns true when the directive disables formatting for this file.
fn apply_directive_overrides(config: &mut Config, contents: &str) -> bool {
    let cursor = Cursor::new(contents.as_bytes());
    let Some(overrides) = find_directive(&mut BufReader::new(cursor)) else {
        return false;
    };
    apply_overrides(config, &overrides)
}

fn apply_overrides(config: &mut Config, overrides: &DirectiveOverrides) -> bool {
    if overrides.off {
        return true;
    }
    if let Some(indent) = overrides.indent {
        config.indent = indent;
    }
    if let Some(quote) = overrides.quote {
        config.quote = quote;
    }
    if let Some(group_comments) = overrides.group_comments {
        config.group_comments = group_comments;
    }
    false
}

/// Process a single file; returns whether its imports would change
fn process_single_file(path: &PathBuf, config: &Config, args: &CliArgs) -> Result<bool> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            let size_mb = file_size / (1024 * 1024);
            let limit_mb = DEFAULT_MAX_FILE_SIZE / (1024 * 1024);
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                size_mb,
                limit_mb
            );
        }
        return Ok(false);
    }

    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    // Make a per-file copy of config that can be overridden by directives
    let mut file_config = config.clone();
    if apply_directive_overrides(&mut file_config, &contents) {
        tracing::debug!(path = %path.display(), "formatting disabled by directive");
        if args.stdout {
            io::stdout().write_all(contents.as_bytes())?;
        }
        return Ok(false);
    }
    if let Some(error) = file_config.validate() {
        anyhow::bail!("Invalid configuration after directives: {error}");
    }

    let mut formatter = Formatter::new(file_config)?;
    match formatter.format_document(&contents) {
        Ok(FormatOutcome::Changed(output)) => {
            if args.check {
                if !args.silent {
                    println!("{}", path.display());
                }
            } else if args.stdout {
                io::stdout().write_all(output.as_bytes())?;
            } else {
                std::fs::write(path, output.as_bytes())?;
            }
            Ok(true)
        }
        Ok(FormatOutcome::Unchanged) => {
            if args.stdout {
                io::stdout().write_all(contents.as_bytes())?;
            }
            Ok(false)
        }
        Err(e) => {
            // Formatting is fail-safe: the document is left unchanged
            Err(e.into())
        }
    }
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    let mut stdin_contents = String::new();
    io::stdin().read_to_string(&mut stdin_contents)?;

    // Check size after reading to prevent processing extremely large input
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    // Make a copy of config that can be overridden by directives
    let mut file_config = config.clone();
    if apply_directive_overrides(&mut file_config, &stdin_contents) {
        io::stdout().write_all(stdin_contents.as_bytes())?;
        return Ok(());
    }
    if let Some(error) = file_config.validate() {
        anyhow::bail!("Invalid configuration after directives: {error}");
    }

    // Always emit a full document on stdout; failures keep the input text
    let mut formatter = Formatter::new(file_config)?;
    match formatter.format_document(&stdin_contents) {
        Ok(FormatOutcome::Changed(output)) => io::stdout().write_all(output.as_bytes())?,
        Ok(FormatOutcome::Unchanged) => io::stdout().write_all(stdin_contents.as_bytes())?,
        Err(e) => {
            eprintln!("Error formatting stdin: {e}");
            io::stdout().write_all(stdin_contents.as_bytes())?;
        }
    }

    Ok(())
}

fn print_usage() {
    println!(
        "importfmt v{} - import block formatter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Groups, deduplicates, orders, and aligns the import section of");
    println!("JavaScript/TypeScript sources; the rest of the file is untouched.");
    println!();
    println!("Usage:");
    println!("  importfmt [OPTIONS] <FILE>...");
    println!("  importfmt [OPTIONS] -r <DIRECTORY>");
    println!("  importfmt [OPTIONS] -              # Read from stdin");
    println!("  cat file.ts | importfmt            # Pipe input");
    println!();
    println!("Examples:");
    println!("  importfmt file.ts               # Format single file in-place");
    println!("  importfmt src/*.ts              # Format multiple files");
    println!("  importfmt -r src/               # Recursively format directory");
    println!("  importfmt --check -r src/       # CI gate: exit 1 on unformatted files");
    println!("  importfmt -q double file.ts     # Render double-quoted specifiers");
    println!();
    println!("Options:");
    println!("  -i, --indent <NUM>              Indent in multi-line imports [default: 4]");
    println!("  -q, --quote <STYLE>             Quote style: single|double [default: single]");
    println!("  --no-group-comments             Don't emit // name headers above groups");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  --ext <EXT>                     Additional source extension (repeatable)");
    println!("  -s, --stdout                    Output to stdout");
    println!("  --check                         Report files that would change; exit 1 if any");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("  -S, --silent                    Silent mode");
    println!("  -D, --debug                     Enable debug output");
    println!("  -h, --help                      Print help");
    println!();
    println!("Supported extensions: .js, .jsx, .ts, .tsx, .mjs, .cjs, .mts, .cts");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for importfmt.toml in parent directories starting from the");
    println!("  file being formatted up to the root directory, plus the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
    println!();
    println!("In-file directives (scanned in the first lines of the file):");
    println!("  // importfmt: off");
    println!("  // importfmt: --indent 2 --quote double");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_source_file_defaults() {
        assert!(is_source_file(Path::new("a.ts"), &[]));
        assert!(is_source_file(Path::new("b.jsx"), &[]));
        assert!(is_source_file(Path::new("c.mts"), &[]));
        assert!(!is_source_file(Path::new("d.rs"), &[]));
        assert!(!is_source_file(Path::new("noext"), &[]));
    }

    #[test]
    fn test_is_source_file_custom_extension() {
        let custom = vec!["vue".to_string(), ".svelte".to_string()];
        assert!(is_source_file(Path::new("a.vue"), &custom));
        assert!(is_source_file(Path::new("a.svelte"), &custom));
        assert!(!is_source_file(Path::new("a.py"), &custom));
    }

    #[test]
    fn test_is_excluded_by_component() {
        let patterns = vec![Pattern::new("node_modules").unwrap()];
        assert!(is_excluded(
            Path::new("src/node_modules/a.ts"),
            &patterns
        ));
        assert!(!is_excluded(Path::new("src/lib/a.ts"), &patterns));
    }

    #[test]
    fn test_is_excluded_by_file_pattern() {
        let patterns = vec![Pattern::new("*.d.ts").unwrap()];
        assert!(is_excluded(Path::new("src/types.d.ts"), &patterns));
        assert!(!is_excluded(Path::new("src/types.ts"), &patterns));
    }

    #[test]
    fn test_apply_overrides_off_wins() {
        let mut config = Config::default();
        let overrides = DirectiveOverrides {
            off: true,
            indent: Some(2),
            quote: None,
            group_comments: None,
        };
        assert!(apply_overrides(&mut config, &overrides));
        // indent untouched when off
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_apply_overrides_values() {
        let mut config = Config::default();
        let overrides = DirectiveOverrides {
            off: false,
            indent: Some(2),
            quote: Some(QuoteStyle::Double),
            group_comments: Some(false),
        };
        assert!(!apply_overrides(&mut config, &overrides));
        assert_eq!(config.indent, 2);
        assert_eq!(config.quote, QuoteStyle::Double);
        assert!(!config.group_comments);
    }
}
