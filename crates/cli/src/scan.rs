//! The `scan`, `rules` and `tokens` commands.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{RulesArgs, ScanArgs, TokensArgs};
use crate::config::{load_config, Config};
use crate::output::{self, Format};
use crate::{default_excludes, is_excluded, parse_exclude, ui};

use engine::{Analyzer, Diagnostic, GlobalOverride, NonceVerification};
use ir::{FileTokens, Region, Token};
use loader::{visit, Settings};
use parsers::ParserMetrics;
use rayon::prelude::*;

fn init_tracing(quiet: bool, debug: bool) {
    let level = if quiet {
        LevelFilter::OFF
    } else if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `--settings` wins over `[scan] settings` in the user config. Without
/// either the built-in defaults apply.
fn resolve_settings(explicit: Option<&Path>, cfg: &Config) -> Result<Settings> {
    let path = explicit.map(Path::to_path_buf).or_else(|| cfg.settings_path());
    match path {
        Some(path) => {
            let settings = loader::load_settings(&path)?;
            info!(path = %path.display(), "Settings loaded");
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

/// Path under which a discovered file is reported: the scan argument
/// joined with the file's location below the scanned root.
fn display_path(arg: &Path, root: &Path, found: &Path) -> PathBuf {
    match found.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => arg.join(rel),
        _ => arg.to_path_buf(),
    }
}

fn discover(args: &ScanArgs, cfg: &Config) -> Result<Vec<PathBuf>> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("failed to access {}", args.path.display()))?;
    let mut patterns = args.exclude.clone();
    for pat in &cfg.scan.exclude {
        patterns.push(parse_exclude(pat).map_err(anyhow::Error::msg)?);
    }
    if !args.no_default_exclude {
        patterns.extend(default_excludes());
    }
    let mut files = Vec::new();
    visit(
        &root,
        &|p| is_excluded(p, &patterns, args.max_file_size),
        &mut |p| {
            if parsers::detect_type(p).is_some() {
                files.push(display_path(&args.path, &root, p));
            }
            Ok(())
        },
    )?;
    debug!(files = files.len(), excludes = patterns.len(), "Files queued");
    Ok(files)
}

pub fn run_scan(args: ScanArgs) -> Result<()> {
    init_tracing(args.quiet, args.debug);
    let user_cfg = load_config().context("failed to load configuration")?;
    let settings = resolve_settings(args.settings.as_deref(), &user_cfg)?;
    let analyzer = Analyzer::from_settings(&settings)?;
    let rules: Vec<String> = analyzer.rule_ids().map(str::to_string).collect();
    info!(rules = %rules.join(", "), "Rules enabled");

    if args.format == Format::Text && !args.quiet {
        ui::print_header();
    }

    let start = Instant::now();
    let files = discover(&args, &user_cfg)?;
    info!(target = %args.path.display(), files = files.len(), "Scan started");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .context("failed to build thread pool")?;
    let (parsed, metrics, failed_files) = pool.install(|| parse_all(&files));
    let diagnostics = pool.install(|| analyzer.analyze_files(&parsed));
    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(
        files_parsed = metrics.files_parsed,
        parse_errors = metrics.parse_errors,
        "Parser metrics"
    );

    let scan_info = reporters::ScanInfo {
        rules,
        files_analyzed: files.len(),
        duration_ms,
        failed_files,
    };
    let info_opt = (!args.quiet).then_some(&scan_info);
    output::print_diagnostics(&diagnostics, args.format, info_opt)?;
    info!(diagnostics = diagnostics.len(), duration_ms, "Scan completed");

    if let Some(thr) = args.fail_on {
        if exceeds(&diagnostics, thr) {
            std::process::exit(1);
        }
    }
    Ok(())
}

fn exceeds(diagnostics: &[Diagnostic], threshold: loader::Severity) -> bool {
    diagnostics.iter().any(|d| d.severity >= threshold)
}

/// Parses every file in parallel. Files that can't be read or tokenized
/// are logged and left out of the analysis.
fn parse_all(files: &[PathBuf]) -> (Vec<FileTokens>, ParserMetrics, usize) {
    let results: Vec<(ParserMetrics, Result<Option<FileTokens>>)> = files
        .par_iter()
        .map(|path| {
            let mut m = ParserMetrics::default();
            let res = parsers::parse_file(path, Some(&mut m));
            (m, res)
        })
        .collect();

    let mut metrics = ParserMetrics::default();
    let mut parsed = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (path, (m, res)) in files.iter().zip(results) {
        metrics.files_parsed += m.files_parsed;
        metrics.parse_errors += m.parse_errors;
        match res {
            Ok(Some(file)) => parsed.push(file),
            Ok(None) => {}
            Err(e) => {
                warn!(file = %path.display(), "Skipping file: {e:#}");
                failed += 1;
            }
        }
    }
    (parsed, metrics, failed)
}

pub fn list_rules(args: RulesArgs) -> Result<()> {
    init_tracing(false, false);
    let user_cfg = load_config().context("failed to load configuration")?;
    let settings = resolve_settings(args.settings.as_deref(), &user_cfg)?;
    let rows = [
        (
            NonceVerification::ID,
            NonceVerification::SNIFF_CODE,
            NonceVerification::TAG,
            settings.nonce_verification.enabled,
        ),
        (
            GlobalOverride::ID,
            GlobalOverride::SNIFF_CODE,
            GlobalOverride::TAG,
            settings.global_override.enabled,
        ),
    ];
    println!("{:<24} {:<40} {:<10} Status", "Rule", "Sniff", "Marker");
    for (id, sniff, tag, enabled) in rows {
        let status = if enabled { "enabled" } else { "disabled" };
        println!("{id:<24} {sniff:<40} {tag:<10} {status}");
    }
    Ok(())
}

#[derive(Serialize)]
struct TokenDump<'a> {
    file: &'a str,
    tokens: &'a [Token],
    #[serde(skip_serializing_if = "Option::is_none")]
    regions: Option<&'a [Region]>,
}

pub fn print_tokens(args: TokensArgs) -> Result<()> {
    init_tracing(false, false);
    let file = match parsers::parse_file(&args.path, None) {
        Ok(Some(file)) => file,
        Ok(None) => {
            ui::print_failure("TOKENS", "only PHP files can be tokenized");
            bail!("unsupported file type: {}", args.path.display());
        }
        Err(e) => return Err(e),
    };
    let dump = TokenDump {
        file: &file.file_path,
        tokens: &file.tokens,
        regions: args.regions.then(|| file.regions()),
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    ui::print_status("TOKENS", &format!("{} tokens", file.len()));
    Ok(())
}
