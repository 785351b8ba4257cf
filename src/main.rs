//! WCAG Audit CLI

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;
use wcag_audit::{
    get_reporter, AuditError, Auditor, Config, DocumentSnapshot, OutputFormat, Reporter,
    RuleReport,
};

#[derive(Parser)]
#[command(name = "wcag-audit")]
#[command(about = "WCAG accessibility audit for HTML files")]
#[command(version)]
struct Cli {
    /// Files or directories to audit
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(long, short = 'f', default_value = "text")]
    format: String,

    /// Write annotated copies of audited files into this directory
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print each violation as it is found
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format: OutputFormat = match cli.format.parse() {
        Ok(format) => format,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let files = collect_files(&cli.paths);
    if files.is_empty() {
        eprintln!("error: no HTML files found");
        return ExitCode::from(2);
    }

    if let Some(dir) = &cli.annotate {
        if let Err(err) = std::fs::create_dir_all(dir) {
            eprintln!("error: cannot create {}: {err}", dir.display());
            return ExitCode::from(2);
        }
    }

    let colored = !cli.no_color && matches!(format, OutputFormat::Text) && atty::is(atty::Stream::Stdout);
    let reporter = get_reporter(format, colored);
    let auditor = Auditor::new(config);

    let mut total = 0;
    let mut failed = false;
    for file in &files {
        let html = match read_document(file) {
            Ok(html) => html,
            Err(err) => {
                eprintln!("error: {err}");
                failed = true;
                continue;
            }
        };

        let doc = DocumentSnapshot::parse(&html);
        let outcome = auditor.run(&doc);
        total += outcome.total_violations();

        println!("== {}", file.display());
        print!(
            "{}",
            render_output(
                reporter.as_ref(),
                &outcome.reports,
                cli.verbose,
                auditor.config().show_summary,
            )
        );

        if let Some(dir) = &cli.annotate {
            let annotated = outcome.highlighter.annotate(&doc);
            let target = annotate_path(dir, file);
            if let Err(err) = std::fs::write(&target, annotated) {
                eprintln!("error: cannot write {}: {err}", target.display());
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(2)
    } else if total > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Stdout body for one audited file. The per-rule summary only renders
/// when `showSummary` is enabled in config.
fn render_output(
    reporter: &dyn Reporter,
    reports: &[RuleReport],
    verbose: bool,
    show_summary: bool,
) -> String {
    let mut out = String::new();
    if verbose {
        for violation in reports.iter().flat_map(|r| &r.violations) {
            out.push_str(&reporter.format_violation(violation));
            out.push('\n');
        }
    }
    if show_summary {
        out.push_str(&reporter.format(reports));
    }
    out
}

fn load_config(cli: &Cli) -> Result<Config, AuditError> {
    if let Some(path) = &cli.config {
        return Config::load(path).map_err(|e| AuditError::Config(e.to_string()));
    }
    let cwd = std::env::current_dir().map_err(|source| AuditError::Io {
        path: ".".to_string(),
        source,
    })?;
    Ok(Config::find_and_load(&cwd).unwrap_or_default())
}

fn read_document(file: &Path) -> Result<String, AuditError> {
    std::fs::read_to_string(file).map_err(|source| AuditError::Io {
        path: file.display().to_string(),
        source,
    })
}

fn is_html(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    )
}

fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                if is_html(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files
}

fn annotate_path(dir: &Path, file: &Path) -> PathBuf {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.html".to_string());
    dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reports() -> Vec<RuleReport> {
        let doc = DocumentSnapshot::parse("<img src='a.png'><main>x</main>");
        Auditor::new(Config::default()).run(&doc).reports
    }

    #[test]
    fn test_summary_suppressed_when_disabled() {
        let reporter = get_reporter(OutputFormat::Text, false);
        let out = render_output(reporter.as_ref(), &reports(), false, false);
        assert!(out.is_empty());
    }

    #[test]
    fn test_summary_rendered_when_enabled() {
        let reporter = get_reporter(OutputFormat::Text, false);
        let out = render_output(reporter.as_ref(), &reports(), false, true);
        assert!(out.contains("Compliance Summary"));
    }

    #[test]
    fn test_verbose_streams_violations_even_without_summary() {
        let reporter = get_reporter(OutputFormat::Text, false);
        let out = render_output(reporter.as_ref(), &reports(), true, false);
        assert!(out.contains("WCAG-1.1.1"));
        assert!(!out.contains("Compliance Summary"));
    }

    #[test]
    fn test_read_document_missing_file_is_io_error() {
        let err = read_document(Path::new("/nonexistent/page.html")).unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/page.html"));
    }

    #[test]
    fn test_is_html_extensions() {
        assert!(is_html(Path::new("index.html")));
        assert!(is_html(Path::new("page.htm")));
        assert!(!is_html(Path::new("style.css")));
    }
}
