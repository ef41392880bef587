//! uswds-render - Main Entry Point
//!
//! ```text
//! uswds-render <input.html> [--config <file.json>] [--css]
//! ```
//!
//! Parses the input, upgrades every `usa-*` element, runs one flush and
//! prints the resulting `<body>`. Logs go to stderr; set `RUST_LOG` to
//! override the configured filter.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;
use uswds_dom::serialize;
use uswds_elements::{ElementsConfig, Runtime};

#[derive(Debug, Default)]
struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    css: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut input = None;
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a file path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--css" => args.css = true,
            "-h" | "--help" => {
                println!("usage: uswds-render <input.html> [--config <file.json>] [--css]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}"),
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {extra}"),
        }
    }
    args.input = input.context("missing input file (usage: uswds-render <input.html> [--config <file.json>] [--css])")?;
    Ok(args)
}

fn init_logging(config: &ElementsConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => ElementsConfig::load(path)?,
        None => ElementsConfig::default(),
    };
    init_logging(&config);

    let html = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    print!("{}", render(&html, config, args.css)?);
    Ok(())
}

/// Body markup, followed by the scoped CSS when `css` is set
fn render(html: &str, config: ElementsConfig, css: bool) -> Result<String> {
    let document = uswds_html::parse(html).context("failed to parse input")?;

    let mut runtime = Runtime::uswds(document, config).context("failed to define bundled components")?;
    let report = runtime.flush().context("update cycle failed")?;
    // Diagnostics were already logged at their own level when recorded
    let diagnostics: usize = runtime.hosts().map(|h| h.diagnostics().len()).sum();
    tracing::info!(
        hosts = runtime.hosts().count(),
        connected = report.connected,
        updated = report.updated,
        diagnostics,
        "rendered"
    );

    let document = runtime.document();
    let mut out = serialize::outer_html(document.tree(), document.body());
    out.push('\n');
    if css {
        out.push_str(&format!("<style>\n{}\n</style>\n", document.to_css()));
    }
    Ok(out)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("uswds-render: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use uswds_elements::DiagnosticsMode;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_diagnostic_logged_once() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let config = ElementsConfig::default().with_diagnostics(DiagnosticsMode::Lenient);
        let out = tracing::subscriber::with_default(subscriber, || {
            render(r#"<usa-alert type="loud"><span slot="text">Hi</span></usa-alert>"#, config, false)
        })
        .unwrap();

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("loud").count(), 1, "{logs}");
        assert!(logs.contains("diagnostics=1"));
        assert!(out.contains("usa-alert--info"));
    }

    #[test]
    fn test_render_appends_css() {
        let out = render(
            r#"<usa-alert><span slot="heading">Heads up</span></usa-alert>"#,
            ElementsConfig::default(),
            true,
        )
        .unwrap();
        assert!(out.starts_with("<body>"));
        assert!(out.contains("> [slot=\"heading\"] { display: none; }"));
    }
}
