//! xqdoc — render xqDoc comment blocks as XML.
//!
//! Each input holds one comment block, `(:~` through `:)`. Two modes:
//!
//! - **stdin mode**: `xqdoc < block.xqdoc` prints the XML to stdout
//! - **file mode**: `xqdoc -o out/ comments/*.xqdoc` writes one `.xml` per input

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xqdoc::{CommentParser, XmlTags};

/// Environment variable holding the log filter, e.g. `XQDOC_LOG=debug`.
const LOG_ENV: &str = "XQDOC_LOG";

#[derive(Parser)]
#[command(name = "xqdoc", about = "Convert xqDoc comment blocks into xqDoc XML")]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Namespace prefix for the generated elements, e.g. "xqdoc"
    #[arg(short = 'n', long)]
    namespace: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let tags = match cli.namespace {
        Some(ref prefix) => XmlTags::with_prefix(prefix.as_str()),
        None => XmlTags::new(),
    };
    let mut parser = CommentParser::with_tags(tags);

    if cli.files.is_empty() {
        return stdin_mode(&mut parser);
    }

    file_mode(&cli, &mut parser)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// stdin mode: read one comment block from stdin, write XML to stdout.
fn stdin_mode(parser: &mut CommentParser) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    parser.set_comment(input);
    let xml = parser.xml().context("failed to parse comment from stdin")?;
    println!("{}", xml);
    Ok(())
}

/// file mode: one comment block per file, one XML file per input.
fn file_mode(cli: &Cli, parser: &mut CommentParser) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for path in resolve_inputs(&cli.files)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        parser.clear();
        parser.set_comment(content);
        let xml = parser
            .xml()
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let out_path = output_dir.join(format!("{}.xml", derive_output_name(&path)));
        fs::write(&out_path, format!("{}\n", xml))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        tracing::debug!(input = %path.display(), output = %out_path.display(), "wrote comment");
    }

    Ok(())
}

/// Extension of comment block files picked up from a directory argument.
const INPUT_EXTENSION: &str = "xqdoc";

/// Resolve inputs: files are taken as-is, a directory contributes its
/// `*.xqdoc` files, anything else is a glob pattern. Sorted, no duplicates.
fn resolve_inputs(patterns: &[String]) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.insert(path.to_path_buf());
            continue;
        }

        let glob_pattern = if path.is_dir() {
            format!("{}/*.{}", glob::Pattern::escape(pattern), INPUT_EXTENSION)
        } else {
            pattern.clone()
        };
        let matched: Vec<PathBuf> = glob::glob(&glob_pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .flatten()
            .filter(|p| p.is_file())
            .collect();
        if matched.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matched);
    }
    Ok(files)
}

/// Output file name (without extension): "comments/add.xqdoc" → "add"
fn derive_output_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "comment".to_string())
}
