use clap::Parser;
use colored::Colorize;
use dirindex::{DirectoryNode, IndexOptions, render, stats};
use log::LevelFilter;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Index a directory tree by size, modification time and content hash", long_about = None)]
struct Args {
    /// Directory to index
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Compute a SHA-256 digest for every file
    #[arg(long, short = 'H')]
    hash: bool,

    /// Only list files directly inside PATH
    #[arg(long, short = 'f')]
    flat: bool,

    /// Print index statistics after the listing
    #[arg(long, short = 's')]
    stats: bool,

    /// Print groups of files with identical content (implies --hash)
    #[arg(long, short = 'd')]
    duplicates: bool,

    /// Print the files whose digest matches (implies --hash)
    #[arg(long, short = 'g', value_name = "DIGEST")]
    grep: Option<String>,

    /// Log every indexed directory
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{} {e}", "Error:".red());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Info);
    }
    builder.init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let options = IndexOptions {
        with_digest: args.hash || args.duplicates || args.grep.is_some(),
    };

    let root = if args.flat {
        flat_index(&args.path, &options)?
    } else {
        dirindex::build_index_with(&args.path, &options)?
    };

    if let Some(digest) = &args.grep {
        let found = stats::find_by_digest(&root, digest);
        if found.is_empty() {
            println!("No files found with digest {digest}");
        } else {
            println!("Found {} file(s) with digest {}:", found.len(), digest.cyan());
            for path in found {
                println!("{}", path.display());
            }
        }
        return Ok(());
    }

    if args.duplicates {
        stats::print_duplicates(&stats::find_duplicates(&root));
        return Ok(());
    }

    {
        let mut out = BufWriter::new(io::stdout().lock());
        for line in render(&root) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
    }

    if args.stats {
        println!();
        stats::print_stats_table(&stats::calculate_stats(&root));
    }

    Ok(())
}

/// A childless node holding only the files directly inside `path`.
fn flat_index(path: &Path, options: &IndexOptions) -> Result<DirectoryNode, Box<dyn std::error::Error>> {
    let path = std::path::absolute(path)?;
    let files = dirindex::list_files(&path, options.with_digest)?;
    Ok(DirectoryNode::new(path, files))
}
