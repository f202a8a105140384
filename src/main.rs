//! log-tail - print a file's growth to stdout, following it across
//! truncation and rotation.
//!
//! Usage:
//!   log-tail app.log                  # follow from the beginning
//!   log-tail --from-end app.log       # only new content
//!   log-tail --eof-wait-ms 0 app.log  # stop as soon as the file disappears

use clap::Parser;
use log_tail::{TailOptions, TailReader, TailStream, Wakeup};
use std::io::SeekFrom;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Follow a file by name and copy everything appended to it to stdout.
#[derive(Parser)]
#[command(name = "log-tail", about = "Follow a file across truncation and rotation")]
struct Args {
    /// File to follow.
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Delay between metadata polls, in milliseconds.
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,

    /// How long the file may stay missing before exiting, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    eof_wait_ms: u64,

    /// Give up if no data arrives within this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Wake up on filesystem events instead of waiting a full poll interval.
    #[arg(long)]
    notify: bool,

    /// Start at the current end of the file.
    #[arg(long)]
    from_end: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut options = TailOptions::new()
        .poll_interval(Duration::from_millis(args.poll_ms))
        .eof_wait(Duration::from_millis(args.eof_wait_ms));
    if let Some(timeout_ms) = args.timeout_ms {
        options = options.timeout(Duration::from_millis(timeout_ms));
    }
    if args.notify {
        options = options.wakeup(Wakeup::Notify);
    }

    let mut reader = match TailReader::open(&args.path, options).await {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("log-tail: {}: {}", args.path.display(), e);
            process::exit(1);
        }
    };
    if args.from_end {
        if let Err(e) = reader.seek(SeekFrom::End(0)).await {
            eprintln!("log-tail: {}: {}", args.path.display(), e);
            process::exit(1);
        }
    }

    let mut input = TailStream::new(reader).into_async_read();
    let mut stdout = tokio::io::stdout();
    if let Err(e) = tokio::io::copy(&mut input, &mut stdout).await {
        eprintln!("log-tail: {}: {}", args.path.display(), e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(
            format!("log_tail={}", level)
                .parse()
                .unwrap_or_else(|_| LevelFilter::from_level(level).into()),
        );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
