//! hz – CLI for Huffman compression.
//!
//! Works similar to gzip:
//!   hz file.txt          → compress to file.txt.hz (removes original)
//!   hz -d file.txt.hz    → decompress to file.txt (removes original)
//!   hz -c file.txt       → compress to stdout
//!   hz -k file.txt       → keep original after compress
//!   cat file | hz -c     → compress stdin to stdout
//!   cat file | hz -dc    → decompress stdin to stdout
use std::env;
use std::fs;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use hz::codec::{compress_stream, decompress_stream, CompressOptions};
use log::{LevelFilter, Log, Metadata, Record};

fn usage() {
    eprintln!("hz - lossless Huffman compression tool");
    eprintln!();
    eprintln!("Usage: hz [OPTIONS] [FILE]...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --decompress   Decompress mode");
    eprintln!("  -c, --stdout       Write to stdout (don't remove original)");
    eprintln!("  -k, --keep         Keep original file");
    eprintln!("  -f, --force        Overwrite existing output files");
    eprintln!("  -q, --quiet        Only report errors");
    eprintln!("  -v, --verbose      Verbose output (repeat for trace logging)");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("If no FILE is given, reads from stdin and writes to stdout.");
    eprintln!("Compressed files use the .hz extension.");
}

/// Writes log records to stderr as `hz: level: message`.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "hz: {}: {}",
                record.level().as_str().to_lowercase(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(opts: &Opts) {
    let level = match (opts.quiet, opts.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    // Fails only when a logger is already installed
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[derive(Debug, Default)]
struct Opts {
    decompress: bool,
    to_stdout: bool,
    keep: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    files: Vec<String>,
}

fn parse_args() -> Opts {
    let mut opts = Opts::default();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-d" | "--decompress" => opts.decompress = true,
            "-c" | "--stdout" | "--to-stdout" => opts.to_stdout = true,
            "-k" | "--keep" => opts.keep = true,
            "-f" | "--force" => opts.force = true,
            "-q" | "--quiet" => opts.quiet = true,
            "-v" | "--verbose" => opts.verbose += 1,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            // Handle combined short flags like -dc, -kv, etc.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'c' => opts.to_stdout = true,
                        'k' => opts.keep = true,
                        'f' => opts.force = true,
                        'q' => opts.quiet = true,
                        'v' => opts.verbose += 1,
                        _ => {
                            eprintln!("hz: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            s if s.starts_with("--") => {
                eprintln!("hz: unknown option '{s}'");
                process::exit(1);
            }
            _ => opts.files.push(arg),
        }
    }

    opts
}

/// Determine the output filename for compression.
fn compress_output_path(input: &str) -> PathBuf {
    PathBuf::from(format!("{input}.hz"))
}

/// Determine the output filename for decompression.
fn decompress_output_path(input: &str) -> Option<PathBuf> {
    let path = Path::new(input);
    match path.extension().and_then(|e| e.to_str()) {
        Some("hz") => Some(path.with_extension("")),
        _ => None,
    }
}

fn create_output(opts: &Opts, out_path: &Path) -> Result<fs::File, String> {
    let out_str = out_path.display();
    if out_path.exists() && !opts.force {
        return Err(format!("{out_str} already exists; use -f to overwrite"));
    }
    fs::File::create(out_path).map_err(|e| format!("{out_str}: {e}"))
}

fn process_compress(opts: &Opts, path: &str, options: &CompressOptions) -> Result<(), String> {
    // Files are seekable, so both passes read straight from disk
    let input = fs::File::open(path).map_err(|e| format!("{path}: {e}"))?;

    if opts.to_stdout {
        let output = BufWriter::new(io::stdout().lock());
        let (mut output, _) =
            compress_stream(input, output, options).map_err(|e| format!("{path}: {e}"))?;
        return output.flush().map_err(|e| format!("stdout: {e}"));
    }

    let out_path = compress_output_path(path);
    let output = create_output(opts, &out_path)?;
    let stats = match compress_stream(input, output, options) {
        Ok((_, stats)) => stats,
        Err(e) => {
            let _ = fs::remove_file(&out_path);
            return Err(format!("{path}: {e}"));
        }
    };

    if opts.verbose > 0 {
        let in_size = stats.input_bytes;
        let out_size = stats.output_bytes();
        let ratio = if in_size > 0 {
            (out_size as f64 / in_size as f64) * 100.0
        } else {
            0.0
        };
        eprintln!(
            "{path}: {ratio:.1}% ({in_size} → {out_size} bytes, {} symbols)",
            stats.symbols
        );
    }

    if !opts.keep {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }
    Ok(())
}

fn process_decompress(opts: &Opts, path: &str) -> Result<(), String> {
    let input = fs::File::open(path).map_err(|e| format!("{path}: {e}"))?;

    if opts.to_stdout {
        let output = BufWriter::new(io::stdout().lock());
        let (mut output, _) =
            decompress_stream(input, output).map_err(|e| format!("{path}: {e}"))?;
        return output.flush().map_err(|e| format!("stdout: {e}"));
    }

    let out_path = decompress_output_path(path)
        .ok_or_else(|| format!("{path}: unknown suffix -- ignored"))?;
    let output = create_output(opts, &out_path)?;
    let produced = match decompress_stream(input, output) {
        Ok((_, produced)) => produced,
        Err(e) => {
            // Output up to the failure is meaningless
            let _ = fs::remove_file(&out_path);
            return Err(format!("{path}: {e}"));
        }
    };

    if opts.verbose > 0 {
        let in_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        eprintln!("{path}: {in_size} → {produced} bytes");
    }

    if !opts.keep {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }
    Ok(())
}

fn process_stdin_stdout(opts: &Opts, options: &CompressOptions) -> Result<(), String> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    if opts.decompress {
        let (mut output, _) =
            decompress_stream(stdin.lock(), output).map_err(|e| format!("stdin: {e}"))?;
        output.flush().map_err(|e| format!("stdout: {e}"))?;
    } else {
        // stdin cannot be rewound; buffer it for the second pass
        let mut data = Vec::new();
        stdin
            .lock()
            .read_to_end(&mut data)
            .map_err(|e| format!("stdin: {e}"))?;
        let (mut output, _) = compress_stream(Cursor::new(data), output, options)
            .map_err(|e| format!("stdin: {e}"))?;
        output.flush().map_err(|e| format!("stdout: {e}"))?;
    }

    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    init_logging(&opts);
    let options = CompressOptions::default();

    if opts.files.is_empty() {
        if let Err(e) = process_stdin_stdout(&opts, &options) {
            eprintln!("hz: {e}");
            return Err(());
        }
        return Ok(());
    }

    let mut had_error = false;
    for path in &opts.files {
        let result = if path == "-" {
            process_stdin_stdout(&opts, &options)
        } else if opts.decompress {
            process_decompress(&opts, path)
        } else {
            process_compress(&opts, path, &options)
        };

        if let Err(e) = result {
            eprintln!("hz: {e}");
            had_error = true;
        }
    }

    if had_error {
        Err(())
    } else {
        Ok(())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        assert_eq!(compress_output_path("a/b.txt"), PathBuf::from("a/b.txt.hz"));
        assert_eq!(
            decompress_output_path("a/b.txt.hz"),
            Some(PathBuf::from("a/b.txt"))
        );
        assert_eq!(decompress_output_path("a/b.txt"), None);
    }
}
