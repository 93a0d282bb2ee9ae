//! benchdelta CLI entry point.

fn main() {
    if let Err(e) = benchdelta_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
