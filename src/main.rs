//! Fishid CLI entry point.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = fishid::run() {
        eprintln!("error: {}", fishid::pipeline::error_chain(&e));
        std::process::exit(1);
    }
}
