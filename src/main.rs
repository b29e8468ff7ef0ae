//! dito CLI binary
//!
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() prints all output, errors included
    if let Err(code) = dito::cli::run() {
        std::process::exit(code.as_i32());
    }
}
