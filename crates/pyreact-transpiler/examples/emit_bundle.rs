use pyreact_transpiler::transpile_source;
use std::fs;

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: emit_bundle <file.py>");
    let source = fs::read_to_string(&path).expect("Failed to read file");
    let result = transpile_source(&source);
    for error in &result.parse_errors {
        eprintln!("parse error: {error}");
    }
    for failure in result.bundle.failures() {
        eprintln!("failed: {failure}");
    }
    println!("{}", result.bundle.source());
}
