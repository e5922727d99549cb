//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// PyReact component compiler: class-based components to hook-based React.
#[derive(Debug, Parser)]
#[command(name = "pyreact-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input .py files or directories to scan
    #[arg(default_value = ".")]
    pub inputs: Vec<Utf8PathBuf>,

    /// Write the generated code to a file instead of stdout
    #[arg(long, short = 'o')]
    pub out: Option<Utf8PathBuf>,

    /// Emit a runnable HTML page instead of the raw bundle
    #[arg(long)]
    pub html: bool,

    /// Page title for --html
    #[arg(long, default_value = "PyReact App")]
    pub title: String,

    /// Components to mount in the HTML page (comma-separated; default all)
    #[arg(long, value_delimiter = ',')]
    pub components: Vec<String>,

    /// Failure report format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Recompile whenever an input file changes
    #[arg(long)]
    pub watch: bool,
}

/// Failure report format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report on stderr (default)
    #[default]
    Human,
    /// One JSON document on stdout
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["pyreact-rs"]);
        assert_eq!(args.inputs, vec![Utf8PathBuf::from(".")]);
        assert!(matches!(args.output, OutputFormat::Human));
        assert!(!args.html);
        assert!(!args.watch);
        assert!(args.out.is_none());
    }

    #[test]
    fn test_multiple_inputs() {
        let args = Args::parse_from(["pyreact-rs", "app.py", "widgets/"]);
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.inputs[0].as_str(), "app.py");
    }

    #[test]
    fn test_component_list_is_comma_separated() {
        let args = Args::parse_from(["pyreact-rs", "--components", "Counter,Greeting"]);
        assert_eq!(args.components, vec!["Counter", "Greeting"]);
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["pyreact-rs", "--output", "json"]);
        assert!(matches!(args.output, OutputFormat::Json));
    }

    #[test]
    fn test_html_flags() {
        let args = Args::parse_from(["pyreact-rs", "--html", "--title", "Demo"]);
        assert!(args.html);
        assert_eq!(args.title, "Demo");
    }

    #[test]
    fn test_watch_mode() {
        let args = Args::parse_from(["pyreact-rs", "--watch"]);
        assert!(args.watch);
    }
}
