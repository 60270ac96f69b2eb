use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use codefence::{
    CODEFENCE_CSS, CodeBlock, DualTheme, HighlightConfig, PlainTokenizer, Rendered,
    SyntaxHighlighter, Theme,
};

/// Renders the code read from stdin as a fenced code block.
#[derive(Parser, Debug)]
#[command(name = "codefence-cli", version)]
struct Cli {
    /// The fence info string, eg `rust:line-numbers{1-3}[example]`
    info: Option<String>,

    /// Path to the VSCode JSON theme used for light mode
    #[arg(long, required_unless_present = "css")]
    light: Option<PathBuf>,

    /// Path to the VSCode JSON theme used for dark mode
    #[arg(long, required_unless_present = "css")]
    dark: Option<PathBuf>,

    /// Number lines of blocks that don't say otherwise
    #[arg(long)]
    line_numbers_by_default: bool,

    /// Only accept these languages, any language is accepted by default
    #[arg(long = "language-alias")]
    language_aliases: Vec<String>,

    /// Print the stylesheet and exit
    #[arg(long)]
    css: bool,
}

fn load_theme(path: &Path) -> Result<Theme, codefence::Error> {
    let content = fs::read_to_string(path)?;
    Theme::from_json(&content)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.css {
        print!("{CODEFENCE_CSS}");
        return Ok(());
    }

    let (Some(light), Some(dark)) = (&cli.light, &cli.dark) else {
        return Err("both --light and --dark themes are required".into());
    };
    let stylist = DualTheme {
        light: load_theme(light)?,
        dark: load_theme(dark)?,
    };

    let tokenizer = if cli.language_aliases.is_empty() {
        PlainTokenizer::new()
    } else {
        let aliases: Vec<&str> = cli.language_aliases.iter().map(|a| a.as_str()).collect();
        PlainTokenizer::with_aliases(&aliases)
    };

    let config = HighlightConfig::default().line_numbers_by_default(cli.line_numbers_by_default);
    let mut highlighter = SyntaxHighlighter::new(&tokenizer, &stylist, config);

    let mut code = String::new();
    io::stdin().read_to_string(&mut code)?;
    let mut block = CodeBlock::fenced(cli.info.as_deref().unwrap_or_default(), &code);

    let mut html = String::new();
    if let Rendered::Fallback(reason) = highlighter.render(&mut block, &mut html)? {
        eprintln!("Rendered as plain text: {reason}");
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{html}")?;
    Ok(())
}
