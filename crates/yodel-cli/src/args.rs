use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yodel")]
#[command(author, version, about = "Grab the audio of a web video as a trimmed, tagged MP3")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video page URL (shorthand for `extract <URL>`; prompted for if omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    #[command(flatten)]
    pub options: ExtractOptions,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a clip from a single URL
    Extract {
        /// Video page URL
        url: Option<String>,

        #[command(flatten)]
        options: ExtractOptions,
    },

    /// Show the artist/title guessed from a page title
    Guess {
        /// Page title to parse
        #[arg(required_unless_present = "url")]
        title: Option<String>,

        /// Fetch the page title from this URL instead
        #[arg(long, conflicts_with = "title")]
        url: Option<String>,
    },

    /// Check that VLC and FFmpeg can be found
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Artist tag (skips the prompt)
    #[arg(short, long)]
    pub artist: Option<String>,

    /// Title tag (skips the prompt)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Clip start, as mm:ss or :ss
    #[arg(short, long, value_name = "TIME")]
    pub start: Option<String>,

    /// Clip end, as mm:ss or :ss
    #[arg(short, long, value_name = "TIME")]
    pub end: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Accept guessed defaults instead of prompting
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shorthand_url_with_options() {
        let cli = Cli::try_parse_from([
            "yodel",
            "https://www.youtube.com/watch?v=abc",
            "--start",
            "1:05",
            "--end",
            "3:05",
            "-y",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.url.as_deref(), Some("https://www.youtube.com/watch?v=abc"));
        assert_eq!(cli.options.start.as_deref(), Some("1:05"));
        assert_eq!(cli.options.end.as_deref(), Some("3:05"));
        assert!(cli.options.yes);
    }

    #[test]
    fn test_guess_requires_title_or_url() {
        assert!(Cli::try_parse_from(["yodel", "guess"]).is_err());
        assert!(Cli::try_parse_from(["yodel", "guess", "A - B"]).is_ok());
        assert!(Cli::try_parse_from(["yodel", "guess", "--url", "https://example.com"]).is_ok());
    }
}
