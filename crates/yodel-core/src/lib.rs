//! yodel-core: grab the audio of a web video as a trimmed, tagged MP3

pub mod config;
pub mod error;
pub mod extractor;
pub mod job;
pub mod output;
pub mod pipeline;
mod process;
pub mod scrape;
pub mod title;
pub mod transcoder;

pub use config::{Config, ToolPaths};
pub use error::{Result, YodelError};
pub use job::AudioJob;
pub use title::{guess_title, TitleGuess};
