use std::io::{self, BufRead, Write};

/// Line-based prompts. Generic over the streams so tests can script answers.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line. EOF reads as empty.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Ask with an offered default; empty input takes the default.
    pub fn ask_or(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>> {
        let question = format!("{} (default '{}'): ", label, default.unwrap_or(""));
        let answer = self.ask(&question)?;
        if answer.is_empty() {
            Ok(default.map(str::to_string))
        } else {
            Ok(Some(answer))
        }
    }
}
