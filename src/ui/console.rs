use crate::ui::palette::get_palette;
use anyhow::Result;
use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, BufRead, IsTerminal, Write};

const RULE_WIDTH: usize = 63;

/// Line-oriented operator console: prompts are read from `input`, normal
/// output goes to `out` and errors to `err`.
pub struct Console {
    input: Box<dyn BufRead>,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    color: bool,
}

impl Console {
    pub fn new(input: Box<dyn BufRead>, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            input,
            out,
            err,
            color: false,
        }
    }

    pub fn stdio() -> Self {
        let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        let mut console = Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        );
        console.color = color;
        console
    }

    fn styled(&mut self, to_err: bool, color: Color, bold: bool, text: &str) -> Result<()> {
        let use_color = self.color;
        let w = if to_err { &mut self.err } else { &mut self.out };
        if use_color {
            w.queue(SetForegroundColor(color))?;
            if bold {
                w.queue(SetAttribute(Attribute::Bold))?;
            }
            w.queue(Print(text))?;
            w.queue(SetAttribute(Attribute::Reset))?;
            w.queue(ResetColor)?;
        } else {
            w.write_all(text.as_bytes())?;
        }
        writeln!(w)?;
        w.flush()?;
        Ok(())
    }

    pub fn out(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        self.out("")
    }

    pub fn info(&mut self, text: &str) -> Result<()> {
        self.styled(false, get_palette().info, true, text)
    }

    pub fn success(&mut self, text: &str) -> Result<()> {
        self.styled(false, get_palette().success, false, text)
    }

    pub fn err(&mut self, text: &str) -> Result<()> {
        self.styled(true, get_palette().error, false, text)
    }

    pub fn hr(&mut self) -> Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        self.styled(false, get_palette().rule, false, &rule)
    }

    /// Writes text without a line break, to be completed by `overwrite`.
    pub fn inline(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Replaces the current line with `text`.
    pub fn overwrite(&mut self, text: &str) -> Result<()> {
        if self.color {
            self.out.queue(MoveToColumn(0))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
        } else {
            self.out.write_all(b"\r")?;
        }
        self.out(text)
    }

    /// `[n] text` list row with the index highlighted.
    pub fn index_row(&mut self, index: usize, text: &str) -> Result<()> {
        if self.color {
            self.out.queue(SetForegroundColor(get_palette().index))?;
            self.out.queue(Print(format!("[{index}]")))?;
            self.out.queue(ResetColor)?;
        } else {
            write!(self.out, "[{index}]")?;
        }
        self.out(&format!(" {text}"))
    }

    /// Prompts and reads one line. Returns `None` once input is exhausted;
    /// answers are trimmed.
    pub fn ask(&mut self, prompt: &str, options: &[&str]) -> Result<Option<String>> {
        let mut text = prompt.to_string();
        if !options.is_empty() {
            text.push_str(&format!(" ({})", options.join("/")));
        }
        let prompt_color = get_palette().prompt;
        if self.color {
            self.out.queue(SetForegroundColor(prompt_color))?;
            self.out.queue(Print(text))?;
            self.out.queue(ResetColor)?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        write!(self.out, "\n> ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::scripted;

    #[test]
    fn ask_trims_answers_and_reports_end_of_input() {
        let (mut console, out, _) = scripted("  Foo \n");
        assert_eq!(
            console.ask("Name?", &["I", "Q"]).unwrap().as_deref(),
            Some("Foo")
        );
        assert_eq!(console.ask("Again?", &[]).unwrap(), None);
        let text = out.contents();
        assert!(text.contains("Name? (I/Q)\n> "));
        assert!(text.contains("Again?\n> "));
    }

    #[test]
    fn errors_go_to_the_error_stream() {
        let (mut console, out, err) = scripted("");
        console.err("Invalid option").unwrap();
        console.index_row(2, "Nice Theme").unwrap();
        assert_eq!(err.contents(), "Invalid option\n");
        assert_eq!(out.contents(), "[2] Nice Theme\n");
    }
}
