use serde::{Deserialize, Serialize};

/// Prompt shown ahead of every echoed command.
pub const PROMPT: &str = "guest@codemate:~$";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineKind {
    Command,
    Output,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn command<S: Into<String>>(s: S) -> Self {
        Self {
            kind: LineKind::Command,
            text: s.into(),
        }
    }
    pub fn output<S: Into<String>>(s: S) -> Self {
        Self {
            kind: LineKind::Output,
            text: s.into(),
        }
    }
    pub fn error<S: Into<String>>(s: S) -> Self {
        Self {
            kind: LineKind::Error,
            text: s.into(),
        }
    }

    /// Markup for this line. `text` is always escaped, so a command like
    /// `<b>x</b>` shows up literally instead of being interpreted.
    pub fn to_html(&self) -> String {
        match self.kind {
            LineKind::Command => format!(
                "<div class=\"input-line\"><span class=\"prompt\">{}</span><span>{}</span></div>",
                PROMPT,
                escape_html(&self.text)
            ),
            LineKind::Output => format!(
                "<div class=\"output-line\">{}</div>",
                escape_html(&self.text)
            ),
            LineKind::Error => format!(
                "<div class=\"output-line error-line\">{}</div>",
                escape_html(&self.text)
            ),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Rendered lines, oldest first. Append-only apart from `clear`.
#[derive(Clone, Debug, Default)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.last()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Terminal transcript</title></head>\n<body>\n<div id=\"output-area\">\n",
        );
        for line in &self.lines {
            html.push_str(&line.to_html());
            html.push('\n');
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}
