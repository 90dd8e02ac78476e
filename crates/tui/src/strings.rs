// UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const INPUT_HINT: &str = "Type a command, Enter to run (try \"help\")";

// Block titles keep surrounding spaces for padding
pub const TITLE_OUTPUT: &str = " Terminal ";
pub const TITLE_INPUT: &str = " Command ";

pub const STICK_BOTTOM: &str = "Bottom";

pub fn build_stick_label(scroll: u16) -> String {
    if scroll == 0 {
        STICK_BOTTOM.to_string()
    } else {
        format!("+{} lines", scroll)
    }
}

pub fn pending_label(in_flight: usize) -> Option<String> {
    match in_flight {
        0 => None,
        1 => Some("running...".to_string()),
        n => Some(format!("running {}...", n)),
    }
}

// Segments are dropped from the right once `max_width` is reached.
pub fn build_status_line(
    endpoint: &str,
    stick: &str,
    history_len: usize,
    in_flight: usize,
    notice: Option<&str>,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    if let Some(n) = notice {
        segments.push(n.to_string());
    }
    if let Some(p) = pending_label(in_flight) {
        segments.push(p);
    }
    segments.push(format!("[{}]", stick));
    segments.push(format!("Hist:{}", history_len));
    segments.push(endpoint.to_string());
    let hints: [&str; 4] = [
        "Up/Down: history",
        "PgUp/PgDn: scroll",
        "Ctrl+S: save transcript",
        "Esc/Ctrl+C: quit",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let sep_w = UnicodeWidthStr::width(sep);
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw + if i == 0 { 0 } else { sep_w };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(seg);
        used += addw;
    }
    out
}
