use ratatui::style::Color;

pub struct Theme {
    pub prompt: Color,
    pub command: Color,
    pub output: Color,
    pub error: Color,
    pub border: Color,
    pub input_border: Color,
    pub hint: Color,
}

pub const THEME: Theme = Theme {
    prompt: Color::Green,
    command: Color::White,
    output: Color::Gray,
    error: Color::LightRed,
    border: Color::DarkGray,
    input_border: Color::Cyan,
    hint: Color::DarkGray,
};
