use shared::domain::DisplayState;

const FACE_WIDTH: usize = 22;

pub fn backlight_color(state: &DisplayState) -> &'static str {
    if state.backlight_on {
        "cyan"
    } else {
        "white"
    }
}

/// Text rendering of the face: date line over the time, lit or not.
pub fn render_face(state: &DisplayState) -> String {
    let border = format!("+{}+", "-".repeat(FACE_WIDTH));
    let fill = if state.backlight_on { '*' } else { ' ' };
    let line = |text: &str| {
        let pad = FACE_WIDTH.saturating_sub(text.chars().count());
        let left = pad / 2;
        format!(
            "|{}{}{}|",
            fill.to_string().repeat(left),
            text,
            fill.to_string().repeat(pad - left)
        )
    };

    [
        border.clone(),
        line(&state.date),
        line(&state.time),
        line(&format!("[{}]", backlight_color(state))),
        border,
    ]
    .join("\n")
}
