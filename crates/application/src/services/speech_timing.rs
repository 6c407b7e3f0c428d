//! Speaking-time estimates and speed selection

use domain::DialogueLine;

/// Average characters per spoken word
pub const CHARS_PER_WORD: f64 = 5.5;
/// Average speaking rate
pub const WORDS_PER_MINUTE: f64 = 160.0;
/// Slowest speed the podcast is allowed to use
pub const MIN_SPEECH_SPEED: f32 = 0.8;
/// Fastest speed the podcast is allowed to use
pub const MAX_SPEECH_SPEED: f32 = 1.2;
/// Characters shown when a line is logged
pub const DISPLAY_CHARS: usize = 50;

/// Estimated speaking time of `text` in seconds at normal speed
///
/// Spaces, tabs and line breaks do not count towards the length.
#[must_use]
pub fn estimate_duration_secs(text: &str) -> f64 {
    let chars = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\t' | '\r'))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let chars = chars as f64;
    let words = chars / CHARS_PER_WORD;
    words / WORDS_PER_MINUTE * 60.0
}

/// Estimated speaking time of a whole script in seconds
#[must_use]
pub fn estimate_total_secs(lines: &[DialogueLine]) -> f64 {
    lines
        .iter()
        .map(|line| estimate_duration_secs(&line.text))
        .sum()
}

/// Speed that stretches or squeezes the script towards `target_minutes`
///
/// The result is clamped so the voices never sound unnatural. A script with
/// no estimated length is spoken at normal speed.
#[must_use]
pub fn speech_speed(estimated_secs: f64, target_minutes: u32) -> f32 {
    if estimated_secs <= 0.0 {
        return 1.0;
    }

    let target_secs = f64::from(target_minutes) * 60.0;
    #[allow(clippy::cast_possible_truncation)]
    let speed = (target_secs / estimated_secs) as f32;
    speed.clamp(MIN_SPEECH_SPEED, MAX_SPEECH_SPEED)
}

/// First `DISPLAY_CHARS` characters of `text` for log output
#[must_use]
pub fn truncate_for_display(text: &str) -> String {
    match text.char_indices().nth(DISPLAY_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
