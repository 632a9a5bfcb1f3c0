//! Share-text composition for the post-win cast/share flow.

/// Message body for sharing a solve, with the app URL appended for
/// clipboard-style targets (hosts that take embeds separately can pass
/// the text alone).
pub fn share_text(time_secs: f64, app_url: &str) -> String {
    format!(
        "🧩 I solved the InflyncedPuzzle in {time_secs:.1} seconds!\n\nCan you beat my time? Try it now! 👇\n\n{app_url}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_time_to_one_decimal() {
        let text = share_text(9.87, "https://puzzle.example");
        assert!(text.contains("9.9 seconds"));
        assert!(text.ends_with("https://puzzle.example"));
    }
}
