/// Accepts `#RRGGBB` display colors.
pub fn is_valid_color(color: &str) -> bool {
	let Some(hex) = color.strip_prefix('#') else { return false };

	hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit())
}

/// Canonical lowercase form of a valid color, `None` otherwise.
pub fn normalize_color(color: &str) -> Option<String> {
	let trimmed = color.trim();

	is_valid_color(trimmed).then(|| trimmed.to_ascii_lowercase())
}
