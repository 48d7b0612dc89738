//! Keyword context excerpts

/// Marker wrapped around every excerpt
const ELLIPSIS: &str = "...";

/// Extract the text surrounding the first occurrence of `keyword`.
///
/// `text` is expected to be lowercase already; the keyword is lowercased
/// here. `radius` counts characters on each side of the match, clipped to the
/// text bounds. The excerpt is trimmed and wrapped as `...<excerpt>...`.
/// Returns an empty string when the keyword does not occur.
pub fn extract(text: &str, keyword: &str, radius: usize) -> String {
    let keyword = keyword.to_lowercase();
    let index = match text.find(&keyword) {
        Some(i) => i,
        None => return String::new(),
    };

    let start = text[..index]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(index);

    let after = index + keyword.len();
    let end = text[after..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| after + i)
        .unwrap_or(text.len());

    format!("{ELLIPSIS}{}{ELLIPSIS}", text[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: usize = 150;

    #[test]
    fn should_return_empty_when_keyword_absent() {
        // Act
        let context = extract("nothing to see here", "ransomware", RADIUS);

        // Assert
        assert_eq!(context, "");
    }

    #[test]
    fn should_wrap_short_text_entirely() {
        // Act
        let context = extract("  new data breach posted  ", "Data Breach", RADIUS);

        // Assert
        assert_eq!(context, "...new data breach posted...");
    }

    #[test]
    fn should_clip_to_radius_on_both_sides() {
        // Arrange
        let text = format!("{}exploit{}", "a".repeat(200), "b".repeat(200));

        // Act
        let context = extract(&text, "exploit", 10);

        // Assert
        assert_eq!(context, format!("...{}exploit{}...", "a".repeat(10), "b".repeat(10)));
    }

    #[test]
    fn should_bound_excerpt_length() {
        // Arrange
        let text = format!("{} credentials {}", "x".repeat(500), "y".repeat(500));

        // Act
        let context = extract(&text, "credentials", RADIUS);

        // Assert
        assert!(context.starts_with("..."));
        assert!(context.ends_with("..."));
        assert!(context.contains("credentials"));
        assert!(context.chars().count() <= 2 * RADIUS + "credentials".len() + 6);
    }

    #[test]
    fn should_use_first_occurrence() {
        // Arrange
        let text = "first exploit here ---------- second exploit there";

        // Act
        let context = extract(text, "exploit", 6);

        // Assert
        assert_eq!(context, "...first exploit here...");
    }

    #[test]
    fn should_not_split_multibyte_characters() {
        // Arrange
        let text = "ééééé leaked database ü ü ü";

        // Act
        let context = extract(text, "leaked database", 3);

        // Assert
        assert_eq!(context, "...éé leaked database ü...");
    }

    #[test]
    fn should_be_deterministic() {
        // Arrange
        let text = "a ransomware group claims the attack";

        // Act
        let first = extract(text, "ransomware", 5);
        let second = extract(text, "ransomware", 5);

        // Assert
        assert_eq!(first, second);
    }
}
