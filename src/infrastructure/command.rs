//! Command templates for contact actions.

/// Placeholder replaced by the phone number.
pub const NUMBER_PLACEHOLDER: &str = "{number}";

/// Splits `template` on whitespace and substitutes the number into every
/// word. Returns `None` for a blank template.
///
/// Words are not shell-parsed, so a number can never inject extra
/// arguments.
///
/// ```
/// use zcontacts::infrastructure::command_line;
///
/// assert_eq!(
///     command_line("xdg-open tel:{number}", "+1 555"),
///     Some(vec!["xdg-open".to_string(), "tel:+1 555".to_string()])
/// );
/// ```
#[must_use]
pub fn command_line(template: &str, number: &str) -> Option<Vec<String>> {
    let words: Vec<String> = template
        .split_whitespace()
        .map(|word| word.replace(NUMBER_PLACEHOLDER, number))
        .collect();
    (!words.is_empty()).then_some(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_template_has_no_command() {
        assert_eq!(command_line("   ", "1"), None);
    }

    #[test]
    fn template_without_placeholder_is_used_verbatim() {
        assert_eq!(
            command_line("notify-send call", "1"),
            Some(vec!["notify-send".to_string(), "call".to_string()])
        );
    }

    #[test]
    fn placeholder_may_appear_more_than_once() {
        assert_eq!(
            command_line("sh-dial --to {number} --label {number}", "42"),
            Some(vec!["sh-dial", "--to", "42", "--label", "42"].into_iter().map(String::from).collect())
        );
    }
}
