//! Serial notifications printed around a run.
//!
//! These go to stdout alongside the progress table, so they are only ever
//! printed before the table begins or after it ends.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// Announce the start of a run.
pub fn print_begin(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Announce the end of a run.
pub fn print_end(text: &str) {
    if is_color_disabled() {
        println!("[DONE] {text}");
    } else {
        println!("{} {text}", style("[DONE]").green().bold());
    }
}

/// Print a one-off notification.
pub fn print_notification(text: &str) {
    if is_color_disabled() {
        println!("[INFO] {text}");
    } else {
        println!("{} {text}", style("[INFO]").blue().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_functions_do_not_panic() {
        print_begin("Fitting 3 groups");
        print_notification("model: ses");
        print_end("3 groups in 1.2s");
        print_error("Something went wrong");
    }

    #[test]
    fn print_functions_with_empty_and_unicode_text() {
        print_begin("");
        print_notification("Prévision \u{2192} terminée");
        print_end(&"A".repeat(500));
    }
}
