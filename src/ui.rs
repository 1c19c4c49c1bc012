use console::style;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Shown when the IDE workaround intentionally fails the first commit pass.
pub fn display_retry_instruction() {
    eprintln!(
        "{} Version and changelog updated. Commit again to include them.",
        style("⟳").cyan().bold()
    );
}
