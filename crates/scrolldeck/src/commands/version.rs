use colored::Colorize;

/// Print name, version and a one-line description.
pub fn run() {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
