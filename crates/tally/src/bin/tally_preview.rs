//! tally-preview - Compute totals for a preview document.

fn main() -> std::process::ExitCode {
    tally::cmd::preview::main()
}
