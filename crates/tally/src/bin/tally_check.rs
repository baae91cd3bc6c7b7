//! tally-check - Validate a preview document.

fn main() -> std::process::ExitCode {
    tally::cmd::check::main()
}
