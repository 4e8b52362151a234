use std::process::ExitCode;

fn main() -> ExitCode {
    unitool::cli::run_cli()
}
