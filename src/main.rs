use std::process::ExitCode;

fn main() -> ExitCode {
    scenesweep::app::startup::startup()
}
