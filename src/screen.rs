use log::warn;
use std::process::Command;

pub const TITLE: &str = "Image Grid Splitter";

fn clear_command() -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", "cls"]);
        command
    } else {
        Command::new("clear")
    }
}

/// Clears the terminal. Failures are logged and otherwise ignored.
pub fn clear_screen() {
    match clear_command().status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("clear screen exited with {}", status),
        Err(e) => warn!("failed to clear screen: {}", e),
    }
}
