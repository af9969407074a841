use anyhow::Result;
use env_logger::{Builder, Env};
use image_grid_splitter::{screen, Session};
use std::io;

fn main() -> Result<()> {
    let env = Env::default().default_filter_or("warn");
    Builder::from_env(env).format_timestamp_millis().init();

    screen::clear_screen();
    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(stdin.lock(), stdout.lock()).run()?;
    Ok(())
}
