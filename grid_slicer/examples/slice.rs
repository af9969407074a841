use env_logger::{Builder, Env};
use grid_slicer::{ensure_output_dir, GridSlicer};
use std::env;
use std::path::Path;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "debug")
    }
    let env = Env::default();
    Builder::from_env(env).format_timestamp_millis().init();
    let mut args = env::args().skip(1);
    let image_path = args.next().unwrap_or("assets/images/raw.jpg".to_string());
    let rows = args.next().and_then(|v| v.parse().ok()).unwrap_or(4);
    let cols = args.next().and_then(|v| v.parse().ok()).unwrap_or(5);

    let slicer = GridSlicer::from_path(&image_path, rows, cols).expect("Failed to load image");
    let output_dir = Path::new("images");
    ensure_output_dir(output_dir).expect("Failed to create images directory");
    let report = slicer
        .slice(output_dir, |tile, path| {
            println!("tile {} -> {}", tile.index, path.display());
            Ok(())
        })
        .expect("Failed to slice image");
    println!(
        "{} tiles of {}x{} written to {}",
        report.tiles_written,
        report.tile_dimensions.0,
        report.tile_dimensions.1,
        report.output_dir.display()
    );
}
