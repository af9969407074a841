use crate::prompt::{dir_prompt, file_prompt, int_prompt, wait_for_enter};
use crate::screen::TITLE;
use crate::style::{paint, Style};
use anyhow::{Context, Result};
use grid_slicer::{GridSlicer, SliceReport};
use log::info;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Name of the directory created next to the source image when no output directory is given.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "output_tiles";

/// Everything the user is asked for before slicing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRequest {
    pub image_path: PathBuf,
    pub rows: u32,
    pub cols: u32,
    pub output_dir: PathBuf,
}

/// `<directory of image_path>/output_tiles`.
pub fn default_output_dir(image_path: &Path) -> PathBuf {
    image_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIR_NAME)
}

/// One interactive run: ask, slice, report.
pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Session { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints the title, collects a [`SliceRequest`], slices the image and waits for the final
    /// acknowledgement.
    pub fn run(&mut self) -> Result<SliceReport> {
        writeln!(self.output, "{}", paint(Style::Plain, TITLE))?;
        let request = self.collect_request()?;
        let report = self.slice(&request)?;
        wait_for_enter(
            &mut self.input,
            &mut self.output,
            &format!("{} Press Enter to exit.", paint(Style::Success, "Done!")),
        )?;
        Ok(report)
    }

    pub fn collect_request(&mut self) -> Result<SliceRequest> {
        let image_path = file_prompt(
            &mut self.input,
            &mut self.output,
            "Path to the large image: ",
        )?;
        let rows = int_prompt(&mut self.input, &mut self.output, "Number of rows: ")?;
        let cols = int_prompt(&mut self.input, &mut self.output, "Number of columns: ")?;

        let default_dir = default_output_dir(&image_path);
        let message = format!(
            "Output directory (press Enter for default '{}'): ",
            default_dir.display()
        );
        let output_dir = dir_prompt(&mut self.input, &mut self.output, &message, &default_dir)?;

        info!(
            "slicing {} into {}x{} tiles in {}",
            image_path.display(),
            rows,
            cols,
            output_dir.display()
        );
        Ok(SliceRequest {
            image_path,
            rows,
            cols,
            output_dir,
        })
    }

    /// Decodes the image and writes its tiles, printing one line per saved tile and a summary.
    pub fn slice(&mut self, request: &SliceRequest) -> Result<SliceReport> {
        let slicer = GridSlicer::from_path(&request.image_path, request.rows, request.cols)?;
        let template = slicer.generate()?;
        let (width, height) = template.source_dimensions;
        let (tile_width, tile_height) = template.tile_dimensions;
        let size_line = format!(
            "Image size: {}×{}px -> each tile: {}×{}px",
            width, height, tile_width, tile_height
        );
        writeln!(self.output, "{}", paint(Style::Plain, &size_line))?;

        let output = &mut self.output;
        let report = grid_slicer::write_tiles(
            slicer.source_image(),
            &template,
            &slicer.base_name(),
            &request.output_dir,
            |_, path| {
                let name = path.file_name().unwrap_or(path.as_os_str());
                let saved_line = format!("Saved: {}", name.to_string_lossy());
                writeln!(output, "{}", paint(Style::Plain, &saved_line))
                    .context("failed to report saved tile")
            },
        )?;

        let summary = format!(
            "Slicing completed: {} tiles saved in '{}'.",
            report.tiles_written,
            report.output_dir.display()
        );
        writeln!(self.output, "{}", paint(Style::Success, &summary))?;
        Ok(report)
    }
}
