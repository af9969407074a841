//! The grid slicer library cuts a rectangular image into a regular grid of equally sized tiles
//! and writes every tile as its own PNG file. It provides:
//!
//! - [`GridSlicer`], which owns the decoded source image and the number of rows and columns.
//!     [`GridSlicer::generate`] computes the tile layout, [`GridSlicer::slice`] crops and saves
//!     every tile
//! - [`write_tiles`], the crop-and-save loop for an already computed [`GridTemplate`]
//! - [`divide_axis`] and [`base_name`], the small helpers the layout and the file names are
//!     built from
//!
//! Every tile has the same size: `width / cols` by `height / rows`, rounded down. Pixels left
//! over on the right and bottom edges are not part of any tile.

use anyhow::{anyhow, bail, Context, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub use image;

/// File extension of every written tile. Tiles are always encoded as PNG.
pub const TILE_EXTENSION: &str = "png";

/// Name prefix used when the source path has no file stem to borrow one from.
const FALLBACK_BASE_NAME: &str = "tile";

/// Cuts a source image into `rows` x `cols` tiles.
///
/// The slicer never modifies the source image. Each tile is cropped into its own buffer right
/// before it is saved and dropped afterwards, so at most one tile is held in memory at a time.
#[derive(Debug)]
pub struct GridSlicer {
    /// The image the tiles are cut from.
    source_image: DynamicImage,
    /// Where the source image was loaded from, if it came from a file.
    source_path: Option<PathBuf>,
    /// The number of tiles stacked vertically.
    rows: u32,
    /// The number of tiles side by side horizontally.
    cols: u32,
}

impl GridSlicer {
    pub fn new(source_image: DynamicImage, rows: u32, cols: u32) -> Self {
        GridSlicer {
            source_image,
            source_path: None,
            rows,
            cols,
        }
    }

    pub fn from_rgba8(
        width: u32,
        height: u32,
        image_bytes: &[u8],
        rows: u32,
        cols: u32,
    ) -> Result<Self> {
        let source_image = DynamicImage::ImageRgba8(
            RgbaImage::from_raw(width, height, image_bytes.to_vec())
                .ok_or_else(|| anyhow!("Failed to create image from raw bytes"))?,
        );
        Ok(GridSlicer::new(source_image, rows, cols))
    }

    /// Decodes the image file at `image_path` and prepares to cut it into `rows` x `cols` tiles.
    /// The file stem of `image_path` becomes the prefix of every tile file name.
    pub fn from_path(image_path: impl AsRef<Path>, rows: u32, cols: u32) -> Result<Self> {
        let image_path = image_path.as_ref();
        let source_image = image::open(image_path)
            .with_context(|| format!("failed to decode image {}", image_path.display()))?;
        info!(
            "loaded image from {} with dimensions {}x{}",
            image_path.display(),
            source_image.width(),
            source_image.height()
        );
        Ok(GridSlicer {
            source_image,
            source_path: Some(image_path.to_path_buf()),
            rows,
            cols,
        })
    }

    pub fn source_image(&self) -> &DynamicImage {
        &self.source_image
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn tiles_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// The prefix of every tile file name. See [`base_name`].
    pub fn base_name(&self) -> String {
        self.source_path
            .as_deref()
            .map_or_else(|| FALLBACK_BASE_NAME.to_string(), base_name)
    }

    /// Computes the boxes of all tiles in row-major order.
    ///
    /// Fails when the grid is empty or finer than the image, i.e. when a tile would be zero
    /// pixels wide or tall.
    pub fn generate(&self) -> Result<GridTemplate> {
        let (image_width, image_height) = self.source_image.dimensions();
        if self.rows == 0 || self.cols == 0 {
            bail!(
                "grid must have at least one row and one column, got {} rows and {} columns",
                self.rows,
                self.cols
            );
        }
        let (starting_points_x, tile_width) = divide_axis(image_width, self.cols);
        let (starting_points_y, tile_height) = divide_axis(image_height, self.rows);
        if tile_width == 0 || tile_height == 0 {
            bail!(
                "a {}x{} grid is finer than the {}x{} image: tiles would be {}x{} pixels",
                self.rows,
                self.cols,
                image_width,
                image_height,
                tile_width,
                tile_height
            );
        }
        info!(
            "image {}x{} -> {} tiles of {}x{}",
            image_width,
            image_height,
            self.tiles_count(),
            tile_width,
            tile_height
        );

        let mut tiles = Vec::with_capacity(self.tiles_count());
        for (row, upper) in starting_points_y.iter().enumerate() {
            for (col, left) in starting_points_x.iter().enumerate() {
                tiles.push(GridTile {
                    index: tiles.len(),
                    row: row as u32,
                    col: col as u32,
                    left: *left,
                    upper: *upper,
                    width: tile_width,
                    height: tile_height,
                });
            }
        }

        Ok(GridTemplate {
            tiles,
            tile_dimensions: (tile_width, tile_height),
            number_of_tiles: (self.cols, self.rows),
            source_dimensions: (image_width, image_height),
        })
    }

    /// Computes the layout, then crops every tile and saves it into `output_dir`.
    ///
    /// `on_saved` is called after each tile file has been written. The first failure aborts the
    /// remaining tiles; files written before it stay on disk.
    pub fn slice<F>(&self, output_dir: impl AsRef<Path>, on_saved: F) -> Result<SliceReport>
    where
        F: FnMut(&GridTile, &Path) -> Result<()>,
    {
        let template = self.generate()?;
        write_tiles(
            &self.source_image,
            &template,
            &self.base_name(),
            output_dir.as_ref(),
            on_saved,
        )
    }
}

/// Divides an axis of `length` pixels into `parts` cells of equal length. Returns the starting
/// offset of each cell and the cell length, which is rounded down.
pub fn divide_axis(length: u32, parts: u32) -> (Vec<u32>, u32) {
    let cell_length = length.checked_div(parts).unwrap_or(0);
    (
        (0..parts).map(|part| part * cell_length).collect(),
        cell_length,
    )
}

/// Returns the file name of `path` without its directory and without its final extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string())
}

/// The layout of all tiles for one image and grid.
#[derive(Debug, Clone)]
pub struct GridTemplate {
    /// The tile boxes in row-major order
    pub tiles: Vec<GridTile>,
    /// The (width, height) of every tile in pixels
    pub tile_dimensions: (u32, u32),
    /// The number of tiles on the x- and the y-axis
    pub number_of_tiles: (u32, u32),
    /// The (width, height) of the source image in pixels
    pub source_dimensions: (u32, u32),
}

impl GridTemplate {
    /// Pixels on the right and bottom edges of the source that no tile covers.
    pub fn remainder(&self) -> (u32, u32) {
        (
            self.source_dimensions.0 - self.tile_dimensions.0 * self.number_of_tiles.0,
            self.source_dimensions.1 - self.tile_dimensions.1 * self.number_of_tiles.1,
        )
    }
}

/// A single cell of the grid, described by its pixel box in the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridTile {
    /// Position in row-major order
    pub index: usize,
    /// 0-based row
    pub row: u32,
    /// 0-based column
    pub col: u32,
    pub left: u32,
    pub upper: u32,
    pub width: u32,
    pub height: u32,
}

impl GridTile {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn lower(&self) -> u32 {
        self.upper + self.height
    }

    /// The `(left, upper, right, lower)` box of the tile.
    pub fn bounding_box(&self) -> (u32, u32, u32, u32) {
        (self.left, self.upper, self.right(), self.lower())
    }

    /// Copies the pixels of this tile out of `image`.
    pub fn crop(&self, image: &DynamicImage) -> DynamicImage {
        debug!("start crop tile {} image", self.index);
        image.crop_imm(self.left, self.upper, self.width, self.height)
    }

    /// `<base_name>_r<row>_c<col>.png` with 1-based row and column.
    pub fn file_name(&self, base_name: &str) -> String {
        format!(
            "{}_r{}_c{}.{}",
            base_name,
            self.row + 1,
            self.col + 1,
            TILE_EXTENSION
        )
    }
}

/// Summary of a finished slicing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceReport {
    pub tiles_written: usize,
    pub tile_dimensions: (u32, u32),
    pub output_dir: PathBuf,
}

/// Crops every tile of `template` out of `image` and saves it as PNG into `output_dir`, in
/// row-major order. `output_dir` must already exist.
pub fn write_tiles<F>(
    image: &DynamicImage,
    template: &GridTemplate,
    base_name: &str,
    output_dir: &Path,
    mut on_saved: F,
) -> Result<SliceReport>
where
    F: FnMut(&GridTile, &Path) -> Result<()>,
{
    for tile in template.tiles.iter() {
        let tile_path = output_dir.join(tile.file_name(base_name));
        encodable(tile.crop(image))
            .save_with_format(&tile_path, ImageFormat::Png)
            .with_context(|| format!("failed to save tile {}", tile_path.display()))?;
        debug!("saved tile {} to {}", tile.index, tile_path.display());
        on_saved(tile, &tile_path)?;
    }

    Ok(SliceReport {
        tiles_written: template.tiles.len(),
        tile_dimensions: template.tile_dimensions,
        output_dir: output_dir.to_path_buf(),
    })
}

/// The PNG encoder has no floating point color types, those tiles are stored as 16 bit.
fn encodable(tile: DynamicImage) -> DynamicImage {
    match tile {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(tile.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(tile.to_rgba16()),
        other => other,
    }
}

/// Creates `output_dir` and all missing parents.
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create directory {}", output_dir.display()))
}
