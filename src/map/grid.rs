//! World grid - toroidal tile storage addressed by linear index

use ahash::AHashSet;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::config::{VegetationConfig, MAX_MAP_EDGE, MIN_MAP_EDGE};
use crate::core::error::{Result, TreelineError};
use crate::core::types::TileIndex;
use crate::map::tile::Tile;

/// Reference area that world-generation counts are tuned for (256 x 256)
pub const REFERENCE_MAP_AREA: u64 = 256 * 256;

/// 2D tile array with power-of-two edges
///
/// Linear indices are always masked by the map area, so stepping off one
/// edge lands on the opposite one (rows carry into the next row, exactly as
/// plain index arithmetic would).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredGrid")]
pub struct WorldGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    /// Tiles whose appearance changed since the renderer last asked
    #[serde(skip)]
    dirty: AHashSet<TileIndex>,
}

/// Wire form of a grid; loading goes back through `WorldGrid::from_tiles`
#[derive(Deserialize)]
struct StoredGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TryFrom<StoredGrid> for WorldGrid {
    type Error = TreelineError;

    fn try_from(stored: StoredGrid) -> Result<Self> {
        Self::from_tiles(stored.width, stored.height, stored.tiles)
    }
}

impl PartialEq for WorldGrid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.tiles == other.tiles
    }
}

impl WorldGrid {
    /// Create a grid of default (grass) tiles
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::check_edges(width, height)?;
        Ok(Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
            dirty: AHashSet::new(),
        })
    }

    pub fn from_config(config: &VegetationConfig) -> Result<Self> {
        Self::new(config.width, config.height)
    }

    /// Wrap an existing tile array, e.g. one restored by the host
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Result<Self> {
        Self::check_edges(width, height)?;
        if tiles.len() != (width * height) as usize {
            return Err(TreelineError::InvalidConfig(format!(
                "expected {} tiles for a {}x{} map, got {}",
                width * height,
                width,
                height,
                tiles.len()
            )));
        }
        Ok(Self {
            width,
            height,
            tiles,
            dirty: AHashSet::new(),
        })
    }

    fn check_edges(width: u32, height: u32) -> Result<()> {
        for edge in [width, height] {
            if !edge.is_power_of_two() || !(MIN_MAP_EDGE..=MAX_MAP_EDGE).contains(&edge) {
                return Err(TreelineError::InvalidConfig(format!(
                    "map edges must be powers of two between {} and {}, got {}x{}",
                    MIN_MAP_EDGE, MAX_MAP_EDGE, width, height
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    #[inline]
    fn mask(&self) -> u32 {
        self.area() - 1
    }

    #[inline]
    pub fn contains(&self, tile: TileIndex) -> bool {
        tile.0 < self.area()
    }

    /// Index of the tile at (x, y), wrapping both coordinates
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> TileIndex {
        TileIndex((y & (self.height - 1)) * self.width + (x & (self.width - 1)))
    }

    #[inline]
    pub fn coords(&self, tile: TileIndex) -> (u32, u32) {
        (tile.0 % self.width, tile.0 / self.width)
    }

    /// Mask an arbitrary value into a valid tile index
    #[inline]
    pub fn wrap(&self, raw: u32) -> TileIndex {
        TileIndex(raw & self.mask())
    }

    /// Tile `dx` columns and `dy` rows away, wrapping around the map
    #[inline]
    pub fn offset(&self, tile: TileIndex, dx: i32, dy: i32) -> TileIndex {
        let diff = dy * self.width as i32 + dx;
        self.wrap(tile.0.wrapping_add(diff as u32))
    }

    /// Manhattan distance on the torus
    pub fn manhattan_distance(&self, a: TileIndex, b: TileIndex) -> u32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        let dx = ax.abs_diff(bx);
        let dy = ay.abs_diff(by);
        dx.min(self.width - dx) + dy.min(self.height - dy)
    }

    /// Draw a uniformly random tile (one draw from the stream)
    pub fn random_tile<R: RngCore + ?Sized>(&self, rng: &mut R) -> TileIndex {
        self.wrap(rng.next_u32())
    }

    /// Scale a count tuned for a 256x256 map to this map's area, rounding up
    pub fn scale_by_map_size(&self, n: u32) -> u32 {
        let scaled = (n as u64 * self.area() as u64).div_ceil(REFERENCE_MAP_AREA);
        scaled.min(u32::MAX as u64) as u32
    }

    #[inline]
    pub fn tile(&self, tile: TileIndex) -> &Tile {
        &self.tiles[tile.as_usize()]
    }

    #[inline]
    pub fn tile_mut(&mut self, tile: TileIndex) -> &mut Tile {
        &mut self.tiles[tile.as_usize()]
    }

    #[inline]
    pub fn get(&self, tile: TileIndex) -> Option<&Tile> {
        self.tiles.get(tile.as_usize())
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileIndex, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (TileIndex(i as u32), t))
    }

    /// Ask the renderer to redraw a tile
    pub fn mark_dirty(&mut self, tile: TileIndex) {
        self.dirty.insert(tile);
    }

    pub fn is_dirty(&self, tile: TileIndex) -> bool {
        self.dirty.contains(&tile)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Drain the dirty set, sorted by index
    pub fn take_dirty(&mut self) -> Vec<TileIndex> {
        let mut tiles: Vec<TileIndex> = self.dirty.drain().collect();
        tiles.sort_unstable();
        tiles
    }
}
