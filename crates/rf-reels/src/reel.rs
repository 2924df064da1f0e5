//! Reel model: scroll position, blur and the recycled symbol slots

use rand::Rng;

use crate::symbols::{SymbolSet, SymbolTexture};

/// Rows visible in every reel
pub const VISIBLE_ROWS: usize = 3;

/// Slots per reel: the visible rows plus one buffer slot
pub const SLOTS_PER_REEL: usize = VISIBLE_ROWS + 1;

/// Tolerance for treating a reel position as landed on a whole slot
pub const SETTLE_EPSILON: f64 = 1e-9;

/// One recycled symbol sprite inside a reel
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSlot {
    /// Texture identity currently shown
    pub texture: String,
    /// Vertical pixel offset within the reel
    pub y: f64,
    pub scale: f64,
    /// Horizontal offset centering the scaled texture in its cell
    pub x: f64,
}

impl SymbolSlot {
    pub fn new(texture: &SymbolTexture, y: f64, cell: f64) -> Self {
        let fit = texture.fit(cell);
        Self {
            texture: texture.name.clone(),
            y,
            scale: fit.scale,
            x: fit.x,
        }
    }

    /// Swap the texture and refit it to the cell
    pub fn assign(&mut self, texture: &SymbolTexture, cell: f64) {
        let fit = texture.fit(cell);
        self.texture.clone_from(&texture.name);
        self.scale = fit.scale;
        self.x = fit.x;
    }

    /// Row the slot currently occupies (-1 is above the window)
    pub fn row(&self, cell: f64) -> i64 {
        (self.y / cell).floor() as i64
    }
}

/// One vertical column of scrolling symbols
#[derive(Debug, Clone)]
pub struct Reel {
    /// Fractional scroll offset in slots
    pub position: f64,
    /// Position at the previous frame
    pub previous_position: f64,
    pub blur: f64,
    pub symbols: Vec<SymbolSlot>,
}

impl Reel {
    /// New reel at position 0 with random textures stacked from the top
    pub fn new<R: Rng + ?Sized>(set: &SymbolSet, cell: f64, rng: &mut R) -> Self {
        let symbols = (0..SLOTS_PER_REEL)
            .map(|i| SymbolSlot::new(set.random(rng), i as f64 * cell, cell))
            .collect();

        Self {
            position: 0.0,
            previous_position: 0.0,
            blur: 0.0,
            symbols,
        }
    }

    /// Offset of a slot for the current position.
    ///
    /// Slots form a circular buffer mapped onto the pixel axis, shifted up one
    /// cell so the buffer slot sits above the visible window.
    pub fn slot_offset(&self, slot_index: usize, cell: f64) -> f64 {
        let count = self.symbols.len() as f64;
        ((self.position + slot_index as f64) % count) * cell - cell
    }

    /// Blur from the distance travelled since the last frame
    pub fn update_blur(&mut self, blur_scale: f64) {
        self.blur = (self.position - self.previous_position) * blur_scale;
        self.previous_position = self.position;
    }

    /// Landed on a whole slot?
    pub fn is_settled(&self) -> bool {
        (self.position - self.position.round()).abs() <= SETTLE_EPSILON
    }
}

/// Did a slot cross the wrap boundary between two frames?
pub fn crossed_wrap(previous_y: f64, y: f64, cell: f64) -> bool {
    y < 0.0 && previous_y > cell
}
