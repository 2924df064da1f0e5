//! Symbol textures and the symbol set

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};

/// A symbol texture: identity plus source dimensions in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTexture {
    /// Texture key, also the symbol identity reported in results (e.g. "CHERRY")
    pub name: String,
    pub width: f64,
    pub height: f64,
}

/// Scale and horizontal offset that fit a texture into a square cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolFit {
    pub scale: f64,
    pub x: f64,
}

impl SymbolTexture {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Uniform scale so the texture fits `cell`, centered horizontally
    pub fn fit(&self, cell: f64) -> SymbolFit {
        let scale = (cell / self.width).min(cell / self.height);
        SymbolFit {
            scale,
            x: ((cell - self.width * scale) / 2.0).round(),
        }
    }
}

/// Default fruit machine textures
pub fn default_symbol_textures() -> Vec<SymbolTexture> {
    vec![
        SymbolTexture::new("CHERRY", 128.0, 128.0),
        SymbolTexture::new("LEMON", 120.0, 140.0),
        SymbolTexture::new("PLUM", 140.0, 120.0),
        SymbolTexture::new("BELL", 130.0, 150.0),
        SymbolTexture::new("SEVEN", 160.0, 160.0),
    ]
}

/// Validated, non-empty set of symbol textures
#[derive(Debug, Clone)]
pub struct SymbolSet {
    textures: Vec<SymbolTexture>,
}

impl SymbolSet {
    pub fn new(textures: Vec<SymbolTexture>) -> ReelResult<Self> {
        if textures.is_empty() {
            return Err(ReelError::InvalidConfig("symbol set is empty".into()));
        }

        let mut seen = HashSet::new();
        for texture in &textures {
            if texture.name.is_empty() {
                return Err(ReelError::InvalidConfig("symbol name is empty".into()));
            }
            if !seen.insert(texture.name.as_str()) {
                return Err(ReelError::InvalidConfig(format!(
                    "duplicate symbol '{}'",
                    texture.name
                )));
            }
            let sizes_ok = texture.width.is_finite()
                && texture.height.is_finite()
                && texture.width > 0.0
                && texture.height > 0.0;
            if !sizes_ok {
                return Err(ReelError::InvalidConfig(format!(
                    "symbol '{}' has invalid size {}x{}",
                    texture.name, texture.width, texture.height
                )));
            }
        }

        Ok(Self { textures })
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Get texture by name
    pub fn get(&self, name: &str) -> Option<&SymbolTexture> {
        self.textures.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().map(|t| t.name.as_str())
    }

    /// Draw a uniformly random texture
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &SymbolTexture {
        &self.textures[rng.random_range(0..self.textures.len())]
    }
}
