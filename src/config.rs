//! Gallery configuration.
//!
//! Everything the scene builder and the application context need is fixed at
//! startup: hall dimensions, the painting table, asset paths and whether the
//! debug aids are enabled. [`GalleryConfig::default`] is the shipped hall.

/// Which side wall a painting hangs on, seen from the entrance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Sign of the wall's x coordinate.
    pub fn sign(self) -> f32 {
        match self {
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        }
    }
}

/// One entry of the painting table.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintingDescriptor {
    pub texture: String,
    /// z coordinate of the painting's centre.
    pub depth: f32,
    pub side: WallSide,
}

impl PaintingDescriptor {
    pub fn new(texture: impl Into<String>, depth: f32, side: WallSide) -> Self {
        Self {
            texture: texture.into(),
            depth,
            side,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HallConfig {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub floor_texture: Option<String>,
    pub ceiling_texture: Option<String>,
    /// Adds the wooden strips along the base of both side walls.
    pub wall_trim: bool,
}

impl HallConfig {
    /// z coordinate of the entrance plane every hall piece is aligned to.
    pub const FRONT: f32 = 5.0;

    /// z coordinate the hall geometry ends at.
    pub fn far_end(&self) -> f32 {
        Self::FRONT - self.depth
    }

    /// z coordinate of the centre of every full-depth piece.
    pub fn center_z(&self) -> f32 {
        -self.depth / 2.0 + Self::FRONT
    }
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 65.0,
            height: 12.0,
            floor_texture: Some("textures/floor.jpg".to_string()),
            ceiling_texture: Some("textures/ceiling.jpg".to_string()),
            wall_trim: true,
        }
    }
}

/// Anchor element whose link target is set to a bundled document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentLink {
    pub anchor_id: String,
    pub asset: String,
}

#[derive(Clone, Debug)]
pub struct GalleryConfig {
    pub hall: HallConfig,
    pub paintings: Vec<PaintingDescriptor>,
    /// Swaps the sway camera for the orbit rig and adds helpers, an ambient
    /// light and frame statistics.
    pub debug: bool,
    pub canvas_id: String,
    /// Element removed from the page in debug mode.
    pub overlay_id: String,
    pub document: Option<DocumentLink>,
    pub clear_colour: wgpu::Color,
    /// Renders with 4× MSAA where the adapter supports it.
    pub antialias: bool,
}

impl GalleryConfig {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_hall(mut self, hall: HallConfig) -> Self {
        self.hall = hall;
        self
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            hall: HallConfig::default(),
            paintings: vec![
                PaintingDescriptor::new("textures/berserk.jpg", -10.0, WallSide::Right),
                PaintingDescriptor::new("textures/evangelion.jpg", -20.0, WallSide::Left),
                PaintingDescriptor::new("textures/chainsaw_man.jpg", -30.0, WallSide::Right),
                PaintingDescriptor::new("textures/jojo.jpg", -40.0, WallSide::Left),
                PaintingDescriptor::new("textures/cowboy_bebop.jpg", -50.0, WallSide::Right),
            ],
            debug: cfg!(feature = "debug"),
            canvas_id: "bg".to_string(),
            overlay_id: "main".to_string(),
            document: Some(DocumentLink {
                anchor_id: "cv-pdf".to_string(),
                asset: "documents/cv.pdf".to_string(),
            }),
            clear_colour: wgpu::Color::BLACK,
            antialias: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hall_spans_entrance_to_far_end() {
        let hall = HallConfig::default();
        assert_eq!(hall.center_z(), -27.5);
        assert_eq!(hall.far_end(), -60.0);
    }

    #[test]
    fn default_paintings_alternate_walls() {
        let config = GalleryConfig::default();
        assert_eq!(config.paintings.len(), 5);
        for pair in config.paintings.windows(2) {
            assert_ne!(pair[0].side, pair[1].side);
            assert!(pair[1].depth < pair[0].depth);
        }
    }
}
