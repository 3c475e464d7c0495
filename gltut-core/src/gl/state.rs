use super::Gpu;

/// Polygon rasterization mode applied to front and back faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    /// Filled polygons, the GL default.
    #[default]
    Fill,
    /// Polygon edges only.
    Wireframe,
}

impl From<RasterMode> for u32 {
    fn from(val: RasterMode) -> Self {
        match val {
            RasterMode::Fill => glow::FILL,
            RasterMode::Wireframe => glow::LINE,
        }
    }
}

/// Manages simple GL state to reduce redundant state changes
#[derive(Debug, Default)]
pub struct GlState {
    // [x, y, width, height]
    viewport: [i32; 4],
    clear_color: [f32; 4],
    raster_mode: RasterMode,
}

impl GlState {
    /// Create a new state tracker holding GL defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set viewport dimensions
    pub fn viewport<G: Gpu>(
        &mut self,
        gpu: &G,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.viewport != new_viewport {
            gpu.viewport(x, y, width, height);
            self.viewport = new_viewport;
        }
        self
    }

    /// Set clear color
    pub fn clear_color<G: Gpu>(&mut self, gpu: &G, [r, g, b, a]: [f32; 4]) -> &mut Self {
        let new_color = [r, g, b, a];
        if self.clear_color != new_color {
            gpu.clear_color(r, g, b, a);
            self.clear_color = new_color;
        }
        self
    }

    /// Set the polygon rasterization mode for front and back faces
    pub fn raster_mode<G: Gpu>(&mut self, gpu: &G, mode: RasterMode) -> &mut Self {
        if self.raster_mode != mode {
            gpu.polygon_mode(glow::FRONT_AND_BACK, mode.into());
            self.raster_mode = mode;
        }
        self
    }

    /// The rasterization mode currently applied.
    #[must_use]
    pub fn current_raster_mode(&self) -> RasterMode {
        self.raster_mode
    }

    /// The viewport currently applied, as `[x, y, width, height]`.
    #[must_use]
    pub fn current_viewport(&self) -> [i32; 4] {
        self.viewport
    }
}
