use serde::{Deserialize, Serialize};

const DEFAULT_FONT_NAME: &str = "Helvetica";
const DEFAULT_FONT_SIZE: f64 = 8.0;

/// Over-scale applied to hexagon vertices to compensate for dot gain.
const INK_SPREAD: f64 = 1.25;
const HEXAGON_OFFSET_X: [f64; 6] = [0.0, 0.86, 0.86, 0.0, -0.86, -0.86];
const HEXAGON_OFFSET_Y: [f64; 6] = [1.0, 0.5, -0.5, -1.0, -0.5, 0.5];

/// Geometry of one encoded symbol, in model units.
///
/// `width` and `height` cover the printable area only; the quiet zones
/// (`margin_x`, `margin_y`) are added on both sides by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(default)]
    pub content: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin_x: f64,
    #[serde(default)]
    pub margin_y: f64,
    #[serde(default = "default_font_name")]
    pub font_name: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub rectangles: Vec<Rectangle>,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
    #[serde(default)]
    pub target_circles: Vec<Circle>,
    #[serde(default)]
    pub hexagons: Vec<Hexagon>,
}

fn default_font_name() -> String {
    DEFAULT_FONT_NAME.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

impl Default for Symbol {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Symbol {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            content: String::new(),
            width,
            height,
            margin_x: 0.0,
            margin_y: 0.0,
            font_name: default_font_name(),
            font_size: DEFAULT_FONT_SIZE,
            rectangles: Vec::new(),
            text_boxes: Vec::new(),
            target_circles: Vec::new(),
            hexagons: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_margins(mut self, margin_x: f64, margin_y: f64) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    pub fn with_font(mut self, name: impl Into<String>, size: f64) -> Self {
        self.font_name = name.into();
        self.font_size = size;
        self
    }

    /// Width including both horizontal quiet zones.
    pub fn total_width(&self) -> f64 {
        self.width + 2.0 * self.margin_x
    }

    /// Height including both vertical quiet zones.
    pub fn total_height(&self) -> f64 {
        self.height + 2.0 * self.margin_y
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Failed to parse symbol JSON: {}", e))
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse symbol TOML: {}", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse symbol YAML: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Human readable text; `x` is the horizontal center and `y` the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl TextBox {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// One ring of a bullseye target. `(x, y)` is the top-left corner of the
/// circle's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, diameter: f64) -> Self {
        Self { x, y, diameter }
    }

    pub fn centered(center_x: f64, center_y: f64, diameter: f64) -> Self {
        let radius = diameter / 2.0;
        Self::new(center_x - radius, center_y - radius, diameter)
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.radius(), self.y + self.radius())
    }
}

/// A hexagonal dot. Vertices are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "HexagonCenter", into = "HexagonCenter")]
pub struct Hexagon {
    center: (f64, f64),
    points: [(f64, f64); 6],
}

#[derive(Serialize, Deserialize)]
struct HexagonCenter {
    x: f64,
    y: f64,
}

impl From<HexagonCenter> for Hexagon {
    fn from(center: HexagonCenter) -> Self {
        Hexagon::new(center.x, center.y)
    }
}

impl From<Hexagon> for HexagonCenter {
    fn from(hexagon: Hexagon) -> Self {
        HexagonCenter {
            x: hexagon.center.0,
            y: hexagon.center.1,
        }
    }
}

impl Hexagon {
    pub fn new(center_x: f64, center_y: f64) -> Self {
        let mut points = [(0.0, 0.0); 6];
        for (i, point) in points.iter_mut().enumerate() {
            *point = (
                center_x + HEXAGON_OFFSET_X[i] * INK_SPREAD,
                center_y + HEXAGON_OFFSET_Y[i] * INK_SPREAD,
            );
        }

        Self {
            center: (center_x, center_y),
            points,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn points(&self) -> &[(f64, f64); 6] {
        &self.points
    }
}
