//! Line styles and the theme lookup collaborator.

use super::measure::TextLayout;
use std::collections::HashMap;
use std::sync::Arc;

/// Edge sizes in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub const fn vertical(top: f32, bottom: f32) -> Self {
        Self {
            top,
            right: 0.0,
            bottom,
            left: 0.0,
        }
    }

    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }
}

/// Font measurements consumed by text measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Height of one wrapped row.
    pub line_height: f32,
    /// Width of one display column.
    pub advance: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            line_height: 16.0,
            advance: 8.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Resolved style for one line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineStyle {
    /// Name the style was resolved from, `None` for the default style.
    pub name: Option<String>,
    pub font: FontMetrics,
    pub margin: Insets,
    pub border: Insets,
    pub padding: Insets,
    pub alignment: Alignment,
    /// Disable to lay the line out on a single row regardless of width.
    pub no_wrap: bool,
}

impl LineStyle {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Vertical space around the text: margin, border, and padding.
    pub fn vertical_chrome(&self) -> f32 {
        self.margin.vertical_sum() + self.border.vertical_sum() + self.padding.vertical_sum()
    }

    pub fn horizontal_chrome(&self) -> f32 {
        self.margin.horizontal_sum() + self.border.horizontal_sum() + self.padding.horizontal_sum()
    }

    /// Offset from the line's top edge to its first text row.
    pub fn text_top(&self) -> f32 {
        self.margin.top + self.border.top + self.padding.top
    }

    /// Offset from the view's left edge to the text box.
    pub fn text_left(&self) -> f32 {
        self.margin.left + self.border.left + self.padding.left
    }

    /// Width available to text for a view of `view_width`, or `None` when the
    /// line must not wrap. Never narrower than one column.
    pub fn wrap_width(&self, view_width: Option<f32>) -> Option<f32> {
        if self.no_wrap {
            return None;
        }
        view_width.map(|width| (width - self.horizontal_chrome()).max(self.font.advance))
    }

    /// Total line height for a measured layout.
    pub fn line_height(&self, layout: &TextLayout) -> f32 {
        layout.height + self.vertical_chrome()
    }

    /// Horizontal offset of a row `row_width` wide inside `available`.
    pub fn align_offset(&self, row_width: f32, available: f32) -> f32 {
        let slack = (available - row_width).max(0.0);
        match self.alignment {
            Alignment::Left => 0.0,
            Alignment::Center => slack / 2.0,
            Alignment::Right => slack,
        }
    }
}

/// Resolves style names to metrics.
///
/// Resolving a name the theme does not know is a caller contract
/// violation.
pub trait ThemeLookup {
    fn resolve(&self, name: Option<&str>) -> Arc<LineStyle>;
}

/// Name-keyed style table with a default style.
#[derive(Clone, Debug, Default)]
pub struct Theme {
    default: Arc<LineStyle>,
    named: HashMap<String, Arc<LineStyle>>,
}

impl Theme {
    pub fn new(default: LineStyle) -> Self {
        Self {
            default: Arc::new(default),
            named: HashMap::new(),
        }
    }

    /// Register `style` under `name`, returning the theme for chaining.
    pub fn with_style(mut self, name: &str, mut style: LineStyle) -> Self {
        style.name = Some(name.to_string());
        self.named.insert(name.to_string(), Arc::new(style));
        self
    }

    pub fn default_style(&self) -> &Arc<LineStyle> {
        &self.default
    }
}

impl ThemeLookup for Theme {
    fn resolve(&self, name: Option<&str>) -> Arc<LineStyle> {
        let Some(name) = name else {
            return self.default.clone();
        };
        match self.named.get(name) {
            Some(style) => style.clone(),
            None => {
                debug_assert!(false, "unknown style name {name:?}");
                self.default.clone()
            }
        }
    }
}
