//! Declarative indicator metadata.
//!
//! Each evaluator publishes a metadata block the host renders UI from:
//! display title, parameter slots, and the ordered plot declarations.
//! Plot positions are load-bearing: the output tuple emitted per bar
//! carries one value per declared plot, in declaration order.

use serde::{Deserialize, Serialize};

/// Kind of a declared input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Whole-number parameter
    Integer,
    /// Fractional parameter
    Float,
    /// On/off switch
    Bool,
    /// Comparative instrument ticker
    Symbol,
    /// Free-form text
    Text,
}

/// One parameter slot: id, display name, kind, default, optional bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDef {
    /// Stable parameter id, matched to the params field by name.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Slot kind.
    pub kind: InputKind,
    /// Default value.
    pub defval: serde_json::Value,
    /// Minimum, for numeric slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum, for numeric slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl InputDef {
    /// Integer slot with bounds.
    #[must_use]
    pub fn integer(id: &str, name: &str, defval: i64, min: i64, max: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: InputKind::Integer,
            defval: serde_json::json!(defval),
            min: Some(min as f64),
            max: Some(max as f64),
        }
    }

    /// Comparative-symbol slot.
    #[must_use]
    pub fn symbol(id: &str, name: &str, defval: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: InputKind::Symbol,
            defval: serde_json::json!(defval),
            min: None,
            max: None,
        }
    }

    /// Text slot (moving-average kind flags and similar).
    #[must_use]
    pub fn text(id: &str, name: &str, defval: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: InputKind::Text,
            defval: serde_json::json!(defval),
            min: None,
            max: None,
        }
    }
}

/// Rendering style of a declared plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    /// Continuous line
    Line,
    /// Histogram columns
    Histogram,
    /// Discrete marker
    Shape,
    /// Palette index feeding a sibling plot's color
    Colorer,
}

/// One output slot of the per-bar tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotDef {
    /// Stable plot id.
    pub id: String,
    /// Rendering style.
    pub kind: PlotKind,
}

impl PlotDef {
    /// Line plot.
    #[must_use]
    pub fn line(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: PlotKind::Line,
        }
    }

    /// Histogram plot.
    #[must_use]
    pub fn histogram(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: PlotKind::Histogram,
        }
    }

    /// Shape plot.
    #[must_use]
    pub fn shape(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: PlotKind::Shape,
        }
    }

    /// Colorer plot.
    #[must_use]
    pub fn colorer(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: PlotKind::Colorer,
        }
    }
}

/// Declarative metadata block for one indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorMeta {
    /// Registry id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Parameter slots.
    pub inputs: Vec<InputDef>,
    /// Output slots; tuple arity and order follow this list.
    pub plots: Vec<PlotDef>,
}

impl IndicatorMeta {
    /// Creates a metadata block.
    #[must_use]
    pub fn new(id: &str, title: &str, inputs: Vec<InputDef>, plots: Vec<PlotDef>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            inputs,
            plots,
        }
    }

    /// Arity of the per-bar output tuple.
    #[must_use]
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }
}
