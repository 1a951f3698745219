//! Diagram shape trees
//!
//! A [`Figure`] is what the builder produces and what renderers consume.
//! Figures are plain immutable values compared by structure.

use serde::{Deserialize, Serialize};

use crate::charset::CharClass;

/// A node of a railroad diagram
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    /// Literal text
    Text { label: String },
    /// A case-insensitive literal, drawn as one node
    AnyCase { label: String },
    /// A character class with optional exclusions
    Characters {
        class: CharClass,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exceptions: Vec<CharClass>,
    },
    /// Link to another production's diagram
    Reference { name: String, plural: bool },
    /// Alternative paths, stacked in declaration order
    Branch { alternatives: Vec<Figure> },
    /// Figures traversed left to right
    Line { children: Vec<Figure> },
    /// `body` is traversed once, then the loop-back rail (through
    /// `separator` when present) is taken between `min` and `max` times;
    /// `max: None` is unbounded
    Loop {
        body: Box<Figure>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<Box<Figure>>,
        min: u32,
        max: Option<u32>,
    },
    /// The empty path, only meaningful as an alternative of a branch
    Nothing,
}

impl Figure {
    pub fn text(label: impl Into<String>) -> Self {
        Figure::Text {
            label: label.into(),
        }
    }

    pub fn any_case(label: impl Into<String>) -> Self {
        Figure::AnyCase {
            label: label.into(),
        }
    }

    pub fn reference(name: impl Into<String>, plural: bool) -> Self {
        Figure::Reference {
            name: name.into(),
            plural,
        }
    }

    /// Raw constructor; does not flatten
    pub fn branch(alternatives: Vec<Figure>) -> Self {
        Figure::Branch { alternatives }
    }

    /// Raw constructor; does not flatten
    pub fn line(children: Vec<Figure>) -> Self {
        Figure::Line { children }
    }

    pub fn looped(body: Figure, separator: Option<Figure>, min: u32, max: Option<u32>) -> Self {
        Figure::Loop {
            body: Box::new(body),
            separator: separator.map(Box::new),
            min,
            max,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Figure::Nothing)
    }

    /// The figures this one contributes to an enclosing line
    pub fn into_items(self) -> Vec<Figure> {
        match self {
            Figure::Line { children } => children,
            Figure::Nothing => Vec::new(),
            other => vec![other],
        }
    }

    /// Display text of a leaf figure
    pub fn label(&self) -> Option<String> {
        match self {
            Figure::Text { label } | Figure::AnyCase { label } => Some(label.clone()),
            Figure::Reference { name, .. } => Some(name.clone()),
            Figure::Characters { class, exceptions } => {
                let mut label = class.label();
                for exception in exceptions {
                    label.push_str(" except ");
                    label.push_str(&exception.label());
                }
                Some(label)
            }
            Figure::Branch { .. } | Figure::Line { .. } | Figure::Loop { .. } | Figure::Nothing => {
                None
            }
        }
    }

    /// Number of nodes in this tree
    pub fn node_count(&self) -> usize {
        1 + match self {
            Figure::Branch { alternatives } => alternatives.iter().map(Figure::node_count).sum(),
            Figure::Line { children } => children.iter().map(Figure::node_count).sum(),
            Figure::Loop {
                body, separator, ..
            } => body.node_count() + separator.as_ref().map_or(0, |s| s.node_count()),
            _ => 0,
        }
    }
}
