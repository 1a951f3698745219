//! Diagram builder and figure model
//!
//! [`build`] turns named productions of a [`Grammar`](crate::grammar::Grammar)
//! into [`Diagram`]s. Each diagram owns a minimal [`Figure`] tree that any
//! [`CanvasProvider`] can draw through a [`ShapeRenderer`].

mod builder;
mod figure;
mod shape;

pub use builder::*;
pub use figure::*;

use serde::{Deserialize, Serialize};

use crate::render::{CanvasProvider, ShapeRenderer};

/// One production's figure, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    name: String,
    figure: Figure,
}

impl Diagram {
    pub fn new(name: impl Into<String>, figure: Figure) -> Self {
        Self {
            name: name.into(),
            figure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn into_figure(self) -> Figure {
        self.figure
    }

    /// Draw this diagram on `canvas`, titled with the production name
    pub fn convert<C: CanvasProvider>(
        &self,
        renderer: &mut ShapeRenderer,
        canvas: &mut C,
    ) -> Result<C::Output, C::Error> {
        renderer.render_diagram(self, canvas)
    }
}
