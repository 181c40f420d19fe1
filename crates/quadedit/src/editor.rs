//! The editing session.
//!
//! An [`Editor`] owns the one [`Model`] of a session together with its
//! [`Selection`] and [`Options`]. It is created explicitly and handed to
//! whichever collaborators need it; there is no global instance.

use std::io::Write;
use std::rc::Rc;

use quadedit_core::pick::{is_click, screen_ray};
use quadedit_core::{
    Axis, ExportSettings, Face, Mat4, Model, Options, QuadEditError, Ray, Result, Selection,
    Subscription, UVec2, Vec2, Vec3, Vertex,
};

use crate::export::ExportDocument;
use crate::scene;

/// One editing session: a model, its selection and the editor options.
pub struct Editor {
    model: Model,
    selection: Rc<Selection>,
    options: Options,
    /// Drops the selection when its face leaves the model.
    _selection_pruner: Subscription,
}

impl Editor {
    /// Starts a session with the given options.
    ///
    /// The default cube is added when [`Options::seed_default_scene`] is set.
    pub fn new(options: Options) -> Self {
        let model = Model::new();
        let selection = Rc::new(Selection::new());

        let weak_selection = Rc::downgrade(&selection);
        let selection_pruner = model.subscribe(move |model| {
            let Some(selection) = weak_selection.upgrade() else {
                return;
            };
            if let Some(face) = selection.selected() {
                if !model.contains(&face) {
                    log::debug!("selected face {} left the model", face.id());
                    selection.clear();
                }
            }
        });

        if options.seed_default_scene {
            scene::populate_unit_cube(&model);
        }
        log::info!("quadedit session started with {} faces", model.len());

        Self {
            model,
            selection,
            options,
            _selection_pruner: selection_pruner,
        }
    }

    /// Starts a session with an empty model and default options otherwise.
    pub fn empty() -> Self {
        Self::new(Options {
            seed_default_scene: false,
            ..Options::default()
        })
    }

    /// Returns the session model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the session selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the editor options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the selected face, if any.
    pub fn selected(&self) -> Option<Face> {
        self.selection.selected()
    }

    /// Selects the face nearest along `ray`, or clears the selection on a miss.
    ///
    /// Returns the newly selected face.
    pub fn pick(&self, ray: &Ray) -> Option<Face> {
        let hit = self.model.pick(ray);
        match &hit {
            Some(hit) => log::debug!("picked face {} at {} (distance {})", hit.face.id(), hit.point, hit.distance),
            None => log::debug!("pick missed every face"),
        }
        let face = hit.map(|hit| hit.face);
        self.selection.select(face.clone());
        face
    }

    /// Handles a pointer press/release pair in the viewport.
    ///
    /// Drags (movement of at least [`Options::click_tolerance`] pixels) are
    /// ignored and leave the selection alone. A click is unprojected through
    /// `inverse_view_projection` and picked; if no ray can be formed the
    /// selection is cleared.
    pub fn click(
        &self,
        press: Vec2,
        release: Vec2,
        viewport: UVec2,
        inverse_view_projection: Mat4,
    ) -> Option<Face> {
        if !is_click(press, release, self.options.click_tolerance) {
            log::debug!("pointer moved from {press} to {release}; treating as drag");
            return None;
        }
        let Some(ray) = screen_ray(release, viewport, inverse_view_projection) else {
            log::debug!("no ray under {release}; deselecting");
            self.selection.clear();
            return None;
        };
        self.pick(&ray)
    }

    /// Sets one coordinate of one vertex of the selected face.
    ///
    /// # Errors
    ///
    /// [`QuadEditError::NoSelection`] if nothing is selected,
    /// [`QuadEditError::VertexIndexOutOfRange`] unless `vertex_index < 4`.
    pub fn set_selected_coordinate(&self, vertex_index: usize, axis: Axis, value: f32) -> Result<()> {
        let vertex = self.selected_vertex(vertex_index)?;
        vertex.set_axis(axis, value);
        Ok(())
    }

    /// Moves one coordinate of the selected face by `steps` numeric steps.
    ///
    /// Returns the new coordinate value.
    pub fn step_selected_coordinate(&self, vertex_index: usize, axis: Axis, steps: i32) -> Result<f32> {
        let vertex = self.selected_vertex(vertex_index)?;
        let value = vertex.axis(axis) + steps as f32 * self.options.numeric_step;
        vertex.set_axis(axis, value);
        Ok(value)
    }

    fn selected_vertex(&self, vertex_index: usize) -> Result<Vertex> {
        let Some(face) = self.selection.selected() else {
            log::warn!("coordinate edit rejected: no face selected");
            return Err(QuadEditError::NoSelection);
        };
        face.vertex(vertex_index).ok_or_else(|| {
            log::warn!("coordinate edit rejected: face {} has no vertex {vertex_index}", face.id());
            QuadEditError::VertexIndexOutOfRange(vertex_index)
        })
    }

    /// Moves the whole model by `delta` with a single model notification.
    pub fn translate_all(&self, delta: Vec3) {
        self.model.translate_all(delta);
    }

    /// Removes the selected face from the model.
    ///
    /// Returns the removed face; `None` if nothing was selected.
    pub fn remove_selected(&self) -> Option<Face> {
        let face = self.selection.selected()?;
        self.model.remove_face(&face);
        self.selection.clear();
        Some(face)
    }

    /// Builds an export document for the current model and selection.
    pub fn export(&self, settings: &ExportSettings) -> Result<ExportDocument> {
        let selected = self.selection.selected();
        ExportDocument::build(&self.model.faces(), selected.as_ref(), settings)
    }

    /// Builds an export with the configured default settings.
    pub fn export_default(&self) -> Result<ExportDocument> {
        self.export(&self.options.export)
    }

    /// Exports and writes the document as JSON.
    pub fn export_json<W: Write>(&self, settings: &ExportSettings, writer: W) -> Result<()> {
        let document = self.export(settings)?;
        document.write_json(writer)?;
        log::info!("exported {} faces", document.face_count());
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
