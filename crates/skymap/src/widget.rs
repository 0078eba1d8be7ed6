use foundation::math::{Rotation, Vec2};
use render::{HitTarget, Scene};
use scene::{
    CatalogFeatureSet, ContourKey, DisplayOptions, FieldId, FieldSelection, FootprintSelection, Instrument,
    LocalizationContour, ObservationFootprintSet, ViewState,
};
use streaming::{ContourCache, Request, Resolution};
use tracing::{debug, info};

use crate::compositor::{Compositor, SceneInputs};
use crate::config::{ConfigError, SkyMapConfig};
use crate::controller::{GestureController, Release};

/// The embedding application's side of the widget.
///
/// The host owns the field selection; the widget only mutates it while
/// handling a click, and reports every change right after.
pub trait SkyMapHost {
    fn selected_fields(&self) -> &FieldSelection;

    fn selected_fields_mut(&mut self) -> &mut FieldSelection;

    fn on_selected_fields_change(&mut self, _ids: &[FieldId]) {}

    /// Called once per finished drag with the final canonical rotation.
    fn on_rotation_change(&mut self, _rotation: Rotation) {}

    fn on_link_activated(&mut self, _href: &str) {}
}

type SelectionCallback = Box<dyn FnMut(&[FieldId])>;
type RotationCallback = Box<dyn FnMut(Rotation)>;
type LinkCallback = Box<dyn FnMut(&str)>;

/// A [`SkyMapHost`] built from closures.
#[derive(Default)]
pub struct CallbackHost {
    selection: FieldSelection,
    on_selection: Option<SelectionCallback>,
    on_rotation: Option<RotationCallback>,
    on_link: Option<LinkCallback>,
}

impl CallbackHost {
    pub fn new(selection: FieldSelection) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    pub fn on_selection(mut self, f: impl FnMut(&[FieldId]) + 'static) -> Self {
        self.on_selection = Some(Box::new(f));
        self
    }

    pub fn on_rotation(mut self, f: impl FnMut(Rotation) + 'static) -> Self {
        self.on_rotation = Some(Box::new(f));
        self
    }

    pub fn on_link(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_link = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for CallbackHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHost")
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl SkyMapHost for CallbackHost {
    fn selected_fields(&self) -> &FieldSelection {
        &self.selection
    }

    fn selected_fields_mut(&mut self) -> &mut FieldSelection {
        &mut self.selection
    }

    fn on_selected_fields_change(&mut self, ids: &[FieldId]) {
        if let Some(f) = self.on_selection.as_mut() {
            f(ids);
        }
    }

    fn on_rotation_change(&mut self, rotation: Rotation) {
        if let Some(f) = self.on_rotation.as_mut() {
            f(rotation);
        }
    }

    fn on_link_activated(&mut self, href: &str) {
        if let Some(f) = self.on_link.as_mut() {
            f(href);
        }
    }
}

/// One interactive sky map.
///
/// Every input setter recomposites the scene before returning, so the frame
/// and its click targets always reflect the latest inputs. Rotation set by the
/// host is never echoed back through `on_rotation_change`; only finished drags
/// are reported.
pub struct SkyMap<H: SkyMapHost> {
    host: H,
    config: SkyMapConfig,
    view: ViewState,
    /// False until the host or the user picks a rotation; the first active
    /// contour then centers the view.
    rotation_settled: bool,
    contours: ContourCache,
    sources: Option<CatalogFeatureSet>,
    galaxies: Option<CatalogFeatureSet>,
    instrument: Option<Instrument>,
    observations: Option<ObservationFootprintSet>,
    footprint_selection: FootprintSelection,
    display: DisplayOptions,
    controller: GestureController,
    compositor: Compositor,
}

impl<H: SkyMapHost> SkyMap<H> {
    pub fn new(
        host: H,
        config: SkyMapConfig,
        width: f64,
        height: f64,
        initial_rotation: Option<Rotation>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial_rotation = initial_rotation.filter(|rotation| {
            let finite = rotation.is_finite();
            if !finite {
                debug!(?rotation, "ignoring non-finite initial rotation");
            }
            finite
        });
        let view = ViewState::new(
            width,
            height,
            initial_rotation.unwrap_or_default(),
            config.scale_fraction,
        );
        let mut map = Self {
            host,
            config,
            view,
            rotation_settled: initial_rotation.is_some(),
            contours: ContourCache::with_capacity(config.contour_capacity),
            sources: None,
            galaxies: None,
            instrument: None,
            observations: None,
            footprint_selection: FootprintSelection::new(),
            display: DisplayOptions::default(),
            controller: GestureController::new(config.drag_sensitivity, config.click_tolerance_px),
            compositor: Compositor::new(&config),
        };
        map.refresh();
        Ok(map)
    }

    pub fn config(&self) -> &SkyMapConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutating the selection here must be followed by [`SkyMap::sync_selection`].
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scene(&self) -> &Scene {
        self.compositor.scene()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn rotation(&self) -> Rotation {
        self.view.rotation()
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    pub fn active_contour(&self) -> Option<&LocalizationContour> {
        self.contours.active()
    }

    pub fn instrument(&self) -> Option<&Instrument> {
        self.instrument.as_ref()
    }

    pub fn footprint_selection(&self) -> &FootprintSelection {
        &self.footprint_selection
    }

    /// Makes `key` the current localization; its contour shows once
    /// [`SkyMap::resolve_localization`] delivers the matching request.
    pub fn request_localization(&mut self, key: ContourKey) -> Request {
        let req = self.contours.request(key);
        self.refresh();
        req
    }

    pub fn clear_localization(&mut self) {
        self.contours.clear_current();
        self.refresh();
    }

    pub fn resolve_localization(&mut self, req: Request, contour: LocalizationContour) -> Resolution {
        let resolution = self.contours.resolve(req, contour);
        if resolution == Resolution::Activated {
            if !self.rotation_settled
                && let Some(center) = self.contours.active().and_then(LocalizationContour::center)
            {
                info!(lon = center.lon_deg, lat = center.lat_deg, "centering view on localization");
                self.view.set_rotation(Rotation::centering(center));
                self.rotation_settled = true;
            }
            self.refresh();
        }
        resolution
    }

    pub fn set_sources(&mut self, sources: Option<CatalogFeatureSet>) {
        self.sources = sources;
        self.refresh();
    }

    pub fn set_galaxies(&mut self, galaxies: Option<CatalogFeatureSet>) {
        self.galaxies = galaxies;
        self.refresh();
    }

    pub fn set_instrument(&mut self, instrument: Option<Instrument>) {
        self.instrument = instrument;
        self.refresh();
    }

    /// New observations start with nothing selected.
    pub fn set_observations(&mut self, observations: Option<ObservationFootprintSet>) {
        self.observations = observations;
        self.footprint_selection.clear();
        self.refresh();
    }

    pub fn set_display(&mut self, display: DisplayOptions) {
        self.display = display;
        self.refresh();
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        if !rotation.is_finite() {
            debug!(?rotation, "ignoring non-finite rotation");
            return;
        }
        self.view.set_rotation(rotation);
        self.rotation_settled = true;
        self.refresh();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.view.resize(width, height);
        self.refresh();
    }

    /// Redraws after the host changed its field selection directly.
    pub fn sync_selection(&mut self) {
        self.refresh();
    }

    pub fn refresh(&mut self) {
        let inputs = SceneInputs {
            view: &self.view,
            display: self.display,
            contour: self.contours.active(),
            sources: self.sources.as_ref(),
            galaxies: self.galaxies.as_ref(),
            instrument: self.instrument.as_ref(),
            observations: self.observations.as_ref(),
            field_selection: self.host.selected_fields(),
            footprint_selection: &self.footprint_selection,
        };
        self.compositor.recomposite(&inputs);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        let pos = Vec2::new(x, y);
        let scene = self.compositor.scene();
        let target = scene.hit_test(pos).cloned();
        let generation = scene.generation();
        self.controller.press(pos, target, generation);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let rotation = self.view.rotation();
        let scale = self.view.scale();
        if let Some(next) = self.controller.motion(Vec2::new(x, y), rotation, scale) {
            self.view.set_rotation(next);
            self.rotation_settled = true;
            self.refresh();
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        match self.controller.release(Vec2::new(x, y)) {
            Release::Ignored => {}
            Release::RotateEnd => self.finish_rotation(),
            Release::Click { at, target, generation } => {
                let scene = self.compositor.scene();
                // The frame the press saw is gone; resolve against the current one.
                let target = if generation == scene.generation() {
                    target
                } else {
                    scene.hit_test(at).cloned()
                };
                if let Some(target) = target {
                    self.activate(target);
                }
            }
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.controller.cancel() == Release::RotateEnd {
            self.finish_rotation();
        }
    }

    fn finish_rotation(&mut self) {
        let rotation = self.view.rotation();
        debug!(?rotation, "rotation finished");
        self.host.on_rotation_change(rotation);
    }

    fn activate(&mut self, target: HitTarget) {
        match target {
            HitTarget::Field(id) => {
                let selected = self.host.selected_fields_mut().toggle(id);
                debug!(field = id, selected, "field toggled");
                let ids = self.host.selected_fields().ids().to_vec();
                self.host.on_selected_fields_change(&ids);
                self.refresh();
            }
            HitTarget::Footprint(id) => {
                let selected = self.footprint_selection.toggle(id);
                debug!(footprint = id, selected, "footprint toggled");
                self.refresh();
            }
            HitTarget::Link(href) => {
                debug!(%href, "link activated");
                self.host.on_link_activated(&href);
            }
        }
    }
}

impl<H: SkyMapHost + std::fmt::Debug> std::fmt::Debug for SkyMap<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyMap")
            .field("host", &self.host)
            .field("view", &self.view)
            .field("display", &self.display)
            .field("primitives", &self.compositor.scene().len())
            .finish_non_exhaustive()
    }
}
