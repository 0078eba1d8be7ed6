use layers::{
    BackgroundLayer, CatalogLayer, FieldLayer, FootprintLayer, GraticuleLayer, Layer, LocalizationLayer,
    RenderContext, SkyStyle,
};
use render::Scene;
use scene::{
    CatalogFeatureSet, DisplayOptions, FieldSelection, FootprintSelection, Instrument, LocalizationContour,
    ObservationFootprintSet, ViewState,
};
use tracing::debug;

use crate::config::SkyMapConfig;

/// Everything one composition pass reads.
#[derive(Debug, Clone, Copy)]
pub struct SceneInputs<'a> {
    pub view: &'a ViewState,
    pub display: DisplayOptions,
    pub contour: Option<&'a LocalizationContour>,
    pub sources: Option<&'a CatalogFeatureSet>,
    pub galaxies: Option<&'a CatalogFeatureSet>,
    pub instrument: Option<&'a Instrument>,
    pub observations: Option<&'a ObservationFootprintSet>,
    pub field_selection: &'a FieldSelection,
    pub footprint_selection: &'a FootprintSelection,
}

/// Rebuilds the frame from scratch on every input change.
///
/// Layers are stacked bottom to top: background, graticule, localization,
/// sources, galaxies, instrument fields, observations. Toggled-off layers
/// contribute nothing.
#[derive(Debug, Clone)]
pub struct Compositor {
    scene: Scene,
    style: SkyStyle,
    graticule: GraticuleLayer,
    marker_radius_px: f64,
    airmass_threshold: f64,
    limb_slack_rad: f64,
}

impl Compositor {
    pub fn new(config: &SkyMapConfig) -> Self {
        Self {
            scene: Scene::new(),
            style: config.style,
            graticule: GraticuleLayer::new(config.graticule_step_deg, config.graticule_sample_deg),
            marker_radius_px: config.marker_radius_px,
            airmass_threshold: config.airmass_threshold,
            limb_slack_rad: config.limb_slack_rad,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn recomposite(&mut self, inputs: &SceneInputs<'_>) -> &Scene {
        let ctx = RenderContext {
            projection: inputs.view.projection(self.limb_slack_rad),
            style: &self.style,
            marker_radius_px: self.marker_radius_px,
            airmass_threshold: self.airmass_threshold,
            field_selection: inputs.field_selection,
            footprint_selection: inputs.footprint_selection,
        };
        let display = inputs.display;

        let localization = LocalizationLayer::new(inputs.contour);
        let sources = inputs.sources.map(CatalogLayer::new);
        let galaxies = inputs.galaxies.map(CatalogLayer::new);
        let fields = inputs.instrument.map(FieldLayer::new);
        let observations = inputs.observations.map(FootprintLayer::new);

        let mut stack: Vec<&dyn Layer> = vec![&BackgroundLayer, &self.graticule];
        if display.localization {
            stack.push(&localization);
        }
        if display.sources
            && let Some(layer) = &sources
        {
            stack.push(layer);
        }
        if display.galaxies
            && let Some(layer) = &galaxies
        {
            stack.push(layer);
        }
        if display.instrument
            && let Some(layer) = &fields
        {
            stack.push(layer);
        }
        if display.observations
            && let Some(layer) = &observations
        {
            stack.push(layer);
        }

        self.scene.clear();
        for layer in stack {
            let primitives = layer.render(&ctx);
            debug!(layer = layer.kind().as_str(), count = primitives.len(), "composited layer");
            self.scene.extend(primitives);
        }
        debug!(
            generation = self.scene.generation(),
            primitives = self.scene.len(),
            "scene recomposited"
        );
        &self.scene
    }
}
