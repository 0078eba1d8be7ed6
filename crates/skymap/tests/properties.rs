use approx::assert_abs_diff_eq;
use foundation::color::filter_color;
use foundation::math::{LonLat, Rotation, angular_distance};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use render::{HitTarget, LayerKind, Shape};
use scene::{
    CatalogEntry, CatalogFeatureSet, CatalogKind, ContourKey, FieldId, FieldSelection, GeoFeature, Instrument,
    InstrumentField, LocalizationContour, ViewState,
};
use skymap::{SkyMap, SkyMapConfig, SkyMapHost};

#[derive(Debug, Default)]
struct Host {
    selection: FieldSelection,
    changes: usize,
}

impl SkyMapHost for Host {
    fn selected_fields(&self) -> &FieldSelection {
        &self.selection
    }

    fn selected_fields_mut(&mut self) -> &mut FieldSelection {
        &mut self.selection
    }

    fn on_selected_fields_change(&mut self, _ids: &[FieldId]) {
        self.changes += 1;
    }
}

fn square(lon: f64, lat: f64) -> Vec<LonLat> {
    vec![
        LonLat::new(lon - 2.0, lat - 2.0),
        LonLat::new(lon + 2.0, lat - 2.0),
        LonLat::new(lon + 2.0, lat + 2.0),
        LonLat::new(lon - 2.0, lat + 2.0),
        LonLat::new(lon - 2.0, lat - 2.0),
    ]
}

fn ztf() -> Instrument {
    Instrument::new(
        "ZTF",
        vec!["ztfg".into(), "ztfr".into(), "ztfi".into()],
        vec![
            InstrumentField::new(1, LonLat::new(0.0, 0.0), vec![square(0.0, 0.0)]).with_airmass(1.8),
            InstrumentField::new(2, LonLat::new(15.0, 0.0), vec![square(15.0, 0.0)]).with_airmass(3.0),
        ],
    )
}

fn map_with_fields() -> SkyMap<Host> {
    let mut map =
        SkyMap::new(Host::default(), SkyMapConfig::default(), 400.0, 400.0, Some(Rotation::identity())).unwrap();
    map.set_instrument(Some(ztf()));
    map
}

/// Screen position of a field's center under the current view.
fn field_pixel(map: &SkyMap<Host>, id: FieldId) -> (f64, f64) {
    let field = map.instrument().and_then(|i| i.field(id)).unwrap();
    let p = map.view().projection(0.0).project(field.center).unwrap();
    (p.x, p.y)
}

fn click(map: &mut SkyMap<Host>, (x, y): (f64, f64)) {
    map.pointer_down(x, y);
    map.pointer_up(x, y);
}

fn field_fill(map: &SkyMap<Host>, id: FieldId) -> Option<foundation::color::Color> {
    map.scene()
        .layer(LayerKind::Instrument)
        .find(|p| p.hit == Some(HitTarget::Field(id)))
        .and_then(|p| p.style.fill)
}

proptest! {
    #[test]
    fn projection_round_trips_front_facing_points(
        lambda in -180.0f64..180.0,
        phi in -90.0f64..90.0,
        lon in -180.0f64..180.0,
        lat in -89.0f64..89.0,
    ) {
        let view = ViewState::new(500.0, 300.0, Rotation::new(lambda, phi, 0.0), 0.95);
        let proj = view.projection(0.0);
        let p = LonLat::new(lon, lat);
        prop_assume!(angular_distance(p.to_unit_vector(), proj.center().to_unit_vector()) < 1.5);

        let back = proj.invert(proj.project(p).unwrap()).unwrap();
        prop_assert!(angular_distance(p.to_unit_vector(), back.to_unit_vector()) < 1e-7);
    }

    #[test]
    fn far_hemisphere_entries_are_never_drawn(
        lambda in -180.0f64..180.0,
        phi in -90.0f64..90.0,
        lon in -180.0f64..180.0,
        lat in -89.0f64..89.0,
    ) {
        let mut map = SkyMap::new(
            Host::default(),
            SkyMapConfig::default(),
            400.0,
            400.0,
            Some(Rotation::new(lambda, phi, 0.0)),
        )
        .unwrap();
        let position = LonLat::new(lon, lat);
        let center = map.view().projection(0.0).center();
        let distance = angular_distance(position.to_unit_vector(), center.to_unit_vector());
        prop_assume!(distance > std::f64::consts::FRAC_PI_2 + 1e-6);

        map.set_sources(Some(CatalogFeatureSet::new(
            CatalogKind::Sources,
            vec![CatalogEntry { position, name: "far".into(), url: None }],
        )));
        map.set_instrument(Some(Instrument::new(
            "ZTF",
            vec!["ztfg".into()],
            vec![InstrumentField::new(7, position, vec![vec![position, position, position]])],
        )));

        prop_assert_eq!(map.scene().layer(LayerKind::Sources).filter(|p| p.visible).count(), 0);
        prop_assert_eq!(map.scene().layer(LayerKind::Instrument).count(), 0);
    }
}

#[test]
fn filter_colour_is_deterministic() {
    let filters = ["g", "r", "i"];
    assert_eq!(filter_color(&filters).to_hex(), filter_color(&filters).to_hex());
    assert_eq!(filter_color(&filters).to_hex(), "#de9001");
    assert_eq!(filter_color(&["g", "r"]), filter_color(&["g", "r"]));
}

#[test]
fn clicking_a_field_twice_restores_membership() {
    let mut map = map_with_fields();
    let at = field_pixel(&map, 1);
    click(&mut map, at);
    click(&mut map, at);
    assert!(!map.host().selected_fields().contains(1));
    assert_eq!(map.host().changes, 2);

    let (first, second) = (field_pixel(&map, 1), field_pixel(&map, 2));
    click(&mut map, first);
    click(&mut map, second);
    assert_eq!(map.host().selected_fields().ids(), &[1, 2]);
}

#[test]
fn drag_over_field_rotates_but_click_toggles_once() {
    let mut map = map_with_fields();
    let (x, y) = field_pixel(&map, 1);
    map.pointer_down(x, y);
    map.pointer_move(x + 1.0, y);
    map.pointer_up(x + 1.0, y);
    assert!(map.host().selected_fields().is_empty());
    assert_eq!(map.host().changes, 0);
    assert!(map.rotation().lambda_deg > 0.0);

    let at = field_pixel(&map, 1);
    click(&mut map, at);
    assert_eq!(map.host().selected_fields().ids(), &[1]);
    assert_eq!(map.host().changes, 1);
}

#[test]
fn later_request_wins_regardless_of_resolution_order() {
    for a_first in [true, false] {
        let mut map =
            SkyMap::new(Host::default(), SkyMapConfig::default(), 400.0, 400.0, Some(Rotation::identity())).unwrap();
        let key_a = ContourKey::new("2019-04-25T08:18:05", "bayestar.fits.gz");
        let key_b = ContourKey::new("2019-04-25T08:18:05", "LALInference.fits.gz");
        let req_a = map.request_localization(key_a.clone());
        let req_b = map.request_localization(key_b.clone());
        let a = LocalizationContour::new(1, key_a, vec![GeoFeature::point(-30.0, 0.0)]);
        let b = LocalizationContour::new(2, key_b, vec![GeoFeature::point(30.0, 0.0)]);

        if a_first {
            map.resolve_localization(req_a, a);
            assert!(map.active_contour().is_none());
            map.resolve_localization(req_b, b);
        } else {
            map.resolve_localization(req_b, b);
            map.resolve_localization(req_a, a);
        }

        assert_eq!(map.active_contour().map(|c| c.id), Some(2));
        let markers: Vec<_> = map
            .scene()
            .layer(LayerKind::Localization)
            .filter_map(|p| match p.shape {
                Shape::Disk { center, .. } => Some(center),
                _ => None,
            })
            .collect();
        assert_eq!(markers.len(), 1);
        assert!(markers[0].x > 200.0);
    }
}

#[test]
fn observability_and_selection_drive_field_fill() {
    let mut map = map_with_fields();
    let white = foundation::color::Color::WHITE;
    let gray = foundation::color::Color::GRAY;
    assert_eq!(field_fill(&map, 1), Some(white));
    assert_eq!(field_fill(&map, 2), Some(gray));

    let at = field_pixel(&map, 2);
    click(&mut map, at);
    let hashed = filter_color(&["ztfg", "ztfr", "ztfi"]);
    assert_eq!(hashed.to_hex(), "#7ec245");
    assert_eq!(field_fill(&map, 2), Some(hashed));
    assert_eq!(field_fill(&map, 1), Some(white));
}

#[test]
fn missing_localization_draws_only_background_and_grid() {
    let map = SkyMap::new(Host::default(), SkyMapConfig::default(), 300.0, 200.0, None).unwrap();
    let kinds: std::collections::BTreeSet<_> = map.scene().primitives().iter().map(|p| p.layer).collect();
    assert_eq!(kinds.into_iter().collect::<Vec<_>>(), vec![LayerKind::Background, LayerKind::Graticule]);
    assert_abs_diff_eq!(map.view().scale(), 0.95 * 100.0, epsilon = 1e-12);
}

#[test]
fn malformed_field_and_contour_are_not_drawn() {
    let mut ring = square(0.0, 0.0);
    ring[2] = LonLat::new(f64::NAN, 0.0);
    let mut map =
        SkyMap::new(Host::default(), SkyMapConfig::default(), 400.0, 400.0, Some(Rotation::identity())).unwrap();
    map.set_instrument(Some(Instrument::new(
        "ZTF",
        vec!["ztfg".into()],
        vec![InstrumentField::new(1, LonLat::new(0.0, 0.0), vec![ring.clone()]).with_airmass(1.2)],
    )));
    let key = ContourKey::new("2019-04-25T08:18:05", "bayestar.fits.gz");
    let req = map.request_localization(key.clone());
    let band = GeoFeature::new(scene::Geometry::Polygon(vec![ring]));
    map.resolve_localization(req, LocalizationContour::new(1, key, vec![band]));

    assert_eq!(map.scene().layer(LayerKind::Instrument).count(), 0);
    assert_eq!(map.scene().layer(LayerKind::Localization).count(), 0);
}
