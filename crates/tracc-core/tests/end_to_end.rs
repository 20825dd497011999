//! Startup load through render: fixture files on disk, source fallback,
//! join, view switches and the fills observers see.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use tracc_core::palette::{BIVARIATE_COLORS, NO_DATA_COLOR, UNJOINED_COLOR};
use tracc_core::{
    load_atlas, AtlasConfig, AtlasError, FillLayer, JoinReport, Legend, LoadedAtlas, Mode, Palette,
    RenderFrame, ViewController,
};

const RECORDS: &str = r#"[
  {"code_insee":"75056","nom_offici":"Paris","population":2133111,
   "drias_Cumu":640,"drias_Cu_1":12,"drias_Cu_2":-3,"drias_Inte":10,"drias_Inte_1":1.5,"drias_Fré":6},
  {"code_insee":"13055","nom_offici":"Marseille","population":873076,
   "drias_Cumu":520,"drias_Cu_1":-8,"drias_Cu_2":-15,"drias_Inte":30,"drias_Inte_1":4.0,"drias_Fré":2},
  {"code_insee":"69123","nom_offici":"Lyon","population":522250,
   "drias_Cumu":830,"drias_Cu_1":5,"drias_Cu_2":null,"drias_Inte":20,"drias_Inte_1":2.5,"drias_Fré":4},
  {"code_insee":"2A004","nom_offici":"Ajaccio",
   "drias_Cumu":700,"drias_Cu_1":0,"drias_Cu_2":-1,"drias_Inte":25,"drias_Inte_1":3.0,"drias_Fré":null}
]"#;

const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"code":"75056","nom":"Paris"},
   "geometry":{"type":"Polygon","coordinates":[[[2.22,48.81],[2.47,48.81],[2.47,48.90],[2.22,48.81]]]}},
  {"type":"Feature","properties":{"INSEE_COM":"13055"},
   "geometry":{"type":"Polygon","coordinates":[[[5.22,43.17],[5.53,43.17],[5.53,43.39],[5.22,43.17]]]}},
  {"type":"Feature","properties":{"insee":"69123"},
   "geometry":{"type":"MultiPolygon","coordinates":[[[[4.77,45.70],[4.90,45.70],[4.90,45.81],[4.77,45.70]]]]}},
  {"type":"Feature","properties":{"INSEE_COM":"2A004"},"geometry":null},
  {"type":"Feature","properties":{"code":"01001"},"geometry":null}
]}"#;

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

fn fixture_config(dir: &Path) -> AtlasConfig {
    AtlasConfig {
        data_sources: vec![write(dir, "communes_drias.json", RECORDS)],
        geometry_sources: vec![
            dir.join("absent.geojson").display().to_string(),
            write(dir, "communes.geojson", GEOJSON),
        ],
        variables: None,
    }
}

#[test]
fn load_falls_back_and_reports_join() {
    let dir = tempfile::tempdir().unwrap();
    let LoadedAtlas { atlas, features, join } = load_atlas(&fixture_config(dir.path())).unwrap();
    assert_eq!(features.len(), 5);
    assert_eq!(atlas.index().len(), 4);
    assert_eq!(join, JoinReport { joined: 4, unjoined: 1 });
}

#[test]
fn geometry_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture_config(dir.path());
    config.geometry_sources = vec![write(dir.path(), "broken.geojson", "{ \"features\": 7 }")];
    match load_atlas(&config) {
        Err(AtlasError::NoSourceAvailable { dataset, tried }) => {
            assert_eq!(dataset, "geometry");
            assert_eq!(tried.len(), 1);
        }
        Err(other) => panic!("expected NoSourceAvailable, got {other:?}"),
        Ok(_) => panic!("expected NoSourceAvailable, got a loaded atlas"),
    }
}

#[test]
fn view_switches_recolor_through_observer() {
    let dir = tempfile::tempdir().unwrap();
    let LoadedAtlas { atlas, features, .. } = load_atlas(&fixture_config(dir.path())).unwrap();
    let atlas = Rc::new(atlas);

    let layer = Rc::new(RefCell::new(FillLayer::new(&features)));
    let mut view = ViewController::new(atlas.catalog().clone());
    {
        let atlas = Rc::clone(&atlas);
        let layer = Rc::clone(&layer);
        view.subscribe(move |state| layer.borrow_mut().recolor(&atlas, state));
    }

    view.refresh();
    assert_eq!(view.state().variable, "drias_Cumu");
    {
        // Cumu over {520, 640, 700, 830}: breaks5 = [520, 640, 700, 830]
        let fills = layer.borrow();
        let blues = Palette::Blues.colors();
        assert_eq!(fills.fills()[0], blues[2]);
        assert_eq!(fills.fills()[1], blues[1]);
        assert_eq!(fills.fills()[2], blues[4]);
        assert_eq!(fills.fills()[3], blues[3]);
        assert_eq!(fills.fills()[4], UNJOINED_COLOR);
    }

    view.select_variable("drias_Cu_2").unwrap();
    assert_eq!(layer.borrow().fills()[2], NO_DATA_COLOR);

    view.select_bivariate();
    assert_eq!(view.state().mode, Mode::Bivariate);
    {
        // Inte over {10, 20, 25, 30}: breaks3 = [20, 25]
        // Fré over {2, 4, 6}: breaks3 = [4, 6]
        let fills = layer.borrow();
        assert_eq!(fills.fills()[0], BIVARIATE_COLORS[2][0]);
        assert_eq!(fills.fills()[1], BIVARIATE_COLORS[0][2]);
        assert_eq!(fills.fills()[2], BIVARIATE_COLORS[1][1]);
        assert_eq!(fills.fills()[3], NO_DATA_COLOR);
        assert_eq!(fills.fills()[4], UNJOINED_COLOR);
    }

    assert!(view.select_variable("drias_Nope").is_err());
    assert_eq!(view.state().mode, Mode::Bivariate);

    view.select_univariate();
    assert_eq!(view.state().variable, "drias_Cu_2");
    assert_eq!(layer.borrow().fills()[2], NO_DATA_COLOR);
}

#[test]
fn listeners_receive_a_recolored_frame() {
    let dir = tempfile::tempdir().unwrap();
    let LoadedAtlas { atlas, features, .. } = load_atlas(&fixture_config(dir.path())).unwrap();
    let atlas = Rc::new(atlas);
    let layer = Rc::new(RefCell::new(FillLayer::new(&features)));
    let frames: Rc<RefCell<Vec<RenderFrame>>> = Rc::default();

    let mut view = ViewController::new(atlas.catalog().clone());
    {
        let atlas = Rc::clone(&atlas);
        let layer = Rc::clone(&layer);
        let frames = Rc::clone(&frames);
        view.subscribe(move |state| {
            let frame = atlas.render(state, &mut layer.borrow_mut());
            frames.borrow_mut().push(frame);
        });
    }

    view.select_bivariate();
    view.select_variable("drias_Cu_2").unwrap();

    let frames = frames.borrow();
    assert_eq!(frames.len(), 2);

    let bivariate = &frames[0];
    assert_eq!(bivariate.state.mode, Mode::Bivariate);
    assert_eq!(bivariate.fills[0], BIVARIATE_COLORS[2][0]);
    assert!(matches!(bivariate.legend, Some(Legend::Bivariate { .. })));

    let univariate = &frames[1];
    assert_eq!(univariate.state.variable, "drias_Cu_2");
    assert_eq!(univariate.fills[2], NO_DATA_COLOR);
    assert!(matches!(univariate.legend, Some(Legend::Univariate { .. })));
    // The last frame delivered is what the layer now holds.
    assert_eq!(layer.borrow().fills(), univariate.fills.as_slice());
}

#[test]
fn search_and_panels_from_loaded_data() {
    let dir = tempfile::tempdir().unwrap();
    let LoadedAtlas { atlas, features, .. } = load_atlas(&fixture_config(dir.path())).unwrap();

    let hits = atlas.search("lyo");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code_insee, "69123");

    let zoom = tracc_core::zoom_target(&features, hits[0].code_insee).unwrap();
    assert_eq!(zoom.bounds.min_lon, 4.77);
    assert_eq!(zoom.padding_px, 60);

    let view = ViewController::new(atlas.catalog().clone());
    let tip = atlas.tooltip(view.state(), "75056").unwrap();
    assert_eq!(tip.lines, ["640 mm/an"]);
    assert!(atlas.tooltip(view.state(), "01001").is_none());
    assert!(atlas.legend(view.state()).is_some());
}
