// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full conversion runs on inline STEP files

use ifc_json_export::{build_records, run, unrecognized_products, ExportConfig, ExportError};
use ifc_json_model::IfcModel;
use ifc_json_parser::ParsedModel;
use serde_json::Value;
use std::fs;
use std::path::Path;

const BOX_WALL: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [ReferenceView]'),'2;1');
FILE_NAME('box.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#2=IFCUNITASSIGNMENT((#1));
#3=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Project',$,$,$,$,$,#2);
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCAXIS2PLACEMENT3D(#10,$,$);
#12=IFCLOCALPLACEMENT($,#11);
#20=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1.,1.);
#21=IFCDIRECTION((0.,0.,1.));
#22=IFCEXTRUDEDAREASOLID(#20,#11,#21,1.);
#23=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#22));
#24=IFCPRODUCTDEFINITIONSHAPE($,$,(#23));
#30=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Box',$,$,#12,#24,'T-1',.STANDARD.);
#31=IFCWALL('1kTvXnbbzCWw8lcMd1dR4o',$,'Unplaced',$,$,#12,$,$,$);
#40=IFCQUANTITYVOLUME('NetVolume',$,$,0.5,$);
#41=IFCQUANTITYAREA('NetSideArea',$,$,1.,$);
#42=IFCQUANTITYVOLUME('NetVolume',$,$,1.,$);
#43=IFCELEMENTQUANTITY('3aLnuZ5Fz9ZgV3nIedlcVh',$,'Qto_WallBaseQuantities',$,$,(#40,#41,#42));
#44=IFCRELDEFINESBYPROPERTIES('0Ltsv3Ndn9JvN0Nr5hrU5o',$,$,$,(#30,#31),#43);
#50=IFCDOCUMENTREFERENCE('http://example.com/spec.pdf','SPEC-001','Spec',$,$);
#51=IFCRELASSOCIATESDOCUMENT('1sYsK7VJn1XPzKz0d2XfAq',$,$,$,(#30),#50);
ENDSEC;
END-ISO-10303-21;
"#;

/// Same box plus a wall whose extrusion has zero depth
fn with_broken_wall() -> String {
    BOX_WALL.replace(
        "ENDSEC;\nEND-ISO",
        "#60=IFCEXTRUDEDAREASOLID(#20,#11,#21,0.);\n\
         #61=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#60));\n\
         #62=IFCPRODUCTDEFINITIONSHAPE($,$,(#61));\n\
         #63=IFCWALL('3vB2YO$MX4xv5uCqZZG05x',$,'Broken',$,$,#12,#62,$,$);\n\
         ENDSEC;\nEND-ISO",
    )
}

fn write_input(dir: &Path, content: &str) -> ExportConfig {
    let input = dir.join("model.ifc");
    fs::write(&input, content).unwrap();
    let mut config = ExportConfig::new(input);
    config.output_dir = dir.join("out");
    config
}

fn read_output(config: &ExportConfig) -> Value {
    serde_json::from_str(&fs::read_to_string(config.output_path()).unwrap()).unwrap()
}

#[test]
fn box_wall_exports_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(dir.path(), BOX_WALL);

    let summary = run(&config).unwrap();
    assert_eq!(summary.products, 2);
    assert_eq!(summary.records, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.output, config.output_path());

    let document = read_output(&config);
    let data = document["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);

    let record = data[0].as_object().unwrap();
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "id",
            "type",
            "globalId",
            "name",
            "tag",
            "predefinedType",
            "documentReferences",
            "quantityData",
            "points"
        ]
    );

    assert_eq!(record["id"], 30);
    assert_eq!(record["type"], "IfcWall");
    assert_eq!(record["globalId"], "2O2Fr$t4X7Zf8NOew3FLOH");
    assert_eq!(record["predefinedType"], "STANDARD");
    assert_eq!(record["documentReferences"], serde_json::json!(["SPEC-001"]));

    let quantities = record["quantityData"].as_object().unwrap();
    assert_eq!(quantities["NetVolume"], 1.0);
    assert_eq!(quantities["NetSideArea"], 1.0);
    assert_eq!(
        quantities.keys().collect::<Vec<_>>(),
        vec!["NetVolume", "NetSideArea"]
    );

    let points = record["points"].as_array().unwrap();
    assert_eq!(points.len(), 12);
    for triangle in points {
        let triangle = triangle.as_array().unwrap();
        assert_eq!(triangle.len(), 3);
        for point in triangle {
            let point = point.as_array().unwrap();
            assert_eq!(point.len(), 3);
            assert!(point.iter().all(|c| c.as_f64().is_some_and(f64::is_finite)));
        }
    }
}

#[test]
fn mep_classes_are_exported_as_products() {
    let unitary = BOX_WALL.replace("#30=IFCWALL(", "#30=IFCUNITARYEQUIPMENT(");
    let model = ParsedModel::parse(&unitary).unwrap();

    let conversion = build_records(&model, &ExportConfig::new("unused.ifc")).unwrap();
    assert_eq!(conversion.products, 2);
    assert_eq!(conversion.records.len(), 1);
    assert_eq!(
        conversion.records[0].get("type"),
        Some(&Value::from("IfcUnitaryEquipment"))
    );
    assert!(unrecognized_products(model.resolver()).is_empty());
}

#[test]
fn output_is_indented_with_four_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(dir.path(), BOX_WALL);
    run(&config).unwrap();

    let text = fs::read_to_string(config.output_path()).unwrap();
    assert!(text.starts_with("{\n    \"data\": [\n        {\n            \"id\": 30,"));
}

#[test]
fn geometry_failure_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(dir.path(), &with_broken_wall());

    let err = run(&config).unwrap_err();
    assert!(err.is_recoverable_geometry());
    assert!(!config.output_path().exists());
}

#[test]
fn skip_policy_drops_only_the_failed_product() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_input(dir.path(), &with_broken_wall());
    config.skip_failed_geometry = true;

    let summary = run(&config).unwrap();
    assert_eq!(summary.products, 3);
    assert_eq!(summary.records, 1);
    assert_eq!(summary.skipped, 1);

    let document = read_output(&config);
    assert_eq!(document["data"][0]["name"], "Box");
}

#[test]
fn local_coordinates_keep_the_shape_frame() {
    let moved = BOX_WALL.replace(
        "#12=IFCLOCALPLACEMENT($,#11);",
        "#13=IFCCARTESIANPOINT((10.,0.,0.));\n\
         #14=IFCAXIS2PLACEMENT3D(#13,$,$);\n\
         #12=IFCLOCALPLACEMENT($,#14);",
    );
    let model = ParsedModel::parse(&moved).unwrap();

    let mut config = ExportConfig::new("unused.ifc");
    let world = build_records(&model, &config).unwrap();
    config.tessellation.use_world_coords = false;
    let local = build_records(&model, &config).unwrap();

    let max_x = |records: &[ifc_json_export::Record]| {
        records[0].get("points").unwrap().as_array().unwrap().iter()
            .flat_map(|t| t.as_array().unwrap().iter())
            .map(|p| p[0].as_f64().unwrap())
            .fold(f64::MIN, f64::max)
    };
    assert!((max_x(&world.records) - 10.5).abs() < 1e-9);
    assert!((max_x(&local.records) - 0.5).abs() < 1e-9);
}

#[test]
fn malformed_quantity_is_fatal_even_when_skipping() {
    let broken = BOX_WALL.replace(
        "#40=IFCQUANTITYVOLUME('NetVolume',$,$,0.5,$);",
        "#40=IFCQUANTITYVOLUME('NetVolume',$,$,$,$);",
    );
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_input(dir.path(), &broken);
    config.skip_failed_geometry = true;

    assert!(matches!(run(&config), Err(ExportError::Data(_))));
}

#[test]
fn non_step_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(dir.path(), "{\"not\": \"ifc\"}");
    assert!(matches!(run(&config), Err(ExportError::Model(_))));
}
