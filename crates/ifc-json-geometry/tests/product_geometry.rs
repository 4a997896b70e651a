// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation of parsed products end to end

use approx::assert_relative_eq;
use ifc_json_geometry::{GeometryRouter, TessellationSettings};
use ifc_json_model::{IfcModel, IfcType};
use ifc_json_parser::ParsedModel;

const COLUMN_IN_MILLIMETRES: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('column.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#2=IFCUNITASSIGNMENT((#1));
#3=IFCPROJECT('2O2Fr$t4X7Zf8NOew3FLOH',$,'Project',$,$,$,$,$,#2);
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCAXIS2PLACEMENT3D(#10,$,$);
#12=IFCCARTESIANPOINT((1000.,2000.,0.));
#13=IFCAXIS2PLACEMENT3D(#12,$,$);
#14=IFCLOCALPLACEMENT($,#11);
#15=IFCLOCALPLACEMENT(#14,#13);
#20=IFCCIRCLEPROFILEDEF(.AREA.,$,$,150.);
#21=IFCDIRECTION((0.,0.,1.));
#22=IFCEXTRUDEDAREASOLID(#20,#11,#21,3000.);
#23=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#22));
#24=IFCPRODUCTDEFINITIONSHAPE($,$,(#23));
#25=IFCCOLUMN('1kTvXnbbzCWw8lcMd1dR4o',$,'Column',$,$,#15,#24,$);
ENDSEC;
END-ISO-10303-21;
"#;

#[test]
fn column_is_placed_and_scaled_to_metres() {
    let model = ParsedModel::parse(COLUMN_IN_MILLIMETRES).unwrap();
    assert_relative_eq!(model.unit_scale(), 0.001);

    let columns = model.resolver().entities_by_type(&IfcType::IfcColumn).unwrap();
    assert_eq!(columns.len(), 1);

    let router = GeometryRouter::with_settings(TessellationSettings::default(), model.unit_scale());
    let mesh = router.process_product(&columns[0], model.resolver()).unwrap();
    assert!(mesh.triangle_count() > 0);

    let (coords, indices) = mesh.into_buffers();
    assert_eq!(coords.len() % 3, 0);
    assert_eq!(indices.len() % 3, 0);

    let points: Vec<&[f64]> = coords.chunks(3).collect();
    let max_z = points.iter().map(|p| p[2]).fold(f64::MIN, f64::max);
    let min_x = points.iter().map(|p| p[0]).fold(f64::MAX, f64::min);
    let max_x = points.iter().map(|p| p[0]).fold(f64::MIN, f64::max);

    assert_relative_eq!(max_z, 3.0, epsilon = 1e-9);
    assert_relative_eq!(min_x, 0.85, epsilon = 1e-9);
    assert_relative_eq!(max_x, 1.15, epsilon = 1e-9);
    assert!(points.iter().all(|p| (p[1] - 2.0).abs() <= 0.15 + 1e-9));
}
