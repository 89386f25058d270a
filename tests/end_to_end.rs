use cdl_schema::cdl::CdlParser;
use cdl_schema::domain::Domain;
use cdl_schema::schema::{SchemaDocument, SchemaGenerator};
use cdl_schema::units::UnitRegistry;
use cdl_schema::validate::{PolicyKind, StandardAttrs};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::path::Path;

const MINIMAL: &str = r#"netcdf t { dimensions: time = UNLIMITED; coil = 1; variables: double time(time); time:units = "s"; double coil_current(time,coil); coil_current:units = "A"; }"#;

fn fixture(relative: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

fn generate_at(cdl: &str, when: DateTime<Utc>) -> SchemaDocument {
    let unit = CdlParser::new().parse_str(cdl, "t.cdl").unwrap();
    SchemaGenerator::default()
        .generate_at(&unit, "t.schema.json", when)
        .unwrap()
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn minimal_single_line_cdl() {
    let schema = generate_at(MINIMAL, Utc::now()).body;
    let dims = &schema["properties"]["dimensions"]["properties"];
    assert_eq!(keys(dims), ["time", "coil"]);
    for name in ["time", "coil"] {
        assert_eq!(dims[name]["type"], "integer");
        assert_eq!(dims[name]["minimum"], 1);
    }

    let vars = &schema["properties"]["variables"];
    assert_eq!(keys(&vars["properties"]), ["time", "coil_current"]);
    assert_eq!(vars["required"], json!(["time", "coil_current"]));
    assert_eq!(
        vars["properties"]["coil_current"]["properties"]["dimensions"]["minItems"],
        2
    );
}

#[test]
fn property_counts_match_declarations() {
    let unit = CdlParser::new()
        .parse_file(&fixture("pf_active/coil_current.cdl"))
        .unwrap();
    let schema = SchemaGenerator::default()
        .generate(&unit, "coil-current.schema.json")
        .unwrap();

    let props = &schema.body["properties"];
    assert_eq!(keys(&props["dimensions"]["properties"]).len(), unit.dimensions.len());
    assert_eq!(keys(&props["variables"]["properties"]).len(), unit.variables.len());
    assert_eq!(unit.dimensions.len(), 2);
    assert_eq!(unit.variables.len(), 3);
}

#[test]
fn regeneration_differs_only_in_timestamp() {
    let first = generate_at(MINIMAL, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let second = generate_at(MINIMAL, Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap());
    assert_ne!(first.body, second.body);

    let strip = |mut body: Value| {
        body["x-source"]
            .as_object_mut()
            .unwrap()
            .remove("generated");
        body
    };
    assert_eq!(strip(first.body), strip(second.body));
}

#[test]
fn single_and_multi_line_cdl_agree() {
    let multi = "netcdf t {\n\
        dimensions:\n\
        \ttime = UNLIMITED ;\n\
        \tcoil = 1 ;\n\
        variables:\n\
        \tdouble time(time) ;\n\
        \t\ttime:units = \"s\" ;\n\
        \tdouble coil_current(time, coil) ;\n\
        \t\tcoil_current:units = \"A\" ;\n\
        }\n";
    let when = DateTime::<Utc>::UNIX_EPOCH;
    assert_eq!(generate_at(MINIMAL, when), generate_at(multi, when));
}

#[test]
fn polygon_geometry_container() {
    let unit = CdlParser::new()
        .parse_file(&fixture("base/polygon_geometry.cdl"))
        .unwrap();
    let schema = SchemaGenerator::default()
        .generate(&unit, "polygon-geometry.schema.json")
        .unwrap();
    assert_eq!(schema.domain, Domain::Base);

    let props = &schema.body["properties"];
    assert_eq!(props["dimensions"]["properties"]["polygon_node"]["minimum"], 3);
    assert_eq!(props["dimensions"]["properties"]["polygon_element"]["minimum"], 1);
    assert_eq!(props["dimensions"]["properties"]["polygon"]["minimum"], 1);

    let geometry = &props["variables"]["properties"]["polygon_geometry"];
    assert_eq!(
        geometry["required"],
        json!(["geometry_type", "node_coordinates", "node_count"])
    );
    assert_eq!(
        geometry["properties"]["geometry_type"]["enum"],
        json!(["polygon", "line", "point"])
    );
    assert!(geometry["properties"].get("dimensions").is_none());
    assert_eq!(
        props["variables"]["required"],
        json!(["polygon_geometry", "r", "z"])
    );
}

#[test]
fn pf_prefix_routes_to_pf_active() {
    let unit = CdlParser::new()
        .parse_file(&fixture("pf_active/coil_current.cdl"))
        .unwrap();
    let schema = SchemaGenerator::new("https://example.org/")
        .generate(&unit, "coil-current.schema.json")
        .unwrap();
    assert_eq!(schema.domain, Domain::PfActive);
    assert_eq!(
        schema.body["$id"],
        "https://example.org/pf_active/coil-current.schema.json"
    );
    assert_eq!(schema.body["title"], "PF Active Coil Current");
}

#[test]
fn standard_attrs_policies() {
    let registry = UnitRegistry::shared();

    let err = StandardAttrs::new(Some("Air Temperature"), Some("K"))
        .validate(registry)
        .unwrap_err();
    assert_eq!(err.kind(), PolicyKind::Naming);

    let err = StandardAttrs::new(Some("air_temperature"), None)
        .validate(registry)
        .unwrap_err();
    assert_eq!(err.kind(), PolicyKind::Convention);

    assert!(StandardAttrs::new(Some("air_temperature"), Some("K"))
        .validate(registry)
        .is_ok());
}
