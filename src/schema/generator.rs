//! JSON Schema generation from a parsed CDL unit.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use super::SchemaDocument;
use crate::cdl::{Dimension, ParsedUnit, Variable};
use crate::domain::Domain;
use crate::error::Result;

/// Base URL used for `$id` when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://schemas.standard-interfaces.org";

/// Dialect written to `$schema`.
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Pattern for a single CDL identifier.
pub const IDENTIFIER_PATTERN: &str = "^[a-zA-Z_][a-zA-Z0-9_]*$";

/// Pattern for `node_coordinates`: two space-separated identifiers.
pub const NODE_COORDINATES_PATTERN: &str =
    r"^[a-zA-Z_][a-zA-Z0-9_]*\s+[a-zA-Z_][a-zA-Z0-9_]*$";

/// Allowed `geometry_type` values.
pub const GEOMETRY_TYPES: [&str; 3] = ["polygon", "line", "point"];

/// Attributes a geometry container cannot do without.
const GEOMETRY_ATTRIBUTES: [&str; 3] = ["geometry_type", "node_coordinates", "node_count"];

/// Numeric attributes copied into the variable schema.
const NUMERIC_ATTRIBUTES: [(&str, &str); 3] = [
    ("_FillValue", "Value used for missing data"),
    ("valid_min", "Minimum valid value"),
    ("valid_max", "Maximum valid value"),
];

/// Generates draft-07 JSON Schema documents from parsed CDL.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    base_url: String,
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SchemaGenerator {
    /// Create a generator rooting `$id` values at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the `$id` of a schema.
    pub fn schema_url(&self, domain: Domain, schema_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            domain,
            schema_id
        )
    }

    /// Generate a schema stamped with the current time.
    pub fn generate(&self, unit: &ParsedUnit, schema_id: &str) -> Result<SchemaDocument> {
        self.generate_at(unit, schema_id, Utc::now())
    }

    /// Generate a schema stamped with `generated`.
    pub fn generate_at(
        &self,
        unit: &ParsedUnit,
        schema_id: &str,
        generated: DateTime<Utc>,
    ) -> Result<SchemaDocument> {
        unit.check_dimension_references()?;

        let domain = Domain::for_unit(unit);
        let title = unit.global_attribute("title");

        let body = json!({
            "$schema": SCHEMA_DIALECT,
            "$id": self.schema_url(domain, schema_id),
            "title": title.unwrap_or("NetCDF Schema"),
            "description": format!(
                "Schema for {} - Generated from CDL",
                title.unwrap_or("NetCDF data")
            ),
            "type": "object",
            "properties": {
                "dimensions": dimensions_schema(&unit.dimensions),
                "variables": variables_schema(&unit.variables),
                "global_attributes": global_attributes_schema(),
            },
            "required": ["dimensions", "variables"],
            "additionalProperties": true,
            "x-source": {
                "format": "CDL",
                "file": unit.source_file,
                "generated": generated.to_rfc3339_opts(SecondsFormat::Micros, true),
                "generator": concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
            },
        });

        tracing::debug!(%domain, schema_id, "Generated schema");

        Ok(SchemaDocument {
            domain,
            schema_id: schema_id.to_string(),
            body,
        })
    }
}

fn dimensions_schema(dimensions: &[Dimension]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for dim in dimensions {
        let name = dim.name.as_str();
        let (minimum, clause) = if name.ends_with("_node") {
            (3, " (minimum 3 for polygon nodes)")
        } else if name.ends_with("_element") {
            (1, " (number of elements)")
        } else {
            (1, "")
        };

        properties.insert(
            name.to_string(),
            json!({
                "type": "integer",
                "description": format!("Dimension: {}{}", name, clause),
                "minimum": minimum,
            }),
        );
        required.push(name);
    }

    json!({
        "type": "object",
        "description": "Dimension definitions",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn variables_schema(variables: &[Variable]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for var in variables {
        properties.insert(var.name.clone(), variable_schema(var));

        if var.has_attribute("geometry_type")
            || var.has_attribute("units")
            || var.name.contains("geometry")
        {
            required.push(var.name.as_str());
        }
    }

    json!({
        "type": "object",
        "description": "Variable definitions",
        "properties": properties,
        "required": required,
        "additionalProperties": true,
    })
}

fn variable_schema(var: &Variable) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();

    if !var.dimensions.is_empty() {
        properties.insert(
            "dimensions".into(),
            json!({
                "type": "array",
                "items": {"type": "string", "pattern": IDENTIFIER_PATTERN},
                "minItems": var.dimensions.len(),
                "maxItems": var.dimensions.len(),
                "description": "Dimension names for this variable",
            }),
        );
        required.push("dimensions");
    }

    if let Some(units) = var.attribute("units") {
        properties.insert(
            "units".into(),
            json!({
                "type": "string",
                "description": "Units of measurement",
                "examples": [units.to_string()],
            }),
        );
        required.push("units");
    }

    if var.has_attribute("long_name") {
        properties.insert(
            "long_name".into(),
            json!({"type": "string", "description": "Descriptive name for the variable"}),
        );
    }

    if var.has_attribute("standard_name") {
        properties.insert(
            "standard_name".into(),
            json!({"type": "string", "description": "CF standard name"}),
        );
    }

    if var.has_attribute("geometry_type") {
        properties.insert(
            "geometry_type".into(),
            json!({
                "type": "string",
                "enum": GEOMETRY_TYPES,
                "description": "Type of geometry represented",
            }),
        );
        required.extend(GEOMETRY_ATTRIBUTES);
    }

    if var.has_attribute("node_coordinates") {
        properties.insert(
            "node_coordinates".into(),
            json!({
                "type": "string",
                "pattern": NODE_COORDINATES_PATTERN,
                "description": "Space-separated coordinate variable names",
            }),
        );
    }

    if var.has_attribute("node_count") {
        properties.insert(
            "node_count".into(),
            json!({
                "type": "string",
                "pattern": IDENTIFIER_PATTERN,
                "description": "Variable containing node count per element",
            }),
        );
    }

    for (key, description) in NUMERIC_ATTRIBUTES {
        if var.has_attribute(key) {
            properties.insert(
                key.into(),
                json!({"type": "number", "description": description}),
            );
        }
    }

    let description = match var.attribute("long_name") {
        Some(long_name) => long_name.to_string(),
        None => format!("Variable: {}", var.name),
    };

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("description".into(), json!(description));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    schema.insert("additionalProperties".into(), json!(true));

    Value::Object(schema)
}

fn global_attributes_schema() -> Value {
    json!({
        "type": "object",
        "description": "Global metadata attributes",
        "properties": {
            "title": {"type": "string", "description": "Title of the dataset"},
            "institution": {
                "type": "string",
                "description": "Institution responsible for the data",
            },
            "source": {
                "type": "string",
                "description": "Method of production of the original data",
            },
            "conventions": {
                "type": "string",
                "description": "Name of conventions followed",
                "examples": ["CF-1.8", "CF-1.8, IMAS-3.0"],
            },
            "comment": {
                "type": "string",
                "description": "Additional information about the dataset",
            },
        },
        "additionalProperties": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdl::{AttributeValue, CdlParser};
    use crate::error::CdlSchemaError;

    fn generate(cdl: &str) -> Value {
        let unit = CdlParser::new().parse_str(cdl, "test.cdl").unwrap();
        SchemaGenerator::default()
            .generate(&unit, "test.schema.json")
            .unwrap()
            .body
    }

    #[test]
    fn dimension_minimums_follow_naming_convention() {
        let schema = generate(
            "dimensions: polygon_node = 8 ; foo_element = 2 ; time = UNLIMITED ; variables:",
        );
        let dims = &schema["properties"]["dimensions"];
        assert_eq!(dims["properties"]["polygon_node"]["minimum"], 3);
        assert_eq!(
            dims["properties"]["polygon_node"]["description"],
            "Dimension: polygon_node (minimum 3 for polygon nodes)"
        );
        assert_eq!(dims["properties"]["foo_element"]["minimum"], 1);
        assert_eq!(dims["properties"]["time"]["minimum"], 1);
        assert_eq!(dims["properties"]["time"]["type"], "integer");
        assert_eq!(dims["required"], json!(["polygon_node", "foo_element", "time"]));
        assert_eq!(dims["additionalProperties"], false);
    }

    #[test]
    fn geometry_container_requires_all_geometry_attributes() {
        let schema = generate(
            r#"dimensions: polygon = 2 ; variables:
                int geometry_container ;
                    geometry_container:geometry_type = "polygon" ;
                    geometry_container:node_coordinates = "r z" ;
                    geometry_container:node_count = "polygon_node_count" ;
            "#,
        );
        let vars = &schema["properties"]["variables"];
        let container = &vars["properties"]["geometry_container"];
        assert_eq!(
            container["required"],
            json!(["geometry_type", "node_coordinates", "node_count"])
        );
        assert_eq!(
            container["properties"]["geometry_type"]["enum"],
            json!(["polygon", "line", "point"])
        );
        assert_eq!(
            container["properties"]["node_coordinates"]["pattern"],
            NODE_COORDINATES_PATTERN
        );
        assert!(container["properties"].get("dimensions").is_none());
        assert_eq!(vars["required"], json!(["geometry_container"]));
    }

    #[test]
    fn variables_with_units_or_geometry_name_are_required() {
        let schema = generate(
            r#"dimensions: n = 1 ; variables:
                double r(n) ; r:units = "m" ; r:long_name = "major radius" ;
                int geometry_ref ;
                string label(n) ; label:long_name = "label" ;
            "#,
        );
        let vars = &schema["properties"]["variables"];
        assert_eq!(vars["required"], json!(["r", "geometry_ref"]));

        let r = &vars["properties"]["r"];
        assert_eq!(r["description"], "major radius");
        assert_eq!(r["required"], json!(["dimensions", "units"]));
        assert_eq!(r["properties"]["units"]["examples"], json!(["m"]));
        assert_eq!(r["properties"]["dimensions"]["minItems"], 1);
        assert_eq!(r["properties"]["dimensions"]["maxItems"], 1);

        let label = &vars["properties"]["label"];
        assert_eq!(label["required"], json!(["dimensions"]));
        assert_eq!(label["additionalProperties"], true);
    }

    #[test]
    fn numeric_attributes_are_typed_as_numbers() {
        let schema = generate(
            "dimensions: n = 1 ; variables: double r(n) ; r:_FillValue = -999.0 ; r:valid_min = 0 ;",
        );
        let props = &schema["properties"]["variables"]["properties"]["r"]["properties"];
        assert_eq!(props["_FillValue"]["type"], "number");
        assert_eq!(props["valid_min"]["type"], "number");
        assert!(props.get("valid_max").is_none());
        assert_eq!(
            schema["properties"]["variables"]["properties"]["r"]["description"],
            "Variable: r"
        );
    }

    #[test]
    fn unquoted_units_example_is_a_string() {
        let schema = generate("dimensions: n = 1 ; variables: double r(n) ; r:units = 1 ;");
        let units = &schema["properties"]["variables"]["properties"]["r"]["properties"]["units"];
        assert_eq!(units["type"], "string");
        assert_eq!(units["examples"], json!(["1"]));
    }

    #[test]
    fn id_uses_classified_domain() {
        let unit = CdlParser::new()
            .parse_str("dimensions: c = 1 ; variables: double pf_coil_current(c) ;", "pf.cdl")
            .unwrap();
        let doc = SchemaGenerator::new("https://example.org/schemas/")
            .generate(&unit, "coil-current.schema.json")
            .unwrap();
        assert_eq!(doc.domain, Domain::PfActive);
        assert_eq!(
            doc.body["$id"],
            "https://example.org/schemas/pf_active/coil-current.schema.json"
        );
        assert_eq!(doc.body["$schema"], SCHEMA_DIALECT);
        assert_eq!(doc.body["x-source"]["file"], "pf.cdl");
    }

    #[test]
    fn title_and_description_fall_back() {
        let schema = generate("variables:");
        assert_eq!(schema["title"], "NetCDF Schema");
        assert_eq!(schema["description"], "Schema for NetCDF data - Generated from CDL");

        let schema = generate(":title = \"Coil\" ; variables:");
        assert_eq!(schema["title"], "Coil");
        assert_eq!(schema["description"], "Schema for Coil - Generated from CDL");
    }

    #[test]
    fn top_level_key_order_is_fixed() {
        let schema = generate("variables:");
        let keys: Vec<_> = schema.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            [
                "$schema",
                "$id",
                "title",
                "description",
                "type",
                "properties",
                "required",
                "additionalProperties",
                "x-source"
            ]
        );
    }

    #[test]
    fn dangling_dimension_fails_generation() {
        let mut unit = ParsedUnit::new("mem");
        let mut var = Variable::new("v", "double", vec!["missing".to_string()]);
        var.set_attribute("units", AttributeValue::from("m"));
        unit.insert_variable(var);

        let err = SchemaGenerator::default()
            .generate(&unit, "v.schema.json")
            .unwrap_err();
        assert!(matches!(err, CdlSchemaError::DanglingDimension { .. }));
    }

    #[test]
    fn regeneration_differs_only_in_timestamp() {
        let unit = CdlParser::new()
            .parse_str("dimensions: t = 1 ; variables: double t(t) ; t:units = \"s\" ;", "t.cdl")
            .unwrap();
        let generator = SchemaGenerator::default();
        let first = generator
            .generate_at(&unit, "t.schema.json", DateTime::<Utc>::UNIX_EPOCH)
            .unwrap();
        let mut second = generator.generate(&unit, "t.schema.json").unwrap();
        assert_ne!(first.body, second.body);

        second.body["x-source"]["generated"] = first.body["x-source"]["generated"].clone();
        assert_eq!(first.body, second.body);
    }
}
