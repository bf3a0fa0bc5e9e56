//! OpenAPI document and Swagger UI

use axum::{extract::State, response::Html, Json};
use data_validator::{AttributeSpec, Constraint};
use feature_engine::{ModelSpec, Task};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::AppState;

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>API docs</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// `GET /openapi.json`
pub async fn openapi_json(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(openapi_document(&state.spec, &state.version))
}

/// `GET /docs`
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

/// OpenAPI 3 description of the service for one model
pub fn openapi_document(spec: &ModelSpec, version: &str) -> Value {
    let mut properties = Map::new();
    for attr in &spec.attributes {
        properties.insert(attr.name.to_string(), attribute_schema(attr));
    }
    let required: Vec<&str> = spec.attributes.iter().map(|a| a.name).collect();

    let response = match spec.task {
        Task::Regression => json!({
            "type": "object",
            "required": ["predicted_cost", "message"],
            "properties": {
                "predicted_cost": { "type": "number" },
                "message": { "type": "string" }
            }
        }),
        Task::Classification => json!({
            "type": "object",
            "required": ["prediction", "probability", "message"],
            "properties": {
                "prediction": { "type": "integer", "enum": [0, 1] },
                "probability": { "type": "number", "minimum": 0, "maximum": 1 },
                "message": { "type": "string" }
            }
        }),
    };

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": spec.title,
            "description": spec.description,
            "version": version
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Welcome message",
                    "responses": { "200": { "description": "Welcome message" } }
                }
            },
            "/predict": {
                "post": {
                    "summary": "Predict from one record",
                    "requestBody": {
                        "required": true,
                        "content": json_body("PredictionInput")
                    },
                    "responses": {
                        "200": {
                            "description": "Prediction",
                            "content": json_body("PredictionOutput")
                        },
                        "422": {
                            "description": "Validation error",
                            "content": json_body("ValidationError")
                        },
                        "500": { "description": "Prediction failed" }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Service and model status",
                    "responses": { "200": { "description": "Health report" } }
                }
            }
        },
        "components": {
            "schemas": {
                "PredictionInput": {
                    "type": "object",
                    "required": required,
                    "properties": properties
                },
                "PredictionOutput": response,
                "ValidationError": {
                    "type": "object",
                    "properties": {
                        "detail": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "loc": { "type": "array", "items": { "type": "string" } },
                                    "msg": { "type": "string" },
                                    "type": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// `application/json` content referring to a component schema
fn json_body(schema: &str) -> Value {
    json!({
        "application/json": {
            "schema": { "$ref": format!("#/components/schemas/{schema}") }
        }
    })
}

fn attribute_schema(attr: &AttributeSpec) -> Value {
    match &attr.constraint {
        Constraint::Range {
            range,
            integer,
            rules,
        } => {
            // Realism rules narrow the declared range
            let min = rules.iter().filter_map(|r| r.min).fold(range.0, f64::max);
            let max = rules.iter().filter_map(|r| r.max).fold(range.1, f64::min);
            let kind = if *integer { "integer" } else { "number" };
            json!({
                "type": kind,
                "minimum": min,
                "maximum": max,
                "description": attr.description
            })
        }
        Constraint::OneOf { categories } => json!({
            "type": "string",
            "enum": categories,
            "description": attr.description
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insurance_document() {
        let doc = openapi_document(&ModelSpec::insurance(), "0.1.0");
        let input = &doc["components"]["schemas"]["PredictionInput"];
        assert_eq!(input["properties"]["age"]["type"], "integer");
        assert_eq!(input["properties"]["age"]["minimum"], 18.0);
        assert_eq!(input["properties"]["region"]["enum"][3], "southwest");
        assert_eq!(input["required"].as_array().unwrap().len(), 6);
        let request = &doc["paths"]["/predict"]["post"]["requestBody"]["content"];
        assert_eq!(
            request["application/json"]["schema"]["$ref"],
            "#/components/schemas/PredictionInput"
        );
        let output = &doc["components"]["schemas"]["PredictionOutput"];
        assert!(output["properties"]["predicted_cost"].is_object());
    }

    #[test]
    fn test_swagger_page_points_at_document() {
        assert!(SWAGGER_UI.starts_with("<!DOCTYPE html>"));
        assert!(SWAGGER_UI.contains(r#"url: "/openapi.json""#));
        assert!(SWAGGER_UI.contains(r##"dom_id: "#swagger-ui""##));
        assert!(SWAGGER_UI.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_diabetes_document_uses_realism_bounds() {
        let doc = openapi_document(&ModelSpec::diabetes(), "0.1.0");
        let input = &doc["components"]["schemas"]["PredictionInput"];
        assert_eq!(input["properties"]["glucose"]["minimum"], 40.0);
        assert_eq!(input["properties"]["pregnancies"]["maximum"], 15.0);
        let output = &doc["components"]["schemas"]["PredictionOutput"];
        assert!(output["properties"]["probability"].is_object());
    }
}
