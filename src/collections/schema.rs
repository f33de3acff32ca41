//! JSON schemas for suite files.
//!
//! Discovery is two-tier: the loose shape schema decides whether a JSON file
//! is a suite at all, and only files that pass it are held to the closed
//! detailed schema.

/// Array of objects carrying `name` and `calls`.
pub const SUITE_SHAPE_SCHEMA: &str = r##"
{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "array",
  "items": {
    "type": "object",
    "properties": {
      "name": { "type": "string" },
      "calls": { "type": "array" }
    },
    "required": ["name", "calls"]
  }
}
"##;

pub const SUITE_DETAILED_SCHEMA: &str = r##"
{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "definitions": {
    "stringMap": {
      "type": "object",
      "additionalProperties": { "type": "string" }
    },
    "on": {
      "type": "object",
      "properties": {
        "method": { "type": "string" },
        "url": { "type": "string" },
        "headers": { "$ref": "#/definitions/stringMap" },
        "params": { "$ref": "#/definitions/stringMap" },
        "body": {},
        "bodyFile": { "type": "string" }
      },
      "required": ["method", "url"],
      "additionalProperties": false
    },
    "expect": {
      "type": "object",
      "properties": {
        "statusCode": { "type": "integer", "minimum": 100, "maximum": 599 },
        "contentType": { "type": "string" },
        "headers": { "$ref": "#/definitions/stringMap" },
        "body": { "type": "object" },
        "bodySchemaFile": { "type": "string" },
        "bodySchemaURI": { "type": "string" },
        "absent": { "type": "array", "items": { "type": "string" } }
      },
      "additionalProperties": false
    },
    "call": {
      "type": "object",
      "properties": {
        "on": { "$ref": "#/definitions/on" },
        "expect": { "$ref": "#/definitions/expect" },
        "remember": { "$ref": "#/definitions/stringMap" }
      },
      "required": ["on", "expect"],
      "additionalProperties": false
    }
  },
  "type": "array",
  "items": {
    "type": "object",
    "properties": {
      "name": { "type": "string" },
      "ignore": { "type": "string" },
      "ignoreReason": { "type": "string" },
      "calls": { "type": "array", "items": { "$ref": "#/definitions/call" } }
    },
    "required": ["name", "calls"],
    "not": { "required": ["ignore", "ignoreReason"] },
    "additionalProperties": false
  }
}
"##;
