//! Response body normalization.
//!
//! JSON and XML bodies are both turned into a [`serde_json::Value`] so that
//! body expectations and `remember` paths do not care which format the
//! service answered with.
//!
//! XML is mapped as follows:
//! - the document becomes `{"<root>": <root value>}`
//! - an element with neither attributes nor child elements becomes its text
//! - any other element becomes an object: attributes under `-name`, child
//!   elements under their tag name (repeated siblings collapse into an
//!   array) and non-empty text under `#text`
//! - text that reads as `true`/`false` or as a canonical JSON number is
//!   converted to that type

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::error::CallError;
use crate::http::response::media_type;

const ATTRIBUTE_PREFIX: &str = "-";
const TEXT_KEY: &str = "#text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Xml,
}

impl BodyFormat {
    /// Format for an already parameter-stripped media type.
    pub fn detect(media_type: &str) -> Option<Self> {
        match media_type {
            "application/json" => Some(BodyFormat::Json),
            "application/xml" | "text/xml" => Some(BodyFormat::Xml),
            other if other.ends_with("+json") => Some(BodyFormat::Json),
            other if other.ends_with("+xml") => Some(BodyFormat::Xml),
            _ => None,
        }
    }
}

/// Parse `raw` according to the `Content-Type` value `content_type`.
pub fn normalize(raw: &[u8], content_type: &str) -> Result<Value, CallError> {
    let media = media_type(content_type);
    let format = BodyFormat::detect(&media)
        .ok_or_else(|| CallError::UnsupportedContentType(display_media(&media)))?;

    let parsed = match format {
        BodyFormat::Json => serde_json::from_slice(raw).map_err(|e| e.to_string()),
        BodyFormat::Xml => xml_to_value(raw),
    };

    parsed.map_err(|message| CallError::MalformedBody {
        content_type: media,
        message,
    })
}

fn display_media(media: &str) -> String {
    if media.is_empty() {
        "<none>".to_string()
    } else {
        media.to_string()
    }
}

struct Element {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = format!(
                "{ATTRIBUTE_PREFIX}{}",
                String::from_utf8_lossy(attr.key.as_ref())
            );
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            fields.insert(key, scalar(&value));
        }

        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn finish(self) -> (String, Value) {
        let Element {
            name,
            mut fields,
            text,
        } = self;

        if fields.is_empty() {
            return (name, scalar(&text));
        }
        if !text.is_empty() {
            fields.insert(TEXT_KEY.to_string(), scalar(&text));
        }
        (name, Value::Object(fields))
    }
}

fn xml_to_value(raw: &[u8]) -> Result<Value, String> {
    let source = std::str::from_utf8(raw).map_err(|e| e.to_string())?;
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => close(Element::open(&start)?, &mut stack, &mut root)?,
            Event::End(_) => {
                let element = stack.pop().ok_or("unexpected closing tag")?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(element) = stack.last_mut() {
                    element
                        .text
                        .push_str(&text.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element `{}`", open.name));
    }

    let (name, value) = root.ok_or("document has no root element")?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

fn close(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<(String, Value)>,
) -> Result<(), String> {
    let (name, value) = element.finish();

    match stack.last_mut() {
        Some(parent) => {
            insert_child(&mut parent.fields, name, value);
            Ok(())
        }
        None if root.is_some() => Err("multiple root elements".to_string()),
        None => {
            *root = Some((name, value));
            Ok(())
        }
    }
}

fn insert_child(fields: &mut Map<String, Value>, name: String, value: Value) {
    match fields.get_mut(&name) {
        // Element values are never arrays, so an array here means repetition.
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

fn scalar(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(Value::Number(number)) = serde_json::from_str::<Value>(text) {
        if number.to_string() == text {
            return Value::Number(number);
        }
    }
    Value::String(text.to_string())
}
