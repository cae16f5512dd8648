//! XML parsing.
//!
//! The document element is dropped; its child elements become top-level
//! keys. Leaf text is decoded as a typed scalar, repeated sibling elements
//! collect into a list, and attributes are ignored. Element names carrying
//! `-AND-` are normalized to the compound separator `+`.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::constants::{COMPOUND_SEPARATOR, XML_AND_TOKEN};
use crate::value::{Mapping, Value};

struct Frame {
    name: String,
    children: Vec<(String, Value)>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            let text = self.text.trim();
            return if text.is_empty() {
                Value::Null
            } else {
                Value::decode_scalar(text)
            };
        }

        let mut map = Mapping::new();
        for (name, value) in self.children {
            match map.get_mut(&name) {
                None => {
                    map.insert(name, value);
                }
                Some(Value::List(items)) => items.push(value),
                Some(slot) => {
                    let previous = std::mem::take(slot);
                    *slot = Value::List(vec![previous, value]);
                }
            }
        }
        Value::Mapping(map)
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).replace(XML_AND_TOKEN, &COMPOUND_SEPARATOR.to_string())
}

pub(super) fn parse_xml(content: &str) -> Result<Mapping, String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => {
                stack.push(Frame::new(element_name(start.name().as_ref())));
            }
            Event::Empty(empty) => {
                let name = element_name(empty.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => parent.children.push((name, Value::Null)),
                    None => root = Some(Value::Mapping(Mapping::new())),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err("unexpected closing tag".to_string());
                };
                let name = frame.name.clone();
                let value = frame.into_value();
                match stack.last_mut() {
                    Some(parent) => parent.children.push((name, value)),
                    None => root = Some(value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("unexpected end of document".to_string());
    }

    match root {
        Some(Value::Mapping(map)) => Ok(map),
        Some(Value::Null) | None => Ok(Mapping::new()),
        Some(_) => Err("document element must contain child elements".to_string()),
    }
}
