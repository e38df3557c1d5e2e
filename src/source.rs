use crate::features::{parse_feature_collection, read_feature_collection};
use crate::{MapError, MapResult, MARKER_DATA_ELEMENT};

use geojson::FeatureCollection;

use std::path::PathBuf;

/// Supplies the FeatureCollection a map is populated from.
pub trait FeatureSource {
    fn load(&self) -> MapResult<FeatureCollection>;
}

impl FeatureSource for FeatureCollection {
    fn load(&self) -> MapResult<FeatureCollection> {
        Ok(self.clone())
    }
}

pub struct JsonText(pub String);

impl FeatureSource for JsonText {
    fn load(&self) -> MapResult<FeatureCollection> {
        parse_feature_collection(&self.0)
    }
}

pub struct GeoJsonFile(pub PathBuf);

impl FeatureSource for GeoJsonFile {
    fn load(&self) -> MapResult<FeatureCollection> {
        read_feature_collection(&self.0)
    }
}

/// A `<script id="...">` element of an html page holding the collection as json.
pub struct PageElement {
    html: String,
    element_id: String,
}

impl PageElement {
    pub fn new(html: String, element_id: &str) -> PageElement {
        PageElement {
            html,
            element_id: element_id.to_owned(),
        }
    }

    pub fn marker_data(html: String) -> PageElement {
        PageElement::new(html, MARKER_DATA_ELEMENT)
    }

    pub fn text_content(&self) -> Option<&str> {
        find_script_element(&self.html, &self.element_id)
    }
}

impl FeatureSource for PageElement {
    fn load(&self) -> MapResult<FeatureCollection> {
        let text = self
            .text_content()
            .ok_or_else(|| MapError::MissingElement(self.element_id.clone()))?;
        parse_feature_collection(text)
    }
}

fn find_script_element<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    // ascii lowercasing keeps byte offsets, so indices carry over to `html`
    let lower = html.to_ascii_lowercase();

    let mut pos = 0;
    while let Some(found) = lower[pos..].find("<script") {
        let name_end = pos + found + "<script".len();
        pos = name_end;

        // `<scripts>` or `<script-x>` are other tags
        match lower.as_bytes().get(name_end) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => (),
            _ => continue,
        }

        let (attributes, body_start) = parse_attributes(html, name_end)?;
        let close = body_start + lower[body_start..].find("</script")?;

        if attributes
            .iter()
            .any(|(name, value)| name.eq_ignore_ascii_case("id") && *value == id)
        {
            return Some(&html[body_start..close]);
        }
        pos = close;
    }
    None
}

/// Reads the attributes of an open tag starting at `start`, returning them
/// with the offset just past the closing `>`.
fn parse_attributes(html: &str, start: usize) -> Option<(Vec<(&str, &str)>, usize)> {
    let bytes = html.as_bytes();
    let skip_whitespace = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut attributes = Vec::new();
    let mut i = start;
    loop {
        i = skip_whitespace(i);
        match bytes.get(i)? {
            b'>' => return Some((attributes, i + 1)),
            b'/' => {
                i += 1;
                continue;
            }
            _ => (),
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name = &html[name_start..i];

        let after_name = skip_whitespace(i);
        if bytes.get(after_name) != Some(&b'=') {
            attributes.push((name, ""));
            i = after_name;
            continue;
        }

        i = skip_whitespace(after_name + 1);
        let value = match bytes.get(i)? {
            quote @ b'"' | quote @ b'\'' => {
                let value_start = i + 1;
                let value_end = value_start + html[value_start..].find(*quote as char)?;
                i = value_end + 1;
                &html[value_start..value_end]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &html[value_start..i]
            }
        };
        attributes.push((name, value));
    }
}
