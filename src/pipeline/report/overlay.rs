//! Text overlay onto the first page of an existing PDF using lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::layout::{ReportLayout, LEFT_MARGIN};
use super::ReportError;

/// US Letter, used when a page carries no usable MediaBox.
const FALLBACK_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];
const FONT_RESOURCE_PREFIX: &str = "MPHelv";

/// Write `layout` onto page 1 of `template` and return the new document.
///
/// The template's own content is wrapped in `q`/`Q` so the overlay starts
/// from a clean graphics state. Every line is written even when it falls
/// off the page; the count of such lines is logged.
pub fn overlay(template: &[u8], layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::load_mem(template)
        .map_err(|e| ReportError::MalformedTemplate(format!("Failed to parse PDF: {e}")))?;

    let page_id = doc
        .page_iter()
        .next()
        .ok_or_else(|| ReportError::MalformedTemplate("Template has no pages".into()))?;

    let [_, bottom, _, top] = media_box(&doc, page_id);
    let overflow = layout.overflow_count(top, bottom);
    if overflow > 0 {
        tracing::warn!(
            lines = layout.lines.len(),
            overflow,
            "Report lines run past the bottom of the page"
        );
    }

    let font_name = install_font(&mut doc, page_id)?;
    let operations = text_operations(layout, &font_name, top);
    let overlay = Content { operations }
        .encode()
        .map_err(|e| ReportError::Encode(format!("Overlay content error: {e}")))?;

    let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let mut restore = b"\nQ\n".to_vec();
    restore.extend_from_slice(&overlay);
    let overlay_id = doc.add_object(Stream::new(dictionary! {}, restore));

    let page = page_dict_mut(&mut doc, page_id)?;
    let existing = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(overlay_id));
    page.set("Contents", Object::Array(contents));

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ReportError::Encode(format!("PDF save error: {e}")))?;
    Ok(out)
}

fn text_operations(layout: &ReportLayout, font_name: &str, page_top: f32) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
    ];
    for (i, line) in layout.lines.iter().enumerate() {
        let y = layout.baseline(i, page_top);
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font_name.as_bytes().to_vec()), real(line.font_size)],
        ));
        ops.push(Operation::new(
            "Tm",
            vec![
                real(1.0),
                real(0.0),
                real(0.0),
                real(1.0),
                real(LEFT_MARGIN),
                real(y),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(&line.text))],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Code points WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// WinAnsi bytes for the standard font; unmapped characters become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => WIN_ANSI_HIGH
                .iter()
                .find(|(ch, _)| *ch == c)
                .map_or(b'?', |(_, byte)| *byte),
        })
        .collect()
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Look `key` up on the page, then up its `/Parent` chain.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok();
    // Depth guard against cyclic page trees.
    for _ in 0..32 {
        let dict = current?;
        if let Ok(value) = dict.get(key) {
            return Some(resolve(doc, value));
        }
        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => doc.get_dictionary(*parent).ok(),
            _ => None,
        };
    }
    None
}

fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let parsed = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|items| {
            let values: Vec<f32> = items
                .iter()
                .filter_map(|o| number(resolve(doc, o)))
                .collect();
            <[f32; 4]>::try_from(values).ok()
        });
    match parsed {
        Some([x0, y0, x1, y1]) if y1 > y0 => [x0, y0, x1, y1],
        _ => FALLBACK_MEDIA_BOX,
    }
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, ReportError> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| ReportError::MalformedTemplate("Page is not a dictionary".into()))
}

/// Register a Helvetica resource on the page and return its name.
///
/// Resources may be a reference, inline on the page, or inherited from the
/// page tree; inherited ones are copied onto the page before extending.
fn install_font(doc: &mut Document, page_id: ObjectId) -> Result<String, ReportError> {
    let font_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Font".to_vec()),
        "Subtype" => Object::Name(b"Type1".to_vec()),
        "BaseFont" => Object::Name(b"Helvetica".to_vec()),
        "Encoding" => Object::Name(b"WinAnsiEncoding".to_vec()),
    });

    let page = doc
        .get_dictionary(page_id)
        .map_err(|_| ReportError::MalformedTemplate("Page is not a dictionary".into()))?;
    let (resources_id, mut resources) = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => (Some(*id), owned_dict(doc, *id)?),
        Ok(Object::Dictionary(dict)) => (None, dict.clone()),
        _ => (None, inherited_dict(doc, page_id, b"Resources").unwrap_or_default()),
    };

    let (fonts_id, mut fonts) = match resources.get(b"Font") {
        Ok(Object::Reference(id)) => (Some(*id), owned_dict(doc, *id)?),
        Ok(Object::Dictionary(dict)) => (None, dict.clone()),
        _ => (None, Dictionary::new()),
    };

    let name = (1..)
        .map(|n| format!("{FONT_RESOURCE_PREFIX}{n}"))
        .find(|candidate| !fonts.has(candidate.as_bytes()))
        .unwrap_or_else(|| FONT_RESOURCE_PREFIX.to_string());
    fonts.set(name.as_bytes().to_vec(), Object::Reference(font_id));

    match fonts_id {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(fonts));
        }
        None => resources.set("Font", Object::Dictionary(fonts)),
    }
    match resources_id {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(resources));
        }
        None => page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(resources)),
    }
    Ok(name)
}

fn owned_dict(doc: &Document, id: ObjectId) -> Result<Dictionary, ReportError> {
    doc.get_dictionary(id)
        .cloned()
        .map_err(|_| ReportError::MalformedTemplate(format!("Object {} {} is not a dictionary", id.0, id.1)))
}

fn inherited_dict(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Dictionary> {
    inherited(doc, page_id, key)
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::report::ReportLine;

    fn page(media_box: Option<Vec<Object>>) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.4");
        let mut dict = dictionary! { "Type" => Object::Name(b"Page".to_vec()) };
        if let Some(mb) = media_box {
            dict.set("MediaBox", mb);
        }
        let id = doc.add_object(dict);
        (doc, id)
    }

    #[test]
    fn non_latin1_replaced() {
        assert_eq!(win_ansi("a\u{2192}b \u{e9}"), b"a?b \xE9".to_vec());
        assert_eq!(win_ansi("tab\there"), b"tab?here".to_vec());
    }

    #[test]
    fn win_ansi_maps_typographic_punctuation() {
        assert_eq!(win_ansi("O\u{2019}Brien"), b"O\x92Brien".to_vec());
        assert_eq!(
            win_ansi("\u{201C}ok\u{201D} \u{2013} \u{2014} \u{20AC}5"),
            b"\x93ok\x94 \x96 \x97 \x805".to_vec()
        );
        assert_eq!(win_ansi("\u{0152}uvre \u{2122}"), b"\x8Cuvre \x99".to_vec());
        // C1 controls have no glyph and are not passed through.
        assert_eq!(win_ansi("\u{0092}"), b"?".to_vec());
    }

    #[test]
    fn media_box_accepts_reals_and_falls_back() {
        let (doc, id) = page(Some(vec![0.into(), 0.into(), Object::Real(595.5_f32.into()), 842.into()]));
        assert_eq!(media_box(&doc, id), [0.0, 0.0, 595.5, 842.0]);

        let (doc, id) = page(None);
        assert_eq!(media_box(&doc, id), FALLBACK_MEDIA_BOX);

        let (doc, id) = page(Some(vec![0.into(), 0.into()]));
        assert_eq!(media_box(&doc, id), FALLBACK_MEDIA_BOX);
    }

    #[test]
    fn font_name_avoids_existing_resource() {
        let (mut doc, id) = page(None);
        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(id) {
            dict.set(
                "Resources",
                dictionary! { "Font" => dictionary! { "MPHelv1" => Object::Null } },
            );
        }
        assert_eq!(install_font(&mut doc, id).unwrap(), "MPHelv2");
    }

    #[test]
    fn operations_position_each_line() {
        let layout = ReportLayout::new(
            vec![ReportLine::new("A", 14.0), ReportLine::new("B", 16.0)],
            24.0,
        );
        let ops = text_operations(&layout, "F9", 792.0);
        let names: Vec<&str> = ops.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(names, vec!["BT", "rg", "Tf", "Tm", "Tj", "Tf", "Tm", "Tj", "ET"]);
        assert!(matches!(ops[5].operands[1], Object::Real(size) if (size as f32 - 16.0).abs() < 1e-6));
        assert!(matches!(ops[6].operands[5], Object::Real(y) if (y as f32 - 518.0).abs() < 1e-6));
    }

    #[test]
    fn rejects_non_pdf() {
        let layout = ReportLayout::new(vec![], 20.0);
        assert!(matches!(
            overlay(b"hello", &layout),
            Err(ReportError::MalformedTemplate(_))
        ));
    }
}
