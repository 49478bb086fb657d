//! Instance loading.
//!
//! Three formats are understood, chosen by file extension:
//!
//! - `.xml`: ESICUP-style nesting XML. Polygons are listed under
//!   `nesting/polygons`, the plate is the polygon with id `polygon0` and the
//!   pieces come from `nesting/problem/lot/piece`, each referencing one
//!   polygon through `component@idPolygon` and listing its allowed angles
//!   (degrees) as `orientation/enumeration@angle`.
//! - `.json`: `{"plate": [[x, y], ...], "pieces": [{"id", "quantity",
//!   "angles_deg", "vertices"}]}`.
//! - anything else: whitespace separated text. The plate vertex count and
//!   its coordinates, then the piece count and, per piece, its vertex count
//!   and coordinates. Text pieces have no quantity and angle 0 only.
//!
//! A piece without a quantity, or any piece when finite quantities are not
//! requested, is capped at `1 + floor(plate area / piece area)` copies,
//! which no layout can exceed.

use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use ignest_d2::{Boundary, Boundary2D, Geometry, Geometry2D};
use quick_xml::events::attributes::{AttrError, Attributes};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading an instance file.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] AttrError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed instance: {0}")]
    Malformed(String),
}

type Result<T> = std::result::Result<T, InstanceError>;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFormat {
    Text,
    Json,
    Xml,
}

impl InstanceFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("xml") => Self::Xml,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// A piece as read from the file, before quantities are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPiece {
    pub id: String,
    pub vertices: Vec<(f64, f64)>,
    /// `None` when the file gives no quantity.
    pub quantity: Option<usize>,
    pub angles_deg: Vec<f64>,
}

/// Plate and pieces as read from the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInstance {
    pub plate: Vec<(f64, f64)>,
    pub pieces: Vec<RawPiece>,
}

/// A loaded nesting instance, ready for the solver.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Instance name, the file stem.
    pub name: String,
    pub format: InstanceFormat,
    pub plate: Boundary2D,
    pub pieces: Vec<Geometry2D>,
}

impl Instance {
    /// Reads and parses an instance file.
    ///
    /// With `finite` set, quantities given by the file are kept; otherwise
    /// every piece is available up to its area bound.
    pub fn load(path: &Path, finite: bool) -> Result<Self> {
        let format = InstanceFormat::from_path(path);
        let text = fs::read_to_string(path)?;
        let raw = match format {
            InstanceFormat::Text => parse_text(&text)?,
            InstanceFormat::Json => parse_json(&text)?,
            InstanceFormat::Xml => parse_xml(text.as_bytes())?,
        };
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::debug!(
            "read {:?} instance '{}': {} plate vertices, {} pieces",
            format,
            name,
            raw.plate.len(),
            raw.pieces.len()
        );
        Ok(Self::from_raw(name, format, raw, finite))
    }

    /// Resolves quantities and builds solver inputs.
    pub fn from_raw(name: String, format: InstanceFormat, raw: RawInstance, finite: bool) -> Self {
        let plate = Boundary2D::new(raw.plate);
        let plate_area = plate.measure();

        let pieces = raw
            .pieces
            .into_iter()
            .map(|piece| {
                let geometry = Geometry2D::new(piece.id)
                    .with_polygon(piece.vertices)
                    .with_rotations_deg(piece.angles_deg);
                let quantity = match piece.quantity {
                    Some(q) if finite => q,
                    _ => area_bound(plate_area, geometry.measure()),
                };
                geometry.with_quantity(quantity)
            })
            .collect();

        Self {
            name,
            format,
            plate,
            pieces,
        }
    }

    /// Number of piece instances requested.
    pub fn total_quantity(&self) -> usize {
        self.pieces.iter().map(|p| p.quantity()).sum()
    }
}

/// Most copies of a piece that could ever fit on the plate, plus one.
fn area_bound(plate_area: f64, piece_area: f64) -> usize {
    if piece_area > 0.0 && plate_area.is_finite() {
        1 + (plate_area / piece_area).floor() as usize
    } else {
        1
    }
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn next_token(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| InstanceError::Malformed(format!("unexpected end of file, expected {}", what)))
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        let token = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| InstanceError::Malformed(format!("invalid {} '{}'", what, token)))
    }

    fn coord(&mut self) -> Result<f64> {
        let token = self.next_token("coordinate")?;
        token
            .parse()
            .map_err(|_| InstanceError::Malformed(format!("invalid coordinate '{}'", token)))
    }

    fn polygon(&mut self, what: &str) -> Result<Vec<(f64, f64)>> {
        let n = self.count(what)?;
        (0..n)
            .map(|_| -> Result<(f64, f64)> { Ok((self.coord()?, self.coord()?)) })
            .collect()
    }
}

/// Parses the whitespace separated text format.
pub fn parse_text(text: &str) -> Result<RawInstance> {
    let mut tokens = Tokens::new(text);
    let plate = tokens.polygon("plate vertex count")?;
    let n = tokens.count("piece count")?;

    let mut pieces = Vec::with_capacity(n);
    for i in 0..n {
        pieces.push(RawPiece {
            id: format!("piece{}", i + 1),
            vertices: tokens.polygon("piece vertex count")?,
            quantity: None,
            angles_deg: vec![0.0],
        });
    }
    Ok(RawInstance { plate, pieces })
}

#[derive(Deserialize)]
struct JsonInstance {
    plate: Vec<[f64; 2]>,
    pieces: Vec<JsonPiece>,
}

#[derive(Deserialize)]
struct JsonPiece {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    quantity: Option<usize>,
    #[serde(default)]
    angles_deg: Vec<f64>,
    vertices: Vec<[f64; 2]>,
}

/// Parses the JSON format.
pub fn parse_json(text: &str) -> Result<RawInstance> {
    let parsed: JsonInstance = serde_json::from_str(text)?;
    let pieces = parsed
        .pieces
        .into_iter()
        .enumerate()
        .map(|(i, p)| RawPiece {
            id: p.id.unwrap_or_else(|| format!("piece{}", i + 1)),
            vertices: p.vertices.into_iter().map(|[x, y]| (x, y)).collect(),
            quantity: p.quantity,
            angles_deg: p.angles_deg,
        })
        .collect();
    Ok(RawInstance {
        plate: parsed.plate.into_iter().map(|[x, y]| (x, y)).collect(),
        pieces,
    })
}

/// Piece entry of the lot while it is being read.
#[derive(Default)]
struct LotPiece {
    id: String,
    quantity: Option<usize>,
    polygon: Option<String>,
    angles_deg: Vec<f64>,
}

fn collect_attributes(attributes: Attributes<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in attributes {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = String::from_utf8_lossy(attr.value.as_ref()).to_string();
        map.insert(key, value);
    }
    Ok(map)
}

fn number<T: std::str::FromStr>(attrs: &HashMap<String, String>, key: &str, element: &str) -> Result<Option<T>> {
    match attrs.get(key) {
        None => Ok(None),
        Some(v) => v.trim().parse().map(Some).map_err(|_| {
            InstanceError::Malformed(format!("invalid {}@{} '{}'", element, key, v))
        }),
    }
}

/// Parses the ESICUP nesting XML format.
pub fn parse_xml<R: BufRead>(input: R) -> Result<RawInstance> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut polygons: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
    let mut current_polygon: Option<(String, Vec<(f64, f64)>)> = None;
    let mut lot: Vec<LotPiece> = Vec::new();
    let mut current_piece: Option<LotPiece> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();
        let (start, self_closing) = match event {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::End(_) => {
                match path.pop().as_deref() {
                    Some("polygon") => {
                        if let Some((id, vertices)) = current_polygon.take() {
                            polygons.insert(id, vertices);
                        }
                    }
                    Some("piece") => lot.extend(current_piece.take()),
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attrs = collect_attributes(start.attributes())?;
        let parent = path.last().map(String::as_str);

        match name.as_str() {
            "polygon" if parent == Some("polygons") => {
                let id = attrs.get("id").cloned().unwrap_or_default();
                if self_closing {
                    polygons.insert(id, Vec::new());
                } else {
                    current_polygon = Some((id, Vec::new()));
                }
            }
            "segment" => {
                if let Some((_, vertices)) = current_polygon.as_mut() {
                    let x = number(&attrs, "x0", "segment")?;
                    let y = number(&attrs, "y0", "segment")?;
                    match (x, y) {
                        (Some(x), Some(y)) => vertices.push((x, y)),
                        _ => {
                            return Err(InstanceError::Malformed(
                                "segment without x0/y0".to_string(),
                            ))
                        }
                    }
                }
            }
            "piece" if parent == Some("lot") => {
                let piece = LotPiece {
                    id: attrs.get("id").cloned().unwrap_or_default(),
                    quantity: Some(number(&attrs, "quantity", "piece")?.unwrap_or(0)),
                    ..LotPiece::default()
                };
                if self_closing {
                    lot.push(piece);
                } else {
                    current_piece = Some(piece);
                }
            }
            "component" => {
                if let Some(piece) = current_piece.as_mut() {
                    piece.polygon = attrs.get("idPolygon").cloned();
                }
            }
            "enumeration" => {
                if let Some(piece) = current_piece.as_mut() {
                    piece
                        .angles_deg
                        .push(number(&attrs, "angle", "enumeration")?.unwrap_or(0.0));
                }
            }
            _ => {}
        }

        if !self_closing {
            path.push(name);
        }
    }

    let plate = polygons
        .get("polygon0")
        .cloned()
        .ok_or_else(|| InstanceError::Malformed("plate polygon 'polygon0' not found".to_string()))?;

    let pieces = lot
        .into_iter()
        .map(|piece| {
            let polygon_id = piece.polygon.ok_or_else(|| {
                InstanceError::Malformed(format!("piece '{}' has no component", piece.id))
            })?;
            let vertices = polygons.get(&polygon_id).cloned().ok_or_else(|| {
                InstanceError::Malformed(format!(
                    "piece '{}' references unknown polygon '{}'",
                    piece.id, polygon_id
                ))
            })?;
            let angles_deg = if piece.angles_deg.is_empty() {
                vec![0.0]
            } else {
                piece.angles_deg
            };
            Ok(RawPiece {
                id: piece.id,
                vertices,
                quantity: piece.quantity,
                angles_deg,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RawInstance { plate, pieces })
}
