//! Line record parsing
//!
//! Each input line is a whitespace-separated list of tokens. Only triangle
//! (`3`) and quad (`4`) lines carry geometry; every other line type is
//! ignored without looking at the rest of its tokens.

use glam::Vec3;

use crate::color::ColorCode;
use crate::error::MalformedLineError;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveRecord {
    Triangle { color: ColorCode, vertices: [Vec3; 3] },
    Quad { color: ColorCode, vertices: [Vec3; 4] },
    Ignored,
}

impl PrimitiveRecord {
    /// Color code of a geometry record, `None` for ignored lines.
    pub fn color(&self) -> Option<&ColorCode> {
        match self {
            PrimitiveRecord::Triangle { color, .. } | PrimitiveRecord::Quad { color, .. } => {
                Some(color)
            }
            PrimitiveRecord::Ignored => None,
        }
    }

    /// Corner positions in line order. Empty for ignored lines.
    pub fn vertices(&self) -> &[Vec3] {
        match self {
            PrimitiveRecord::Triangle { vertices, .. } => vertices,
            PrimitiveRecord::Quad { vertices, .. } => vertices,
            PrimitiveRecord::Ignored => &[],
        }
    }
}

/// Parse a single line into a primitive record.
pub fn parse_line(line: &str) -> Result<PrimitiveRecord, MalformedLineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.first().copied() {
        Some("3") => {
            let (color, vertices) = read_fields::<3>(&tokens)?;
            Ok(PrimitiveRecord::Triangle { color, vertices })
        }
        Some("4") => {
            let (color, vertices) = read_fields::<4>(&tokens)?;
            Ok(PrimitiveRecord::Quad { color, vertices })
        }
        _ => Ok(PrimitiveRecord::Ignored),
    }
}

/// Parse every line of a document, pairing each result with its 1-based line
/// number.
pub fn parse_document(
    text: &str,
) -> impl Iterator<Item = (usize, Result<PrimitiveRecord, MalformedLineError>)> + '_ {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, parse_line(line)))
}

/// Read the color token and `N` corners following the line-type token.
/// Extra trailing tokens are ignored.
fn read_fields<const N: usize>(
    tokens: &[&str],
) -> Result<(ColorCode, [Vec3; N]), MalformedLineError> {
    let expected = 2 + N * 3;
    if tokens.len() < expected {
        return Err(MalformedLineError::MissingFields {
            expected,
            found: tokens.len(),
        });
    }

    let color = ColorCode::from(tokens[1]);
    let mut vertices = [Vec3::ZERO; N];
    for (vertex, coords) in vertices
        .iter_mut()
        .zip(tokens[2..expected].chunks_exact(3))
    {
        *vertex = Vec3::new(
            parse_coordinate(coords[0])?,
            parse_coordinate(coords[1])?,
            parse_coordinate(coords[2])?,
        );
    }

    Ok((color, vertices))
}

fn parse_coordinate(token: &str) -> Result<f32, MalformedLineError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MalformedLineError::InvalidNumber {
            token: token.to_string(),
        })
}
