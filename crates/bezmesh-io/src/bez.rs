//! Reader for `.bez` patch files.
//!
//! The first non-blank line holds the patch count. Each patch follows as
//! four lines of twelve numbers, one cubic curve (four `x y z` points) per
//! line. Blank lines separate patches; a fifth consecutive curve line
//! starts a new patch.

use std::path::Path;

use bezmesh_math::Point3;
use bezmesh_patch::{BezierCurve, BezierPatch};
use log::debug;

use crate::error::{ParseError, Result};

const VALUES_PER_CURVE: usize = 12;

/// Read a `.bez` file from a path.
pub fn read_bez(path: impl AsRef<Path>) -> Result<Vec<BezierPatch>> {
    let text = std::fs::read_to_string(path)?;
    parse_bez(&text)
}

/// Parse `.bez` text into patches, in file order.
pub fn parse_bez(text: &str) -> Result<Vec<BezierPatch>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()));

    let (count_line, count_text) = lines
        .by_ref()
        .find(|(_, line)| !line.is_empty())
        .ok_or(ParseError::MissingPatchCount)?;
    let declared: usize = count_text.parse().map_err(|_| ParseError::InvalidNumber {
        line: count_line,
        token: count_text.to_string(),
    })?;

    let mut patches = Vec::with_capacity(declared);
    let mut curves: Vec<BezierCurve> = Vec::with_capacity(4);

    for (line_no, line) in lines {
        if line.is_empty() {
            if !curves.is_empty() {
                return Err(ParseError::IncompletePatch {
                    patch: patches.len() + 1,
                    found: curves.len(),
                });
            }
            continue;
        }

        curves.push(parse_curve(line_no, line)?);
        if let Ok(rows) = <[BezierCurve; 4]>::try_from(curves.as_slice()) {
            patches.push(BezierPatch::new(rows));
            curves.clear();
        }
    }

    if !curves.is_empty() {
        return Err(ParseError::IncompletePatch {
            patch: patches.len() + 1,
            found: curves.len(),
        });
    }
    if patches.len() != declared {
        return Err(ParseError::PatchCountMismatch {
            declared,
            found: patches.len(),
        });
    }

    debug!("parsed {} patches", patches.len());
    Ok(patches)
}

fn parse_curve(line_no: usize, line: &str) -> Result<BezierCurve> {
    let values = line
        .split_whitespace()
        .map(|token| parse_number(line_no, token))
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != VALUES_PER_CURVE {
        return Err(ParseError::TokenCount {
            line: line_no,
            expected: VALUES_PER_CURVE,
            found: values.len(),
        });
    }

    Ok(BezierCurve::new(std::array::from_fn(|i| {
        Point3::new(values[3 * i], values[3 * i + 1], values[3 * i + 2])
    })))
}

/// Parse a coordinate. `nan`, `inf` and literals that overflow `f64` are
/// rejected along with malformed tokens.
pub(crate) fn parse_number(line: usize, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })
}
