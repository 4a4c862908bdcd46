//! Garden save-code decoder.
//!
//! Parses the planner's versioned, delimiter-separated save string
//! (`v{version}_{dimensions}_CR-{plots}[_{settings}]`) into a tile grid and
//! aggregated plant counts. Pure, deterministic, single pass; the only
//! entry points are `decode` and the `unwrap_share_url` pre-step.
//!
//! Failure policy: structural violations (section count, prefixes, tile
//! counts) abort the whole decode with a typed error — a partial garden is
//! never produced. Unrecognized crop/fertilizer codes are per-tile
//! conditions: the tile is left unassigned and a warning is recorded on the
//! result.

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use crate::data::{
    crop_by_code, crop_footprint, fertilizer_by_code, NO_CROP_CODE, NO_FERTILIZER_CODE,
};
use crate::shared::{PLOT_SIDE_TILES, TILES_PER_PLOT};

/// The one host share URLs are accepted from.
pub const PLANNER_HOST: &str = "palia-garden-planner.vercel.app";

/// Query parameter carrying the save code in a share URL.
pub const PLANNER_QUERY_PARAM: &str = "layout";

// ─── Errors and warnings ─────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Structural violation of the save-code grammar. Fatal, no partial
    /// result.
    #[error("invalid save code: {0}")]
    InvalidFormat(String),

    /// A plot's tokens did not total exactly 9. Fatal for the whole decode.
    #[error("plot {plot_index} tokenized to {found} tiles, expected 9")]
    TileCountMismatch { plot_index: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Crop,
    Fertilizer,
}

/// An unrecognized letter-code inside an otherwise well-formed tile token.
/// Non-fatal; the tile stays unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode {
    pub code: String,
    pub kind: CodeKind,
    /// Index among active plots, row-major.
    pub plot_index: usize,
    /// Tile position within the plot, row-major 0-8.
    pub tile_index: usize,
}

// ─── Result types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    /// False for tiles of inactive plots.
    pub active: bool,
    pub crop: Option<&'static str>,
    pub fertilizer: Option<&'static str>,
}

/// A fully decoded garden. Immutable once produced; decoding the same code
/// twice yields structurally equal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGarden {
    pub version: String,
    pub plot_rows: usize,
    pub plot_cols: usize,
    pub active_plots: Vec<Vec<bool>>,
    /// `plot_rows·3 × plot_cols·3` tile grid, row-major.
    pub tiles: Vec<Vec<Tile>>,
    /// Raw tile occurrences per crop name.
    pub tile_counts: BTreeMap<String, u32>,
    /// Plant counts: tile counts floor-divided by the crop footprint.
    /// A partially placed bush/tree floors to the next-lower plant count.
    pub crop_counts: BTreeMap<String, u32>,
    pub total_plants: u32,
    pub warnings: Vec<UnknownCode>,
    /// Trailing settings section(s), carried through unparsed.
    pub settings: Option<String>,
}

impl ParsedGarden {
    pub fn active_plot_count(&self) -> usize {
        self.active_plots.iter().flatten().filter(|b| **b).count()
    }

    /// Per-crop `(name, plants, tiles)` rows for the tracker import,
    /// in stable (alphabetical) order.
    pub fn crop_summary(&self) -> Vec<(String, u32, u32)> {
        self.tile_counts
            .iter()
            .map(|(name, tiles)| {
                let plants = self.crop_counts.get(name).copied().unwrap_or(0);
                (name.clone(), plants, *tiles)
            })
            .collect()
    }
}

// ─── URL pre-step ────────────────────────────────────────────────────────────

/// Accepts either a raw save code or a planner share URL. For URLs the host
/// must match `PLANNER_HOST` and the code is taken from the
/// `PLANNER_QUERY_PARAM` query parameter.
pub fn unwrap_share_url(input: &str) -> Result<String, DecodeError> {
    let trimmed = input.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Ok(trimmed.to_string());
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| DecodeError::InvalidFormat(format!("unparseable share URL: {}", e)))?;
    if parsed.host_str() != Some(PLANNER_HOST) {
        return Err(DecodeError::InvalidFormat(format!(
            "share URL host {:?} is not {}",
            parsed.host_str().unwrap_or(""),
            PLANNER_HOST
        )));
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == PLANNER_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            DecodeError::InvalidFormat(format!(
                "share URL has no '{}' query parameter",
                PLANNER_QUERY_PARAM
            ))
        })
}

// ─── Decode ──────────────────────────────────────────────────────────────────

/// Decodes a save code (or share URL) into a `ParsedGarden`.
pub fn decode(input: &str) -> Result<ParsedGarden, DecodeError> {
    let code = unwrap_share_url(input)?;

    let sections: Vec<&str> = code.split('_').collect();
    if sections.len() < 3 {
        return Err(DecodeError::InvalidFormat(format!(
            "expected version, dimension, and crop sections, found {}",
            sections.len()
        )));
    }

    // The version check is prefix-only; the version string itself is
    // carried through for diagnostics, not interpreted.
    let version = sections[0];
    if !version.starts_with('v') {
        return Err(DecodeError::InvalidFormat(format!(
            "section {:?} is not a version marker",
            version
        )));
    }

    let active_plots = parse_dimension_block(sections[1])?;
    let plot_rows = active_plots.len();
    let plot_cols = active_plots[0].len();

    let entries = parse_crop_block(sections[2])?;

    // Entries are emitted only for active plots, row-major; inactive plots
    // contribute no entry.
    let active_coords: Vec<(usize, usize)> = (0..plot_rows)
        .flat_map(|r| (0..plot_cols).map(move |c| (r, c)))
        .filter(|&(r, c)| active_plots[r][c])
        .collect();
    if entries.len() != active_coords.len() {
        return Err(DecodeError::InvalidFormat(format!(
            "crop block has {} plot entries, expected {} (one per active plot)",
            entries.len(),
            active_coords.len()
        )));
    }

    let tile_rows = plot_rows * PLOT_SIDE_TILES;
    let tile_cols = plot_cols * PLOT_SIDE_TILES;
    let mut tiles = vec![vec![Tile::default(); tile_cols]; tile_rows];
    let mut tile_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut warnings = Vec::new();

    for (plot_index, (&(plot_row, plot_col), entry)) in
        active_coords.iter().zip(entries.iter()).enumerate()
    {
        let tokens = tokenize_plot(entry).ok_or_else(|| {
            DecodeError::InvalidFormat(format!(
                "plot {} does not start with a tile code",
                plot_index
            ))
        })?;
        if tokens.len() != TILES_PER_PLOT {
            return Err(DecodeError::TileCountMismatch {
                plot_index,
                found: tokens.len(),
            });
        }

        for (tile_index, token) in tokens.iter().enumerate() {
            let (crop_code, fert_code) = match token.split_once('.') {
                Some((crop, fert)) => (crop, Some(fert)),
                None => (*token, None),
            };

            let row = plot_row * PLOT_SIDE_TILES + tile_index / PLOT_SIDE_TILES;
            let col = plot_col * PLOT_SIDE_TILES + tile_index % PLOT_SIDE_TILES;
            let tile = &mut tiles[row][col];
            tile.active = true;

            if crop_code != NO_CROP_CODE {
                match crop_by_code(crop_code) {
                    Some(def) => {
                        tile.crop = Some(def.name);
                        *tile_counts.entry(def.name.to_string()).or_insert(0) += 1;
                    }
                    None => warnings.push(UnknownCode {
                        code: crop_code.to_string(),
                        kind: CodeKind::Crop,
                        plot_index,
                        tile_index,
                    }),
                }
            }

            if let Some(fert) = fert_code {
                if fert != NO_FERTILIZER_CODE {
                    match fertilizer_by_code(fert) {
                        Some(def) => tile.fertilizer = Some(def.name),
                        None => warnings.push(UnknownCode {
                            code: fert.to_string(),
                            kind: CodeKind::Fertilizer,
                            plot_index,
                            tile_index,
                        }),
                    }
                }
            }
        }
    }

    // Raw tile counts collapse into plant counts by footprint. Integer
    // floor division: a partial bush/tree undercounts silently, which is
    // the accepted behavior of the format.
    let mut crop_counts = BTreeMap::new();
    let mut total_plants = 0u32;
    for (name, count) in &tile_counts {
        let plants = count / crop_footprint(name);
        total_plants += plants;
        crop_counts.insert(name.clone(), plants);
    }

    let settings = if sections.len() > 3 {
        Some(sections[3..].join("_"))
    } else {
        None
    };

    Ok(ParsedGarden {
        version: version.to_string(),
        plot_rows,
        plot_cols,
        active_plots,
        tiles,
        tile_counts,
        crop_counts,
        total_plants,
        warnings,
        settings,
    })
}

/// Dimension section: a discarded plot-size marker, then one `0`/`1` digit
/// string per plot row (inactive/active plot columns).
fn parse_dimension_block(block: &str) -> Result<Vec<Vec<bool>>, DecodeError> {
    let mut parts = block.split('-');
    // First token is the redundant plot-size marker.
    let _marker = parts.next();

    let rows: Vec<&str> = parts.collect();
    if rows.is_empty() || rows[0].is_empty() {
        return Err(DecodeError::InvalidFormat(
            "dimension block has no plot rows".to_string(),
        ));
    }

    let cols = rows[0].len();
    let mut active = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != cols {
            return Err(DecodeError::InvalidFormat(format!(
                "dimension row {} has {} columns, expected {}",
                row_index,
                row.len(),
                cols
            )));
        }
        let mut flags = Vec::with_capacity(cols);
        for ch in row.chars() {
            match ch {
                '0' => flags.push(false),
                '1' => flags.push(true),
                other => {
                    return Err(DecodeError::InvalidFormat(format!(
                        "dimension row {} contains {:?}, expected 0/1 digits",
                        row_index, other
                    )))
                }
            }
        }
        active.push(flags);
    }
    Ok(active)
}

/// Crop section: a required `CR` prefix, then one dash-separated entry per
/// active plot.
fn parse_crop_block(block: &str) -> Result<Vec<&str>, DecodeError> {
    let rest = block.strip_prefix("CR").ok_or_else(|| {
        DecodeError::InvalidFormat("crop block is missing the CR prefix".to_string())
    })?;
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    Ok(rest.split('-').collect())
}

/// Tile-token grammar: a token starts with one uppercase ASCII letter and
/// continues consuming either `.` followed by an uppercase letter (the
/// fertilizer code, itself allowed a lowercase continuation) or any
/// non-uppercase character (two-letter crop codes such as `Co`).
///
/// Returns `None` when the entry does not begin at a token boundary; token
/// counts are validated by the caller.
fn tokenize_plot(entry: &str) -> Option<Vec<&str>> {
    if entry.is_empty() {
        return Some(Vec::new());
    }
    let bytes = entry.as_bytes();
    if !bytes[0].is_ascii_uppercase() {
        return None;
    }

    let mut starts = vec![0usize];
    for i in 1..bytes.len() {
        // An uppercase letter opens a new token unless a '.' attached it
        // to the current one as a fertilizer code.
        if bytes[i].is_ascii_uppercase() && bytes[i - 1] != b'.' {
            starts.push(i);
        }
    }
    starts.push(bytes.len());

    Some(
        starts
            .windows(2)
            .map(|pair| &entry[pair[0]..pair[1]])
            .collect(),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "v0.4_D-111-111-111_CR-TTTTTTTTT-PPPPPPPPP-AAAAAAAAA-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN";

    #[test]
    fn test_sample_code_counts() {
        let garden = decode(SAMPLE).expect("sample must decode");
        assert_eq!(garden.plot_rows, 3);
        assert_eq!(garden.plot_cols, 3);
        assert_eq!(garden.active_plot_count(), 9);
        // 9 single-tile tomatoes, 9 single-tile potatoes, one 9-tile apple
        // tree, six empty plots.
        assert_eq!(garden.crop_counts.get("Tomato"), Some(&9));
        assert_eq!(garden.crop_counts.get("Potato"), Some(&9));
        assert_eq!(garden.crop_counts.get("Apple"), Some(&1));
        assert_eq!(garden.total_plants, 19);
        assert!(garden.warnings.is_empty());
    }

    #[test]
    fn test_sample_tile_placement() {
        let garden = decode(SAMPLE).expect("sample must decode");
        // Plot (0,0) is all tomato, plot (0,2) all apple.
        assert_eq!(garden.tiles[0][0].crop, Some("Tomato"));
        assert_eq!(garden.tiles[2][2].crop, Some("Tomato"));
        assert_eq!(garden.tiles[0][6].crop, Some("Apple"));
        assert_eq!(garden.tiles[2][8].crop, Some("Apple"));
        // Plot (1,0) is all N: active tiles without an assignment.
        assert!(garden.tiles[3][0].active);
        assert_eq!(garden.tiles[3][0].crop, None);
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        match decode("garbage") {
            Err(DecodeError::InvalidFormat(_)) => {}
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_version_marker() {
        assert!(matches!(
            decode("0.4_D-1_CR-NNNNNNNNN"),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_bare_version_marker_is_accepted() {
        let garden = decode("v_D-1_CR-NNNNNNNNN").expect("prefix-only version check");
        assert_eq!(garden.version, "v");
        assert_eq!(garden.total_plants, 0);
    }

    #[test]
    fn test_eight_tokens_is_tile_count_mismatch() {
        // Second plot has 8 tiles instead of 9.
        let code = "v0.4_D-11_CR-TTTTTTTTT-TTTTTTTT";
        match decode(code) {
            Err(DecodeError::TileCountMismatch { plot_index, found }) => {
                assert_eq!(plot_index, 1);
                assert_eq!(found, 8);
            }
            other => panic!("expected TileCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_crop_code_is_a_warning() {
        let code = "v0.4_D-1_CR-ZTTTTTTTT";
        let garden = decode(code).expect("unknown code must not abort the decode");
        assert_eq!(garden.warnings.len(), 1);
        assert_eq!(garden.warnings[0].code, "Z");
        assert_eq!(garden.warnings[0].kind, CodeKind::Crop);
        assert_eq!(garden.warnings[0].tile_index, 0);
        assert_eq!(garden.tiles[0][0].crop, None);
        assert!(garden.tiles[0][0].active);
        assert_eq!(garden.crop_counts.get("Tomato"), Some(&8));
    }

    #[test]
    fn test_inactive_plots_take_no_entries() {
        // Checkerboard: plots (0,0) and (1,1) active.
        let code = "v0.4_D-10-01_CR-TTTTTTTTT-PPPPPPPPP";
        let garden = decode(code).expect("must decode");
        assert_eq!(garden.active_plot_count(), 2);
        assert_eq!(garden.tiles[0][0].crop, Some("Tomato"));
        assert!(!garden.tiles[0][3].active);
        assert_eq!(garden.tiles[3][3].crop, Some("Potato"));
        assert_eq!(garden.total_plants, 18);
    }

    #[test]
    fn test_entry_count_mismatch_is_fatal() {
        // Two active plots, one entry.
        assert!(matches!(
            decode("v0.4_D-11_CR-TTTTTTTTT"),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_two_letter_codes_and_fertilizer() {
        // Cotton ("Co") with Hydrate Pro on the first tile.
        let code = "v0.4_D-1_CR-Co.YCoCoCoCoCoCoCoCo";
        let garden = decode(code).expect("must decode");
        assert_eq!(garden.crop_counts.get("Cotton"), Some(&9));
        assert_eq!(garden.tiles[0][0].fertilizer, Some("Hydrate Pro"));
        assert_eq!(garden.tiles[0][1].fertilizer, None);
    }

    #[test]
    fn test_unknown_fertilizer_is_a_warning() {
        let code = "v0.4_D-1_CR-T.XTTTTTTTT";
        let garden = decode(code).expect("must decode");
        assert_eq!(garden.warnings.len(), 1);
        assert_eq!(garden.warnings[0].kind, CodeKind::Fertilizer);
        // The crop on that tile still counts.
        assert_eq!(garden.crop_counts.get("Tomato"), Some(&9));
    }

    #[test]
    fn test_partial_bush_floors() {
        // Five blueberry tiles of a 4-tile bush: 1 plant, remainder lost.
        let code = "v0.4_D-1_CR-BBBBBNNNN";
        let garden = decode(code).expect("must decode");
        assert_eq!(garden.tile_counts.get("Blueberry"), Some(&5));
        assert_eq!(garden.crop_counts.get("Blueberry"), Some(&1));

        // Three tiles floor all the way to zero plants, but the crop still
        // appears in the summary for the tracker.
        let code = "v0.4_D-1_CR-BBBNNNNNN";
        let garden = decode(code).expect("must decode");
        assert_eq!(garden.crop_counts.get("Blueberry"), Some(&0));
        let summary = garden.crop_summary();
        assert_eq!(summary, vec![("Blueberry".to_string(), 0, 3)]);
    }

    #[test]
    fn test_settings_carried_through_opaque() {
        let code = "v0.4_D-1_CR-NNNNNNNNN_D30-L0-F.NONE";
        let garden = decode(code).expect("must decode");
        assert_eq!(garden.settings.as_deref(), Some("D30-L0-F.NONE"));
        assert_eq!(garden.total_plants, 0);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let a = decode(SAMPLE).expect("must decode");
        let b = decode(SAMPLE).expect("must decode");
        assert_eq!(a, b);
    }

    #[test]
    fn test_share_url_unwrap() {
        let url = format!(
            "https://{}/?{}={}",
            PLANNER_HOST, PLANNER_QUERY_PARAM, SAMPLE
        );
        let garden = decode(&url).expect("share URL must decode");
        assert_eq!(garden.total_plants, 19);
    }

    #[test]
    fn test_share_url_wrong_host() {
        let url = format!("https://example.com/?{}={}", PLANNER_QUERY_PARAM, SAMPLE);
        assert!(matches!(
            decode(&url),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_share_url_missing_param() {
        let url = format!("https://{}/?other=1", PLANNER_HOST);
        assert!(matches!(
            decode(&url),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_plot_entry_with_leading_junk() {
        let code = "v0.4_D-1_CR-xTTTTTTTTT";
        assert!(matches!(
            decode(code),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_tokenizer_grammar() {
        let tokens = tokenize_plot("Co.YT.HBtNNNNN").expect("starts at a boundary");
        assert_eq!(tokens, vec!["Co.Y", "T.H", "Bt", "N", "N", "N", "N", "N"]);
        assert!(tokenize_plot(".T").is_none());
        assert_eq!(tokenize_plot("").map(|t| t.len()), Some(0));
    }
}
