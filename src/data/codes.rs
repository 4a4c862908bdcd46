//! Crop and fertilizer letter-code tables for save-code version v0.4.

/// Tile footprint class. A bush occupies a 2×2 block, a tree the full 3×3
/// plot; raw tile counts divide by the footprint to give plant counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropSize {
    Single,
    Bush,
    Tree,
}

impl CropSize {
    pub fn footprint(self) -> u32 {
        match self {
            CropSize::Single => 1,
            CropSize::Bush => 4,
            CropSize::Tree => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropCode {
    pub code: &'static str,
    pub name: &'static str,
    pub size: CropSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FertilizerCode {
    pub code: &'static str,
    pub name: &'static str,
}

/// Code for an empty tile. Maps to "no crop" and never produces a tile
/// assignment.
pub const NO_CROP_CODE: &str = "N";

/// Code for "no fertilizer" inside a tile token.
pub const NO_FERTILIZER_CODE: &str = "N";

/// Crop code table, save-code v0.4. Single uppercase letter, or uppercase
/// followed by lowercase for two-letter codes.
pub const CROP_CODES: &[CropCode] = &[
    CropCode { code: "N", name: "None", size: CropSize::Single },
    CropCode { code: "T", name: "Tomato", size: CropSize::Single },
    CropCode { code: "P", name: "Potato", size: CropSize::Single },
    CropCode { code: "R", name: "Rice", size: CropSize::Single },
    CropCode { code: "W", name: "Wheat", size: CropSize::Single },
    CropCode { code: "C", name: "Carrot", size: CropSize::Single },
    CropCode { code: "O", name: "Onion", size: CropSize::Single },
    CropCode { code: "Co", name: "Cotton", size: CropSize::Single },
    CropCode { code: "Cr", name: "Corn", size: CropSize::Single },
    CropCode { code: "Cb", name: "Napa Cabbage", size: CropSize::Single },
    CropCode { code: "Bk", name: "Bok Choy", size: CropSize::Single },
    CropCode { code: "Pm", name: "Rockhopper Pumpkin", size: CropSize::Single },
    // Bushes (4 tiles per plant)
    CropCode { code: "B", name: "Blueberry", size: CropSize::Bush },
    CropCode { code: "S", name: "Spicy Pepper", size: CropSize::Bush },
    CropCode { code: "Bt", name: "Batterfly Bean", size: CropSize::Bush },
    // Trees (9 tiles per plant)
    CropCode { code: "A", name: "Apple", size: CropSize::Tree },
];

/// Fertilizer code table, save-code v0.4.
pub const FERTILIZER_CODES: &[FertilizerCode] = &[
    FertilizerCode { code: "N", name: "None" },
    FertilizerCode { code: "S", name: "Speedy Gro" },
    FertilizerCode { code: "Q", name: "Quality Up" },
    FertilizerCode { code: "W", name: "Weed Block" },
    FertilizerCode { code: "H", name: "Harvest Boost" },
    FertilizerCode { code: "Y", name: "Hydrate Pro" },
];

pub fn crop_by_code(code: &str) -> Option<&'static CropCode> {
    CROP_CODES.iter().find(|c| c.code == code)
}

pub fn crop_by_name(name: &str) -> Option<&'static CropCode> {
    CROP_CODES.iter().find(|c| c.name == name)
}

pub fn fertilizer_by_code(code: &str) -> Option<&'static FertilizerCode> {
    FERTILIZER_CODES.iter().find(|f| f.code == code)
}

/// Footprint for a crop name; unknown names count as single-tile so an
/// unexpected table gap never divides by zero.
pub fn crop_footprint(name: &str) -> u32 {
    crop_by_name(name).map(|c| c.size.footprint()).unwrap_or(1)
}
