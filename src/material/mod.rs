//! Materials, size buckets, and the per-`(material, size)` mode distribution bank.

mod bank;

pub use bank::{MaterialModeBank, ModeDistribution};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed enumeration of synthesizable contact materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMaterial {
    Ceramic,
    WoodHard,
    WoodMedium,
    WoodSoft,
    Metal,
    Glass,
    Paper,
    Cardboard,
    Leather,
    Fabric,
    PlasticHard,
    PlasticSoftFoam,
    Rubber,
    Stone,
}

impl AudioMaterial {
    /// All materials, in a fixed order used to enumerate the mode bank.
    pub const ALL: [AudioMaterial; 14] = [
        AudioMaterial::Ceramic,
        AudioMaterial::WoodHard,
        AudioMaterial::WoodMedium,
        AudioMaterial::WoodSoft,
        AudioMaterial::Metal,
        AudioMaterial::Glass,
        AudioMaterial::Paper,
        AudioMaterial::Cardboard,
        AudioMaterial::Leather,
        AudioMaterial::Fabric,
        AudioMaterial::PlasticHard,
        AudioMaterial::PlasticSoftFoam,
        AudioMaterial::Rubber,
        AudioMaterial::Stone,
    ];

    /// The snake_case name used as half of a mode-bank lookup key.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMaterial::Ceramic => "ceramic",
            AudioMaterial::WoodHard => "wood_hard",
            AudioMaterial::WoodMedium => "wood_medium",
            AudioMaterial::WoodSoft => "wood_soft",
            AudioMaterial::Metal => "metal",
            AudioMaterial::Glass => "glass",
            AudioMaterial::Paper => "paper",
            AudioMaterial::Cardboard => "cardboard",
            AudioMaterial::Leather => "leather",
            AudioMaterial::Fabric => "fabric",
            AudioMaterial::PlasticHard => "plastic_hard",
            AudioMaterial::PlasticSoftFoam => "plastic_soft_foam",
            AudioMaterial::Rubber => "rubber",
            AudioMaterial::Stone => "stone",
        }
    }
}

impl fmt::Display for AudioMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse acoustic size class in `[0, 5]`, paired with material to select a
/// mode distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SizeBucket(u8);

impl SizeBucket {
    /// Validates `value` is within `[0, 5]`.
    pub fn new(value: u8) -> Option<Self> {
        if value <= 5 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SizeBucket {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SizeBucket::new(value).ok_or_else(|| format!("size bucket {value} out of range [0, 5]"))
    }
}

impl From<SizeBucket> for u8 {
    fn from(size: SizeBucket) -> u8 {
        size.0
    }
}

/// Builds the `"{material}_{size}"` key used to index the mode bank.
pub fn material_size_key(material: AudioMaterial, size: SizeBucket) -> String {
    format!("{}_{}", material.as_str(), size.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn size_bucket_rejects_out_of_range() {
        assert!(SizeBucket::new(6).is_none());
        assert!(SizeBucket::new(5).is_some());
    }

    #[test]
    fn material_size_key_format() {
        let key = material_size_key(AudioMaterial::WoodMedium, SizeBucket::new(2).unwrap());
        assert_eq!(key, "wood_medium_2");
    }

    #[test]
    fn material_serde_round_trip() {
        let m = AudioMaterial::PlasticSoftFoam;
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"plastic_soft_foam\"");
        let back: AudioMaterial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
