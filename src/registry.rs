//! Static per-object acoustic descriptors and their resolution.
//!
//! The reference implementation's `objects.csv` catalog is not part of this
//! crate's retrieval pack, so [`CATALOG`] below is a small, invented
//! compile-time stand-in rather than the real asset table; see DESIGN.md.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::material::{AudioMaterial, SizeBucket};

/// Default acoustic parameters used when neither an override, a catalog
/// entry, nor any derivable peer exists.
const DEFAULT_AMP: f64 = 0.2;
const DEFAULT_MATERIAL: AudioMaterial = AudioMaterial::PlasticHard;
const DEFAULT_RESONANCE: f64 = 0.45;
const DEFAULT_SIZE: u8 = 1;

/// Fixed acoustic parameters for the floor, which is never stored in the
/// registry (it has no object id of its own).
const FLOOR_AMP: f64 = 0.5;
const FLOOR_SIZE: u8 = 4;
const FLOOR_MASS: f64 = 100.0;

/// A bundled catalog row: name-indexed acoustic defaults for common objects.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRow {
    pub amp: f64,
    pub mass: f64,
    pub material: AudioMaterial,
    pub bounciness: f64,
    pub resonance: f64,
    pub size: u8,
}

/// Bundled object catalog (name, acoustic defaults). Parsed once into a
/// `HashMap` on first use.
const CATALOG: &[(&str, CatalogRow)] = &[
    (
        "chair",
        CatalogRow { amp: 0.3, mass: 5.0, material: AudioMaterial::WoodMedium, bounciness: 0.3, resonance: 0.4, size: 2 },
    ),
    (
        "table",
        CatalogRow { amp: 0.35, mass: 20.0, material: AudioMaterial::WoodHard, bounciness: 0.25, resonance: 0.45, size: 3 },
    ),
    (
        "vase",
        CatalogRow { amp: 0.4, mass: 1.0, material: AudioMaterial::Ceramic, bounciness: 0.1, resonance: 0.5, size: 1 },
    ),
    (
        "bowl",
        CatalogRow { amp: 0.35, mass: 0.5, material: AudioMaterial::Ceramic, bounciness: 0.1, resonance: 0.5, size: 0 },
    ),
    (
        "cup",
        CatalogRow { amp: 0.3, mass: 0.2, material: AudioMaterial::Ceramic, bounciness: 0.1, resonance: 0.45, size: 0 },
    ),
    (
        "book",
        CatalogRow { amp: 0.2, mass: 0.4, material: AudioMaterial::Paper, bounciness: 0.05, resonance: 0.2, size: 0 },
    ),
    (
        "bottle",
        CatalogRow { amp: 0.3, mass: 0.6, material: AudioMaterial::Glass, bounciness: 0.15, resonance: 0.5, size: 0 },
    ),
    (
        "box",
        CatalogRow { amp: 0.25, mass: 2.0, material: AudioMaterial::Cardboard, bounciness: 0.1, resonance: 0.3, size: 1 },
    ),
    (
        "ball",
        CatalogRow { amp: 0.4, mass: 0.5, material: AudioMaterial::Rubber, bounciness: 0.8, resonance: 0.4, size: 0 },
    ),
    (
        "pan",
        CatalogRow { amp: 0.45, mass: 1.5, material: AudioMaterial::Metal, bounciness: 0.4, resonance: 0.6, size: 1 },
    ),
];

static CATALOG_MAP: OnceLock<HashMap<&'static str, CatalogRow>> = OnceLock::new();

fn catalog_map() -> &'static HashMap<&'static str, CatalogRow> {
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

/// Per-object acoustic descriptor resolved once per scene load and then
/// cached for the remainder of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAudio {
    pub object_id: u32,
    pub name: String,
    pub amp: f64,
    pub mass: f64,
    pub material: AudioMaterial,
    pub bounciness: f64,
    pub resonance: f64,
    pub size: SizeBucket,
}

impl StaticAudio {
    /// The mode-bank lookup key for this object's current material/size.
    pub fn mode_key(&self) -> String {
        crate::material::material_size_key(self.material, self.size)
    }

    /// A floor's descriptor: never stored in the registry, rebuilt on demand
    /// from the configured floor material.
    pub fn floor(floor_material: AudioMaterial) -> Self {
        Self {
            object_id: 0,
            name: format!("{floor_material}_floor"),
            amp: FLOOR_AMP,
            mass: FLOOR_MASS,
            material: floor_material,
            bounciness: 0.3,
            resonance: 0.45,
            size: SizeBucket::new(FLOOR_SIZE).expect("4 is in range"),
        }
    }
}

/// One object's inputs for resolution: identity, category, and physics.
#[derive(Debug, Clone)]
pub struct ObjectInit {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub mass: f64,
    pub bounciness: f64,
}

/// Per-object static acoustic state, populated once per scene and cleared
/// on reset.
#[derive(Debug, Default)]
pub struct StaticAudioRegistry {
    overrides: HashMap<String, StaticAudio>,
    by_id: HashMap<u32, StaticAudio>,
}

impl StaticAudioRegistry {
    pub fn new(overrides: HashMap<String, StaticAudio>) -> Self {
        Self { overrides, by_id: HashMap::new() }
    }

    pub fn get(&self, id: u32) -> Option<&StaticAudio> {
        self.by_id.get(&id)
    }

    pub fn is_populated(&self) -> bool {
        !self.by_id.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
    }

    /// Resolves acoustic descriptors for a batch of objects, per the
    /// override -> catalog -> derivation resolution order.
    pub fn populate(&mut self, objects: &[ObjectInit]) {
        let mut pending = Vec::new();

        for obj in objects {
            if let Some(sa) = self.overrides.get(&obj.name) {
                let mut resolved = sa.clone();
                resolved.object_id = obj.id;
                resolved.mass = obj.mass;
                resolved.bounciness = obj.bounciness;
                self.by_id.insert(obj.id, resolved);
            } else if let Some(row) = catalog_map().get(obj.name.as_str()) {
                let resolved = StaticAudio {
                    object_id: obj.id,
                    name: obj.name.clone(),
                    amp: row.amp,
                    mass: obj.mass,
                    material: row.material,
                    bounciness: obj.bounciness,
                    resonance: row.resonance,
                    size: SizeBucket::new(row.size).expect("catalog sizes are in range"),
                };
                self.by_id.insert(obj.id, resolved);
            } else {
                pending.push(obj);
            }
        }

        for obj in pending {
            let category_peers: Vec<&StaticAudio> = objects
                .iter()
                .filter(|o| o.id != obj.id && o.category == obj.category)
                .filter_map(|o| self.by_id.get(&o.id))
                .collect();

            let resolved = if !category_peers.is_empty() {
                aggregate(obj, &category_peers)
            } else {
                let mass_peers: Vec<&StaticAudio> = objects
                    .iter()
                    .filter(|o| o.id != obj.id)
                    .filter_map(|o| self.by_id.get(&o.id))
                    .filter(|sa| {
                        let ratio = sa.mass / obj.mass.max(f64::EPSILON);
                        (1.0 / 1.5..=1.5).contains(&ratio)
                    })
                    .collect();

                if !mass_peers.is_empty() {
                    aggregate(obj, &mass_peers)
                } else {
                    StaticAudio {
                        object_id: obj.id,
                        name: obj.name.clone(),
                        amp: DEFAULT_AMP,
                        mass: obj.mass,
                        material: DEFAULT_MATERIAL,
                        bounciness: obj.bounciness,
                        resonance: DEFAULT_RESONANCE,
                        size: SizeBucket::new(DEFAULT_SIZE).expect("1 is in range"),
                    }
                }
            };

            self.by_id.insert(obj.id, resolved);
        }
    }

    /// Injects a robot joint as a static audio object: metal, moderately
    /// bouncy, acoustic defaults otherwise.
    pub fn insert_robot_joint(&mut self, id: u32, name: String, mass: f64) {
        self.by_id.insert(
            id,
            StaticAudio {
                object_id: id,
                name,
                amp: DEFAULT_AMP,
                mass,
                material: AudioMaterial::Metal,
                bounciness: 0.6,
                resonance: DEFAULT_RESONANCE,
                size: SizeBucket::new(DEFAULT_SIZE).expect("1 is in range"),
            },
        );
    }
}

fn aggregate(obj: &ObjectInit, peers: &[&StaticAudio]) -> StaticAudio {
    let n = peers.len() as f64;
    let amp = peers.iter().map(|p| p.amp).sum::<f64>() / n;
    let resonance = peers.iter().map(|p| p.resonance).sum::<f64>() / n;
    let size_mean = peers.iter().map(|p| p.size.get() as f64).sum::<f64>() / n;
    let size = SizeBucket::new(size_mean.round().clamp(0.0, 5.0) as u8).expect("clamped to range");

    let material = mode_material(peers);

    StaticAudio {
        object_id: obj.id,
        name: obj.name.clone(),
        amp,
        mass: obj.mass,
        material,
        bounciness: obj.bounciness,
        resonance,
        size,
    }
}

fn mode_material(peers: &[&StaticAudio]) -> AudioMaterial {
    let mut counts: HashMap<AudioMaterial, usize> = HashMap::new();
    for p in peers {
        *counts.entry(p.material).or_insert(0) += 1;
    }
    peers
        .iter()
        .map(|p| p.material)
        .max_by_key(|m| counts[m])
        .unwrap_or(DEFAULT_MATERIAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn init(id: u32, name: &str, category: &str, mass: f64) -> ObjectInit {
        ObjectInit { id, name: name.to_string(), category: category.to_string(), mass, bounciness: 0.2 }
    }

    #[test]
    fn catalog_hit_uses_bundled_defaults_with_physics_mass() {
        let mut reg = StaticAudioRegistry::new(HashMap::new());
        reg.populate(&[init(1, "chair", "furniture", 7.5)]);
        let sa = reg.get(1).unwrap();
        assert_eq!(sa.material, AudioMaterial::WoodMedium);
        assert_eq!(sa.mass, 7.5);
    }

    #[test]
    fn override_takes_priority_over_catalog() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "chair".to_string(),
            StaticAudio {
                object_id: 0,
                name: "chair".to_string(),
                amp: 0.9,
                mass: 0.0,
                material: AudioMaterial::Metal,
                bounciness: 0.0,
                resonance: 0.9,
                size: SizeBucket::new(5).unwrap(),
            },
        );
        let mut reg = StaticAudioRegistry::new(overrides);
        reg.populate(&[init(1, "chair", "furniture", 3.0)]);
        assert_eq!(reg.get(1).unwrap().material, AudioMaterial::Metal);
        assert_eq!(reg.get(1).unwrap().mass, 3.0);
    }

    #[test]
    fn unknown_name_derives_from_category_peers() {
        let mut reg = StaticAudioRegistry::new(HashMap::new());
        reg.populate(&[
            init(1, "chair", "furniture", 5.0),
            init(2, "mystery_stool", "furniture", 5.0),
        ]);
        let sa = reg.get(2).unwrap();
        assert_eq!(sa.material, AudioMaterial::WoodMedium);
    }

    #[test]
    fn unknown_name_with_no_category_peers_falls_back_to_defaults() {
        let mut reg = StaticAudioRegistry::new(HashMap::new());
        reg.populate(&[init(1, "mystery_thing", "unclassified", 500.0)]);
        let sa = reg.get(1).unwrap();
        assert_eq!(sa.material, DEFAULT_MATERIAL);
        assert_eq!(sa.amp, DEFAULT_AMP);
    }

    #[test]
    fn floor_is_never_stored_but_constructible_on_demand() {
        let sa = StaticAudio::floor(AudioMaterial::Stone);
        assert_eq!(sa.mode_key(), "stone_4");
        assert_eq!(sa.amp, FLOOR_AMP);
    }
}
