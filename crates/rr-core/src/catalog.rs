//! # Catalog
//!
//! The read-only list of components and presets a build is assembled from.
//! A built-in catalog ships with the crate; deployments may load their own
//! from JSON at start-up.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Category, Component, Preset, Price};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    components: Vec<Component>,
    #[serde(default)]
    presets: Vec<Preset>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate component or preset ids.
    ///
    /// Preset entries that reference unknown components are kept: they are
    /// dropped when the preset is loaded, not here.
    pub fn new(components: Vec<Component>, presets: Vec<Preset>) -> Result<Self> {
        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.id.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate component id '{}'",
                    component.id
                )));
            }
        }
        let mut seen = HashSet::new();
        for preset in &presets {
            if !seen.insert(preset.id.as_str()) {
                return Err(AppError::validation(format!("duplicate preset id '{}'", preset.id)));
            }
        }
        Ok(Self { components, presets })
    }

    /// Parses a catalog document: `{ "components": [...], "presets": [...] }`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: Catalog = serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("malformed catalog: {e}")))?;
        Self::new(parsed.components, parsed.presets)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.category == category)
    }

    /// Distinct brands offered in a category, sorted.
    pub fn brands(&self, category: Category) -> Vec<&str> {
        let mut brands: Vec<&str> = self
            .in_category(category)
            .filter_map(|c| c.brand.as_deref())
            .collect();
        brands.sort_unstable();
        brands.dedup();
        brands
    }

    /// The catalog shipped with Rusty-Rig.
    pub fn builtin() -> Self {
        use Category::*;

        let components = vec![
            part("cpu1", "Intel Core i5-13400F", Cpu, 196_99, "10 cores, 16 threads, 4.6 GHz")
                .power(65).socket("LGA1700").brand("Intel"),
            part("cpu2", "AMD Ryzen 5 7600", Cpu, 199_99, "6 cores, 12 threads, 5.1 GHz")
                .power(65).socket("AM5").brand("AMD"),
            part("cpu3", "Intel Core i7-13700K", Cpu, 359_99, "16 cores, 24 threads, 5.4 GHz")
                .power(125).socket("LGA1700").brand("Intel"),
            part("cpu4", "AMD Ryzen 7 5800X", Cpu, 299_99, "8 cores, 16 threads, 3.8 GHz")
                .power(105).socket("AM4").brand("AMD"),
            part("cpu5", "Intel Core i7-12700K", Cpu, 349_99, "12 cores, 20 threads, 3.6 GHz")
                .power(125).socket("LGA1700").brand("Intel"),
            part("cpu6", "AMD Ryzen 7 7800X3D", Cpu, 449_99, "8 cores, 16 threads, 96MB L3")
                .power(120).socket("AM5").brand("AMD"),
            part("cpu7", "AMD Ryzen 9 7950X", Cpu, 549_99, "16 cores, 32 threads, 5.7 GHz")
                .power(170).socket("AM5").brand("AMD"),
            part("cpu8", "Intel Core i9-14900K", Cpu, 589_99, "24 cores, 32 threads, 6.0 GHz")
                .power(253).socket("LGA1700").brand("Intel"),
            part("gpu1", "NVIDIA RTX 4060", Gpu, 299_99, "8GB GDDR6, 1080p")
                .power(115).brand("NVIDIA"),
            part("gpu2", "AMD RX 7700 XT", Gpu, 419_99, "12GB GDDR6, 1440p")
                .power(245).brand("AMD"),
            part("gpu3", "NVIDIA RTX 4080", Gpu, 1199_99, "16GB GDDR6X, DLSS 3")
                .power(320).brand("NVIDIA"),
            part("gpu4", "NVIDIA RTX 4070", Gpu, 599_99, "12GB GDDR6X, 5888 CUDA")
                .power(200).brand("NVIDIA"),
            part("gpu5", "AMD RX 7800 XT", Gpu, 499_99, "16GB GDDR6, 3840 stream processors")
                .power(263).brand("AMD"),
            part("gpu6", "NVIDIA RTX 4070 Ti Super", Gpu, 799_99, "16GB GDDR6X, 8448 CUDA")
                .power(285).brand("NVIDIA"),
            part("gpu7", "AMD RX 7900 XTX", Gpu, 949_99, "24GB GDDR6, 4K")
                .power(355).brand("AMD"),
            part("gpu8", "NVIDIA RTX 4090", Gpu, 1599_99, "24GB GDDR6X, 16384 CUDA")
                .power(450).brand("NVIDIA"),
            part("ram1", "Kingston Fury Beast 16GB", Ram, 54_99, "DDR5-5200, 2x8GB")
                .power(8).brand("Kingston"),
            part("ram2", "Corsair Vengeance 32GB", Ram, 129_99, "DDR5-5600, 2x16GB")
                .power(10).brand("Corsair"),
            part("ram3", "G.Skill Trident Z5 64GB", Ram, 219_99, "DDR5-6000, 2x32GB")
                .power(14).brand("G.Skill"),
            part("ram4", "G.Skill Trident Z5 32GB", Ram, 149_99, "DDR5-6000, 2x16GB")
                .power(12).brand("G.Skill"),
            part("mb1", "MSI PRO B760M-A", Motherboard, 129_99, "mATX, DDR5, PCIe 4.0")
                .socket("LGA1700").brand("MSI"),
            part("mb2", "ASUS ROG STRIX B650-A", Motherboard, 229_99, "ATX, DDR5, PCIe 5.0")
                .socket("AM5").brand("ASUS"),
            part("mb3", "Gigabyte Z790 AORUS Elite", Motherboard, 249_99, "ATX, DDR5, Wi-Fi 6E")
                .socket("LGA1700").brand("Gigabyte"),
            part("mb4", "MSI B550 Gaming Plus", Motherboard, 159_99, "ATX, DDR4, PCIe 4.0")
                .socket("AM4").brand("MSI"),
            part("mb5", "ASUS ROG STRIX Z690-E", Motherboard, 329_99, "ATX, DDR5, Wi-Fi 6E")
                .socket("LGA1700").brand("ASUS"),
            part("mb6", "ASUS ROG Maximus Z790 Hero", Motherboard, 629_99, "ATX, DDR5, Thunderbolt 4")
                .socket("LGA1700").brand("ASUS"),
            part("psu1", "Cooler Master MWE 650", Psu, 69_99, "650W, 80+ Bronze")
                .power(650).brand("Cooler Master"),
            part("psu2", "EVGA SuperNOVA 750 G6", Psu, 119_99, "750W, 80+ Gold")
                .power(750).brand("EVGA"),
            part("psu3", "Corsair RM850x", Psu, 139_99, "850W, 80+ Gold, full modular")
                .power(850).brand("Corsair"),
            part("psu4", "Seasonic Prime TX-1000", Psu, 299_99, "1000W, 80+ Titanium")
                .power(1000).brand("Seasonic"),
            part("ssd1", "Samsung 970 EVO Plus 500GB", Storage, 49_99, "NVMe M.2, 3500 MB/s")
                .power(6).brand("Samsung"),
            part("ssd2", "WD Black SN850X 1TB", Storage, 89_99, "NVMe M.2, 7300 MB/s")
                .power(6).brand("WD"),
            part("ssd3", "Samsung 990 PRO 2TB", Storage, 169_99, "NVMe M.2, 7450 MB/s")
                .power(7).brand("Samsung"),
            part("ssd4", "Samsung 990 PRO 1TB", Storage, 129_99, "NVMe M.2, 7450 MB/s")
                .power(5).brand("Samsung"),
            part("case1", "NZXT H510", Case, 79_99, "Mid tower, tempered glass")
                .brand("NZXT"),
            part("case2", "Fractal Design Meshify C", Case, 99_99, "Mid tower, high airflow")
                .brand("Fractal Design"),
            part("case3", "Lian Li O11 Dynamic", Case, 149_99, "Full tower, dual glass")
                .brand("Lian Li"),
        ];

        let presets = vec![
            preset(
                "gaming-starter",
                "Gaming Starter",
                "1080p gaming on a budget",
                &["cpu4", "gpu5", "ram2", "mb4", "psu2", "ssd4"],
            ),
            preset(
                "workstation-pro",
                "Workstation Pro",
                "Rendering and video editing",
                &["cpu5", "gpu4", "ram4", "mb5", "psu3", "ssd4"],
            ),
            preset(
                "flagship",
                "Flagship",
                "No compromises at 4K",
                &["cpu8", "gpu8", "ram3", "mb6", "psu4", "ssd3"],
            ),
            preset(
                "compact-am5",
                "Compact AM5",
                "Quiet everyday machine with room to grow",
                &["cpu2", "ram1", "mb2", "psu1", "ssd1", "case1"],
            ),
        ];

        Self { components, presets }
    }
}

fn part(id: &str, name: &str, category: Category, cents: u64, specs: &str) -> Component {
    Component {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price: Price::from_cents(cents),
        specs: specs.to_string(),
        power: None,
        socket: None,
        brand: None,
    }
}

fn preset(id: &str, name: &str, description: &str, components: &[&str]) -> Preset {
    Preset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        components: components.iter().map(|s| s.to_string()).collect(),
    }
}

impl Component {
    fn power(mut self, watts: u32) -> Self {
        self.power = Some(watts);
        self
    }

    fn socket(mut self, socket: &str) -> Self {
        self.socket = Some(socket.to_string());
        self
    }

    fn brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = Catalog::builtin();
        let rebuilt = Catalog::new(catalog.components().to_vec(), catalog.presets().to_vec());
        assert!(rebuilt.is_ok(), "builtin catalog has duplicate ids");

        for preset in catalog.presets() {
            for id in &preset.components {
                assert!(catalog.get(id).is_some(), "preset {} references {id}", preset.id);
            }
        }
        for category in Category::ALL {
            assert!(catalog.in_category(category).next().is_some(), "{category} is empty");
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = part("x1", "A", Category::Cpu, 100, "");
        let b = part("x1", "B", Category::Gpu, 200, "");
        let err = Catalog::new(vec![a, b], vec![]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn from_json_reads_components_and_presets() {
        let raw = r#"{
            "components": [
                { "id": "c1", "name": "Chip", "category": "cpu", "price": 12345,
                  "specs": "fast", "power": 65, "socket": "AM5", "brand": "AMD" },
                { "id": "b1", "name": "Box", "category": "case", "price": 5000, "specs": "" }
            ],
            "presets": [
                { "id": "p", "name": "P", "description": "", "components": ["c1", "gone"] }
            ]
        }"#;
        let catalog = Catalog::from_json(raw).unwrap();
        let chip = catalog.get("c1").unwrap();
        assert_eq!(chip.price, Price::from_cents(12345));
        assert_eq!(chip.socket.as_deref(), Some("AM5"));
        assert_eq!(catalog.get("b1").unwrap().power, None);
        assert_eq!(catalog.preset("p").unwrap().components.len(), 2);
    }

    #[test]
    fn from_json_rejects_unknown_category() {
        let raw = r#"{ "components": [
            { "id": "f", "name": "Fan", "category": "cooler", "price": 1, "specs": "" }
        ] }"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn brands_are_sorted_and_distinct() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.brands(Category::Cpu), vec!["AMD", "Intel"]);
        assert_eq!(catalog.brands(Category::Motherboard), vec!["ASUS", "Gigabyte", "MSI"]);
    }
}
