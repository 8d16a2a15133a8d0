//! Catalog Item Schema
//!
//! Data structures for catalog-sourced components. Only a handful of fields
//! feed the compatibility rules (sockets, memory type, form factors and the
//! wattage figures); everything else is carried through for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::PcForgeError;

/// A build slot. Declaration order is slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Ram,
        Category::Gpu,
        Category::Storage,
        Category::Psu,
        Category::Case,
        Category::Cooler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Motherboard => "motherboard",
            Category::Ram => "ram",
            Category::Gpu => "gpu",
            Category::Storage => "storage",
            Category::Psu => "psu",
            Category::Case => "case",
            Category::Cooler => "cooler",
        }
    }

    /// Slot label used in exports and CLI listings.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "Processor",
            Category::Motherboard => "Motherboard",
            Category::Ram => "Memory",
            Category::Gpu => "Graphics Card",
            Category::Storage => "Storage",
            Category::Psu => "Power Supply",
            Category::Case => "Case",
            Category::Cooler => "CPU Cooler",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PcForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| PcForgeError::UnknownCategory(s.to_string()))
    }
}

/// Motherboard / case form factor.
///
/// Unrecognized tokens are kept verbatim and rank as ATX, so an unknown
/// form factor never blocks a pairing on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormFactor {
    #[serde(rename = "mATX")]
    MicroAtx,
    #[serde(rename = "ATX")]
    Atx,
    #[serde(rename = "E-ATX")]
    ExtendedAtx,
    #[serde(untagged)]
    Other(String),
}

impl FormFactor {
    /// Size rank: mATX 1, ATX 2, E-ATX 3, anything else 2.
    pub fn rank(&self) -> u8 {
        match self {
            FormFactor::MicroAtx => 1,
            FormFactor::Atx => 2,
            FormFactor::ExtendedAtx => 3,
            FormFactor::Other(_) => 2,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormFactor::MicroAtx => "mATX",
            FormFactor::Atx => "ATX",
            FormFactor::ExtendedAtx => "E-ATX",
            FormFactor::Other(token) => token,
        }
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FormFactor {
    fn from(token: &str) -> Self {
        match token {
            "mATX" => FormFactor::MicroAtx,
            "ATX" => FormFactor::Atx,
            "E-ATX" => FormFactor::ExtendedAtx,
            other => FormFactor::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSpecs {
    pub socket: String,
    /// Thermal design power in watts. Missing values count as 0.
    #[serde(default)]
    pub tdp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    /// Base clock (GHz)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    /// Boost clock (GHz)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotherboardSpecs {
    pub socket: String,
    pub ram_type: String,
    pub form_factor: FormFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RamSpecs {
    #[serde(rename = "type")]
    pub kind: String,
    /// MHz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    /// GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuSpecs {
    #[serde(default)]
    pub tdp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_clock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_clock: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpecs {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    /// Sequential read (MB/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<u32>,
    /// Sequential write (MB/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iface: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsuSpecs {
    pub wattage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modular: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSpecs {
    pub form_factor: FormFactor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolerSpecs {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub tdp_capacity: f64,
}

/// Category-specific fields, tagged by the `category` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Specs {
    Cpu(CpuSpecs),
    Motherboard(MotherboardSpecs),
    Ram(RamSpecs),
    Gpu(GpuSpecs),
    Storage(StorageSpecs),
    Psu(PsuSpecs),
    Case(CaseSpecs),
    Cooler(CoolerSpecs),
}

/// One purchasable component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub price: f64,
    #[serde(flatten)]
    pub specs: Specs,
}

impl Item {
    pub fn category(&self) -> Category {
        match self.specs {
            Specs::Cpu(_) => Category::Cpu,
            Specs::Motherboard(_) => Category::Motherboard,
            Specs::Ram(_) => Category::Ram,
            Specs::Gpu(_) => Category::Gpu,
            Specs::Storage(_) => Category::Storage,
            Specs::Psu(_) => Category::Psu,
            Specs::Case(_) => Category::Case,
            Specs::Cooler(_) => Category::Cooler,
        }
    }

    /// "Brand Name" as shown in listings.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }

    /// Short spec summary for list rows. Fields absent from the catalog
    /// entry are left out.
    pub fn spec_chips(&self) -> Vec<String> {
        let mut chips = Vec::new();
        match &self.specs {
            Specs::Cpu(cpu) => {
                if let (Some(cores), Some(threads)) = (cpu.cores, cpu.threads) {
                    chips.push(format!("{}C/{}T", cores, threads));
                }
                if let Some(boost) = cpu.boost {
                    chips.push(format!("{}GHz Boost", boost));
                }
                chips.push(format!("{}W", cpu.tdp));
                chips.push(cpu.socket.clone());
            }
            Specs::Gpu(gpu) => {
                if let Some(vram) = gpu.vram {
                    chips.push(format!("{}GB VRAM", vram));
                }
                if let Some(boost) = gpu.boost_clock {
                    chips.push(format!("{}MHz", boost));
                }
                chips.push(format!("{}W", gpu.tdp));
            }
            Specs::Ram(ram) => {
                chips.push(ram.kind.clone());
                if let Some(speed) = ram.speed {
                    chips.push(format!("{}MHz", speed));
                }
                if let Some(capacity) = ram.capacity {
                    chips.push(format!("{}GB", capacity));
                }
            }
            Specs::Motherboard(mb) => {
                chips.push(mb.socket.clone());
                chips.push(mb.form_factor.to_string());
                chips.push(mb.ram_type.clone());
            }
            Specs::Storage(storage) => {
                chips.extend(storage.kind.iter().cloned());
                chips.extend(storage.capacity.iter().cloned());
                chips.extend(storage.iface.iter().cloned());
            }
            Specs::Psu(psu) => {
                chips.push(format!("{}W", psu.wattage));
                chips.extend(psu.efficiency.iter().cloned());
                if let Some(modular) = &psu.modular {
                    chips.push(format!("{} Mod.", modular));
                }
            }
            Specs::Case(case) => {
                chips.push(case.form_factor.to_string());
                chips.extend(case.color.iter().cloned());
            }
            Specs::Cooler(cooler) => {
                chips.extend(cooler.kind.iter().cloned());
                chips.push(format!("Up to {}W", cooler.tdp_capacity));
            }
        }
        chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_slots() {
        let mut shuffled = vec![Category::Cooler, Category::Cpu, Category::Psu, Category::Ram];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Cpu, Category::Ram, Category::Psu, Category::Cooler]
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("cpu".parse::<Category>().unwrap(), Category::Cpu);
        assert_eq!("Case".parse::<Category>().unwrap(), Category::Case);
        assert!(matches!(
            "fan".parse::<Category>(),
            Err(PcForgeError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_form_factor_rank() {
        assert_eq!(FormFactor::MicroAtx.rank(), 1);
        assert_eq!(FormFactor::Atx.rank(), 2);
        assert_eq!(FormFactor::ExtendedAtx.rank(), 3);
        assert_eq!(FormFactor::from("Mini-ITX").rank(), 2);
    }

    #[test]
    fn test_form_factor_serde_keeps_unknown_tokens() {
        let known: FormFactor = serde_json::from_str("\"E-ATX\"").unwrap();
        assert_eq!(known, FormFactor::ExtendedAtx);

        let unknown: FormFactor = serde_json::from_str("\"Mini-ITX\"").unwrap();
        assert_eq!(unknown, FormFactor::Other("Mini-ITX".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"Mini-ITX\"");
    }

    #[test]
    fn test_item_deserializes_with_category_tag() {
        let json = r#"{
            "id": "b650-tomahawk",
            "name": "MAG B650 Tomahawk WiFi",
            "brand": "MSI",
            "price": 219,
            "category": "motherboard",
            "socket": "AM5",
            "ramType": "DDR5",
            "formFactor": "ATX"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.category(), Category::Motherboard);
        match item.specs {
            Specs::Motherboard(ref mb) => {
                assert_eq!(mb.socket, "AM5");
                assert_eq!(mb.ram_type, "DDR5");
                assert_eq!(mb.form_factor, FormFactor::Atx);
            }
            ref other => panic!("unexpected specs: {:?}", other),
        }
    }

    #[test]
    fn test_missing_tdp_defaults_to_zero() {
        let json = r#"{"id":"x","name":"X","brand":"B","category":"gpu"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.specs, Specs::Gpu(GpuSpecs {
            tdp: 0.0,
            vram: None,
            base_clock: None,
            boost_clock: None,
        }));
    }

    #[test]
    fn test_missing_socket_is_rejected() {
        let json = r#"{"id":"x","name":"X","brand":"B","category":"cpu","tdp":65}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }

    #[test]
    fn test_spec_chips() {
        let item = Item {
            id: "r7-7700x".to_string(),
            name: "Ryzen 7 7700X".to_string(),
            brand: "AMD".to_string(),
            price: 299.0,
            specs: Specs::Cpu(CpuSpecs {
                socket: "AM5".to_string(),
                tdp: 105.0,
                cores: Some(8),
                threads: Some(16),
                base: Some(4.5),
                boost: Some(5.4),
            }),
        };
        assert_eq!(
            item.spec_chips(),
            vec!["8C/16T", "5.4GHz Boost", "105W", "AM5"]
        );
        assert_eq!(item.display_name(), "AMD Ryzen 7 7700X");
    }
}
