//! Inventory catalog: stored records, their typed form, and the in-memory snapshot.
//!
//! A catalog file is a JSON array of [`CatalogRecord`] values. Two record shapes
//! exist in the wild and both load through the same type:
//!
//! - current shape: `itemId`, `unitPrice`, `calcType` of `fixed` / `per_stop` /
//!   `ratio` with `fixedQty`, `ratioStops` and `ratioQty`;
//! - legacy shape: `id`, `price`, `calcType` of `fixed` / `simple_var` /
//!   `coeff_var` with `baseQty` and `coeff`.
//!
//! Records keep the optional, tag-dependent parameters exactly as stored. The
//! quote assembler never looks at them directly: it works on [`CatalogItem`],
//! whose [`CalcRule`] carries only the parameters its formula needs.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::store::write_json_atomically;
use crate::system::Category;

/// Catalog entry as stored on disk or supplied by a persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// Stable item identifier.
    #[serde(alias = "id")]
    pub item_id: u32,
    /// Display name.
    pub name: String,
    /// Unit label, e.g. `عدد` (piece) or `متر` (meter).
    pub unit: String,
    /// System type this item belongs to.
    pub category: Category,
    /// Price of one unit, in the smallest whole currency unit.
    #[serde(alias = "price")]
    pub unit_price: f64,
    /// Calculation-type tag. Kept as text so unknown tags survive a load/save cycle.
    pub calc_type: String,
    /// Quantity for `fixed` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_qty: Option<f64>,
    /// Reference stop count for `ratio` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_stops: Option<u32>,
    /// Quantity at the reference stop count for `ratio` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_qty: Option<u32>,
    /// Legacy base quantity (`fixed` and `coeff_var`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_qty: Option<f64>,
    /// Legacy per-stop coefficient (`coeff_var`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coeff: Option<f64>,
    /// Human-readable formula, shown next to the item and otherwise unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula_text: Option<String>,
    /// Inactive items are never quoted.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Formula mapping a stop count to a line quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcRule {
    /// Constant quantity (`fixed`).
    Fixed {
        /// Quantity regardless of stop count.
        quantity: f64,
    },
    /// One unit per effective stop (`per_stop`).
    PerStop,
    /// Scales a reference `stops : quantity` pair (`ratio`). `stops` is never zero.
    Ratio {
        /// Reference stop count.
        stops: u32,
        /// Quantity at the reference stop count.
        quantity: u32,
    },
    /// Legacy `simple_var`: one unit per stop, no meter adjustment.
    StopCount,
    /// Legacy `coeff_var`: `stops * coefficient + base_quantity`, no meter adjustment.
    Coefficient {
        /// Units added per stop.
        coefficient: f64,
        /// Units added once. May be negative in historical data.
        base_quantity: f64,
    },
    /// Unknown tag, or a ratio whose parameters are missing or zero.
    Unusable {
        /// Tag as found in the record.
        calc_type: String,
    },
}

impl CalcRule {
    /// Build the rule described by a record's tag and its parameters.
    pub fn from_record(record: &CatalogRecord) -> Self {
        let tag = record.calc_type.trim().to_ascii_lowercase();
        match tag.as_str() {
            "fixed" => CalcRule::Fixed {
                quantity: record.fixed_qty.or(record.base_qty).unwrap_or(0.0),
            },
            "per_stop" => CalcRule::PerStop,
            "ratio" => match (record.ratio_stops, record.ratio_qty) {
                (Some(stops), Some(quantity)) if stops != 0 => CalcRule::Ratio { stops, quantity },
                _ => CalcRule::Unusable { calc_type: tag },
            },
            "simple_var" => CalcRule::StopCount,
            "coeff_var" => CalcRule::Coefficient {
                coefficient: record.coeff.unwrap_or(0.0),
                base_quantity: record.base_qty.unwrap_or(0.0),
            },
            _ => CalcRule::Unusable { calc_type: tag },
        }
    }

    /// Canonical tag for this rule.
    pub fn tag(&self) -> &str {
        match self {
            CalcRule::Fixed { .. } => "fixed",
            CalcRule::PerStop => "per_stop",
            CalcRule::Ratio { .. } => "ratio",
            CalcRule::StopCount => "simple_var",
            CalcRule::Coefficient { .. } => "coeff_var",
            CalcRule::Unusable { calc_type } => calc_type,
        }
    }
}

/// Typed catalog item consumed by the quote assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Stable item identifier.
    pub item_id: u32,
    /// Display name.
    pub name: String,
    /// Unit label.
    pub unit: String,
    /// System type this item belongs to.
    pub category: Category,
    /// Price of one unit.
    pub unit_price: f64,
    /// Quantity formula.
    pub rule: CalcRule,
    /// Inactive items are never quoted.
    pub is_active: bool,
}

impl From<&CatalogRecord> for CatalogItem {
    fn from(record: &CatalogRecord) -> Self {
        CatalogItem {
            item_id: record.item_id,
            name: record.name.clone(),
            unit: record.unit.clone(),
            category: record.category,
            unit_price: record.unit_price,
            rule: CalcRule::from_record(record),
            is_active: record.is_active,
        }
    }
}

/// Partial update of a catalog record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemPatch {
    /// New unit price.
    #[serde(default)]
    pub unit_price: Option<f64>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New fixed quantity.
    #[serde(default)]
    pub fixed_qty: Option<f64>,
    /// New ratio reference stop count.
    #[serde(default)]
    pub ratio_stops: Option<u32>,
    /// New ratio reference quantity.
    #[serde(default)]
    pub ratio_qty: Option<u32>,
}

/// In-memory catalog snapshot, ordered by item id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Build a catalog from records, sorting them by item id (stable).
    pub fn new(mut records: Vec<CatalogRecord>) -> Self {
        records.sort_by_key(|r| r.item_id);
        Self { records }
    }

    /// Parse a JSON array of records from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuoteError> {
        let records: Vec<CatalogRecord> = serde_json::from_reader(reader)?;
        Ok(Self::new(records))
    }

    /// Load a catalog file in either record shape.
    pub fn load(path: &Path) -> Result<Self, QuoteError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        debug!("Loaded {} catalog records from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Write all records back to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), QuoteError> {
        write_json_atomically(path, &self.records)
    }

    /// Number of records, active or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in item id order.
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Records matching the optional category and active filters, in item id order.
    pub fn items(&self, category: Option<Category>, is_active: Option<bool>) -> Vec<CatalogRecord> {
        self.records
            .iter()
            .filter(|r| category.is_none_or(|c| r.category == c))
            .filter(|r| is_active.is_none_or(|a| r.is_active == a))
            .cloned()
            .collect()
    }

    /// Look up a record by item id.
    pub fn item(&self, item_id: u32) -> Option<&CatalogRecord> {
        self.records.iter().find(|r| r.item_id == item_id)
    }

    /// Typed view of every record, as consumed by [`crate::quote::build_quote`].
    pub fn typed_items(&self) -> Vec<CatalogItem> {
        self.records
            .iter()
            .map(|record| {
                let item = CatalogItem::from(record);
                if let CalcRule::Unusable { calc_type } = &item.rule {
                    warn!(
                        "Catalog item {} has an unusable '{}' formula, its quantity will be 0",
                        item.item_id, calc_type
                    );
                }
                item
            })
            .collect()
    }

    /// Apply `patch` to the record with `item_id` and return the updated record.
    pub fn update_item(
        &mut self,
        item_id: u32,
        patch: &CatalogItemPatch,
    ) -> Result<&CatalogRecord, QuoteError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.item_id == item_id)
            .ok_or(QuoteError::CatalogItemNotFound(item_id))?;

        if let Some(price) = patch.unit_price {
            record.unit_price = price;
        }
        if let Some(active) = patch.is_active {
            record.is_active = active;
        }
        if let Some(qty) = patch.fixed_qty {
            record.fixed_qty = Some(qty);
        }
        if let Some(stops) = patch.ratio_stops {
            record.ratio_stops = Some(stops);
        }
        if let Some(qty) = patch.ratio_qty {
            record.ratio_qty = Some(qty);
        }
        Ok(record)
    }
}
