//! Core data structures for the Feng Shui catalog
//!
//! Four closed categories, one typed record per category, typed patches for
//! field-by-field updates, and the `Store` that maps each category to its
//! ordered list of records.

use crate::utils::search::Matcher;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tag stamped on every star, gate and spirit record.
pub const ELEMENT_TYPE_TAG: &str = "NgũHành";

/// Values of the five-element cycle, offered as suggestions on entry.
pub const FIVE_ELEMENTS: [&str; 5] = ["Kim", "Mộc", "Thủy", "Hỏa", "Thổ"];

fn default_element_type() -> String {
    ELEMENT_TYPE_TAG.to_string()
}

/// Generate a fresh record identifier
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Star,
    Gate,
    Spirit,
    Formation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Star,
        Category::Gate,
        Category::Spirit,
        Category::Formation,
    ];

    /// Key used for this category in the data file and import documents
    pub fn key(&self) -> &'static str {
        match self {
            Category::Star => "CửuTinh",
            Category::Gate => "BátMôn",
            Category::Spirit => "BátThần",
            Category::Formation => "CáchCục",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Star => "Stars",
            Category::Gate => "Gates",
            Category::Spirit => "Spirits",
            Category::Formation => "Formations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let category = match normalized.as_str() {
            "star" | "stars" | "cửutinh" => Category::Star,
            "gate" | "gates" | "bátmôn" => Category::Gate,
            "spirit" | "spirits" | "bátthần" => Category::Spirit,
            "formation" | "formations" | "cáchcục" => Category::Formation,
            _ => {
                return Err(format!(
                    "unknown category '{}' (expected star, gate, spirit or formation)",
                    s
                ));
            }
        };
        Ok(category)
    }
}

/// Yin/yang polarity of a star
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Polarity {
    #[serde(rename = "Âm")]
    #[value(name = "am")]
    Am,
    #[default]
    #[serde(rename = "Dương")]
    #[value(name = "duong")]
    Duong,
}

impl Polarity {
    /// Legacy documents encode yin as this English token.
    pub const LEGACY_YIN: &'static str = "Yin";

    pub fn token(&self) -> &'static str {
        match self {
            Polarity::Am => "Âm",
            Polarity::Duong => "Dương",
        }
    }

    /// Only the exact legacy yin token maps to `Âm`; every other value,
    /// current-schema tokens included, falls through to `Dương`.
    pub fn from_legacy(value: Option<&str>) -> Self {
        if value == Some(Self::LEGACY_YIN) {
            Polarity::Am
        } else {
            Polarity::Duong
        }
    }
}

/// Auspiciousness of a formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Auspiciousness {
    #[serde(rename = "Cát")]
    #[value(name = "cat")]
    Cat,
    #[serde(rename = "Hung")]
    #[value(name = "hung")]
    Hung,
    #[default]
    #[serde(rename = "Tùy thuộc")]
    #[value(name = "tuy-thuoc")]
    TuyThuoc,
}

impl Auspiciousness {
    pub const LEGACY_AUSPICIOUS: &'static str = "Auspicious";
    pub const LEGACY_INAUSPICIOUS: &'static str = "Inauspicious";

    pub fn token(&self) -> &'static str {
        match self {
            Auspiciousness::Cat => "Cát",
            Auspiciousness::Hung => "Hung",
            Auspiciousness::TuyThuoc => "Tùy thuộc",
        }
    }

    /// Anything other than the two legacy tokens becomes `Tùy thuộc`.
    pub fn from_legacy(value: Option<&str>) -> Self {
        match value {
            Some(Self::LEGACY_AUSPICIOUS) => Auspiciousness::Cat,
            Some(Self::LEGACY_INAUSPICIOUS) => Auspiciousness::Hung,
            _ => Auspiciousness::TuyThuoc,
        }
    }
}

/// Identifier access shared by every record shape
pub trait Entry {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_element_type")]
    pub element_type: String,
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub yin_yang: Polarity,
    #[serde(default)]
    pub description: String,
    /// Fields the current schema does not name, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_element_type")]
    pub element_type: String,
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spirit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_element_type")]
    pub element_type: String,
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub auspiciousness: Auspiciousness,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry for Star {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Entry for Gate {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Entry for Spirit {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Entry for Formation {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A record of any category, tagged by its category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Star(Star),
    Gate(Gate),
    Spirit(Spirit),
    Formation(Formation),
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Record::Star(_) => Category::Star,
            Record::Gate(_) => Category::Gate,
            Record::Spirit(_) => Category::Spirit,
            Record::Formation(_) => Category::Formation,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Star(r) => &r.id,
            Record::Gate(r) => &r.id,
            Record::Spirit(r) => &r.id,
            Record::Formation(r) => &r.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Star(r) => &r.name,
            Record::Gate(r) => &r.name,
            Record::Spirit(r) => &r.name,
            Record::Formation(r) => &r.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Record::Star(r) => &r.description,
            Record::Gate(r) => &r.description,
            Record::Spirit(r) => &r.description,
            Record::Formation(r) => &r.description,
        }
    }

    /// Five-element value, if the category carries one
    pub fn element(&self) -> Option<&str> {
        match self {
            Record::Star(r) => Some(&r.element),
            Record::Gate(r) => Some(&r.element),
            Record::Spirit(r) => Some(&r.element),
            Record::Formation(_) => None,
        }
    }

    /// Short category-specific attribute shown next to the name in lists
    pub fn attribute(&self) -> String {
        match self {
            Record::Star(r) => format!("{} · {}", r.element, r.yin_yang.token()),
            Record::Gate(r) => r.element.clone(),
            Record::Spirit(r) => r.element.clone(),
            Record::Formation(r) => r.auspiciousness.token().to_string(),
        }
    }

    fn matches(&self, matcher: &Matcher) -> bool {
        matcher.matches(self.id())
            || matcher.matches(self.name())
            || matcher.matches(self.description())
            || self.element().is_some_and(|e| matcher.matches(e))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name(), self.category().label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarPatch {
    pub name: Option<String>,
    pub element: Option<String>,
    pub yin_yang: Option<Polarity>,
    pub description: Option<String>,
}

/// Patch for the gate and spirit shapes, which carry the same fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub element: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormationPatch {
    pub name: Option<String>,
    pub auspiciousness: Option<Auspiciousness>,
    pub description: Option<String>,
}

fn merge<T>(target: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl StarPatch {
    fn apply(&self, star: &mut Star) {
        merge(&mut star.name, &self.name);
        merge(&mut star.element, &self.element);
        merge(&mut star.yin_yang, &self.yin_yang);
        merge(&mut star.description, &self.description);
    }
}

impl ElementPatch {
    fn apply_gate(&self, gate: &mut Gate) {
        merge(&mut gate.name, &self.name);
        merge(&mut gate.element, &self.element);
        merge(&mut gate.description, &self.description);
    }

    fn apply_spirit(&self, spirit: &mut Spirit) {
        merge(&mut spirit.name, &self.name);
        merge(&mut spirit.element, &self.element);
        merge(&mut spirit.description, &self.description);
    }
}

impl FormationPatch {
    fn apply(&self, formation: &mut Formation) {
        merge(&mut formation.name, &self.name);
        merge(&mut formation.auspiciousness, &self.auspiciousness);
        merge(&mut formation.description, &self.description);
    }
}

/// Field changes for one record, tagged by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPatch {
    Star(StarPatch),
    Gate(ElementPatch),
    Spirit(ElementPatch),
    Formation(FormationPatch),
}

impl RecordPatch {
    pub fn category(&self) -> Category {
        match self {
            RecordPatch::Star(_) => Category::Star,
            RecordPatch::Gate(_) => Category::Gate,
            RecordPatch::Spirit(_) => Category::Spirit,
            RecordPatch::Formation(_) => Category::Formation,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RecordPatch::Star(p) => *p == StarPatch::default(),
            RecordPatch::Gate(p) | RecordPatch::Spirit(p) => *p == ElementPatch::default(),
            RecordPatch::Formation(p) => *p == FormationPatch::default(),
        }
    }
}

/// Loose field values collected from the command line or interactive input
#[derive(Debug, Clone, Default)]
pub struct RecordFields {
    pub name: Option<String>,
    pub element: Option<String>,
    pub yin_yang: Option<Polarity>,
    pub auspiciousness: Option<Auspiciousness>,
    pub description: Option<String>,
}

impl RecordFields {
    /// Names of the given fields that `category` does not carry
    pub fn unused_for(&self, category: Category) -> Vec<&'static str> {
        let mut unused = Vec::new();
        if category == Category::Formation && self.element.is_some() {
            unused.push("element");
        }
        if category != Category::Star && self.yin_yang.is_some() {
            unused.push("yin-yang");
        }
        if category != Category::Formation && self.auspiciousness.is_some() {
            unused.push("auspiciousness");
        }
        unused
    }

    pub fn into_patch(self, category: Category) -> RecordPatch {
        match category {
            Category::Star => RecordPatch::Star(StarPatch {
                name: self.name,
                element: self.element,
                yin_yang: self.yin_yang,
                description: self.description,
            }),
            Category::Gate => RecordPatch::Gate(ElementPatch {
                name: self.name,
                element: self.element,
                description: self.description,
            }),
            Category::Spirit => RecordPatch::Spirit(ElementPatch {
                name: self.name,
                element: self.element,
                description: self.description,
            }),
            Category::Formation => RecordPatch::Formation(FormationPatch {
                name: self.name,
                auspiciousness: self.auspiciousness,
                description: self.description,
            }),
        }
    }

    /// Build a new record with a fresh identifier
    pub fn into_record(self, category: Category) -> Record {
        let id = new_record_id();
        let name = self.name.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        let element = self.element.unwrap_or_default();
        match category {
            Category::Star => Record::Star(Star {
                id,
                name,
                element_type: default_element_type(),
                element,
                yin_yang: self.yin_yang.unwrap_or_default(),
                description,
                extra: Map::new(),
            }),
            Category::Gate => Record::Gate(Gate {
                id,
                name,
                element_type: default_element_type(),
                element,
                description,
                extra: Map::new(),
            }),
            Category::Spirit => Record::Spirit(Spirit {
                id,
                name,
                element_type: default_element_type(),
                element,
                description,
                extra: Map::new(),
            }),
            Category::Formation => Record::Formation(Formation {
                id,
                name,
                auspiciousness: self.auspiciousness.unwrap_or_default(),
                description,
                extra: Map::new(),
            }),
        }
    }
}

/// Statistics about the catalog
#[derive(Debug, Default)]
pub struct CatalogStats {
    pub total_records: usize,
    pub category_counts: Vec<(Category, usize)>,
    pub polarity_counts: HashMap<Polarity, usize>,
    pub auspiciousness_counts: HashMap<Auspiciousness, usize>,
}

/// The whole dataset: every category mapped to its records in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "CửuTinh", default)]
    pub stars: Vec<Star>,
    #[serde(rename = "BátMôn", default)]
    pub gates: Vec<Gate>,
    #[serde(rename = "BátThần", default)]
    pub spirits: Vec<Spirit>,
    #[serde(rename = "CáchCục", default)]
    pub formations: Vec<Formation>,
}

fn position_of<T: Entry>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

fn fill_missing_ids<T: Entry>(items: &mut [T]) -> usize {
    let mut filled = 0;
    for item in items.iter_mut().filter(|item| item.id().is_empty()) {
        item.set_id(new_record_id());
        filled += 1;
    }
    filled
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the sequence of its category
    pub fn create(&mut self, record: Record) {
        match record {
            Record::Star(r) => self.stars.push(r),
            Record::Gate(r) => self.gates.push(r),
            Record::Spirit(r) => self.spirits.push(r),
            Record::Formation(r) => self.formations.push(r),
        }
    }

    /// Merge `patch` into the record of `category` with the given id.
    ///
    /// Returns `false` and leaves the store untouched when no record matches,
    /// including when the patch belongs to another category.
    pub fn update(&mut self, category: Category, id: &str, patch: &RecordPatch) -> bool {
        match (category, patch) {
            (Category::Star, RecordPatch::Star(p)) => {
                if let Some(star) = self.stars.iter_mut().find(|r| r.id == id) {
                    p.apply(star);
                    return true;
                }
            }
            (Category::Gate, RecordPatch::Gate(p)) => {
                if let Some(gate) = self.gates.iter_mut().find(|r| r.id == id) {
                    p.apply_gate(gate);
                    return true;
                }
            }
            (Category::Spirit, RecordPatch::Spirit(p)) => {
                if let Some(spirit) = self.spirits.iter_mut().find(|r| r.id == id) {
                    p.apply_spirit(spirit);
                    return true;
                }
            }
            (Category::Formation, RecordPatch::Formation(p)) => {
                if let Some(formation) = self.formations.iter_mut().find(|r| r.id == id) {
                    p.apply(formation);
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    /// Remove the first record of `category` with the given id
    pub fn delete(&mut self, category: Category, id: &str) -> Option<Record> {
        match category {
            Category::Star => position_of(&self.stars, id).map(|i| Record::Star(self.stars.remove(i))),
            Category::Gate => position_of(&self.gates, id).map(|i| Record::Gate(self.gates.remove(i))),
            Category::Spirit => {
                position_of(&self.spirits, id).map(|i| Record::Spirit(self.spirits.remove(i)))
            }
            Category::Formation => position_of(&self.formations, id)
                .map(|i| Record::Formation(self.formations.remove(i))),
        }
    }

    /// Records of one category, in insertion order
    pub fn records(&self, category: Category) -> Vec<Record> {
        match category {
            Category::Star => self.stars.iter().cloned().map(Record::Star).collect(),
            Category::Gate => self.gates.iter().cloned().map(Record::Gate).collect(),
            Category::Spirit => self.spirits.iter().cloned().map(Record::Spirit).collect(),
            Category::Formation => self.formations.iter().cloned().map(Record::Formation).collect(),
        }
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Star => self.stars.len(),
            Category::Gate => self.gates.len(),
            Category::Spirit => self.spirits.len(),
            Category::Formation => self.formations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.len(*c) == 0)
    }

    pub fn find(&self, category: Category, id: &str) -> Option<Record> {
        self.records(category).into_iter().find(|r| r.id() == id)
    }

    /// Records matching `matcher`, limited to one category when given
    pub fn lookup(&self, category: Option<Category>, matcher: &Matcher) -> Vec<Record> {
        let categories = match category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };

        categories
            .into_iter()
            .flat_map(|c| self.records(c))
            .filter(|r| r.matches(matcher))
            .collect()
    }

    /// Give every record without an identifier a fresh one.
    ///
    /// Returns the number of identifiers generated.
    pub fn ensure_ids(&mut self) -> usize {
        fill_missing_ids(&mut self.stars)
            + fill_missing_ids(&mut self.gates)
            + fill_missing_ids(&mut self.spirits)
            + fill_missing_ids(&mut self.formations)
    }

    pub fn stats(&self) -> CatalogStats {
        let category_counts: Vec<(Category, usize)> =
            Category::ALL.iter().map(|c| (*c, self.len(*c))).collect();
        let total_records = category_counts.iter().map(|(_, count)| count).sum();

        let mut polarity_counts = HashMap::new();
        for star in &self.stars {
            *polarity_counts.entry(star.yin_yang).or_insert(0) += 1;
        }

        let mut auspiciousness_counts = HashMap::new();
        for formation in &self.formations {
            *auspiciousness_counts.entry(formation.auspiciousness).or_insert(0) += 1;
        }

        CatalogStats {
            total_records,
            category_counts,
            polarity_counts,
            auspiciousness_counts,
        }
    }
}
