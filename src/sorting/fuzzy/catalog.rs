//! Catalog-style product ordering.
//!
//! Products are assigned a major category by keyword rules, ranked the way a
//! hardware catalog is laid out (screws, then nuts, washers, pins, ...), and
//! ordered within a category by material, head profile and size.

use std::cmp::Ordering;

use phf::phf_map;

use super::dimensions::CatalogDimensions;
use crate::product::ProductRecord;

/// Rank of a category not in the table.
pub const UNKNOWN_RANK: u32 = 999;

/// Category name for products no rule matches.
pub const FALLBACK_CATEGORY: &str = "misc_hardware";

/// Catalog position of each major category.
static CATEGORY_RANKS: phf::Map<&'static str, u32> = phf_map! {
    "socket_screws" => 1,
    "button_screws" => 2,
    "flat_screws" => 3,
    "pan_screws" => 4,
    "hex_screws" => 5,
    "set_screws" => 6,
    "thumb_screws" => 7,
    "specialty_screws" => 8,
    "other_screws" => 9,
    "bolts" => 10,
    "studs" => 11,
    "hex_nuts" => 12,
    "lock_nuts" => 13,
    "specialty_nuts" => 14,
    "flat_washers" => 20,
    "lock_washers" => 21,
    "specialty_washers" => 22,
    "pins" => 30,
    "keys" => 31,
    "anchors" => 40,
    "inserts" => 41,
    "standoffs" => 42,
    "spacers" => 43,
    "bushings" => 50,
    "bearings" => 51,
    "shafts" => 52,
    "collars" => 53,
    "springs" => 60,
    "retaining_rings" => 61,
    "o_rings" => 70,
    "seals" => 71,
    "gaskets" => 72,
    "fittings" => 80,
    "valves" => 81,
    "hoses" => 82,
    "clamps" => 83,
    "chains" => 90,
    "sprockets" => 91,
    "wire_products" => 100,
    "cable_management" => 101,
    "knobs" => 110,
    "rods" => 111,
    "bars" => 112,
    "tools" => 113,
    "filters" => 114,
    "misc_hardware" => 120,
};

/// Catalog rank of a category name.
pub fn category_rank(category: &str) -> u32 {
    CATEGORY_RANKS.get(category).copied().unwrap_or(UNKNOWN_RANK)
}

/// A keyword rule: every `all` keyword present and no `none` keyword.
struct CategoryRule {
    category: &'static str,
    all: &'static [&'static str],
    none: &'static [&'static str],
}

const fn rule(
    category: &'static str,
    all: &'static [&'static str],
    none: &'static [&'static str],
) -> CategoryRule {
    CategoryRule {
        category,
        all,
        none,
    }
}

static CATEGORY_RULES: &[CategoryRule] = &[
    rule("socket_screws", &["socket", "head", "screw"], &["set"]),
    rule("socket_screws", &["socket", "cap", "screw"], &["set"]),
    rule("button_screws", &["button", "head"], &[]),
    rule("flat_screws", &["flat", "screw"], &[]),
    rule("flat_screws", &["countersink", "screw"], &[]),
    rule("pan_screws", &["pan", "head"], &[]),
    rule("hex_screws", &["hex head", "screw"], &[]),
    rule("hex_screws", &["hex head", "bolt"], &[]),
    rule("set_screws", &["set screw"], &[]),
    rule("set_screws", &["set-screw"], &[]),
    rule("thumb_screws", &["thumb", "screw"], &[]),
    rule("specialty_screws", &["drilling"], &[]),
    rule("specialty_screws", &["wood screw"], &[]),
    rule("other_screws", &["screw"], &[]),
    rule("bolts", &["bolt"], &[]),
    rule("studs", &["threaded rod"], &[]),
    rule("studs", &["threaded stud"], &[]),
    rule("studs", &["stud"], &[]),
    rule("hex_nuts", &["hex nut"], &["lock"]),
    rule("lock_nuts", &["nut", "lock"], &[]),
    rule("lock_nuts", &["nut", "nylon"], &[]),
    rule("specialty_nuts", &["nut", "wing"], &[]),
    rule("specialty_nuts", &["nut", "coupling"], &[]),
    rule("specialty_nuts", &["nut", "flange"], &[]),
    rule("specialty_nuts", &["nut", "rivet"], &[]),
    rule("hex_nuts", &["nut"], &[]),
    rule("lock_washers", &["washer", "lock"], &[]),
    rule("lock_washers", &["washer", "split"], &[]),
    rule("lock_washers", &["washer", "spring"], &[]),
    rule("flat_washers", &["washer", "flat"], &[]),
    rule("flat_washers", &["washer", "plain"], &[]),
    rule("specialty_washers", &["washer"], &[]),
    rule("pins", &["pin"], &[]),
    rule("keys", &["key", "machine"], &[]),
    rule("anchors", &["anchor"], &[]),
    rule("inserts", &["insert"], &[]),
    rule("inserts", &["helicoil"], &[]),
    rule("standoffs", &["standoff"], &[]),
    rule("spacers", &["spacer"], &[]),
    rule("bushings", &["bushing"], &[]),
    rule("bearings", &["bearing"], &[]),
    rule("shafts", &["shaft"], &["collar"]),
    rule("collars", &["collar"], &[]),
    rule("springs", &["spring"], &["washer", "lock"]),
    rule("retaining_rings", &["retaining"], &[]),
    rule("retaining_rings", &["snap ring"], &[]),
    rule("o_rings", &["o-ring"], &[]),
    rule("o_rings", &["o ring"], &[]),
    rule("seals", &["seal"], &[]),
    rule("gaskets", &["gasket"], &[]),
    rule("fittings", &["fitting"], &[]),
    rule("fittings", &["connector"], &[]),
    rule("fittings", &["elbow"], &[]),
    rule("fittings", &["tee"], &[]),
    rule("fittings", &["nipple"], &[]),
    rule("fittings", &["muffler"], &[]),
    rule("fittings", &["adapter"], &[]),
    rule("fittings", &["chuck"], &[]),
    rule("valves", &["valve"], &[]),
    rule("hoses", &["hose"], &[]),
    rule("hoses", &["coupling"], &[]),
    rule("clamps", &["clamp"], &[]),
    rule("chains", &["chain"], &[]),
    rule("sprockets", &["sprocket"], &[]),
    rule("wire_products", &["wire", "cloth"], &[]),
    rule("wire_products", &["wire", "mesh"], &[]),
    rule("wire_products", &["wire", "disc"], &[]),
    rule("cable_management", &["wire"], &[]),
    rule("cable_management", &["cable"], &[]),
    rule("knobs", &["knob"], &[]),
    rule("rods", &["rod"], &["threaded"]),
    rule("bars", &["bar"], &[]),
    rule("tools", &["tap"], &[]),
    rule("tools", &["die"], &[]),
    rule("filters", &["filter"], &[]),
    rule("filters", &["strainer"], &[]),
];

impl CategoryRule {
    /// Matched keyword length, or `None` if the rule does not apply.
    fn specificity(&self, text: &str) -> Option<usize> {
        if self.none.iter().any(|k| text.contains(k)) {
            return None;
        }
        self.all
            .iter()
            .try_fold(0, |acc, k| text.contains(k).then(|| acc + k.len()))
    }
}

/// Assign a major category from free text.
///
/// The rule whose keywords cover the most text wins; ties go to the
/// category that comes first in the catalog. Products no rule matches fall
/// into [`FALLBACK_CATEGORY`].
///
/// ```
/// use label_oxide::sorting::fuzzy::catalog::categorize;
///
/// assert_eq!(categorize("Alloy Steel Socket Head Screw"), "socket_screws");
/// assert_eq!(categorize("Socket Head Set Screw"), "set_screws");
/// assert_eq!(categorize("Nylon-Insert Locknut"), "lock_nuts");
/// assert_eq!(categorize("Widget"), "misc_hardware");
/// ```
pub fn categorize(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .filter_map(|rule| rule.specificity(&lower).map(|s| (rule.category, s)))
        .max_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| category_rank(b.0).cmp(&category_rank(a.0)))
        })
        .map(|(category, _)| category)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Category of a product, refined by its structured specifications.
pub fn product_category(product: &ProductRecord) -> &'static str {
    let category = categorize(&category_text(product));
    if category == "specialty_washers"
        && product
            .info
            .spec_value("Washer Type")
            .map_or(false, |t| t.eq_ignore_ascii_case("flat"))
    {
        return "flat_washers";
    }
    category
}

/// Text used for category assignment: the family, or the detail, or the id.
fn category_text(product: &ProductRecord) -> String {
    let info = &product.info;
    [info.family(), info.detail(), info.part_number()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Material keywords, checked in order; the first present wins.
const MATERIAL_RULES: &[(&str, &str, u32)] = &[
    ("316", "316_stainless", 1),
    ("super-corrosion-resistant", "316_stainless", 1),
    ("18-8", "18-8_stainless", 2),
    ("303", "303_stainless", 3),
    ("304", "304_stainless", 3),
    ("17-7", "17-7_stainless", 4),
    ("17-4", "17-4_stainless", 4),
    ("410", "410_stainless", 5),
    ("440c", "440c_stainless", 5),
    ("stainless", "stainless", 6),
    ("brass", "brass", 10),
    ("bronze", "bronze", 11),
    ("aluminum", "aluminum", 15),
    ("zinc", "zinc-plated_steel", 20),
    ("grade 8", "grade_8_steel", 27),
    ("alloy steel", "alloy_steel", 26),
    ("nylon", "nylon", 30),
    ("plastic", "plastic", 31),
    ("rubber", "rubber", 35),
    ("ptfe", "ptfe", 36),
    ("viton", "viton", 37),
    ("buna", "buna-n", 38),
    ("silicone", "silicone", 39),
    ("steel", "steel", 25),
];

/// Rank of glass-filled nylon.
const GLASS_FILLED_RANK: u32 = 40;

/// Material name and rank for a product. Unknown materials rank last.
pub fn material(product: &ProductRecord) -> (&'static str, u32) {
    let info = &product.info;
    let text = format!(
        "{} {} {} {}",
        info.family(),
        info.detail(),
        info.category(),
        info.spec_value("Material").unwrap_or("")
    )
    .to_lowercase();

    match MATERIAL_RULES.iter().find(|(k, _, _)| text.contains(k)) {
        Some((_, "nylon", _)) if text.contains("glass") => ("glass-filled_nylon", GLASS_FILLED_RANK),
        Some(&(_, name, rank)) => (name, rank),
        None => ("unknown", UNKNOWN_RANK),
    }
}

/// Head profile rank: low-profile screws sort after standard ones.
///
/// Only screw categories with a meaningful head profile are ranked.
pub fn profile_rank(product: &ProductRecord, category: &str) -> u32 {
    if !matches!(category, "socket_screws" | "button_screws" | "flat_screws") {
        return 0;
    }
    let low = match product.info.spec_value("Socket Head Profile") {
        Some(p) => p.to_lowercase().contains("low"),
        None => {
            let family = product.info.family().to_lowercase();
            family.contains("low-profile") || family.contains("low profile")
        },
    };
    u32::from(low)
}

/// Composite ordering key for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogKey {
    /// Major category name
    pub category: &'static str,
    /// Catalog rank of the major category
    pub category_rank: u32,
    /// Catalog's own category text
    pub category_text: String,
    /// Material rank
    pub material_rank: u32,
    /// Head profile rank
    pub profile_rank: u32,
    /// Sizes
    pub dimensions: CatalogDimensions,
    /// Part number, or the product id
    pub part_number: String,
    /// Product id
    pub id: String,
}

impl CatalogKey {
    /// Build the key for a product.
    pub fn new(id: &str, product: &ProductRecord) -> Self {
        let category = product_category(product);
        let part_number = match product.info.part_number() {
            "" => id,
            pn => pn,
        };
        Self {
            category,
            category_rank: category_rank(category),
            category_text: product.info.category().to_string(),
            material_rank: material(product).1,
            profile_rank: profile_rank(product, category),
            dimensions: CatalogDimensions::extract(product),
            part_number: part_number.to_string(),
            id: id.to_string(),
        }
    }
}

impl Eq for CatalogKey {}

impl PartialOrd for CatalogKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CatalogKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category_rank
            .cmp(&other.category_rank)
            .then_with(|| self.category.cmp(other.category))
            .then_with(|| self.category_text.cmp(&other.category_text))
            .then_with(|| self.material_rank.cmp(&other.material_rank))
            .then_with(|| self.profile_rank.cmp(&other.profile_rank))
            .then_with(|| {
                self.dimensions
                    .as_array()
                    .iter()
                    .zip(other.dimensions.as_array().iter())
                    .map(|(a, b)| a.total_cmp(b))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.part_number.cmp(&other.part_number))
            .then_with(|| self.id.cmp(&other.id))
    }
}
