//! Dimension extraction for product ordering.
//!
//! Two views of a product's size are provided:
//!
//! - [`CatalogDimensions`]: inch-normalised values taken from structured
//!   specifications, with free-text fallbacks, used by the catalog ordering.
//! - [`PatternDimensions`]: values picked out of the free text by pattern
//!   (metric threads, unified threads, fractions, gauges, ...), used to order
//!   members of a text cluster.
//!
//! Anything that cannot be parsed is `+inf`, so unknown sizes sort last.

use lazy_static::lazy_static;
use regex::Regex;

use crate::product::ProductRecord;

/// Millimetres to inches.
const MM_TO_IN: f64 = 0.039_37;

/// Centimetres to inches.
const CM_TO_IN: f64 = 0.393_7;

/// Offset applied to metric threads so an M-size sorts just after the
/// closest imperial size.
const METRIC_THREAD_OFFSET: f64 = 0.05;

/// Largest numbered screw size (#0 through #12).
const MAX_NUMBER_SIZE: u32 = 12;

/// Scale for numbered screw sizes so they sort before fractional sizes.
const NUMBER_SIZE_SCALE: f64 = 0.001;

lazy_static! {
    // Catalog normalisation
    static ref RE_THREAD_METRIC: Regex = Regex::new(r"(?i)^M(\d+(?:\.\d+)?)").unwrap();
    static ref RE_FRACTION: Regex = Regex::new(r"^(\d+)/(\d+)").unwrap();
    static ref RE_NUMBER_SIZE: Regex = Regex::new(r#"^#?(\d+)(?:-\d+)?(?:$|[^\d./"])"#).unwrap();
    static ref RE_DECIMAL: Regex = Regex::new(r"^(\d*\.?\d+)").unwrap();
    static ref RE_MIXED_FRACTION: Regex = Regex::new(r"^(\d+)-(\d+)/(\d+)").unwrap();
    static ref RE_DIGITS: Regex = Regex::new(r"(\d+)").unwrap();

    // Free-text fallbacks
    static ref RE_THREAD_IN_DETAIL: Regex = Regex::new(
        r#"(M\d+(?:\.\d+)?|\d+/\d+"?-?\d*|\d*\.\d+"-?\d*|\d+"-?\d*|#?\d+(?:-\d+)?)"#
    )
    .unwrap();
    static ref RE_METRIC_TOKEN: Regex =
        Regex::new(r"(?i)\bM(\d+(?:\.\d+)?)(?:\s*x\s*(\d+(?:\.\d+)?))?").unwrap();
    static ref RE_LONG_INCH: Regex = Regex::new(r#"([\d./-]+)"?\s+Long"#).unwrap();
    static ref RE_LONG_MM: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*mm\s+Long").unwrap();

    // Pattern extraction
    static ref RE_PAT_METRIC_PITCH: Regex =
        Regex::new(r"(?i)\bM(\d+)\s*x\s*(\d+(?:\.\d+)?)").unwrap();
    static ref RE_PAT_METRIC: Regex = Regex::new(r"(?i)\bM(\d+(?:\.\d+)?)").unwrap();
    static ref RE_PAT_UNIFIED: Regex =
        Regex::new(r"(?i)(\d+)-(\d+)\s*(?:UNC|UNF|NC|NF)\b").unwrap();
    static ref RE_PAT_NUMBER: Regex = Regex::new(r"#(\d+)").unwrap();
    static ref RE_PAT_FRACTION: Regex = Regex::new(r"(\d+)/(\d+)").unwrap();
    static ref RE_PAT_DECIMAL_INCH: Regex =
        Regex::new(r#"(?i)(\d+(?:\.\d+)?)\s*(?:"|\bin\b)"#).unwrap();
    static ref RE_PAT_MM: Regex = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mm\b").unwrap();
    static ref RE_PAT_CM: Regex = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*cm\b").unwrap();
    static ref RE_PAT_GAUGE: Regex =
        Regex::new(r"(?i)(\d+)\s*(?:AWG|GA|Gauge)\b").unwrap();
    static ref RE_PAT_LENGTH: Regex =
        Regex::new(r#"(?i)\b(?:L|Length)[:\s]+(\d+(?:\.\d+)?)\s*((?:mm|cm|in|m)\b|")"#).unwrap();
    static ref RE_PAT_WIDTH: Regex =
        Regex::new(r#"(?i)\b(?:W|Width)[:\s]+(\d+(?:\.\d+)?)\s*((?:mm|cm|in|m)\b|")"#).unwrap();
    static ref RE_PAT_HEIGHT: Regex =
        Regex::new(r#"(?i)\b(?:H|Height)[:\s]+(\d+(?:\.\d+)?)\s*((?:mm|cm|in|m)\b|")"#).unwrap();
    static ref RE_PAT_DIAMETER: Regex =
        Regex::new(r#"(?i)\b(?:D|Dia|Diameter)[:\s]+(\d+(?:\.\d+)?)\s*((?:mm|cm|in|m)\b|")"#).unwrap();
    static ref RE_SPEC_MEASURE: Regex =
        Regex::new(r#"(?i)(\d+(?:\.\d+)?)\s*(mm|cm|in|"|m)?"#).unwrap();
}

fn parse_f64(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn ratio(numerator: &str, denominator: &str) -> Option<f64> {
    let n = parse_f64(numerator)?;
    let d = parse_f64(denominator)?;
    (d != 0.0).then(|| n / d)
}

/// Normalise a thread size to inches.
///
/// Numbered sizes (`#8`, `10-24`) map to `N * 0.001` so they sort before any
/// fractional size; metric sizes map to their diameter in inches plus a
/// small offset; fractions and decimals are read as inches. Unparseable
/// values are `+inf`.
///
/// # Examples
///
/// ```
/// use label_oxide::sorting::fuzzy::dimensions::normalize_thread;
///
/// assert!((normalize_thread("1/4\"-20") - 0.25).abs() < 1e-9);
/// assert!((normalize_thread("10-24") - 0.010).abs() < 1e-9);
/// assert!(normalize_thread("M3") < normalize_thread("M8"));
/// assert!(normalize_thread("coarse").is_infinite());
/// ```
pub fn normalize_thread(value: &str) -> f64 {
    let value = value.trim();

    if let Some(caps) = RE_THREAD_METRIC.captures(value) {
        if let Some(mm) = parse_f64(&caps[1]) {
            return mm * MM_TO_IN + METRIC_THREAD_OFFSET;
        }
    }

    if let Some(caps) = RE_FRACTION.captures(value) {
        if let Some(v) = ratio(&caps[1], &caps[2]) {
            return v;
        }
    }

    if let Some(caps) = RE_NUMBER_SIZE.captures(value) {
        if let Ok(n) = caps[1].parse::<u32>() {
            if n <= MAX_NUMBER_SIZE {
                return n as f64 * NUMBER_SIZE_SCALE;
            }
        }
    }

    RE_DECIMAL
        .captures(value)
        .and_then(|caps| parse_f64(&caps[1]))
        .unwrap_or(f64::INFINITY)
}

/// Normalise a length to inches.
///
/// Understands mixed fractions (`1-1/2"`), fractions, millimetres,
/// centimetres and plain decimals (taken as inches).
///
/// ```
/// use label_oxide::sorting::fuzzy::dimensions::normalize_length;
///
/// assert!((normalize_length("1-1/2\"") - 1.5).abs() < 1e-9);
/// assert!((normalize_length("25.4 mm") - 1.0).abs() < 1e-3);
/// assert!(normalize_length("").is_infinite());
/// ```
pub fn normalize_length(value: &str) -> f64 {
    let value = value.trim();

    if let Some(caps) = RE_MIXED_FRACTION.captures(value) {
        if let (Some(whole), Some(frac)) = (parse_f64(&caps[1]), ratio(&caps[2], &caps[3])) {
            return whole + frac;
        }
    }

    if let Some(caps) = RE_FRACTION.captures(value) {
        if let Some(v) = ratio(&caps[1], &caps[2]) {
            return v;
        }
    }

    let number = RE_DECIMAL.captures(value).and_then(|caps| parse_f64(&caps[1]));
    let lower = value.to_lowercase();
    match number {
        Some(n) if lower.contains("mm") => n * MM_TO_IN,
        Some(n) if lower.contains("cm") => n * CM_TO_IN,
        Some(n) => n,
        None => f64::INFINITY,
    }
}

/// Numeric part of a dash number (`-012` → 12).
pub fn normalize_dash(value: &str) -> f64 {
    RE_DIGITS
        .captures(value)
        .and_then(|caps| parse_f64(&caps[1]))
        .unwrap_or(f64::INFINITY)
}

/// Inch-normalised sizes used by the catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogDimensions {
    /// Thread size
    pub thread: f64,
    /// Length
    pub length: f64,
    /// Diameter (outer or inner)
    pub diameter: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
    /// O-ring dash number
    pub dash: f64,
    /// Generic size
    pub size: f64,
}

impl Default for CatalogDimensions {
    fn default() -> Self {
        Self {
            thread: f64::INFINITY,
            length: f64::INFINITY,
            diameter: f64::INFINITY,
            width: f64::INFINITY,
            height: f64::INFINITY,
            dash: f64::INFINITY,
            size: f64::INFINITY,
        }
    }
}

fn first_spec<'a>(product: &'a ProductRecord, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| product.info.spec_value(name))
}

impl CatalogDimensions {
    /// Extract sizes from a product.
    pub fn extract(product: &ProductRecord) -> Self {
        let info = &product.info;
        let detail = info.detail();
        let free_text = format!("{} {}", info.family(), detail);
        let metric = RE_METRIC_TOKEN.captures(&free_text);

        let thread = match first_spec(product, &["Thread Size"]) {
            Some(v) => normalize_thread(v),
            None if detail.contains("Thread") => RE_THREAD_IN_DETAIL
                .captures(detail)
                .map(|caps| normalize_thread(&caps[1]))
                .unwrap_or(f64::INFINITY),
            None => metric
                .as_ref()
                .and_then(|caps| parse_f64(&caps[1]))
                .map(|mm| mm * MM_TO_IN + METRIC_THREAD_OFFSET)
                .unwrap_or(f64::INFINITY),
        };

        let length = match first_spec(product, &["Length", "Overall Length", "Usable Length"]) {
            Some(v) => normalize_length(v),
            None => Self::length_from_text(detail, metric.as_ref()),
        };

        let dimension = |names: &[&str]| {
            first_spec(product, names)
                .map(normalize_length)
                .unwrap_or(f64::INFINITY)
        };

        Self {
            thread,
            length,
            diameter: dimension(&["Diameter", "OD", "ID"]),
            width: dimension(&["Width"]),
            height: dimension(&["Height"]),
            dash: first_spec(product, &["Dash Number"])
                .map(normalize_dash)
                .unwrap_or(f64::INFINITY),
            size: dimension(&["Size", "Screw Size"]),
        }
    }

    fn length_from_text(detail: &str, metric: Option<&regex::Captures<'_>>) -> f64 {
        if detail.contains("Long") {
            if let Some(caps) = RE_LONG_MM.captures(detail) {
                if let Some(mm) = parse_f64(&caps[1]) {
                    return mm * MM_TO_IN;
                }
            }
            if let Some(caps) = RE_LONG_INCH.captures(detail) {
                return normalize_length(&caps[1]);
            }
        }

        // "M3x10": the second number is a length when it is not smaller than
        // the diameter (a pitch always is).
        metric
            .and_then(|caps| {
                let diameter = parse_f64(caps.get(1)?.as_str())?;
                let length = parse_f64(caps.get(2)?.as_str())?;
                (length >= diameter).then(|| length * MM_TO_IN)
            })
            .unwrap_or(f64::INFINITY)
    }

    /// Values in comparison order.
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.thread,
            self.length,
            self.diameter,
            self.width,
            self.height,
            self.dash,
            self.size,
        ]
    }
}

/// Convert a value with a unit to millimetres. Missing unit means mm.
fn to_mm(value: f64, unit: Option<&str>) -> f64 {
    match unit.map(|u| u.to_ascii_lowercase()).as_deref() {
        Some("cm") => value * 10.0,
        Some("in") | Some("\"") => value * 25.4,
        Some("m") => value * 1000.0,
        _ => value,
    }
}

/// Sizes picked out of free text, used inside a text cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatternDimensions {
    /// Metric thread diameter, mm
    pub metric_thread: Option<f64>,
    /// Metric diameter and pitch (`M6x1.0`)
    pub metric_thread_pitch: Option<(f64, f64)>,
    /// Unified thread number and threads per inch (`10-24 UNC`)
    pub unified_thread: Option<(f64, f64)>,
    /// Numbered size (`#8`)
    pub number_size: Option<f64>,
    /// Fractional inch value
    pub fractional_inch: Option<f64>,
    /// Decimal inch value
    pub decimal_inch: Option<f64>,
    /// Diameter, mm
    pub diameter: Option<f64>,
    /// Length, mm
    pub length: Option<f64>,
    /// Width, mm
    pub width: Option<f64>,
    /// Height, mm
    pub height: Option<f64>,
    /// Bare millimetre value
    pub millimeter: Option<f64>,
    /// Bare centimetre value, in mm
    pub centimeter: Option<f64>,
    /// Wire gauge, negated so thicker gauges sort first
    pub wire_gauge: Option<f64>,
}

impl PatternDimensions {
    /// Extract sizes from a product's specifications and free text.
    ///
    /// Structured values win; patterns fill in what the specifications do
    /// not give.
    pub fn extract(product: &ProductRecord) -> Self {
        let info = &product.info;
        let mut dims = Self::default();

        let measure = |names: &[&str]| {
            first_spec(product, names).and_then(|v| {
                let caps = RE_SPEC_MEASURE.captures(v)?;
                let value = parse_f64(&caps[1])?;
                Some(to_mm(value, caps.get(2).map(|m| m.as_str())))
            })
        };
        dims.length = measure(&["Length", "Overall Length"]);
        dims.diameter = measure(&["Diameter"]);
        dims.width = measure(&["Width"]);
        dims.height = measure(&["Height"]);

        if let Some(thread) = first_spec(product, &["Thread Size"]) {
            dims.scan(thread);
        }
        let text = format!("{} {} {}", info.family(), info.detail(), info.part_number());
        dims.scan(&text);
        dims
    }

    /// Fill unset fields from patterns found in `text`.
    pub fn scan(&mut self, text: &str) {
        let number = |re: &Regex, group: usize| {
            re.captures(text)
                .and_then(|caps| caps.get(group).and_then(|m| parse_f64(m.as_str())))
        };
        let pair = |re: &Regex| {
            re.captures(text)
                .and_then(|caps| Some((parse_f64(&caps[1])?, parse_f64(&caps[2])?)))
        };
        let with_unit = |re: &Regex| {
            re.captures(text).and_then(|caps| {
                let value = parse_f64(&caps[1])?;
                Some(to_mm(value, caps.get(2).map(|m| m.as_str())))
            })
        };

        self.metric_thread = self.metric_thread.or_else(|| number(&RE_PAT_METRIC, 1));
        self.metric_thread_pitch = self.metric_thread_pitch.or_else(|| pair(&RE_PAT_METRIC_PITCH));
        self.unified_thread = self.unified_thread.or_else(|| pair(&RE_PAT_UNIFIED));
        self.number_size = self.number_size.or_else(|| number(&RE_PAT_NUMBER, 1));
        self.fractional_inch = self.fractional_inch.or_else(|| {
            RE_PAT_FRACTION
                .captures(text)
                .and_then(|caps| ratio(&caps[1], &caps[2]))
        });
        self.decimal_inch = self.decimal_inch.or_else(|| number(&RE_PAT_DECIMAL_INCH, 1));
        self.diameter = self.diameter.or_else(|| with_unit(&RE_PAT_DIAMETER));
        self.length = self.length.or_else(|| with_unit(&RE_PAT_LENGTH));
        self.width = self.width.or_else(|| with_unit(&RE_PAT_WIDTH));
        self.height = self.height.or_else(|| with_unit(&RE_PAT_HEIGHT));
        self.millimeter = self.millimeter.or_else(|| number(&RE_PAT_MM, 1));
        self.centimeter = self
            .centimeter
            .or_else(|| number(&RE_PAT_CM, 1).map(|cm| cm * 10.0));
        self.wire_gauge = self
            .wire_gauge
            .or_else(|| number(&RE_PAT_GAUGE, 1).map(|g| -g));
    }

    /// Sort key in priority order, `+inf` for anything missing.
    pub fn sort_key(&self) -> Vec<f64> {
        let single = |v: Option<f64>| v.unwrap_or(f64::INFINITY);
        let pair = |v: Option<(f64, f64)>| v.unwrap_or((f64::INFINITY, f64::INFINITY));

        let (metric_d, metric_p) = pair(self.metric_thread_pitch);
        let (unified_n, unified_tpi) = pair(self.unified_thread);
        vec![
            single(self.metric_thread),
            metric_d,
            metric_p,
            unified_n,
            unified_tpi,
            single(self.number_size),
            single(self.fractional_inch),
            single(self.decimal_inch),
            single(self.diameter),
            single(self.length),
            single(self.width),
            single(self.height),
            single(self.millimeter),
            single(self.centimeter),
            single(self.wire_gauge),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductInfo;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_normalize_thread_kinds() {
        assert!(approx(normalize_thread("#8"), 0.008));
        assert!(approx(normalize_thread("8-32"), 0.008));
        assert!(approx(normalize_thread("3/8\"-16"), 0.375));
        assert!(approx(normalize_thread("0.25\""), 0.25));
        assert!(approx(normalize_thread("M6"), 6.0 * MM_TO_IN + METRIC_THREAD_OFFSET));
        assert!(approx(normalize_thread("M2.5 x 0.45 mm"), 2.5 * MM_TO_IN + 0.05));
        // Too large for a numbered size, read as a decimal
        assert!(approx(normalize_thread("16"), 16.0));
        assert!(approx(normalize_thread("2\""), 2.0));
        assert!(normalize_thread("").is_infinite());
    }

    #[test]
    fn test_number_sizes_sort_before_fractions() {
        assert!(normalize_thread("#12") < normalize_thread("1/4\""));
        assert!(normalize_thread("1/4\"") < normalize_thread("M8"));
    }

    #[test]
    fn test_normalize_length_kinds() {
        assert!(approx(normalize_length("3/4\""), 0.75));
        assert!(approx(normalize_length("2\""), 2.0));
        assert!(approx(normalize_length("10 mm"), 10.0 * MM_TO_IN));
        assert!(approx(normalize_length("2.5 cm"), 2.5 * CM_TO_IN));
        assert!(normalize_length("Long").is_infinite());
    }

    #[test]
    fn test_normalize_dash() {
        assert_eq!(normalize_dash("-012"), 12.0);
        assert!(normalize_dash("n/a").is_infinite());
    }

    #[test]
    fn test_catalog_dimensions_from_specs() {
        let product = ProductRecord::new(
            ProductInfo::new()
                .with_spec("Thread Size", "1/4\"-20")
                .with_spec("Overall Length", "1-1/4\"")
                .with_spec("OD", "0.5\""),
        );
        let dims = CatalogDimensions::extract(&product);
        assert!(approx(dims.thread, 0.25));
        assert!(approx(dims.length, 1.25));
        assert!(approx(dims.diameter, 0.5));
        assert!(dims.width.is_infinite());
        assert!(dims.dash.is_infinite());
    }

    #[test]
    fn test_catalog_dimensions_from_detail() {
        let product = ProductRecord::new(
            ProductInfo::new()
                .with_family("Socket Head Screw")
                .with_detail("M4 x 0.7 mm Thread, 12 mm Long"),
        );
        let dims = CatalogDimensions::extract(&product);
        assert!(approx(dims.thread, 4.0 * MM_TO_IN + 0.05));
        assert!(approx(dims.length, 12.0 * MM_TO_IN));

        let inch = ProductRecord::new(
            ProductInfo::new().with_detail("1/4\"-20 Thread Size, 3/4\" Long"),
        );
        let dims = CatalogDimensions::extract(&inch);
        assert!(approx(dims.thread, 0.25));
        assert!(approx(dims.length, 0.75));
    }

    #[test]
    fn test_catalog_dimensions_metric_token() {
        let product = ProductRecord::new(ProductInfo::new().with_family("M3x10 socket screw A"));
        let dims = CatalogDimensions::extract(&product);
        assert!(approx(dims.thread, 3.0 * MM_TO_IN + 0.05));
        assert!(approx(dims.length, 10.0 * MM_TO_IN));

        // Second number smaller than the diameter is a pitch, not a length
        let pitch = ProductRecord::new(ProductInfo::new().with_family("M8x1.25 nut"));
        let dims = CatalogDimensions::extract(&pitch);
        assert!(dims.length.is_infinite());
    }

    #[test]
    fn test_pattern_dimensions_scan() {
        let mut dims = PatternDimensions::default();
        dims.scan("M6x1.0 screw, 10-24 UNC, #8, 3/8, 0.5\" L: 20 mm 14 AWG");
        assert_eq!(dims.metric_thread, Some(6.0));
        assert_eq!(dims.metric_thread_pitch, Some((6.0, 1.0)));
        assert_eq!(dims.unified_thread, Some((10.0, 24.0)));
        assert_eq!(dims.number_size, Some(8.0));
        assert!(approx(dims.fractional_inch.unwrap(), 0.375));
        assert_eq!(dims.decimal_inch, Some(0.5));
        assert_eq!(dims.length, Some(20.0));
        assert_eq!(dims.millimeter, Some(20.0));
        assert_eq!(dims.wire_gauge, Some(-14.0));
    }

    #[test]
    fn test_pattern_dimensions_prefers_specs() {
        let product = ProductRecord::new(
            ProductInfo::new()
                .with_family("Threaded Rod, L: 300 mm")
                .with_spec("Length", "1 in")
                .with_spec("Thread Size", "M10"),
        );
        let dims = PatternDimensions::extract(&product);
        assert!(approx(dims.length.unwrap(), 25.4));
        assert_eq!(dims.metric_thread, Some(10.0));
    }

    #[test]
    fn test_pattern_sort_key_orders_metric() {
        let small = ProductRecord::new(ProductInfo::new().with_family("M3x10 socket screw"));
        let large = ProductRecord::new(ProductInfo::new().with_family("M8x20 socket screw"));
        let a = PatternDimensions::extract(&small).sort_key();
        let b = PatternDimensions::extract(&large).sort_key();
        assert_eq!(a.len(), b.len());
        assert!(a[0] < b[0]);

        let none = PatternDimensions::default().sort_key();
        assert!(none.iter().all(|v| v.is_infinite()));
    }
}
