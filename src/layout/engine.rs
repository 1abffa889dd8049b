//! Binary-search font fitting.
//!
//! The engine stacks up to three text blocks (description, dimensions,
//! product id) in the text column and picks the largest integer base font
//! size at which every wrapped line fits the column width and the stack fits
//! the available height. When nothing fits, it drops to the minimum size and
//! truncates with an ellipsis.
//!
//! The engine holds only immutable configuration, so one instance can serve
//! many threads.

use crate::config::{LabelConfig, LayoutConfig};
use crate::error::Result;
use crate::layout::plan::{BlockKind, LayoutPlan, TextBlock};
use crate::layout::wrap::{truncate_with_ellipsis, wrap_text};
use crate::layout::LabelDimensions;
use crate::metrics::{MultilineBBox, TextMetrics};
use crate::product::ProductRecord;

/// A block before font sizing.
#[derive(Debug, Clone)]
struct BlockSpec {
    kind: BlockKind,
    content: String,
    font_name: String,
    is_bold: bool,
}

/// A block wrapped and measured at one font size.
#[derive(Debug, Clone)]
struct SizedBlock {
    spec: BlockSpec,
    font_size: f32,
    lines: Vec<String>,
    bbox: MultilineBBox,
    truncated: bool,
}

/// A block wrapped at the minimum size, before truncation.
#[derive(Debug)]
struct WrappedBlock {
    spec: BlockSpec,
    font_size: f32,
    lines: Vec<String>,
    line_height: f32,
}

/// Blocks given up, in order, when not even one line each fits.
const DROP_ORDER: [BlockKind; 2] = [BlockKind::Description, BlockKind::Dimensions];

fn one_line_height(blocks: &[WrappedBlock], gap: f32) -> f32 {
    let text: f32 = blocks.iter().map(|b| b.line_height).sum();
    text + blocks.len().saturating_sub(1) as f32 * gap
}

/// Computes [`LayoutPlan`]s for one label size.
#[derive(Debug, Clone)]
pub struct LabelLayoutEngine {
    dimensions: LabelDimensions,
    config: LayoutConfig,
}

impl LabelLayoutEngine {
    /// Create an engine with default layout settings.
    pub fn new(dimensions: LabelDimensions) -> Self {
        Self::with_config(dimensions, LayoutConfig::default())
    }

    /// Create an engine with explicit layout settings.
    pub fn with_config(dimensions: LabelDimensions, config: LayoutConfig) -> Self {
        Self { dimensions, config }
    }

    /// Create an engine from a label configuration.
    pub fn from_config(config: &LabelConfig) -> Self {
        Self::with_config(config.dimensions(), config.layout.clone())
    }

    /// Label geometry this engine lays out.
    pub fn dimensions(&self) -> &LabelDimensions {
        &self.dimensions
    }

    /// Layout settings.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a product record: its description and dimension text plus `id`.
    pub fn layout_product(
        &self,
        metrics: &dyn TextMetrics,
        id: &str,
        product: &ProductRecord,
    ) -> Result<LayoutPlan> {
        let description = product.description_text();
        let dimensions = product.dimensions_text();
        self.calculate_layout(metrics, &description, Some(&dimensions), id)
    }

    /// Lay out one label.
    ///
    /// Blank `description` is replaced by the configured placeholder; blank or
    /// missing `dimensions_text` omits the dimensions block. The only error is
    /// a measurement failure from `metrics`.
    pub fn calculate_layout(
        &self,
        metrics: &dyn TextMetrics,
        description: &str,
        dimensions_text: Option<&str>,
        identifier: &str,
    ) -> Result<LayoutPlan> {
        let specs = self.block_specs(description, dimensions_text, identifier);
        let available = self.dimensions.available_height_pts();
        let column = self.dimensions.text_column_width_pts();

        let min_size = self.config.min_font_size;
        let density_cap = (available / (specs.len() as f32 * self.config.block_density)).floor();
        let max_size = if density_cap.is_finite() && density_cap > 0.0 {
            (density_cap as u32).min(self.config.max_font_size)
        } else {
            0
        };

        let mut best: Option<(u32, Vec<SizedBlock>)> = None;
        let (mut low, mut high) = (min_size, max_size);
        while low <= high {
            let mid = low + (high - low) / 2;
            let blocks = self.size_blocks(metrics, &specs, mid, column)?;
            if self.fits(&blocks, mid, available, column) {
                best = Some((mid, blocks));
                low = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                high = mid - 1;
            }
        }

        let (base_size, blocks) = match best {
            Some(found) => {
                log::debug!(
                    "Fitted {} blocks at {}pt on {:.2}x{:.2}in label",
                    found.1.len(),
                    found.0,
                    self.dimensions.width_in,
                    self.dimensions.height_in
                );
                found
            },
            None => {
                let blocks = self.truncate_blocks(metrics, &specs, min_size, available, column)?;
                (min_size, blocks)
            },
        };

        let dropped = blocks.len() < specs.len();
        let mut plan = self.place(blocks, base_size, available);
        plan.truncated |= dropped;
        Ok(plan)
    }

    fn block_specs(
        &self,
        description: &str,
        dimensions_text: Option<&str>,
        identifier: &str,
    ) -> Vec<BlockSpec> {
        let description = description.trim();
        let description = if description.is_empty() {
            self.config.placeholder_description.clone()
        } else {
            description.to_string()
        };

        let mut specs = vec![BlockSpec {
            kind: BlockKind::Description,
            content: description,
            font_name: self.config.description_font.clone(),
            is_bold: true,
        }];

        if let Some(text) = dimensions_text.map(str::trim).filter(|t| !t.is_empty()) {
            specs.push(BlockSpec {
                kind: BlockKind::Dimensions,
                content: text.to_string(),
                font_name: self.config.body_font.clone(),
                is_bold: false,
            });
        }

        specs.push(BlockSpec {
            kind: BlockKind::ProductId,
            content: format!("{}{}", self.config.id_prefix, identifier.trim()),
            font_name: self.config.body_font.clone(),
            is_bold: false,
        });

        specs
    }

    /// Font size of a block at base size `base`.
    ///
    /// Description and dimensions use the base size; the product id is scaled
    /// by `id_font_scale` (never below the minimum), so the hierarchy
    /// dimensions >= description >= id always holds.
    fn font_size_for(&self, kind: BlockKind, base: u32) -> f32 {
        match kind {
            BlockKind::Description | BlockKind::Dimensions => base as f32,
            BlockKind::ProductId => {
                let scaled = (base as f32 * self.config.id_font_scale).floor() as u32;
                scaled.max(self.config.min_font_size).min(base) as f32
            },
        }
    }

    fn gap(&self, base: u32) -> f32 {
        base as f32 * self.config.block_gap_ratio
    }

    fn size_blocks(
        &self,
        metrics: &dyn TextMetrics,
        specs: &[BlockSpec],
        base: u32,
        column: f32,
    ) -> Result<Vec<SizedBlock>> {
        specs
            .iter()
            .map(|spec| {
                let font_size = self.font_size_for(spec.kind, base);
                let lines = wrap_text(metrics, &spec.content, &spec.font_name, font_size, column)?;
                let bbox = metrics.measure_multiline(
                    &lines,
                    &spec.font_name,
                    font_size,
                    self.config.line_spacing,
                )?;
                Ok(SizedBlock {
                    spec: spec.clone(),
                    font_size,
                    lines,
                    bbox,
                    truncated: false,
                })
            })
            .collect()
    }

    fn stack_height(&self, blocks: &[SizedBlock], base: u32) -> f32 {
        let text: f32 = blocks.iter().map(|b| b.bbox.height).sum();
        let gaps = blocks.len().saturating_sub(1) as f32 * self.gap(base);
        text + gaps
    }

    fn fits(&self, blocks: &[SizedBlock], base: u32, available: f32, column: f32) -> bool {
        self.stack_height(blocks, base) <= available
            && blocks
                .iter()
                .flat_map(|b| b.bbox.lines.iter())
                .all(|line| line.width <= column)
    }

    /// Minimum-size fallback: keep as many lines per block as the remaining
    /// height allows and ellipsise the last kept line of any cut block.
    ///
    /// Every surviving block keeps at least one line, and each block leaves
    /// one line (plus gap) for every block below it. When even one line per
    /// block does not fit, the description is dropped first, then the
    /// dimensions; the product id is always kept.
    fn truncate_blocks(
        &self,
        metrics: &dyn TextMetrics,
        specs: &[BlockSpec],
        base: u32,
        available: f32,
        column: f32,
    ) -> Result<Vec<SizedBlock>> {
        let spacing = self.config.line_spacing;
        let gap = self.gap(base);

        let mut wrapped: Vec<WrappedBlock> = Vec::with_capacity(specs.len());
        for spec in specs {
            let font_size = self.font_size_for(spec.kind, base);
            let lines = wrap_text(metrics, &spec.content, &spec.font_name, font_size, column)?;
            if lines.is_empty() {
                continue;
            }
            let line_height = metrics.measure(&lines[0], &spec.font_name, font_size)?.height;
            wrapped.push(WrappedBlock {
                spec: spec.clone(),
                font_size,
                lines,
                line_height,
            });
        }

        while wrapped.len() > 1 && one_line_height(&wrapped, gap) > available {
            let Some(index) = DROP_ORDER
                .iter()
                .find_map(|kind| wrapped.iter().position(|b| b.spec.kind == *kind))
            else {
                break;
            };
            let dropped = wrapped.remove(index);
            log::warn!(
                "Dropping {} block '{}': no room on {:.2}x{:.2}in label",
                dropped.spec.kind.as_str(),
                dropped.spec.content,
                self.dimensions.width_in,
                self.dimensions.height_in
            );
        }

        let reserves: Vec<f32> = (0..wrapped.len())
            .map(|i| wrapped[i + 1..].iter().map(|b| gap + b.line_height).sum())
            .collect();

        let mut remaining = available;
        let mut kept: Vec<SizedBlock> = Vec::with_capacity(wrapped.len());

        for (block, reserve) in wrapped.into_iter().zip(reserves) {
            let WrappedBlock {
                spec,
                font_size,
                lines,
                line_height,
            } = block;

            let gap_before = if kept.is_empty() { 0.0 } else { gap };
            let space = remaining - gap_before - reserve;
            let block_height =
                |count: usize| line_height + count.saturating_sub(1) as f32 * font_size * spacing;

            let mut max_lines = if space > 0.0 && line_height > 0.0 {
                (space / (line_height * self.config.truncation_line_factor)).floor() as usize
            } else {
                0
            };
            max_lines = max_lines.min(lines.len());
            while max_lines > 1 && block_height(max_lines) > space {
                max_lines -= 1;
            }
            let max_lines = max_lines.max(1);

            let cut = max_lines < lines.len();
            let mut kept_lines: Vec<String> = lines.into_iter().take(max_lines).collect();
            let mut truncated = cut;
            let last = kept_lines.len() - 1;
            for (i, line) in kept_lines.iter_mut().enumerate() {
                let too_wide =
                    metrics.measure(line, &spec.font_name, font_size)?.width > column;
                if too_wide || (cut && i == last) {
                    *line = truncate_with_ellipsis(
                        metrics,
                        line,
                        &spec.font_name,
                        font_size,
                        column,
                        &self.config.ellipsis,
                    )?;
                    truncated = true;
                }
            }

            if truncated {
                log::warn!(
                    "Truncated {} block '{}' to {} line(s) at {}pt",
                    spec.kind.as_str(),
                    spec.content,
                    kept_lines.len(),
                    font_size
                );
            }

            let bbox = metrics.measure_multiline(&kept_lines, &spec.font_name, font_size, spacing)?;
            remaining -= gap_before + bbox.height;
            kept.push(SizedBlock {
                spec,
                font_size,
                lines: kept_lines,
                bbox,
                truncated,
            });
        }

        Ok(kept)
    }

    /// Centre the stack vertically and assign block positions.
    fn place(&self, blocks: Vec<SizedBlock>, base: u32, available: f32) -> LayoutPlan {
        let gap = self.gap(base);
        let total = self.stack_height(&blocks, base);
        let mut y = ((available - total) / 2.0).max(0.0);

        let mut plan = LayoutPlan {
            description: None,
            dimensions: None,
            product_id: None,
            image_area: self.dimensions.image_area(),
            dimensions_used: self.dimensions,
            base_font_size: base as f32,
            line_spacing: self.config.line_spacing,
            truncated: false,
        };

        for sized in blocks {
            let block = TextBlock {
                kind: sized.spec.kind,
                content: sized.spec.content,
                font_name: sized.spec.font_name,
                font_size: sized.font_size,
                is_bold: sized.spec.is_bold,
                lines: sized.lines,
                bbox: sized.bbox,
                y_position: y,
                truncated: sized.truncated,
            };
            y += block.total_height() + gap;
            plan.truncated |= block.truncated;
            match block.kind {
                BlockKind::Description => plan.description = Some(block),
                BlockKind::Dimensions => plan.dimensions = Some(block),
                BlockKind::ProductId => plan.product_id = Some(block),
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FontMetrics;

    fn engine(width: f32, height: f32) -> LabelLayoutEngine {
        LabelLayoutEngine::new(LabelDimensions::new(width, height))
    }

    #[test]
    fn test_three_blocks_on_standard_label() {
        let metrics = FontMetrics::new();
        let plan = engine(1.5, 0.5)
            .calculate_layout(
                &metrics,
                "Alloy Steel Socket Head Screw",
                Some("M3 x 0.5 mm Thread, 10 mm Long"),
                "91290A115",
            )
            .unwrap();
        assert_eq!(plan.block_count(), 3);
        assert!(!plan.truncated);
        assert!(plan.base_font_size >= 4.0);
        let product_id = plan.product_id.as_ref().unwrap();
        assert_eq!(product_id.lines, vec!["#91290A115".to_string()]);
    }

    #[test]
    fn test_blank_dimensions_omitted() {
        let metrics = FontMetrics::new();
        let e = engine(2.0, 1.0);
        for dims in [None, Some(""), Some("   \t")] {
            let plan = e.calculate_layout(&metrics, "Hex Nut", dims, "94895A031").unwrap();
            assert!(plan.dimensions.is_none());
            assert_eq!(plan.block_count(), 2);
        }
    }

    #[test]
    fn test_placeholder_description() {
        let metrics = FontMetrics::new();
        let plan = engine(2.0, 1.0)
            .calculate_layout(&metrics, "  ", None, "1234")
            .unwrap();
        assert_eq!(plan.description.unwrap().content, "McMaster-Carr Part");
    }

    #[test]
    fn test_short_text_hits_density_cap() {
        let metrics = FontMetrics::new();
        // Available 0.9in = 64.8pt, two blocks => cap floor(64.8 / 3) = 21.
        let plan = engine(4.0, 1.0)
            .calculate_layout(&metrics, "Nut", None, "1")
            .unwrap();
        assert_eq!(plan.base_font_size, 21.0);
    }

    #[test]
    fn test_id_font_scale() {
        let metrics = FontMetrics::new();
        let config = LayoutConfig::new().with_id_font_scale(0.8);
        let e = LabelLayoutEngine::with_config(LabelDimensions::new(4.0, 1.0), config);
        let plan = e.calculate_layout(&metrics, "Nut", None, "1").unwrap();
        let id = plan.product_id.unwrap();
        assert_eq!(id.font_size, (plan.base_font_size * 0.8).floor());
    }

    #[test]
    fn test_truncation_fallback() {
        let metrics = FontMetrics::new();
        let description = "Extra-Long Super-Corrosion-Resistant 316 Stainless Steel Hex Head Screw With Nylon Patch";
        let plan = engine(0.5, 0.25)
            .calculate_layout(&metrics, description, None, "91286A123")
            .unwrap();
        assert_eq!(plan.base_font_size, 4.0);
        assert!(plan.truncated);
        let desc = plan.description.as_ref().unwrap();
        assert!(!desc.lines.is_empty());
        assert!(desc.lines.last().unwrap().ends_with("..."));
        let id = plan.product_id.as_ref().unwrap();
        assert_eq!(id.lines, vec!["#91286A123".to_string()]);
    }

    #[test]
    fn test_truncation_keeps_a_line_for_every_block() {
        let metrics = FontMetrics::new();
        let description = "Corrosion-Resistant Stainless Steel Button Head Hex Drive Screw, Black-Oxide, Fully Threaded";
        let plan = engine(0.75, 0.25)
            .calculate_layout(&metrics, description, Some("M3 | L: 10 mm"), "92949A537")
            .unwrap();
        assert!(plan.truncated);
        assert_eq!(plan.block_count(), 3);
        assert_eq!(plan.dimensions.as_ref().unwrap().lines.len(), 1);
        assert_eq!(plan.product_id.as_ref().unwrap().lines, vec!["#92949A537".to_string()]);

        let available = plan.dimensions_used.available_height_pts();
        let top = plan.description.as_ref().unwrap().y_position;
        assert!(top + plan.content_height() <= available + 1e-3);
    }

    #[test]
    fn test_truncation_drops_description_before_id() {
        let metrics = FontMetrics::new();
        // 6.48pt available: one 4pt line, not two plus a gap
        let plan = engine(0.5, 0.1)
            .calculate_layout(&metrics, "Hex Nut", Some("M3"), "94150A325")
            .unwrap();
        assert_eq!(plan.base_font_size, 4.0);
        assert!(plan.truncated);
        assert!(plan.description.is_none());
        assert!(plan.dimensions.is_none());
        assert_eq!(plan.product_id.as_ref().unwrap().lines, vec!["#94150A325".to_string()]);

        // Not even one line fits: the id is still kept
        let plan = engine(0.5, 0.04)
            .calculate_layout(&metrics, "Hex Nut", None, "94150A325")
            .unwrap();
        assert_eq!(plan.block_count(), 1);
        assert!(plan.product_id.is_some());
    }

    #[test]
    fn test_blocks_do_not_overlap() {
        let metrics = FontMetrics::new();
        let plan = engine(1.5, 0.5)
            .calculate_layout(
                &metrics,
                "Zinc-Plated Steel Wood Screw",
                Some("L: 1\" | Size: #8"),
                "90031A196",
            )
            .unwrap();
        let blocks: Vec<&TextBlock> = plan.blocks().collect();
        for pair in blocks.windows(2) {
            assert!(pair[1].y_position >= pair[0].bottom());
        }
    }

    #[test]
    fn test_identical_inputs_identical_plans() {
        let metrics = FontMetrics::new();
        let e = engine(2.0, 1.0);
        let a = e
            .calculate_layout(&metrics, "Brass Knurled Insert", Some("Thread: M4"), "94180A351")
            .unwrap();
        let b = e
            .calculate_layout(&metrics, "Brass Knurled Insert", Some("Thread: M4"), "94180A351")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unmeasurable_text_is_an_error() {
        let metrics = FontMetrics::new();
        let result = engine(2.0, 1.0).calculate_layout(&metrics, "Gear \u{2699}", None, "1");
        assert!(matches!(
            result,
            Err(crate::error::Error::UnmeasurableGlyph { .. })
        ));
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LabelLayoutEngine>();
    }
}
