//! Batch label planning.
//!
//! [`LabelPlanner`] ties the pieces together for a whole product batch: it
//! optionally reorders the batch with a [`ProductSorter`], then lays out
//! every product with one [`LabelLayoutEngine`]. A product whose layout
//! fails is reported and skipped; the rest of the batch is still planned.

use serde::{Serialize, Serializer};

use crate::config::LabelConfig;
use crate::error::{Error, Result};
use crate::layout::{LabelLayoutEngine, LayoutPlan};
use crate::metrics::{FontMetrics, TextMetrics};
use crate::product::{ProductRecord, ProductSet};
use crate::render::{DrawingSurface, LabelRenderer, ProductImage, RenderStats};
use crate::sorting::{apply_order, ProductSorter};
use crate::units::POINTS_PER_INCH;

/// Result of planning one label.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabelOutcome {
    /// Layout succeeded
    Planned {
        /// Product id
        id: String,
        /// The computed layout
        plan: LayoutPlan,
    },
    /// Layout failed; the batch went on without this product
    Failed {
        /// Product id
        id: String,
        /// Why layout failed
        #[serde(serialize_with = "error_message")]
        error: Error,
    },
}

fn error_message<S: Serializer>(error: &Error, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl LabelOutcome {
    /// Product id this outcome is for.
    pub fn id(&self) -> &str {
        match self {
            LabelOutcome::Planned { id, .. } | LabelOutcome::Failed { id, .. } => id,
        }
    }

    /// The plan, when layout succeeded.
    pub fn plan(&self) -> Option<&LayoutPlan> {
        match self {
            LabelOutcome::Planned { plan, .. } => Some(plan),
            LabelOutcome::Failed { .. } => None,
        }
    }

    /// Whether layout failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, LabelOutcome::Failed { .. })
    }
}

/// Plans labels for product batches.
pub struct LabelPlanner {
    engine: LabelLayoutEngine,
    metrics: Box<dyn TextMetrics + Send + Sync>,
    sorter: Option<Box<dyn ProductSorter>>,
    renderer: LabelRenderer,
}

impl LabelPlanner {
    /// Create a planner measuring with the standard fonts.
    pub fn new(engine: LabelLayoutEngine) -> Self {
        Self {
            engine,
            metrics: Box::new(FontMetrics::new()),
            sorter: None,
            renderer: LabelRenderer::new(),
        }
    }

    /// Create a planner for the label described by `config`.
    pub fn from_config(config: &LabelConfig) -> Self {
        Self::new(LabelLayoutEngine::from_config(config))
    }

    /// Measure text with `metrics`.
    pub fn with_metrics(mut self, metrics: impl TextMetrics + Send + Sync + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Reorder batches with `sorter` before planning.
    pub fn with_sorter(mut self, sorter: Box<dyn ProductSorter>) -> Self {
        self.sorter = Some(sorter);
        self
    }

    /// The layout engine.
    pub fn engine(&self) -> &LabelLayoutEngine {
        &self.engine
    }

    /// Name of the configured sorter, if any.
    pub fn sorter_name(&self) -> Option<&str> {
        self.sorter.as_deref().map(|s| s.name())
    }

    /// The batch in planning order.
    pub fn order(&self, products: &ProductSet) -> ProductSet {
        match &self.sorter {
            Some(sorter) => {
                let order = sorter.sort(products);
                log::info!(
                    "Sorted {} products with the {} sorter",
                    products.len(),
                    sorter.name()
                );
                apply_order(products, &order)
            },
            None => products.clone(),
        }
    }

    /// Lay out one product.
    pub fn plan_one(&self, id: &str, product: &ProductRecord) -> Result<LayoutPlan> {
        self.engine.layout_product(self.metrics.as_ref(), id, product)
    }

    /// Lay out a whole batch, in planning order.
    pub fn plan(&self, products: &ProductSet) -> Vec<LabelOutcome> {
        let ordered = self.order(products);
        let outcomes: Vec<LabelOutcome> = ordered
            .iter()
            .map(|(id, product)| match self.plan_one(id, product) {
                Ok(plan) => {
                    if plan.truncated {
                        log::warn!("Label for {} was truncated", id);
                    }
                    LabelOutcome::Planned {
                        id: id.clone(),
                        plan,
                    }
                },
                Err(error) => {
                    log::error!("Could not lay out {}: {}", id, error);
                    LabelOutcome::Failed {
                        id: id.clone(),
                        error,
                    }
                },
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        log::info!("Planned {} labels, {} failed", outcomes.len() - failed, failed);
        outcomes
    }

    /// Draw a planned label, loading the product image when there is one.
    ///
    /// An image that cannot be read is logged and replaced by a placeholder.
    pub fn render(
        &self,
        plan: &LayoutPlan,
        product: &ProductRecord,
        surface: &mut dyn DrawingSurface,
    ) -> Result<RenderStats> {
        let area = plan.image_area.scaled(POINTS_PER_INCH);
        let image = product
            .image_path()
            .and_then(|path| match ProductImage::open_for_box(path, &area) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Could not load image {}: {}", path.display(), e);
                    None
                },
            });
        self.renderer.render(plan, image.as_ref(), surface)
    }
}
