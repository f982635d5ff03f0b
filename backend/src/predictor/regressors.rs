use ndarray::{Array1, ArrayView1, ArrayView2};

/// A fitted regression model that maps rows of features to prices.
pub trait Regressor: Send + Sync {
    fn kind(&self) -> &'static str;

    /// Column names in the order the model was fitted on.
    fn feature_names(&self) -> &[String];

    /// One prediction per row of `batch`.
    fn predict(&self, batch: ArrayView2<f64>) -> Array1<f64>;
}

pub struct ConstantRegressor {
    pub(super) feature_names: Vec<String>,
    pub(super) value: f64,
}

impl Regressor for ConstantRegressor {
    fn kind(&self) -> &'static str {
        "constant"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: ArrayView2<f64>) -> Array1<f64> {
        Array1::from_elem(batch.nrows(), self.value)
    }
}

pub struct LinearRegressor {
    pub(super) feature_names: Vec<String>,
    pub(super) coefficients: Array1<f64>,
    pub(super) intercept: f64,
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: ArrayView2<f64>) -> Array1<f64> {
        batch.dot(&self.coefficients) + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Flat node array; node 0 is the root and children always sit after
/// their parent.
pub struct RegressionTree {
    pub(super) nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn leaf_value(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf(value) => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] < threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Boosted trees: leaf values add up.
    #[default]
    Sum,
    /// Random forest: leaf values are averaged.
    Mean,
}

pub struct TreeEnsemble {
    pub(super) feature_names: Vec<String>,
    pub(super) base_score: f64,
    pub(super) aggregation: Aggregation,
    pub(super) trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.leaf_value(row)).sum();
        let combined = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean => total / self.trees.len() as f64,
        };
        self.base_score + combined
    }
}

impl Regressor for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: ArrayView2<f64>) -> Array1<f64> {
        batch.outer_iter().map(|row| self.predict_row(row)).collect()
    }
}
