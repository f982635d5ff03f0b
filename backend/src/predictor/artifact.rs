//! On-disk model format.
//!
//! The artifact is a JSON document tagged by `kind`. Every variant records
//! the ordered feature names it was fitted on so the schema can be checked
//! before inference.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::regressors::{
    Aggregation, ConstantRegressor, LinearRegressor, RegressionTree, Regressor, TreeEnsemble,
    TreeNode,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Constant {
        feature_names: Vec<String>,
        value: f64,
    },
    Linear {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        feature_names: Vec<String>,
        #[serde(default)]
        base_score: f64,
        #[serde(default)]
        aggregation: Aggregation,
        trees: Vec<TreeSpec>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

impl ModelArtifact {
    /// Validates the structure and builds the runtime model.
    pub fn into_regressor(self) -> Result<Box<dyn Regressor>, String> {
        match self {
            ModelArtifact::Constant {
                feature_names,
                value,
            } => {
                check_finite("value", value)?;
                Ok(Box::new(ConstantRegressor {
                    feature_names,
                    value,
                }))
            }
            ModelArtifact::Linear {
                feature_names,
                coefficients,
                intercept,
            } => {
                if coefficients.len() != feature_names.len() {
                    return Err(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        feature_names.len()
                    ));
                }
                check_finite("intercept", intercept)?;
                for (i, c) in coefficients.iter().enumerate() {
                    check_finite(&format!("coefficients[{}]", i), *c)?;
                }
                Ok(Box::new(LinearRegressor {
                    feature_names,
                    coefficients: Array1::from(coefficients),
                    intercept,
                }))
            }
            ModelArtifact::TreeEnsemble {
                feature_names,
                base_score,
                aggregation,
                trees,
            } => {
                if trees.is_empty() {
                    return Err("tree ensemble has no trees".to_string());
                }
                check_finite("base_score", base_score)?;
                let n_features = feature_names.len();
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(i, tree)| {
                        build_tree(tree, n_features).map_err(|e| format!("tree {}: {}", i, e))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(TreeEnsemble {
                    feature_names,
                    base_score,
                    aggregation,
                    trees,
                }))
            }
        }
    }
}

fn build_tree(spec: TreeSpec, n_features: usize) -> Result<RegressionTree, String> {
    if spec.nodes.is_empty() {
        return Err("empty tree".to_string());
    }

    let n_nodes = spec.nodes.len();
    let mut nodes = Vec::with_capacity(n_nodes);
    for (idx, node) in spec.nodes.into_iter().enumerate() {
        let node = match node {
            NodeSpec::Leaf { leaf } => {
                check_finite(&format!("node {} leaf", idx), leaf)?;
                TreeNode::Leaf(leaf)
            }
            NodeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= n_features {
                    return Err(format!("node {} splits on unknown feature {}", idx, feature));
                }
                check_finite(&format!("node {} threshold", idx), threshold)?;
                // Children after the parent rule out cycles.
                for child in [left, right] {
                    if child <= idx || child >= n_nodes {
                        return Err(format!("node {} has invalid child {}", idx, child));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }
            }
        };
        nodes.push(node);
    }

    Ok(RegressionTree { nodes })
}

fn check_finite(what: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} is not finite", what))
    }
}
