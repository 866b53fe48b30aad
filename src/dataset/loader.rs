use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::errors::DatasetError;
use crate::types::NumericLabel;

/// Opens the item stored at a path (image decode, raw bytes, ...).
pub type ItemLoader<T> = Arc<dyn Fn(&Path) -> Result<T, DatasetError> + Send + Sync + 'static>;

/// Per-item transform.
pub type ItemTransform<T> = Arc<dyn Fn(T) -> T + Send + Sync + 'static>;

/// Joint transform over both members of a pair (synchronized augmentation).
pub type PairTransform<T> = Arc<dyn Fn(T, T) -> (T, T) + Send + Sync + 'static>;

/// Transform applied to the numeric pair label.
pub type LabelTransform = Arc<dyn Fn(NumericLabel) -> NumericLabel + Send + Sync + 'static>;

/// Loader returning raw file bytes.
pub fn read_bytes_loader() -> ItemLoader<Vec<u8>> {
    Arc::new(|path: &Path| {
        fs::read(path).map_err(|err| DatasetError::ItemLoad {
            path: path.to_string_lossy().into_owned(),
            reason: err.to_string(),
        })
    })
}

/// Optional transforms for pair datasets, applied item → pair → label.
pub struct Transforms<T> {
    /// Applied to each member after loading.
    pub item: Option<ItemTransform<T>>,
    /// Applied to both members after the item transform.
    pub pair: Option<PairTransform<T>>,
    /// Applied to the numeric label.
    pub label: Option<LabelTransform>,
}

impl<T> Default for Transforms<T> {
    fn default() -> Self {
        Self {
            item: None,
            pair: None,
            label: None,
        }
    }
}

impl<T> Clone for Transforms<T> {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            pair: self.pair.clone(),
            label: self.label.clone(),
        }
    }
}

impl<T> Transforms<T> {
    /// Set the per-item transform.
    pub fn with_item_transform(mut self, transform: ItemTransform<T>) -> Self {
        self.item = Some(transform);
        self
    }

    /// Set the joint pair transform.
    pub fn with_pair_transform(mut self, transform: PairTransform<T>) -> Self {
        self.pair = Some(transform);
        self
    }

    /// Set the label transform.
    pub fn with_label_transform(mut self, transform: LabelTransform) -> Self {
        self.label = Some(transform);
        self
    }

    /// Item transform on each member, then the joint pair transform.
    pub fn apply_items(&self, left: T, right: T) -> (T, T) {
        let (left, right) = match &self.item {
            Some(transform) => (transform(left), transform(right)),
            None => (left, right),
        };
        match &self.pair {
            Some(transform) => transform(left, right),
            None => (left, right),
        }
    }

    /// Run the label transform, if any.
    pub fn apply_label(&self, label: NumericLabel) -> NumericLabel {
        match &self.label {
            Some(transform) => transform(label),
            None => label,
        }
    }
}

/// Optional transforms for feature/target datasets, applied feature → pair → target.
pub struct FeatureTargetTransforms<T> {
    /// Applied to the loaded feature.
    pub feature: Option<ItemTransform<T>>,
    /// Applied to the `(feature, target)` pair after the per-side transforms.
    pub pair: Option<PairTransform<T>>,
    /// Applied to the loaded target.
    pub target: Option<ItemTransform<T>>,
}

impl<T> Default for FeatureTargetTransforms<T> {
    fn default() -> Self {
        Self {
            feature: None,
            pair: None,
            target: None,
        }
    }
}

impl<T> Clone for FeatureTargetTransforms<T> {
    fn clone(&self) -> Self {
        Self {
            feature: self.feature.clone(),
            pair: self.pair.clone(),
            target: self.target.clone(),
        }
    }
}

impl<T> FeatureTargetTransforms<T> {
    /// Set the feature transform.
    pub fn with_feature_transform(mut self, transform: ItemTransform<T>) -> Self {
        self.feature = Some(transform);
        self
    }

    /// Set the joint feature/target transform.
    pub fn with_pair_transform(mut self, transform: PairTransform<T>) -> Self {
        self.pair = Some(transform);
        self
    }

    /// Set the target transform.
    pub fn with_target_transform(mut self, transform: ItemTransform<T>) -> Self {
        self.target = Some(transform);
        self
    }

    /// Run feature, target, then pair transforms.
    pub fn apply(&self, feature: T, target: T) -> (T, T) {
        let feature = match &self.feature {
            Some(transform) => transform(feature),
            None => feature,
        };
        let (feature, target) = match &self.pair {
            Some(transform) => transform(feature, target),
            None => (feature, target),
        };
        let target = match &self.target {
            Some(transform) => transform(target),
            None => target,
        };
        (feature, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_bytes_loader_reads_and_reports_failures() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("item.bin");
        fs::write(&path, b"payload").unwrap();
        let loader = read_bytes_loader();
        assert_eq!(loader(&path).unwrap(), b"payload".to_vec());

        let missing = temp.path().join("missing.bin");
        match loader(&missing) {
            Err(DatasetError::ItemLoad { path, .. }) => assert!(path.ends_with("missing.bin")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn pair_transforms_run_item_then_pair() {
        let transforms: Transforms<String> = Transforms::default()
            .with_item_transform(Arc::new(|item: String| format!("{item}+i")))
            .with_pair_transform(Arc::new(|left: String, right: String| (right, left)));
        let (left, right) = transforms.apply_items("a".to_string(), "b".to_string());
        assert_eq!(left, "b+i");
        assert_eq!(right, "a+i");
    }

    #[test]
    fn label_transform_is_optional() {
        let identity: Transforms<u8> = Transforms::default();
        assert_eq!(identity.apply_label(1), 1);
        let flipped = identity.with_label_transform(Arc::new(|label: u8| 1 - label));
        assert_eq!(flipped.apply_label(1), 0);
    }

    #[test]
    fn feature_target_transforms_apply_in_order() {
        let transforms: FeatureTargetTransforms<String> = FeatureTargetTransforms::default()
            .with_feature_transform(Arc::new(|item: String| format!("{item}+f")))
            .with_pair_transform(Arc::new(|feature: String, target: String| {
                (format!("{feature}+p"), format!("{target}+p"))
            }))
            .with_target_transform(Arc::new(|item: String| format!("{item}+t")));
        let (feature, target) = transforms.apply("x".to_string(), "y".to_string());
        assert_eq!(feature, "x+f+p");
        assert_eq!(target, "y+p+t");
    }
}
