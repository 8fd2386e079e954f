use crate::core::error::Result;
use std::sync::Arc;

/// `(native_label, confidence)` pairs as produced by a model.
pub type LabelScores = Vec<(String, f32)>;

/// Anything that can score a piece of text.
///
/// Labels are in the model's own vocabulary ("POSITIVE", "LABEL_2",
/// "negative", ...); mapping them onto [`Sentiment`](super::Sentiment) is the
/// analyzer's job. Implementations are called from many request tasks at
/// once and must not keep per-call state.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<LabelScores>;

    /// Short human-readable name, used in logs and the health endpoint.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Adapter built from a plain function or closure.
pub struct FnClassifier<F>(F);

/// Wrap a closure as a [`Classifier`].
pub fn from_fn<F>(f: F) -> FnClassifier<F>
where
    F: Fn(&str) -> Result<LabelScores> + Send + Sync,
{
    FnClassifier(f)
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&str) -> Result<LabelScores> + Send + Sync,
{
    fn classify(&self, text: &str) -> Result<LabelScores> {
        (self.0)(text)
    }

    fn name(&self) -> String {
        "fn".to_string()
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&self, text: &str) -> Result<LabelScores> {
        (**self).classify(text)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn classify(&self, text: &str) -> Result<LabelScores> {
        (**self).classify(text)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
