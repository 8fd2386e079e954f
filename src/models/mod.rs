pub mod implementations;

pub use implementations::{DistilBertSentimentModel, ModernBertSize, SentimentModernBertModel};
