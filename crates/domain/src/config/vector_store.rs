use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Number of top matches returned by a similarity search.
    #[serde(default = "d_top_k")]
    pub top_k: usize,
    /// Minimum cosine similarity for a match to be returned at all.
    #[serde(default = "d_min_similarity")]
    pub min_similarity: f32,
    /// Expected embedding dimensionality; vectors of a different length are
    /// rejected at upsert time rather than silently stored.
    #[serde(default = "d_dimensions")]
    pub dimensions: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            top_k: d_top_k(),
            min_similarity: d_min_similarity(),
            dimensions: d_dimensions(),
        }
    }
}

fn d_top_k() -> usize {
    8
}
fn d_min_similarity() -> f32 {
    0.2
}
fn d_dimensions() -> usize {
    1536
}
