pub mod dataset;
pub mod editor;
pub mod ids;
pub mod mbid;

pub use dataset::{Dataset, DatasetClass};
pub use editor::{EditorConfig, EditorMode};
pub use ids::{ClassKey, ClassKeys, DatasetId, EvalJobId};
pub use mbid::Mbid;
