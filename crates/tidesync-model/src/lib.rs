pub mod dataset;
pub mod time2vec;

pub use dataset::{DatasetError, WindowSample, WindowedDataset};
pub use time2vec::{Time2Vec, Time2VecConfig, Time2VecError};
