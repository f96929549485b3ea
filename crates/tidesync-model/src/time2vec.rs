//! Time2Vec: a learned time embedding made of one linear trend term and
//! `embed_dim - 1` sinusoidal terms, each a learned affine projection of the
//! raw time value.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Time2VecError {
    #[error("expected input last dimension {expected}, got {found}")]
    ShapeMismatch { expected: usize, found: usize },
}

#[derive(Config, Debug)]
pub struct Time2VecConfig {
    /// Dimensionality of the raw time input.
    pub input_dim: usize,
    /// Output embedding size; must be at least 2 so there is room for the
    /// trend term plus one periodic term.
    pub embed_dim: usize,
}

impl Time2VecConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Time2Vec<B> {
        assert!(self.embed_dim > 1, "embed_dim must be greater than 1");
        let periodic_dim = self.embed_dim - 1;
        Time2Vec {
            trend: LinearConfig::new(self.input_dim, 1)
                .with_bias(true)
                .init(device),
            periodic: LinearConfig::new(self.input_dim, periodic_dim)
                .with_bias(true)
                .init(device),
            input_dim: self.input_dim,
            embed_dim: self.embed_dim,
        }
    }
}

#[derive(Module, Debug)]
pub struct Time2Vec<B: Backend> {
    trend: Linear<B>,
    periodic: Linear<B>,
    input_dim: usize,
    embed_dim: usize,
}

impl<B: Backend> Time2Vec<B> {
    /// Maps (batch, sequence, input_dim) time values to
    /// (batch, sequence, embed_dim) embeddings: the trend projection first,
    /// then sine of each periodic projection.
    pub fn forward(&self, tau: Tensor<B, 3>) -> Result<Tensor<B, 3>, Time2VecError> {
        let [_, _, features] = tau.dims();
        if features != self.input_dim {
            return Err(Time2VecError::ShapeMismatch {
                expected: self.input_dim,
                found: features,
            });
        }

        let trend = self.trend.forward(tau.clone());
        let periodic = self.periodic.forward(tau).sin();
        Ok(Tensor::cat(vec![trend, periodic], 2))
    }

    /// Convenience for scalar time inputs shaped (batch, sequence): adds the
    /// trailing feature dimension and delegates to [`Self::forward`].
    pub fn forward_scalar(&self, tau: Tensor<B, 2>) -> Result<Tensor<B, 3>, Time2VecError> {
        let [batch, seq] = tau.dims();
        self.forward(tau.reshape([batch, seq, 1]))
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn embed_dim(&self) -> usize {
        self.embed_dim
    }
}
