use super::config::SequenceClassifierConfig;
use candle_core::{Module, Result, Tensor, D};
use candle_nn::{
    layer_norm, linear, ops::softmax_last_dim, Dropout, LayerNorm, Linear, VarBuilder,
};

const LAYER_NORM_EPS: f64 = 1e-5;

/// Added to the attention scores of padded keys.
///
/// Finite rather than `-inf`: softmax still gives padded keys zero weight, and
/// a row whose keys are all padding comes out uniform instead of NaN.
pub(crate) const MASKED_SCORE: f64 = -1e9;

/// Multi-head self-attention with a packed `in_proj` (q, k, v stacked on the output dim).
#[derive(Debug)]
pub struct SelfAttention {
    in_proj: Linear,
    out_proj: Linear,
    num_heads: usize,
    head_dim: usize,
}

impl SelfAttention {
    pub fn load(vb: VarBuilder, config: &SequenceClassifierConfig) -> Result<Self> {
        let dim = config.embedding_dim;
        let in_proj_weight = vb.get_with_hints(
            (3 * dim, dim),
            "in_proj_weight",
            candle_nn::init::DEFAULT_KAIMING_NORMAL,
        )?;
        let in_proj_bias = vb.get_with_hints(3 * dim, "in_proj_bias", candle_nn::init::ZERO)?;
        let out_proj = linear(dim, dim, vb.pp("out_proj"))?;
        Ok(Self {
            in_proj: Linear::new(in_proj_weight, Some(in_proj_bias)),
            out_proj,
            num_heads: config.num_heads,
            head_dim: config.head_dim(),
        })
    }

    /// `x`: `[batch, seq, dim]`. `key_mask`: additive, broadcastable to `[batch, heads, seq, seq]`.
    pub fn forward(&self, x: &Tensor, key_mask: &Tensor) -> Result<Tensor> {
        let (batch_size, seq_len, dim) = x.dims3()?;
        let qkv = self.in_proj.forward(x)?;
        // [batch, seq, dim] -> [batch, heads, seq, head_dim]
        let split_heads = |chunk: usize| -> Result<Tensor> {
            qkv.narrow(D::Minus1, chunk * dim, dim)?
                .contiguous()?
                .reshape((batch_size, seq_len, self.num_heads, self.head_dim))?
                .transpose(1, 2)?
                .contiguous()
        };
        let query = split_heads(0)?;
        let key = split_heads(1)?;
        let value = split_heads(2)?;

        let scale = 1.0 / (self.head_dim as f64).sqrt();
        let scores = (query.matmul(&key.t()?.contiguous()?)? * scale)?;
        let scores = scores.broadcast_add(key_mask)?;
        let weights = softmax_last_dim(&scores)?;

        let attn = weights
            .matmul(&value)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((batch_size, seq_len, dim))?;
        self.out_proj.forward(&attn)
    }
}

/// Post-norm encoder layer with a GELU feed-forward block.
#[derive(Debug)]
pub struct EncoderLayer {
    self_attn: SelfAttention,
    linear1: Linear,
    linear2: Linear,
    norm1: LayerNorm,
    norm2: LayerNorm,
    dropout: Dropout,
    dropout1: Dropout,
    dropout2: Dropout,
}

impl EncoderLayer {
    pub fn load(vb: VarBuilder, config: &SequenceClassifierConfig) -> Result<Self> {
        let dim = config.embedding_dim;
        let dropout = config.dropout as f32;
        Ok(Self {
            self_attn: SelfAttention::load(vb.pp("self_attn"), config)?,
            linear1: linear(dim, config.ff_dim, vb.pp("linear1"))?,
            linear2: linear(config.ff_dim, dim, vb.pp("linear2"))?,
            norm1: layer_norm(dim, LAYER_NORM_EPS, vb.pp("norm1"))?,
            norm2: layer_norm(dim, LAYER_NORM_EPS, vb.pp("norm2"))?,
            dropout: Dropout::new(dropout),
            dropout1: Dropout::new(dropout),
            dropout2: Dropout::new(dropout),
        })
    }

    pub fn forward(&self, x: &Tensor, key_mask: &Tensor) -> Result<Tensor> {
        let attn = self.self_attn.forward(x, key_mask)?;
        let x = self.norm1.forward(&(x + self.dropout1.forward(&attn, false)?)?)?;

        let ff = self.linear1.forward(&x)?.gelu_erf()?;
        let ff = self.linear2.forward(&self.dropout.forward(&ff, false)?)?;
        self.norm2.forward(&(&x + self.dropout2.forward(&ff, false)?)?)
    }
}

#[derive(Debug)]
pub struct TransformerEncoder {
    layers: Vec<EncoderLayer>,
}

impl TransformerEncoder {
    pub fn load(vb: VarBuilder, config: &SequenceClassifierConfig) -> Result<Self> {
        let vb = vb.pp("layers");
        let layers = (0..config.num_layers)
            .map(|layer| EncoderLayer::load(vb.pp(layer), config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layers })
    }

    pub fn forward(&self, x: &Tensor, key_mask: &Tensor) -> Result<Tensor> {
        let mut hidden = x.clone();
        for layer in &self.layers {
            hidden = layer.forward(&hidden, key_mask)?;
        }
        Ok(hidden)
    }
}
