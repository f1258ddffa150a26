use super::config::SequenceClassifierConfig;
use super::encoder::{TransformerEncoder, MASKED_SCORE};
use candle_core::{DType, Device, Module, Result, Tensor, D};
use candle_nn::{embedding, linear, Dropout, Embedding, Linear, VarBuilder};

/// Transformer sequence classifier.
///
/// token embedding + learned positions → encoder stack (padding masked) →
/// masked mean pool → dropout → linear head. [`forward`](Self::forward)
/// returns raw logits `[batch, num_classes]`.
#[derive(Debug)]
pub struct SequenceClassifier {
    token_embedding: Embedding,
    position_embedding: Embedding,
    encoder: TransformerEncoder,
    dropout: Dropout,
    classifier: Linear,
    pad_id: u32,
    max_length: usize,
    num_classes: usize,
    device: Device,
}

impl SequenceClassifier {
    pub fn load(vb: VarBuilder, config: &SequenceClassifierConfig) -> Result<Self> {
        let token_embedding = embedding(
            config.vocab_size,
            config.embedding_dim,
            vb.pp("token_embedding"),
        )?;
        let position_embedding = embedding(
            config.max_length,
            config.embedding_dim,
            vb.pp("position_embedding"),
        )?;
        let encoder = TransformerEncoder::load(vb.pp("encoder"), config)?;
        let classifier = linear(config.embedding_dim, config.num_classes, vb.pp("classifier"))?;

        Ok(Self {
            token_embedding,
            position_embedding,
            encoder,
            dropout: Dropout::new(config.dropout as f32),
            classifier,
            pad_id: config.pad_id,
            max_length: config.max_length,
            num_classes: config.num_classes,
            device: vb.device().clone(),
        })
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// `input_ids`: u32 `[batch, seq_len]` with `seq_len <= max_length`.
    pub fn forward(&self, input_ids: &Tensor) -> Result<Tensor> {
        let (_batch_size, seq_len) = input_ids.dims2()?;
        if seq_len > self.max_length {
            candle_core::bail!(
                "sequence length {seq_len} exceeds max_length {}",
                self.max_length
            )
        }
        let positions = Tensor::arange(0u32, seq_len as u32, input_ids.device())?.unsqueeze(0)?;
        let hidden = self
            .token_embedding
            .forward(input_ids)?
            .broadcast_add(&self.position_embedding.forward(&positions)?)?;

        // 1.0 at real residues, 0.0 at padding: [batch, seq_len]
        let non_pad = input_ids.ne(self.pad_id)?.to_dtype(DType::F32)?;
        // [batch, 1, 1, seq_len]; MASKED_SCORE at padding, 0 elsewhere
        let key_mask = (non_pad.affine(-1.0, 1.0)? * MASKED_SCORE)?
            .unsqueeze(1)?
            .unsqueeze(1)?;

        let encoded = self.encoder.forward(&hidden, &key_mask)?;
        let pooled = masked_mean_pool(&encoded, &non_pad)?;
        let pooled = self.dropout.forward(&pooled, false)?;
        self.classifier.forward(&pooled)
    }
}

/// Mean over the non-padding positions of `[batch, seq, dim]`.
///
/// `non_pad` is `[batch, seq]` with 1.0 for real tokens. The divisor is floored
/// at 1 so an all-padding row pools to zeros.
pub fn masked_mean_pool(encoded: &Tensor, non_pad: &Tensor) -> Result<Tensor> {
    let mask = non_pad.unsqueeze(D::Minus1)?;
    let summed = encoded.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.maximum(1f32)?;
    summed.broadcast_div(&counts)
}
