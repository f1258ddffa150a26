//! A protein tokenizer for the sequence classifiers.
//!
//! The vocabulary is fixed: `<PAD>` (0), `<UNK>` (1), then the twenty canonical
//! amino acids in alphabetical order. Sequences are cleaned with
//! [`protlm_core::clean_sequence`], mapped one residue per token, truncated to
//! `max_length` and right-padded, so every encoding has exactly `max_length` ids.
use candle_core::{Device, Tensor};
use protlm_core::{clean_sequence, AMINO_ACIDS};
use std::collections::HashMap;

pub const PAD_TOKEN: &str = "<PAD>";
pub const UNK_TOKEN: &str = "<UNK>";

/// Rendering of `<UNK>` and out-of-range ids in [`ProteinTokenizer::decode`].
const UNKNOWN_RESIDUE: char = 'X';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinVocab {
    tokens: Vec<String>,
    token_to_id: HashMap<String, u32>,
}

impl ProteinVocab {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    pub fn pad_id(&self) -> u32 {
        0
    }

    pub fn unk_id(&self) -> u32 {
        1
    }
}

pub fn build_protein_vocab() -> ProteinVocab {
    let tokens: Vec<String> = [PAD_TOKEN.to_string(), UNK_TOKEN.to_string()]
        .into_iter()
        .chain(AMINO_ACIDS.iter().map(|aa| aa.to_string()))
        .collect();
    let token_to_id = tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| (token.clone(), idx as u32))
        .collect();
    ProteinVocab {
        tokens,
        token_to_id,
    }
}

#[derive(Debug, Clone)]
pub struct ProteinTokenizer {
    vocab: ProteinVocab,
    residue_ids: HashMap<char, u32>,
    max_length: usize,
}

impl ProteinTokenizer {
    pub fn new(max_length: usize) -> Self {
        let vocab = build_protein_vocab();
        let residue_ids = AMINO_ACIDS
            .iter()
            .filter_map(|&aa| vocab.token_to_id(&aa.to_string()).map(|id| (aa, id)))
            .collect();
        Self {
            vocab,
            residue_ids,
            max_length,
        }
    }

    pub fn vocab(&self) -> &ProteinVocab {
        &self.vocab
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn pad_id(&self) -> u32 {
        self.vocab.pad_id()
    }

    pub fn unk_id(&self) -> u32 {
        self.vocab.unk_id()
    }

    /// Encode to exactly `max_length` ids. Never fails: unknown letters map to `<UNK>`.
    pub fn encode(&self, sequence: &str) -> Vec<u32> {
        let mut ids: Vec<u32> = clean_sequence(sequence)
            .chars()
            .take(self.max_length)
            .map(|residue| {
                self.residue_ids
                    .get(&residue)
                    .copied()
                    .unwrap_or(self.unk_id())
            })
            .collect();
        ids.resize(self.max_length, self.pad_id());
        ids
    }

    pub fn batch_encode<'a, I>(&self, sequences: I) -> Vec<Vec<u32>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        sequences.into_iter().map(|seq| self.encode(seq)).collect()
    }

    /// `[1, max_length]` u32 tensor ready for the classifier.
    pub fn encode_tensor(&self, sequence: &str, device: &Device) -> candle_core::Result<Tensor> {
        Tensor::new(self.encode(sequence).as_slice(), device)?.unsqueeze(0)
    }

    /// Map ids back to residues, skipping `<PAD>`.
    pub fn decode(&self, ids: &[u32]) -> String {
        ids.iter()
            .filter(|&&id| id != self.pad_id())
            .map(|&id| {
                self.vocab
                    .id_to_token(id)
                    .filter(|_| id != self.unk_id())
                    .and_then(|token| token.chars().next())
                    .unwrap_or(UNKNOWN_RESIDUE)
            })
            .collect()
    }
}
