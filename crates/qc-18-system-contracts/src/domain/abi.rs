//! # Call Encoding
//!
//! Word-oriented argument encoding used for calldata, return data and revert
//! payloads. Static values occupy one 32-byte head word; dynamic values
//! (`bytes`, `string`, `bytes[]`) put an offset in the head and their content
//! in the tail.

use crate::domain::value_objects::{Address, Bytes, Selector, U256};
use crate::errors::AbiError;

/// Size of one encoding word.
pub const WORD: usize = 32;

/// A value to encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// 20-byte address, left-padded.
    Address(Address),
    /// Unsigned 256-bit integer.
    Uint(U256),
    /// Boolean as 0 or 1.
    Bool(bool),
    /// Dynamic byte string.
    Bytes(Vec<u8>),
    /// UTF-8 string, encoded like `bytes`.
    String(String),
    /// Dynamic array of byte strings.
    BytesArray(Vec<Bytes>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        matches!(self, Self::Bytes(_) | Self::String(_) | Self::BytesArray(_))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a sequence of tokens.
#[must_use]
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
            encode_tail(token, &mut tail);
        } else {
            head.extend_from_slice(&static_word(token));
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Encodes `selector ++ encode(tokens)`.
#[must_use]
pub fn encode_call(selector: Selector, tokens: &[Token]) -> Bytes {
    let mut out = selector.as_bytes().to_vec();
    out.extend_from_slice(&encode(tokens));
    Bytes::from_vec(out)
}

/// Encodes a U256 as one word.
#[must_use]
pub fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

/// Encodes an address as one word.
#[must_use]
pub fn address_word(address: Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn static_word(token: &Token) -> [u8; WORD] {
    match token {
        Token::Address(address) => address_word(*address),
        Token::Uint(value) => uint_word(*value),
        Token::Bool(flag) => uint_word(U256::from(u8::from(*flag))),
        Token::Bytes(_) | Token::String(_) | Token::BytesArray(_) => [0u8; WORD],
    }
}

fn encode_tail(token: &Token, tail: &mut Vec<u8>) {
    match token {
        Token::Bytes(data) => encode_packed_bytes(data, tail),
        Token::String(text) => encode_packed_bytes(text.as_bytes(), tail),
        Token::BytesArray(items) => {
            tail.extend_from_slice(&uint_word(U256::from(items.len())));
            let inner: Vec<Token> = items
                .iter()
                .map(|item| Token::Bytes(item.as_slice().to_vec()))
                .collect();
            tail.extend_from_slice(&encode(&inner));
        }
        Token::Address(_) | Token::Uint(_) | Token::Bool(_) => {}
    }
}

fn encode_packed_bytes(data: &[u8], tail: &mut Vec<u8>) {
    tail.extend_from_slice(&uint_word(U256::from(data.len())));
    tail.extend_from_slice(data);
    let padding = (WORD - data.len() % WORD) % WORD;
    tail.resize(tail.len() + padding, 0);
}

// =============================================================================
// DECODING
// =============================================================================

/// Reads arguments out of an encoded argument block (selector already removed).
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    /// Wraps an encoded argument block.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the raw head word at `index`.
    pub fn word(&self, index: usize) -> Result<&'a [u8], AbiError> {
        let start = index.checked_mul(WORD).ok_or(AbiError::OutOfBounds)?;
        self.slice(start, WORD)
    }

    /// Reads a `uint256`.
    pub fn uint(&self, index: usize) -> Result<U256, AbiError> {
        Ok(U256::from_big_endian(self.word(index)?))
    }

    /// Reads a `uint64`, rejecting wider values.
    pub fn u64(&self, index: usize) -> Result<u64, AbiError> {
        let value = self.uint(index)?;
        if value > U256::from(u64::MAX) {
            return Err(AbiError::ValueOutOfRange);
        }
        Ok(value.low_u64())
    }

    /// Reads an `address`, rejecting dirty high bytes.
    pub fn address(&self, index: usize) -> Result<Address, AbiError> {
        let word = self.word(index)?;
        if word[..12].iter().any(|b| *b != 0) {
            return Err(AbiError::ValueOutOfRange);
        }
        Address::from_slice(&word[12..]).ok_or(AbiError::ValueOutOfRange)
    }

    /// Reads a `bool`.
    pub fn bool(&self, index: usize) -> Result<bool, AbiError> {
        let value = self.uint(index)?;
        if value > U256::one() {
            return Err(AbiError::ValueOutOfRange);
        }
        Ok(!value.is_zero())
    }

    /// Reads a dynamic `bytes` argument.
    pub fn bytes(&self, index: usize) -> Result<Vec<u8>, AbiError> {
        let offset = self.offset(index)?;
        let len = self.length_at(offset)?;
        Ok(self.slice(offset + WORD, len)?.to_vec())
    }

    /// Reads a dynamic `string` argument.
    pub fn string(&self, index: usize) -> Result<String, AbiError> {
        String::from_utf8(self.bytes(index)?).map_err(|_| AbiError::InvalidUtf8)
    }

    /// Reads a dynamic `bytes[]` argument.
    pub fn bytes_array(&self, index: usize) -> Result<Vec<Bytes>, AbiError> {
        let offset = self.offset(index)?;
        let count = self.length_at(offset)?;
        let inner = Decoder::new(self.data.get(offset + WORD..).ok_or(AbiError::OutOfBounds)?);
        // Every element needs at least a head word.
        if count > inner.data.len() / WORD {
            return Err(AbiError::OutOfBounds);
        }
        (0..count)
            .map(|i| inner.bytes(i).map(Bytes::from_vec))
            .collect()
    }

    fn offset(&self, index: usize) -> Result<usize, AbiError> {
        self.bounded(self.uint(index)?)
    }

    fn length_at(&self, offset: usize) -> Result<usize, AbiError> {
        let word = self.slice(offset, WORD)?;
        self.bounded(U256::from_big_endian(word))
    }

    // Any offset or length larger than the buffer is malformed.
    fn bounded(&self, value: U256) -> Result<usize, AbiError> {
        if value > U256::from(self.data.len()) {
            return Err(AbiError::OutOfBounds);
        }
        Ok(value.as_usize())
    }

    fn slice(&self, start: usize, len: usize) -> Result<&'a [u8], AbiError> {
        let end = start.checked_add(len).ok_or(AbiError::OutOfBounds)?;
        self.data.get(start..end).ok_or(AbiError::OutOfBounds)
    }
}

/// Splits calldata into its selector and argument block.
pub fn split_call(calldata: &[u8]) -> Result<(Selector, &[u8]), AbiError> {
    let selector = Selector::from_prefix(calldata).ok_or(AbiError::MissingSelector)?;
    Ok((selector, &calldata[4..]))
}

// =============================================================================
// TESTS
// =============================================================================
