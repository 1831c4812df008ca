//! In-memory codec for [CARv1](https://ipld.io/specs/transport/car/carv1/) archives.
//!
//! A CARv1 is a header listing the root [`Cid`](ipld_core::cid::Cid)s followed
//! by a sequence of length-prefixed blocks:
//! ```text
//! ┌────────────────────────┬───────────────────┬─────────┬─────────┬─────┐
//! │ Header length (varint) │ Header (DAG-CBOR) │ Block 0 │ Block 1 │ ... │
//! └────────────────────────┴───────────────────┴─────────┴─────────┴─────┘
//! ```
//!
//! [`encode`] builds such an archive from roots and blocks, [`decode`] splits
//! one back up, borrowing the block data from the input buffer.
#![deny(clippy::unwrap_used)]

mod cid;
pub mod multicodec;
mod v1;
mod varint;

pub use v1::{decode, encode, Block, Header as CarV1Header};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    CodecError(#[from] serde_ipld_dagcbor::error::CodecError),

    #[error(transparent)]
    CidError(#[from] ipld_core::cid::Error),

    #[error(transparent)]
    MultihashError(#[from] ipld_core::cid::multihash::Error),

    #[error("invalid argument: {0}")]
    InvalidArgumentError(String),

    /// The buffer ended before a varint's final byte.
    #[error("varint at offset {offset} is truncated")]
    TruncatedVarintError { offset: usize },

    /// The varint does not fit in a `u64`.
    #[error("varint at offset {offset} overflows a 64-bit integer")]
    VarintOverflowError { offset: usize },

    /// A header, block or digest declares more bytes than are available.
    #[error(
        "truncated data at offset {offset}, expected {expected} bytes but only {available} are available"
    )]
    TruncatedRecordError {
        offset: usize,
        expected: usize,
        available: usize,
    },

    /// The leading varint of a CID is neither `0x12` (CIDv0) nor `0x01` (CIDv1).
    #[error("unsupported CID version marker {marker:#x} at offset {offset}")]
    UnsupportedIdentifierVersionError { offset: usize, marker: u64 },

    /// The header `version` is missing or is not 1.
    ///
    /// A CARv2 file is reported with `received: Some(2)`, since its pragma is
    /// a valid CARv1 header with version 2.
    #[error("invalid version, expected version {expected}, but received version {received:?} instead")]
    UnsupportedCarVersionError { expected: u8, received: Option<i128> },

    /// The header does not have the `{version, roots}` shape.
    #[error("malformed CARv1 header: {0}")]
    MalformedHeaderError(&'static str),
}
