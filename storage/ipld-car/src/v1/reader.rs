use ipld_core::{cid::Cid, codec::Codec, ipld::Ipld};
use serde_ipld_dagcbor::codec::DagCborCodec;

use crate::{
    cid,
    v1::{Block, Header},
    varint, Error,
};

/// Read the [`Header`] at the start of `buffer`.
///
/// Returns the header and the number of bytes it spans, length prefix included.
pub(crate) fn read_header(buffer: &[u8]) -> Result<(Header, usize), Error> {
    let (header_length, prefix) = varint::decode_usize(buffer, 0)?;

    let available = buffer.len() - prefix;
    if header_length > available {
        return Err(Error::TruncatedRecordError {
            offset: prefix,
            expected: header_length,
            available,
        });
    }

    let header: Ipld = DagCborCodec::decode_from_slice(&buffer[prefix..prefix + header_length])?;
    Ok((Header::try_from(header)?, prefix + header_length))
}

/// Read a [`Cid`] and data block from the start of `buffer`.
///
/// A block is composed of a CID (either version 0 or 1) and data, it is prefixed with the data length.
/// ```text
/// ┌──────────────────────┬─────┬────────────────────────┐
/// │ Data length (varint) │ CID │ Data block (raw bytes) │
/// └──────────────────────┴─────┴────────────────────────┘
/// ```
/// *The data block is returned AS IS, callers should use the codec field of the [`Cid`] to parse it.*
///
/// `offset` is the position of `buffer` in the whole CAR, used for error reporting.
pub(crate) fn read_block(buffer: &[u8], offset: usize) -> Result<(Block<'_>, usize), Error> {
    let (record_length, prefix) = varint::decode_usize(buffer, offset)?;

    let available = buffer.len() - prefix;
    if record_length > available {
        return Err(Error::TruncatedRecordError {
            offset: offset + prefix,
            expected: record_length,
            available,
        });
    }

    // The CID must fit inside the record, it can't borrow bytes from the next one
    let record = &buffer[prefix..prefix + record_length];
    let (cid, cid_length) = cid::read_cid(record, offset + prefix)?;

    Ok(((cid, &record[cid_length..]), prefix + record_length))
}

/// Decode a CARv1 held in memory.
///
/// Returns the header roots and the blocks, in the order they appear in
/// `buffer`. Block data is borrowed from `buffer`.
///
/// Decoding fails as a whole if:
/// * The header is not a `{version, roots}` map or its version is not 1.
/// * Any length, CID or data block runs past the end of `buffer`.
/// * A CID is neither a CIDv0 nor a CIDv1.
///
/// Block data is not verified against the CIDs.
#[tracing::instrument(skip_all, fields(length = buffer.len()))]
pub fn decode(buffer: &[u8]) -> Result<(Vec<Cid>, Vec<Block<'_>>), Error> {
    let (header, mut position) = read_header(buffer)?;
    tracing::trace!(roots = header.roots.len(), position, "read header");

    let mut blocks = vec![];
    while position < buffer.len() {
        let (block, read) = read_block(&buffer[position..], position)?;
        tracing::trace!(cid = %block.0, position, read, "read block");
        blocks.push(block);
        position += read;
    }

    tracing::debug!(blocks = blocks.len(), "decoded CARv1");
    Ok((header.roots, blocks))
}
