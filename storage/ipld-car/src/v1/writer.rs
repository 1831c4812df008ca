use ipld_core::{cid::Cid, codec::Codec};
use serde_ipld_dagcbor::codec::DagCborCodec;

use crate::{cid, v1::Header, varint, Error};

/// Length of a block once framed: the length prefix, the CID and the data.
fn framed_block_len(cid: &Cid, data: &[u8]) -> usize {
    let record_length = cid::encoded_len(cid) + data.len();
    varint::encoded_len(record_length as u64) + record_length
}

/// Write an already encoded [`Header`] to `out`, prefixed with its length.
pub(crate) fn write_header(out: &mut Vec<u8>, encoded_header: &[u8]) -> usize {
    let prefix = varint::write(encoded_header.len() as u64, out);
    out.extend_from_slice(encoded_header);
    prefix + encoded_header.len()
}

/// Write a [`Cid`] and data block to `out`.
///
/// ```text
/// ┌──────────────────────┬─────┬────────────────────────┐
/// │ Data length (varint) │ CID │ Data block (raw bytes) │
/// └──────────────────────┴─────┴────────────────────────┘
/// ```
/// The length covers both the CID and the data block.
pub(crate) fn write_block(out: &mut Vec<u8>, cid: &Cid, data: &[u8]) -> usize {
    let record_length = cid::encoded_len(cid) + data.len();
    let prefix = varint::write(record_length as u64, out);
    cid::write_cid(cid, out);
    out.extend_from_slice(data);
    prefix + record_length
}

/// Encode a CARv1 with the given roots and blocks.
///
/// Blocks are written in the given order, without deduplication, and their
/// data is not checked against their CIDs. CIDs are always written in the
/// CIDv1 layout, CIDv0 blocks included. The roots are written to the header
/// as given.
#[tracing::instrument(skip_all, fields(roots = roots.len(), blocks = blocks.len()))]
pub fn encode<D>(roots: &[Cid], blocks: &[(Cid, D)]) -> Result<Vec<u8>, Error>
where
    D: AsRef<[u8]>,
{
    let encoded_header = DagCborCodec::encode_to_vec(&Header::new(roots.to_vec()))?;

    let capacity = varint::encoded_len(encoded_header.len() as u64)
        + encoded_header.len()
        + blocks
            .iter()
            .map(|(cid, data)| framed_block_len(cid, data.as_ref()))
            .sum::<usize>();
    let mut out = Vec::with_capacity(capacity);

    write_header(&mut out, &encoded_header);
    for (cid, data) in blocks {
        let written = write_block(&mut out, cid, data.as_ref());
        tracing::trace!(%cid, written, "wrote block");
    }
    debug_assert_eq!(out.len(), capacity);

    tracing::debug!(length = out.len(), "encoded CARv1");
    Ok(out)
}
