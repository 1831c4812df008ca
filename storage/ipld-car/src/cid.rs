//! Binary layout of the [`Cid`]s framing each CARv1 block.
//!
//! ```text
//! CIDv0: ┌──────┬────────────────────────┐
//!        │ 0x12 │ sha2-256 digest (32 B) │
//!        └──────┴────────────────────────┘
//! CIDv1: ┌──────┬───────┬───────────┬─────────────┬────────┐
//!        │ 0x01 │ codec │ hash code │ digest size │ digest │
//!        └──────┴───────┴───────────┴─────────────┴────────┘
//! ```
//!
//! Every field except the digest is a varint. Writing always produces the
//! CIDv1 layout; the CIDv0 layout is only ever read.

use ipld_core::cid::{multihash::Multihash, Cid, Version};

use crate::{
    multicodec::{CID_V1_MARKER, SHA_256_CODE, SHA_256_DIGEST_SIZE},
    varint, Error,
};

/// The layout announced by the first varint of a binary CID.
///
/// A CIDv0 is a bare sha2-256 multihash, so its first byte is the sha2-256
/// multicodec code and not a version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentifierLayout {
    /// `0x12` followed by a 32 byte digest.
    Legacy,
    /// `0x01` followed by codec, hash code, digest size and digest.
    V1,
}

impl IdentifierLayout {
    fn from_marker(marker: u64, offset: usize) -> Result<Self, Error> {
        match marker {
            SHA_256_CODE => Ok(Self::Legacy),
            CID_V1_MARKER => Ok(Self::V1),
            marker => Err(Error::UnsupportedIdentifierVersionError { offset, marker }),
        }
    }
}

/// Number of bytes [`write_cid`] will emit for `cid`.
pub(crate) fn encoded_len(cid: &Cid) -> usize {
    let hash = cid.hash();
    varint::encoded_len(CID_V1_MARKER)
        + varint::encoded_len(cid.codec())
        + varint::encoded_len(hash.code())
        + varint::encoded_len(hash.size() as u64)
        + hash.digest().len()
}

/// Append the CIDv1 layout of `cid` to `out`, returning the number of bytes written.
///
/// CIDv0 inputs are written as the equivalent `dag-pb` CIDv1.
pub(crate) fn write_cid(cid: &Cid, out: &mut Vec<u8>) -> usize {
    let hash = cid.hash();
    let start = out.len();

    varint::write(CID_V1_MARKER, out);
    varint::write(cid.codec(), out);
    varint::write(hash.code(), out);
    varint::write(hash.size() as u64, out);
    out.extend_from_slice(hash.digest());

    if cid.version() == Version::V0 {
        tracing::trace!(%cid, "upgraded CIDv0 to the CIDv1 layout");
    }

    out.len() - start
}

/// Read a [`Cid`] from the start of `buffer`.
///
/// Returns the CID and the exact number of bytes it spans, so that callers can
/// treat whatever follows as the block payload. `offset` is the position of
/// `buffer` inside the enclosing CAR and is only used to report errors.
pub(crate) fn read_cid(buffer: &[u8], offset: usize) -> Result<(Cid, usize), Error> {
    let (marker, mut position) = varint::decode(buffer, offset)?;

    let cid = match IdentifierLayout::from_marker(marker, offset)? {
        IdentifierLayout::Legacy => {
            let digest = take(buffer, position, SHA_256_DIGEST_SIZE, offset)?;
            position += SHA_256_DIGEST_SIZE;
            Cid::new_v0(Multihash::wrap(SHA_256_CODE, digest)?)?
        }
        IdentifierLayout::V1 => {
            let (codec, read) = varint::decode(&buffer[position..], offset + position)?;
            position += read;
            let (hash_code, read) = varint::decode(&buffer[position..], offset + position)?;
            position += read;
            let (digest_size, read) = varint::decode_usize(&buffer[position..], offset + position)?;
            position += read;

            let digest = take(buffer, position, digest_size, offset)?;
            position += digest_size;
            Cid::new_v1(codec, Multihash::wrap(hash_code, digest)?)
        }
    };

    Ok((cid, position))
}

/// Slice `length` bytes of `buffer` starting at `position`, failing instead of
/// returning fewer bytes.
fn take(buffer: &[u8], position: usize, length: usize, offset: usize) -> Result<&[u8], Error> {
    let available = buffer.len() - position;
    if length > available {
        return Err(Error::TruncatedRecordError {
            offset: offset + position,
            expected: length,
            available,
        });
    }
    Ok(&buffer[position..position + length])
}
