//! Multicodec utilities, such as the list of codes,
//! as per the [code table](https://github.com/multiformats/multicodec/blob/c954a787dc6a17d099653e5f90d26fbd177d2074/table.csv).
pub const SHA_256_CODE: u64 = 0x12;
pub const SHA_512_CODE: u64 = 0x13;
pub const RAW_CODE: u64 = 0x55;
pub const DAG_PB_CODE: u64 = 0x70;
pub const DAG_CBOR_CODE: u64 = 0x71;

/// Leading byte of a binary CIDv1.
pub const CID_V1_MARKER: u64 = 0x01;

/// Digest length of a sha2-256 multihash, the only hash a CIDv0 may carry.
pub const SHA_256_DIGEST_SIZE: usize = 32;
