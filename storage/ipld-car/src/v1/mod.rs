mod reader;
mod writer;

use ipld_core::{cid::Cid, ipld::Ipld};
use serde::{Deserialize, Serialize};

pub use crate::v1::{reader::decode, writer::encode};
use crate::Error;

/// CARv1 version, the only one the header may carry.
pub(crate) const CAR_V1_VERSION: u8 = 1;

/// A block as read from a CARv1, its data borrowed from the decoded buffer.
pub type Block<'a> = (Cid, &'a [u8]);

/// Low-level CARv1 header.
///
/// Fields are declared in DAG-CBOR canonical key order (shorter keys first),
/// so the serialized map matches other implementations byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Root [`Cid`](`ipld_core::cid::Cid`)s for the contained data.
    pub roots: Vec<Cid>,

    /// CAR file version.
    ///
    /// It is always 1, as defined in the
    /// [specification](https://ipld.io/specs/transport/car/carv1/#constraints).
    version: u8,
}

impl Header {
    /// Construct a new [`CarV1Header`](`crate::CarV1Header`).
    ///
    /// The version will always be 1, as defined in the
    /// [specification](https://ipld.io/specs/transport/car/carv1/#constraints).
    pub fn new(roots: Vec<Cid>) -> Self {
        Self {
            roots,
            version: CAR_V1_VERSION,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }
}

impl TryFrom<Ipld> for Header {
    type Error = Error;

    /// Validate a decoded header.
    ///
    /// The version is checked before the roots so that a CARv2 pragma
    /// (`{version: 2}`, no roots) is reported as a version mismatch.
    fn try_from(value: Ipld) -> Result<Self, Self::Error> {
        let Ipld::Map(mut fields) = value else {
            return Err(Error::MalformedHeaderError("header is not a map"));
        };

        match fields.get("version") {
            Some(Ipld::Integer(version)) if *version == CAR_V1_VERSION as i128 => {}
            Some(Ipld::Integer(version)) => {
                return Err(Error::UnsupportedCarVersionError {
                    expected: CAR_V1_VERSION,
                    received: Some(*version),
                })
            }
            _ => {
                return Err(Error::UnsupportedCarVersionError {
                    expected: CAR_V1_VERSION,
                    received: None,
                })
            }
        }

        let Some(Ipld::List(raw_roots)) = fields.remove("roots") else {
            return Err(Error::MalformedHeaderError("roots is not a list"));
        };

        let roots = raw_roots
            .into_iter()
            .map(|root| match root {
                Ipld::Link(cid) => Ok(cid),
                _ => Err(Error::MalformedHeaderError("root is not a CID")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(roots))
    }
}
