use std::io::{self, Read};

use flate2::{
    bufread::{DeflateEncoder, GzEncoder, ZlibEncoder},
    Compression,
};
use strum_macros::{Display, EnumString};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ContentEncoding {
    Gzip,
    Deflate,
    Compress,
    Identity,
}

impl ContentEncoding {
    /// First supported token in header order; unknown tokens are skipped.
    pub fn select(accept_encoding: &[String]) -> Option<Self> {
        accept_encoding
            .iter()
            .find_map(|token| token.parse::<ContentEncoding>().ok())
    }

    /// `None` for identity, which leaves the body untouched.
    pub fn encode(self, body: &[u8]) -> io::Result<Option<Vec<u8>>> {
        let mut buffer = vec![];
        match self {
            Self::Gzip => GzEncoder::new(body, Compression::fast()).read_to_end(&mut buffer)?,
            Self::Deflate => {
                DeflateEncoder::new(body, Compression::fast()).read_to_end(&mut buffer)?
            }
            Self::Compress => ZlibEncoder::new(body, Compression::fast()).read_to_end(&mut buffer)?,
            Self::Identity => return Ok(None),
        };
        Ok(Some(buffer))
    }
}
