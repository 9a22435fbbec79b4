//! Byte format for one packed channel.
//!
//! The stream is a sequence of headers. A count header with bit 7 set
//! introduces a literal run and is followed by the raw bytes; with bit 7
//! clear it introduces a match and is followed by an offset header.
//!
//! ```text
//! count   0xxxxxxx / 1xxxxxxx        x != 0: count = x
//!         00000000 / 10000000 hi lo  count = hi << 8 | lo
//! offset  oooooooo                   o != 0: offset = o
//!         00000000 hi lo             offset = hi << 8 | lo
//! ```

pub mod decoder;
pub mod encoder;
pub mod reader;
pub mod writer;

pub use decoder::{decode, decode_into};
pub use encoder::encode;
pub use reader::ByteReader;
pub use writer::{ByteWriter, LITERAL_FLAG, MATCH_FLAG, MAX_EXTENDED};
