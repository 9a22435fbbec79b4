//! Multi-channel packed file.
//!
//! ```text
//! +--------------------------------+
//! | offset[0] .. offset[n-1]       |  big-endian u32, absolute file positions
//! +--------------------------------+
//! | channel 0 packed bytes         |  starts at offset[0] = 4 * n
//! | channel 1 packed bytes         |
//! | ...                            |
//! +--------------------------------+
//! ```

pub mod reader;
pub mod writer;

pub use reader::read_container;
pub use writer::{offset_table, write_container, ContainerWriter};

/// Size of one offset table entry
pub const OFFSET_ENTRY_SIZE: usize = 4;
