pub mod block;
pub mod container;
pub mod encoding;

pub use block::{Block, ValidationError, HASH_LEN};
pub use container::{
    decode, encode, ArgumentError, FormatError, TABLE_FORMAT_COMPACT, TABLE_FORMAT_EXTENDED,
};
pub use encoding::EncodingMode;
