mod amount;
mod error;
mod pubkey;
mod script;
mod util;

pub use crate::amount::{compress_amount, decompress_amount, MAX_MONEY};
pub use crate::error::Error;
pub use crate::pubkey::{compress_pubkey, decompress_pubkey, COMPRESSED_PUBLIC_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use crate::script::{compress_script, decompress_script, try_compress_script, MAX_SCRIPT_SIZE};
