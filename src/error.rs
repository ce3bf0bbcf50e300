#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Help Message")]
    HelpMessage(),

    #[error("Argument is not valid (see --help):\n{}", .0)]
    UnknownArgument(String),
    #[error("Unknown method  (see --help):\n{}", .0)]
    UnknownMethod(String),
    #[error("Hex is not a valid hex encoded value:\n{}", .0)]
    InvalidHex(String),
    #[error("Amount is not a valid integer number of satoshis:\n{}", .0)]
    InvalidAmount(String),

    #[error("Script of declared size {} exceeds the 10000 byte maximum.", .0)]
    OversizedScript(u64),
    #[error("Public key x-coordinate has no matching point on the secp256k1 curve.")]
    NotOnCurve(),

    #[error("Bitcoin Core Decode Error:\n{}", .0)]
    BitcoinConensus(#[from] bitcoin::consensus::encode::Error),
    #[error("IO Error:\n{}", .0)]
    Io(#[from] std::io::Error),
}
