use compressed_txout::{compress_amount, compress_script, decompress_amount, decompress_pubkey, decompress_script, try_compress_script, MAX_MONEY, MAX_SCRIPT_SIZE};
use bitcoin::consensus::{Decodable, encode};
use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, PublicKey, ScriptBuf, ScriptHash};
use secp256k1::{Secp256k1, SecretKey, All};
use honggfuzz::fuzz;
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bitcoin Core Consensus Error:\n{}", .0)]
    BitcoinConsensus(#[from] bitcoin::consensus::encode::Error),
    #[error("Bitcoin Hashes FromSlice Error:\n{}", .0)]
    FromSlice(#[from] bitcoin::hashes::FromSliceError),
    #[error("Bitcoin Key Error:\n{}", .0)]
    BitcoinKey(#[from] bitcoin::key::Error),
    #[error("Compressed Txout Error:\n{}", .0)]
    CompressedTxout(#[from] compressed_txout::Error),
    #[error("IO Error:\n{}", .0)]
    Io(#[from] std::io::Error),
}

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let mut copy = data;
            match do_test(&mut copy) {
                Ok(()) => (),
                Err(Error::BitcoinConsensus(encode::Error::Io(err))) if err.kind() == io::ErrorKind::UnexpectedEof => return,
                Err(err) => { panic!("{:?}", err); }
            }
        });
    }
}

fn get_script<R: io::Read + ?Sized>(r: &mut R, script_type: u8, ctx: &Secp256k1<All>) -> Result<Option<ScriptBuf>, Error> {
    let payload = <[u8; 32]>::consensus_decode(r)?;
    Ok(match script_type {
        0 => Some(ScriptBuf::new_p2pkh(&PubkeyHash::from_slice(&payload[..20])?)),
        1 => Some(ScriptBuf::new_p2sh(&ScriptHash::from_slice(&payload[..20])?)),
        2 | 3 => SecretKey::from_slice(&payload).ok()
            .map(|sk| ScriptBuf::new_p2pk(&PublicKey::new(sk.public_key(ctx)))),
        4 | 5 => SecretKey::from_slice(&payload).ok()
            .map(|sk| ScriptBuf::new_p2pk(&PublicKey::new_uncompressed(sk.public_key(ctx)))),
        _ => {
            let size = (u8::consensus_decode(r)? as usize) % 64;
            let mut raw: Vec<u8> = Vec::with_capacity(size);
            for _ in 0..size {
                raw.push(u8::consensus_decode(r)?);
            }
            Some(ScriptBuf::from_bytes(raw))
        }
    })
}

fn do_test<R: io::Read + ?Sized>(r: &mut R) -> Result<(), Error> {
    let ctx = Secp256k1::<All>::new();

    let amount = u64::consensus_decode(r)? % (MAX_MONEY + 1);
    assert_eq!(decompress_amount(compress_amount(amount)), amount);
    // arbitrary codes must decode without aborting, even out of range
    _ = decompress_amount(u64::consensus_decode(r)?);

    let script_type = u8::consensus_decode(r)? % 8;
    if let Some(script) = get_script(r, script_type, &ctx)? {
        let mut stream: Vec<u8> = vec![];
        let len = compress_script(&mut stream, &script)?;
        assert_eq!(len, stream.len());
        if let Some(compressed) = try_compress_script(&script) {
            assert_eq!(stream, compressed);
        }
        assert_eq!(decompress_script(&mut stream.as_slice())?, script);
    }

    if let Ok(sk) = SecretKey::from_slice(&<[u8; 32]>::consensus_decode(r)?) {
        let pk = sk.public_key(&ctx);
        assert_eq!(decompress_pubkey(&pk.serialize())?, pk.serialize_uncompressed());
    }

    // arbitrary tails must never panic or allocate past the script cap
    if let Ok(script) = decompress_script(r) {
        assert!(script.len() <= MAX_SCRIPT_SIZE);
    }

    Ok(())
}
