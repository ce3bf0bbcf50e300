use std::io;
use bitcoin::consensus::{Encodable, Decodable};
use bitcoin::opcodes::all::{OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_PUSHBYTES_20, OP_PUSHBYTES_33, OP_PUSHBYTES_65};
use bitcoin::{Script, ScriptBuf};
use crate::error::Error;
use crate::pubkey::{compress_pubkey, decompress_pubkey, COMPRESSED_PUBLIC_KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::util::{decode_varint, encode_varint};

/// Hard cap on the declared length of a passthrough script.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Tags 0-5 encode recognized templates; passthrough sizes start above them.
const SPECIAL_SCRIPTS: u64 = 6;

/// Compress a script into its 1 byte tag plus hash/point payload, or `None`
/// when it matches no template. P2PK scripts whose uncompressed key is not a
/// curve point are not compressible either, since the key could never be
/// reconstructed from its x-coordinate.
pub fn try_compress_script(script: &Script) -> Option<Vec<u8>> {
    let bytes = script.as_bytes();
    if script.is_p2pkh() {
        let mut out = Vec::with_capacity(21);
        out.push(0x00);
        out.extend_from_slice(&bytes[3..23]);
        return Some(out);
    }
    if script.is_p2sh() {
        let mut out = Vec::with_capacity(21);
        out.push(0x01);
        out.extend_from_slice(&bytes[2..22]);
        return Some(out);
    }
    if script.is_p2pk() {
        if bytes.len() == COMPRESSED_PUBLIC_KEY_SIZE + 2 && (bytes[1] == 0x02 || bytes[1] == 0x03) {
            let mut out = Vec::with_capacity(33);
            out.push(bytes[1]);
            out.extend_from_slice(&bytes[2..34]);
            return Some(out);
        }
        if bytes.len() == PUBLIC_KEY_SIZE + 2 && bytes[1] == 0x04 {
            let mut key = [0u8; PUBLIC_KEY_SIZE];
            key.copy_from_slice(&bytes[1..66]);
            let compressed = compress_pubkey(&key).ok()?;
            let mut out = Vec::with_capacity(33);
            out.push(0x04 | (compressed[0] & 1));
            out.extend_from_slice(&compressed[1..]);
            return Some(out);
        }
    }
    None
}

/// Serialize a script in its compact form: the template payload when one
/// matches, otherwise `VARINT(len + 6)` followed by the raw bytes.
pub fn compress_script<W: io::Write + ?Sized>(w: &mut W, script: &Script) -> Result<usize, io::Error> {
    if let Some(compressed) = try_compress_script(script) {
        let mut len: usize = 0;
        for c in &compressed {
            len += c.consensus_encode(w)?;
        }
        return Ok(len);
    }
    let mut len = encode_varint(w, script.len() as u64 + SPECIAL_SCRIPTS)?;
    for c in script.as_bytes() {
        len += c.consensus_encode(w)?;
    }
    Ok(len)
}

/// Read one compact script from the stream and reconstruct the canonical
/// script bytes. A declared passthrough length over [`MAX_SCRIPT_SIZE`] is
/// refused before any buffer is allocated.
pub fn decompress_script<R: io::Read + ?Sized>(r: &mut R) -> Result<ScriptBuf, Error> {
    let tag = decode_varint(r)?;
    match tag {
        0x00 => {
            let mut script = Vec::with_capacity(25);
            script.push(OP_DUP.to_u8());
            script.push(OP_HASH160.to_u8());
            script.push(OP_PUSHBYTES_20.to_u8());
            for _ in 0..20 {
                script.push(u8::consensus_decode(r)?);
            }
            script.push(OP_EQUALVERIFY.to_u8());
            script.push(OP_CHECKSIG.to_u8());
            Ok(ScriptBuf::from_bytes(script))
        }
        0x01 => {
            let mut script = Vec::with_capacity(23);
            script.push(OP_HASH160.to_u8());
            script.push(OP_PUSHBYTES_20.to_u8());
            for _ in 0..20 {
                script.push(u8::consensus_decode(r)?);
            }
            script.push(OP_EQUAL.to_u8());
            Ok(ScriptBuf::from_bytes(script))
        }
        0x02 | 0x03 => {
            let mut script = Vec::with_capacity(35);
            script.push(OP_PUSHBYTES_33.to_u8());
            script.push(tag as u8);
            for _ in 0..32 {
                script.push(u8::consensus_decode(r)?);
            }
            script.push(OP_CHECKSIG.to_u8());
            Ok(ScriptBuf::from_bytes(script))
        }
        0x04 | 0x05 => {
            let mut compressed = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
            compressed[0] = tag as u8 - 2;
            for byte in compressed[1..].iter_mut() {
                *byte = u8::consensus_decode(r)?;
            }
            let pubkey = decompress_pubkey(&compressed)?;
            let mut script = Vec::with_capacity(67);
            script.push(OP_PUSHBYTES_65.to_u8());
            script.extend_from_slice(&pubkey);
            script.push(OP_CHECKSIG.to_u8());
            Ok(ScriptBuf::from_bytes(script))
        }
        tag => {
            let size = tag - SPECIAL_SCRIPTS;
            if size > MAX_SCRIPT_SIZE as u64 {
                return Err(Error::OversizedScript(size));
            }
            let mut script = Vec::with_capacity(size as usize);
            for _ in 0..size {
                script.push(u8::consensus_decode(r)?);
            }
            Ok(ScriptBuf::from_bytes(script))
        }
    }
}
