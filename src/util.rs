use std::io;
use bitcoin::consensus::{Encodable, ReadExt, encode};

pub fn encode_varint<W: io::Write + ?Sized>(w: &mut W, val: u64) -> Result<usize, io::Error> {
    let mut tmp = [0u8; 10];
    let mut len: usize = 0;
    let mut n: u64 = val;
    loop {
        tmp[len] = (n & 0x7F) as u8 | if len > 0 { 0x80 } else { 0x00 };
        len += 1;
        if n <= 0x7F { break; }
        n = (n >> 7) - 1;
    }

    for i in (0..len).rev() {
        tmp[i].consensus_encode(w)?;
    }
    Ok(len)
}

pub fn decode_varint<R: io::Read + ?Sized>(r: &mut R) -> Result<u64, encode::Error> {
    let mut n: u64 = 0;
    loop {
        let data: u8 = r.read_u8()?;
        if n > u64::MAX >> 7 {
            return Err(encode::Error::ParseFailed("ReadVarInt(): size too large"));
        }
        n = (n << 7) | (data & 0x7F) as u64;
        if (data & 0x80) > 0 {
            if n == u64::MAX {
                return Err(encode::Error::ParseFailed("ReadVarInt(): size too large"));
            }
            n += 1;
        } else {
            return Ok(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(val: u64) -> Vec<u8> {
        let mut stream: Vec<u8> = vec![];
        let len = encode_varint(&mut stream, val).unwrap();
        assert_eq!(len, stream.len());
        stream
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0x00), vec![0x00]);
        assert_eq!(encode(0x7F), vec![0x7F]);
        assert_eq!(encode(0x80), vec![0x80, 0x00]);
        assert_eq!(encode(0xFF), vec![0x80, 0x7F]);
        assert_eq!(encode(0x407F), vec![0xFF, 0x7F]);
        assert_eq!(encode(0x4080), vec![0x80, 0x80, 0x00]);
    }

    #[test]
    fn round_trip() {
        for val in [0, 1, 0x7F, 0x80, 10006, 0xFFFF, 0x12345678, u64::MAX - 1, u64::MAX] {
            let stream = encode(val);
            assert_eq!(decode_varint(&mut stream.as_slice()).unwrap(), val);
        }
    }

    #[test]
    fn rejects_overlong_encoding() {
        // eleven continuation bytes push past the u64 range
        let stream = [0xFFu8; 11];
        assert!(decode_varint(&mut stream.as_slice()).is_err());
    }

    #[test]
    fn rejects_truncated_stream() {
        let stream = [0x80u8];
        assert!(decode_varint(&mut stream.as_slice()).is_err());
    }
}
