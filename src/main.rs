use compressed_txout::{compress_amount, compress_script, decompress_amount, decompress_pubkey, decompress_script, Error, COMPRESSED_PUBLIC_KEY_SIZE};
use bitcoin::ScriptBuf;
use std::env;

fn main() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();

    let mut parameters = vec![];

    for arg in &args[1..args.len()] {
        if arg.len() >= 2 && &arg[0..2] == "--" {
            return Err(Error::UnknownArgument(arg.to_string()));
        }
        parameters.push(arg);
    }

    if parameters.len() != 2 { return Err(Error::HelpMessage()); }

    match parameters[0].as_str() {
        "compressamount" => {
            let amount: u64 = parameters[1].parse().or(Err(Error::InvalidAmount(parameters[1].to_string())))?;
            println!("{}", compress_amount(amount));
            Ok(())
        },
        "decompressamount" => {
            let code: u64 = parameters[1].parse().or(Err(Error::InvalidAmount(parameters[1].to_string())))?;
            println!("{}", decompress_amount(code));
            Ok(())
        },
        "compressscript" => {
            let script_bytes: Vec<u8> = hex::decode(parameters[1]).or(Err(Error::InvalidHex(parameters[1].to_string())))?;
            let script: ScriptBuf = ScriptBuf::from_bytes(script_bytes);
            let mut stream: Vec<u8> = vec![];
            _ = compress_script(&mut stream, &script)?;
            println!("{}", hex::encode(stream));
            Ok(())
        },
        "decompressscript" => {
            let stream: Vec<u8> = hex::decode(parameters[1]).or(Err(Error::InvalidHex(parameters[1].to_string())))?;
            let script: ScriptBuf = decompress_script(&mut stream.as_slice())?;
            println!("{}", hex::encode(script.as_bytes()));
            Ok(())
        },
        "decompresspubkey" => {
            let key_bytes: Vec<u8> = hex::decode(parameters[1]).or(Err(Error::InvalidHex(parameters[1].to_string())))?;
            if key_bytes.len() != COMPRESSED_PUBLIC_KEY_SIZE || !(key_bytes[0] == 0x02 || key_bytes[0] == 0x03) {
                return Err(Error::InvalidHex(parameters[1].to_string()));
            }
            let mut compressed = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
            compressed.copy_from_slice(&key_bytes);
            println!("{}", hex::encode(decompress_pubkey(&compressed)?));
            Ok(())
        },
        m => Err(Error::UnknownMethod(m.to_string()))
    }
}
