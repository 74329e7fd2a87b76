//! PlantUML テキストのエンコード
//!
//! PlantUML サーバは URL 末尾に「raw deflate した UTF-8 を独自 base64 で符号化した文字列」を受け取る。
//! 標準 base64 とはアルファベットが異なり、パディングもしない。

use crate::error::Error;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// 0-9, A-Z, a-z, '-', '_' の順（PlantUML 独自）
const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// PlantUML テキストを URL 用にエンコードする
pub fn encode_text(text: &str) -> Result<String, Error> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .map_err(|e| Error::render(format!("Failed to compress PlantUML text: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| Error::render(format!("Failed to compress PlantUML text: {}", e)))?;
    Ok(encode_bytes(&compressed))
}

/// 3 バイトずつ 4 文字に変換する。端数は 0 で埋める。
pub fn encode_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);
        push_3_bytes(&mut out, b1, b2, b3);
    }
    out
}

fn push_3_bytes(out: &mut String, b1: u8, b2: u8, b3: u8) {
    let c1 = b1 >> 2;
    let c2 = ((b1 & 0x3) << 4) | (b2 >> 4);
    let c3 = ((b2 & 0xF) << 2) | (b3 >> 6);
    let c4 = b3 & 0x3F;
    for c in [c1, c2, c3, c4] {
        out.push(ALPHABET[(c & 0x3F) as usize] as char);
    }
}
