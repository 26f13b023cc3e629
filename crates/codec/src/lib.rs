//! # xhsign 難読化プリミティブ
//!
//! XHS署名プロトコルが要求する符号化・難読化処理を実装する。
//! いずれも外部プロトコルとのビット互換を目的とした難読化であり、
//! 機密性を保証する暗号ではない。
//!
//! ## プリミティブ一覧
//! | 用途 | 方式 |
//! |------|------|
//! | エンベロープ符号化 | 独自アルファベットBase64（`=`パディング） |
//! | ペイロード符号化 | 独自アルファベットBase64（x3用） |
//! | ペイロード難読化 | 固定124バイト鍵のXOR（自己逆変換） |
//! | チェックサム | CRC32 (IEEE) の変種 |
//! | 指紋サブセット暗号化 | RC4ストリーム暗号（固定鍵・nonceなし） |
//! | コンテンツダイジェスト | MD5 |

use base64::alphabet::Alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};
use md5::{Digest, Md5};
use rc4::consts::U12;
use rc4::{KeyInit, Rc4, StreamCipher};

/// 難読化プリミティブのエラー型
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// アルファベット定数の構築エラー（定数の破損、実運用では発生しない）
    #[error("Base64アルファベットの構築に失敗しました: {0}")]
    InvalidAlphabet(String),
    /// 使用中のアルファベットに存在しない文字を検出
    #[error("アルファベット外の文字を検出しました: 0x{byte:02x} (位置 {offset})")]
    UnknownAlphabetCharacter {
        /// 不正な入力バイト
        byte: u8,
        /// 入力文字列内の位置
        offset: usize,
    },
    /// パディング不正・長さ不正等のBase64構造エラー
    #[error("Base64データが不正です: {0}")]
    MalformedBase64(String),
    /// XOR鍵定数の16進デコードエラー（定数の破損、実運用では発生しない）
    #[error("XOR鍵の16進デコードに失敗しました: {0}")]
    InvalidCipherKey(#[from] hex::FromHexError),
}

// ---------------------------------------------------------------------------
// 符号化定数
// ---------------------------------------------------------------------------

/// 標準Base64アルファベット。ワイヤ形式では未使用（独自アルファベットの置換元として記載）。
pub const STANDARD_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// エンベロープ用アルファベット。`XYS_`署名と`x-s-common`署名の外殻に使用する。
pub const ENVELOPE_ALPHABET: &str =
    "ZmserbBoHQtNP+wOcza/LpngG8yJq42KWYj0DSfdikx3VT16IlUAFM97hECvuRX5";

/// x3ペイロード用アルファベット。XOR変換済みバイナリの符号化に使用する。
pub const PAYLOAD_ALPHABET: &str =
    "MfgqrsbcyzPQRStuvC7mn501HIJBo2DEFTKdeNOwxWXYZap89+/A4UVLhijkl63G";

/// XOR鍵（124バイト）。16進定数として一度だけ記載する。
pub const XOR_KEY_HEX: &str = "71a302257793271ddd273bcee3e4b98d9d7935e1da33f5765e2ea8afb6dc77a51a499d23b67c20660025860cbf13d4540d92497f58686c574e508f46e1956344f39139bf4faf22a3eef120b79258145b2feb5193b6478669961298e79bedca646e1a693a926154a5a7a1bd1cf0dedb742f917a747a1e388b234f2277";

/// XOR変換後のペイロード上限（バイト）。鍵長と一致する。
pub const MAX_PAYLOAD_LEN: usize = 124;

/// チェックサム変種の固定XOR定数（CRC32多項式と同値）
pub const CRC_XOR_POLY: u32 = 0xEDB8_8320;

/// RC4ストリーム暗号の固定鍵（B1トークン生成用）
pub const STREAM_CIPHER_KEY: &[u8; 12] = b"xhswebmplfbt";

// ---------------------------------------------------------------------------
// 独自Base64
// ---------------------------------------------------------------------------

/// パディング`=`必須・厳密デコード設定のエンジンを構築する。
fn engine_for(alphabet: &str) -> Result<GeneralPurpose, CodecError> {
    let alphabet =
        Alphabet::new(alphabet).map_err(|e| CodecError::InvalidAlphabet(e.to_string()))?;
    let config = GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical);
    Ok(GeneralPurpose::new(&alphabet, config))
}

fn map_decode_error(e: DecodeError) -> CodecError {
    match e {
        DecodeError::InvalidByte(offset, byte) => {
            CodecError::UnknownAlphabetCharacter { byte, offset }
        }
        other => CodecError::MalformedBase64(other.to_string()),
    }
}

/// エンベロープ用アルファベットでBase64符号化する。
pub fn encode_envelope_b64(data: &[u8]) -> Result<String, CodecError> {
    Ok(engine_for(ENVELOPE_ALPHABET)?.encode(data))
}

/// エンベロープ用アルファベットでBase64復号する。
/// アルファベット外の文字は[`CodecError::UnknownAlphabetCharacter`]で拒否する。
pub fn decode_envelope_b64(data: &str) -> Result<Vec<u8>, CodecError> {
    engine_for(ENVELOPE_ALPHABET)?
        .decode(data)
        .map_err(map_decode_error)
}

/// x3ペイロード用アルファベットでBase64符号化する。
pub fn encode_payload_b64(data: &[u8]) -> Result<String, CodecError> {
    Ok(engine_for(PAYLOAD_ALPHABET)?.encode(data))
}

/// x3ペイロード用アルファベットでBase64復号する。
pub fn decode_payload_b64(data: &str) -> Result<Vec<u8>, CodecError> {
    engine_for(PAYLOAD_ALPHABET)?
        .decode(data)
        .map_err(map_decode_error)
}

// ---------------------------------------------------------------------------
// XORサイファ
// ---------------------------------------------------------------------------

/// 固定鍵によるバイト単位XOR変換。符号化と復号は同一操作（自己逆変換）。
///
/// 鍵長（124バイト）を超える位置のバイトは変換せずに通過させ、
/// 変換後は[`MAX_PAYLOAD_LEN`]バイトに切り詰める。ビルダが既定の
/// レイアウトを出力する限り切り詰めは末尾1バイトのみに作用する。
pub fn xor_transform(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let key = hex::decode(XOR_KEY_HEX)?;
    let mut out: Vec<u8> = data
        .iter()
        .enumerate()
        .map(|(i, &b)| if i < key.len() { b ^ key[i] } else { b })
        .collect();
    out.truncate(MAX_PAYLOAD_LEN);
    Ok(out)
}

// ---------------------------------------------------------------------------
// CRC32変種
// ---------------------------------------------------------------------------

/// 標準CRC32 (IEEE)。a1 Cookie値の末尾チェックサム等に使用する。
pub fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC32変種チェックサム。
///
/// 標準CRC32 (IEEE) をビット反転し、多項式定数とXORした結果を
/// 符号付き32bit整数として解釈する。外部プロトコルの実装を
/// そのまま再現したもので、汎用の完全性検査には使用しない。
pub fn crc32_variant(data: &[u8]) -> i32 {
    let c = crc32fast::hash(data);
    (!c ^ CRC_XOR_POLY) as i32
}

// ---------------------------------------------------------------------------
// RC4ストリーム暗号
// ---------------------------------------------------------------------------

/// RC4で暗号化する。鍵とplaintextが同じなら常に同じciphertextになる
/// （nonceなし・決定的）。XORキーストリームのため2回適用で元に戻る。
pub fn rc4_apply(key: &[u8; 12], data: &[u8]) -> Vec<u8> {
    let mut cipher: Rc4<U12> = Rc4::new(key.into());
    let mut buf = data.to_vec();
    cipher.apply_keystream(&mut buf);
    buf
}

// ---------------------------------------------------------------------------
// MD5
// ---------------------------------------------------------------------------

/// MD5ダイジェスト（16バイト）を計算する。
pub fn md5_digest(data: &[u8]) -> [u8; 16] {
    let digest = Md5::digest(data);
    digest.into()
}

/// MD5ダイジェストの小文字16進表現（32文字）を返す。
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5_digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 空入力のCRC32変種が既知の値（!0 ^ 多項式）になることを確認
    #[test]
    fn test_crc32_variant_empty() {
        assert_eq!(crc32_variant(b""), (!0u32 ^ CRC_XOR_POLY) as i32);
    }

    /// CRC32変種が符号付きで負値も返すことを確認
    #[test]
    fn test_crc32_variant_signedness() {
        // 標準CRC32("123456789") = 0xCBF43926
        // !0xCBF43926 ^ 0xEDB88320 = 0xD9B345F9 → 負の符号付き値
        let v = crc32_variant(b"123456789");
        assert_eq!(v, 0xD9B3_45F9u32 as i32);
        assert!(v < 0);
    }

    /// XOR変換が自己逆変換であることを確認（124バイト以内）
    #[test]
    fn test_xor_transform_involution() {
        let data: Vec<u8> = (0u8..124).collect();
        let once = xor_transform(&data).unwrap();
        let twice = xor_transform(&once).unwrap();
        assert_eq!(twice, data);
        assert_ne!(once, data);
    }

    /// 鍵長超過分の通過と124バイトへの切り詰めを確認
    #[test]
    fn test_xor_transform_truncates_to_key_length() {
        let data = vec![0u8; 125];
        let out = xor_transform(&data).unwrap();
        assert_eq!(out.len(), MAX_PAYLOAD_LEN);
        // 0とのXORなので鍵そのものが現れる
        let key = hex::decode(XOR_KEY_HEX).unwrap();
        assert_eq!(out, key);
    }

    /// XOR鍵が正確に124バイトであることを確認
    #[test]
    fn test_xor_key_length() {
        assert_eq!(hex::decode(XOR_KEY_HEX).unwrap().len(), MAX_PAYLOAD_LEN);
    }

    /// 両アルファベットでエンコード・デコードが往復することを確認
    #[test]
    fn test_custom_base64_roundtrip() {
        let data = b"\x00\x01\xfe\xffxhsign";
        let env = encode_envelope_b64(data).unwrap();
        assert_eq!(decode_envelope_b64(&env).unwrap(), data);
        let pay = encode_payload_b64(data).unwrap();
        assert_eq!(decode_payload_b64(&pay).unwrap(), data);
        // アルファベットが異なるため符号化結果も異なる
        assert_ne!(env, pay);
    }

    /// アルファベット外の文字が黙殺されずに拒否されることを確認
    #[test]
    fn test_decode_rejects_foreign_character() {
        // '-' はどちらのアルファベットにも含まれない
        let err = decode_envelope_b64("ZZ-Z").unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownAlphabetCharacter { byte: b'-', offset: 2 }
        ));
        let err = decode_payload_b64("MM-M").unwrap_err();
        assert!(matches!(err, CodecError::UnknownAlphabetCharacter { .. }));
    }

    /// 独自アルファベットの定義が64文字・重複なしであることを確認
    #[test]
    fn test_alphabet_definitions() {
        for alphabet in [STANDARD_ALPHABET, ENVELOPE_ALPHABET, PAYLOAD_ALPHABET] {
            assert_eq!(alphabet.len(), 64);
            let mut chars: Vec<char> = alphabet.chars().collect();
            chars.sort_unstable();
            chars.dedup();
            assert_eq!(chars.len(), 64);
        }
    }

    /// RC4が決定的で、2回適用で元に戻ることを確認
    #[test]
    fn test_rc4_deterministic_involution() {
        let plaintext = br#"{"x33":"0","x39":0}"#;
        let c1 = rc4_apply(STREAM_CIPHER_KEY, plaintext);
        let c2 = rc4_apply(STREAM_CIPHER_KEY, plaintext);
        assert_eq!(c1, c2);
        assert_ne!(c1.as_slice(), plaintext.as_slice());
        assert_eq!(rc4_apply(STREAM_CIPHER_KEY, &c1), plaintext);
    }

    /// MD5の既知ベクトルを確認
    #[test]
    fn test_md5_known_vector() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
