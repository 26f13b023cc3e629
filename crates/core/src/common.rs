//! # 二次署名 (x-s-common)
//!
//! 環境指紋レコードの18キーサブセットをRC4で暗号化し、パーセント
//! エンコード→独自再解釈→Base64の順に変換してB1トークンを得る。
//! B1とそのチェックサムを14フィールドのレコードへ収め、エンベロープ
//! アルファベットで符号化する（一次署名と違い外側プレフィックスなし）。

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use serde_json::{Map, Value};

use xhsign_codec::{crc32_variant, encode_envelope_b64, rc4_apply, STREAM_CIPHER_KEY};
use xhsign_types::{CommonEnvelope, SigningSubset};

use crate::config;
use crate::content::value_text;
use crate::error::SignError;
use crate::fingerprint;

/// B1トークン生成時のパーセントエンコード集合。
/// 英数字・`.`に加えて `!*'()~_-` を安全文字として通過させる。
const B1_QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'~')
    .remove(b'_')
    .remove(b'-');

/// パーセントエンコード済みテキストをバイト列へ再解釈する。
///
/// `%`で分割し、各セグメントの先頭2文字を16進バイトとして復号、
/// 残りの文字はそのままバイト値として連結する。2文字未満の
/// セグメントは丸ごと読み飛ばし、最初の`%`より前の文字も捨てる。
///
/// これはエンコードの逆操作ではなく、意図的にバイト列を変化させる
/// 上流プロトコルの挙動の忠実な再現。対称な復号に「修正」しては
/// ならない（正しさはビット互換で定義される）。
fn requote_bytes(encoded: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut segments = encoded.split('%');
    segments.next();
    for segment in segments {
        if segment.len() < 2 {
            continue;
        }
        if let Ok(value) = u8::from_str_radix(&segment[..2], 16) {
            bytes.push(value);
        }
        bytes.extend_from_slice(&segment.as_bytes()[2..]);
    }
    bytes
}

/// 指紋サブセットからB1トークンを生成する。
///
/// コンパクトJSON → RC4（固定鍵・nonceなし） → パーセントエンコード →
/// 再解釈 → エンベロープアルファベットでBase64。
pub fn generate_b1(subset: &SigningSubset) -> Result<String, SignError> {
    let json = serde_json::to_string(subset)?;
    let ciphertext = rc4_apply(STREAM_CIPHER_KEY, json.as_bytes());
    let quoted = percent_encode(&ciphertext, B1_QUOTE_SET).to_string();
    let reinterpreted = requote_bytes(&quoted);
    Ok(encode_envelope_b64(&reinterpreted)?)
}

/// 二次署名を生成する。
///
/// Cookieマップには`a1`が必須（[`SignError::MissingCookie`]）。
/// `timestamp_ms`は指紋の収集時刻として`x44`に入る。
pub fn sign_common<R: Rng + ?Sized>(
    cookies: &Map<String, Value>,
    timestamp_ms: i64,
    rng: &mut R,
) -> Result<String, SignError> {
    let a1 = cookies
        .get("a1")
        .map(value_text)
        .ok_or(SignError::MissingCookie("a1"))?;

    let record = fingerprint::assemble(cookies, config::PUBLIC_USER_AGENT, timestamp_ms, rng);
    let subset = SigningSubset::from_record(&record);
    let b1 = generate_b1(&subset)?;
    let checksum = crc32_variant(b1.as_bytes());

    let envelope = CommonEnvelope {
        s0: 5,
        s1: String::new(),
        x0: "1".to_string(),
        x1: config::PROTOCOL_VERSION.to_string(),
        x2: config::PLATFORM.to_string(),
        x3: config::CLIENT_ID.to_string(),
        x4: config::CLIENT_BUILD.to_string(),
        x5: a1,
        x6: String::new(),
        x7: String::new(),
        x8: b1,
        x9: checksum,
        x10: 0,
        x11: config::DEFAULT_MODE.to_string(),
    };
    let json = serde_json::to_string(&envelope)?;
    Ok(encode_envelope_b64(json.as_bytes())?)
}
