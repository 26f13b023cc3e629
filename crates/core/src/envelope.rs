//! # 署名エンベロープのシリアライズ・復号
//!
//! XOR変換済みペイロードを`mns0301_`トークンへ符号化し、5フィールドの
//! 構造化レコードに収めて`XYS_`プレフィックス付きの署名文字列へ変換する。
//! 復号側は各ステップを正確に逆順で適用する。

use xhsign_codec::{
    decode_envelope_b64, decode_payload_b64, encode_envelope_b64, encode_payload_b64,
    xor_transform,
};
use xhsign_types::{ParsedPayload, SignatureEnvelope};

use crate::config;
use crate::error::SignError;
use crate::payload::parse_payload;

/// ビルド済みペイロードから一次署名文字列を組み立てる。
///
/// XOR変換（124バイトへ切り詰め）→ x3アルファベットでBase64 →
/// `mns0301_`付与 → 5フィールドレコードをコンパクトJSON化 →
/// エンベロープアルファベットでBase64 → `XYS_`付与。
pub fn serialize_signature(payload: &[u8]) -> Result<String, SignError> {
    let obfuscated = xor_transform(payload)?;
    let token = format!("{}{}", config::X3_PREFIX, encode_payload_b64(&obfuscated)?);

    let envelope = SignatureEnvelope {
        x0: config::PROTOCOL_VERSION.to_string(),
        x1: config::CLIENT_ID.to_string(),
        x2: config::PLATFORM.to_string(),
        x3: token,
        x4: String::new(),
    };
    let json = serde_json::to_string(&envelope)?;

    Ok(format!(
        "{}{}",
        config::XYS_PREFIX,
        encode_envelope_b64(json.as_bytes())?
    ))
}

/// 署名文字列を5フィールドレコードへ復号する。
///
/// レコードが解析できない場合は[`SignError::MalformedEnvelope`]。
pub fn decode_signature(signature: &str) -> Result<SignatureEnvelope, SignError> {
    let body = signature
        .strip_prefix(config::XYS_PREFIX)
        .unwrap_or(signature);
    let json_bytes = decode_envelope_b64(body)?;
    serde_json::from_slice(&json_bytes).map_err(|e| SignError::MalformedEnvelope(e.to_string()))
}

/// x3トークンを復号してペイロードの生バイト列を返す。
///
/// XORは自己逆変換のため符号化時と同じ変換を適用する。
pub fn decode_x3(token: &str) -> Result<Vec<u8>, SignError> {
    let body = token.strip_prefix(config::X3_PREFIX).unwrap_or(token);
    let decoded = decode_payload_b64(body)?;
    Ok(xor_transform(&decoded)?)
}

/// 署名文字列を一括で構造化ペイロードまで復号する（検証・自己テスト用）。
pub fn decode_signature_payload(signature: &str) -> Result<ParsedPayload, SignError> {
    let envelope = decode_signature(signature)?;
    let raw = decode_x3(&envelope.x3)?;
    parse_payload(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::payload::build_payload;

    fn signature_fixture(a1: &str, content: &str, seed: u64) -> String {
        let digest = xhsign_codec::md5_digest(content.as_bytes());
        let mut rng = StdRng::seed_from_u64(seed);
        let payload = build_payload(
            &digest,
            a1,
            "xhs-pc-web",
            content.len(),
            1_700_000_000.0,
            &mut rng,
        );
        serialize_signature(&payload).unwrap()
    }

    /// 署名がXYS_で始まり、x3がmns0301_で始まることを確認
    #[test]
    fn test_signature_prefixes() {
        let sig = signature_fixture("a1value", "/api/x?num=30", 1);
        assert!(sig.starts_with("XYS_"));
        let envelope = decode_signature(&sig).unwrap();
        assert!(envelope.x3.starts_with("mns0301_"));
        assert_eq!(envelope.x0, "4.2.6");
        assert_eq!(envelope.x1, "xhs-pc-web");
        assert_eq!(envelope.x2, "Windows");
        assert_eq!(envelope.x4, "");
    }

    /// 符号化時に渡したa1とコンテンツ長が復号で正確に戻ることを確認
    #[test]
    fn test_roundtrip_recovers_inputs() {
        let content = "/api/sns/web/v1/user_posted?num=30";
        let a1 = "efda9b010000220000009d04000022000";
        let sig = signature_fixture(a1, content, 7);

        let parsed = decode_signature_payload(&sig).unwrap();
        assert_eq!(parsed.a1, a1);
        assert_eq!(parsed.content_len, content.len() as u32);
        assert_eq!(parsed.app_id, "xhs-pc-web");
        let digest = xhsign_codec::md5_digest(content.as_bytes());
        assert_eq!(parsed.md5_fragment_hex, hex::encode(&digest[..8]));
    }

    /// x3復号結果が正確に124バイトであることを確認
    #[test]
    fn test_decoded_payload_is_124_bytes() {
        let sig = signature_fixture("a1", "/api/x", 2);
        let envelope = decode_signature(&sig).unwrap();
        let raw = decode_x3(&envelope.x3).unwrap();
        assert_eq!(raw.len(), 124);
    }

    /// 乱数と時刻を固定すれば署名全体が再現されることを確認
    #[test]
    fn test_signature_deterministic() {
        let a = signature_fixture("a1", "/api/x", 42);
        let b = signature_fixture("a1", "/api/x", 42);
        assert_eq!(a, b);
    }

    /// レコード解析不能な入力がMalformedEnvelopeで拒否されることを確認
    #[test]
    fn test_decode_rejects_malformed_record() {
        // 正しいアルファベットだがJSONレコードではないデータ
        let bogus = xhsign_codec::encode_envelope_b64(b"not a record").unwrap();
        let err = decode_signature(&format!("XYS_{bogus}")).unwrap_err();
        assert!(matches!(err, SignError::MalformedEnvelope(_)));
    }

    /// x3フィールドを欠いたレコードがMalformedEnvelopeになることを確認
    #[test]
    fn test_decode_rejects_missing_payload_field() {
        let bogus =
            xhsign_codec::encode_envelope_b64(br#"{"x0":"4.2.6","x1":"xhs-pc-web"}"#).unwrap();
        let err = decode_signature(&format!("XYS_{bogus}")).unwrap_err();
        assert!(matches!(err, SignError::MalformedEnvelope(_)));
    }

    /// アルファベット外文字を含む署名が拒否されることを確認
    #[test]
    fn test_decode_rejects_foreign_alphabet_character() {
        let err = decode_signature("XYS_ZZZZ-ZZZ").unwrap_err();
        assert!(matches!(
            err,
            SignError::Codec(xhsign_codec::CodecError::UnknownAlphabetCharacter { .. })
        ));
    }
}
