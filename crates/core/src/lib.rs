//! # xhsign Core
//!
//! リクエスト署名の組み立てと復号を実装する。
//!
//! ## 処理フロー（一次署名）
//! 1. URIからパスを抽出し、コンテンツ文字列へ正規化する
//! 2. コンテンツ文字列のMD5を計算する
//! 3. バイナリペイロードを構築する
//! 4. XOR変換とBase64符号化でエンベロープへ収め、`XYS_`署名を得る
//!
//! ## 処理フロー（二次署名）
//! 1. Cookieと時刻から環境指紋レコードを組み立てる
//! 2. 署名サブセットをRC4とBase64でB1トークンへ変換する
//! 3. B1とそのチェックサムを含むレコードをBase64符号化する
//!
//! 乱数と時刻を引数で受け取る`*_at`系と、スレッドローカル乱数と
//! 現在時刻を使う簡易系の両方を公開する。

pub mod common;
pub mod config;
pub mod content;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod headers;
pub mod payload;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde_json::{Map, Value};
use tracing::debug;

pub use error::SignError;
pub use xhsign_types::{
    CommonEnvelope, FingerprintRecord, ParsedPayload, SignatureEnvelope, SigningSubset,
};

/// 現在時刻（UNIX秒、小数部あり）。
fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// リクエスト署名クライアント。
///
/// 状態を持たない。簡易メソッドは現在時刻とスレッドローカル乱数を
/// 使用し、`*_at`系は両方を呼び出し元から注入する。
#[derive(Debug, Default, Clone, Copy)]
pub struct Signer;

impl Signer {
    pub fn new() -> Self {
        Signer
    }

    /// 一次署名（`x-s`ヘッダ値）を生成する。
    pub fn sign_request(
        &self,
        method: &str,
        uri: &str,
        a1: &str,
        app_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<String, SignError> {
        self.sign_request_at(
            method,
            uri,
            a1,
            app_id,
            payload,
            now_secs(),
            &mut rand::thread_rng(),
        )
    }

    /// 指定時刻・指定乱数で一次署名を生成する。
    ///
    /// `app_id`が空の場合は既定の識別子を使用する。
    pub fn sign_request_at<R: Rng + ?Sized>(
        &self,
        method: &str,
        uri: &str,
        a1: &str,
        app_id: &str,
        payload: &Map<String, Value>,
        timestamp: f64,
        rng: &mut R,
    ) -> Result<String, SignError> {
        let path = content::extract_uri(uri)?;
        let content = content::build_content_string(method, &path, payload)?;
        debug!(%method, %path, content_len = content.len(), "コンテンツ文字列を構築");

        let digest = xhsign_codec::md5_digest(content.as_bytes());
        let app_id = if app_id.is_empty() {
            config::DEFAULT_APP_ID
        } else {
            app_id
        };

        let raw = payload::build_payload(&digest, a1, app_id, content.len(), timestamp, rng);
        let signature = envelope::serialize_signature(&raw)?;
        debug!(signature_len = signature.len(), "一次署名を生成");
        Ok(signature)
    }

    /// 二次署名（`x-s-common`ヘッダ値）を生成する。
    ///
    /// Cookieマップには`a1`が必須。
    pub fn sign_common(&self, cookies: &Map<String, Value>) -> Result<String, SignError> {
        self.sign_common_at(cookies, headers::x_t_at(now_secs()), &mut rand::thread_rng())
    }

    /// 指定時刻・指定乱数で二次署名を生成する。
    pub fn sign_common_at<R: Rng + ?Sized>(
        &self,
        cookies: &Map<String, Value>,
        timestamp_ms: i64,
        rng: &mut R,
    ) -> Result<String, SignError> {
        common::sign_common(cookies, timestamp_ms, rng)
    }

    /// `x-t`ヘッダ値（現在時刻のミリ秒整数）。
    pub fn x_t(&self) -> i64 {
        headers::x_t_at(now_secs())
    }

    /// `x-b3-traceid`ヘッダ値。
    pub fn b3_trace_id(&self) -> String {
        headers::b3_trace_id(&mut rand::thread_rng())
    }

    /// `x-xray-traceid`ヘッダ値（現在時刻、ランダムシーケンス）。
    pub fn xray_trace_id(&self) -> String {
        headers::xray_trace_id(self.x_t(), None, &mut rand::thread_rng())
    }

    /// `a1` Cookie値を現在時刻で生成する。
    pub fn generate_a1(&self) -> String {
        headers::generate_a1_at(self.x_t(), &mut rand::thread_rng())
    }

    /// `webId` Cookie値を生成する。
    pub fn web_id(&self) -> String {
        headers::web_id(&mut rand::thread_rng())
    }

    /// 一次署名文字列を5フィールドレコードへ復号する。
    pub fn decode_signature(&self, signature: &str) -> Result<SignatureEnvelope, SignError> {
        envelope::decode_signature(signature)
    }

    /// x3トークンをペイロードの生バイト列へ復号する。
    pub fn decode_x3(&self, token: &str) -> Result<Vec<u8>, SignError> {
        envelope::decode_x3(token)
    }

    /// 一次署名文字列を構造化ペイロードまで一括復号する。
    pub fn decode_signature_payload(&self, signature: &str) -> Result<ParsedPayload, SignError> {
        envelope::decode_signature_payload(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    const A1: &str = "efda9b010000220000009d04000022000";

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    /// 署名から入力が正確に復元されることを確認（往復の自己検証）
    #[test]
    fn test_sign_request_roundtrip() {
        init_tracing();
        let signer = Signer::new();
        let payload = map(json!({"num": 30}));
        let mut rng = StdRng::seed_from_u64(1);
        let sig = signer
            .sign_request_at(
                "GET",
                "https://edith.xiaohongshu.com/api/sns/web/v1/user_posted?num=30",
                A1,
                "",
                &payload,
                1_700_000_000.0,
                &mut rng,
            )
            .unwrap();

        assert!(sig.starts_with("XYS_"));
        let parsed = signer.decode_signature_payload(&sig).unwrap();
        assert_eq!(parsed.a1, A1);
        assert_eq!(parsed.app_id, "xhs-pc-web");
        // コンテンツ文字列 = "/api/sns/web/v1/user_posted?num=30"（34文字）
        assert_eq!(parsed.content_len, 34);
    }

    /// 空app_id指定時に既定識別子が使われることを確認
    #[test]
    fn test_default_app_id_substitution() {
        let signer = Signer::new();
        let mut rng = StdRng::seed_from_u64(2);
        let sig = signer
            .sign_request_at("GET", "/api/x", A1, "", &Map::new(), 1.7e9, &mut rng)
            .unwrap();
        let parsed = signer.decode_signature_payload(&sig).unwrap();
        assert_eq!(parsed.app_id, config::DEFAULT_APP_ID);

        let mut rng = StdRng::seed_from_u64(2);
        let sig = signer
            .sign_request_at("GET", "/api/x", A1, "custom-app", &Map::new(), 1.7e9, &mut rng)
            .unwrap();
        let parsed = signer.decode_signature_payload(&sig).unwrap();
        assert_eq!(parsed.app_id, "custom-app");
    }

    /// POST署名のコンテンツ長がパス+コンパクトJSONの長さであることを確認
    #[test]
    fn test_sign_request_post_content_len() {
        let signer = Signer::new();
        let payload = map(json!({"note_id": "64ec1234"}));
        let mut rng = StdRng::seed_from_u64(3);
        let sig = signer
            .sign_request_at("POST", "/api/post", A1, "", &payload, 1.7e9, &mut rng)
            .unwrap();
        let parsed = signer.decode_signature_payload(&sig).unwrap();
        let expected = "/api/post".len() + r#"{"note_id":"64ec1234"}"#.len();
        assert_eq!(parsed.content_len, expected as u32);
    }

    /// 不正URIがInvalidUriで拒否されることを確認
    #[test]
    fn test_sign_request_rejects_invalid_uri() {
        let signer = Signer::new();
        let mut rng = StdRng::seed_from_u64(4);
        let err = signer
            .sign_request_at("GET", "https://example.com", A1, "", &Map::new(), 1.7e9, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SignError::InvalidUri(_)));
    }

    /// 簡易メソッド（現在時刻・スレッドローカル乱数）が動作することを確認
    #[test]
    fn test_convenience_methods() {
        let signer = Signer::new();
        let sig = signer
            .sign_request("GET", "/api/x", A1, "", &Map::new())
            .unwrap();
        assert!(sig.starts_with("XYS_"));

        let cookies = map(json!({"a1": A1}));
        let common = signer.sign_common(&cookies).unwrap();
        assert!(!common.is_empty());

        assert!(signer.x_t() > 1_700_000_000_000);
        assert_eq!(signer.b3_trace_id().len(), 16);
        assert_eq!(signer.xray_trace_id().len(), 32);
        assert!(signer.generate_a1().len() <= 52);
        assert_eq!(signer.web_id().len(), 32);
    }
}
