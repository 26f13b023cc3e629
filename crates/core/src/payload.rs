//! # バイナリペイロードのビルド・解析
//!
//! 一次署名のx3フィールドに埋め込む固定レイアウトのバイナリレコードを
//! 構築・復元する。ビルダはフィールドを隙間なく順に出力し、合計125バイト
//! になる（XOR変換後に124バイトへ切り詰められ、末尾1バイトが落ちる）。
//!
//! ## レイアウト
//! | オフセット | 幅 | フィールド |
//! |---|---|---|
//! |0|4|バージョンマーカー|
//! |4|4|ランダム32bitシード（LE）|
//! |8|8|環境指紋A（チェックサムマーク + XOR難読化）|
//! |16|8|環境指紋B（時刻 − ランダムオフセット、無加工）|
//! |24|4|シーケンス値（LE）|
//! |28|4|windowプロパティ数（LE）|
//! |32|4|コンテンツ文字列長（LE）|
//! |36|8|MD5先頭8バイト（シード下位バイトとXOR）|
//! |44|1|定数52（次フィールド長）|
//! |45|52|a1（ゼロ埋め/切り詰め）|
//! |97|1|定数10（次フィールド長）|
//! |98|10|アプリケーション識別子（ゼロ埋め/切り詰め）|
//! |108|1|定数1|
//! |109|1|チェックサムバージョン|
//! |110|1|シード下位バイト XOR チェックサム鍵|
//! |111|14|チェックサム固定末尾|

use rand::Rng;

use xhsign_codec::MAX_PAYLOAD_LEN;
use xhsign_types::ParsedPayload;

use crate::config;
use crate::error::SignError;

/// ビルダが出力するバイト数（フィールド幅の合計）
pub const BUILT_PAYLOAD_LEN: usize = 125;

/// 環境指紋A: LE 64bitミリ秒タイムスタンプの先頭バイトをチェックサム
/// マークで置換し、全バイトを固定定数でXORする。
///
/// マーク = (バイト1〜4の和 & 0xFF + バイト5〜7の和) & 0xFF
pub fn env_fingerprint_a(ts_ms: i64, xor_key: u8) -> [u8; 8] {
    let mut buf = (ts_ms as u64).to_le_bytes();
    let sum1: u32 = buf[1..5].iter().map(|&b| u32::from(b)).sum();
    let sum2: u32 = buf[5..8].iter().map(|&b| u32::from(b)).sum();
    let mark = ((sum1 & 0xFF) + sum2) & 0xFF;
    buf[0] = mark as u8;
    buf.map(|b| b ^ xor_key)
}

/// 環境指紋B: LE 64bitミリ秒タイムスタンプそのまま（難読化なし）。
pub fn env_fingerprint_b(ts_ms: i64) -> [u8; 8] {
    (ts_ms as u64).to_le_bytes()
}

/// 固定幅フィールドへのゼロ埋め/切り詰め。
fn fixed_width_field(value: &str, width: usize) -> Vec<u8> {
    let mut field = value.as_bytes().to_vec();
    field.resize(width, 0);
    field
}

/// 署名ペイロードを構築する。
///
/// `timestamp`は秒（小数部あり）。乱数は注入された`rng`からのみ
/// 引くため、シードと時刻を固定すれば出力は完全に再現可能。
pub fn build_payload<R: Rng + ?Sized>(
    digest: &[u8; 16],
    a1: &str,
    app_id: &str,
    content_len: usize,
    timestamp: f64,
    rng: &mut R,
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(BUILT_PAYLOAD_LEN);

    payload.extend_from_slice(&config::VERSION_BYTES);

    let seed: u32 = rng.gen();
    let seed_byte0 = (seed & 0xFF) as u8;
    payload.extend_from_slice(&seed.to_le_bytes());

    let ts_ms = (timestamp * 1000.0) as i64;
    payload.extend_from_slice(&env_fingerprint_a(ts_ms, config::ENV_FP_XOR_KEY));

    let offset =
        rng.gen_range(config::ENV_FP_TIME_OFFSET_MIN..=config::ENV_FP_TIME_OFFSET_MAX);
    let ts_offset_ms = ((timestamp - offset as f64) * 1000.0) as i64;
    payload.extend_from_slice(&env_fingerprint_b(ts_offset_ms));

    let sequence =
        rng.gen_range(config::SEQUENCE_VALUE_MIN..=config::SEQUENCE_VALUE_MAX);
    payload.extend_from_slice(&sequence.to_le_bytes());

    let window_props_len =
        rng.gen_range(config::WINDOW_PROPS_LENGTH_MIN..=config::WINDOW_PROPS_LENGTH_MAX);
    payload.extend_from_slice(&window_props_len.to_le_bytes());

    payload.extend_from_slice(&(content_len as u32).to_le_bytes());

    for &b in &digest[..8] {
        payload.push(b ^ seed_byte0);
    }

    payload.push(config::A1_FIELD_LEN as u8);
    payload.extend_from_slice(&fixed_width_field(a1, config::A1_FIELD_LEN));

    payload.push(config::APP_ID_FIELD_LEN as u8);
    payload.extend_from_slice(&fixed_width_field(app_id, config::APP_ID_FIELD_LEN));

    payload.push(1);
    payload.push(config::CHECKSUM_VERSION);
    payload.push(seed_byte0 ^ config::CHECKSUM_XOR_KEY);
    payload.extend_from_slice(&config::CHECKSUM_FIXED_TAIL);

    payload
}

fn le_u32(data: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn le_i64(data: &[u8], offset: usize) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[offset..offset + 8]);
    i64::from_le_bytes(buf)
}

/// 末尾のゼロ埋めを除去して文字列化する。
fn trim_nul_field(data: &[u8]) -> String {
    let end = data
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// 復号済みペイロードを構造化フィールドへ解析する。
///
/// ビルダの逆操作。MD5断片は復元したシード下位バイトで再XORして
/// 取り出す。124バイト未満の入力は[`SignError::PayloadTooShort`]。
pub fn parse_payload(data: &[u8]) -> Result<ParsedPayload, SignError> {
    if data.len() < MAX_PAYLOAD_LEN {
        return Err(SignError::PayloadTooShort {
            actual: data.len(),
            expected: MAX_PAYLOAD_LEN,
        });
    }

    let version = [data[0], data[1], data[2], data[3]];
    let seed = le_u32(data, 4);
    let seed_byte0 = data[4];

    let md5_fragment: Vec<u8> = data[36..44].iter().map(|&b| b ^ seed_byte0).collect();

    Ok(ParsedPayload {
        version,
        seed,
        timestamp_ms: le_i64(data, 16),
        sequence: le_u32(data, 24),
        window_props_len: le_u32(data, 28),
        content_len: le_u32(data, 32),
        md5_fragment_hex: hex_lower(&md5_fragment),
        a1: trim_nul_field(&data[45..97]),
        app_id: trim_nul_field(&data[98..108]),
    })
}

fn hex_lower(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn digest_fixture() -> [u8; 16] {
        xhsign_codec::md5_digest(b"/api/sns/web/v1/user_posted?num=30")
    }

    /// フィールド幅の合計どおり正確に125バイト出力されることを確認
    #[test]
    fn test_built_payload_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let payload = build_payload(&digest_fixture(), "a1value", "xhs-pc-web", 34, 1.7e9, &mut rng);
        assert_eq!(payload.len(), BUILT_PAYLOAD_LEN);
    }

    /// 環境指紋Aの既知ベクトル（ts=1700000000000, XOR鍵41）
    #[test]
    fn test_env_fingerprint_a_golden() {
        let fp = env_fingerprint_a(1_700_000_000_000, 41);
        assert_eq!(fp, [129, 65, 204, 230, 162, 40, 41, 41]);
    }

    /// 環境指紋BがLEタイムスタンプそのものであることを確認
    #[test]
    fn test_env_fingerprint_b_raw() {
        let fp = env_fingerprint_b(1_700_000_000_000);
        assert_eq!(fp, 1_700_000_000_000u64.to_le_bytes());
    }

    /// a1とアプリ識別子が正確な固定幅で埋め込まれることを確認
    #[test]
    fn test_fixed_width_fields() {
        let mut rng = StdRng::seed_from_u64(2);
        let payload = build_payload(&digest_fixture(), "short", "app", 10, 1.7e9, &mut rng);
        assert_eq!(payload[44], 52);
        assert_eq!(&payload[45..50], b"short");
        assert!(payload[50..97].iter().all(|&b| b == 0));
        assert_eq!(payload[97], 10);
        assert_eq!(&payload[98..101], b"app");
        assert!(payload[101..108].iter().all(|&b| b == 0));
    }

    /// 52バイト超のa1が切り詰められることを確認
    #[test]
    fn test_a1_truncated_to_field_width() {
        let long_a1 = "x".repeat(80);
        let mut rng = StdRng::seed_from_u64(3);
        let payload = build_payload(&digest_fixture(), &long_a1, "app", 10, 1.7e9, &mut rng);
        assert_eq!(payload.len(), BUILT_PAYLOAD_LEN);
        assert!(payload[45..97].iter().all(|&b| b == b'x'));
        assert_eq!(payload[97], 10);
    }

    /// ビルド→解析で決定的フィールドが復元され、ランダムフィールドが
    /// 宣言レンジに収まることを確認
    #[test]
    fn test_build_parse_roundtrip() {
        let digest = digest_fixture();
        let ts = 1_700_000_000.5_f64;
        let mut rng = StdRng::seed_from_u64(4);
        let built = build_payload(&digest, "a1cookievalue", "xhs-pc-web", 34, ts, &mut rng);
        let parsed = parse_payload(&built).unwrap();

        assert_eq!(parsed.version, crate::config::VERSION_BYTES);
        assert_eq!(parsed.content_len, 34);
        assert_eq!(parsed.a1, "a1cookievalue");
        assert_eq!(parsed.app_id, "xhs-pc-web");
        assert_eq!(parsed.md5_fragment_hex, hex::encode(&digest[..8]));

        assert!((15..=50).contains(&parsed.sequence));
        assert!((900..=1200).contains(&parsed.window_props_len));
        // 指紋Bは署名時刻から10〜50秒戻した時刻
        let ts_ms = (ts * 1000.0) as i64;
        assert!(parsed.timestamp_ms <= ts_ms - 10_000);
        assert!(parsed.timestamp_ms >= ts_ms - 50_000);
    }

    /// シードと時刻を固定すれば出力が完全一致することを確認
    #[test]
    fn test_deterministic_with_fixed_seed() {
        let digest = digest_fixture();
        let a = build_payload(&digest, "a1", "app", 5, 1.7e9, &mut StdRng::seed_from_u64(9));
        let b = build_payload(&digest, "a1", "app", 5, 1.7e9, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    /// 124バイト未満の入力がPayloadTooShortで拒否されることを確認
    #[test]
    fn test_parse_rejects_short_payload() {
        let err = parse_payload(&[0u8; 123]).unwrap_err();
        assert!(matches!(
            err,
            SignError::PayloadTooShort { actual: 123, expected: 124 }
        ));
    }
}
