//! # リクエストヘッダ補助値
//!
//! 署名本体と並んで送出されるトレースID・タイムスタンプヘッダ、および
//! デバイス識別Cookie（`a1` / `webId`）の生成。乱数と時刻は呼び出し元
//! から注入する。

use rand::Rng;

use xhsign_codec::crc32_ieee;

use crate::config;

/// 文字集合から`len`文字をランダムに引く。
fn random_chars<R: Rng + ?Sized>(charset: &str, len: usize, rng: &mut R) -> String {
    let chars: Vec<char> = charset.chars().collect();
    (0..len)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// `x-t`ヘッダ値。署名時刻（秒）をミリ秒整数へ丸める。
pub fn x_t_at(timestamp: f64) -> i64 {
    (timestamp * 1000.0) as i64
}

/// `x-b3-traceid`ヘッダ値。16文字のランダム16進文字列。
pub fn b3_trace_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_chars(config::HEX_CHARS, config::B3_TRACE_ID_LEN, rng)
}

/// `x-xray-traceid`ヘッダ値。
///
/// 第1部はミリ秒タイムスタンプを23bit左シフトし、23bitシーケンス値を
/// ORした64bit整数の16進表現。第2部は16文字のランダム16進。
/// `sequence`を省略した場合はランダムに引く。
pub fn xray_trace_id<R: Rng + ?Sized>(
    timestamp_ms: i64,
    sequence: Option<u32>,
    rng: &mut R,
) -> String {
    let seq = match sequence {
        Some(value) => value & config::XRAY_TRACE_ID_SEQ_MAX,
        None => rng.gen_range(0..=config::XRAY_TRACE_ID_SEQ_MAX),
    };
    let part1 = ((timestamp_ms as u64) << config::XRAY_TRACE_ID_TIMESTAMP_SHIFT)
        | u64::from(seq);
    let part2 = random_chars(config::HEX_CHARS, config::XRAY_TRACE_ID_PART2_LEN, rng);
    format!("{part1:016x}{part2}")
}

/// `a1` Cookie値を指定時刻で生成する。
///
/// 本体 = ミリ秒タイムスタンプの16進 + ランダム30文字 + "5" + "0" + "000"、
/// 末尾に本体のCRC32（10進）を連結し、52文字へ切り詰める。
pub fn generate_a1_at<R: Rng + ?Sized>(timestamp_ms: i64, rng: &mut R) -> String {
    let body = format!(
        "{:x}{}50000",
        timestamp_ms,
        random_chars(config::A1_CHARSET, 30, rng)
    );
    let checksum = crc32_ieee(body.as_bytes());
    let mut cookie = format!("{body}{checksum}");
    cookie.truncate(config::A1_MAX_LEN);
    cookie
}

/// `webId` Cookie値。32文字のランダム16進文字列。
pub fn web_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_chars(config::HEX_CHARS, config::WEB_ID_LEN, rng)
}
