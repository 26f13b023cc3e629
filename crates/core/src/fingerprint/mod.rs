//! # 合成環境指紋アセンブラ
//!
//! 二次署名の素材となるブラウザ環境レコード（`x1`〜`x82`）を組み立てる。
//! 値は`data`モジュールのカタログから重み付きランダムに選択し、
//! 乱数と時刻は呼び出し元から注入する（決定的テストのため）。

pub mod data;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_json::{Map, Value};

use xhsign_codec::md5_hex;
use xhsign_types::{FingerprintRecord, PageLocation, TextMetricsRect};

use crate::content::value_text;
use data::WeightedOptions;

/// 画面構成。解像度と利用可能サイズの整合を保って生成する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenProfile {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
}

/// 重み付きランダム選択。テーブルは`data`の定数のみを想定する。
fn weighted_pick<T: 'static, R: Rng + ?Sized>(
    options: &WeightedOptions<T>,
    rng: &mut R,
) -> &'static T {
    let index = WeightedIndex::new(options.weights)
        .map(|dist| dist.sample(rng))
        .unwrap_or(0);
    &options.values[index]
}

/// GPUベンダとレンダラのペアを選択する。
fn renderer_info<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let entry = data::GPU_VENDORS[rng.gen_range(0..data::GPU_VENDORS.len())];
    match entry.split_once('|') {
        Some((vendor, renderer)) => (vendor, renderer),
        None => (entry, ""),
    }
}

/// 画面構成を生成する。
///
/// 解像度はカタログの重み付き分布から選び、利用可能サイズは公平な
/// コイントスでタスクバー方向（幅控除 / 高さ控除）を決めた上で
/// それぞれの控除量分布から引く。
pub fn screen_profile<R: Rng + ?Sized>(rng: &mut R) -> ScreenProfile {
    let resolution = weighted_pick(&data::SCREEN_RESOLUTIONS, rng);
    let (width, height) = match resolution.split_once(';') {
        Some((w, h)) => (
            w.parse::<u32>().unwrap_or(1920),
            h.parse::<u32>().unwrap_or(1080),
        ),
        None => (1920, 1080),
    };

    let (avail_width, avail_height) = if rng.gen_bool(0.5) {
        let deduction = weighted_pick(&data::AVAIL_DEDUCTION_WIDTH, rng);
        (width.saturating_sub(*deduction), height)
    } else {
        let deduction = weighted_pick(&data::AVAIL_DEDUCTION_HEIGHT, rng);
        (width, height.saturating_sub(*deduction))
    };

    ScreenProfile {
        width,
        height,
        avail_width,
        avail_height,
    }
}

/// ランダム32バイトのMD5によるWebGL指紋ハッシュ。
fn webgl_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    let token: [u8; 32] = rng.gen();
    md5_hex(&token)
}

/// Cookieマップを`k=v; `連結の文字列へ変換する。
fn cookie_string(cookies: &Map<String, Value>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={}", value_text(value)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// 環境指紋レコードを組み立てる。
///
/// `timestamp_ms`は収集時刻（`x44`）。同じ`rng`系列と時刻を与えれば
/// 出力は完全に再現可能。
pub fn assemble<R: Rng + ?Sized>(
    cookies: &Map<String, Value>,
    user_agent: &str,
    timestamp_ms: i64,
    rng: &mut R,
) -> FingerprintRecord {
    let screen = screen_profile(rng);
    let incognito = (*weighted_pick(&data::INCOGNITO_OPTIONS, rng)).to_string();
    let (vendor, renderer) = renderer_info(rng);
    let color_depth = weighted_pick(&data::COLOR_DEPTH_OPTIONS, rng).to_string();
    let device_memory = weighted_pick(&data::DEVICE_MEMORY_OPTIONS, rng).to_string();
    let cores = weighted_pick(&data::CORE_OPTIONS, rng).to_string();

    let webgl = webgl_hash(rng);
    let session_token: [u8; 32] = rng.gen();
    let x53 = md5_hex(&session_token);
    let x36 = rng.gen_range(1..=20u32).to_string();
    let text_rect_y = rng.gen_range(2350..=2450i64);

    FingerprintRecord {
        x1: user_agent.to_string(),
        x2: "false".to_string(),
        x3: "zh-CN".to_string(),
        x4: color_depth,
        x5: device_memory,
        x6: "24".to_string(),
        x7: format!("{vendor},{renderer}"),
        x8: cores,
        x9: format!("{};{}", screen.width, screen.height),
        x10: format!("{};{}", screen.avail_width, screen.avail_height),
        x11: "-480".to_string(),
        x12: "Asia/Shanghai".to_string(),
        x13: incognito.clone(),
        x14: incognito.clone(),
        x15: incognito,
        x16: "false".to_string(),
        x17: "false".to_string(),
        x18: "un".to_string(),
        x19: "Win32".to_string(),
        x20: String::new(),
        x21: data::BROWSER_PLUGINS.to_string(),
        x22: webgl.clone(),
        x23: "false".to_string(),
        x24: "false".to_string(),
        x25: "false".to_string(),
        x26: "false".to_string(),
        x27: "false".to_string(),
        x28: "0,false,false".to_string(),
        x29: "4,7,8".to_string(),
        x30: "swf object not loaded".to_string(),
        x33: "0".to_string(),
        x34: "0".to_string(),
        x35: "0".to_string(),
        x36,
        x37: "0|0|0|0|0|0|0|0|0|1|0|0|0|0|0|0|0|0|1|0|0|0|0|0".to_string(),
        x38: "0|0|1|0|1|0|0|0|0|0|1|0|1|0|1|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0"
            .to_string(),
        x39: 0,
        x40: "0".to_string(),
        x41: "0".to_string(),
        x42: "3.4.4".to_string(),
        x43: data::CANVAS_HASH.to_string(),
        x44: timestamp_ms.to_string(),
        x45: "__SEC_CAV__1-1-1-1-1|__SEC_WSA__|".to_string(),
        x46: "false".to_string(),
        x47: "1|0|0|0|0|0".to_string(),
        x48: String::new(),
        x49: "{list:[],type:}".to_string(),
        x50: String::new(),
        x51: String::new(),
        x52: String::new(),
        x55: "380,380,360,400,380,400,420,380,400,400,360,360,440,420".to_string(),
        x56: format!("{vendor}|{renderer}|{webgl}|35"),
        x57: cookie_string(cookies),
        x58: "180".to_string(),
        x59: "2".to_string(),
        x60: "63".to_string(),
        x61: "1291".to_string(),
        x62: "2047".to_string(),
        x63: "0".to_string(),
        x64: "0".to_string(),
        x65: "0".to_string(),
        x66: PageLocation {
            referer: String::new(),
            location: "https://www.xiaohongshu.com/explore".to_string(),
            frame: 0,
        },
        x67: "1|0".to_string(),
        x68: "0".to_string(),
        x69: "326|1292|30".to_string(),
        x70: vec!["location".to_string()],
        x71: "true".to_string(),
        x72: "complete".to_string(),
        x73: "1191".to_string(),
        x74: "0|0|0".to_string(),
        x75: "Google Inc.".to_string(),
        x76: "true".to_string(),
        x77: "1|1|1|1|1|1|1|1|1|1".to_string(),
        x78: TextMetricsRect {
            x: 0,
            y: text_rect_y,
            left: 0,
            right: data::TEXT_RECT_WIDTH,
            bottom: text_rect_y + 18,
            height: 18,
            top: text_rect_y,
            width: data::TEXT_RECT_WIDTH,
            font: data::FONTS.to_string(),
        },
        x82: "_0x17a2|_0x1954".to_string(),
        x31: data::AUDIO_FINGERPRINT.to_string(),
        x79: "144|599565058866".to_string(),
        x53,
        x54: data::VOICE_HASH.to_string(),
        x80: "1|[object FileSystemDirectoryHandle]".to_string(),
    }
}
