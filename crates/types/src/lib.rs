//! # xhsign 共有型定義
//!
//! XHS Webプラットフォームの署名プロトコルで使用するデータ構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - 各エンベロープはコンパクトJSONにシリアライズされた後、独自Base64アルファベットで符号化される
//! - フィールドの宣言順がそのままワイヤ上の出現順になる（順序はプロトコル上有意）
//! - HTMLセーフ用のエスケープ（`<` `>` `&`）は行わない

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 一次署名 (x-s) エンベロープ
// ---------------------------------------------------------------------------

/// 一次署名エンベロープ。`XYS_`プレフィックスの内側に入る5フィールドのレコード。
///
/// `x3`には`mns0301_` + Base64(XOR変換済み124バイトペイロード)が入る。
/// `x0`〜`x2`はプロトコル定数、`x4`は予約フィールド（常に空文字列）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    /// プロトコルバージョン（例: "4.2.6"）
    pub x0: String,
    /// クライアント識別子（例: "xhs-pc-web"）
    pub x1: String,
    /// プラットフォーム名（例: "Windows"）
    pub x2: String,
    /// ペイロードトークン（プレフィックス + Base64符号化済みバイナリ）
    pub x3: String,
    /// 予約フィールド（空文字列）
    pub x4: String,
}

// ---------------------------------------------------------------------------
// 二次署名 (x-s-common) エンベロープ
// ---------------------------------------------------------------------------

/// 二次署名エンベロープ。指紋サブセットから生成したB1トークンと
/// そのチェックサムを運ぶ14フィールドのレコード。
///
/// `s0,s1,x0..x11`の宣言順がシリアライズ順。`x9`のみ符号付き整数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonEnvelope {
    /// プロトコル定数（5）
    pub s0: u32,
    /// 予約フィールド（空文字列）
    pub s1: String,
    /// プロトコル定数（"1"）
    pub x0: String,
    /// プロトコルバージョン（"4.2.6"）
    pub x1: String,
    /// プラットフォーム名（"Windows"）
    pub x2: String,
    /// クライアント識別子（"xhs-pc-web"）
    pub x3: String,
    /// クライアントビルドバージョン（"4.86.0"）
    pub x4: String,
    /// a1 Cookie値（呼び出し元から供給される）
    pub x5: String,
    /// 予約フィールド
    pub x6: String,
    /// 予約フィールド
    pub x7: String,
    /// B1トークン（暗号化・再符号化済み指紋サブセット）
    pub x8: String,
    /// B1トークンのCRC32変種チェックサム（符号付き32bit）
    pub x9: i32,
    /// プロトコル定数（0）
    pub x10: u32,
    /// 動作モード（"normal"）
    pub x11: String,
}

// ---------------------------------------------------------------------------
// 解析済みバイナリペイロード
// ---------------------------------------------------------------------------

/// 復号済みの124バイトペイロードから復元した構造化フィールド。
///
/// ランダム生成されるフィールド（シード・シーケンス値等）もそのまま保持する。
/// 環境指紋Aはチェックサムマークで先頭バイトが破壊されているため復元対象外。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPayload {
    /// バージョンマーカー（4バイト固定値）
    pub version: [u8; 4],
    /// ランダム32bitシード
    pub seed: u32,
    /// 環境指紋Bのミリ秒タイムスタンプ（署名時刻 − ランダムオフセット）
    pub timestamp_ms: i64,
    /// ランダムシーケンス値（15〜50）
    pub sequence: u32,
    /// ランダムなwindowプロパティ数（900〜1200）
    pub window_props_len: u32,
    /// コンテンツ文字列のバイト長
    pub content_len: u32,
    /// MD5ダイジェスト先頭8バイトの16進表現（16文字）
    pub md5_fragment_hex: String,
    /// a1 Cookie値（末尾のゼロ埋めを除去済み）
    pub a1: String,
    /// アプリケーション識別子（末尾のゼロ埋めを除去済み）
    pub app_id: String,
}

// ---------------------------------------------------------------------------
// 合成環境指紋
// ---------------------------------------------------------------------------

/// `x66`フィールド: ページ位置情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    /// リファラ（通常は空）
    pub referer: String,
    /// 現在のページURL
    pub location: String,
    /// フレーム深度
    pub frame: u32,
}

/// `x78`フィールド: テキスト計測矩形。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMetricsRect {
    pub x: i64,
    pub y: i64,
    pub left: i64,
    pub right: f64,
    pub bottom: i64,
    pub height: i64,
    pub top: i64,
    pub width: f64,
    /// 計測に使用したフォント一覧（カンマ区切り）
    pub font: String,
}

/// 合成ブラウザ環境レコード。キー`x1`〜`x82`（欠番あり）。
///
/// 二次署名はこのうち[`SigningSubset`]の18キーのみを使用するが、
/// レコード全体を生成することで実クライアントの挙動に揃えている。
/// フィールドの大半は文字列表現（実クライアントがDOM APIの結果を
/// 文字列化して収集するため）。宣言順は実クライアントの収集順。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// User-Agent文字列
    pub x1: String,
    /// webdriverフラグ
    pub x2: String,
    /// ブラウザ言語
    pub x3: String,
    /// 色深度
    pub x4: String,
    /// デバイスメモリ（GB）
    pub x5: String,
    /// ピクセル深度
    pub x6: String,
    /// GPUベンダ,レンダラ
    pub x7: String,
    /// 論理コア数
    pub x8: String,
    /// 画面解像度 "幅;高さ"
    pub x9: String,
    /// 利用可能画面サイズ "幅;高さ"
    pub x10: String,
    /// タイムゾーンオフセット（分）
    pub x11: String,
    /// タイムゾーン名
    pub x12: String,
    /// シークレットモード判定
    pub x13: String,
    pub x14: String,
    pub x15: String,
    pub x16: String,
    pub x17: String,
    /// 広告ブロック判定
    pub x18: String,
    /// プラットフォーム（"Win32"）
    pub x19: String,
    pub x20: String,
    /// ブラウザプラグイン一覧
    pub x21: String,
    /// WebGLハッシュ
    pub x22: String,
    pub x23: String,
    pub x24: String,
    pub x25: String,
    pub x26: String,
    pub x27: String,
    /// タッチサポート "点数,イベント有無,タッチ開始有無"
    pub x28: String,
    pub x29: String,
    /// Flash検出結果
    pub x30: String,
    pub x33: String,
    pub x34: String,
    pub x35: String,
    /// ランダム整数（1〜20）
    pub x36: String,
    /// 権限ビット列A
    pub x37: String,
    /// 権限ビット列B
    pub x38: String,
    /// 数値フィールド（常に0）
    pub x39: u32,
    pub x40: String,
    pub x41: String,
    /// 収集スクリプトのバージョン
    pub x42: String,
    /// Canvasハッシュ
    pub x43: String,
    /// 収集時刻のミリ秒タイムスタンプ（10進文字列）
    pub x44: String,
    /// セキュリティ検査マーカー
    pub x45: String,
    pub x46: String,
    pub x47: String,
    pub x48: String,
    pub x49: String,
    pub x50: String,
    pub x51: String,
    pub x52: String,
    /// フォント幅計測列
    pub x55: String,
    /// GPU情報 "ベンダ|レンダラ|WebGLハッシュ|35"
    pub x56: String,
    /// Cookie文字列
    pub x57: String,
    pub x58: String,
    pub x59: String,
    pub x60: String,
    pub x61: String,
    pub x62: String,
    pub x63: String,
    pub x64: String,
    pub x65: String,
    /// ページ位置情報
    pub x66: PageLocation,
    pub x67: String,
    pub x68: String,
    /// ビューポート計測 "スクロール幅|高さ|余白"
    pub x69: String,
    /// 上書き検出済みグローバル一覧
    pub x70: Vec<String>,
    pub x71: String,
    /// document.readyState
    pub x72: String,
    pub x73: String,
    pub x74: String,
    /// navigator.vendor
    pub x75: String,
    pub x76: String,
    pub x77: String,
    /// テキスト計測矩形
    pub x78: TextMetricsRect,
    /// 難読化シンボルマーカー
    pub x82: String,
    /// AudioContextハッシュ
    pub x31: String,
    /// メディア能力 "コーデック数|能力値"
    pub x79: String,
    /// セッショントークン（ランダム32バイトのMD5）
    pub x53: String,
    /// 音声指紋ハッシュ
    pub x54: String,
    /// ファイルシステムAPI検出結果
    pub x80: String,
}

/// 二次署名（B1トークン）が使用する18キーのサブセット。
/// 宣言順 = シリアライズ順 = キーの昇順。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningSubset {
    pub x33: String,
    pub x34: String,
    pub x35: String,
    pub x36: String,
    pub x37: String,
    pub x38: String,
    pub x39: u32,
    pub x42: String,
    pub x43: String,
    pub x44: String,
    pub x45: String,
    pub x46: String,
    pub x48: String,
    pub x49: String,
    pub x50: String,
    pub x51: String,
    pub x52: String,
    pub x82: String,
}

impl SigningSubset {
    /// 指紋レコード全体から署名対象の18キーを抽出する。
    pub fn from_record(fp: &FingerprintRecord) -> Self {
        Self {
            x33: fp.x33.clone(),
            x34: fp.x34.clone(),
            x35: fp.x35.clone(),
            x36: fp.x36.clone(),
            x37: fp.x37.clone(),
            x38: fp.x38.clone(),
            x39: fp.x39,
            x42: fp.x42.clone(),
            x43: fp.x43.clone(),
            x44: fp.x44.clone(),
            x45: fp.x45.clone(),
            x46: fp.x46.clone(),
            x48: fp.x48.clone(),
            x49: fp.x49.clone(),
            x50: fp.x50.clone(),
            x51: fp.x51.clone(),
            x52: fp.x52.clone(),
            x82: fp.x82.clone(),
        }
    }
}
