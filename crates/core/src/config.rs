//! # プロトコル定数
//!
//! 外部プラットフォームとのビット互換に必要な固定値。いずれも導出せず
//! 名前付き定数としてここに一度だけ記載する。アルファベット・XOR鍵・
//! CRC定数・RC4鍵は`xhsign-codec`側に置く。

// ---------------------------------------------------------------------------
// プレフィックストークン
// ---------------------------------------------------------------------------

/// 一次署名全体のプレフィックス
pub const XYS_PREFIX: &str = "XYS_";

/// x3ペイロードトークンのプレフィックス
pub const X3_PREFIX: &str = "mns0301_";

// ---------------------------------------------------------------------------
// バイナリペイロードの固定値
// ---------------------------------------------------------------------------

/// バージョンマーカー（ペイロード先頭4バイト）
pub const VERSION_BYTES: [u8; 4] = [119, 104, 96, 41];

/// チェックサムバージョン定数（オフセット109）
pub const CHECKSUM_VERSION: u8 = 1;

/// シード下位バイトに適用するチェックサムXOR鍵（オフセット110）
pub const CHECKSUM_XOR_KEY: u8 = 115;

/// チェックサム固定末尾（オフセット111〜）
pub const CHECKSUM_FIXED_TAIL: [u8; 14] =
    [249, 65, 103, 103, 201, 181, 131, 99, 94, 7, 68, 250, 132, 21];

/// 環境指紋Aの各バイトに適用するXOR定数
pub const ENV_FP_XOR_KEY: u8 = 41;

/// 環境指紋Bのタイムスタンプオフセット範囲（秒）
pub const ENV_FP_TIME_OFFSET_MIN: u64 = 10;
pub const ENV_FP_TIME_OFFSET_MAX: u64 = 50;

/// シーケンス値の範囲
pub const SEQUENCE_VALUE_MIN: u32 = 15;
pub const SEQUENCE_VALUE_MAX: u32 = 50;

/// windowプロパティ数の範囲
pub const WINDOW_PROPS_LENGTH_MIN: u32 = 900;
pub const WINDOW_PROPS_LENGTH_MAX: u32 = 1200;

/// a1フィールドの固定幅（バイト）
pub const A1_FIELD_LEN: usize = 52;

/// アプリケーション識別子フィールドの固定幅（バイト）
pub const APP_ID_FIELD_LEN: usize = 10;

// ---------------------------------------------------------------------------
// プロトコルリテラル
// ---------------------------------------------------------------------------

/// プロトコルバージョン（エンベロープ`x0` / 二次署名`x1`）
pub const PROTOCOL_VERSION: &str = "4.2.6";

/// クライアント識別子（エンベロープ`x1` / 二次署名`x3`）
pub const CLIENT_ID: &str = "xhs-pc-web";

/// プラットフォーム名（エンベロープ`x2` / 二次署名`x2`）
pub const PLATFORM: &str = "Windows";

/// クライアントビルドバージョン（二次署名`x4`）
pub const CLIENT_BUILD: &str = "4.86.0";

/// 動作モード（二次署名`x11`）
pub const DEFAULT_MODE: &str = "normal";

/// アプリケーション識別子の既定値（空指定時に使用）
pub const DEFAULT_APP_ID: &str = "xhs-pc-web";

/// 指紋レコードの`x1`に入れる公開User-Agent
pub const PUBLIC_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36 Edg/142.0.0.0";

// ---------------------------------------------------------------------------
// ヘッダ補助値（トレースID・a1 Cookie）
// ---------------------------------------------------------------------------

/// トレースIDに使用する16進文字集合
pub const HEX_CHARS: &str = "abcdef0123456789";

/// x-b3-traceidの長さ
pub const B3_TRACE_ID_LEN: usize = 16;

/// x-xray-traceidのシーケンス上限（23bit）
pub const XRAY_TRACE_ID_SEQ_MAX: u32 = 8_388_607;

/// x-xray-traceid第1部のタイムスタンプシフト量
pub const XRAY_TRACE_ID_TIMESTAMP_SHIFT: u32 = 23;

/// x-xray-traceid第2部（ランダム16進）の長さ
pub const XRAY_TRACE_ID_PART2_LEN: usize = 16;

/// a1 Cookie生成に使用する文字集合
pub const A1_CHARSET: &str = "abcdefghijklmnopqrstuvwxyz1234567890";

/// a1 Cookieの最大長
pub const A1_MAX_LEN: usize = 52;

/// webId（登録ID）の長さ
pub const WEB_ID_LEN: usize = 32;
