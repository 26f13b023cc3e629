//! # 環境カタログデータ
//!
//! 指紋アセンブラが引く「もっともらしいブラウザ環境値」の定数カタログ。
//! アルゴリズムを持たない純粋なデータテーブルで、値の出典は実ブラウザの
//! 観測分布。選択ロジックは`mod.rs`側にある。

/// 重み付き選択肢テーブル。`values`と`weights`は同じ長さ。
pub struct WeightedOptions<T: 'static> {
    pub values: &'static [T],
    pub weights: &'static [f64],
}

/// 画面解像度 "幅;高さ"
pub const SCREEN_RESOLUTIONS: WeightedOptions<&str> = WeightedOptions {
    values: &[
        "1920;1080", "1536;864", "1366;768", "2560;1440", "1440;900", "1280;720", "3840;2160",
    ],
    weights: &[0.38, 0.17, 0.14, 0.12, 0.08, 0.06, 0.05],
};

/// 色深度
pub const COLOR_DEPTH_OPTIONS: WeightedOptions<u32> = WeightedOptions {
    values: &[24, 30],
    weights: &[0.95, 0.05],
};

/// デバイスメモリ（GB）
pub const DEVICE_MEMORY_OPTIONS: WeightedOptions<u32> = WeightedOptions {
    values: &[8, 16, 4, 32],
    weights: &[0.5, 0.3, 0.15, 0.05],
};

/// 論理コア数
pub const CORE_OPTIONS: WeightedOptions<u32> = WeightedOptions {
    values: &[4, 8, 12, 16, 6, 20],
    weights: &[0.2, 0.35, 0.2, 0.15, 0.05, 0.05],
};

/// シークレットモード判定値
pub const INCOGNITO_OPTIONS: WeightedOptions<&str> = WeightedOptions {
    values: &["true", "false"],
    weights: &[0.95, 0.05],
};

/// 利用可能画面サイズの控除量（幅側の分岐）
pub const AVAIL_DEDUCTION_WIDTH: WeightedOptions<u32> = WeightedOptions {
    values: &[0, 30, 60, 80],
    weights: &[0.1, 0.4, 0.3, 0.2],
};

/// 利用可能画面サイズの控除量（高さ側の分岐）
pub const AVAIL_DEDUCTION_HEIGHT: WeightedOptions<u32> = WeightedOptions {
    values: &[30, 60, 80, 100],
    weights: &[0.2, 0.5, 0.2, 0.1],
};

/// GPUベンダ・レンダラのペア（"ベンダ|レンダラ"、一様選択）
pub const GPU_VENDORS: &[&str] = &[
    "Google Inc. (NVIDIA)|ANGLE (NVIDIA, NVIDIA GeForce RTX 3060 (0x00002504) Direct3D11 vs_5_0 ps_5_0, D3D11)",
    "Google Inc. (NVIDIA)|ANGLE (NVIDIA, NVIDIA GeForce GTX 1650 (0x00001F82) Direct3D11 vs_5_0 ps_5_0, D3D11)",
    "Google Inc. (NVIDIA)|ANGLE (NVIDIA, NVIDIA GeForce RTX 4060 (0x00002882) Direct3D11 vs_5_0 ps_5_0, D3D11)",
    "Google Inc. (Intel)|ANGLE (Intel, Intel(R) UHD Graphics 630 (0x00003E92) Direct3D11 vs_5_0 ps_5_0, D3D11)",
    "Google Inc. (Intel)|ANGLE (Intel, Intel(R) Iris(R) Xe Graphics (0x00009A49) Direct3D11 vs_5_0 ps_5_0, D3D11)",
    "Google Inc. (AMD)|ANGLE (AMD, AMD Radeon RX 6600 (0x000073FF) Direct3D11 vs_5_0 ps_5_0, D3D11)",
    "Google Inc. (AMD)|ANGLE (AMD, AMD Radeon(TM) Graphics (0x00001638) Direct3D11 vs_5_0 ps_5_0, D3D11)",
];

/// ブラウザプラグイン一覧
pub const BROWSER_PLUGINS: &str = "PDF Viewer,Chrome PDF Viewer,Chromium PDF Viewer,\
Microsoft Edge PDF Viewer,WebKit built-in PDF";

/// Canvas指紋ハッシュ（収集スクリプトの描画内容が固定のため定数）
pub const CANVAS_HASH: &str = "bb8e2e6c9f1a4c0e8d3b5a7f2c4e6a18";

/// テキスト計測に使用するフォント一覧
pub const FONTS: &str = "Arial,Arial Black,Arial Narrow,Calibri,Cambria,Cambria Math,\
Comic Sans MS,Consolas,Courier,Courier New,Georgia,Helvetica,Impact,Lucida Console,\
Lucida Sans Unicode,Microsoft Sans Serif,MS Gothic,MS PGothic,MS Sans Serif,MS Serif,\
Palatino Linotype,Segoe Print,Segoe Script,Segoe UI,Segoe UI Light,Segoe UI Semibold,\
Segoe UI Symbol,SimSun,Tahoma,Times,Times New Roman,Trebuchet MS,Verdana,Wingdings";

/// 音声指紋ハッシュ
pub const VOICE_HASH: &str = "d0c9b4ab6176c1cdd6e80741f88b6e35";

/// AudioContext指紋値
pub const AUDIO_FINGERPRINT: &str = "124.04347527516074";

/// テキスト計測矩形の幅（右端座標と同値）
pub const TEXT_RECT_WIDTH: f64 = 290.828125;
