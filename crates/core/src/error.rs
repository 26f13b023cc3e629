//! # 署名処理エラー型

/// 署名生成・復号のエラー型。
///
/// 符号化方向は整形済み入力に対して失敗しない（失敗は欠陥扱い）。
/// 復号方向のエラーは破損または他形式の入力を示し、呼び出し元へ
/// そのまま返す。内部でのリトライや部分結果の返却は行わない。
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// URIからパスコンポーネントを抽出できない（呼び出し元の入力不正）
    #[error("URIからパスを抽出できません: {0}")]
    InvalidUri(String),
    /// 署名エンベロープの構造解析に失敗（復号方向のみ）
    #[error("署名エンベロープの解析に失敗しました: {0}")]
    MalformedEnvelope(String),
    /// 復号済みペイロードが規定長に満たない（復号方向のみ）
    #[error("ペイロードが短すぎます: {actual} < {expected}")]
    PayloadTooShort {
        /// 実際のバイト数
        actual: usize,
        /// 要求される最小バイト数
        expected: usize,
    },
    /// 符号化方向での内部シリアライズエラー（欠陥扱い）
    #[error("内部シリアライズに失敗しました: {0}")]
    EncodingFailure(#[from] serde_json::Error),
    /// 二次署名に必須のCookieが供給されていない
    #[error("必須Cookieがありません: {0}")]
    MissingCookie(&'static str),
    /// 難読化プリミティブ層のエラー
    #[error(transparent)]
    Codec(#[from] xhsign_codec::CodecError),
}
