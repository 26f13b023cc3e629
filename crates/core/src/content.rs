//! # コンテンツ正規化
//!
//! HTTPメソッド・パス・ペイロードから署名対象のコンテンツ文字列を
//! 決定的に構築する。同一のメソッド/パス/ペイロードは常に同一の
//! 文字列になる（GET系はキーを明示的にソートするため、マップの
//! 反復順に依存しない）。

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::error::SignError;

/// GET系クエリ値のパーセントエンコード集合。
/// 英数字・`_` `.` `-` `~`に加えてカンマを安全文字として通過させる
/// （空白は`+`ではなく`%20`になる）。
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b',');

/// URIからパスコンポーネントを抽出する。
///
/// スキーム・ホストは取り除き、クエリ文字列は捨てる。
/// パスが抽出できない場合（例: パスを持たない裸のホスト名）は
/// [`SignError::InvalidUri`]を返す。
pub fn extract_uri(uri: &str) -> Result<String, SignError> {
    let uri = uri.trim();
    // 先頭が`/`なら既にパスのみ。クエリがあれば除去する
    if uri.starts_with('/') {
        let path = match uri.find('?') {
            Some(idx) => &uri[..idx],
            None => uri,
        };
        return Ok(path.to_string());
    }
    let parsed = url::Url::parse(uri).map_err(|_| SignError::InvalidUri(uri.to_string()))?;
    let path = parsed.path();
    if path.is_empty() || path == "/" {
        return Err(SignError::InvalidUri(uri.to_string()));
    }
    Ok(path.to_string())
}

/// JSON値の正規テキスト形式。
///
/// 文字列はそのまま、数値・真偽値はJSONテキスト形式、配列は要素を
/// カンマで連結する。nullは空文字列、ネストしたオブジェクトは
/// コンパクトJSON（上流クライアントはどちらも送信しないため、
/// 決定的でさえあれば互換性に影響しない）。
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// メソッド・パス・ペイロードからコンテンツ文字列を構築する。
///
/// - POST: パス + ペイロードのコンパクトJSON（呼び出し元のキー順を保持、
///   HTMLセーフエスケープなし、末尾改行なし）
/// - それ以外: ペイロードが空ならパスのみ。非空ならキーをバイト昇順に
///   ソートし、`key=value`を`&`で連結して`?`の後に付加する
pub fn build_content_string(
    method: &str,
    path: &str,
    payload: &Map<String, Value>,
) -> Result<String, SignError> {
    if method.eq_ignore_ascii_case("POST") {
        let body = serde_json::to_string(payload)?;
        return Ok(format!("{path}{body}"));
    }

    if payload.is_empty() {
        return Ok(path.to_string());
    }

    let mut keys: Vec<&String> = payload.keys().collect();
    keys.sort_unstable();

    let params: Vec<String> = keys
        .iter()
        .map(|key| {
            // キー存在はkeysの取得元から自明
            let value = &payload[key.as_str()];
            let text = value_text(value);
            let encoded = utf8_percent_encode(&text, QUERY_VALUE_SET);
            format!("{key}={encoded}")
        })
        .collect();

    Ok(format!("{path}?{}", params.join("&")))
}
