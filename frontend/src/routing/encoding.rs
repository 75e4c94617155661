//! URL 组件的编码与解码
//!
//! 生成 URL 时对路径片段做两次 `encodeURIComponent`，再把冒号、空格、
//! 斜杠还原成可读形式。这使得仓库名里的 `+` 以 `%252B` 出现，不会与
//! 变更页的 `/+/` 分隔符混淆。浏览器解码一次后路由再解码一次即可还原。

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// `encodeURIComponent` 保留不编码的字符集之外的全部字符
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 与浏览器 `encodeURIComponent` 等价的编码
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// 路径片段编码（双重转义）
///
/// `replace_slashes` 为真时保留 `/`，用于仓库名与文件路径。
pub fn encode_url(s: &str, replace_slashes: bool) -> String {
    let encoded = encode_uri_component(&encode_uri_component(s))
        .replace("%253A", ":")
        .replace("%2520", "+");
    if replace_slashes {
        encoded.replace("%252F", "/")
    } else {
        encoded
    }
}

/// 只做百分号解码
pub fn decode_path(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// 捕获值与查询参数的解码：先把 `+` 还原为空格，再做百分号解码
pub fn decode_component(s: &str) -> String {
    decode_path(&s.replace('+', " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc123", "abc123")]
    #[case("a b", "a%20b")]
    #[case("a/b:c", "a%2Fb%3Ac")]
    #[case("-_.!~*'()", "-_.!~*'()")]
    #[case("a+b&c=d", "a%2Bb%26c%3Dd")]
    #[case("ü", "%C3%BC")]
    fn test_encode_uri_component(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_uri_component(input), expected);
    }

    #[rstest]
    #[case("x+/y+/z+/w", true, "x%252B/y%252B/z%252B/w")]
    #[case("x+/y", false, "x%252B%252Fy")]
    #[case("a%b", false, "a%2525b")]
    #[case("status:open", false, "status:open")]
    #[case("foo bar/my+file.txt%", true, "foo+bar/my%252Bfile.txt%2525")]
    #[case("test test", false, "test+test")]
    fn test_encode_url(#[case] input: &str, #[case] replace_slashes: bool, #[case] expected: &str) {
        assert_eq!(encode_url(input, replace_slashes), expected);
    }

    #[test]
    fn test_browser_decode_then_component_decode_restores_value() {
        // 浏览器给出的 pathname 已解码一次
        let once = decode_path("foo+bar/my%252Bfile.txt%2525");
        assert_eq!(once, "foo+bar/my%2Bfile.txt%25");
        assert_eq!(decode_component(&once), "foo bar/my+file.txt%");
    }

    #[test]
    fn test_decode_component_handles_plus() {
        assert_eq!(decode_component("query+1"), "query 1");
        assert_eq!(decode_component("a%2Bb"), "a+b");
        assert_eq!(decode_path("a+b"), "a+b");
    }
}
