//! 导航上下文
//!
//! 每次导航创建一个，处理函数结束后丢弃。

use super::encoding::{decode_component, decode_path};
use super::pattern::Captures;
use crate::config::RouterConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    /// 收到的完整应用内 URL（已去掉部署前缀），包括查询串与锚点
    pub canonical_path: String,
    /// 路径部分，仍保持百分号编码
    pub path: String,
    /// `?` 之后、`#` 之前的原始文本
    pub querystring: String,
    /// `#` 之后的文本，已解码
    pub hash: String,
    pub captures: Captures,
}

impl NavigationContext {
    pub fn parse(url: &str, config: &RouterConfig) -> Self {
        let canonical_path = config.strip_base(url).to_string();

        let (before_hash, raw_hash) = match canonical_path.split_once('#') {
            Some((before, hash)) => (before, hash),
            None => (canonical_path.as_str(), ""),
        };
        let (path, querystring) = match before_hash.split_once('?') {
            Some((path, qs)) => (path, qs),
            None => (before_hash, ""),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_string(),
            querystring: querystring.to_string(),
            hash: decode_component(raw_hash),
            captures: Captures::default(),
            canonical_path,
        }
    }

    /// 用于模式匹配的路径（解码一次）
    pub fn match_path(&self) -> String {
        decode_path(&self.path)
    }

    /// 未解码的锚点
    pub fn raw_hash(&self) -> &str {
        hash_from_canonical_path(&self.canonical_path)
    }

    /// 读取第一个同名查询参数
    pub fn query_param(&self, name: &str) -> Option<String> {
        parse_query_string(&self.querystring)
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn with_captures(mut self, captures: Captures) -> Self {
        self.captures = captures;
        self
    }
}

/// 解析查询串为有序的键值对
///
/// 开头的 `?` 会被忽略，名字为空的项被丢弃，没有 `=` 的项值为空字符串。
pub fn parse_query_string(qs: &str) -> Vec<(String, String)> {
    qs.trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = decode_component(name);
            if name.is_empty() {
                return None;
            }
            Some((name, decode_component(value)))
        })
        .collect()
}

/// 第一个 `#` 之后的全部内容，不存在时为空
pub fn hash_from_canonical_path(canonical_path: &str) -> &str {
    canonical_path
        .split_once('#')
        .map(|(_, hash)| hash)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_splits_url_parts() {
        let ctx = NavigationContext::parse(
            "/c/test/+/42/1/foo%20bar.txt?tab=checks#b12",
            &RouterConfig::default(),
        );
        assert_eq!(ctx.path, "/c/test/+/42/1/foo%20bar.txt");
        assert_eq!(ctx.querystring, "tab=checks");
        assert_eq!(ctx.hash, "b12");
        assert_eq!(ctx.match_path(), "/c/test/+/42/1/foo bar.txt");
        assert_eq!(ctx.query_param("tab").as_deref(), Some("checks"));
    }

    #[test]
    fn test_parse_strips_base_url() {
        let config = RouterConfig::new("/gerrit");
        let ctx = NavigationContext::parse("/gerrit/q/is:open#x", &config);
        assert_eq!(ctx.canonical_path, "/q/is:open#x");
        assert_eq!(ctx.path, "/q/is:open");

        let ctx = NavigationContext::parse("/gerrit?x=1", &config);
        assert_eq!(ctx.path, "/");
        assert_eq!(ctx.querystring, "x=1");
    }

    #[test]
    fn test_raw_hash_keeps_inner_hashes() {
        let ctx = NavigationContext::parse("/#/c/1/#message-abc", &RouterConfig::default());
        assert_eq!(ctx.raw_hash(), "/c/1/#message-abc");
        assert_eq!(hash_from_canonical_path("/c/1"), "");
    }

    #[test]
    fn test_parse_query_string() {
        assert_eq!(parse_query_string(""), vec![]);
        assert_eq!(parse_query_string("?"), vec![]);
        assert_eq!(parse_query_string("??"), vec![]);
        assert_eq!(parse_query_string("&"), vec![]);
        assert_eq!(parse_query_string("foo"), pairs(&[("foo", "")]));
        assert_eq!(parse_query_string("foo&bar"), pairs(&[("foo", ""), ("bar", "")]));
        assert_eq!(parse_query_string("foo=bar"), pairs(&[("foo", "bar")]));
        assert_eq!(
            parse_query_string("foo=bar&baz"),
            pairs(&[("foo", "bar"), ("baz", "")])
        );
        assert_eq!(
            parse_query_string("foo=bar&baz=bax%20bax"),
            pairs(&[("foo", "bar"), ("baz", "bax bax")])
        );
        assert_eq!(
            parse_query_string("foo=bar&baz=bax+bax"),
            pairs(&[("foo", "bar"), ("baz", "bax bax")])
        );
        assert_eq!(
            parse_query_string("section%201=query+1&=ignored"),
            pairs(&[("section 1", "query 1")])
        );
        assert_eq!(parse_query_string("+"), pairs(&[(" ", "")]));
        assert_eq!(parse_query_string("???+%3d+"), pairs(&[(" = ", "")]));
        assert_eq!(
            parse_query_string("%6e%61%6d%65=%76%61%6c%75%65"),
            pairs(&[("name", "value")])
        );
        assert_eq!(
            parse_query_string("&a=b&&&e=f&c"),
            pairs(&[("a", "b"), ("e", "f"), ("c", "")])
        );
    }

    #[test]
    fn test_hash_from_canonical_path() {
        assert_eq!(hash_from_canonical_path("/foo/bar"), "");
        assert_eq!(hash_from_canonical_path(""), "");
        assert_eq!(hash_from_canonical_path("/foo#bar"), "bar");
        assert_eq!(hash_from_canonical_path("/foo#bar#baz"), "bar#baz");
        assert_eq!(hash_from_canonical_path("#foo#bar#baz"), "foo#bar#baz");
    }
}
