//! 路由模式匹配
//!
//! 每条路由的模式都是带命名捕获组的正则表达式，注册时编译一次并校验
//! 处理函数读取的捕获名都真实存在。

use std::collections::HashMap;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use super::encoding::decode_component;
use crate::error::{Result, RouteError};

/// 单条路由正则编译后的大小上限
const MAX_PATTERN_REGEX_SIZE: usize = 1 << 20;

/// 编译后的路由模式
#[derive(Debug, Clone)]
pub struct RoutePattern {
    route: &'static str,
    regex: Regex,
}

impl RoutePattern {
    /// 编译模式并校验 `required` 中的捕获名都在模式中定义
    pub fn new(route: &'static str, pattern: &str, required: &[&'static str]) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .size_limit(MAX_PATTERN_REGEX_SIZE)
            .build()
            .map_err(|source| RouteError::InvalidPattern { route, source })?;

        for &name in required {
            if !regex.capture_names().flatten().any(|n| n == name) {
                return Err(RouteError::UndeclaredCapture { route, name });
            }
        }

        Ok(Self { route, regex })
    }

    /// 对（已解码一次的）路径进行匹配
    ///
    /// 每个参与匹配的命名组会再解码一次；未参与匹配的可选组不出现在结果中。
    pub fn captures(&self, path: &str) -> Option<Captures> {
        let caps = self.regex.captures(path)?;
        let values = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_string(), decode_component(m.as_str())))
            })
            .collect();

        Some(Captures {
            route: self.route,
            values,
        })
    }
}

// =========================================================
// 捕获结果
// =========================================================

/// 一次匹配得到的命名捕获值（已解码）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    route: &'static str,
    values: HashMap<String, String>,
}

impl Captures {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// 读取必需的捕获值
    pub fn require(&self, name: &'static str) -> Result<&str> {
        self.get(name).ok_or(RouteError::MissingCapture {
            route: self.route,
            name,
        })
    }

    /// 读取并解析必需的捕获值
    pub fn parse<T: FromStr>(&self, name: &'static str) -> Result<T> {
        let raw = self.require(name)?;
        raw.parse().map_err(|_| RouteError::InvalidCapture {
            route: self.route,
            name,
            value: raw.to_string(),
        })
    }

    /// 读取并解析可选的捕获值；空字符串视为缺失
    pub fn parse_opt<T: FromStr>(&self, name: &'static str) -> Result<Option<T>> {
        match self.get(name) {
            None | Some("") => Ok(None),
            Some(_) => self.parse(name).map(Some),
        }
    }

    /// 可选数值参数，缺失时为 0
    pub fn offset(&self, name: &'static str) -> Result<u32> {
        Ok(self.parse_opt(name)?.unwrap_or(0))
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(route: &'static str, pairs: &[(&str, &str)]) -> Self {
        Self {
            route,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
