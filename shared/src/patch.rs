use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{EDIT, PARENT};

// =========================================================
// 补丁集编号 (Patch Set Number)
// =========================================================

/// 补丁集编号
///
/// 除了普通的数字编号外，还有两个特殊取值：
/// - `PARENT`: 变更的父提交，只会出现在 base 一侧
/// - `edit`: 变更编辑（未发布的修改）
///
/// 合并提交的第 N 个父提交用负数表示 (如 `-1`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatchSetNum {
    Parent,
    Edit,
    Num(i32),
}

impl PatchSetNum {
    pub fn is_parent(&self) -> bool {
        matches!(self, PatchSetNum::Parent)
    }
}

impl fmt::Display for PatchSetNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchSetNum::Parent => f.write_str(PARENT),
            PatchSetNum::Edit => f.write_str(EDIT),
            PatchSetNum::Num(n) => write!(f, "{}", n),
        }
    }
}

/// 补丁集编号解析失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPatchSetNum(pub String);

impl fmt::Display for InvalidPatchSetNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid patch set number: {:?}", self.0)
    }
}

impl std::error::Error for InvalidPatchSetNum {}

impl FromStr for PatchSetNum {
    type Err = InvalidPatchSetNum;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PARENT => Ok(PatchSetNum::Parent),
            EDIT => Ok(PatchSetNum::Edit),
            _ => s
                .parse::<i32>()
                .map(PatchSetNum::Num)
                .map_err(|_| InvalidPatchSetNum(s.to_string())),
        }
    }
}

impl TryFrom<String> for PatchSetNum {
    type Error = InvalidPatchSetNum;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatchSetNum> for String {
    fn from(value: PatchSetNum) -> Self {
        value.to_string()
    }
}

impl From<i32> for PatchSetNum {
    fn from(n: i32) -> Self {
        PatchSetNum::Num(n)
    }
}

// =========================================================
// 补丁范围 (Patch Range)
// =========================================================

/// 一次比较所涉及的 (base, patch) 两个补丁集
///
/// 规范形式中 base 与 patch 不相等；相等的组合会被规范化为
/// `{ base: PARENT, patch }`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_patch_num: Option<PatchSetNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_num: Option<PatchSetNum>,
}

impl PatchRange {
    pub fn new(base_patch_num: Option<PatchSetNum>, patch_num: Option<PatchSetNum>) -> Self {
        Self {
            base_patch_num,
            patch_num,
        }
    }

    /// 只指定了目标补丁集的范围
    pub fn patch(patch_num: impl Into<PatchSetNum>) -> Self {
        Self {
            base_patch_num: None,
            patch_num: Some(patch_num.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base_patch_num.is_none() && self.patch_num.is_none()
    }
}
