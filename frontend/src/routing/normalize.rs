//! 参数规范化

use patchview_shared::{PatchRange, PatchSetNum};

/// 规范化补丁范围
///
/// 返回 `true` 表示参数被改写为与 URL 不同的规范形式，调用方应重新生成
/// URL 并重定向，而不是直接发布参数。
///
/// - base 缺失：不做改动
/// - base 与 patch 相同：base 改为 `PARENT`，需要重定向
/// - 只有 base：URL 中单独的补丁集落在 base 位置，移到 patch 并把 base 设为 `PARENT`
pub fn normalize_patch_range(range: &mut PatchRange) -> bool {
    let Some(base) = range.base_patch_num else {
        return false;
    };

    match range.patch_num {
        Some(patch) if patch == base => {
            range.base_patch_num = Some(PatchSetNum::Parent);
            true
        }
        None => {
            range.patch_num = Some(base);
            range.base_patch_num = Some(PatchSetNum::Parent);
            false
        }
        Some(_) => false,
    }
}

/// 锚点中的行号地址，如 `44`、`b44`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAddress {
    pub line_num: u32,
    pub left_side: bool,
}

/// 解析 `[ab]?\d+` 形式的行号地址，其余输入返回 `None`
pub fn parse_line_address(hash: &str) -> Option<LineAddress> {
    let (left_side, digits) = match hash.strip_prefix(['a', 'b']) {
        Some(rest) => (true, rest),
        None => (false, hash),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let line_num = digits.parse().ok()?;
    Some(LineAddress {
        line_num,
        left_side,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn num(n: i32) -> Option<PatchSetNum> {
        Some(PatchSetNum::Num(n))
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(-1)]
    fn test_equal_range_collapses_to_parent(#[case] n: i32) {
        let mut range = PatchRange::new(num(n), num(n));
        assert!(normalize_patch_range(&mut range));
        assert_eq!(range, PatchRange::new(Some(PatchSetNum::Parent), num(n)));
    }

    #[test]
    fn test_equal_edit_range_collapses_to_parent() {
        let mut range = PatchRange::new(Some(PatchSetNum::Edit), Some(PatchSetNum::Edit));
        assert!(normalize_patch_range(&mut range));
        assert_eq!(range.base_patch_num, Some(PatchSetNum::Parent));
        assert_eq!(range.patch_num, Some(PatchSetNum::Edit));
    }

    #[rstest]
    #[case(None)]
    #[case(num(7))]
    #[case(Some(PatchSetNum::Edit))]
    fn test_absent_base_is_untouched(#[case] patch: Option<PatchSetNum>) {
        let mut range = PatchRange::new(None, patch);
        assert!(!normalize_patch_range(&mut range));
        assert_eq!(range, PatchRange::new(None, patch));
    }

    #[test]
    fn test_lone_base_moves_to_patch() {
        let mut range = PatchRange::new(num(4), None);
        assert!(!normalize_patch_range(&mut range));
        assert_eq!(range, PatchRange::new(Some(PatchSetNum::Parent), num(4)));
    }

    #[test]
    fn test_distinct_range_is_canonical() {
        let mut range = PatchRange::new(num(5), num(10));
        assert!(!normalize_patch_range(&mut range));
        assert_eq!(range, PatchRange::new(num(5), num(10)));
    }

    #[rstest]
    #[case("")]
    #[case("foobar")]
    #[case("foo123")]
    #[case("123bar")]
    #[case("c12")]
    #[case("b")]
    fn test_invalid_line_address(#[case] hash: &str) {
        assert_eq!(parse_line_address(hash), None);
    }

    #[rstest]
    #[case("1234", 1234, false)]
    #[case("a4", 4, true)]
    #[case("b77", 77, true)]
    fn test_line_address(#[case] hash: &str, #[case] line_num: u32, #[case] left_side: bool) {
        assert_eq!(
            parse_line_address(hash),
            Some(LineAddress {
                line_num,
                left_side
            })
        );
    }
}
