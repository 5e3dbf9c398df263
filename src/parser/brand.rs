//! Brand name canonicalization.
//!
//! Vendors write brand names as pure Chinese ("九阳"), pure Latin ("Apple"),
//! or as a combined pair in either order ("九阳（Joyoung）", "Apple/苹果").
//! Whenever both scripts are recoverable the catalog stores the combined
//! form in one fixed order: `"Chinese/Latin"`.

use regex::Regex;
use std::sync::LazyLock;

use super::text::contains_cjk;

/// "English/中文" brand field, Latin first.
static BRAND_SLASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9\s&]+)/\s*([\u{4e00}-\u{9fa5}]+)")
        .expect("valid brand slash regex")
});

/// "中文（English）" brand field, Chinese first with a parenthesized Latin part.
static BRAND_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\u{4e00}-\u{9fa5}]+)[（(]([A-Za-z][A-Za-z0-9\s&]+)[）)]")
        .expect("valid brand paren regex")
});

/// Leading "Latin/中文…" prefix of a product title.
static TITLE_SLASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Za-z0-9\s&]+)/\s*[\u{4e00}-\u{9fa5}]+")
        .expect("valid title slash regex")
});

/// Leading "中文（Latin）…" prefix of a product title.
static TITLE_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\u{4e00}-\u{9fa5}]+[（(]([A-Z][A-Za-z0-9\s&]+)[）)]")
        .expect("valid title paren regex")
});

/// Canonicalizes a structured-feed brand field.
///
/// The field may already combine both scripts in either order; when it is
/// pure Chinese, a Latin counterpart is recovered from the title prefix when
/// one exists there. Returns `None` when nothing at all is recoverable.
pub fn canonicalize_feed_brand(raw: &str, title: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (chinese, latin) = if let Some(caps) = BRAND_SLASH_RE.captures(raw) {
        (
            caps[2].trim().to_string(),
            Some(caps[1].trim().to_string()),
        )
    } else if let Some(caps) = BRAND_PAREN_RE.captures(raw) {
        (
            caps[1].trim().to_string(),
            Some(caps[2].trim().to_string()),
        )
    } else if contains_cjk(raw) {
        // Pure Chinese field: the Latin half, if any, lives in the title
        (raw.to_string(), latin_prefix_from_title(title))
    } else {
        // Pure Latin field, nothing to pair it with
        return Some(raw.to_string());
    };

    match latin {
        Some(latin) if !latin.is_empty() => Some(format!("{}/{}", chinese, latin)),
        _ => Some(chinese),
    }
}

/// Recovers a Latin brand token from the leading characters of a title.
fn latin_prefix_from_title(title: &str) -> Option<String> {
    if let Some(caps) = TITLE_SLASH_RE.captures(title) {
        return Some(caps[1].trim().to_string());
    }
    TITLE_PAREN_RE
        .captures(title)
        .map(|caps| caps[1].trim().to_string())
}

/// Canonicalizes a "X/Y" brand parameter value from a parameters block.
///
/// Classifies each side by script (CJK content versus a capitalized Latin
/// token) and re-emits the pair in `"Chinese/Latin"` order. Values whose
/// structure is not recognized pass through untouched.
pub fn canonicalize_pair(raw: &str) -> String {
    let raw = raw.trim();
    let Some((left, right)) = raw.split_once('/') else {
        return raw.to_string();
    };

    let left = left.trim();
    let right = right.trim();
    let latin_leading = |s: &str| s.chars().next().is_some_and(|c| c.is_ascii_uppercase());

    if contains_cjk(left) && !contains_cjk(right) && latin_leading(right) {
        format!("{}/{}", left, right)
    } else if contains_cjk(right) && !contains_cjk(left) && latin_leading(left) {
        format!("{}/{}", right, left)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod succeeds {
        use super::*;

        #[test]
        fn test_feed_brand_chinese_paren_format() {
            let brand = canonicalize_feed_brand("九阳（Joyoung）", "Product");
            assert_eq!(brand.as_deref(), Some("九阳/Joyoung"));
        }

        #[test]
        fn test_feed_brand_ascii_paren_format() {
            let brand = canonicalize_feed_brand("九阳(Joyoung)", "Product");
            assert_eq!(brand.as_deref(), Some("九阳/Joyoung"));
        }

        #[test]
        fn test_feed_brand_latin_slash_format_is_reordered() {
            let brand = canonicalize_feed_brand("Apple/苹果", "Product");
            assert_eq!(brand.as_deref(), Some("苹果/Apple"));
        }

        #[test]
        fn test_feed_brand_latin_recovered_from_title_slash() {
            let brand = canonicalize_feed_brand("苹果", "Apple/苹果 iPhone 15");
            assert_eq!(brand.as_deref(), Some("苹果/Apple"));
        }

        #[test]
        fn test_feed_brand_latin_recovered_from_title_paren() {
            let brand = canonicalize_feed_brand("三星", "三星（SAMSUNG）Galaxy 手机");
            assert_eq!(brand.as_deref(), Some("三星/SAMSUNG"));
        }

        #[test]
        fn test_feed_brand_pure_chinese_without_latin() {
            let brand = canonicalize_feed_brand("华佗", "针灸针无菌专用针");
            assert_eq!(brand.as_deref(), Some("华佗"));
        }

        #[test]
        fn test_feed_brand_pure_latin() {
            let brand = canonicalize_feed_brand("Apple", "iPhone 15");
            assert_eq!(brand.as_deref(), Some("Apple"));
        }

        #[test]
        fn test_pair_latin_first_is_reordered() {
            assert_eq!(canonicalize_pair("Colgate/高露洁"), "高露洁/Colgate");
            assert_eq!(
                canonicalize_pair("SANXINGDUI MUSEUM/三星堆博物馆"),
                "三星堆博物馆/SANXINGDUI MUSEUM"
            );
        }

        #[test]
        fn test_pair_chinese_first_is_kept() {
            assert_eq!(canonicalize_pair("高露洁/Colgate"), "高露洁/Colgate");
        }

        #[test]
        fn test_pair_unrecognized_structure_passes_through() {
            assert_eq!(canonicalize_pair("洁银组合-12/16"), "洁银组合-12/16");
            assert_eq!(canonicalize_pair("TestBrand"), "TestBrand");
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_feed_brand_empty_field() {
            assert_eq!(canonicalize_feed_brand("", "Product"), None);
            assert_eq!(canonicalize_feed_brand("   ", "Product"), None);
        }
    }
}
