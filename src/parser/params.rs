//! Parameters-block extraction for marketplace listings.
//!
//! Marketplace pages carry a "参数信息" section listing product attributes
//! as alternating lines. Vendors are split between two layouts, KEY then
//! VALUE and VALUE then KEY, and a single listing can even switch layout
//! partway through. Detection works against a fixed vocabulary of known
//! parameter keys:
//!
//! 1. Two consecutive known keys mark the exact index where the ordering
//!    flips from VALUE-KEY to KEY-VALUE.
//! 2. Otherwise, the more frequent pair shape across the block decides one
//!    global ordering.
//! 3. Unknown lines in KEY position fall back to the shorter-string-is-the-
//!    key heuristic.
//!
//! The whole procedure is best effort. Short blocks are inherently ambiguous
//! and the heuristics make no stronger guarantee than "usually right".

/// Marker line opening the parameters section.
pub const PARAMETERS_MARKER: &str = "参数信息";

/// Suffix shared by marketplace section headers ("…信息"); the first such
/// line after the marker ends the block.
const SECTION_SUFFIX: &str = "信息";

/// Known parameter keys seen across marketplace categories.
const KNOWN_KEYS: [&str; 61] = [
    "品牌",
    "产地",
    "型号",
    "规格",
    "颜色分类",
    "材质",
    "款式",
    "货号",
    "大小",
    "适用年龄段",
    "功能",
    "包装",
    "包装规格",
    "系列",
    "省份",
    "城市",
    "规格描述",
    "是否进口",
    "总净含量",
    "生产许可证编号",
    "厂名",
    "厂址",
    "厂家联系方式",
    "配料表",
    "保质期",
    "净含量",
    "成分",
    "特性",
    "用途",
    "特殊添加成分",
    "适用对象",
    "流行元素",
    "风格",
    "元素年代",
    "套件种类",
    "适用空间",
    "个数",
    "适用场景",
    "适用群体",
    "单件净含量",
    "酒精度数",
    "香型",
    "包装方式",
    "售卖规格",
    "生产企业",
    "贴膜特点",
    "贴膜工艺",
    "适用手机型号",
    "适用品牌",
    "适用机型",
    "屏幕尺寸",
    "颜色",
    "容量",
    "版本",
    "套餐",
    "尺码",
    "重量",
    "产品名称",
    "适用性别",
    "适用季节",
    "生产日期",
];

/// Whether a line is a member of the known parameter-key vocabulary.
pub fn is_known_key(line: &str) -> bool {
    KNOWN_KEYS.contains(&line)
}

/// Layout decision for a parameters block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockOrder {
    /// VALUE-KEY up to the index, KEY-VALUE from it on
    FlipAt(usize),
    /// The whole block is VALUE then KEY
    AllValueKey,
    /// The whole block is KEY then VALUE
    AllKeyValue,
}

/// Slice of lines forming the parameters block, without the marker itself.
///
/// The block runs from the line after the marker to the next section header
/// (a line ending in "信息" that is not another parameters marker) or the
/// end of the text.
pub fn extract_block<'a>(lines: &[&'a str]) -> Option<Vec<&'a str>> {
    let start = lines.iter().position(|line| *line == PARAMETERS_MARKER)? + 1;
    let mut end = lines.len();
    for (offset, line) in lines[start..].iter().enumerate() {
        if *line != PARAMETERS_MARKER && line.ends_with(SECTION_SUFFIX) {
            end = start + offset;
            break;
        }
    }
    Some(lines[start..end].to_vec())
}

fn detect_order(block: &[&str]) -> BlockOrder {
    // Two consecutive known keys pinpoint the layout switch: the first is
    // the trailing KEY of the VALUE-KEY region, the second opens KEY-VALUE.
    for j in 0..block.len().saturating_sub(1) {
        if is_known_key(block[j]) && is_known_key(block[j + 1]) {
            return BlockOrder::FlipAt(j + 1);
        }
    }

    // No switch signal: vote over non-overlapping pairs.
    let mut value_key = 0usize;
    let mut key_value = 0usize;
    let mut j = 0;
    while j + 1 < block.len() {
        let first = is_known_key(block[j]);
        let second = is_known_key(block[j + 1]);
        if !first && second {
            value_key += 1;
        } else if first && !second {
            key_value += 1;
        }
        j += 2;
    }

    if value_key > key_value {
        BlockOrder::AllValueKey
    } else {
        BlockOrder::AllKeyValue
    }
}

/// Parses a parameters block into ordered key/value pairs.
///
/// A trailing line without a partner is dropped.
pub fn parse_block(block: &[&str]) -> Vec<(String, String)> {
    let order = detect_order(block);
    let flip = match order {
        BlockOrder::FlipAt(index) => index,
        BlockOrder::AllValueKey => block.len(),
        BlockOrder::AllKeyValue => 0,
    };

    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < block.len() {
        let current = block[i];
        let next = block[i + 1];

        if i < flip {
            // VALUE-KEY region
            pairs.push((next.to_string(), current.to_string()));
        } else if is_known_key(current) {
            pairs.push((current.to_string(), next.to_string()));
        } else if matches!(order, BlockOrder::FlipAt(_)) {
            // An explicit switch was seen; trust positional ordering even
            // for keys outside the vocabulary
            pairs.push((current.to_string(), next.to_string()));
        } else if current.chars().count() <= next.chars().count() {
            pairs.push((current.to_string(), next.to_string()));
        } else {
            pairs.push((next.to_string(), current.to_string()));
        }

        i += 2;
    }

    pairs
}

/// Flattens parsed pairs into the newline-joined "key: value" form stored
/// as the product specification.
pub fn pairs_to_specification(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}
