//! Recommended keyword catalogue
//!
//! Ten fixed categories of single- and multi-character literals that can be
//! searched with one selection. Category and keyword order is display order.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const PRESET_CATEGORIES: [PresetCategory; 10] = [
    PresetCategory {
        name: "행동",
        keywords: &[
            "馬", "至", "自", "見", "入", "登", "觀", "抵", "聲", "到", "舞", "宿", "回", "得", "過", "作",
            "關", "進", "歷", "渡", "絶", "來", "出", "樂", "于", "流", "坐", "知", "飯", "歸", "起", "騎",
            "成", "能", "望", "還", "會", "立", "蓋", "往", "步", "勝", "開", "許", "連", "移", "產", "宣",
            "待", "將", "復", "送", "傳", "統", "應", "付", "解", "落", "換", "駈", "借", "留", "張", "中火",
            "朝發", "飯後", "出門", "問", "渡江", "來謁", "蒙人", "行", "寒食", "意", "從", "看", "梯", "經",
            "稱",
        ],
    },
    PresetCategory {
        name: "상태",
        keywords: &[
            "相", "如", "有", "中", "餘", "可", "小", "皆", "與", "安", "高", "未", "邊", "間", "淸", "和",
            "殘", "無", "恶", "長", "非", "際", "常", "大", "奇",
        ],
    },
    PresetCategory {
        name: "자연물",
        keywords: &["山", "日", "城", "風", "嶺", "鳳", "石", "水", "月", "河", "木", "竹", "花", "林", "草", "鳥"],
    },
    PresetCategory {
        name: "인공물",
        keywords: &[
            "家", "門", "里", "所", "店", "亭", "館", "境", "塔", "庭", "坊", "衙", "寺", "會", "省", "業", "碑",
        ],
    },
    PresetCategory {
        name: "숫자",
        keywords: &["二", "十", "三", "五", "四", "百", "七", "二十", "六十", "十餘", "四十", "數", "萬"],
    },
    PresetCategory {
        name: "위치",
        keywords: &["前", "後", "上", "下", "東", "西", "南", "北", "左", "右", "之間", "上有", "里許"],
    },
    PresetCategory {
        name: "시간",
        keywords: &["午", "書", "朝", "夜", "晩晴", "時", "今", "早", "晝"],
    },
    PresetCategory {
        name: "날씨",
        keywords: &["晴", "雪", "寒", "風甚", "雨", "霧"],
    },
    PresetCategory {
        name: "물건",
        keywords: &["劍", "衣", "角", "子", "紙", "金", "畫", "玉", "茶", "唐", "令", "盤", "書", "戴", "字"],
    },
    PresetCategory {
        name: "교유",
        keywords: &["客", "詩", "員", "社", "朋友"],
    },
];

/// Look up a category by its name.
pub fn find_category(name: &str) -> Option<&'static PresetCategory> {
    let name = name.trim();
    PRESET_CATEGORIES.iter().find(|c| c.name == name)
}

/// Resolve a preset by category name and 1-based position.
pub fn preset_keyword(category: &str, position: usize) -> Option<&'static str> {
    let category = find_category(category)?;
    position.checked_sub(1).and_then(|i| category.keywords.get(i)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_shape() {
        assert_eq!(PRESET_CATEGORIES.len(), 10);
        assert_eq!(PRESET_CATEGORIES[0].name, "행동");
        assert_eq!(PRESET_CATEGORIES[9].name, "교유");
        assert!(PRESET_CATEGORIES.iter().all(|c| !c.keywords.is_empty()));
        assert!(
            PRESET_CATEGORIES
                .iter()
                .flat_map(|c| c.keywords.iter())
                .all(|k| !k.trim().is_empty())
        );
    }

    #[test]
    fn test_preset_keyword_lookup() {
        assert_eq!(preset_keyword("행동", 1), Some("馬"));
        assert_eq!(preset_keyword("교유", 5), Some("朋友"));
        assert_eq!(preset_keyword(" 날씨 ", 4), Some("風甚"));
        assert_eq!(preset_keyword("날씨", 0), None);
        assert_eq!(preset_keyword("날씨", 7), None);
        assert_eq!(preset_keyword("없음", 1), None);
    }
}
