//! 神煞元数据
//!
//! 静态只读表：每个神煞的吉凶属性、类别、重要程度、说明与化解方法。
//! 查询接受“年柱:桃花”这类带柱位前缀的旧式字符串，会先去掉前缀。
//! 未收录的神煞返回“未知”默认记录，不会报错。

use crate::core::models::MarkerKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// 神煞详细信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerDetail {
    /// 神煞名称
    pub name: &'static str,
    /// 吉凶属性
    pub kind: MarkerKind,
    /// 简述
    pub description: &'static str,
    /// 作用
    pub effect: &'static str,
    /// 类别
    pub category: &'static str,
    /// 重要程度 1-10
    pub level: i32,
}

/// 化解方法
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionMethod {
    pub method: &'static str,
    pub items: &'static [&'static str],
    pub timing: &'static str,
    pub precautions: &'static [&'static str],
    /// 有效性 1-10
    pub effectiveness: u8,
}

/// 神煞影响程度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Impact {
    /// 正面影响 0-10
    pub positive: i32,
    /// 负面影响 0-10
    pub negative: i32,
    /// 综合影响 -10 到 10
    pub overall: i32,
    pub description: &'static str,
}

/// 元数据统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataStatistics {
    /// 收录神煞数
    pub total: usize,
    /// 按吉凶属性计数
    pub by_kind: BTreeMap<String, usize>,
    /// 按类别计数
    pub by_category: BTreeMap<String, usize>,
    /// 有化解方法的神煞数
    pub resolvable: usize,
}

const fn detail(
    name: &'static str,
    kind: MarkerKind,
    category: &'static str,
    level: i32,
    description: &'static str,
    effect: &'static str,
) -> MarkerDetail {
    MarkerDetail {
        name,
        kind,
        description,
        effect,
        category,
        level,
    }
}

use crate::core::models::MarkerKind::{Adverse as X, Beneficial as J, Mixed as M};

/// 未收录神煞的默认记录
pub static UNKNOWN_DETAIL: MarkerDetail = MarkerDetail {
    name: "未知",
    kind: MarkerKind::Unknown,
    description: "暂无详细信息",
    effect: "暂无详细信息",
    category: "其他",
    level: 5,
};

static DETAILS: &[MarkerDetail] = &[
    detail("天乙贵人", J, "贵人类", 10, "命中贵人，主得贵人相助", "逢凶化吉，遇难呈祥，多得贵人扶持，事业有成"),
    detail("禄神", J, "财禄类", 9, "天干之禄，主财禄丰厚", "财运亨通，衣食无忧，事业有成，收入稳定"),
    detail("羊刃", X, "刑冲类", 8, "刚强之星，主性格刚烈", "性格急躁，易有血光之灾，但也主武勇，有领导才能"),
    detail("桃花", M, "感情类", 6, "异性缘星，主感情丰富", "异性缘佳，魅力十足，但易有感情纠纷，婚姻波折"),
    detail("华盖", M, "才艺类", 7, "艺术之星，主聪明孤高", "聪明好学，有艺术天赋，宗教缘分深，但性格孤僻，不善交际"),
    detail("文昌", J, "学业类", 8, "文学之星，主聪明好学", "学业有成，文思敏捷，利考试升学，文笔出众"),
    detail("将星", M, "权威类", 7, "权威之星，主领导才能", "有领导才能，权威性强，但易孤独，责任重大"),
    detail("驿马", J, "变动类", 6, "奔波之星，主变动迁移", "多变动，利远行，事业多变化，但也主奔波劳碌"),
    detail("天德", J, "德星类", 9, "天德之星，主逢凶化吉", "逢凶化吉，遇难呈祥，天德护佑，灾难自消"),
    detail("月德", J, "德星类", 8, "月德之星，主品德高尚", "品德高尚，人缘好，逢凶化吉，多得人助"),
    detail("天医", J, "健康类", 7, "医药之星，主健康长寿", "身体健康，长寿，有医药缘分，能治病救人"),
    detail("劫煞", X, "破财类", 7, "劫夺之星，主破财损失", "易破财，多劫夺，投资失利，财来财去"),
    detail("灾煞", X, "灾祸类", 8, "灾难之星，主意外灾祸", "易有意外灾祸，疾病缠身，需注意安全"),
    detail("天刑", X, "刑罚类", 8, "刑罚之星，主官司诉讼", "易有官司诉讼，刑罚之灾，需谨慎行事"),
    detail("孤辰", X, "孤独类", 6, "孤独之星，主孤独无依", "性格孤僻，人际关系差，易孤独终老"),
    detail("寡宿", X, "婚姻类", 6, "寡居之星，主婚姻不利", "婚姻不利，易寡居，感情波折多"),
    detail("魁罡", X, "刚强类", 7, "刚强之星，主性格刚烈", "性格刚烈，有领导才能，但易孤独，婚姻不顺"),
    detail("阴差阳错", X, "婚姻类", 7, "婚姻不顺之星", "婚姻感情容易出现波折，夫妻不和，易有第三者"),
    detail("空亡", X, "虚空类", 8, "虚无空虚之星，主事业不顺", "在时为重，在日次之，主虚无空虚，事业不顺"),
    detail("年空亡", X, "虚空类", 6, "年柱旬空，主祖业根基虚浮", "早年根基不稳，祖荫难靠，宜自立自强"),
    detail("月空亡", X, "虚空类", 6, "月柱旬空，主兄弟父母缘薄", "中年前多奔波，家庭助力有限，凡事需亲力亲为"),
    detail("日空亡", X, "虚空类", 7, "日柱旬空，主自身与配偶宫虚", "自身易感空虚，婚姻宫不实，感情需多经营"),
    detail("时空亡", X, "虚空类", 8, "时柱旬空，主晚景子女缘薄", "空亡在时为重，晚年易感孤寂，子女缘分较浅"),
    detail("命宫空亡", X, "虚空类", 5, "命宫落空，主志向难以落实", "理想多而落地少，宜脚踏实地"),
    detail("身宫空亡", X, "虚空类", 5, "身宫落空，主后天作为受阻", "后天努力见效较慢，需持之以恒"),
    detail("胎元空亡", X, "虚空类", 5, "胎元落空，主先天禀赋偏弱", "体质禀赋偏弱，宜注意保养"),
    detail("太极贵人", J, "贵人类", 9, "地位崇高之星，主事业学术成就", "主地位崇高，于事业学术有卓越成就"),
    detail("金舆", J, "富贵类", 8, "富贵婚姻之星，主得妻财", "主富贵，得妻财，男得贤妻女主富裕"),
    detail("国印贵人", J, "权威类", 8, "权力地位之星，主掌权执政", "逢生旺或吉神相助，有掌权之能"),
    detail("三奇贵人", J, "才能类", 8, "奇才异能之星，主博学多能", "不同凡俗，襟怀卓越，博学多能"),
    detail("福星贵人", J, "福德类", 7, "福气平安之星，主多福多寿", "一生禄禄无缺，多主平安福气"),
    detail("文曲", J, "学业类", 7, "文学才华之星，主文学创作", "文学才华出众，利于文学艺术领域"),
    detail("天德合", J, "德星类", 7, "天德配偶星，主和合团结", "人际关系好，易得他人帮助，生活和谐"),
    detail("学堂词馆", J, "学业类", 8, "学业功名之星，主登科及第", "主学业功名，登科及第"),
    detail("德秀贵人", J, "德才类", 7, "品德才华之星，主内涵充实", "逢凶化吉，内涵充实，才华出众"),
    detail("天喜", J, "喜庆类", 6, "喜庆婚姻之星，主喜事连连", "婚姻美满，容易有喜事"),
    detail("红鸾", M, "感情类", 6, "婚姻姻缘之星，主感情运势", "利于婚姻感情，易遇良缘，也易因情烦恼"),
    detail("红艳", M, "感情类", 5, "艳遇桃花之星，主异性缘", "异性缘好，感情丰富，易因感情烦恼"),
    detail("天姚", M, "感情类", 5, "感情桃花之星，主感情丰富", "感情丰富，异性缘好，易因感情烦恼"),
    detail("十恶大败", X, "败家类", 8, "败家灾祸之星，主败家迹象", "禄地逢空，有败家迹象"),
    detail("解神", J, "化解类", 7, "解除灾难之星，主化解困境", "容易化解灾难困境，逢凶化吉"),
    detail("金神", J, "财富类", 7, "财富权力之星，主富贵显达", "财运好，事业有成，易得财富地位"),
    detail("天空", X, "虚空类", 6, "虚无空虚之星，主事业不顺", "容易感到空虚，事业发展不顺"),
    detail("地劫", X, "劫难类", 6, "劫难灾祸之星，主遭遇劫难", "容易遭遇劫难灾祸，需注意避祸"),
    detail("天哭", X, "情绪类", 5, "悲伤哭泣之星，主情绪不稳", "容易悲伤，情绪不稳，需注意调节"),
    detail("天虚", X, "健康类", 5, "虚弱疾病之星，主身体虚弱", "身体虚弱易病，需注意保养"),
    detail("咸池", M, "艺术类", 6, "感情艺术之星，主艺术天赋", "感情丰富，艺术天赋好，易因感情烦恼"),
    detail("亡神", X, "失去类", 7, "失去死亡之星，主失去重要事物", "为凶主多诡计有官非，为吉主精明有谋"),
    detail("披麻", X, "丧事类", 6, "丧事悲伤之星，主遭遇丧事", "容易遭遇丧事悲伤"),
    detail("吊客", X, "丧事类", 6, "丧事悲伤之星，主吊丧之事", "容易遭遇吊丧之事"),
    detail("丧门", X, "丧事类", 6, "丧事悲伤之星，主遭遇丧事", "容易遭遇丧事，需注意家人健康"),
    detail("元辰", X, "消耗类", 7, "消耗损失之星，主财运不佳", "又名大耗，最怕酒色之灾与无妄之灾"),
    detail("孤鸾煞", X, "婚姻类", 7, "婚姻不顺之星，主夫妻不和", "夫妻感情不好，婚姻不顺，遇吉星可减轻"),
    detail("四废", X, "疾病类", 6, "身弱多病之星，主做事无成", "命遇四废，主身弱多病，做事无成，有始无终"),
    detail("天罗地网", X, "牢狱类", 8, "牢狱疾病之星，主牢狱之灾", "命局或运限逢之，主牢狱疾病之灾"),
    detail("日德", J, "德神类", 7, "仁慈德行之星，主心地善良", "日德主人心地善良，品德高尚，乐善好施"),
    detail("天福", J, "福德类", 6, "天赐福禄之星，主衣食丰足", "一生衣禄不缺，多享清福"),
    detail("天赦", J, "化解类", 7, "赦罪解厄之星，主逢凶化吉", "遇难有救，过失易得宽宥"),
    detail("天恩", J, "福德类", 6, "恩泽之星，主得长辈提携", "多得长辈恩惠，处事顺遂"),
    detail("月德合", J, "德星类", 6, "月德配偶星，主和顺得助", "为人和顺，人缘佳，遇事多得援手"),
    detail("五鬼", X, "灾祸类", 6, "是非小人之星，主口舌暗算", "易招小人是非，需防暗中损耗"),
    detail("白虎", X, "灾祸类", 7, "血光之星，主伤灾意外", "易有伤灾意外，宜注意出行安全"),
    detail("天狗", X, "灾祸类", 6, "破耗之星，主意外损失", "易有意外破耗，需防口舌与伤病"),
    detail("三台", M, "权威类", 5, "台辅之星，主地位名声", "利于声名地位，但需防虚名无实"),
    detail("八座", M, "权威类", 5, "座位之星，主职位权柄", "利于职位升迁，但需防骄矜招忌"),
    detail("童子煞", M, "特殊类", 7, "童子命格，主感情孤独", "主孤独，感情不顺，需化解"),
    detail("将军箭", M, "特殊类", 8, "箭煞临身，主血光之灾", "主血光之灾，需注意安全"),
    detail("太岁", M, "岁运类", 6, "值年岁君，主当年变动", "当年变化较多，吉凶皆有，宜谨慎应对"),
    detail("岁破", X, "岁运类", 7, "冲犯岁君，主当年破耗", "当年易有破耗冲突，宜守不宜攻"),
    detail("大运禄神", J, "财禄类", 8, "大运逢禄，主十年财禄丰厚", "运中财源稳定，事业有成"),
    detail("禄马同乡", J, "财禄类", 8, "禄马同宫，主财官并美", "奔波中得财，动中求财多有成就"),
    detail("福德秀气", J, "福德类", 7, "月令生扶日主，主福德深厚", "根基稳固，福泽绵长"),
    detail("学堂", J, "学业类", 7, "长生学堂，主聪慧好学", "学业顺利，悟性高"),
    detail("词馆", J, "学业类", 7, "临官词馆，主文采出众", "文笔佳，利于文职与考试"),
    detail("财富通门户", J, "财富类", 8, "财星通根透干，主财源广进", "财路通达，易得富贵"),
    detail("年上将星", J, "权威类", 7, "将星临年，主早年得势", "少年有为，得长辈提携，利于掌权"),
    detail("月上文昌", J, "学业类", 7, "文昌临月，主青年学业有成", "求学顺利，利考试与文书之事"),
    detail("时上贵人", J, "贵人类", 8, "时柱逢贵，主晚年得助", "晚景多得贵人扶持，子女有成"),
];

static RESOLUTIONS: &[(&str, ResolutionMethod)] = &[
    ("羊刃", ResolutionMethod {
        method: "佩戴化解物品，修身养性",
        items: &["玉器", "佛珠", "平安符"],
        timing: "日常佩戴",
        precautions: &["控制脾气", "避免冲动", "多行善事"],
        effectiveness: 7,
    }),
    ("桃花", ResolutionMethod {
        method: "正确处理感情，避免滥情",
        items: &["粉水晶", "和合符", "红绳"],
        timing: "感情期间",
        precautions: &["专一感情", "避免暧昧", "正当交往"],
        effectiveness: 6,
    }),
    ("劫煞", ResolutionMethod {
        method: "谨慎理财，避免投机",
        items: &["貔貅", "五帝钱", "聚宝盆"],
        timing: "投资理财时",
        precautions: &["谨慎投资", "避免借贷", "稳健理财"],
        effectiveness: 7,
    }),
    ("魁罡", ResolutionMethod {
        method: "修身养性，积德行善",
        items: &["佛珠", "经书", "善书"],
        timing: "日常修持",
        precautions: &["控制脾气", "多行善事", "避免争斗"],
        effectiveness: 8,
    }),
    ("阴差阳错", ResolutionMethod {
        method: "择吉结婚，和谐相处",
        items: &["和合符", "鸳鸯玉", "红绳"],
        timing: "结婚前后",
        precautions: &["选择良辰吉日", "夫妻和睦", "互相包容"],
        effectiveness: 6,
    }),
    ("空亡", ResolutionMethod {
        method: "充实精神生活，寻找人生目标",
        items: &["水晶", "佛珠", "护身符"],
        timing: "日常佩戴",
        precautions: &["充实精神生活", "寻找人生目标", "多行善事"],
        effectiveness: 6,
    }),
    ("十恶大败", ResolutionMethod {
        method: "积德行善，谨慎理财",
        items: &["护身符", "五帝钱", "聚宝盆"],
        timing: "日常佩戴",
        precautions: &["积德行善", "谨慎理财", "避免投机"],
        effectiveness: 7,
    }),
    ("孤鸾煞", ResolutionMethod {
        method: "择吉结婚，夫妻和睦",
        items: &["和合符", "鸳鸯玉", "红绳"],
        timing: "结婚前后",
        precautions: &["择吉结婚", "夫妻和睦", "互相包容"],
        effectiveness: 6,
    }),
    ("天罗地网", ResolutionMethod {
        method: "谨慎行事，避免官司",
        items: &["护身符", "平安符", "观音像"],
        timing: "日常佩戴",
        precautions: &["谨慎行事", "避免官司", "多行善事"],
        effectiveness: 7,
    }),
    ("元辰", ResolutionMethod {
        method: "节约开支，避免浪费",
        items: &["聚宝盆", "五帝钱", "貔貅"],
        timing: "理财时",
        precautions: &["节约开支", "避免浪费", "谨慎投资"],
        effectiveness: 6,
    }),
    ("日德", ResolutionMethod {
        method: "继续行善积德，保持善心",
        items: &["佛珠", "善书", "慈善证书"],
        timing: "日常修持",
        precautions: &["继续行善", "保持慈悲心", "多做好事"],
        effectiveness: 8,
    }),
    ("童子煞", ResolutionMethod {
        method: "送替身、拜干亲",
        items: &["纸人替身", "红布", "香烛"],
        timing: "农历初一、十五",
        precautions: &["需找专业人士指导", "心诚则灵", "多行善事"],
        effectiveness: 6,
    }),
    ("将军箭", ResolutionMethod {
        method: "制箭、化解",
        items: &["桃木剑", "五帝钱", "护身符"],
        timing: "出生后百日内",
        precautions: &["避免尖锐物品", "注意安全", "定期检查"],
        effectiveness: 6,
    }),
];

/// 去掉“柱位:”前缀
pub fn strip_label(name: &str) -> &str {
    name.split_once(':').map_or(name, |(_, pure)| pure)
}

/// 查找已收录的神煞
pub fn find_detail(name: &str) -> Option<&'static MarkerDetail> {
    let pure = strip_label(name);
    DETAILS.iter().find(|d| d.name == pure)
}

/// 神煞详细信息；未收录时返回默认记录
pub fn marker_detail(name: &str) -> &'static MarkerDetail {
    find_detail(name).unwrap_or(&UNKNOWN_DETAIL)
}

pub fn marker_kind(name: &str) -> MarkerKind {
    marker_detail(name).kind
}

pub fn category(name: &str) -> &'static str {
    marker_detail(name).category
}

/// 影响程度：吉神全计正面，凶神全计负面，吉凶神按六四分
pub fn impact(name: &str) -> Impact {
    let detail = marker_detail(name);
    let (positive, negative) = match detail.kind {
        MarkerKind::Beneficial => (detail.level, 0),
        MarkerKind::Adverse => (0, detail.level),
        MarkerKind::Mixed => (detail.level * 6 / 10, detail.level * 4 / 10),
        MarkerKind::Unknown => (0, 0),
    };
    let overall = positive - negative;

    let description = match overall {
        o if o >= 7 => "影响极为有利",
        o if o >= 4 => "影响较为有利",
        o if o >= 1 => "影响略为有利",
        o if o >= -1 => "影响中性",
        o if o >= -4 => "影响略为不利",
        o if o >= -7 => "影响较为不利",
        _ => "影响极为不利",
    };

    Impact {
        positive,
        negative,
        overall,
        description,
    }
}

/// 化解方法；各柱空亡共用“空亡”的化解方法
pub fn resolution(name: &str) -> Option<&'static ResolutionMethod> {
    let pure = strip_label(name);
    let key = if pure.ends_with("空亡") { "空亡" } else { pure };
    RESOLUTIONS
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, method)| method)
}

/// 全部类别，按首次出现的顺序
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for d in DETAILS {
        if !seen.contains(&d.category) {
            seen.push(d.category);
        }
    }
    seen
}

pub fn markers_in_category(category: &str) -> Vec<&'static str> {
    DETAILS
        .iter()
        .filter(|d| d.category == category)
        .map(|d| d.name)
        .collect()
}

/// 有化解方法的神煞
pub fn resolvable_markers() -> Vec<&'static str> {
    RESOLUTIONS.iter().map(|(n, _)| *n).collect()
}

pub fn all_details() -> &'static [MarkerDetail] {
    DETAILS
}

pub fn statistics() -> MetadataStatistics {
    let mut by_kind = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    for d in DETAILS {
        *by_kind.entry(d.kind.label().to_string()).or_insert(0) += 1;
        *by_category.entry(d.category.to_string()).or_insert(0) += 1;
    }
    MetadataStatistics {
        total: DETAILS.len(),
        by_kind,
        by_category,
        resolvable: RESOLUTIONS.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::definitions::builtin_definitions;
    use std::collections::HashSet;

    #[test]
    fn test_detail_lookup_strips_label() {
        let detail = marker_detail("年柱:天乙贵人");
        assert_eq!(detail.name, "天乙贵人");
        assert_eq!(detail.kind, MarkerKind::Beneficial);
        assert_eq!(detail.level, 10);
    }

    #[test]
    fn test_unknown_default() {
        let detail = marker_detail("不存在的神煞");
        assert_eq!(detail.kind, MarkerKind::Unknown);
        assert_eq!(detail.category, "其他");
        assert_eq!(detail.level, 5);
        assert_eq!(impact("不存在的神煞").overall, 0);
        assert!(find_detail("不存在的神煞").is_none());
    }

    #[test]
    fn test_every_engine_marker_has_detail() {
        for def in builtin_definitions() {
            assert!(find_detail(def.name).is_some(), "缺少元数据: {}", def.name);
        }
        for name in ["年上将星", "月上文昌", "时上贵人", "太岁", "大运禄神"] {
            assert!(find_detail(name).is_some(), "缺少元数据: {}", name);
        }
    }

    #[test]
    fn test_details_are_short_and_complete() {
        for d in DETAILS {
            assert!(!d.description.is_empty() && !d.effect.is_empty(), "{}", d.name);
            assert!(d.effect.chars().count() <= 30, "{}: {}", d.name, d.effect);
            assert!((1..=10).contains(&d.level), "{}", d.name);
        }
    }

    #[test]
    fn test_details_unique() {
        let names: HashSet<_> = DETAILS.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), DETAILS.len());
    }

    #[test]
    fn test_impact_by_kind() {
        assert_eq!(impact("禄神").positive, 9);
        assert_eq!(impact("禄神").negative, 0);
        assert_eq!(impact("羊刃").overall, -8);
        assert_eq!(impact("羊刃").description, "影响极为不利");

        // 华盖 7：正 4 负 2
        let mixed = impact("华盖");
        assert_eq!((mixed.positive, mixed.negative, mixed.overall), (4, 2, 2));
        assert_eq!(mixed.description, "影响略为有利");
    }

    #[test]
    fn test_resolution() {
        assert_eq!(resolution("羊刃").map(|r| r.effectiveness), Some(7));
        assert_eq!(resolution("日柱:日空亡").map(|r| r.items[0]), Some("水晶"));
        assert!(resolution("天乙贵人").is_none());
        assert!(resolvable_markers().contains(&"童子煞"));
    }

    #[test]
    fn test_categories_and_statistics() {
        let cats = categories();
        assert_eq!(cats[0], "贵人类");
        assert!(markers_in_category("丧事类").contains(&"吊客"));

        let stats = statistics();
        assert_eq!(stats.total, DETAILS.len());
        assert_eq!(stats.resolvable, 13);
        assert_eq!(stats.by_kind.values().sum::<usize>(), stats.total);
        assert_eq!(stats.by_category.get("丧事类"), Some(&3));
    }
}
