//! 命盘级特殊神煞
//!
//! 童子煞、将军箭看季节与日、时支，魁罡、阴差阳错看日柱。
//! 这些神煞属于整张命盘而非某一柱。

use crate::core::ganzhi::{Branch, Season};
use crate::core::models::{FourPillarContext, SpecialImpact, SpecialMarkers};
use crate::core::rules;
use crate::core::wuxing::Element;
use std::collections::BTreeMap;

use Branch::*;

/// 日支或时支落在目标地支中
fn day_or_hour_in(chart: &FourPillarContext, targets: &[Branch]) -> bool {
    targets.contains(&chart.day.branch) || targets.contains(&chart.hour.branch)
}

/// 童子煞
///
/// 春秋寅子贵，冬夏卯未辰；金木马卯合，水火鸡犬多；土命逢辰巳，童子定不错。
/// 纳音部分按金木、水火、土的顺序取第一组命中的五行。
pub fn is_tong_zi_sha(chart: &FourPillarContext) -> bool {
    let by_season = match chart.season() {
        Season::Spring | Season::Autumn => day_or_hour_in(chart, &[Yin, Zi]),
        Season::Summer | Season::Winter => day_or_hour_in(chart, &[Mao, Wei, Chen]),
    };
    if by_season {
        return true;
    }

    let elements: Vec<Element> = [chart.year.nayin(), chart.day.nayin()]
        .into_iter()
        .flatten()
        .map(|n| n.element)
        .collect();
    let has = |group: &[Element]| elements.iter().any(|e| group.contains(e));

    if has(&[Element::Metal, Element::Wood]) {
        day_or_hour_in(chart, &[Wu, Mao])
    } else if has(&[Element::Water, Element::Fire]) {
        day_or_hour_in(chart, &[You, Xu])
    } else if has(&[Element::Earth]) {
        day_or_hour_in(chart, &[Chen, Si])
    } else {
        false
    }
}

/// 将军箭：春酉戌辰、夏未卯子、秋寅申午、冬巳亥丑
pub fn is_jiang_jun_jian(chart: &FourPillarContext) -> bool {
    let targets: [Branch; 3] = match chart.season() {
        Season::Spring => [You, Xu, Chen],
        Season::Summer => [Wei, Mao, Zi],
        Season::Autumn => [Yin, Shen, Wu],
        Season::Winter => [Si, Hai, Chou],
    };
    day_or_hour_in(chart, &targets)
}

/// 识别命盘级特殊神煞
pub fn detect(chart: &FourPillarContext) -> SpecialMarkers {
    let tong_zi_sha = is_tong_zi_sha(chart);
    let jiang_jun_jian = is_jiang_jun_jian(chart);
    let kui_gang = rules::is_kui_gang(chart.day.stem, chart.day.branch);
    let yin_cha_yang_cuo = rules::is_yin_cha_yang_cuo(chart.day.stem, chart.day.branch);

    let mut markers = Vec::new();
    let mut details = BTreeMap::new();
    let mut push = |hit: bool, name: &str, detail: &str| {
        if hit {
            markers.push(name.to_string());
            details.insert(name.to_string(), detail.to_string());
        }
    };
    push(tong_zi_sha, "童子煞", "主孤独，感情不顺，需化解");
    push(jiang_jun_jian, "将军箭", "主血光之灾，需注意安全");
    push(kui_gang, "魁罡", "主性格刚烈，有领导才能，但易孤独");
    push(yin_cha_yang_cuo, "阴差阳错", "主婚姻不顺，感情波折");

    SpecialMarkers {
        tong_zi_sha,
        jiang_jun_jian,
        kui_gang,
        yin_cha_yang_cuo,
        markers,
        details,
    }
}

/// 评估特殊神煞的综合影响
pub fn assess(special: &SpecialMarkers) -> SpecialImpact {
    let mut impact = SpecialImpact::default();
    let entries = [
        (special.tong_zi_sha, 7, "感情婚姻方面需特别注意", "建议进行童子煞化解"),
        (special.jiang_jun_jian, 8, "健康安全方面需格外小心", "建议进行将军箭化解"),
        (special.kui_gang, 5, "性格过于刚烈，人际关系需注意", "建议修身养性，控制脾气"),
        (special.yin_cha_yang_cuo, 6, "婚姻感情容易出现波折", "建议择吉结婚，夫妻和睦"),
    ];
    for (hit, weight, concern, recommendation) in entries {
        if hit {
            impact.total_impact += weight;
            impact.concerns.push(concern.to_string());
            impact.recommendations.push(recommendation.to_string());
        }
    }

    impact.urgency = match impact.total_impact {
        t if t >= 15 => "高度关注",
        t if t >= 10 => "中度关注",
        t if t >= 5 => "适度关注",
        _ => "无需特别关注",
    }
    .to_string();
    impact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(year: &str, month: &str, day: &str, hour: &str) -> FourPillarContext {
        FourPillarContext::parse(year, month, day, hour).unwrap()
    }

    #[test]
    fn test_tong_zi_sha_by_season() {
        // 寅月为春，日支子
        assert!(is_tong_zi_sha(&chart("甲子", "丙寅", "壬子", "辛亥")));
    }

    #[test]
    fn test_tong_zi_sha_by_nayin() {
        // 午月为夏，日支酉、时支午皆不在卯未辰；
        // 年甲子海中金，金木看午卯，时支午命中
        assert!(is_tong_zi_sha(&chart("甲子", "庚午", "癸酉", "庚午")));
        // 同一命盘换成亥时则不命中
        assert!(!is_tong_zi_sha(&chart("甲子", "庚午", "癸酉", "癸亥")));
    }

    #[test]
    fn test_jiang_jun_jian() {
        // 春季见酉
        assert!(is_jiang_jun_jian(&chart("甲子", "丙寅", "癸酉", "壬子")));
        // 显式季节优先于月支
        let c = chart("甲子", "丙寅", "癸酉", "壬子").with_season(Season::Autumn);
        assert!(!is_jiang_jun_jian(&c));
    }

    #[test]
    fn test_detect_and_assess() {
        // 庚戌日魁罡；寅月春见戌为将军箭
        let special = detect(&chart("甲子", "丙寅", "庚戌", "丙子"));
        assert!(special.kui_gang);
        assert!(special.jiang_jun_jian);
        assert!(special.details.contains_key("魁罡"));

        let impact = assess(&special);
        assert!(impact.total_impact >= 13);
        assert_eq!(impact.concerns.len(), special.markers.len());
    }

    #[test]
    fn test_assess_urgency_bands() {
        let none = assess(&SpecialMarkers::default());
        assert_eq!(none.total_impact, 0);
        assert_eq!(none.urgency, "无需特别关注");

        let kui_gang = SpecialMarkers {
            kui_gang: true,
            ..Default::default()
        };
        assert_eq!(assess(&kui_gang).urgency, "适度关注");

        let heavy = SpecialMarkers {
            tong_zi_sha: true,
            jiang_jun_jian: true,
            ..Default::default()
        };
        let impact = assess(&heavy);
        assert_eq!(impact.total_impact, 15);
        assert_eq!(impact.urgency, "高度关注");
    }
}
