//! 神煞分析与评分
//!
//! 汇总四柱神煞，按元数据分吉凶、算强度、查组合，并生成文字报告。
//! 除调用计算引擎外，所有函数都是输入到输出的纯变换。

use crate::core::models::{
    AggregatedProfile, CombinationEffect, CombinationHit, CombinationResult, FourPillarContext,
    MarkerKind, PillarLabel, PillarMarker, PillarMarkerSet, ScoreResult, ScoringConfig,
};
use crate::core::rule_engine::CalculationEngine;
use crate::core::{rules, special};
use crate::storage::metadata;
use std::collections::{BTreeMap, BTreeSet};

/// 年柱专属：日支三合的将星落在年支
pub const YEAR_GENERAL: &str = "年上将星";

/// 月柱专属：日干文昌落在月支
pub const MONTH_LITERARY: &str = "月上文昌";

/// 时柱专属：日干贵人落在时支
pub const HOUR_NOBLE: &str = "时上贵人";

/// 已知神煞组合
struct CombinationRule {
    first: &'static str,
    second: &'static str,
    effect: CombinationEffect,
    description: &'static str,
    recommendation: Option<&'static str>,
}

const COMBINATIONS: &[CombinationRule] = &[
    CombinationRule {
        first: "天乙贵人",
        second: "文昌",
        effect: CombinationEffect::Synergy,
        description: "天乙贵人配文昌，学业事业双丰收",
        recommendation: None,
    },
    CombinationRule {
        first: "禄神",
        second: "天德",
        effect: CombinationEffect::Synergy,
        description: "禄神配天德，财运亨通且品德高尚",
        recommendation: None,
    },
    CombinationRule {
        first: "羊刃",
        second: "劫煞",
        effect: CombinationEffect::Conflict,
        description: "羊刃配劫煞，易有血光破财之灾",
        recommendation: Some("建议佩戴化解物品，控制脾气"),
    },
    CombinationRule {
        first: "桃花",
        second: "阴差阳错",
        effect: CombinationEffect::Conflict,
        description: "桃花配阴差阳错，感情波折较多",
        recommendation: Some("建议专一感情，择吉结婚"),
    },
];

/// 分析服务
pub struct AnalysisService<'a> {
    engine: &'a CalculationEngine,
    scoring: ScoringConfig,
    /// 不读本柱干支的神煞，只记在日柱
    chart_level: BTreeSet<&'static str>,
}

impl<'a> AnalysisService<'a> {
    pub fn new(engine: &'a CalculationEngine) -> Self {
        let chart_level = engine
            .definitions()
            .iter()
            .filter(|def| !def.input.reads_pillar())
            .map(|def| def.name)
            .collect();
        Self {
            engine,
            scoring: ScoringConfig::default(),
            chart_level,
        }
    }

    /// 使用自定义评级阈值
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// 单柱神煞；命盘级神煞只记在日柱，年、月、时柱另加本柱专属神煞
    pub fn pillar_markers(&self, chart: &FourPillarContext, label: PillarLabel) -> Vec<String> {
        let Some(ctx) = chart.pillar_context(label) else {
            return Vec::new();
        };
        let mut markers = self.engine.calculate_markers(&ctx);
        if label != PillarLabel::Day {
            markers.retain(|name| !self.chart_level.contains(name.as_str()));
        }
        if let Some(name) = pillar_exclusive_marker(chart, label) {
            markers.push(name.to_string());
            markers.sort();
            markers.dedup();
        }
        markers
    }

    /// 四柱综合分析
    pub fn analyze_chart(&self, chart: &FourPillarContext) -> AggregatedProfile {
        let per_pillar: Vec<PillarMarkerSet> = PillarLabel::NATAL
            .into_iter()
            .map(|pillar| PillarMarkerSet {
                pillar,
                markers: self.pillar_markers(chart, pillar),
            })
            .collect();

        let all_markers: Vec<PillarMarker> = per_pillar
            .iter()
            .flat_map(|set| set.markers.iter().map(|name| PillarMarker::new(set.pillar, name.as_str())))
            .collect();

        let mut beneficial = Vec::new();
        let mut adverse = Vec::new();
        let mut mixed = Vec::new();
        let mut unknown = Vec::new();
        let mut category_breakdown: BTreeMap<String, Vec<PillarMarker>> = BTreeMap::new();

        for marker in &all_markers {
            let detail = metadata::marker_detail(&marker.name);
            match detail.kind {
                MarkerKind::Beneficial => beneficial.push(marker.clone()),
                MarkerKind::Adverse => adverse.push(marker.clone()),
                MarkerKind::Mixed => mixed.push(marker.clone()),
                MarkerKind::Unknown => unknown.push(marker.clone()),
            }
            category_breakdown
                .entry(detail.category.to_string())
                .or_default()
                .push(marker.clone());
        }

        let names: Vec<&str> = all_markers.iter().map(|m| m.name.as_str()).collect();
        let strength = calculate_strength(&names, &self.scoring);
        let special = special::detect(chart);

        tracing::debug!(
            "命盘分析完成: 吉 {} 凶 {} 吉凶 {} 未知 {}, 综合得分 {}",
            beneficial.len(),
            adverse.len(),
            mixed.len(),
            unknown.len(),
            strength.total_score
        );

        AggregatedProfile {
            chart_id: chart.chart_id(),
            all_markers,
            per_pillar,
            beneficial,
            adverse,
            mixed,
            unknown,
            strength,
            category_breakdown,
            special,
        }
    }
}

/// 本柱专属神煞，日柱与运限柱没有
pub fn pillar_exclusive_marker(chart: &FourPillarContext, label: PillarLabel) -> Option<&'static str> {
    match label {
        PillarLabel::Year => {
            rules::is_jiang_xing(chart.day.branch, chart.year.branch).then_some(YEAR_GENERAL)
        }
        PillarLabel::Month => {
            rules::is_wen_chang(chart.day.stem, chart.month.branch).then_some(MONTH_LITERARY)
        }
        PillarLabel::Hour => {
            rules::is_tian_yi_gui_ren(chart.day.stem, chart.hour.branch).then_some(HOUR_NOBLE)
        }
        PillarLabel::Day | PillarLabel::Cycle(_) => None,
    }
}

/// 强度评分：累加每个神煞的正负影响，再按阈值定级
pub fn calculate_strength<S: AsRef<str>>(markers: &[S], scoring: &ScoringConfig) -> ScoreResult {
    let (beneficial_score, adverse_score) = markers.iter().fold((0, 0), |(pos, neg), m| {
        let impact = metadata::impact(m.as_ref());
        (pos + impact.positive, neg + impact.negative)
    });
    let total_score = beneficial_score - adverse_score;
    let level = scoring.level_for(total_score);

    ScoreResult {
        beneficial_score,
        adverse_score,
        total_score,
        level,
        evaluation: level.evaluation().to_string(),
    }
}

/// 组合分析；未参与任何命中组合的神煞按原样归入中性
pub fn analyze_combinations<S: AsRef<str>>(markers: &[S]) -> CombinationResult {
    let present: BTreeSet<&str> = markers.iter().map(|m| metadata::strip_label(m.as_ref())).collect();
    let mut result = CombinationResult::default();
    let mut matched: BTreeSet<&str> = BTreeSet::new();

    for rule in COMBINATIONS {
        if !(present.contains(rule.first) && present.contains(rule.second)) {
            continue;
        }
        matched.insert(rule.first);
        matched.insert(rule.second);

        let hit = CombinationHit {
            pair: (rule.first.to_string(), rule.second.to_string()),
            effect: rule.effect,
            description: rule.description.to_string(),
        };
        match rule.effect {
            CombinationEffect::Synergy => result.synergies.push(hit),
            CombinationEffect::Conflict => result.conflicts.push(hit),
        }
        if let Some(recommendation) = rule.recommendation {
            result.recommendations.push(recommendation.to_string());
        }
    }

    result.neutrals = markers
        .iter()
        .map(|m| m.as_ref())
        .filter(|m| !matched.contains(metadata::strip_label(m)))
        .map(str::to_string)
        .collect();
    result
}

fn join(markers: &[PillarMarker]) -> String {
    markers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("、")
}

/// 生成文字报告
pub fn generate_report(profile: &AggregatedProfile) -> String {
    let strength = &profile.strength;
    let mut report = String::from("=== 神煞分析报告 ===\n\n");

    report.push_str(&format!("总体评价：{}\n", strength.evaluation));
    report.push_str(&format!("神煞等级：{}\n", strength.level));
    report.push_str(&format!("吉神得分：{}分\n", strength.beneficial_score));
    report.push_str(&format!("凶神得分：{}分\n", strength.adverse_score));
    report.push_str(&format!("综合得分：{}分\n\n", strength.total_score));

    for (label, markers) in [
        ("吉神", &profile.beneficial),
        ("凶神", &profile.adverse),
        ("吉凶神", &profile.mixed),
    ] {
        if !markers.is_empty() {
            report.push_str(&format!("{}：{}\n", label, join(markers)));
        }
    }

    report.push_str("\n=== 分类分析 ===\n");
    for (category, markers) in &profile.category_breakdown {
        if !markers.is_empty() {
            report.push_str(&format!("{}：{}\n", category, join(markers)));
        }
    }

    if !profile.special.markers.is_empty() {
        report.push_str("\n=== 特殊神煞 ===\n");
        for name in &profile.special.markers {
            let detail = profile.special.details.get(name).map(String::as_str).unwrap_or("");
            report.push_str(&format!("{}：{}\n", name, detail));
        }
    }

    let mut resolvable: Vec<&str> = profile
        .adverse
        .iter()
        .chain(profile.mixed.iter())
        .map(|m| m.name.as_str())
        .chain(profile.special.markers.iter().map(String::as_str))
        .collect();
    resolvable.sort();
    resolvable.dedup();
    let hints: Vec<String> = resolvable
        .into_iter()
        .filter_map(|name| {
            metadata::resolution(name).map(|r| format!("{}：{}（{}）", name, r.method, r.items.join("、")))
        })
        .collect();
    if !hints.is_empty() {
        report.push_str("\n=== 化解建议 ===\n");
        for hint in hints {
            report.push_str(&hint);
            report.push('\n');
        }
    }

    report
}
