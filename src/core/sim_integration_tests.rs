use crate::core::analysis::{analyze_combinations, calculate_strength, generate_report, AnalysisService};
use crate::core::cache::MarkerCache;
use crate::core::definitions::builtin_definitions;
use crate::core::ganzhi::{Branch, GanZhi, Stem};
use crate::core::models::{
    CalculationContext, EngineConfig, FourPillarContext, ScoringConfig, StrengthLevel,
};
use crate::core::rule_engine::CalculationEngine;
use crate::core::time_layer::TimeLayerService;
use crate::core::wuxing::{Element, ElementRelation};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

fn sixty_jiazi() -> Vec<GanZhi> {
    (0..60)
        .map(|i| GanZhi::new(Stem::from_index(i % 10), Branch::from_index(i % 12)))
        .collect()
}

fn fixed_time(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_718_452_800 + secs, 0).unwrap()
}

fn full_context(day_stem: &str, stem: &str, branch: &str) -> CalculationContext {
    CalculationContext::new(day_stem, stem, branch)
        .with_year("甲", "辰")
        .with_month("庚", "午")
        .with_day_branch("子")
        .with_hour("丁", "卯")
        .with_season("夏")
}

#[test]
fn sim_noble_and_blade_scenarios() {
    let engine = CalculationEngine::new();

    let markers = engine.calculate_markers(&CalculationContext::new("甲", "丁", "丑"));
    assert!(markers.contains(&"天乙贵人".to_string()));

    let markers = engine.calculate_markers(&CalculationContext::new("甲", "丁", "卯"));
    assert!(markers.contains(&"羊刃".to_string()));
}

#[test]
fn sim_noble_with_literary_star_is_single_synergy() {
    let result = analyze_combinations(&["年柱:天乙贵人", "时柱:文昌", "月柱:驿马"]);

    assert_eq!(result.synergies.len(), 1);
    let hit = &result.synergies[0];
    assert_eq!(hit.pair, ("天乙贵人".to_string(), "文昌".to_string()));
    assert!(hit.description.contains("天乙贵人"));
    assert!(result
        .conflicts
        .iter()
        .all(|c| c.pair.0 != "天乙贵人" && c.pair.1 != "文昌"));
    assert_eq!(result.neutrals, vec!["月柱:驿马".to_string()]);
}

#[test]
fn sim_adverse_heavy_chart_scores_below_balanced() {
    let scoring = ScoringConfig::default();

    let score = calculate_strength(&["年柱:羊刃", "月柱:灾煞", "日柱:天罗地网", "时柱:文昌"], &scoring);
    assert!(score.adverse_score > score.beneficial_score);
    assert!(score.level < StrengthLevel::Balanced);

    // 只保留三条凶煞规则，命盘结果可以逐条推出
    let adverse_only: Vec<_> = builtin_definitions()
        .into_iter()
        .filter(|def| matches!(def.name, "羊刃" | "灾煞" | "天罗地网"))
        .collect();
    let engine = CalculationEngine::without_cache().with_definitions(adverse_only);
    let service = AnalysisService::new(&engine);

    // 甲日卯月为羊刃；寅年火局灾煞在子时；丙寅炉中火，日支戌为天罗地网
    let chart = FourPillarContext::parse("丙寅", "丁卯", "甲戌", "丙子").unwrap();
    let profile = service.analyze_chart(&chart);

    assert_eq!(profile.per_pillar[1].markers, vec!["羊刃".to_string()]);
    assert_eq!(profile.per_pillar[2].markers, vec!["天罗地网".to_string()]);
    assert_eq!(profile.per_pillar[3].markers, vec!["灾煞".to_string()]);
    assert!(profile.per_pillar[0].markers.is_empty());
    assert_eq!(profile.strength.beneficial_score, 0);
    assert_eq!(profile.strength.adverse_score, 24);
    assert!(profile.strength.level < StrengthLevel::Balanced);
}

#[test]
fn sim_batch_matches_individual_results_in_order() {
    let engine = CalculationEngine::new();
    let contexts: Vec<CalculationContext> = sixty_jiazi()
        .into_iter()
        .map(|gz| full_context("甲", &gz.stem.to_string(), &gz.branch.to_string()))
        .collect();

    let batch = engine.calculate_batch(&contexts);
    assert_eq!(batch.len(), contexts.len());

    let fresh = CalculationEngine::without_cache();
    for (ctx, markers) in contexts.iter().zip(&batch) {
        assert_eq!(markers, &fresh.calculate_markers(ctx));
    }
}

#[test]
fn sim_results_are_deterministic_across_cache_clears() {
    let engine = CalculationEngine::new();
    for gz in sixty_jiazi() {
        let ctx = full_context("丙", &gz.stem.to_string(), &gz.branch.to_string());
        let first = engine.calculate_markers(&ctx);
        engine.clear_cache();
        let second = engine.calculate_markers(&ctx);
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(first, sorted);
    }
}

#[test]
fn sim_cache_is_transparent() {
    let cached = CalculationEngine::new();
    let uncached = CalculationEngine::without_cache();

    for gz in sixty_jiazi() {
        let ctx = full_context("辛", &gz.stem.to_string(), &gz.branch.to_string());
        let expected = uncached.calculate_markers(&ctx);
        assert_eq!(cached.calculate_markers(&ctx), expected);
        // 第二次走缓存
        assert_eq!(cached.calculate_markers(&ctx), expected);
    }
    assert_eq!(cached.cache_stats().hits, 60);
}

#[test]
fn sim_cache_expiry_and_capacity() {
    let engine = CalculationEngine::new().with_cache(MarkerCache::new(2, Duration::seconds(30)));
    let a = CalculationContext::new("甲", "丁", "丑");
    let b = CalculationContext::new("甲", "丁", "卯");
    let c = CalculationContext::new("甲", "戊", "寅");

    let first = engine.calculate_markers_at(&a, fixed_time(0));
    engine.calculate_markers_at(&b, fixed_time(1));
    engine.calculate_markers_at(&c, fixed_time(2));
    assert_eq!(engine.cache_stats().size, 2);

    // 过期后重新计算，结果不变
    assert_eq!(engine.calculate_markers_at(&a, fixed_time(100)), first);
    let stats = engine.cache_stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 4);
}

#[test]
fn sim_malformed_contexts_never_fail() {
    let engine = CalculationEngine::new();
    let malformed = vec![
        CalculationContext::new("", "", ""),
        CalculationContext::new("X", "Y", "Z"),
        CalculationContext::new("甲乙", "丙丁", "子丑"),
        CalculationContext::new("甲", "甲", "子")
            .with_year("", "")
            .with_month("月", "🌙")
            .with_day_branch("日")
            .with_hour("?", "?")
            .with_season("雨季")
            .with_palaces(Some("甲".to_string()), Some("".to_string()), Some("子甲".to_string())),
    ];

    for ctx in &malformed {
        let evaluation = engine.evaluate(ctx);
        assert!(evaluation.errors.is_empty());
        let markers = engine.calculate_markers(ctx);
        assert!(markers.len() <= builtin_definitions().len());
    }

    assert!(engine.calculate_markers(&malformed[0]).is_empty());
    assert!(engine.calculate_markers(&malformed[1]).is_empty());
}

#[test]
fn sim_element_relation_is_exclusive() {
    for a in Element::ALL {
        for b in Element::ALL {
            let holds = [
                a == b,
                a.generates() == b,
                a.restrains() == b,
                b.generates() == a,
                b.restrains() == a,
            ];
            assert_eq!(holds.iter().filter(|h| **h).count(), 1, "{} {}", a, b);

            let expected = match holds.iter().position(|h| *h) {
                Some(0) => ElementRelation::Same,
                Some(1) => ElementRelation::Generates,
                Some(2) => ElementRelation::Restrains,
                Some(3) => ElementRelation::GeneratedBy,
                _ => ElementRelation::RestrainedBy,
            };
            assert_eq!(a.relation(b), expected);
        }
    }
}

#[test]
fn sim_chart_report_and_time_layers_end_to_end() {
    let engine = CalculationEngine::from_config(&EngineConfig::default());
    let chart = FourPillarContext::parse("甲子", "丙寅", "庚戌", "丙子").unwrap();

    let report = engine.calculate_with_context(&chart);
    assert_eq!(report.rule_count, 71);
    assert!(report.errors.is_empty());
    assert!(report.markers.contains(&"魁罡".to_string()));

    let profile = AnalysisService::new(&engine).analyze_chart(&chart);
    assert!(profile.special.kui_gang);
    let text = generate_report(&profile);
    assert!(text.contains(&format!("综合得分：{}分", profile.score())));

    let service = TimeLayerService::new(&engine).with_natal(&chart);
    let mut layers = BTreeMap::new();
    layers.insert("大运".to_string(), "丙子".to_string());
    layers.insert("流年".to_string(), "甲辰".to_string());
    layers.insert("流月".to_string(), "丙".to_string());
    let results = service.calculate_batch_markers("庚", &layers);

    assert!(results["流年"].contains(&"太岁".to_string()));
    assert!(results["流月"].is_empty());
    // 庚日贵人在丑未，子运不见
    assert!(!results["大运"].contains(&"天乙贵人".to_string()));
}
