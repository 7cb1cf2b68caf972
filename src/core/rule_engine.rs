//! 计算引擎模块
//!
//! 遍历神煞定义表，对单柱上下文逐条求值，并负责结果缓存。
//! 单条规则出错只记录不中断，其余规则照常计算。

use crate::core::cache::{CacheStats, MarkerCache};
use crate::core::definitions::{builtin_definitions, MarkerDefinition, ResolvedContext};
use crate::core::error::{ShenShaError, ShenShaResult};
use crate::core::ganzhi::{Branch, GanZhi, Season, Stem};
use crate::core::models::{CalculationContext, CalculationReport, EngineConfig, FourPillarContext, PillarLabel};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// 单次求值结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// 已去重排序的神煞名
    pub markers: Vec<String>,
    /// 规则故障
    pub errors: Vec<String>,
}

/// 计算引擎
pub struct CalculationEngine {
    /// 神煞定义表
    definitions: Vec<MarkerDefinition>,
    /// 结果缓存，None 表示不缓存
    cache: Option<MarkerCache>,
}

impl Default for CalculationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationEngine {
    /// 使用内置规则与默认配置创建引擎
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// 按配置创建引擎
    pub fn from_config(config: &EngineConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| MarkerCache::from_config(&config.cache));
        let engine = Self {
            definitions: builtin_definitions(),
            cache,
        };
        tracing::debug!(
            "计算引擎已创建: {} 条规则, 缓存{}",
            engine.definitions.len(),
            if engine.cache.is_some() { "开启" } else { "关闭" }
        );
        engine
    }

    /// 不带缓存的引擎
    pub fn without_cache() -> Self {
        Self {
            definitions: builtin_definitions(),
            cache: None,
        }
    }

    /// 替换定义表，同时清空已有缓存
    pub fn with_definitions(mut self, definitions: Vec<MarkerDefinition>) -> Self {
        self.definitions = definitions;
        self.clear_cache();
        self
    }

    /// 注入外部构造的缓存
    pub fn with_cache(mut self, cache: MarkerCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn definitions(&self) -> &[MarkerDefinition] {
        &self.definitions
    }

    pub fn rule_count(&self) -> usize {
        self.definitions.len()
    }

    /// 计算单柱神煞，结果去重并按字典序排列
    pub fn calculate_markers(&self, ctx: &CalculationContext) -> Vec<String> {
        self.calculate_markers_at(ctx, Utc::now())
    }

    /// 以指定时间计算（用于缓存过期判断）
    pub fn calculate_markers_at(&self, ctx: &CalculationContext, now: DateTime<Utc>) -> Vec<String> {
        self.evaluate_cached(ctx, now).markers
    }

    /// 批量计算，输出顺序与输入一致
    pub fn calculate_batch(&self, contexts: &[CalculationContext]) -> Vec<Vec<String>> {
        let now = Utc::now();
        contexts
            .iter()
            .map(|ctx| self.calculate_markers_at(ctx, now))
            .collect()
    }

    /// 计算四柱神煞并集，附带耗时与故障记录
    pub fn calculate_with_context(&self, chart: &FourPillarContext) -> CalculationReport {
        let started = Instant::now();
        let now = Utc::now();
        let mut markers = BTreeSet::new();
        let mut errors = Vec::new();

        for label in PillarLabel::NATAL {
            let Some(ctx) = chart.pillar_context(label) else {
                continue;
            };
            let evaluation = self.evaluate_cached(&ctx, now);
            markers.extend(evaluation.markers);
            errors.extend(
                evaluation
                    .errors
                    .into_iter()
                    .map(|e| format!("{}: {}", label, e)),
            );
        }

        let report = CalculationReport {
            markers: markers.into_iter().collect(),
            time_ms: started.elapsed().as_secs_f64() * 1000.0,
            rule_count: self.definitions.len(),
            errors,
        };
        tracing::debug!(
            "四柱计算完成: {} 个神煞, {} 个错误, 耗时 {:.3}ms",
            report.markers.len(),
            report.errors.len(),
            report.time_ms
        );
        report
    }

    /// 不经缓存直接求值，返回神煞与故障
    pub fn evaluate(&self, ctx: &CalculationContext) -> Evaluation {
        let resolved = ResolvedContext::from(ctx);
        let mut markers = BTreeSet::new();
        let mut errors = Vec::new();

        for def in &self.definitions {
            match panic::catch_unwind(AssertUnwindSafe(|| def.evaluate(&resolved))) {
                Ok(true) => {
                    markers.insert(def.name.to_string());
                }
                Ok(false) => {}
                Err(payload) => {
                    let fault = ShenShaError::RuleFault {
                        name: def.name.to_string(),
                        message: panic_message(payload.as_ref()),
                    };
                    tracing::warn!("{}", fault);
                    errors.push(fault.to_string());
                }
            }
        }

        Evaluation {
            markers: markers.into_iter().collect(),
            errors,
        }
    }

    fn evaluate_cached(&self, ctx: &CalculationContext, now: DateTime<Utc>) -> Evaluation {
        let Some(cache) = &self.cache else {
            return self.evaluate(ctx);
        };

        let key = ctx.fingerprint();
        if let Some(markers) = cache.get(&key, now) {
            tracing::debug!("缓存命中: {}", key);
            // 有故障的结果从不入缓存
            return Evaluation {
                markers,
                errors: Vec::new(),
            };
        }

        tracing::debug!("缓存未命中: {}", key);
        let evaluation = self.evaluate(ctx);
        if evaluation.errors.is_empty() {
            cache.insert(key, evaluation.markers.clone(), now);
        }
        evaluation
    }

    /// 清空缓存
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
            tracing::debug!("缓存已清空");
        }
    }

    /// 缓存统计；未启用缓存时全部为 0
    pub fn cache_stats(&self) -> CacheStats {
        self.cache
            .as_ref()
            .map(MarkerCache::stats)
            .unwrap_or_default()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "未知错误".to_string()
    }
}

/// 校验上下文：必填字段存在，所有已给字段都在字母表内
pub fn check_params(ctx: &CalculationContext) -> ShenShaResult<()> {
    fn stem(value: &str) -> ShenShaResult<()> {
        Stem::parse(value)
            .map(|_| ())
            .ok_or_else(|| ShenShaError::InvalidStem(value.to_string()))
    }
    fn branch(value: &str) -> ShenShaResult<()> {
        Branch::parse(value)
            .map(|_| ())
            .ok_or_else(|| ShenShaError::InvalidBranch(value.to_string()))
    }
    fn gan_zhi(value: &str) -> ShenShaResult<()> {
        GanZhi::parse(value)
            .map(|_| ())
            .ok_or_else(|| ShenShaError::InvalidGanZhi(value.to_string()))
    }

    let required = [
        ("day_stem", ctx.day_stem.as_str()),
        ("stem", ctx.stem.as_str()),
        ("branch", ctx.branch.as_str()),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ShenShaError::MissingField(field));
        }
    }
    stem(&ctx.day_stem)?;
    stem(&ctx.stem)?;
    branch(&ctx.branch)?;

    for value in [&ctx.year_stem, &ctx.month_stem, &ctx.hour_stem].into_iter().flatten() {
        stem(value)?;
    }
    for value in [&ctx.year_branch, &ctx.month_branch, &ctx.day_branch, &ctx.hour_branch]
        .into_iter()
        .flatten()
    {
        branch(value)?;
    }
    if let Some(season) = &ctx.season {
        Season::parse(season).ok_or_else(|| ShenShaError::InvalidSeason(season.clone()))?;
    }
    for value in [&ctx.gan_zhi, &ctx.ming_gong, &ctx.shen_gong, &ctx.tai_yuan]
        .into_iter()
        .flatten()
    {
        gan_zhi(value)?;
    }
    Ok(())
}

/// 上下文是否合法
pub fn validate_params(ctx: &CalculationContext) -> bool {
    check_params(ctx).is_ok()
}
