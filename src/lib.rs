//! 八字神煞规则引擎
//!
//! - 规则库：纯函数判定每个神煞
//! - 定义表：声明每条规则的入参形态，适配层按表求值
//! - 计算引擎：逐条求值、容错并缓存结果
//! - 时间层级：大运、流年等运限复用同一套规则
//! - 分析评分：吉凶分类、强度评级、组合分析与报告

pub mod core;
pub mod logging;
pub mod storage;

pub use crate::core::analysis::{analyze_combinations, calculate_strength, generate_report, AnalysisService};
pub use crate::core::error::{ShenShaError, ShenShaResult};
pub use crate::core::ganzhi::{Branch, GanZhi, Season, Stem};
pub use crate::core::models::{
    AggregatedProfile, CalculationContext, CalculationReport, EngineConfig, FourPillarContext,
    MarkerKind, PillarLabel, PillarMarker, ScoreResult, TimeLayer,
};
pub use crate::core::rule_engine::{check_params, validate_params, CalculationEngine};
pub use crate::core::time_layer::{validate_time_layer_params, TimeLayerService};
pub use crate::core::wuxing::{Element, ElementRelation};
