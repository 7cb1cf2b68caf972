//! 核心数据模型定义
//!
//! 计算上下文、命盘、时间层级、分析结果与引擎配置。
//! 对外的上下文字段保持原始字符串，解析在适配层完成，
//! 以保证任何畸形输入都只会降级为“不命中”而不会中断计算。

use crate::core::error::ShenShaError;
use crate::core::ganzhi::{Branch, GanZhi, Season};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 单柱计算上下文
///
/// `day_stem`、`stem`、`branch` 为必填，其余字段按规则需要可选提供。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculationContext {
    /// 日干
    pub day_stem: String,
    /// 本柱天干
    pub stem: String,
    /// 本柱地支
    pub branch: String,
    /// 年干
    pub year_stem: Option<String>,
    /// 年支
    pub year_branch: Option<String>,
    /// 月干
    pub month_stem: Option<String>,
    /// 月支
    pub month_branch: Option<String>,
    /// 日支
    pub day_branch: Option<String>,
    /// 时干
    pub hour_stem: Option<String>,
    /// 时支
    pub hour_branch: Option<String>,
    /// 季节（春/夏/秋/冬）
    pub season: Option<String>,
    /// 柱位标签（年柱、大运等），仅作记录
    pub pillar_type: Option<String>,
    /// 本柱干支
    pub gan_zhi: Option<String>,
    /// 命宫干支
    pub ming_gong: Option<String>,
    /// 身宫干支
    pub shen_gong: Option<String>,
    /// 胎元干支
    pub tai_yuan: Option<String>,
}

impl CalculationContext {
    /// 创建只含必填字段的上下文
    pub fn new(day_stem: impl Into<String>, stem: impl Into<String>, branch: impl Into<String>) -> Self {
        let stem = stem.into();
        let branch = branch.into();
        Self {
            day_stem: day_stem.into(),
            gan_zhi: Some(format!("{}{}", stem, branch)),
            stem,
            branch,
            ..Default::default()
        }
    }

    /// 由两字干支代码创建，长度不为二时返回 None
    pub fn from_gan_zhi(day_stem: impl Into<String>, code: &str) -> Option<Self> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() != 2 {
            return None;
        }
        Some(Self::new(day_stem, chars[0].to_string(), chars[1].to_string()))
    }

    pub fn with_year(mut self, stem: impl Into<String>, branch: impl Into<String>) -> Self {
        self.year_stem = Some(stem.into());
        self.year_branch = Some(branch.into());
        self
    }

    pub fn with_month(mut self, stem: impl Into<String>, branch: impl Into<String>) -> Self {
        self.month_stem = Some(stem.into());
        self.month_branch = Some(branch.into());
        self
    }

    pub fn with_day_branch(mut self, branch: impl Into<String>) -> Self {
        self.day_branch = Some(branch.into());
        self
    }

    pub fn with_hour(mut self, stem: impl Into<String>, branch: impl Into<String>) -> Self {
        self.hour_stem = Some(stem.into());
        self.hour_branch = Some(branch.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn with_pillar_type(mut self, pillar_type: impl Into<String>) -> Self {
        self.pillar_type = Some(pillar_type.into());
        self
    }

    /// 设置命宫、身宫、胎元（均为两字干支）
    pub fn with_palaces(
        mut self,
        ming_gong: Option<String>,
        shen_gong: Option<String>,
        tai_yuan: Option<String>,
    ) -> Self {
        self.ming_gong = ming_gong;
        self.shen_gong = shen_gong;
        self.tai_yuan = tai_yuan;
        self
    }

    /// 缓存键：拼接全部字段，缺省字段记为空串
    pub fn fingerprint(&self) -> String {
        let opt = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
        [
            self.day_stem.clone(),
            self.stem.clone(),
            self.branch.clone(),
            opt(&self.year_stem),
            opt(&self.year_branch),
            opt(&self.month_stem),
            opt(&self.month_branch),
            opt(&self.day_branch),
            opt(&self.hour_stem),
            opt(&self.hour_branch),
            opt(&self.season),
            opt(&self.pillar_type),
            opt(&self.gan_zhi),
            opt(&self.ming_gong),
            opt(&self.shen_gong),
            opt(&self.tai_yuan),
        ]
        .join("_")
    }
}

/// 命盘柱位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PillarLabel {
    /// 年柱
    Year,
    /// 月柱
    Month,
    /// 日柱
    Day,
    /// 时柱
    Hour,
    /// 运限柱（大运、流年等）
    Cycle(TimeLayer),
}

impl PillarLabel {
    /// 四柱，按年月日时排列
    pub const NATAL: [PillarLabel; 4] = [
        PillarLabel::Year,
        PillarLabel::Month,
        PillarLabel::Day,
        PillarLabel::Hour,
    ];

    /// 中文标签
    pub fn label(&self) -> &'static str {
        match self {
            PillarLabel::Year => "年柱",
            PillarLabel::Month => "月柱",
            PillarLabel::Day => "日柱",
            PillarLabel::Hour => "时柱",
            PillarLabel::Cycle(layer) => layer.label(),
        }
    }
}

impl fmt::Display for PillarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 时间层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeLayer {
    /// 大运
    Decade,
    /// 流年
    Year,
    /// 流月
    Month,
    /// 流日
    Day,
    /// 流时
    Hour,
    /// 小运
    SubDecade,
}

impl TimeLayer {
    pub const ALL: [TimeLayer; 6] = [
        TimeLayer::Decade,
        TimeLayer::Year,
        TimeLayer::Month,
        TimeLayer::Day,
        TimeLayer::Hour,
        TimeLayer::SubDecade,
    ];

    /// 中文名称
    pub fn label(&self) -> &'static str {
        match self {
            TimeLayer::Decade => "大运",
            TimeLayer::Year => "流年",
            TimeLayer::Month => "流月",
            TimeLayer::Day => "流日",
            TimeLayer::Hour => "流时",
            TimeLayer::SubDecade => "小运",
        }
    }

    /// 英文键
    pub fn key(&self) -> &'static str {
        match self {
            TimeLayer::Decade => "decade",
            TimeLayer::Year => "year",
            TimeLayer::Month => "month",
            TimeLayer::Day => "day",
            TimeLayer::Hour => "hour",
            TimeLayer::SubDecade => "sub-decade",
        }
    }
}

impl FromStr for TimeLayer {
    type Err = ShenShaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TimeLayer::ALL
            .into_iter()
            .find(|layer| layer.label() == s || layer.key() == s)
            .ok_or_else(|| ShenShaError::UnknownTimeLayer(s.to_string()))
    }
}

impl fmt::Display for TimeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 四柱命盘
///
/// 由外部历法模块提供，干支已保证合法。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillarContext {
    /// 年柱
    pub year: GanZhi,
    /// 月柱
    pub month: GanZhi,
    /// 日柱
    pub day: GanZhi,
    /// 时柱
    pub hour: GanZhi,
    /// 季节，缺省时由月支推得
    pub season: Option<Season>,
    /// 命宫
    pub ming_gong: Option<GanZhi>,
    /// 身宫
    pub shen_gong: Option<GanZhi>,
    /// 胎元
    pub tai_yuan: Option<GanZhi>,
}

impl FourPillarContext {
    pub fn new(year: GanZhi, month: GanZhi, day: GanZhi, hour: GanZhi) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            season: None,
            ming_gong: None,
            shen_gong: None,
            tai_yuan: None,
        }
    }

    /// 从四个两字干支代码解析命盘
    pub fn parse(year: &str, month: &str, day: &str, hour: &str) -> Result<Self, ShenShaError> {
        let parse = |code: &str| {
            GanZhi::parse(code).ok_or_else(|| ShenShaError::InvalidGanZhi(code.to_string()))
        };
        Ok(Self::new(parse(year)?, parse(month)?, parse(day)?, parse(hour)?))
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_palaces(
        mut self,
        ming_gong: Option<GanZhi>,
        shen_gong: Option<GanZhi>,
        tai_yuan: Option<GanZhi>,
    ) -> Self {
        self.ming_gong = ming_gong;
        self.shen_gong = shen_gong;
        self.tai_yuan = tai_yuan;
        self
    }

    /// 命盘季节：显式指定优先，否则按月支推算
    pub fn season(&self) -> Season {
        self.season
            .unwrap_or_else(|| Season::from_month_branch(self.month.branch))
    }

    pub fn day_branch(&self) -> Branch {
        self.day.branch
    }

    /// 取某一柱的干支；运限柱不属于命盘，返回 None
    pub fn pillar(&self, label: PillarLabel) -> Option<GanZhi> {
        match label {
            PillarLabel::Year => Some(self.year),
            PillarLabel::Month => Some(self.month),
            PillarLabel::Day => Some(self.day),
            PillarLabel::Hour => Some(self.hour),
            PillarLabel::Cycle(_) => None,
        }
    }

    /// 以命盘为背景，为给定干支构造完整计算上下文
    pub fn context_for(&self, target: GanZhi) -> CalculationContext {
        let code = |g: Option<GanZhi>| g.map(|g| g.to_string());
        CalculationContext::new(
            self.day.stem.to_string(),
            target.stem.to_string(),
            target.branch.to_string(),
        )
        .with_year(self.year.stem.to_string(), self.year.branch.to_string())
        .with_month(self.month.stem.to_string(), self.month.branch.to_string())
        .with_day_branch(self.day.branch.to_string())
        .with_hour(self.hour.stem.to_string(), self.hour.branch.to_string())
        .with_season(self.season().to_string())
        .with_palaces(code(self.ming_gong), code(self.shen_gong), code(self.tai_yuan))
    }

    /// 命盘某一柱的计算上下文
    pub fn pillar_context(&self, label: PillarLabel) -> Option<CalculationContext> {
        self.pillar(label)
            .map(|g| self.context_for(g).with_pillar_type(label.label()))
    }

    /// 稳定命盘标识（基于四柱与宫位的hash）
    pub fn chart_id(&self) -> String {
        let code = |g: Option<GanZhi>| g.map(|g| g.to_string()).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "{}|{}|{}|{}|{}|{}|{}|{}",
                self.year,
                self.month,
                self.day,
                self.hour,
                self.season(),
                code(self.ming_gong),
                code(self.shen_gong),
                code(self.tai_yuan)
            )
            .as_bytes(),
        );
        hex::encode(&hasher.finalize()[..16])
    }
}

/// 带柱位的神煞
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PillarMarker {
    /// 所在柱位
    pub pillar: PillarLabel,
    /// 神煞名称
    pub name: String,
}

impl PillarMarker {
    pub fn new(pillar: PillarLabel, name: impl Into<String>) -> Self {
        Self {
            pillar,
            name: name.into(),
        }
    }
}

impl fmt::Display for PillarMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pillar, self.name)
    }
}

/// 单柱神煞集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarMarkerSet {
    /// 柱位
    pub pillar: PillarLabel,
    /// 已去重排序的神煞名
    pub markers: Vec<String>,
}

/// 神煞吉凶属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// 吉神
    Beneficial,
    /// 凶神
    Adverse,
    /// 吉凶神
    Mixed,
    /// 未收录
    Unknown,
}

impl MarkerKind {
    pub fn label(&self) -> &'static str {
        match self {
            MarkerKind::Beneficial => "吉神",
            MarkerKind::Adverse => "凶神",
            MarkerKind::Mixed => "吉凶神",
            MarkerKind::Unknown => "未知",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 综合评级，从低到高排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrengthLevel {
    /// 较差
    Poor,
    /// 偏弱
    Weak,
    /// 一般
    Balanced,
    /// 良好
    Good,
    /// 优秀
    Excellent,
}

impl StrengthLevel {
    pub fn label(&self) -> &'static str {
        match self {
            StrengthLevel::Poor => "较差",
            StrengthLevel::Weak => "偏弱",
            StrengthLevel::Balanced => "一般",
            StrengthLevel::Good => "良好",
            StrengthLevel::Excellent => "优秀",
        }
    }

    /// 评语
    pub fn evaluation(&self) -> &'static str {
        match self {
            StrengthLevel::Excellent => "神煞配置极佳，多贵人助力，前程似锦",
            StrengthLevel::Good => "神煞配置良好，整体偏吉，发展顺利",
            StrengthLevel::Balanced => "神煞配置平衡，吉凶参半，需努力进取",
            StrengthLevel::Weak => "神煞配置偏弱，需注意化解，谨慎行事",
            StrengthLevel::Poor => "神煞配置不佳，多有阻碍，需积极化解",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 强度评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 吉神得分
    pub beneficial_score: i32,
    /// 凶神得分（正数）
    pub adverse_score: i32,
    /// 综合得分 = 吉神得分 − 凶神得分
    pub total_score: i32,
    /// 评级
    pub level: StrengthLevel,
    /// 评语
    pub evaluation: String,
}

/// 组合效果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinationEffect {
    /// 相互增益
    Synergy,
    /// 相互冲突
    Conflict,
}

/// 命中的神煞组合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationHit {
    /// 组合中的两个神煞
    pub pair: (String, String),
    /// 效果
    pub effect: CombinationEffect,
    /// 说明
    pub description: String,
}

/// 组合分析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationResult {
    /// 增益组合
    pub synergies: Vec<CombinationHit>,
    /// 冲突组合
    pub conflicts: Vec<CombinationHit>,
    /// 未参与任何组合的神煞（保持输入原样）
    pub neutrals: Vec<String>,
    /// 化解建议
    pub recommendations: Vec<String>,
}

/// 四柱合并计算报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationReport {
    /// 四柱神煞并集（去重排序）
    pub markers: Vec<String>,
    /// 耗时（毫秒）
    pub time_ms: f64,
    /// 参与计算的规则数
    pub rule_count: usize,
    /// 规则故障记录，形如“年柱: 规则 X 执行失败: ...”
    pub errors: Vec<String>,
}

/// 命盘级特殊神煞
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialMarkers {
    /// 童子煞
    pub tong_zi_sha: bool,
    /// 将军箭
    pub jiang_jun_jian: bool,
    /// 日柱魁罡
    pub kui_gang: bool,
    /// 日柱阴差阳错
    pub yin_cha_yang_cuo: bool,
    /// 命中的特殊神煞名
    pub markers: Vec<String>,
    /// 每个特殊神煞的说明
    pub details: BTreeMap<String, String>,
}

/// 特殊神煞综合影响
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialImpact {
    /// 影响总分
    pub total_impact: u32,
    /// 关注事项
    pub concerns: Vec<String>,
    /// 建议
    pub recommendations: Vec<String>,
    /// 紧迫程度
    pub urgency: String,
}

/// 命盘综合分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedProfile {
    /// 命盘标识
    pub chart_id: String,
    /// 全部带柱位神煞
    pub all_markers: Vec<PillarMarker>,
    /// 各柱神煞
    pub per_pillar: Vec<PillarMarkerSet>,
    /// 吉神
    pub beneficial: Vec<PillarMarker>,
    /// 凶神
    pub adverse: Vec<PillarMarker>,
    /// 吉凶神
    pub mixed: Vec<PillarMarker>,
    /// 未收录的神煞
    pub unknown: Vec<PillarMarker>,
    /// 强度评分
    pub strength: ScoreResult,
    /// 按类别归组
    pub category_breakdown: BTreeMap<String, Vec<PillarMarker>>,
    /// 命盘级特殊神煞
    pub special: SpecialMarkers,
}

impl AggregatedProfile {
    /// 综合得分
    pub fn score(&self) -> i32 {
        self.strength.total_score
    }

    /// 全部神煞名（含重复，按柱位顺序）
    pub fn marker_names(&self) -> Vec<&str> {
        self.all_markers.iter().map(|m| m.name.as_str()).collect()
    }
}

/// 缓存配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,
    /// 最大条目数
    pub capacity: usize,
    /// 过期时间（秒）
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
            ttl_secs: 300,
        }
    }
}

/// 评级阈值配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// 优秀下限
    pub excellent: i32,
    /// 良好下限
    pub good: i32,
    /// 一般下限
    pub balanced: i32,
    /// 偏弱下限，低于此值为较差
    pub weak: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            excellent: 20,
            good: 10,
            balanced: 0,
            weak: -10,
        }
    }
}

impl ScoringConfig {
    /// 按阈值把综合得分映射到评级
    pub fn level_for(&self, total: i32) -> StrengthLevel {
        if total >= self.excellent {
            StrengthLevel::Excellent
        } else if total >= self.good {
            StrengthLevel::Good
        } else if total >= self.balanced {
            StrengthLevel::Balanced
        } else if total >= self.weak {
            StrengthLevel::Weak
        } else {
            StrengthLevel::Poor
        }
    }
}

/// 引擎配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,
    /// 评级阈值
    #[serde(default)]
    pub scoring: ScoringConfig,
}
