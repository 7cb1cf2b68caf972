//! 神煞定义表与参数适配
//!
//! 每个神煞由一条 `MarkerDefinition` 描述：名称 + 入参形态。
//! 入参形态 `RuleInput` 既声明规则需要哪些字段，也携带强类型的判定函数，
//! 适配层只是对这张表的通用解释器，新增神煞只需在表中加一行。
//!
//! 任一所需字段缺失或不在字母表内时，该规则直接判为不命中。

use crate::core::ganzhi::{Branch, GanZhi, Season, Stem};
use crate::core::models::CalculationContext;
use crate::core::rules;
use crate::core::wuxing::Element;
use serde::Serialize;

/// 上下文字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    DayStem,
    Stem,
    Branch,
    YearStem,
    YearBranch,
    MonthStem,
    MonthBranch,
    DayBranch,
    HourStem,
    HourBranch,
    Season,
    MingGong,
    ShenGong,
    TaiYuan,
}

/// 空亡的参照柱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoidAnchor {
    Year,
    Month,
    Day,
    Hour,
    MingGong,
    ShenGong,
    TaiYuan,
}

/// 规则入参形态
#[derive(Debug, Clone, Copy)]
pub enum RuleInput {
    /// 本柱地支
    SingleBranch(fn(Branch) -> bool),
    /// 日干 + 本柱地支
    DayStemBranch(fn(Stem, Branch) -> bool),
    /// 日干或年干 + 本柱地支，任一成立即命中
    DayOrYearStemBranch(fn(Stem, Branch) -> bool),
    /// 年干 + 本柱地支
    YearStemBranch(fn(Stem, Branch) -> bool),
    /// 本柱天干 + 本柱地支
    StemBranch(fn(Stem, Branch) -> bool),
    /// 年支 + 本柱地支
    YearBranchBranch(fn(Branch, Branch) -> bool),
    /// 月支 + 本柱天干
    MonthBranchStem(fn(Branch, Stem) -> bool),
    /// 月支 + 本柱地支
    MonthBranchBranch(fn(Branch, Branch) -> bool),
    /// 日柱干支
    DayPillar(fn(Stem, Branch) -> bool),
    /// 季节 + 日柱干支
    SeasonDayPillar(fn(Season, Stem, Branch) -> bool),
    /// 季节 + 本柱干支
    SeasonStemBranch(fn(Season, Stem, Branch) -> bool),
    /// 参照柱干支 + 本柱地支
    PillarVoid(VoidAnchor, fn(Stem, Branch, Branch) -> bool),
    /// 年命纳音五行 + 日柱干支
    NaYinDayPillar(fn(Element, Stem, Branch) -> bool),
    /// 日柱干支 + 月支
    DayPillarMonthBranch(fn(Stem, Branch, Branch) -> bool),
    /// 年月日时天干序列（连续可得的部分）
    StemSequence(fn(&[Stem]) -> bool),
    /// 本柱天干 + 年月日与本柱四个地支
    StemWithBranches(fn(Stem, &[Branch]) -> bool),
    /// 日干 + 四个地支 + 四个天干
    DayStemWithPillars(fn(Stem, &[Branch], &[Stem]) -> bool),
}

impl RuleInput {
    /// 规则读取的字段
    pub fn required_fields(&self) -> Vec<Field> {
        use Field::*;
        match self {
            RuleInput::SingleBranch(_) => vec![Branch],
            RuleInput::DayStemBranch(_) => vec![DayStem, Branch],
            RuleInput::DayOrYearStemBranch(_) => vec![DayStem, YearStem, Branch],
            RuleInput::YearStemBranch(_) => vec![YearStem, Branch],
            RuleInput::StemBranch(_) => vec![Stem, Branch],
            RuleInput::YearBranchBranch(_) => vec![YearBranch, Branch],
            RuleInput::MonthBranchStem(_) => vec![MonthBranch, Stem],
            RuleInput::MonthBranchBranch(_) => vec![MonthBranch, Branch],
            RuleInput::DayPillar(_) => vec![DayStem, DayBranch],
            RuleInput::SeasonDayPillar(_) => vec![Season, DayStem, DayBranch],
            RuleInput::SeasonStemBranch(_) => vec![Season, Stem, Branch],
            RuleInput::PillarVoid(anchor, _) => {
                let mut fields = match anchor {
                    VoidAnchor::Year => vec![YearStem, YearBranch],
                    VoidAnchor::Month => vec![MonthStem, MonthBranch],
                    VoidAnchor::Day => vec![DayStem, DayBranch],
                    VoidAnchor::Hour => vec![HourStem, HourBranch],
                    VoidAnchor::MingGong => vec![MingGong],
                    VoidAnchor::ShenGong => vec![ShenGong],
                    VoidAnchor::TaiYuan => vec![TaiYuan],
                };
                fields.push(Branch);
                fields
            }
            RuleInput::NaYinDayPillar(_) => vec![YearStem, YearBranch, DayStem, DayBranch],
            RuleInput::DayPillarMonthBranch(_) => vec![DayStem, DayBranch, MonthBranch],
            RuleInput::StemSequence(_) => vec![YearStem, MonthStem, DayStem, HourStem],
            RuleInput::StemWithBranches(_) => {
                vec![Stem, YearBranch, MonthBranch, DayBranch, Branch]
            }
            RuleInput::DayStemWithPillars(_) => vec![
                DayStem, Stem, Branch, YearStem, YearBranch, MonthStem, MonthBranch, DayBranch,
            ],
        }
    }

    /// 是否读取本柱干支；不读取的规则结果对四柱都相同，属于命盘级
    pub fn reads_pillar(&self) -> bool {
        self.required_fields()
            .iter()
            .any(|f| matches!(f, Field::Stem | Field::Branch))
    }
}

/// 神煞定义
#[derive(Debug, Clone, Copy)]
pub struct MarkerDefinition {
    /// 神煞名称
    pub name: &'static str,
    /// 入参形态与判定函数
    pub input: RuleInput,
}

impl MarkerDefinition {
    pub const fn new(name: &'static str, input: RuleInput) -> Self {
        Self { name, input }
    }

    /// 在解析后的上下文上求值
    pub fn evaluate(&self, ctx: &ResolvedContext) -> bool {
        match self.input {
            RuleInput::SingleBranch(f) => ctx.branch.is_some_and(f),
            RuleInput::DayStemBranch(f) => ctx.day_stem.zip(ctx.branch).is_some_and(|(d, b)| f(d, b)),
            RuleInput::DayOrYearStemBranch(f) => ctx.branch.is_some_and(|b| {
                ctx.day_stem.is_some_and(|d| f(d, b)) || ctx.year_stem.is_some_and(|y| f(y, b))
            }),
            RuleInput::YearStemBranch(f) => ctx.year_stem.zip(ctx.branch).is_some_and(|(y, b)| f(y, b)),
            RuleInput::StemBranch(f) => ctx.stem.zip(ctx.branch).is_some_and(|(s, b)| f(s, b)),
            RuleInput::YearBranchBranch(f) => {
                ctx.year_branch.zip(ctx.branch).is_some_and(|(y, b)| f(y, b))
            }
            RuleInput::MonthBranchStem(f) => {
                ctx.month_branch.zip(ctx.stem).is_some_and(|(m, s)| f(m, s))
            }
            RuleInput::MonthBranchBranch(f) => {
                ctx.month_branch.zip(ctx.branch).is_some_and(|(m, b)| f(m, b))
            }
            RuleInput::DayPillar(f) => ctx.day_pillar().is_some_and(|g| f(g.stem, g.branch)),
            RuleInput::SeasonDayPillar(f) => ctx
                .season
                .zip(ctx.day_pillar())
                .is_some_and(|(s, g)| f(s, g.stem, g.branch)),
            RuleInput::SeasonStemBranch(f) => match (ctx.season, ctx.stem, ctx.branch) {
                (Some(season), Some(stem), Some(branch)) => f(season, stem, branch),
                _ => false,
            },
            RuleInput::PillarVoid(anchor, f) => ctx
                .anchor(anchor)
                .zip(ctx.branch)
                .is_some_and(|(g, b)| f(g.stem, g.branch, b)),
            RuleInput::NaYinDayPillar(f) => {
                let year_nayin = ctx
                    .year_stem
                    .zip(ctx.year_branch)
                    .and_then(|(s, b)| rules::year_nayin_element(s, b));
                year_nayin
                    .zip(ctx.day_pillar())
                    .is_some_and(|(e, g)| f(e, g.stem, g.branch))
            }
            RuleInput::DayPillarMonthBranch(f) => ctx
                .day_pillar()
                .zip(ctx.month_branch)
                .is_some_and(|(g, m)| f(g.stem, g.branch, m)),
            RuleInput::StemSequence(f) => ctx.stem_runs().iter().any(|run| f(run)),
            RuleInput::StemWithBranches(f) => match (ctx.stem, ctx.four_branches()) {
                (Some(stem), Some(branches)) => f(stem, &branches),
                _ => false,
            },
            RuleInput::DayStemWithPillars(f) => {
                match (ctx.day_stem, ctx.four_branches(), ctx.four_stems()) {
                    (Some(day_stem), Some(branches), Some(stems)) => f(day_stem, &branches, &stems),
                    _ => false,
                }
            }
        }
    }
}

/// 解析后的上下文：每个字段要么是合法符号，要么缺失
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContext {
    pub day_stem: Option<Stem>,
    pub stem: Option<Stem>,
    pub branch: Option<Branch>,
    pub year_stem: Option<Stem>,
    pub year_branch: Option<Branch>,
    pub month_stem: Option<Stem>,
    pub month_branch: Option<Branch>,
    pub day_branch: Option<Branch>,
    pub hour_stem: Option<Stem>,
    pub hour_branch: Option<Branch>,
    pub season: Option<Season>,
    pub ming_gong: Option<GanZhi>,
    pub shen_gong: Option<GanZhi>,
    pub tai_yuan: Option<GanZhi>,
}

impl ResolvedContext {
    fn day_pillar(&self) -> Option<GanZhi> {
        self.day_stem
            .zip(self.day_branch)
            .map(|(s, b)| GanZhi::new(s, b))
    }

    fn anchor(&self, anchor: VoidAnchor) -> Option<GanZhi> {
        let pair = |s: Option<Stem>, b: Option<Branch>| s.zip(b).map(|(s, b)| GanZhi::new(s, b));
        match anchor {
            VoidAnchor::Year => pair(self.year_stem, self.year_branch),
            VoidAnchor::Month => pair(self.month_stem, self.month_branch),
            VoidAnchor::Day => self.day_pillar(),
            VoidAnchor::Hour => pair(self.hour_stem, self.hour_branch),
            VoidAnchor::MingGong => self.ming_gong,
            VoidAnchor::ShenGong => self.shen_gong,
            VoidAnchor::TaiYuan => self.tai_yuan,
        }
    }

    /// 年、月、日支与本柱地支，缺一不可
    fn four_branches(&self) -> Option<[Branch; 4]> {
        Some([self.year_branch?, self.month_branch?, self.day_branch?, self.branch?])
    }

    /// 年、月、日干与本柱天干，缺一不可
    fn four_stems(&self) -> Option<[Stem; 4]> {
        Some([self.year_stem?, self.month_stem?, self.day_stem?, self.stem?])
    }

    /// 年月日时天干中连续可得的片段
    fn stem_runs(&self) -> Vec<Vec<Stem>> {
        let ordered = [self.year_stem, self.month_stem, self.day_stem, self.hour_stem];
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for stem in ordered {
            match stem {
                Some(s) => current.push(s),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

impl From<&CalculationContext> for ResolvedContext {
    fn from(ctx: &CalculationContext) -> Self {
        let stem = |v: &Option<String>| v.as_deref().and_then(Stem::parse);
        let branch = |v: &Option<String>| v.as_deref().and_then(Branch::parse);
        let gan_zhi = |v: &Option<String>| v.as_deref().and_then(GanZhi::parse);
        Self {
            day_stem: Stem::parse(&ctx.day_stem),
            stem: Stem::parse(&ctx.stem),
            branch: Branch::parse(&ctx.branch),
            year_stem: stem(&ctx.year_stem),
            year_branch: branch(&ctx.year_branch),
            month_stem: stem(&ctx.month_stem),
            month_branch: branch(&ctx.month_branch),
            day_branch: branch(&ctx.day_branch),
            hour_stem: stem(&ctx.hour_stem),
            hour_branch: branch(&ctx.hour_branch),
            season: ctx.season.as_deref().and_then(Season::parse),
            ming_gong: gan_zhi(&ctx.ming_gong),
            shen_gong: gan_zhi(&ctx.shen_gong),
            tai_yuan: gan_zhi(&ctx.tai_yuan),
        }
    }
}

/// 内置神煞定义表
pub fn builtin_definitions() -> Vec<MarkerDefinition> {
    use MarkerDefinition as D;
    use RuleInput::*;

    vec![
        D::new("天乙贵人", DayStemBranch(rules::is_tian_yi_gui_ren)),
        D::new("禄神", DayStemBranch(rules::is_lu_shen)),
        D::new("羊刃", DayStemBranch(rules::is_yang_ren)),
        D::new("桃花", YearBranchBranch(rules::is_tao_hua)),
        D::new("华盖", YearBranchBranch(rules::is_hua_gai)),
        D::new("文昌", YearStemBranch(rules::is_wen_chang)),
        D::new("将星", YearBranchBranch(rules::is_jiang_xing)),
        D::new("驿马", YearBranchBranch(rules::is_yi_ma)),
        D::new("天德", MonthBranchStem(rules::is_tian_de)),
        D::new("月德", MonthBranchStem(rules::is_yue_de)),
        D::new("天医", YearStemBranch(rules::is_tian_yi)),
        D::new("劫煞", YearBranchBranch(rules::is_jie_sha)),
        D::new("灾煞", YearBranchBranch(rules::is_zai_sha)),
        D::new("天刑", YearBranchBranch(rules::is_tian_xing)),
        D::new("孤辰", YearBranchBranch(rules::is_gu_chen)),
        D::new("寡宿", YearBranchBranch(rules::is_gua_su)),
        D::new("魁罡", DayPillar(rules::is_kui_gang)),
        D::new("阴差阳错", DayPillar(rules::is_yin_cha_yang_cuo)),
        D::new("年空亡", PillarVoid(VoidAnchor::Year, rules::is_kong_wang)),
        D::new("月空亡", PillarVoid(VoidAnchor::Month, rules::is_kong_wang)),
        D::new("日空亡", PillarVoid(VoidAnchor::Day, rules::is_kong_wang)),
        D::new("时空亡", PillarVoid(VoidAnchor::Hour, rules::is_kong_wang)),
        D::new("命宫空亡", PillarVoid(VoidAnchor::MingGong, rules::is_kong_wang)),
        D::new("身宫空亡", PillarVoid(VoidAnchor::ShenGong, rules::is_kong_wang)),
        D::new("胎元空亡", PillarVoid(VoidAnchor::TaiYuan, rules::is_kong_wang)),
        D::new("太极贵人", DayStemBranch(rules::is_tai_ji_gui_ren)),
        D::new("金舆", DayStemBranch(rules::is_jin_yu)),
        D::new("国印贵人", DayOrYearStemBranch(rules::is_guo_yin_gui_ren)),
        D::new("三奇贵人", StemSequence(rules::is_san_qi_gui_ren)),
        D::new("福星贵人", DayStemBranch(rules::is_fu_xing_gui_ren)),
        D::new("文曲", YearBranchBranch(rules::is_wen_qu)),
        D::new("天喜", YearBranchBranch(rules::is_tian_xi)),
        D::new("红鸾", YearBranchBranch(rules::is_hong_luan)),
        D::new("红艳", YearBranchBranch(rules::is_hong_yan)),
        D::new("天姚", YearBranchBranch(rules::is_tian_yao)),
        D::new("学堂词馆", DayStemBranch(rules::is_xue_tang_ci_guan)),
        D::new("德秀贵人", MonthBranchStem(rules::is_de_xiu_gui_ren)),
        D::new("十恶大败", DayPillar(rules::is_shi_e_da_bai)),
        D::new("孤鸾煞", DayPillar(rules::is_gu_luan_sha)),
        D::new("四废", SeasonDayPillar(rules::is_si_fei)),
        D::new("天罗地网", NaYinDayPillar(rules::is_tian_luo_di_wang)),
        D::new("亡神", YearBranchBranch(rules::is_wang_shen)),
        D::new("披麻", YearBranchBranch(rules::is_pi_ma)),
        D::new("吊客", YearBranchBranch(rules::is_diao_ke)),
        D::new("丧门", YearBranchBranch(rules::is_sang_men)),
        D::new("元辰", YearBranchBranch(rules::is_yuan_chen)),
        D::new("天德合", MonthBranchStem(rules::is_tian_de_he)),
        D::new("天空", SingleBranch(rules::is_tian_kong)),
        D::new("地劫", SingleBranch(rules::is_di_jie)),
        D::new("天哭", SingleBranch(rules::is_tian_ku)),
        D::new("天虚", SingleBranch(rules::is_tian_xu)),
        D::new("咸池", SingleBranch(rules::is_xian_chi)),
        D::new("解神", MonthBranchBranch(rules::is_jie_shen)),
        D::new("金神", DayPillar(rules::is_jin_shen)),
        D::new("日德", DayPillar(rules::is_ri_de)),
        D::new("五鬼", YearBranchBranch(rules::is_wu_gui)),
        D::new("白虎", YearBranchBranch(rules::is_bai_hu)),
        D::new("天狗", YearBranchBranch(rules::is_tian_gou)),
        D::new("三台", YearStemBranch(rules::is_san_tai)),
        D::new("八座", YearStemBranch(rules::is_ba_zuo)),
        D::new("天赦", SeasonStemBranch(rules::is_tian_she)),
        D::new("天恩", StemBranch(rules::is_tian_en)),
        D::new("天福", StemBranch(rules::is_tian_fu)),
        D::new("太岁", YearBranchBranch(rules::is_tai_sui)),
        D::new("岁破", YearBranchBranch(rules::is_sui_po)),
        D::new("月德合", MonthBranchStem(rules::is_yue_de_he)),
        D::new("禄马同乡", StemWithBranches(rules::is_lu_ma_tong_xiang)),
        D::new("福德秀气", DayPillarMonthBranch(rules::is_fu_de_xiu_qi)),
        D::new("学堂", DayStemBranch(rules::is_xue_tang)),
        D::new("词馆", DayStemBranch(rules::is_ci_guan)),
        D::new("财富通门户", DayStemWithPillars(rules::is_cai_fu_tong_men_hu)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn find(name: &str) -> MarkerDefinition {
        builtin_definitions()
            .into_iter()
            .find(|d| d.name == name)
            .unwrap()
    }

    #[test]
    fn test_builtin_table_complete_and_unique() {
        let defs = builtin_definitions();
        assert_eq!(defs.len(), 71);
        let names: HashSet<_> = defs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn test_resolve_ignores_out_of_alphabet() {
        let ctx = CalculationContext::new("X", "", "丑").with_year("甲", "子午");
        let resolved = ResolvedContext::from(&ctx);
        assert_eq!(resolved.day_stem, None);
        assert_eq!(resolved.stem, None);
        assert_eq!(resolved.branch, Some(Branch::Chou));
        assert_eq!(resolved.year_stem, Some(Stem::Jia));
        assert_eq!(resolved.year_branch, None);
    }

    #[test]
    fn test_missing_field_evaluates_false() {
        let ctx = ResolvedContext::from(&CalculationContext::new("甲", "甲", "卯"));
        // 桃花需要年支
        assert!(!find("桃花").evaluate(&ctx));
        assert!(find("羊刃").evaluate(&ctx));
    }

    #[test]
    fn test_guo_yin_accepts_day_or_year_stem() {
        // 甲见戌；日干乙不成立，年干甲成立
        let ctx = CalculationContext::new("乙", "甲", "戌").with_year("甲", "子");
        assert!(find("国印贵人").evaluate(&ResolvedContext::from(&ctx)));
        let ctx = CalculationContext::new("乙", "甲", "戌");
        assert!(!find("国印贵人").evaluate(&ResolvedContext::from(&ctx)));
    }

    #[test]
    fn test_month_branch_stem_shape() {
        // 寅月德秀：丙丁为德，戊癸为秀
        let ctx = CalculationContext::new("甲", "戊", "子").with_month("丙", "寅");
        assert!(find("德秀贵人").evaluate(&ResolvedContext::from(&ctx)));
        assert!(!find("天德").evaluate(&ResolvedContext::from(&ctx)));
    }

    #[test]
    fn test_day_pillar_void() {
        // 甲子旬空戌亥
        let ctx = CalculationContext::new("甲", "壬", "戌").with_day_branch("子");
        let resolved = ResolvedContext::from(&ctx);
        assert!(find("日空亡").evaluate(&resolved));
        assert!(!find("年空亡").evaluate(&resolved));
    }

    #[test]
    fn test_palace_void_uses_palace_pillar() {
        let ctx = CalculationContext::new("甲", "壬", "戌").with_palaces(
            Some("甲子".to_string()),
            None,
            Some("bad".to_string()),
        );
        let resolved = ResolvedContext::from(&ctx);
        assert!(find("命宫空亡").evaluate(&resolved));
        assert!(!find("身宫空亡").evaluate(&resolved));
        assert!(!find("胎元空亡").evaluate(&resolved));
    }

    #[test]
    fn test_stem_sequence_uses_contiguous_stems() {
        let ctx = CalculationContext::new("丁", "丁", "未")
            .with_year("乙", "丑")
            .with_month("丙", "戌");
        assert!(find("三奇贵人").evaluate(&ResolvedContext::from(&ctx)));

        // 缺月干则年、日不相邻
        let mut gapped = ctx.clone();
        gapped.month_stem = None;
        assert!(!find("三奇贵人").evaluate(&ResolvedContext::from(&gapped)));
    }

    #[test]
    fn test_season_day_pillar_shape() {
        let ctx = CalculationContext::new("庚", "甲", "子")
            .with_day_branch("申")
            .with_season("春");
        assert!(find("四废").evaluate(&ResolvedContext::from(&ctx)));
    }

    #[test]
    fn test_nayin_shape() {
        // 丙寅年炉中火，日支戌为天罗
        let ctx = CalculationContext::new("甲", "甲", "子")
            .with_year("丙", "寅")
            .with_day_branch("戌");
        assert!(find("天罗地网").evaluate(&ResolvedContext::from(&ctx)));
    }

    #[test]
    fn test_required_fields_declared() {
        assert_eq!(find("天空").input.required_fields(), vec![Field::Branch]);
        assert_eq!(
            find("年空亡").input.required_fields(),
            vec![Field::YearStem, Field::YearBranch, Field::Branch]
        );
        assert!(find("财富通门户")
            .input
            .required_fields()
            .contains(&Field::MonthStem));
    }

    #[test]
    fn test_reads_pillar() {
        assert!(find("天乙贵人").input.reads_pillar());
        assert!(find("天德").input.reads_pillar());
        assert!(!find("魁罡").input.reads_pillar());
        assert!(!find("四废").input.reads_pillar());
        assert!(!find("三奇贵人").input.reads_pillar());
    }
}
