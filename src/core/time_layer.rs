//! 时间层级神煞
//!
//! 大运、流年、流月、流日、流时、小运各自用同一套规则计算，
//! 再叠加少量层级专属神煞（大运禄神、太岁）。
//! 提供命盘时，年支、月支等字段取自命盘，使依赖年支的规则对运限同样生效。

use crate::core::error::{ShenShaError, ShenShaResult};
use crate::core::ganzhi::GanZhi;
use crate::core::models::{CalculationContext, FourPillarContext, TimeLayer};
use crate::core::rule_engine::CalculationEngine;
use crate::core::rules;
use std::collections::{BTreeMap, BTreeSet};

/// 时间层级服务
pub struct TimeLayerService<'a> {
    engine: &'a CalculationEngine,
    /// 可选的本命盘
    natal: Option<&'a FourPillarContext>,
}

impl<'a> TimeLayerService<'a> {
    pub fn new(engine: &'a CalculationEngine) -> Self {
        Self {
            engine,
            natal: None,
        }
    }

    /// 以本命盘为背景计算运限
    pub fn with_natal(mut self, chart: &'a FourPillarContext) -> Self {
        self.natal = Some(chart);
        self
    }

    /// 计算某一层级的神煞；代码不是两个字符时返回空列表
    ///
    /// 两个字符但不在干支表内时，通用规则一律不命中，只剩不看干支的层级神煞（流年太岁）。
    pub fn calculate_layer_markers(&self, layer: TimeLayer, day_stem: &str, code: &str) -> Vec<String> {
        let mut chars = code.chars();
        let (Some(stem), Some(branch), None) = (chars.next(), chars.next(), chars.next()) else {
            tracing::debug!("{} 干支长度不对，跳过: {:?}", layer, code);
            return Vec::new();
        };

        let gan_zhi = GanZhi::parse(code);
        let ctx = match (gan_zhi, self.natal) {
            (Some(gan_zhi), Some(chart)) => CalculationContext {
                day_stem: day_stem.to_string(),
                ..chart.context_for(gan_zhi)
            },
            _ => CalculationContext::new(day_stem, stem.to_string(), branch.to_string()),
        }
        .with_pillar_type(layer.label());

        let mut markers: BTreeSet<String> = self.engine.calculate_markers(&ctx).into_iter().collect();
        markers.extend(layer_exclusive_markers(layer, gan_zhi).into_iter().map(String::from));

        tracing::debug!("{} {} 神煞 {} 个", layer, code, markers.len());
        markers.into_iter().collect()
    }

    pub fn calculate_decade_markers(&self, day_stem: &str, code: &str) -> Vec<String> {
        self.calculate_layer_markers(TimeLayer::Decade, day_stem, code)
    }

    pub fn calculate_year_markers(&self, day_stem: &str, code: &str) -> Vec<String> {
        self.calculate_layer_markers(TimeLayer::Year, day_stem, code)
    }

    pub fn calculate_month_markers(&self, day_stem: &str, code: &str) -> Vec<String> {
        self.calculate_layer_markers(TimeLayer::Month, day_stem, code)
    }

    pub fn calculate_day_markers(&self, day_stem: &str, code: &str) -> Vec<String> {
        self.calculate_layer_markers(TimeLayer::Day, day_stem, code)
    }

    pub fn calculate_hour_markers(&self, day_stem: &str, code: &str) -> Vec<String> {
        self.calculate_layer_markers(TimeLayer::Hour, day_stem, code)
    }

    pub fn calculate_sub_decade_markers(&self, day_stem: &str, code: &str) -> Vec<String> {
        self.calculate_layer_markers(TimeLayer::SubDecade, day_stem, code)
    }

    /// 批量计算：键为层级名（中文或英文），不认识的层级得到空列表
    pub fn calculate_batch_markers(
        &self,
        day_stem: &str,
        layers: &BTreeMap<String, String>,
    ) -> BTreeMap<String, Vec<String>> {
        layers
            .iter()
            .map(|(key, code)| {
                let markers = match key.parse::<TimeLayer>() {
                    Ok(layer) => self.calculate_layer_markers(layer, day_stem, code),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        Vec::new()
                    }
                };
                (key.clone(), markers)
            })
            .collect()
    }
}

/// 层级专属神煞；干支无效时只有流年太岁
pub fn layer_exclusive_markers(layer: TimeLayer, gan_zhi: Option<GanZhi>) -> Vec<&'static str> {
    match layer {
        TimeLayer::Decade if gan_zhi.is_some_and(|g| rules::is_lu_shen(g.stem, g.branch)) => {
            vec!["大运禄神"]
        }
        TimeLayer::Year => vec!["太岁"],
        _ => Vec::new(),
    }
}

/// 支持的层级名称
pub fn supported_layers() -> Vec<&'static str> {
    TimeLayer::ALL.iter().map(|l| l.label()).collect()
}

/// 校验层级与干支代码，返回解析结果
pub fn check_time_layer_params(layer: &str, code: &str) -> ShenShaResult<(TimeLayer, GanZhi)> {
    let layer = layer.parse::<TimeLayer>()?;
    let gan_zhi =
        GanZhi::parse(code).ok_or_else(|| ShenShaError::InvalidGanZhi(code.to_string()))?;
    Ok((layer, gan_zhi))
}

pub fn validate_time_layer_params(layer: &str, code: &str) -> bool {
    check_time_layer_params(layer, code).is_ok()
}
