//! 五行模块
//!
//! 五行按 木→火→土→金→水 的顺序排列，相生为顺数一位，相克为顺数两位。
//! 任意有序的两行之间，恰好成立同我、我生、我克、克我、生我之一。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 五行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    /// 木
    Wood,
    /// 火
    Fire,
    /// 土
    Earth,
    /// 金
    Metal,
    /// 水
    Water,
}

impl Element {
    /// 全部五行，按相生顺序
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    const CHARS: [char; 5] = ['木', '火', '土', '金', '水'];

    /// 在相生顺序中的位置
    pub fn index(self) -> usize {
        self as usize
    }

    /// 按位置取五行（自动取模）
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 5]
    }

    /// 中文名称
    pub fn as_char(self) -> char {
        Self::CHARS[self.index()]
    }

    /// 从单个汉字解析
    pub fn from_char(c: char) -> Option<Self> {
        Self::CHARS
            .iter()
            .position(|&x| x == c)
            .map(Self::from_index)
    }

    /// 我所生者
    pub fn generates(self) -> Element {
        Self::from_index(self.index() + 1)
    }

    /// 我所克者
    pub fn restrains(self) -> Element {
        Self::from_index(self.index() + 2)
    }

    /// 以 self 为“我”，判断与 other 的生克关系
    pub fn relation(self, other: Element) -> ElementRelation {
        match (other.index() + 5 - self.index()) % 5 {
            0 => ElementRelation::Same,
            1 => ElementRelation::Generates,
            2 => ElementRelation::Restrains,
            3 => ElementRelation::RestrainedBy,
            _ => ElementRelation::GeneratedBy,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 两行之间的生克关系（以前者为“我”）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementRelation {
    /// 同我（比和）
    Same,
    /// 我生
    Generates,
    /// 我克
    Restrains,
    /// 生我
    GeneratedBy,
    /// 克我
    RestrainedBy,
}

impl ElementRelation {
    /// 是否为生扶关系（同我或生我）
    pub fn is_supportive(self) -> bool {
        matches!(self, ElementRelation::Same | ElementRelation::GeneratedBy)
    }
}

impl fmt::Display for ElementRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElementRelation::Same => "同我",
            ElementRelation::Generates => "我生",
            ElementRelation::Restrains => "我克",
            ElementRelation::GeneratedBy => "生我",
            ElementRelation::RestrainedBy => "克我",
        };
        write!(f, "{}", label)
    }
}
