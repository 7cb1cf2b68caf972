//! 干支符号模块
//!
//! 天干、地支、季节与六十甲子的基础运算：
//! - 干支序数、纳音、旬空、六冲、六合、天干五合
//! - 所有解析函数对字母表之外的输入返回 `None`，不会 panic

use crate::core::wuxing::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 十天干
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    /// 甲至癸
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    const CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

    /// 序号（甲 = 0）
    pub fn index(self) -> usize {
        self as usize
    }

    /// 按序号取天干（自动取模）
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    pub fn as_char(self) -> char {
        Self::CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::CHARS
            .iter()
            .position(|&x| x == c)
            .map(Self::from_index)
    }

    /// 解析恰好一个字符的字符串
    pub fn parse(s: &str) -> Option<Self> {
        single_char(s).and_then(Self::from_char)
    }

    /// 天干五行：甲乙木、丙丁火、戊己土、庚辛金、壬癸水
    pub fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    /// 阳干
    pub fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }

    /// 天干五合：甲己、乙庚、丙辛、丁壬、戊癸
    pub fn combine(self) -> Stem {
        Self::from_index(self.index() + 5)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 十二地支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// 三合局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trine {
    /// 申子辰
    Water,
    /// 巳酉丑
    Metal,
    /// 寅午戌
    Fire,
    /// 亥卯未
    Wood,
}

impl Branch {
    /// 子至亥
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    const CHARS: [char; 12] = [
        '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
    ];

    /// 序号（子 = 0）
    pub fn index(self) -> usize {
        self as usize
    }

    /// 按序号取地支（自动取模）
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn as_char(self) -> char {
        Self::CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::CHARS
            .iter()
            .position(|&x| x == c)
            .map(Self::from_index)
    }

    /// 解析恰好一个字符的字符串
    pub fn parse(s: &str) -> Option<Self> {
        single_char(s).and_then(Self::from_char)
    }

    /// 顺数 n 位
    pub fn offset(self, n: usize) -> Branch {
        Self::from_index(self.index() + n)
    }

    /// 地支本气五行
    pub fn element(self) -> Element {
        match self {
            Branch::Yin | Branch::Mao => Element::Wood,
            Branch::Si | Branch::Wu => Element::Fire,
            Branch::Shen | Branch::You => Element::Metal,
            Branch::Hai | Branch::Zi => Element::Water,
            Branch::Chen | Branch::Xu | Branch::Chou | Branch::Wei => Element::Earth,
        }
    }

    /// 阳支
    pub fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }

    /// 六冲：相隔六位
    pub fn clash(self) -> Branch {
        self.offset(6)
    }

    /// 六合：子丑、寅亥、卯戌、辰酉、巳申、午未
    pub fn six_harmony(self) -> Branch {
        Self::from_index(13 - self.index())
    }

    /// 所属三合局
    pub fn trine(self) -> Trine {
        match self.index() % 4 {
            0 => Trine::Water,
            1 => Trine::Metal,
            2 => Trine::Fire,
            _ => Trine::Wood,
        }
    }

    /// 所属方位季节：寅卯辰春、巳午未夏、申酉戌秋、亥子丑冬
    pub fn season(self) -> Season {
        Season::ALL[((self.index() + 10) % 12) / 3]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 季节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_char(self) -> char {
        match self {
            Season::Spring => '春',
            Season::Summer => '夏',
            Season::Autumn => '秋',
            Season::Winter => '冬',
        }
    }

    /// 接受“春”“春季”或英文名
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "春" | "春季" | "spring" => Some(Season::Spring),
            "夏" | "夏季" | "summer" => Some(Season::Summer),
            "秋" | "秋季" | "autumn" => Some(Season::Autumn),
            "冬" | "冬季" | "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    /// 由月支推季节
    pub fn from_month_branch(month_branch: Branch) -> Self {
        month_branch.season()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 一柱干支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GanZhi {
    /// 天干
    pub stem: Stem,
    /// 地支
    pub branch: Branch,
}

impl GanZhi {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// 解析两字干支代码，如“甲子”
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let stem = Stem::from_char(chars.next()?)?;
        let branch = Branch::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self { stem, branch })
    }

    /// 六十甲子序号（甲子 = 0），阴阳不配时为 None
    pub fn sexagenary_index(self) -> Option<usize> {
        sexagenary_index(self.stem, self.branch)
    }

    /// 纳音
    pub fn nayin(self) -> Option<NaYin> {
        nayin(self.stem, self.branch)
    }

    /// 本柱所在旬的两个空亡地支
    pub fn xun_kong(self) -> Option<[Branch; 2]> {
        xun_kong(self.stem, self.branch)
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl TryFrom<String> for GanZhi {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GanZhi::parse(&value).ok_or_else(|| format!("无效干支: {}", value))
    }
}

impl From<GanZhi> for String {
    fn from(value: GanZhi) -> Self {
        value.to_string()
    }
}

/// 六十甲子序号：idx ≡ s (mod 10) 且 idx ≡ b (mod 12)，即 (6s − 5b) mod 60
pub fn sexagenary_index(stem: Stem, branch: Branch) -> Option<usize> {
    let (s, b) = (stem.index(), branch.index());
    if s % 2 != b % 2 {
        return None;
    }
    Some((6 * s + 60 - 5 * b) % 60)
}

/// 旬空：(b − s + 10) mod 12 与 (b − s + 11) mod 12
pub fn xun_kong(stem: Stem, branch: Branch) -> Option<[Branch; 2]> {
    sexagenary_index(stem, branch)?;
    let (s, b) = (stem.index(), branch.index());
    Some([
        Branch::from_index(b + 22 - s),
        Branch::from_index(b + 23 - s),
    ])
}

/// 纳音
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NaYin {
    /// 名称，如“海中金”
    pub name: &'static str,
    /// 纳音五行
    pub element: Element,
}

const fn ny(name: &'static str, element: Element) -> NaYin {
    NaYin { name, element }
}

/// 三十组纳音，每两个相邻的甲子共用一组
const NAYIN_TABLE: [NaYin; 30] = [
    ny("海中金", Element::Metal),
    ny("炉中火", Element::Fire),
    ny("大林木", Element::Wood),
    ny("路旁土", Element::Earth),
    ny("剑锋金", Element::Metal),
    ny("山头火", Element::Fire),
    ny("涧下水", Element::Water),
    ny("城头土", Element::Earth),
    ny("白蜡金", Element::Metal),
    ny("杨柳木", Element::Wood),
    ny("泉中水", Element::Water),
    ny("屋上土", Element::Earth),
    ny("霹雳火", Element::Fire),
    ny("松柏木", Element::Wood),
    ny("长流水", Element::Water),
    ny("沙中金", Element::Metal),
    ny("山下火", Element::Fire),
    ny("平地木", Element::Wood),
    ny("壁上土", Element::Earth),
    ny("金箔金", Element::Metal),
    ny("覆灯火", Element::Fire),
    ny("天河水", Element::Water),
    ny("大驿土", Element::Earth),
    ny("钗钏金", Element::Metal),
    ny("桑柘木", Element::Wood),
    ny("大溪水", Element::Water),
    ny("沙中土", Element::Earth),
    ny("天上火", Element::Fire),
    ny("石榴木", Element::Wood),
    ny("大海水", Element::Water),
];

/// 取干支纳音，阴阳不配时为 None
pub fn nayin(stem: Stem, branch: Branch) -> Option<NaYin> {
    sexagenary_index(stem, branch).map(|i| NAYIN_TABLE[i / 2])
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gz(code: &str) -> GanZhi {
        GanZhi::parse(code).unwrap()
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(Stem::parse("甲"), Some(Stem::Jia));
        assert_eq!(Stem::parse("癸"), Some(Stem::Gui));
        assert_eq!(Stem::parse("子"), None);
        assert_eq!(Stem::parse("甲乙"), None);
        assert_eq!(Stem::parse(""), None);
        assert_eq!(Branch::parse("亥"), Some(Branch::Hai));
        assert_eq!(Branch::parse("x"), None);
        assert_eq!(Season::parse("秋"), Some(Season::Autumn));
        assert_eq!(Season::parse("winter"), Some(Season::Winter));
        assert_eq!(Season::parse("雨季"), None);
    }

    #[test]
    fn test_gan_zhi_parse() {
        assert_eq!(gz("甲子"), GanZhi::new(Stem::Jia, Branch::Zi));
        assert!(GanZhi::parse("甲").is_none());
        assert!(GanZhi::parse("甲子丑").is_none());
        assert!(GanZhi::parse("子甲").is_none());
        assert_eq!(gz("癸亥").to_string(), "癸亥");
    }

    #[test]
    fn test_sexagenary_index() {
        assert_eq!(gz("甲子").sexagenary_index(), Some(0));
        assert_eq!(gz("乙丑").sexagenary_index(), Some(1));
        assert_eq!(gz("甲戌").sexagenary_index(), Some(10));
        assert_eq!(gz("癸亥").sexagenary_index(), Some(59));
        // 阴阳不配
        assert_eq!(gz("甲丑").sexagenary_index(), None);
    }

    #[test]
    fn test_sexagenary_index_covers_full_cycle() {
        let mut seen = vec![false; 60];
        for i in 0..60 {
            let g = GanZhi::new(Stem::from_index(i), Branch::from_index(i));
            assert_eq!(g.sexagenary_index(), Some(i));
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_nayin() {
        let n = gz("甲子").nayin().unwrap();
        assert_eq!(n.name, "海中金");
        assert_eq!(n.element, Element::Metal);
        assert_eq!(gz("乙丑").nayin().unwrap().name, "海中金");
        assert_eq!(gz("丙寅").nayin().unwrap().name, "炉中火");
        assert_eq!(gz("壬戌").nayin().unwrap().name, "大海水");
        assert_eq!(gz("戊午").nayin().unwrap().element, Element::Fire);
        assert!(gz("甲丑").nayin().is_none());
    }

    #[test]
    fn test_xun_kong() {
        // 甲子旬空戌亥
        assert_eq!(gz("甲子").xun_kong(), Some([Branch::Xu, Branch::Hai]));
        assert_eq!(gz("癸酉").xun_kong(), Some([Branch::Xu, Branch::Hai]));
        // 甲戌旬空申酉
        assert_eq!(gz("甲戌").xun_kong(), Some([Branch::Shen, Branch::You]));
        // 甲寅旬空子丑
        assert_eq!(gz("丁巳").xun_kong(), Some([Branch::Zi, Branch::Chou]));
        assert_eq!(gz("甲丑").xun_kong(), None);
    }

    #[test]
    fn test_clash_and_harmony() {
        assert_eq!(Branch::Zi.clash(), Branch::Wu);
        assert_eq!(Branch::Hai.clash(), Branch::Si);
        assert_eq!(Branch::Zi.six_harmony(), Branch::Chou);
        assert_eq!(Branch::Yin.six_harmony(), Branch::Hai);
        assert_eq!(Branch::Wu.six_harmony(), Branch::Wei);
        for b in Branch::ALL {
            assert_eq!(b.six_harmony().six_harmony(), b);
            assert_eq!(b.clash().clash(), b);
        }
    }

    #[test]
    fn test_stem_combine_and_element() {
        assert_eq!(Stem::Jia.combine(), Stem::Ji);
        assert_eq!(Stem::Ji.combine(), Stem::Jia);
        assert_eq!(Stem::Wu.combine(), Stem::Gui);
        assert_eq!(Stem::Bing.element(), Element::Fire);
        assert_eq!(Stem::Gui.element(), Element::Water);
    }

    #[test]
    fn test_trine_and_season() {
        assert_eq!(Branch::Shen.trine(), Trine::Water);
        assert_eq!(Branch::Chen.trine(), Trine::Water);
        assert_eq!(Branch::Chou.trine(), Trine::Metal);
        assert_eq!(Branch::Xu.trine(), Trine::Fire);
        assert_eq!(Branch::Wei.trine(), Trine::Wood);
        assert_eq!(Season::from_month_branch(Branch::Yin), Season::Spring);
        assert_eq!(Season::from_month_branch(Branch::Chen), Season::Spring);
        assert_eq!(Season::from_month_branch(Branch::Wei), Season::Summer);
        assert_eq!(Season::from_month_branch(Branch::Xu), Season::Autumn);
        assert_eq!(Season::from_month_branch(Branch::Zi), Season::Winter);
        assert_eq!(Season::from_month_branch(Branch::Chou), Season::Winter);
    }

    #[test]
    fn test_gan_zhi_serde() {
        let json = serde_json::to_string(&gz("丙午")).unwrap();
        assert_eq!(json, "\"丙午\"");
        let back: GanZhi = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gz("丙午"));
        assert!(serde_json::from_str::<GanZhi>("\"丙\"").is_err());
    }
}
