//! 神煞规则库
//!
//! 每条规则都是纯函数：只读入参，不依赖任何外部状态，同样输入永远同样结果。
//! 参数已是强类型的干支，字母表之外的输入在适配层被过滤，不会到达这里。
//!
//! 查法口诀写在各函数旁，便于与古籍对照。

use crate::core::ganzhi::{nayin, xun_kong, Branch, Season, Stem, Trine};
use crate::core::wuxing::Element;
use Branch::*;

// ============================================================================
// 日干查
// ============================================================================

/// 天乙贵人：甲戊庚牛羊，乙己鼠猴乡，丙丁猪鸡位，壬癸蛇兔藏，六辛逢马虎
pub fn is_tian_yi_gui_ren(day_stem: Stem, branch: Branch) -> bool {
    tian_yi_branches(day_stem).contains(&branch)
}

pub(crate) fn tian_yi_branches(stem: Stem) -> [Branch; 2] {
    match stem {
        Stem::Jia | Stem::Wu | Stem::Geng => [Chou, Wei],
        Stem::Yi | Stem::Ji => [Zi, Shen],
        Stem::Bing | Stem::Ding => [Hai, You],
        Stem::Ren | Stem::Gui => [Si, Mao],
        Stem::Xin => [Wu, Yin],
    }
}

/// 禄位：甲禄寅、乙禄卯、丙戊禄巳、丁己禄午、庚禄申、辛禄酉、壬禄亥、癸禄子
pub(crate) fn lu_branch(stem: Stem) -> Branch {
    match stem {
        Stem::Jia => Yin,
        Stem::Yi => Mao,
        Stem::Bing | Stem::Wu => Si,
        Stem::Ding | Stem::Ji => Wu,
        Stem::Geng => Shen,
        Stem::Xin => You,
        Stem::Ren => Hai,
        Stem::Gui => Zi,
    }
}

/// 禄神
pub fn is_lu_shen(day_stem: Stem, branch: Branch) -> bool {
    lu_branch(day_stem) == branch
}

/// 羊刃：甲刃卯、乙刃寅、丙戊刃午、丁己刃巳、庚刃酉、辛刃申、壬刃子、癸刃亥
pub fn is_yang_ren(day_stem: Stem, branch: Branch) -> bool {
    let target = match day_stem {
        Stem::Jia => Mao,
        Stem::Yi => Yin,
        Stem::Bing | Stem::Wu => Wu,
        Stem::Ding | Stem::Ji => Si,
        Stem::Geng => You,
        Stem::Xin => Shen,
        Stem::Ren => Zi,
        Stem::Gui => Hai,
    };
    target == branch
}

/// 太极贵人：甲乙子午、丙丁卯酉、戊己辰戌丑未、庚辛寅亥、壬癸巳申
pub fn is_tai_ji_gui_ren(day_stem: Stem, branch: Branch) -> bool {
    match day_stem {
        Stem::Jia | Stem::Yi => matches!(branch, Zi | Wu),
        Stem::Bing | Stem::Ding => matches!(branch, Mao | You),
        Stem::Wu | Stem::Ji => matches!(branch, Chen | Xu | Chou | Wei),
        Stem::Geng | Stem::Xin => matches!(branch, Yin | Hai),
        Stem::Ren | Stem::Gui => matches!(branch, Si | Shen),
    }
}

/// 金舆：甲辰、乙巳、丙戊未、丁己申、庚戌、辛亥、壬丑、癸寅
pub fn is_jin_yu(day_stem: Stem, branch: Branch) -> bool {
    let target = match day_stem {
        Stem::Jia => Chen,
        Stem::Yi => Si,
        Stem::Bing | Stem::Wu => Wei,
        Stem::Ding | Stem::Ji => Shen,
        Stem::Geng => Xu,
        Stem::Xin => Hai,
        Stem::Ren => Chou,
        Stem::Gui => Yin,
    };
    target == branch
}

/// 国印贵人：甲戌、乙亥、丙戊丑、丁己寅、庚辰、辛巳、壬未、癸申
pub fn is_guo_yin_gui_ren(stem: Stem, branch: Branch) -> bool {
    let target = match stem {
        Stem::Jia => Xu,
        Stem::Yi => Hai,
        Stem::Bing | Stem::Wu => Chou,
        Stem::Ding | Stem::Ji => Yin,
        Stem::Geng => Chen,
        Stem::Xin => Si,
        Stem::Ren => Wei,
        Stem::Gui => Shen,
    };
    target == branch
}

/// 福星贵人：甲丙寅子、乙癸卯丑、戊申、己未、丁亥、庚午、辛巳、壬辰
pub fn is_fu_xing_gui_ren(day_stem: Stem, branch: Branch) -> bool {
    match day_stem {
        Stem::Jia | Stem::Bing => matches!(branch, Yin | Zi),
        Stem::Yi | Stem::Gui => matches!(branch, Mao | Chou),
        Stem::Wu => branch == Shen,
        Stem::Ji => branch == Wei,
        Stem::Ding => branch == Hai,
        Stem::Geng => branch == Wu,
        Stem::Xin => branch == Si,
        Stem::Ren => branch == Chen,
    }
}

/// 学堂词馆（合称）：甲卯、乙辰、丙戊巳、丁己午、庚申、辛酉、壬亥、癸子
pub fn is_xue_tang_ci_guan(day_stem: Stem, branch: Branch) -> bool {
    let target = match day_stem {
        Stem::Jia => Mao,
        Stem::Yi => Chen,
        Stem::Bing | Stem::Wu => Si,
        Stem::Ding | Stem::Ji => Wu,
        Stem::Geng => Shen,
        Stem::Xin => You,
        Stem::Ren => Hai,
        Stem::Gui => Zi,
    };
    target == branch
}

/// 学堂：日干长生之地
pub fn is_xue_tang(day_stem: Stem, branch: Branch) -> bool {
    let target = match day_stem {
        Stem::Jia => Si,
        Stem::Yi => Wu,
        Stem::Bing | Stem::Wu => Shen,
        Stem::Ding | Stem::Ji => You,
        Stem::Geng => Hai,
        Stem::Xin => Zi,
        Stem::Ren => Yin,
        Stem::Gui => Mao,
    };
    target == branch
}

/// 词馆
pub fn is_ci_guan(day_stem: Stem, branch: Branch) -> bool {
    let target = match day_stem {
        Stem::Jia => Wu,
        Stem::Yi => Si,
        Stem::Bing | Stem::Wu => You,
        Stem::Ding | Stem::Ji => Shen,
        Stem::Geng => Zi,
        Stem::Xin => Hai,
        Stem::Ren => Mao,
        Stem::Gui => Yin,
    };
    target == branch
}

// ============================================================================
// 年干查
// ============================================================================

/// 文昌：甲乙巳、丙丁戊己申、庚辛亥、壬癸寅
pub fn is_wen_chang(year_stem: Stem, branch: Branch) -> bool {
    let target = match year_stem {
        Stem::Jia | Stem::Yi => Si,
        Stem::Bing | Stem::Ding | Stem::Wu | Stem::Ji => Shen,
        Stem::Geng | Stem::Xin => Hai,
        Stem::Ren | Stem::Gui => Yin,
    };
    target == branch
}

/// 天医：甲丑、乙子、丙亥、丁戌……逆行十位
pub fn is_tian_yi(year_stem: Stem, branch: Branch) -> bool {
    Branch::from_index(13 - year_stem.index()) == branch
}

/// 三台：与禄位同
pub fn is_san_tai(year_stem: Stem, branch: Branch) -> bool {
    lu_branch(year_stem) == branch
}

/// 八座：甲丑、乙寅、丙戊辰、丁己巳、庚未、辛申、壬戌、癸亥
pub fn is_ba_zuo(year_stem: Stem, branch: Branch) -> bool {
    let target = match year_stem {
        Stem::Jia => Chou,
        Stem::Yi => Yin,
        Stem::Bing | Stem::Wu => Chen,
        Stem::Ding | Stem::Ji => Si,
        Stem::Geng => Wei,
        Stem::Xin => Shen,
        Stem::Ren => Xu,
        Stem::Gui => Hai,
    };
    target == branch
}

// ============================================================================
// 年支查（三合局与四季）
// ============================================================================

/// 桃花：寅午戌卯、申子辰酉、巳酉丑午、亥卯未子
pub fn is_tao_hua(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Mao,
        Trine::Water => You,
        Trine::Metal => Wu,
        Trine::Wood => Zi,
    };
    target == branch
}

/// 华盖：三合局墓库
pub fn is_hua_gai(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Xu,
        Trine::Water => Chen,
        Trine::Metal => Chou,
        Trine::Wood => Wei,
    };
    target == branch
}

/// 将星：三合局中神
pub fn is_jiang_xing(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Wu,
        Trine::Water => Zi,
        Trine::Metal => You,
        Trine::Wood => Mao,
    };
    target == branch
}

pub(crate) fn yi_ma_branch(branch: Branch) -> Branch {
    match branch.trine() {
        Trine::Fire => Shen,
        Trine::Water => Yin,
        Trine::Metal => Hai,
        Trine::Wood => Si,
    }
}

/// 驿马：申子辰马在寅、寅午戌马在申、巳酉丑马在亥、亥卯未马在巳
pub fn is_yi_ma(year_branch: Branch, branch: Branch) -> bool {
    yi_ma_branch(year_branch) == branch
}

/// 劫煞
pub fn is_jie_sha(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Hai,
        Trine::Water => Si,
        Trine::Metal => Yin,
        Trine::Wood => Shen,
    };
    target == branch
}

/// 灾煞：将星之冲
pub fn is_zai_sha(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Zi,
        Trine::Water => Wu,
        Trine::Metal => Mao,
        Trine::Wood => You,
    };
    target == branch
}

/// 天刑
pub fn is_tian_xing(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Yin,
        Trine::Water => Shen,
        Trine::Metal => Si,
        Trine::Wood => Hai,
    };
    target == branch
}

/// 亡神
pub fn is_wang_shen(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Water => Hai,
        Trine::Fire => Si,
        Trine::Metal => Shen,
        Trine::Wood => Yin,
    };
    target == branch
}

/// 五鬼
pub fn is_wu_gui(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Water => Mao,
        Trine::Fire => You,
        Trine::Metal => Zi,
        Trine::Wood => Wu,
    };
    target == branch
}

/// 文曲
pub fn is_wen_qu(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.trine() {
        Trine::Fire => Chou,
        Trine::Water => Wei,
        Trine::Wood => Chen,
        Trine::Metal => Xu,
    };
    target == branch
}

/// 孤辰：寅卯辰见寅、巳午未见巳、申酉戌见申、亥子丑见亥
pub fn is_gu_chen(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.season() {
        Season::Spring => Yin,
        Season::Summer => Si,
        Season::Autumn => Shen,
        Season::Winter => Hai,
    };
    target == branch
}

/// 寡宿：寅卯辰见戌、巳午未见丑、申酉戌见辰、亥子丑见未
pub fn is_gua_su(year_branch: Branch, branch: Branch) -> bool {
    let target = match year_branch.season() {
        Season::Spring => Xu,
        Season::Summer => Chou,
        Season::Autumn => Chen,
        Season::Winter => Wei,
    };
    target == branch
}

/// 天喜：子见酉、丑见申……逆行
pub fn is_tian_xi(year_branch: Branch, branch: Branch) -> bool {
    Branch::from_index(21 - year_branch.index()) == branch
}

/// 红鸾：与天喜同位
pub fn is_hong_luan(year_branch: Branch, branch: Branch) -> bool {
    is_tian_xi(year_branch, branch)
}

/// 红艳：与天喜同位
pub fn is_hong_yan(year_branch: Branch, branch: Branch) -> bool {
    is_tian_xi(year_branch, branch)
}

/// 天姚：年支顺数五位
pub fn is_tian_yao(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(5) == branch
}

/// 披麻：年支顺数九位
pub fn is_pi_ma(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(9) == branch
}

/// 吊客：年支顺数十位
pub fn is_diao_ke(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(10) == branch
}

/// 丧门：年支顺数两位
pub fn is_sang_men(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(2) == branch
}

/// 元辰：年支顺数七位
pub fn is_yuan_chen(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(7) == branch
}

/// 白虎：年支顺数八位
pub fn is_bai_hu(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(8) == branch
}

/// 天狗：年支顺数十位
pub fn is_tian_gou(year_branch: Branch, branch: Branch) -> bool {
    year_branch.offset(10) == branch
}

/// 太岁：与年支同
pub fn is_tai_sui(year_branch: Branch, branch: Branch) -> bool {
    year_branch == branch
}

/// 岁破：冲年支
pub fn is_sui_po(year_branch: Branch, branch: Branch) -> bool {
    year_branch.clash() == branch
}

// ============================================================================
// 月支查
// ============================================================================

/// 天德所在天干；卯、午、酉、子四月天德落在地支，无对应天干
pub(crate) fn tian_de_stem(month_branch: Branch) -> Option<Stem> {
    match month_branch {
        Yin => Some(Stem::Ding),
        Chen => Some(Stem::Ren),
        Si => Some(Stem::Xin),
        Wei => Some(Stem::Jia),
        Shen => Some(Stem::Gui),
        Xu => Some(Stem::Bing),
        Hai => Some(Stem::Yi),
        Chou => Some(Stem::Geng),
        Mao | Wu | You | Zi => None,
    }
}

/// 天德：正丁二申宫，三壬四辛同，五亥六甲上，七癸八寅逢，九丙十居乙，子巳丑庚中
pub fn is_tian_de(month_branch: Branch, stem: Stem) -> bool {
    tian_de_stem(month_branch) == Some(stem)
}

/// 天德合：天德之五合
pub fn is_tian_de_he(month_branch: Branch, stem: Stem) -> bool {
    tian_de_stem(month_branch).map(Stem::combine) == Some(stem)
}

/// 月德：正丙、二甲、三丁、四辛、五己、六丁、七壬、八辛、九戊、十乙、冬己、腊丁
pub(crate) fn yue_de_stem(month_branch: Branch) -> Stem {
    match month_branch {
        Yin => Stem::Bing,
        Mao => Stem::Jia,
        Chen => Stem::Ding,
        Si => Stem::Xin,
        Wu => Stem::Ji,
        Wei => Stem::Ding,
        Shen => Stem::Ren,
        You => Stem::Xin,
        Xu => Stem::Wu,
        Hai => Stem::Yi,
        Zi => Stem::Ji,
        Chou => Stem::Ding,
    }
}

pub fn is_yue_de(month_branch: Branch, stem: Stem) -> bool {
    yue_de_stem(month_branch) == stem
}

/// 月德合：月德之五合
pub fn is_yue_de_he(month_branch: Branch, stem: Stem) -> bool {
    yue_de_stem(month_branch).combine() == stem
}

/// 德秀贵人：以月支三合局定德、秀二组天干，本柱天干入其一即是
pub fn is_de_xiu_gui_ren(month_branch: Branch, stem: Stem) -> bool {
    let (de, xiu): (&[Stem], &[Stem]) = match month_branch.trine() {
        Trine::Fire => (&[Stem::Bing, Stem::Ding], &[Stem::Wu, Stem::Gui]),
        Trine::Water => (
            &[Stem::Ren, Stem::Gui, Stem::Wu, Stem::Ji],
            &[Stem::Bing, Stem::Xin, Stem::Jia, Stem::Ji],
        ),
        Trine::Metal => (&[Stem::Geng, Stem::Xin], &[Stem::Yi, Stem::Geng]),
        Trine::Wood => (&[Stem::Jia, Stem::Yi], &[Stem::Ding, Stem::Ren]),
    };
    de.contains(&stem) || xiu.contains(&stem)
}

/// 解神：月支顺数七位
pub fn is_jie_shen(month_branch: Branch, branch: Branch) -> bool {
    month_branch.offset(7) == branch
}

// ============================================================================
// 日柱查
// ============================================================================

/// 魁罡：庚戌、庚辰、戊戌、壬辰
pub fn is_kui_gang(day_stem: Stem, day_branch: Branch) -> bool {
    matches!(
        (day_stem, day_branch),
        (Stem::Geng, Xu) | (Stem::Geng, Chen) | (Stem::Wu, Xu) | (Stem::Ren, Chen)
    )
}

/// 阴差阳错：丙子、丁丑、戊寅、辛卯、壬辰、癸巳、丙午、丁未、戊申、辛酉、壬戌、癸亥
pub fn is_yin_cha_yang_cuo(day_stem: Stem, day_branch: Branch) -> bool {
    matches!(
        (day_stem, day_branch),
        (Stem::Bing, Zi)
            | (Stem::Ding, Chou)
            | (Stem::Wu, Yin)
            | (Stem::Xin, Mao)
            | (Stem::Ren, Chen)
            | (Stem::Gui, Si)
            | (Stem::Bing, Wu)
            | (Stem::Ding, Wei)
            | (Stem::Wu, Shen)
            | (Stem::Xin, You)
            | (Stem::Ren, Xu)
            | (Stem::Gui, Hai)
    )
}

/// 十恶大败：甲辰、乙巳、丙申、丁亥、戊戌、己丑、庚辰、辛巳、壬申、癸亥
pub fn is_shi_e_da_bai(day_stem: Stem, day_branch: Branch) -> bool {
    let target = match day_stem {
        Stem::Jia => Chen,
        Stem::Yi => Si,
        Stem::Bing => Shen,
        Stem::Ding => Hai,
        Stem::Wu => Xu,
        Stem::Ji => Chou,
        Stem::Geng => Chen,
        Stem::Xin => Si,
        Stem::Ren => Shen,
        Stem::Gui => Hai,
    };
    target == day_branch
}

/// 孤鸾煞：乙巳、丁巳、辛亥、戊申、壬寅、戊午、壬子、丙午
pub fn is_gu_luan_sha(day_stem: Stem, day_branch: Branch) -> bool {
    matches!(
        (day_stem, day_branch),
        (Stem::Yi, Si)
            | (Stem::Ding, Si)
            | (Stem::Xin, Hai)
            | (Stem::Wu, Shen)
            | (Stem::Ren, Yin)
            | (Stem::Wu, Wu)
            | (Stem::Ren, Zi)
            | (Stem::Bing, Wu)
    )
}

/// 日德：甲寅、戊辰、丙辰、庚辰、壬戌
pub fn is_ri_de(day_stem: Stem, day_branch: Branch) -> bool {
    matches!(
        (day_stem, day_branch),
        (Stem::Jia, Yin) | (Stem::Wu, Chen) | (Stem::Bing, Chen) | (Stem::Geng, Chen) | (Stem::Ren, Xu)
    )
}

/// 金神：乙丑、己巳、癸酉
pub fn is_jin_shen(day_stem: Stem, day_branch: Branch) -> bool {
    matches!(
        (day_stem, day_branch),
        (Stem::Yi, Chou) | (Stem::Ji, Si) | (Stem::Gui, You)
    )
}

/// 四废：春庚申辛酉、夏壬子癸亥、秋甲寅乙卯、冬丙午丁巳
pub fn is_si_fei(season: Season, day_stem: Stem, day_branch: Branch) -> bool {
    match season {
        Season::Spring => matches!((day_stem, day_branch), (Stem::Geng, Shen) | (Stem::Xin, You)),
        Season::Summer => matches!((day_stem, day_branch), (Stem::Ren, Zi) | (Stem::Gui, Hai)),
        Season::Autumn => matches!((day_stem, day_branch), (Stem::Jia, Yin) | (Stem::Yi, Mao)),
        Season::Winter => matches!((day_stem, day_branch), (Stem::Bing, Wu) | (Stem::Ding, Si)),
    }
}

/// 天罗地网：年命纳音火见戌亥为天罗，水土见辰巳为地网
pub fn is_tian_luo_di_wang(year_nayin: Element, _day_stem: Stem, day_branch: Branch) -> bool {
    match year_nayin {
        Element::Fire => matches!(day_branch, Xu | Hai),
        Element::Water | Element::Earth => matches!(day_branch, Chen | Si),
        Element::Wood | Element::Metal => false,
    }
}

/// 福德秀气：月令生扶日干，且日支不落辰戌
pub fn is_fu_de_xiu_qi(day_stem: Stem, day_branch: Branch, month_branch: Branch) -> bool {
    let supported = day_stem
        .element()
        .relation(month_branch.element())
        .is_supportive();
    supported && !matches!(day_branch, Chen | Xu)
}

// ============================================================================
// 干支自查与季节
// ============================================================================

/// 天赦：春戊寅、夏甲午、秋戊申、冬甲子
pub fn is_tian_she(season: Season, stem: Stem, branch: Branch) -> bool {
    match season {
        Season::Spring => (stem, branch) == (Stem::Wu, Yin),
        Season::Summer => (stem, branch) == (Stem::Jia, Wu),
        Season::Autumn => (stem, branch) == (Stem::Wu, Shen),
        Season::Winter => (stem, branch) == (Stem::Jia, Zi),
    }
}

/// 天恩：甲己丑、乙庚寅、丙辛巳、丁壬申、戊癸亥
pub fn is_tian_en(stem: Stem, branch: Branch) -> bool {
    let target = match stem {
        Stem::Jia | Stem::Ji => Chou,
        Stem::Yi | Stem::Geng => Yin,
        Stem::Bing | Stem::Xin => Si,
        Stem::Ding | Stem::Ren => Shen,
        Stem::Wu | Stem::Gui => Hai,
    };
    target == branch
}

/// 天福：甲亥、乙子、丙寅、丁卯、戊巳、己午、庚申、辛酉、壬亥、癸子
pub fn is_tian_fu(stem: Stem, branch: Branch) -> bool {
    let target = match stem {
        Stem::Jia => Hai,
        Stem::Yi => Zi,
        Stem::Bing => Yin,
        Stem::Ding => Mao,
        Stem::Wu => Si,
        Stem::Ji => Wu,
        Stem::Geng => Shen,
        Stem::Xin => You,
        Stem::Ren => Hai,
        Stem::Gui => Zi,
    };
    target == branch
}

// ============================================================================
// 仅看地支
// ============================================================================

pub fn is_tian_kong(branch: Branch) -> bool {
    branch == Xu
}

pub fn is_di_jie(branch: Branch) -> bool {
    branch == Chen
}

pub fn is_tian_ku(branch: Branch) -> bool {
    branch == Wei
}

pub fn is_tian_xu(branch: Branch) -> bool {
    branch == Chou
}

/// 咸池：四库
pub fn is_xian_chi(branch: Branch) -> bool {
    matches!(branch, Chou | Wei | Chen | Xu)
}

// ============================================================================
// 多柱组合
// ============================================================================

/// 空亡：以参照柱定旬，本柱地支落入旬空
pub fn is_kong_wang(pillar_stem: Stem, pillar_branch: Branch, branch: Branch) -> bool {
    xun_kong(pillar_stem, pillar_branch).is_some_and(|void| void.contains(&branch))
}

/// 三奇贵人：天干顺排出现乙丙丁、甲戊庚或壬癸辛
pub fn is_san_qi_gui_ren(stems: &[Stem]) -> bool {
    const SEQUENCES: [[Stem; 3]; 3] = [
        [Stem::Yi, Stem::Bing, Stem::Ding],
        [Stem::Jia, Stem::Wu, Stem::Geng],
        [Stem::Ren, Stem::Gui, Stem::Xin],
    ];
    stems
        .windows(3)
        .any(|w| SEQUENCES.iter().any(|seq| seq.as_slice() == w))
}

/// 禄马同乡：禄位与驿马同在局中
pub fn is_lu_ma_tong_xiang(stem: Stem, branches: &[Branch]) -> bool {
    let lu = lu_branch(stem);
    branches.contains(&lu) && branches.iter().any(|b| yi_ma_branch(*b) == lu)
}

/// 财富通门户：天干地支皆透财星，且驿马、贵人或禄位有一在局
pub fn is_cai_fu_tong_men_hu(day_stem: Stem, branches: &[Branch], stems: &[Stem]) -> bool {
    let wealth = day_stem.element().restrains();
    let wealth_in_stems = stems.iter().any(|s| s.element() == wealth);
    let wealth_in_branches = branches.iter().any(|b| b.element() == wealth);
    if !wealth_in_stems || !wealth_in_branches {
        return false;
    }

    let has_yi_ma = branches
        .iter()
        .any(|b| branches.contains(&yi_ma_branch(*b)));
    let has_gui_ren = stems
        .iter()
        .any(|s| tian_yi_branches(*s).iter().any(|b| branches.contains(b)));
    let has_lu = stems.iter().any(|s| branches.contains(&lu_branch(*s)));

    has_yi_ma || has_gui_ren || has_lu
}

/// 年命纳音五行
pub fn year_nayin_element(year_stem: Stem, year_branch: Branch) -> Option<Element> {
    nayin(year_stem, year_branch).map(|n| n.element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tian_yi_gui_ren() {
        assert!(is_tian_yi_gui_ren(Stem::Jia, Chou));
        assert!(is_tian_yi_gui_ren(Stem::Jia, Wei));
        assert!(is_tian_yi_gui_ren(Stem::Xin, Yin));
        assert!(is_tian_yi_gui_ren(Stem::Gui, Mao));
        assert!(!is_tian_yi_gui_ren(Stem::Jia, Zi));
    }

    #[test]
    fn test_lu_and_yang_ren() {
        assert!(is_lu_shen(Stem::Jia, Yin));
        assert!(is_lu_shen(Stem::Wu, Si));
        assert!(is_lu_shen(Stem::Gui, Zi));
        assert!(is_yang_ren(Stem::Jia, Mao));
        assert!(is_yang_ren(Stem::Geng, You));
        assert!(!is_yang_ren(Stem::Jia, Yin));
    }

    #[test]
    fn test_trine_based_rules() {
        // 寅午戌
        assert!(is_tao_hua(Wu, Mao));
        assert!(is_hua_gai(Yin, Xu));
        assert!(is_jiang_xing(Xu, Wu));
        assert!(is_yi_ma(Wu, Shen));
        assert!(is_jie_sha(Wu, Hai));
        // 申子辰
        assert!(is_tao_hua(Zi, You));
        assert!(is_yi_ma(Shen, Yin));
        assert!(is_zai_sha(Chen, Wu));
        // 巳酉丑
        assert!(is_hua_gai(You, Chou));
        assert!(is_wen_qu(Chou, Xu));
        // 亥卯未
        assert!(is_tao_hua(Mao, Zi));
        assert!(is_tian_xing(Wei, Hai));
    }

    #[test]
    fn test_seasonal_year_branch_rules() {
        assert!(is_gu_chen(Yin, Yin));
        assert!(is_gu_chen(Zi, Hai));
        assert!(is_gua_su(Zi, Wei));
        assert!(is_gua_su(Wu, Chou));
        assert!(!is_gua_su(Wu, Chen));
    }

    #[test]
    fn test_offset_rules() {
        assert!(is_tian_xi(Zi, You));
        assert!(is_tian_xi(Xu, Hai));
        assert!(is_hong_luan(Chou, Shen));
        assert!(is_tian_yao(Zi, Si));
        assert!(is_pi_ma(Zi, You));
        assert!(is_diao_ke(Zi, Xu));
        assert!(is_sang_men(Zi, Yin));
        assert!(is_yuan_chen(Zi, Wei));
        assert!(is_bai_hu(Zi, Shen));
        assert!(is_tian_gou(Yin, Zi));
        assert!(is_tai_sui(Chen, Chen));
        assert!(is_sui_po(Chen, Xu));
        assert!(is_jie_shen(Yin, You));
    }

    #[test]
    fn test_year_stem_rules() {
        assert!(is_wen_chang(Stem::Jia, Si));
        assert!(is_wen_chang(Stem::Wu, Shen));
        assert!(is_tian_yi(Stem::Jia, Chou));
        assert!(is_tian_yi(Stem::Yi, Zi));
        assert!(is_tian_yi(Stem::Gui, Chen));
        assert!(is_san_tai(Stem::Bing, Si));
        assert!(is_ba_zuo(Stem::Geng, Wei));
    }

    #[test]
    fn test_month_virtue_rules() {
        assert!(is_tian_de(Yin, Stem::Ding));
        assert!(is_tian_de(Chou, Stem::Geng));
        // 卯月天德在申，天干无从对应
        assert!(Stem::ALL.iter().all(|s| !is_tian_de(Mao, *s)));
        assert!(is_tian_de_he(Yin, Stem::Ren));
        assert!(is_yue_de(Yin, Stem::Bing));
        assert!(is_yue_de(Zi, Stem::Ji));
        assert!(!is_yue_de(Wu, Stem::Bing));
        assert!(is_yue_de_he(Yin, Stem::Xin));
        assert!(is_de_xiu_gui_ren(Yin, Stem::Wu));
        assert!(is_de_xiu_gui_ren(Hai, Stem::Yi));
        assert!(!is_de_xiu_gui_ren(Hai, Stem::Geng));
    }

    #[test]
    fn test_day_pillar_rules() {
        assert!(is_kui_gang(Stem::Geng, Xu));
        assert!(is_kui_gang(Stem::Ren, Chen));
        assert!(!is_kui_gang(Stem::Jia, Zi));
        assert!(is_yin_cha_yang_cuo(Stem::Bing, Zi));
        assert!(is_yin_cha_yang_cuo(Stem::Gui, Hai));
        assert!(is_shi_e_da_bai(Stem::Jia, Chen));
        assert!(is_gu_luan_sha(Stem::Yi, Si));
        assert!(is_ri_de(Stem::Jia, Yin));
        assert!(is_jin_shen(Stem::Gui, You));
    }

    #[test]
    fn test_season_rules() {
        assert!(is_si_fei(Season::Spring, Stem::Geng, Shen));
        assert!(!is_si_fei(Season::Summer, Stem::Geng, Shen));
        assert!(is_tian_she(Season::Winter, Stem::Jia, Zi));
        assert!(!is_tian_she(Season::Spring, Stem::Jia, Zi));
    }

    #[test]
    fn test_branch_only_rules() {
        assert!(is_tian_kong(Xu));
        assert!(is_di_jie(Chen));
        assert!(is_tian_ku(Wei));
        assert!(is_tian_xu(Chou));
        assert!(is_xian_chi(Chen));
        assert!(!is_xian_chi(Zi));
    }

    #[test]
    fn test_kong_wang() {
        assert!(is_kong_wang(Stem::Jia, Zi, Xu));
        assert!(is_kong_wang(Stem::Jia, Zi, Hai));
        assert!(!is_kong_wang(Stem::Jia, Zi, Zi));
        // 阴阳不配的参照柱不产生空亡
        assert!(!is_kong_wang(Stem::Jia, Chou, Xu));
    }

    #[test]
    fn test_san_qi_gui_ren() {
        assert!(is_san_qi_gui_ren(&[Stem::Yi, Stem::Bing, Stem::Ding]));
        assert!(is_san_qi_gui_ren(&[Stem::Gui, Stem::Jia, Stem::Wu, Stem::Geng]));
        assert!(is_san_qi_gui_ren(&[Stem::Ren, Stem::Gui, Stem::Xin]));
        assert!(!is_san_qi_gui_ren(&[Stem::Ding, Stem::Bing, Stem::Yi]));
        assert!(!is_san_qi_gui_ren(&[Stem::Yi, Stem::Bing]));
    }

    #[test]
    fn test_lu_ma_tong_xiang() {
        // 甲禄在寅，申子辰马在寅
        assert!(is_lu_ma_tong_xiang(Stem::Jia, &[Zi, Mao, Yin, Wu]));
        assert!(!is_lu_ma_tong_xiang(Stem::Jia, &[Mao, Mao, Yin, Wu]));
    }

    #[test]
    fn test_fu_de_xiu_qi() {
        // 甲木生于子月，水生木
        assert!(is_fu_de_xiu_qi(Stem::Jia, Zi, Zi));
        assert!(!is_fu_de_xiu_qi(Stem::Jia, Chen, Zi));
        // 申月金克木
        assert!(!is_fu_de_xiu_qi(Stem::Jia, Zi, Shen));
    }

    #[test]
    fn test_cai_fu_tong_men_hu() {
        // 甲日以土为财：天干见戊，地支见辰，又有甲禄在寅
        assert!(is_cai_fu_tong_men_hu(
            Stem::Jia,
            &[Chen, Yin, Zi, Wu],
            &[Stem::Wu, Stem::Bing, Stem::Jia, Stem::Geng],
        ));
        // 天干无财
        assert!(!is_cai_fu_tong_men_hu(
            Stem::Jia,
            &[Chen, Yin, Zi, Wu],
            &[Stem::Bing, Stem::Bing, Stem::Jia, Stem::Geng],
        ));
    }

    #[test]
    fn test_tian_luo_di_wang() {
        assert!(is_tian_luo_di_wang(Element::Fire, Stem::Jia, Xu));
        assert!(is_tian_luo_di_wang(Element::Water, Stem::Jia, Chen));
        assert!(!is_tian_luo_di_wang(Element::Metal, Stem::Jia, Xu));
        // 丙寅炉中火
        assert_eq!(year_nayin_element(Stem::Bing, Yin), Some(Element::Fire));
    }
}
