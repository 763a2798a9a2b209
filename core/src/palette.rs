#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Text inserted into the editor.
    pub command: &'static str,
    /// Math source typeset on the palette button.
    pub display: &'static str,
    pub desc_cn: Option<&'static str>,
    pub desc_en: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub label: &'static str,
    pub symbols: &'static [SymbolEntry],
}

const fn sym(
    command: &'static str,
    display: &'static str,
    desc_cn: &'static str,
    desc_en: &'static str,
) -> SymbolEntry {
    SymbolEntry {
        command,
        display,
        desc_cn: Some(desc_cn),
        desc_en: Some(desc_en),
    }
}

const fn bare(command: &'static str) -> SymbolEntry {
    SymbolEntry {
        command,
        display: command,
        desc_cn: None,
        desc_en: None,
    }
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "greek",
        label: "希腊字母",
        symbols: &[
            sym("\\alpha", "\\alpha", "阿尔法", "alpha"),
            sym("\\beta", "\\beta", "贝塔", "beta"),
            sym("\\gamma", "\\gamma", "伽马", "gamma"),
            sym("\\delta", "\\delta", "德尔塔", "delta"),
            sym("\\epsilon", "\\epsilon", "艾普西隆", "epsilon"),
            sym("\\varepsilon", "\\varepsilon", "艾普西隆（变体）", "epsilon (variant)"),
            sym("\\zeta", "\\zeta", "泽塔", "zeta"),
            sym("\\eta", "\\eta", "伊塔", "eta"),
            sym("\\theta", "\\theta", "西塔", "theta"),
            sym("\\lambda", "\\lambda", "兰布达", "lambda"),
            sym("\\mu", "\\mu", "缪", "mu"),
            sym("\\pi", "\\pi", "派", "pi"),
            sym("\\rho", "\\rho", "柔", "rho"),
            sym("\\sigma", "\\sigma", "西格玛", "sigma"),
            sym("\\tau", "\\tau", "陶", "tau"),
            sym("\\phi", "\\phi", "斐", "phi"),
            sym("\\varphi", "\\varphi", "斐（变体）", "phi (variant)"),
            sym("\\chi", "\\chi", "希", "chi"),
            sym("\\psi", "\\psi", "普西", "psi"),
            sym("\\omega", "\\omega", "欧米伽", "omega"),
            sym("\\Gamma", "\\Gamma", "大写伽马", "capital gamma"),
            sym("\\Delta", "\\Delta", "大写德尔塔", "capital delta"),
            sym("\\Theta", "\\Theta", "大写西塔", "capital theta"),
            sym("\\Lambda", "\\Lambda", "大写兰布达", "capital lambda"),
            sym("\\Sigma", "\\Sigma", "大写西格玛", "capital sigma"),
            sym("\\Phi", "\\Phi", "大写斐", "capital phi"),
            sym("\\Omega", "\\Omega", "大写欧米伽", "capital omega"),
        ],
    },
    Category {
        name: "operators",
        label: "运算符",
        symbols: &[
            sym("+", "+", "加", "plus"),
            sym("-", "-", "减", "minus"),
            sym("\\times", "\\times", "乘", "times"),
            sym("\\div", "\\div", "除", "divide"),
            sym("\\pm", "\\pm", "正负", "plus-minus"),
            sym("\\mp", "\\mp", "负正", "minus-plus"),
            sym("\\cdot", "\\cdot", "点乘", "centered dot"),
            sym("\\ast", "\\ast", "星号", "asterisk"),
            sym("\\circ", "\\circ", "复合", "composition"),
            sym("\\oplus", "\\oplus", "直和", "direct sum"),
            sym("\\otimes", "\\otimes", "张量积", "tensor product"),
            sym("\\frac{}{}", "\\frac{a}{b}", "分数", "fraction"),
            sym("\\sqrt{}", "\\sqrt{x}", "平方根", "square root"),
            sym("\\sqrt[n]{}", "\\sqrt[n]{x}", "n 次方根", "n-th root"),
            sym("^{}", "x^{n}", "上标", "superscript"),
            sym("_{}", "x_{i}", "下标", "subscript"),
        ],
    },
    Category {
        name: "relations",
        label: "关系符",
        symbols: &[
            sym("=", "=", "等于", "equal"),
            sym("\\neq", "\\neq", "不等于", "not equal"),
            sym("\\approx", "\\approx", "约等于", "approximately"),
            sym("\\equiv", "\\equiv", "恒等于", "equivalent"),
            sym("\\sim", "\\sim", "相似", "similar"),
            sym("\\cong", "\\cong", "全等", "congruent"),
            sym("\\propto", "\\propto", "正比于", "proportional to"),
            sym("<", "<", "小于", "less than"),
            sym(">", ">", "大于", "greater than"),
            sym("\\leq", "\\leq", "小于等于", "less or equal"),
            sym("\\geq", "\\geq", "大于等于", "greater or equal"),
            sym("\\ll", "\\ll", "远小于", "much less"),
            sym("\\gg", "\\gg", "远大于", "much greater"),
            sym("\\parallel", "\\parallel", "平行", "parallel"),
            sym("\\perp", "\\perp", "垂直", "perpendicular"),
        ],
    },
    Category {
        name: "arrows",
        label: "箭头",
        symbols: &[
            sym("\\to", "\\to", "趋向", "to"),
            sym("\\leftarrow", "\\leftarrow", "左箭头", "left arrow"),
            sym("\\rightarrow", "\\rightarrow", "右箭头", "right arrow"),
            sym("\\leftrightarrow", "\\leftrightarrow", "双向箭头", "left-right arrow"),
            sym("\\Leftarrow", "\\Leftarrow", "左双线箭头", "double left arrow"),
            sym("\\Rightarrow", "\\Rightarrow", "推出", "implies"),
            sym("\\Leftrightarrow", "\\Leftrightarrow", "当且仅当", "if and only if"),
            sym("\\mapsto", "\\mapsto", "映射到", "maps to"),
            sym("\\uparrow", "\\uparrow", "上箭头", "up arrow"),
            sym("\\downarrow", "\\downarrow", "下箭头", "down arrow"),
            sym("\\xrightarrow{}", "\\xrightarrow{f}", "带标注箭头", "labelled arrow"),
        ],
    },
    Category {
        name: "calculus",
        label: "微积分",
        symbols: &[
            sym("\\int", "\\int", "积分", "integral"),
            sym("\\int_{a}^{b}", "\\int_{a}^{b}", "定积分", "definite integral"),
            sym("\\iint", "\\iint", "二重积分", "double integral"),
            sym("\\oint", "\\oint", "环路积分", "contour integral"),
            sym("\\sum_{i=1}^{n}", "\\sum_{i=1}^{n}", "求和", "summation"),
            sym("\\prod_{i=1}^{n}", "\\prod_{i=1}^{n}", "连乘", "product"),
            sym("\\lim_{x \\to 0}", "\\lim_{x \\to 0}", "极限", "limit"),
            sym("\\frac{d}{dx}", "\\frac{d}{dx}", "导数", "derivative"),
            sym("\\frac{\\partial}{\\partial x}", "\\frac{\\partial}{\\partial x}", "偏导数", "partial derivative"),
            sym("\\partial", "\\partial", "偏微分", "partial"),
            sym("\\nabla", "\\nabla", "梯度算子", "nabla"),
            sym("\\infty", "\\infty", "无穷", "infinity"),
            sym("\\mathrm{d}", "\\mathrm{d}", "微分", "differential"),
        ],
    },
    Category {
        name: "sets",
        label: "集合与逻辑",
        symbols: &[
            sym("\\in", "\\in", "属于", "element of"),
            sym("\\notin", "\\notin", "不属于", "not element of"),
            sym("\\subset", "\\subset", "真子集", "proper subset"),
            sym("\\subseteq", "\\subseteq", "子集", "subset"),
            sym("\\cup", "\\cup", "并集", "union"),
            sym("\\cap", "\\cap", "交集", "intersection"),
            sym("\\setminus", "\\setminus", "差集", "set difference"),
            sym("\\emptyset", "\\emptyset", "空集", "empty set"),
            sym("\\forall", "\\forall", "任意", "for all"),
            sym("\\exists", "\\exists", "存在", "exists"),
            sym("\\neg", "\\neg", "非", "not"),
            sym("\\land", "\\land", "与", "and"),
            sym("\\lor", "\\lor", "或", "or"),
            sym("\\mathbb{R}", "\\mathbb{R}", "实数集", "real numbers"),
            sym("\\mathbb{N}", "\\mathbb{N}", "自然数集", "natural numbers"),
            sym("\\mathbb{Z}", "\\mathbb{Z}", "整数集", "integers"),
            sym("\\mathbb{C}", "\\mathbb{C}", "复数集", "complex numbers"),
        ],
    },
    Category {
        name: "functions",
        label: "函数",
        symbols: &[
            bare("\\sin"),
            bare("\\cos"),
            bare("\\tan"),
            bare("\\cot"),
            bare("\\arcsin"),
            bare("\\arccos"),
            bare("\\arctan"),
            bare("\\sinh"),
            bare("\\cosh"),
            sym("\\log", "\\log", "对数", "logarithm"),
            sym("\\ln", "\\ln", "自然对数", "natural logarithm"),
            sym("\\exp", "\\exp", "指数函数", "exponential"),
            sym("\\max", "\\max", "最大值", "maximum"),
            sym("\\min", "\\min", "最小值", "minimum"),
            sym("\\det", "\\det", "行列式", "determinant"),
        ],
    },
    Category {
        name: "accents",
        label: "修饰符",
        symbols: &[
            sym("\\hat{}", "\\hat{a}", "尖帽", "hat"),
            sym("\\bar{}", "\\bar{a}", "横线", "bar"),
            sym("\\vec{}", "\\vec{a}", "向量", "vector"),
            sym("\\dot{}", "\\dot{a}", "一阶导（点）", "dot"),
            sym("\\ddot{}", "\\ddot{a}", "二阶导（双点）", "double dot"),
            sym("\\tilde{}", "\\tilde{a}", "波浪线", "tilde"),
            sym("\\overline{}", "\\overline{ab}", "上划线", "overline"),
            sym("\\underline{}", "\\underline{ab}", "下划线", "underline"),
            sym("\\overbrace{}^{}", "\\overbrace{ab}^{n}", "上括号", "overbrace"),
            sym("\\underbrace{}_{}", "\\underbrace{ab}_{n}", "下括号", "underbrace"),
            sym("\\mathbf{}", "\\mathbf{A}", "粗体", "bold"),
            sym("\\mathcal{}", "\\mathcal{L}", "花体", "calligraphic"),
        ],
    },
    Category {
        name: "brackets",
        label: "括号",
        symbols: &[
            sym("\\left( \\right)", "\\left( x \\right)", "自适应圆括号", "auto-sized parentheses"),
            sym("\\left[ \\right]", "\\left[ x \\right]", "自适应方括号", "auto-sized brackets"),
            sym("\\left\\{ \\right\\}", "\\left\\{ x \\right\\}", "自适应花括号", "auto-sized braces"),
            sym("\\left| \\right|", "\\left| x \\right|", "绝对值", "absolute value"),
            sym("\\left\\| \\right\\|", "\\left\\| x \\right\\|", "范数", "norm"),
            sym("\\langle \\rangle", "\\langle x \\rangle", "尖括号", "angle brackets"),
            sym("\\lfloor \\rfloor", "\\lfloor x \\rfloor", "向下取整", "floor"),
            sym("\\lceil \\rceil", "\\lceil x \\rceil", "向上取整", "ceiling"),
        ],
    },
    Category {
        name: "matrices",
        label: "矩阵",
        symbols: &[
            sym(
                "\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}",
                "\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}",
                "圆括号矩阵",
                "parenthesized matrix",
            ),
            sym(
                "\\begin{bmatrix} a & b \\\\ c & d \\end{bmatrix}",
                "\\begin{bmatrix} a & b \\\\ c & d \\end{bmatrix}",
                "方括号矩阵",
                "bracketed matrix",
            ),
            sym(
                "\\begin{vmatrix} a & b \\\\ c & d \\end{vmatrix}",
                "\\begin{vmatrix} a & b \\\\ c & d \\end{vmatrix}",
                "行列式",
                "determinant",
            ),
            sym(
                "\\begin{cases} x, & x > 0 \\\\ -x, & x \\leq 0 \\end{cases}",
                "\\begin{cases} a \\\\ b \\end{cases}",
                "分段函数",
                "piecewise function",
            ),
            sym(
                "\\begin{aligned} a &= b \\\\ c &= d \\end{aligned}",
                "\\begin{aligned} a &= b \\end{aligned}",
                "对齐环境",
                "aligned equations",
            ),
            sym("\\cdots", "\\cdots", "水平省略号", "horizontal dots"),
            sym("\\vdots", "\\vdots", "竖直省略号", "vertical dots"),
            sym("\\ddots", "\\ddots", "对角省略号", "diagonal dots"),
        ],
    },
];

/// Whole formulas offered on the editor's templates tab.
pub const TEMPLATES: &[SymbolEntry] = &[
    sym(
        "x = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}",
        "x = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}",
        "求根公式",
        "quadratic formula",
    ),
    sym("e^{i\\pi} + 1 = 0", "e^{i\\pi} + 1 = 0", "欧拉恒等式", "Euler's identity"),
    sym("a^2 + b^2 = c^2", "a^2 + b^2 = c^2", "勾股定理", "Pythagorean theorem"),
    sym(
        "\\int_{-\\infty}^{\\infty} e^{-x^2} \\, dx = \\sqrt{\\pi}",
        "\\int_{-\\infty}^{\\infty} e^{-x^2} dx = \\sqrt{\\pi}",
        "高斯积分",
        "Gaussian integral",
    ),
    sym(
        "f(x) = \\sum_{n=0}^{\\infty} \\frac{f^{(n)}(a)}{n!} (x - a)^n",
        "\\sum_{n=0}^{\\infty} \\frac{f^{(n)}(a)}{n!} (x-a)^n",
        "泰勒展开",
        "Taylor series",
    ),
    sym(
        "\\nabla \\cdot \\vec{E} = \\frac{\\rho}{\\varepsilon_0}",
        "\\nabla \\cdot \\vec{E} = \\frac{\\rho}{\\varepsilon_0}",
        "高斯定律",
        "Gauss's law",
    ),
    sym(
        "P(A \\mid B) = \\frac{P(B \\mid A) P(A)}{P(B)}",
        "P(A \\mid B) = \\frac{P(B \\mid A) P(A)}{P(B)}",
        "贝叶斯公式",
        "Bayes' theorem",
    ),
];

pub fn category_by_name(name: &str) -> Option<&'static Category> {
    let trimmed = name.trim();
    CATEGORIES.iter().find(|category| category.name == trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn category_names_are_unique() {
        let mut seen = HashSet::new();
        for category in CATEGORIES {
            assert!(seen.insert(category.name), "duplicate {}", category.name);
            assert!(!category.symbols.is_empty(), "{} is empty", category.name);
        }
    }

    #[test]
    fn lookup_trims_name() {
        let category = category_by_name(" calculus ").expect("calculus");
        assert_eq!(category.label, "微积分");
        assert!(category_by_name("emoji").is_none());
    }

    #[test]
    fn entries_without_descriptions_are_bare_commands() {
        let functions = category_by_name("functions").expect("functions");
        let sin = functions.symbols[0];
        assert_eq!(sin.command, "\\sin");
        assert_eq!(sin.display, "\\sin");
        assert_eq!(sin.desc_cn, None);
    }
}
