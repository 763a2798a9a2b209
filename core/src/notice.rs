/// Transient user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    CopySucceeded,
    CopyFailed,
    PreviewMissing,
    SvgExported,
    PngExported,
    PngFailed,
    ExportFailed,
    FormulaCopied,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::CopySucceeded => "已复制到剪贴板",
            Notice::CopyFailed => "复制失败",
            Notice::PreviewMissing => "请先生成预览",
            Notice::SvgExported => "SVG 导出成功",
            Notice::PngExported => "PNG 导出成功",
            Notice::PngFailed => "PNG 导出失败",
            Notice::ExportFailed => "导出失败",
            Notice::FormulaCopied => "已复制！",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Notice::CopyFailed | Notice::PreviewMissing | Notice::PngFailed | Notice::ExportFailed
        )
    }
}
