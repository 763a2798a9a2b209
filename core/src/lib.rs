pub mod clock;
pub mod config;
pub mod editing;
pub mod export;
pub mod formula;
pub mod layout;
pub mod notice;
pub mod palette;
pub mod panel;
pub mod scheduler;
pub mod svg;

pub use config::{ClockSettings, ConfigError, EditorSettings, FormulaSettings, SiteConfig};
pub use clock::{ClockReading, Drag, EdgeCollapse, HandAngles, WidgetPosition};
pub use editing::{EditSurface, TextBuffer};
pub use export::{ExportArtifact, ExportError, ExportSources, ExportTarget, PreparedSvg, RasterPlan};
pub use layout::{HorizontalAnchor, PanelGeometry, PanelPlacement, Rect, Viewport};
pub use notice::Notice;
pub use palette::{Category, SymbolEntry, CATEGORIES, TEMPLATES};
pub use panel::{HideTicket, PaletteController, PaletteView, TooltipContent};
pub use scheduler::{Completion, Dispatch, RenderError, RenderScheduler};
pub use svg::{SvgElement, SvgError, SvgNode};
